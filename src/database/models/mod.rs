pub mod contract;
pub mod shift;
pub mod user;

// Re-export all models for easy importing
pub use contract::*;
pub use shift::*;
pub use user::*;
