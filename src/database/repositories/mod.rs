pub mod contract;
pub mod shift;
pub mod user;

// Re-export all repositories for easy importing
pub use contract::ContractRepository;
pub use shift::ShiftRepository;
pub use user::UserRepository;
