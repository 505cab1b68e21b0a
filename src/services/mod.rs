pub mod auth;
pub mod shifts;

pub use auth::{AuthService, Claims};
pub use shifts::{QuickAction, QuickActionForm, QuickActionRequest, ShiftService};
