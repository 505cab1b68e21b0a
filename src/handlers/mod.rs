pub mod auth;
pub mod contracts;
pub mod pages;
pub mod shared;
pub mod shifts;
