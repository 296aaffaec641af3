//! Page modules for route-level screens.

pub mod dashboard;
pub mod login;
