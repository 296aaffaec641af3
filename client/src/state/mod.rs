//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! The session is the only cross-page state; it is provided once by `App`
//! and read through context everywhere else.

pub mod session;
