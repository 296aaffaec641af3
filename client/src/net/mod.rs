//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues the HTTP calls, `auth_error` turns 401/403 into session
//! teardown, and `error` defines the failure type they share. Wire shapes
//! live in the `contracts` crate.

pub mod api;
pub mod auth_error;
pub mod error;
