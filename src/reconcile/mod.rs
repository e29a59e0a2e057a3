//! Reconcile module - Ensure-present and ensure-absent workflows.
//!
//! The [`Client`] validates resources, talks to the API server through a
//! caller-supplied [`Transport`] and uses [`crate::patch::form_patch`] to send
//! only the changes an existing object needs.

mod client;
mod resource;
mod transport;


pub use client::*;
pub use resource::*;
pub use transport::*;
