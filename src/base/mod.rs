//! Base types and error handling.
//!
//! - [`NetError`]: error codes for address, resolution, socket, and wait failures
//! - [`context`]: `io::Error` to `NetError` conversion helpers

pub mod context;
pub mod neterror;

pub use neterror::NetError;
