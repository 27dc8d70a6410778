//! Socket creation for dual-stack proxy endpoints.
//!
//! - [`factory`]: IPv6 sockets with IPv4-mapped reach, registered for readiness

#[cfg(unix)]
pub mod factory;

#[cfg(unix)]
pub use factory::{create_socket, DualStackSocket, Registration, SocketKind};
