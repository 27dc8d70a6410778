//! SOCKS5 address handling.
//!
//! - [`addr`]: wire addresses and their normalized endpoint form
//! - [`resolve`]: literal/DNS resolution into dual-stack endpoints

pub mod addr;
pub mod resolve;

pub use addr::{mapped_endpoint, WireAddress};
pub use resolve::{resolve_literal, EndpointResolver};
