//! # socksnet
//!
//! Address representation and resolution for SOCKS5 proxy endpoints.
//!
//! `socksnet` converts between SOCKS5 wire addresses and native socket
//! addresses, resolves textual destinations into endpoints for a single
//! dual-stack socket, and provides the deadline-aware suspension point
//! that session I/O waits go through.
//!
//! ## Features
//!
//! - **Wire Addresses**: `ATYP`-tagged IPv4, IPv6 and domain addresses with exact byte layouts
//! - **Dual-Stack Endpoints**: IPv4 destinations normalized to IPv4-mapped IPv6
//! - **Resolution**: literal IPv4, then literal IPv6, then asynchronous DNS
//! - **Sockets**: IPv6 sockets registered for read/write readiness
//! - **Waits**: cooperative yields and I/O waits under a per-session timeout ceiling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use socksnet::socks5::{EndpointResolver, WireAddress};
//! use socksnet::task::{yield_or_wait, YieldContext, YieldMode};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cx = YieldContext::with_timeout(Duration::from_secs(10));
//!     let resolver = EndpointResolver::system();
//!     let endpoint = yield_or_wait(&cx, YieldMode::WaitIo(resolver.resolve("example.com", 443)))
//!         .await
//!         .unwrap();
//!     println!("{:?}", endpoint);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions and context helpers
//! - [`config`] - Timeout and DNS backend settings
//! - [`dns`] - Pluggable asynchronous DNS resolvers
//! - [`socket`] - Dual-stack socket creation
//! - [`socks5`] - Wire addresses and endpoint resolution
//! - [`task`] - Cooperative yield and deadline-bounded waits

pub mod base;
pub mod config;
pub mod dns;
pub mod socket;
pub mod socks5;
pub mod task;
