//! DNS Resolution Module
//!
//! Provides pluggable asynchronous DNS resolution:
//! - System resolver (getaddrinfo via thread pool)
//! - Async hickory-dns resolver
//!
//! # Architecture
//!
//! The `Resolve` trait is the seam between endpoint resolution and the
//! query engine. [`EndpointResolver`](crate::socks5::EndpointResolver) only
//! calls into it after literal IPv4/IPv6 parsing fails, and only looks at
//! the first address returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use socksnet::dns::{Name, Resolve, HickoryResolver};
//!
//! let resolver = HickoryResolver::new();
//! let addrs = resolver.resolve(Name::new("example.com")).await?;
//! for addr in addrs {
//!     println!("Resolved: {}", addr);
//! }
//! ```

mod gai;
mod hickory;
mod resolve;

pub use gai::GaiResolver;
pub use hickory::HickoryResolver;
pub use resolve::{Addrs, Name, Resolve, Resolving};
