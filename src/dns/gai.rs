//! System DNS resolver using getaddrinfo.
//!
//! This resolver uses the operating system's native DNS resolution via
//! `getaddrinfo`, executed in the blocking pool so the calling task only
//! suspends while the query runs.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::{context::IoResultExt, neterror::NetError};
use std::{
    io,
    net::{SocketAddr, ToSocketAddrs},
};

/// System DNS resolver using `getaddrinfo` in a thread pool.
///
/// Queries are made for any address family through `ToSocketAddrs`, which
/// cannot pass `AI_V4MAPPED | AI_ADDRCONFIG`. Results are therefore not
/// filtered by locally configured families, and which answer comes first
/// is decided by the system's sorting (RFC 6724 on glibc). IPv4 answers
/// are mapped to IPv6 by the caller, not by the resolver.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.as_str().to_string();
            let domain = host.clone();

            let result = tokio::task::spawn_blocking(move || {
                tracing::debug!(host = %host, "resolving via getaddrinfo");
                (host.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|iter| iter.collect::<Vec<SocketAddr>>())
            })
            .await;

            // Handle task join error (cancellation, panic)
            let addrs = result
                .map_err(|e| {
                    tracing::error!(error = %e, "DNS resolution task failed");
                    NetError::NameNotResolved
                })?
                .dns_context(&domain)
                .inspect_err(|e| {
                    tracing::debug!(domain = %domain, error = %e, "DNS resolution failed");
                })?;

            if addrs.is_empty() {
                return Err(NetError::dns_failed(
                    &domain,
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        "No addresses returned by getaddrinfo",
                    ),
                ));
            }

            tracing::debug!(domain = %domain, count = addrs.len(), "DNS resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}
