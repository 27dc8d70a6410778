//! hickory-dns backend.
//!
//! A shared, lazily built `TokioResolver` serves every `HickoryResolver`.
//! Lookups ask for A records before AAAA, and answers are reordered so IPv4
//! comes first; endpoint resolution takes the first answer, so an IPv4
//! destination (reached through its IPv4-mapped form) wins when both exist.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::neterror::NetError;
use hickory_resolver::{
    config::{LookupIpStrategy, ResolverConfig},
    name_server::TokioConnectionProvider,
    TokioResolver,
};
use std::{
    io,
    net::{IpAddr, SocketAddr},
    sync::LazyLock,
};

static RESOLVER: LazyLock<TokioResolver> = LazyLock::new(|| {
    let mut builder = TokioResolver::builder_tokio().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "system DNS config unreadable, using defaults");
        TokioResolver::builder_with_config(
            ResolverConfig::default(),
            TokioConnectionProvider::default(),
        )
    });
    builder.options_mut().ip_strategy = LookupIpStrategy::Ipv4thenIpv6;
    builder.build()
});

/// Async DNS resolver backed by hickory-dns.
#[derive(Debug, Clone, Copy, Default)]
pub struct HickoryResolver;

impl HickoryResolver {
    /// The resolver itself is built on the first query.
    pub fn new() -> Self {
        Self
    }
}

/// Puts IPv4 answers ahead of IPv6 ones, keeping resolver order within
/// each family. Ports are zero.
pub(crate) fn order_answers(ips: impl IntoIterator<Item = IpAddr>) -> Vec<SocketAddr> {
    let (mut v4, v6): (Vec<_>, Vec<_>) = ips
        .into_iter()
        .map(|ip| SocketAddr::new(ip, 0))
        .partition(SocketAddr::is_ipv4);
    v4.extend(v6);
    v4
}

impl Resolve for HickoryResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let domain = name.as_str();
            tracing::debug!(domain = %domain, "resolving via hickory-dns");

            let lookup = RESOLVER.lookup_ip(domain).await.map_err(|e| {
                tracing::debug!(domain = %domain, error = %e, "hickory-dns lookup failed");
                NetError::dns_failed(domain, io::Error::new(io::ErrorKind::NotFound, e.to_string()))
            })?;

            let addrs = order_answers(lookup.iter());
            if addrs.is_empty() {
                return Err(NetError::dns_failed(
                    domain,
                    io::Error::new(io::ErrorKind::NotFound, "empty answer"),
                ));
            }

            tracing::debug!(domain = %domain, first = %addrs[0], count = addrs.len(), "hickory-dns answered");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}
