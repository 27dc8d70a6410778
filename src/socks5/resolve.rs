//! Textual address to dual-stack endpoint resolution.

use super::addr::{mapped_endpoint, WireAddress};
use crate::{
    base::neterror::NetError,
    config::{DnsBackend, MiscConfig},
    dns::{GaiResolver, HickoryResolver, Name, Resolve},
};
use std::{
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV6},
    sync::Arc,
};

/// Parses `host` as a literal IPv4 or IPv6 address.
///
/// Dotted-quad IPv4 is tried first and comes back IPv4-mapped. Hostnames
/// return `None`.
pub fn resolve_literal(host: &str, port: u16) -> Option<SocketAddrV6> {
    if let Ok(addr) = host.parse::<Ipv4Addr>() {
        return Some(mapped_endpoint(addr, port));
    }

    if let Ok(addr) = host.parse::<Ipv6Addr>() {
        return Some(SocketAddrV6::new(addr, port, 0, 0));
    }

    None
}

/// Resolves SOCKS5 destinations into endpoints for a dual-stack socket.
///
/// Every endpoint produced is an IPv6 socket address; IPv4 results use the
/// IPv4-mapped form. Failures are reported once and never retried.
#[derive(Debug, Clone)]
pub struct EndpointResolver<R = GaiResolver> {
    dns: R,
}

impl EndpointResolver<GaiResolver> {
    /// Resolver backed by the system `getaddrinfo`.
    pub fn system() -> Self {
        Self::new(GaiResolver::new())
    }
}

impl EndpointResolver<Arc<dyn Resolve>> {
    /// Resolver using the DNS backend selected in `config`.
    pub fn from_config(config: &MiscConfig) -> Self {
        let dns: Arc<dyn Resolve> = match config.dns_backend {
            DnsBackend::System => Arc::new(GaiResolver::new()),
            DnsBackend::Hickory => Arc::new(HickoryResolver::new()),
        };
        Self::new(dns)
    }
}

impl<R: Resolve> EndpointResolver<R> {
    pub fn new(dns: R) -> Self {
        Self { dns }
    }

    /// Resolves `host` to an endpoint carrying `port`.
    ///
    /// Literal IPv4 and IPv6 addresses never reach DNS. Hostnames use the
    /// first address returned by the resolver. The port is always `port`,
    /// whatever DNS reported.
    pub async fn resolve(&self, host: &str, port: u16) -> Result<SocketAddrV6, NetError> {
        if let Some(endpoint) = resolve_literal(host, port) {
            return Ok(endpoint);
        }

        let first = self.dns.resolve(Name::new(host)).await?.next();
        let endpoint = match first {
            Some(SocketAddr::V4(v4)) => mapped_endpoint(*v4.ip(), port),
            Some(SocketAddr::V6(v6)) => {
                SocketAddrV6::new(*v6.ip(), port, v6.flowinfo(), v6.scope_id())
            }
            None => {
                tracing::debug!(domain = %host, "DNS returned no usable address");
                return Err(NetError::NameNotResolved);
            }
        };

        tracing::debug!(domain = %host, endpoint = %endpoint, "resolved endpoint");
        Ok(endpoint)
    }

    /// Resolves a request's destination address.
    ///
    /// IP variants decode directly; names are resolved through DNS.
    pub async fn resolve_wire(&self, addr: &WireAddress) -> Result<SocketAddrV6, NetError> {
        match addr {
            WireAddress::Domain { name, port } => {
                let host = std::str::from_utf8(name).map_err(|_| NetError::NameNotResolved)?;
                self.resolve(host, *port).await
            }
            _ => addr.to_endpoint(),
        }
    }
}
