//! Runtime configuration for endpoint resolution and I/O waits.

use crate::task::YieldContext;
use std::time::Duration;

/// Which DNS engine backs hostname resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DnsBackend {
    /// System `getaddrinfo` on the blocking pool.
    #[default]
    System,
    /// Fully async hickory-dns.
    Hickory,
}

/// Resolution and wait settings for a proxy session.
#[derive(Debug, Clone, Default)]
pub struct MiscConfig {
    /// Ceiling applied to every I/O wait; `None` waits without deadline
    pub io_timeout: Option<Duration>,
    /// DNS engine for hostnames
    pub dns_backend: DnsBackend,
}

impl MiscConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the I/O timeout ceiling.
    pub fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Set the I/O timeout in whole seconds. Negative values disable it.
    pub fn io_timeout_secs(mut self, secs: i64) -> Self {
        self.io_timeout = u64::try_from(secs).ok().map(Duration::from_secs);
        self
    }

    /// Set the DNS backend.
    pub fn dns_backend(mut self, backend: DnsBackend) -> Self {
        self.dns_backend = backend;
        self
    }

    /// A fresh wait context carrying this config's timeout ceiling.
    pub fn yield_context(&self) -> YieldContext {
        YieldContext::new(self.io_timeout)
    }
}
