use std::{io, sync::Arc};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum NetError {
    // Address Errors
    #[error("Address invalid")]
    AddressInvalid,
    #[error("SOCKS5 address type not supported: {0:#04x}")]
    AddressTypeNotSupported(u8),
    #[error("Domain address requires resolution")]
    UnsupportedVariant,
    #[error("Address family mismatch")]
    FamilyMismatch,

    // Resolution Errors
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Name not resolved: {domain}")]
    NameNotResolvedFor {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },

    // Socket Errors
    #[error("Socket creation failed")]
    SocketCreateFailed(#[source] Arc<io::Error>),
    #[error("Connection timed out")]
    ConnectionTimedOut,
}

impl NetError {
    pub fn dns_failed(domain: &str, source: io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.to_string(),
            source: Arc::new(source),
        }
    }

    pub fn socket_create_failed(source: io::Error) -> Self {
        NetError::SocketCreateFailed(Arc::new(source))
    }

    /// True for every way a name can fail to resolve.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            NetError::NameNotResolved | NetError::NameNotResolvedFor { .. }
        )
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::SocketCreateFailed(_) => -12,
            NetError::NameNotResolved => -105,
            NetError::NameNotResolvedFor { .. } => -105,
            NetError::AddressInvalid => -108,
            NetError::ConnectionTimedOut => -118,
            // SOCKS address errors (custom codes starting at -910)
            NetError::UnsupportedVariant => -910,
            NetError::FamilyMismatch => -911,
            NetError::AddressTypeNotSupported(_) => -912,
        }
    }
}
