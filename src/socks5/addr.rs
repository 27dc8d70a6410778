//! SOCKS5 wire addresses and their native endpoint form.
//!
//! A [`WireAddress`] is the `ATYP`-tagged address carried in SOCKS5
//! requests, replies and UDP headers. Native endpoints are normalized to
//! [`SocketAddrV6`]: IPv4 destinations use the IPv4-mapped form
//! (`::ffff:a.b.c.d`) so a single dual-stack socket can reach both families.
//!
//! # Wire layout (big-endian ports)
//!
//! | atype  | body                               | total   |
//! |--------|------------------------------------|---------|
//! | `0x01` | 4-byte address, 2-byte port        | 7       |
//! | `0x03` | 1-byte len `n`, name, 2-byte port  | `4 + n` |
//! | `0x04` | 16-byte address, 2-byte port       | 19      |

use crate::base::neterror::NetError;
use bytes::{Buf, BufMut, Bytes};
use socket2::Domain;
use std::{
    fmt,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6},
};

pub const ATYPE_IPV4: u8 = 0x01;
pub const ATYPE_DOMAIN: u8 = 0x03;
pub const ATYPE_IPV6: u8 = 0x04;

/// Encoded size of an IPv4 address, tag included.
pub const IPV4_WIRE_LEN: usize = 7;
/// Encoded size of an IPv6 address, tag included.
pub const IPV6_WIRE_LEN: usize = 19;

/// Longest name a one-byte length prefix can describe.
pub const MAX_DOMAIN_LEN: usize = 255;

/// A SOCKS5 destination or bound address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WireAddress {
    Ipv4 { addr: Ipv4Addr, port: u16 },
    Ipv6 { addr: Ipv6Addr, port: u16 },
    Domain { name: Bytes, port: u16 },
}

impl WireAddress {
    /// Builds a domain variant, rejecting names that do not fit the length byte.
    pub fn domain(name: impl Into<Bytes>, port: u16) -> Result<Self, NetError> {
        let name = name.into();
        if name.len() > MAX_DOMAIN_LEN {
            return Err(NetError::AddressInvalid);
        }
        Ok(WireAddress::Domain { name, port })
    }

    /// The `ATYP` tag of this variant.
    pub fn atype(&self) -> u8 {
        match self {
            WireAddress::Ipv4 { .. } => ATYPE_IPV4,
            WireAddress::Ipv6 { .. } => ATYPE_IPV6,
            WireAddress::Domain { .. } => ATYPE_DOMAIN,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            WireAddress::Ipv4 { port, .. }
            | WireAddress::Ipv6 { port, .. }
            | WireAddress::Domain { port, .. } => *port,
        }
    }

    /// Address family of the IP variants; `None` for names.
    pub fn family(&self) -> Option<Domain> {
        match self {
            WireAddress::Ipv4 { .. } => Some(Domain::IPV4),
            WireAddress::Ipv6 { .. } => Some(Domain::IPV6),
            WireAddress::Domain { .. } => None,
        }
    }

    /// Number of bytes this address occupies on the wire, tag included.
    pub fn encoded_len(&self) -> usize {
        match self {
            WireAddress::Ipv4 { .. } => IPV4_WIRE_LEN,
            WireAddress::Ipv6 { .. } => IPV6_WIRE_LEN,
            WireAddress::Domain { name, .. } => 1 + 1 + name.len() + 2,
        }
    }

    /// Parses an address starting at its `ATYP` byte.
    ///
    /// Returns the address and the number of bytes consumed, so callers can
    /// skip the header of a request or UDP datagram.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), NetError> {
        let mut cur = buf;
        if !cur.has_remaining() {
            return Err(NetError::AddressInvalid);
        }

        let addr = match cur.get_u8() {
            ATYPE_IPV4 => {
                if cur.remaining() < 4 + 2 {
                    return Err(NetError::AddressInvalid);
                }
                let addr = Ipv4Addr::from(cur.get_u32());
                WireAddress::Ipv4 {
                    addr,
                    port: cur.get_u16(),
                }
            }
            ATYPE_IPV6 => {
                if cur.remaining() < 16 + 2 {
                    return Err(NetError::AddressInvalid);
                }
                let addr = Ipv6Addr::from(cur.get_u128());
                WireAddress::Ipv6 {
                    addr,
                    port: cur.get_u16(),
                }
            }
            ATYPE_DOMAIN => {
                if !cur.has_remaining() {
                    return Err(NetError::AddressInvalid);
                }
                let len = cur.get_u8() as usize;
                if cur.remaining() < len + 2 {
                    return Err(NetError::AddressInvalid);
                }
                let name = Bytes::copy_from_slice(&cur[..len]);
                cur.advance(len);
                WireAddress::Domain {
                    name,
                    port: cur.get_u16(),
                }
            }
            atype => return Err(NetError::AddressTypeNotSupported(atype)),
        };

        Ok((addr, buf.len() - cur.remaining()))
    }

    /// Writes the address, tag first, with the port in network byte order.
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.atype());
        match self {
            WireAddress::Ipv4 { addr, port } => {
                buf.put_slice(&addr.octets());
                buf.put_u16(*port);
            }
            WireAddress::Ipv6 { addr, port } => {
                buf.put_slice(&addr.octets());
                buf.put_u16(*port);
            }
            WireAddress::Domain { name, port } => {
                // `domain()` and `parse()` both cap the name at 255 bytes
                buf.put_u8(name.len() as u8);
                buf.put_slice(name);
                buf.put_u16(*port);
            }
        }
    }

    /// Maps an IP variant to the normalized IPv6 endpoint.
    ///
    /// IPv4 addresses become IPv4-mapped IPv6 addresses. Names must go through
    /// [`EndpointResolver`](super::EndpointResolver) instead and fail with
    /// [`NetError::UnsupportedVariant`].
    pub fn to_endpoint(&self) -> Result<SocketAddrV6, NetError> {
        match self {
            WireAddress::Ipv4 { addr, port } => Ok(mapped_endpoint(*addr, *port)),
            WireAddress::Ipv6 { addr, port } => Ok(SocketAddrV6::new(*addr, *port, 0, 0)),
            WireAddress::Domain { .. } => Err(NetError::UnsupportedVariant),
        }
    }

    /// Builds the wire form of a normalized endpoint for a peer of the given family.
    ///
    /// An IPv4 target with an IPv4-mapped endpoint yields the IPv4 variant;
    /// any other IP target yields the IPv6 variant.
    pub fn from_endpoint(endpoint: SocketAddrV6, target: Domain) -> Result<Self, NetError> {
        if target != Domain::IPV4 && target != Domain::IPV6 {
            return Err(NetError::FamilyMismatch);
        }

        if target == Domain::IPV4 {
            if let Some(addr) = endpoint.ip().to_ipv4_mapped() {
                return Ok(WireAddress::Ipv4 {
                    addr,
                    port: endpoint.port(),
                });
            }
        }

        Ok(WireAddress::Ipv6 {
            addr: *endpoint.ip(),
            port: endpoint.port(),
        })
    }

    /// Converts a native socket address into its wire form.
    ///
    /// IPv4 and IPv4-mapped addresses produce the IPv4 variant and report 7
    /// bytes; everything else produces the IPv6 variant and reports 19. The
    /// length is what a relay skips in a received address header.
    pub fn from_socket_addr(addr: SocketAddr) -> (Self, usize) {
        match addr {
            SocketAddr::V4(v4) => (
                WireAddress::Ipv4 {
                    addr: *v4.ip(),
                    port: v4.port(),
                },
                IPV4_WIRE_LEN,
            ),
            SocketAddr::V6(v6) => match v6.ip().to_ipv4_mapped() {
                Some(addr) => (
                    WireAddress::Ipv4 {
                        addr,
                        port: v6.port(),
                    },
                    IPV4_WIRE_LEN,
                ),
                None => (
                    WireAddress::Ipv6 {
                        addr: *v6.ip(),
                        port: v6.port(),
                    },
                    IPV6_WIRE_LEN,
                ),
            },
        }
    }

    /// Converts to a socket address usable with a socket of family `target`.
    ///
    /// IPv4 sockets only accept the IPv4 variant. IPv6 sockets accept both IP
    /// variants through [`to_endpoint`](Self::to_endpoint).
    pub fn to_socket_addr(&self, target: Domain) -> Result<SocketAddr, NetError> {
        if let WireAddress::Domain { .. } = self {
            return Err(NetError::UnsupportedVariant);
        }

        if target == Domain::IPV4 {
            match self {
                WireAddress::Ipv4 { addr, port } => {
                    Ok(SocketAddr::V4(SocketAddrV4::new(*addr, *port)))
                }
                _ => Err(NetError::FamilyMismatch),
            }
        } else if target == Domain::IPV6 {
            self.to_endpoint().map(SocketAddr::V6)
        } else {
            Err(NetError::FamilyMismatch)
        }
    }
}

impl fmt::Display for WireAddress {
    /// Renders `[host]:port`; names are shown as received.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireAddress::Ipv4 { addr, port } => write!(f, "[{}]:{}", addr, port),
            WireAddress::Ipv6 { addr, port } => write!(f, "[{}]:{}", addr, port),
            WireAddress::Domain { name, port } => {
                write!(f, "[{}]:{}", String::from_utf8_lossy(name), port)
            }
        }
    }
}

impl From<SocketAddr> for WireAddress {
    fn from(addr: SocketAddr) -> Self {
        WireAddress::from_socket_addr(addr).0
    }
}

/// Builds the IPv4-mapped IPv6 endpoint for `addr:port`.
pub fn mapped_endpoint(addr: Ipv4Addr, port: u16) -> SocketAddrV6 {
    SocketAddrV6::new(addr.to_ipv6_mapped(), port, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_decode_ipv4_is_mapped() {
        let wire = WireAddress::Ipv4 {
            addr: Ipv4Addr::new(10, 1, 2, 3),
            port: 8080,
        };
        let endpoint = wire.to_endpoint().unwrap();

        let octets = endpoint.ip().octets();
        assert_eq!(&octets[..10], &[0u8; 10]);
        assert_eq!(&octets[10..12], &[0xffu8, 0xff]);
        assert_eq!(&octets[12..], &[10u8, 1, 2, 3]);
        assert_eq!(endpoint.port(), 8080);
    }

    #[test]
    fn test_decode_domain_unsupported() {
        let wire = WireAddress::domain("example.com", 80).unwrap();
        assert!(matches!(
            wire.to_endpoint(),
            Err(NetError::UnsupportedVariant)
        ));
    }

    #[test]
    fn test_encode_ipv6_target_keeps_mapped_bytes() {
        let endpoint = mapped_endpoint(Ipv4Addr::new(192, 168, 0, 1), 53);
        let wire = WireAddress::from_endpoint(endpoint, Domain::IPV6).unwrap();

        assert_eq!(
            wire,
            WireAddress::Ipv6 {
                addr: Ipv4Addr::new(192, 168, 0, 1).to_ipv6_mapped(),
                port: 53,
            }
        );
    }

    #[test]
    fn test_encode_ipv4_target_with_native_ipv6() {
        let endpoint = SocketAddrV6::new(Ipv6Addr::LOCALHOST, 443, 0, 0);
        let wire = WireAddress::from_endpoint(endpoint, Domain::IPV4).unwrap();
        assert_eq!(wire.atype(), ATYPE_IPV6);
    }

    #[cfg(unix)]
    #[test]
    fn test_encode_non_ip_family() {
        let endpoint = mapped_endpoint(Ipv4Addr::LOCALHOST, 1080);
        assert!(matches!(
            WireAddress::from_endpoint(endpoint, Domain::UNIX),
            Err(NetError::FamilyMismatch)
        ));
    }

    #[test]
    fn test_from_socket_addr_lengths() {
        let (wire, len) = WireAddress::from_socket_addr("1.2.3.4:80".parse().unwrap());
        assert_eq!(wire.atype(), ATYPE_IPV4);
        assert_eq!(len, 7);

        let (wire, len) = WireAddress::from_socket_addr("[::ffff:1.2.3.4]:80".parse().unwrap());
        assert_eq!(
            wire,
            WireAddress::Ipv4 {
                addr: Ipv4Addr::new(1, 2, 3, 4),
                port: 80,
            }
        );
        assert_eq!(len, 7);

        let (wire, len) = WireAddress::from_socket_addr("[2001:db8::1]:80".parse().unwrap());
        assert_eq!(wire.atype(), ATYPE_IPV6);
        assert_eq!(len, 19);
    }

    #[test]
    fn test_to_socket_addr_by_family() {
        let v4 = WireAddress::Ipv4 {
            addr: Ipv4Addr::LOCALHOST,
            port: 1080,
        };
        assert_eq!(
            v4.to_socket_addr(Domain::IPV4).unwrap(),
            "127.0.0.1:1080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            v4.to_socket_addr(Domain::IPV6).unwrap(),
            "[::ffff:127.0.0.1]:1080".parse::<SocketAddr>().unwrap()
        );

        let v6 = WireAddress::Ipv6 {
            addr: Ipv6Addr::LOCALHOST,
            port: 1080,
        };
        assert!(matches!(
            v6.to_socket_addr(Domain::IPV4),
            Err(NetError::FamilyMismatch)
        ));

        let name = WireAddress::domain("localhost", 1080).unwrap();
        assert!(matches!(
            name.to_socket_addr(Domain::IPV6),
            Err(NetError::UnsupportedVariant)
        ));
    }

    #[test]
    fn test_display() {
        let v4 = WireAddress::Ipv4 {
            addr: Ipv4Addr::new(127, 0, 0, 1),
            port: 8080,
        };
        assert_eq!(v4.to_string(), "[127.0.0.1]:8080");

        let v6 = WireAddress::Ipv6 {
            addr: Ipv6Addr::LOCALHOST,
            port: 443,
        };
        assert_eq!(v6.to_string(), "[::1]:443");

        let name = WireAddress::domain("example.com", 80).unwrap();
        assert_eq!(name.to_string(), "[example.com]:80");
    }

    #[test]
    fn test_parse_ipv4_bytes() {
        let buf = [0x01, 127, 0, 0, 1, 0x04, 0x38, 0xAA];
        let (wire, consumed) = WireAddress::parse(&buf).unwrap();

        assert_eq!(consumed, 7);
        assert_eq!(
            wire,
            WireAddress::Ipv4 {
                addr: Ipv4Addr::LOCALHOST,
                port: 1080,
            }
        );
    }

    #[test]
    fn test_parse_domain_bytes() {
        let buf = b"\x03\x0bexample.com\x00\x50";
        let (wire, consumed) = WireAddress::parse(buf).unwrap();

        assert_eq!(consumed, 4 + 11);
        assert_eq!(wire, WireAddress::domain("example.com", 80).unwrap());
        assert_eq!(wire.encoded_len(), consumed);
    }

    #[test]
    fn test_parse_rejects_truncated_and_unknown() {
        assert!(matches!(
            WireAddress::parse(&[]),
            Err(NetError::AddressInvalid)
        ));
        assert!(matches!(
            WireAddress::parse(&[0x01, 127, 0, 0, 1, 0x04]),
            Err(NetError::AddressInvalid)
        ));
        assert!(matches!(
            WireAddress::parse(&[0x03, 0x05, b'a', b'b']),
            Err(NetError::AddressInvalid)
        ));
        assert!(matches!(
            WireAddress::parse(&[0x02, 0, 0]),
            Err(NetError::AddressTypeNotSupported(0x02))
        ));
    }

    #[test]
    fn test_write_to_layout() {
        let mut buf = BytesMut::new();
        WireAddress::Ipv6 {
            addr: Ipv6Addr::LOCALHOST,
            port: 443,
        }
        .write_to(&mut buf);

        assert_eq!(buf.len(), 19);
        assert_eq!(buf[0], ATYPE_IPV6);
        assert_eq!(buf[16], 1);
        assert_eq!(&buf[17..], &[0x01u8, 0xBB]);
    }

    #[test]
    fn test_domain_too_long() {
        let name = vec![b'a'; MAX_DOMAIN_LEN + 1];
        assert!(matches!(
            WireAddress::domain(name, 80),
            Err(NetError::AddressInvalid)
        ));
        assert!(WireAddress::domain(vec![b'a'; MAX_DOMAIN_LEN], 80).is_ok());
    }
}
