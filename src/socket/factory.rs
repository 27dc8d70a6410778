//! Dual-stack socket creation with readiness registration.
//!
//! Every socket is IPv6 with `IPV6_V6ONLY` cleared, so IPv4 peers are
//! reached through IPv4-mapped endpoints. Creation registers the descriptor
//! for read and write readiness with the current runtime.

use crate::base::{context::IoResultExt, neterror::NetError};
use socket2::{Domain, Socket, Type};
use std::{
    io,
    os::fd::{AsRawFd, RawFd},
    panic::{self, AssertUnwindSafe},
};
use tokio::io::{unix::AsyncFd, Interest};

/// Transport of a created socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    Stream,
    Datagram,
}

impl SocketKind {
    fn socket_type(self) -> Type {
        match self {
            SocketKind::Stream => Type::STREAM,
            SocketKind::Datagram => Type::DGRAM,
        }
    }
}

/// How the descriptor ended up in the runtime's readiness set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Registered with the runtime's I/O driver.
    Added,
    /// No reactor would take the descriptor; readiness waits only yield.
    Detached,
}

#[derive(Debug)]
enum SocketIo {
    Registered(AsyncFd<Socket>),
    Detached(Socket),
}

/// A non-blocking dual-stack socket owned by one session task.
#[derive(Debug)]
pub struct DualStackSocket {
    io: SocketIo,
    registration: Registration,
}

impl DualStackSocket {
    pub fn registration(&self) -> Registration {
        self.registration
    }

    pub fn socket(&self) -> &Socket {
        match &self.io {
            SocketIo::Registered(fd) => fd.get_ref(),
            SocketIo::Detached(socket) => socket,
        }
    }

    /// Waits until the socket is readable.
    ///
    /// Detached sockets yield once and report ready; the next non-blocking
    /// call tells the caller whether it really was.
    pub async fn readable(&self) -> io::Result<()> {
        match &self.io {
            SocketIo::Registered(fd) => {
                let _guard = fd.readable().await?;
            }
            SocketIo::Detached(_) => tokio::task::yield_now().await,
        }
        Ok(())
    }

    /// Waits until the socket is writable, e.g. a non-blocking connect finished.
    pub async fn writable(&self) -> io::Result<()> {
        match &self.io {
            SocketIo::Registered(fd) => {
                let _guard = fd.writable().await?;
            }
            SocketIo::Detached(_) => tokio::task::yield_now().await,
        }
        Ok(())
    }

    /// Deregisters the descriptor and hands back the socket.
    pub fn into_socket(self) -> Socket {
        match self.io {
            SocketIo::Registered(fd) => fd.into_inner(),
            SocketIo::Detached(socket) => socket,
        }
    }
}

impl AsRawFd for DualStackSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.socket().as_raw_fd()
    }
}

/// Creates a dual-stack socket of `kind` and registers it for read and
/// write readiness.
///
/// Only creation failures are errors. When the current task has no usable
/// reactor (no runtime, or a runtime built without I/O) or registration is
/// refused, the socket comes back [`Registration::Detached`].
pub fn create_socket(kind: SocketKind) -> Result<DualStackSocket, NetError> {
    let socket = Socket::new(Domain::IPV6, kind.socket_type(), None).socket_context()?;
    socket.set_only_v6(false).socket_context()?;
    socket.set_nonblocking(true).socket_context()?;

    Ok(register(socket))
}

fn detached(socket: Socket) -> DualStackSocket {
    DualStackSocket {
        io: SocketIo::Detached(socket),
        registration: Registration::Detached,
    }
}

fn register(socket: Socket) -> DualStackSocket {
    let fd = socket.as_raw_fd();

    if tokio::runtime::Handle::try_current().is_err() {
        tracing::debug!(fd, "no runtime, socket left unregistered");
        return detached(socket);
    }

    // AsyncFd panics when the runtime has I/O disabled and drops what it was
    // given, so the attempt is made on a duplicate of the descriptor.
    let attempt = match socket.try_clone() {
        Ok(dup) => dup,
        Err(error) => {
            tracing::debug!(fd, error = %error, "descriptor dup failed, socket left unregistered");
            return detached(socket);
        }
    };

    let interest = Interest::READABLE | Interest::WRITABLE;
    let result = panic::catch_unwind(AssertUnwindSafe(move || {
        AsyncFd::try_with_interest(attempt, interest)
    }));

    match result {
        Ok(Ok(io)) => {
            // The registered duplicate now owns the socket
            drop(socket);
            DualStackSocket {
                io: SocketIo::Registered(io),
                registration: Registration::Added,
            }
        }
        Ok(Err(e)) => {
            let (_, error) = e.into_parts();
            tracing::debug!(fd, error = %error, "readiness registration failed, socket left unregistered");
            detached(socket)
        }
        Err(_) => {
            tracing::debug!(fd, "runtime has no I/O driver, socket left unregistered");
            detached(socket)
        }
    }
}
