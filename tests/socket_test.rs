//! Socket and Wait Tests
//!
//! Covers:
//! - `create_socket` registration and dual-stack behavior
//! - `yield_or_wait` around connect readiness and DNS waits
//! - Timeout ceilings applied per call

#![cfg(unix)]

use socksnet::base::NetError;
use socksnet::config::MiscConfig;
use socksnet::dns::{Addrs, Name, Resolve, Resolving};
use socksnet::socket::{create_socket, Registration, SocketKind};
use socksnet::socks5::{EndpointResolver, WireAddress};
use socksnet::task::{yield_or_wait, YieldContext, YieldMode, YieldOutcome};

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Never answers.
struct StalledResolver;

impl Resolve for StalledResolver {
    fn resolve(&self, _name: Name) -> Resolving {
        Box::pin(std::future::pending::<Result<Addrs, NetError>>())
    }
}

#[tokio::test]
async fn test_connect_through_mapped_endpoint() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let endpoint = EndpointResolver::system()
        .resolve("127.0.0.1", port)
        .await
        .unwrap();

    let socket = create_socket(SocketKind::Stream).unwrap();
    assert_eq!(socket.registration(), Registration::Added);

    match socket.socket().connect(&SocketAddr::V6(endpoint).into()) {
        Ok(()) => {}
        Err(e) if e.raw_os_error() == Some(libc::EINPROGRESS) => {}
        Err(e) => panic!("connect failed: {e}"),
    }

    let cx = YieldContext::with_timeout(Duration::from_secs(5));
    let outcome = yield_or_wait(&cx, YieldMode::WaitIo(socket.writable()))
        .await
        .unwrap();
    assert!(matches!(outcome, YieldOutcome::Ready(Ok(()))));

    let (_, client) = listener.accept().await.unwrap();
    assert!(socket.socket().take_error().unwrap().is_none());

    // The peer sees a plain IPv4 client; our side reports it IPv4-mapped
    assert!(client.is_ipv4());
    let local = socket.socket().local_addr().unwrap().as_socket().unwrap();
    let (wire, consumed) = WireAddress::from_socket_addr(local);
    assert_eq!(consumed, 7);
    assert_eq!(wire.port(), client.port());
}

#[tokio::test(start_paused = true)]
async fn test_stalled_dns_times_out() {
    let config = MiscConfig::new().io_timeout_secs(10);
    let cx = config.yield_context();
    let resolver = EndpointResolver::new(StalledResolver);

    let result = yield_or_wait(&cx, YieldMode::WaitIo(resolver.resolve("slow.example", 80))).await;

    assert!(matches!(result, Err(NetError::ConnectionTimedOut)));
}

#[tokio::test(start_paused = true)]
async fn test_ceiling_reapplied_per_call() {
    let cx = YieldContext::with_timeout(Duration::from_secs(10));

    // Two waits of 6s each both fit under a 10s ceiling
    for _ in 0..2 {
        let outcome = yield_or_wait(
            &cx,
            YieldMode::WaitIo(tokio::time::sleep(Duration::from_secs(6))),
        )
        .await
        .unwrap();
        assert_eq!(outcome, YieldOutcome::Ready(()));
    }
    assert_eq!(cx.timeout(), Some(Duration::from_secs(10)));
}

#[tokio::test]
async fn test_immediate_yield_lets_others_run() {
    let cx = YieldContext::unbounded();
    let handle = tokio::spawn(async { 42 });

    while !handle.is_finished() {
        yield_or_wait(&cx, YieldMode::immediate()).await.unwrap();
    }
    assert_eq!(handle.await.unwrap(), 42);
}

#[tokio::test]
async fn test_into_socket_deregisters() {
    let socket = create_socket(SocketKind::Datagram).unwrap();
    let raw = std::os::fd::AsRawFd::as_raw_fd(&socket);

    let inner = socket.into_socket();
    assert_eq!(std::os::fd::AsRawFd::as_raw_fd(&inner), raw);
}
