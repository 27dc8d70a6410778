use crate::base::neterror::NetError;
use std::{future::Future, time::Duration};

/// Per-session wait settings.
///
/// The timeout is a ceiling re-applied on every wait; waits never consume it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YieldContext {
    timeout: Option<Duration>,
}

impl YieldContext {
    /// `None` means waits have no deadline.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Some(timeout))
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }
}

/// What a suspension point waits for.
#[derive(Debug)]
pub enum YieldMode<F> {
    /// Give other tasks one turn.
    Immediate,
    /// Wait for `F`, typically socket readiness or a DNS lookup.
    WaitIo(F),
}

impl YieldMode<std::future::Ready<()>> {
    /// `Immediate` with the readiness type filled in.
    pub fn immediate() -> Self {
        YieldMode::Immediate
    }
}

/// How a successful suspension ended.
#[derive(Debug, PartialEq, Eq)]
pub enum YieldOutcome<T> {
    Yielded,
    Ready(T),
}

impl<T> YieldOutcome<T> {
    pub fn into_ready(self) -> Option<T> {
        match self {
            YieldOutcome::Ready(value) => Some(value),
            YieldOutcome::Yielded => None,
        }
    }
}

/// Suspends the current task according to `mode`.
///
/// `Immediate` yields once and never fails. `WaitIo` waits for the readiness
/// future, bounded by the context's timeout; when the deadline passes first
/// (or the timeout is zero) the wait ends with
/// [`NetError::ConnectionTimedOut`], which the session turns into teardown.
pub async fn yield_or_wait<F>(
    cx: &YieldContext,
    mode: YieldMode<F>,
) -> Result<YieldOutcome<F::Output>, NetError>
where
    F: Future,
{
    let ready = match mode {
        YieldMode::Immediate => {
            tokio::task::yield_now().await;
            return Ok(YieldOutcome::Yielded);
        }
        YieldMode::WaitIo(ready) => ready,
    };

    let Some(limit) = cx.timeout else {
        return Ok(YieldOutcome::Ready(ready.await));
    };

    if limit.is_zero() {
        tracing::info!(timeout = ?limit, "io timeout");
        return Err(NetError::ConnectionTimedOut);
    }

    match tokio::time::timeout(limit, ready).await {
        Ok(value) => Ok(YieldOutcome::Ready(value)),
        Err(_) => {
            tracing::info!(timeout = ?limit, "io timeout");
            Err(NetError::ConnectionTimedOut)
        }
    }
}
