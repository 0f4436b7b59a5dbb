//! Ctrl+C handling and cancellation scopes.
//!
//! The handler cancels a process-wide root token. Commands take a child of
//! that token and race their work against it; a second Ctrl+C exits at once.

use std::future::Future;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static ROOT: OnceLock<CancellationToken> = OnceLock::new();

#[derive(Debug)]
pub struct InterruptedError;

impl std::fmt::Display for InterruptedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interrupted")
    }
}

impl std::error::Error for InterruptedError {}

/// Installs the Ctrl+C handler.
pub fn init() -> Result<()> {
    ctrlc::set_handler(trigger_ctrl_c).context("Error setting Ctrl+C handler")
}

fn root() -> &'static CancellationToken {
    ROOT.get_or_init(CancellationToken::new)
}

/// Cancels the root scope, force-exiting on a second Ctrl+C.
pub fn trigger_ctrl_c() {
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        std::process::exit(130);
    }
    tracing::debug!("interrupt requested");
    root().cancel();
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// A token cancelled when the process is interrupted.
pub fn child_token() -> CancellationToken {
    root().child_token()
}

/// Runs `fut` unless `cancel` fires first. The future is dropped on cancel.
pub async fn cancellable<F, T>(cancel: &CancellationToken, fut: F) -> Result<T, InterruptedError>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(InterruptedError),
        out = fut => Ok(out),
    }
}
