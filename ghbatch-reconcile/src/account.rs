//! Switching the active account.
//!
//! The host's authentication state lags behind a switch by a few seconds.
//! Instead of a blind fixed sleep, [`activate`] polls the active account with
//! exponential backoff until it matches or the timeout is spent.

use std::time::Duration;

use ghbatch_core::{Account, BackoffSettings};
use ghbatch_exec::RemoteHost;

use crate::error::ReconcileError;

/// Smallest poll delay, so a zero `initial` still makes progress.
const MIN_STEP: Duration = Duration::from_millis(1);

/// Blocking delay seam.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Switch to `account` and wait until the host reports it as active.
///
/// Returns the total time spent waiting.
pub fn activate(
    host: &dyn RemoteHost,
    sleeper: &dyn Sleeper,
    account: &Account,
    backoff: &BackoffSettings,
) -> Result<Duration, ReconcileError> {
    host.switch_account(account)?;

    let mut waited = Duration::ZERO;
    let mut delay = backoff.initial.max(MIN_STEP);
    loop {
        match host.active_account() {
            Ok(Some(active)) if &active == account => {
                tracing::debug!(account = %account, ?waited, "account active");
                return Ok(waited);
            }
            Ok(active) => {
                tracing::debug!(account = %account, ?active, "account not active yet");
            }
            Err(err) => {
                tracing::debug!(account = %account, error = %err, "active account query failed");
            }
        }

        if waited >= backoff.timeout {
            return Err(ReconcileError::AccountNotActive {
                account: account.clone(),
                waited,
            });
        }
        let step = delay.min(backoff.timeout - waited);
        sleeper.sleep(step);
        waited += step;
        delay = (delay * 2).min(backoff.max.max(MIN_STEP));
    }
}
