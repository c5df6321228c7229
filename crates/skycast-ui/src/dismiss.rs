//! Cancellable auto-dismiss for error banners.
//!
//! At most one clear is pending. Scheduling a new one, or calling `cancel`,
//! cancels whatever was pending before.

use std::sync::mpsc::Sender;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::services::WeatherServiceMessage;
use crate::state::BannerId;

#[derive(Debug, Default)]
pub struct DismissTimer {
    pending: Option<CancellationToken>,
}

impl DismissTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `ErrorExpired(banner)` on `tx` after `after`, unless cancelled first.
    pub fn schedule(
        &mut self,
        runtime: &Handle,
        tx: &Sender<WeatherServiceMessage>,
        banner: BannerId,
        after: Duration,
    ) {
        self.cancel();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = tx.clone();

        runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    tracing::trace!("Dismiss for {:?} cancelled", banner);
                }
                _ = tokio::time::sleep(after) => {
                    let _ = tx.send(WeatherServiceMessage::ErrorExpired(banner));
                }
            }
        });

        self.pending = Some(token);
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
