//! Time-bounded clipboard exposure for copied secrets
//!
//! Copying a secret starts a countdown; when it runs out the clipboard is
//! overwritten with an empty string. A new copy before then replaces the
//! pending clear, so exactly one clear fires per exposure.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::credential::ItemId;
use crate::error::{Result, VaultError};
use crate::settings::Settings;

/// A shared system clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// What the clipboard currently holds, as far as the vault knows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureState {
    /// No secret of ours is on the clipboard
    Idle,
    /// A secret from `item_id` is on the clipboard until `expires_at`
    Exposed { item_id: ItemId, expires_at: Instant },
}

#[derive(Default)]
struct PendingClear {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

/// Owns the single pending clear timer for one client
pub struct ClipboardExposureController {
    clipboard: Arc<dyn Clipboard>,
    clear_after: Duration,
    pending: Arc<Mutex<PendingClear>>,
    state: Arc<watch::Sender<ExposureState>>,
}

impl ClipboardExposureController {
    /// Create a controller clearing after `clear_after`
    pub fn new(clipboard: Arc<dyn Clipboard>, clear_after: Duration) -> Self {
        let (state, _) = watch::channel(ExposureState::Idle);

        Self {
            clipboard,
            clear_after,
            pending: Arc::new(Mutex::new(PendingClear::default())),
            state: Arc::new(state),
        }
    }

    /// Create a controller using the configured exposure window
    pub fn from_settings(clipboard: Arc<dyn Clipboard>, settings: &Settings) -> Self {
        Self::new(clipboard, settings.clipboard_clear_after())
    }

    /// Current exposure state
    pub fn state(&self) -> ExposureState {
        *self.state.borrow()
    }

    /// Watch state transitions (e.g. to show "clipboard cleared")
    pub fn subscribe(&self) -> watch::Receiver<ExposureState> {
        self.state.subscribe()
    }

    /// Put `secret` on the clipboard and schedule its removal.
    ///
    /// Returns when the clear is due. If the write itself fails nothing
    /// changes: the previous exposure, if any, keeps its timer.
    pub async fn copy(&self, item_id: ItemId, secret: &str) -> Result<Instant> {
        let mut pending = self.pending.lock().await;

        self.clipboard.write_text(secret).await?;

        if let Some(previous) = pending.handle.take() {
            previous.abort();
            debug!("Superseded pending clipboard clear");
        }
        pending.generation += 1;
        let generation = pending.generation;

        let expires_at = Instant::now() + self.clear_after;
        self.state.send_replace(ExposureState::Exposed {
            item_id,
            expires_at,
        });

        pending.handle = Some(tokio::spawn(clear_at(
            expires_at,
            generation,
            self.clipboard.clone(),
            self.pending.clone(),
            self.state.clone(),
        )));

        info!(
            "Copied secret of item {} to clipboard, clearing in {}s",
            item_id,
            self.clear_after.as_secs()
        );
        Ok(expires_at)
    }
}

async fn clear_at(
    expires_at: Instant,
    generation: u64,
    clipboard: Arc<dyn Clipboard>,
    pending: Arc<Mutex<PendingClear>>,
    state: Arc<watch::Sender<ExposureState>>,
) {
    tokio::time::sleep_until(expires_at).await;

    let mut pending = pending.lock().await;
    if pending.generation != generation {
        return;
    }

    // Best effort: the environment may refuse non-interactive writes.
    if let Err(e) = clipboard.write_text("").await {
        warn!("Could not clear clipboard: {}", e);
    }

    pending.handle = None;
    state.send_replace(ExposureState::Idle);
    info!("Clipboard cleared");
}

/// In-process clipboard for headless use and tests
#[derive(Default)]
pub struct MemoryClipboard {
    inner: StdMutex<MemoryClipboardState>,
}

#[derive(Default)]
struct MemoryClipboardState {
    contents: String,
    clears: usize,
    blocked: bool,
}

impl MemoryClipboard {
    /// Current contents
    pub fn contents(&self) -> String {
        self.lock().contents.clone()
    }

    /// How many times the contents were overwritten with an empty string
    pub fn clear_count(&self) -> usize {
        self.lock().clears
    }

    /// Refuse all writes, like a browser outside a user gesture
    pub fn set_blocked(&self, blocked: bool) {
        self.lock().blocked = blocked;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryClipboardState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut inner = self.lock();
        if inner.blocked {
            return Err(VaultError::ClipboardError("clipboard write blocked".to_string()));
        }

        inner.contents = text.to_string();
        if text.is_empty() {
            inner.clears += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsManager;

    fn controller() -> (ClipboardExposureController, Arc<MemoryClipboard>) {
        let clipboard = Arc::new(MemoryClipboard::default());
        let controller =
            ClipboardExposureController::new(clipboard.clone(), Duration::from_secs(12));
        (controller, clipboard)
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_then_clear() {
        let (controller, clipboard) = controller();
        let item = ItemId::new();

        let started = Instant::now();
        let expires_at = controller.copy(item, "s3cret").await.unwrap();

        assert_eq!(expires_at, started + Duration::from_secs(12));
        assert_eq!(clipboard.contents(), "s3cret");
        assert_eq!(
            controller.state(),
            ExposureState::Exposed {
                item_id: item,
                expires_at
            }
        );

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(clipboard.contents(), "s3cret");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(clipboard.contents(), "");
        assert_eq!(clipboard.clear_count(), 1);
        assert_eq!(controller.state(), ExposureState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_copy_supersedes_first() {
        let (controller, clipboard) = controller();
        let item_a = ItemId::new();
        let item_b = ItemId::new();

        controller.copy(item_a, "first").await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        let expires_b = controller.copy(item_b, "second").await.unwrap();

        // item A's deadline passes without a clear
        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(clipboard.clear_count(), 0);
        assert_eq!(clipboard.contents(), "second");
        assert_eq!(
            controller.state(),
            ExposureState::Exposed {
                item_id: item_b,
                expires_at: expires_b
            }
        );

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(clipboard.clear_count(), 1);
        assert_eq!(controller.state(), ExposureState::Idle);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(clipboard.clear_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_clear_still_goes_idle() {
        let (controller, clipboard) = controller();

        controller.copy(ItemId::new(), "s3cret").await.unwrap();
        clipboard.set_blocked(true);

        tokio::time::sleep(Duration::from_secs(13)).await;
        assert_eq!(controller.state(), ExposureState::Idle);
        assert_eq!(clipboard.clear_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_copy_keeps_previous_exposure() {
        let (controller, clipboard) = controller();
        let item = ItemId::new();

        let expires_at = controller.copy(item, "first").await.unwrap();
        clipboard.set_blocked(true);
        let result = controller.copy(ItemId::new(), "second").await;
        assert!(matches!(result, Err(VaultError::ClipboardError(_))));
        clipboard.set_blocked(false);

        assert_eq!(
            controller.state(),
            ExposureState::Exposed {
                item_id: item,
                expires_at
            }
        );

        tokio::time::sleep(Duration::from_secs(13)).await;
        assert_eq!(clipboard.clear_count(), 1);
        assert_eq!(controller.state(), ExposureState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_comes_from_settings() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut settings = SettingsManager::new(temp_dir.path());
        settings.set_clipboard_clear_secs(20).await.unwrap();

        let clipboard = Arc::new(MemoryClipboard::default());
        let controller =
            ClipboardExposureController::from_settings(clipboard.clone(), settings.get());

        let started = Instant::now();
        let expires_at = controller.copy(ItemId::new(), "x").await.unwrap();
        assert_eq!(expires_at, started + Duration::from_secs(20));

        tokio::time::sleep(Duration::from_secs(13)).await;
        assert_eq!(clipboard.contents(), "x");

        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(clipboard.contents(), "");
        assert_eq!(clipboard.clear_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_sees_transitions() {
        let (controller, _clipboard) = controller();
        let mut updates = controller.subscribe();
        let item = ItemId::new();

        controller.copy(item, "s3cret").await.unwrap();
        updates.changed().await.unwrap();
        assert!(matches!(
            *updates.borrow_and_update(),
            ExposureState::Exposed { item_id, .. } if item_id == item
        ));

        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow(), ExposureState::Idle);
    }
}
