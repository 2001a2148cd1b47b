//! Client-side state stores.
//!
//! Each store keeps a local mirror of server-held data with a `loading` flag
//! and a user-facing `error` message, and talks to the server through a
//! backend trait that [`ApiClient`](crate::ApiClient) implements.
//!
//! Loads are tagged with an increasing request id. A response that is not the
//! latest one issued is dropped, and `loading` clears only when the latest
//! request finishes. A local mutation supersedes any load still in flight.

mod backend;
mod cart;
mod orders;
mod profile;
mod wishlist;

pub use backend::{CartBackend, OrderBackend, ProfileBackend, WishlistBackend};
pub use cart::CartStore;
pub use orders::{Confirmation, OrderAction, OrderBoard, PendingAction};
pub use profile::ProfileStore;
pub use wishlist::WishlistStore;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::debug;

/// A copy of a store's state at one moment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

/// State cell shared by the stores.
#[derive(Debug, Default)]
pub(crate) struct Mirror<T> {
    state: RwLock<Snapshot<T>>,
    latest: AtomicU64,
}

impl<T: Clone + Default> Mirror<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(Snapshot::default()),
            latest: AtomicU64::new(0),
        }
    }

    /// Start a load: issue a request id and raise `loading`.
    pub(crate) async fn begin(&self) -> u64 {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write().await;
        state.loading = true;
        state.error = None;
        id
    }

    /// Finish load `id`. Returns `false` (and changes nothing) if a newer
    /// request has been issued since.
    pub(crate) async fn finish(&self, id: u64, result: Result<T, String>) -> bool {
        let mut state = self.state.write().await;
        if self.latest.load(Ordering::SeqCst) != id {
            debug!(request_id = id, "discarding stale response");
            return false;
        }
        state.loading = false;
        match result {
            Ok(data) => state.data = data,
            Err(message) => state.error = Some(message),
        }
        true
    }

    /// Apply a local change confirmed by the server. Any load in flight is
    /// superseded.
    pub(crate) async fn apply(&self, f: impl FnOnce(&mut T) + Send) {
        let mut state = self.state.write().await;
        self.latest.fetch_add(1, Ordering::SeqCst);
        state.loading = false;
        f(&mut state.data);
    }

    pub(crate) async fn set_error(&self, message: impl Into<String>) {
        self.state.write().await.error = Some(message.into());
    }

    pub(crate) async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    pub(crate) async fn read<R>(&self, f: impl FnOnce(&T) -> R + Send) -> R {
        f(&self.state.read().await.data)
    }

    pub(crate) async fn snapshot(&self) -> Snapshot<T> {
        self.state.read().await.clone()
    }
}
