//! Server-side session state for the storefront.
//!
//! One map guarded by one mutex, last-write-wins. There is no cross-instance
//! synchronization; each session behaves like a single browser tab. When a
//! cart state directory is configured, each session's cart is snapshotted to
//! `<dir>/<session>.json` on every mutation and loaded back on first touch.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use shopfront_core::{CartStorage, CartStore, CompareList, FileCartStorage, WishlistStore};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Everything the storefront keeps per visitor.
#[derive(Debug, Default)]
pub struct SessionData {
    pub cart: CartStore,
    pub wishlist: WishlistStore,
    pub compare: CompareList,
}

#[derive(Clone)]
pub struct SessionStore {
    cart_state_dir: Option<PathBuf>,
    inner: Arc<Mutex<HashMap<Uuid, SessionData>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(cart_state_dir: Option<PathBuf>) -> Self {
        Self {
            cart_state_dir,
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn storage_for(&self, session_id: Uuid) -> Option<FileCartStorage> {
        self.cart_state_dir
            .as_ref()
            .map(|dir| FileCartStorage::new(dir.join(format!("{session_id}.json"))))
    }

    /// Creates a new session and returns its id.
    ///
    /// With a cart state directory configured the cart starts from whatever
    /// snapshot the fresh id resolves to, which is always empty in practice;
    /// the load path matters for [`Self::with_session`] after a restart.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let data = SessionData {
            cart: self
                .storage_for(id)
                .map_or_else(CartStore::new, |storage| {
                    CartStore::load_or_default(&storage)
                }),
            ..SessionData::default()
        };
        self.inner.lock().await.insert(id, data);
        id
    }

    /// Runs `f` against the session's state, persisting the cart afterwards.
    ///
    /// Returns `None` for an unknown session, unless a cart snapshot for the
    /// id exists on disk, in which case the session is revived from it. A
    /// failed snapshot write is logged and does not fail the request.
    pub async fn with_session<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut SessionData) -> R,
    ) -> Option<R> {
        let mut sessions = self.inner.lock().await;

        if !sessions.contains_key(&session_id) {
            let storage = self.storage_for(session_id)?;
            match storage.load() {
                Ok(Some(_)) => {
                    sessions.insert(
                        session_id,
                        SessionData {
                            cart: CartStore::load_or_default(&storage),
                            ..SessionData::default()
                        },
                    );
                }
                _ => return None,
            }
        }

        let data = sessions.get_mut(&session_id)?;
        let result = f(data);

        // The payload is serialized under the lock; the blocking file write
        // happens outside it, off the async threads.
        let pending = self
            .storage_for(session_id)
            .map(|storage| (storage, data.cart.snapshot()));
        drop(sessions);

        if let Some((mut storage, payload)) = pending {
            let write = match payload {
                Ok(payload) => {
                    tokio::task::spawn_blocking(move || storage.save(&payload))
                        .await
                        .unwrap_or_else(|e| Err(std::io::Error::other(e).into()))
                }
                Err(e) => Err(e),
            };
            if let Err(e) = write {
                tracing::warn!(session_id = %session_id, error = %e, "cart snapshot write failed");
            }
        }

        Some(result)
    }
}
