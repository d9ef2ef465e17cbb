use std::{path::PathBuf, sync::Arc};

use rand::seq::SliceRandom;
use tokio::{fs, sync::RwLock};

use crate::errors::StoreError;
use crate::quotes::{Quote, QuoteStore};

#[derive(Default, serde::Serialize, serde::Deserialize)]
struct State {
    #[serde(default)]
    next_id: u32,
    #[serde(default)]
    quotes: Vec<Quote>,
}

/// JSON file-backed quote store.
///
/// Persists the whole collection as a single JSON document and guards it
/// with an async RwLock. The write lock is held across the in-memory
/// mutation and the serialization snapshot, so mutations never interleave
/// on disk and concurrent creates never collide on an id.
#[derive(Clone)]
pub struct JsonQuoteStore {
    inner: Arc<RwLock<State>>,
    file_path: PathBuf,
}

impl JsonQuoteStore {
    /// Open the store from a path. Creates the file with an empty collection
    /// if missing; an unreadable document loads as empty rather than failing
    /// startup.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let mut state: State = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty = State::default();
                let data = serde_json::to_vec(&empty).map_err(StoreError::unavailable)?;
                fs::write(&file_path, data)
                    .await
                    .map_err(StoreError::unavailable)?;
                empty
            }
        };
        // The counter only moves forward, including across restarts of a
        // data file written before the counter existed.
        let max_id = state.quotes.iter().map(|q| q.id).max().unwrap_or(0);
        state.next_id = state.next_id.max(max_id + 1);
        tracing::debug!(path = %file_path.display(), loaded = state.quotes.len(), "quote store opened");

        Ok(Arc::new(Self {
            inner: Arc::new(RwLock::new(state)),
            file_path,
        }))
    }

    async fn save_locked(&self, state: &State) -> Result<(), StoreError> {
        let data = serde_json::to_vec(state).map_err(StoreError::unavailable)?;
        fs::write(&self.file_path, data)
            .await
            .map_err(StoreError::unavailable)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl QuoteStore for JsonQuoteStore {
    async fn list(&self) -> Result<Vec<Quote>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.quotes.clone())
    }

    async fn get(&self, id: u32) -> Result<Option<Quote>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.quotes.iter().find(|q| q.id == id).cloned())
    }

    async fn get_random(&self) -> Result<Option<Quote>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.quotes.choose(&mut rand::thread_rng()).cloned())
    }

    async fn create(&self, quote: String, author: String) -> Result<Quote, StoreError> {
        let mut state = self.inner.write().await;
        let rec = Quote { id: state.next_id, quote, author };
        state.next_id += 1;
        state.quotes.push(rec.clone());
        if let Err(e) = self.save_locked(&state).await {
            // keep memory and disk in step; the burned id is never reused
            state.quotes.pop();
            return Err(e);
        }
        Ok(rec)
    }

    async fn update(
        &self,
        id: u32,
        quote: String,
        author: String,
    ) -> Result<Option<Quote>, StoreError> {
        let mut state = self.inner.write().await;
        let idx = match state.quotes.iter().position(|q| q.id == id) {
            Some(idx) => idx,
            None => return Ok(None),
        };
        let previous = std::mem::replace(&mut state.quotes[idx], Quote { id, quote, author });
        if let Err(e) = self.save_locked(&state).await {
            state.quotes[idx] = previous;
            return Err(e);
        }
        Ok(Some(state.quotes[idx].clone()))
    }

    async fn delete(&self, id: u32) -> Result<bool, StoreError> {
        let mut state = self.inner.write().await;
        let idx = match state.quotes.iter().position(|q| q.id == id) {
            Some(idx) => idx,
            None => return Ok(false),
        };
        let removed = state.quotes.remove(idx);
        if let Err(e) = self.save_locked(&state).await {
            state.quotes.insert(idx, removed);
            return Err(e);
        }
        Ok(true)
    }
}
