use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// A stored quotation. `id` is assigned by the store at creation time,
/// stays stable for the entity's lifetime and is never reassigned to
/// another entity, even after deletion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub id: u32,
    pub quote: String,
    pub author: String,
}

/// Contract for the component owning the quote collection.
///
/// Operations may suspend on the backing medium and fail only with
/// `StoreError::Unavailable`. A missing id is an absent result (`None` or
/// `false`), never an error. Mutating operations on one store instance are
/// serialized relative to one another; reads observe the pre- or post-state
/// of any mutation, never a partially applied one.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Every stored quote, in insertion order.
    async fn list(&self) -> Result<Vec<Quote>, StoreError>;

    async fn get(&self, id: u32) -> Result<Option<Quote>, StoreError>;

    /// Uniformly random member of the current collection; `None` when empty.
    async fn get_random(&self) -> Result<Option<Quote>, StoreError>;

    /// Allocates a fresh id and appends. Field validation is the caller's job.
    async fn create(&self, quote: String, author: String) -> Result<Quote, StoreError>;

    /// Replaces `quote`/`author` in place and returns the updated record;
    /// `None` for an unknown id. Never creates an entity.
    async fn update(
        &self,
        id: u32,
        quote: String,
        author: String,
    ) -> Result<Option<Quote>, StoreError>;

    /// Returns whether a removal occurred; an unknown id is not an error.
    async fn delete(&self, id: u32) -> Result<bool, StoreError>;
}
