//! Service layer owning the quote collection.
//! - Defines the domain model and the `QuoteStore` contract.
//! - Provides the JSON-file-backed store implementation.
//! - Keeps not-found as an explicit absent result, never an error.

pub mod errors;
pub mod quotes;
pub mod runtime;
pub mod storage;
