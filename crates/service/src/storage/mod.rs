//! Storage backends for the quote collection
//!
//! The store contract lives in `crate::quotes`; this module holds the
//! concrete engines behind it.

pub mod json_quote_store;
