//! # recencylist
//!
//! Doubly-linked recency list with O(1) positional operations.
//!
//! ## Architecture
//! - **Arena**: nodes stored in a slot vector, linked by index
//! - **Handles**: `(list id, slot, generation)` triples, checked on every use
//! - **Ends**: front is most recently used, back is least recently used
//!
//! Handle misuse (detached, foreign, or stale handles) is reported through
//! [`Error`] by the `try_*` operations and panics in the plain ones.

#![warn(missing_docs)]

mod error;
mod list;

pub use error::{Error, Result};
pub use list::{ItemHandle, Iter, RecencyList};
