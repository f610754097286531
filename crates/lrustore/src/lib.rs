//! # lrustore
//!
//! Fixed-capacity, in-memory LRU store.
//!
//! ## Architecture
//! - **Key index**: AHash map from key to arena slot (O(1))
//! - **Recency list**: arena-backed doubly-linked list, head is most recently
//!   used, tail is evicted first (O(1))
//! - **Eviction**: each entry carries its key, so the tail entry can be
//!   dropped from the index without a reverse map
//!
//! Reads promote: [`LruStore::get`] moves the entry to the head just like
//! [`LruStore::update`] does. The store is single-threaded; wrap it in a lock
//! to share it.
//!
//! ```
//! use lrustore::LruStore;
//!
//! let mut store = LruStore::try_new(2)?;
//! store.update("a", 1);
//! store.update("b", 2);
//! assert_eq!(store.get("a"), Some(&1));
//!
//! store.update("c", 3); // evicts "b"
//! assert_eq!(store.get("b"), None);
//! # Ok::<(), lrustore::Error>(())
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod list;
mod stats;
mod store;

pub use config::{LruConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use list::Iter;
pub use stats::CacheStats;
pub use store::LruStore;
