//! A thread-safe, ARENA based, ordered skiplist guarded by a single reader/writer lock.
//!
//! [`SkipList`] keeps its nodes in a generational slot arena and links them with
//! integer ids instead of raw pointers, so unlinking a node is a pure index rewrite.
//! Every structural mutation holds the exclusive lock for its whole duration, reads
//! share it, and iterators never hold it between steps.
//!
//! ## Example
//!
//! ```rust
//! use rwskl::SkipList;
//!
//! let list = SkipList::<i32, &str>::new().unwrap();
//! list.insert(2, "hello");
//! list.insert(0, "bar");
//! list.insert(-5, "foo");
//!
//! let keys: Vec<_> = list.iter().map(|ent| *ent.key()).collect();
//! assert_eq!(keys, [-5, 0, 2]);
//! assert_eq!(list.get(&0), Some("bar"));
//!
//! list.lazy_remove(&0);
//! assert_eq!(list.len(), 2);
//! assert_eq!(list.clean(), 1);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![deny(missing_docs)]
#![allow(clippy::type_complexity)]

mod arena;
mod node;

mod comparator;
pub use comparator::{Ascend, Comparator, Descend, FnComparator};

mod entry;
pub use entry::Entry;

mod error;
pub use error::Error;

mod level;

mod options;
pub use options::Options;

mod list;
pub use list::{Iter, SkipList};

/// The absolute ceiling of [`Options::max_level`].
///
/// Level sampling compares one `u64` draw against precomputed thresholds, so the
/// number of levels is bounded by the width of the draw.
pub const MAX_LEVEL_CEILING: usize = 64;

/// The default number of levels of a [`SkipList`].
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// The default promotion probability of a [`SkipList`].
pub const DEFAULT_PROBABILITY: f64 = 0.5;
