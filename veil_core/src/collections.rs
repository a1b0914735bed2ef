//! High-performance collection aliases used across the engine.
//!
//! All simulation code should use these types instead of
//! `std::collections` directly so the backing implementations can be
//! swapped transparently.
//!
//! | Type | Use Case |
//! |------|----------|
//! | `FastHashMap` | Hot paths (tick loop registries) |
//! | `FastHashSet` | Membership checks |
//! | `SmallVec4` / `SmallVec8` | Small, stack-allocated vecs |
//! | `CompactString` | Short strings (ids, labels) |

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

// Re-export for convenience
pub use compact_str::CompactString;
pub use rustc_hash::{FxBuildHasher, FxHasher};
pub use smallvec;

/// Fast HashMap using FxHash (Rustc's internal hasher).
///
/// NOT cryptographically secure - don't use for untrusted input.
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Fast HashSet using FxHash.
pub type FastHashSet<T> = FxHashSet<T>;

/// Small vector that stores up to 4 elements on the stack
/// (location adjacency lists, etc.)
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// Small vector that stores up to 8 elements on the stack.
pub type SmallVec8<T> = SmallVec<[T; 8]>;
