//! ## Introduction
//!
//! This crate implements insert-only collections based on splay trees. Splay trees are
//! self-adjusting binary search trees: every inserted value is rotated to the root of the tree,
//! so a sequence of inserts keeps recently touched values near the top and runs in amortised
//! logarithmic time per insert.
//!
//! The trees in this crate are deliberately minimal. There is no removal, no lookup and no
//! iteration surface; a tree only grows, and the one observable value is the root, which is
//! always the most recently inserted value. Equal values are kept rather than replaced, so the
//! trees behave as multisets.
//!
//! ## Benefits
//!
//! - Values are sorted into ascending order within the tree by comparing them pairwise, so they
//!   do not need to be hashable.
//! - Values do not need to implement `Clone` or `Copy`. Values that support `Ord` can use
//!   `SplayTree`, but if not a custom comparison function can be supplied using `SplayTreeBy` or
//!   `StringSplayTreeBy`. The function is fixed at construction and used for every comparison
//!   over the life of the tree.
//! - The crate is small and `#![no_std]`.
//! - Copying and moving of values is minimised. Values are stored in a single array, separate
//!   from the structure of the tree, and do not move as the tree reconfigures around them.
//!
//! ## Contents
//!
//! <center>
//!
//! | Type                | Stores        | Sorts By |
//! |:--------------------|:--------------|:---------|
//! | `SplayTree`         | Value         | Ord      |
//! | `StringSplayTree`   | String        | Ord      |
//! | `SplayTreeBy`       | Value         | Function |
//! | `StringSplayTreeBy` | String        | Function |
//!
//! </center>
//!
//! The crate exposes an additional type `util::Tree` that provides the foundation of the other
//! types. This can be thought of as a utility that manages a set of `usize` indices into an
//! external vector of data, without storing the vector itself. It is provided to support
//! development of additional collection types.

#![no_std]
#![warn(missing_docs)]

mod tree;
pub mod util;

pub use tree::*;
