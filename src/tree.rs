//! Implementation of insert-only splay trees, backed by an index tree
#![warn(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;
use compact_str::CompactString;
use core::cmp::Ordering;

use crate::util::Tree;

//-----------------------------------------------------------------------------------------------//

/// An insert-only splay tree of values, sorted by `Ord`.
///
/// Every insert attaches the value in comparison order and then splays it to the root, so
/// recently inserted values sit near the top of the tree. Values are never removed and equal
/// values are kept, so the tree behaves as a multiset.
#[derive(Clone)]
pub struct SplayTree<T>
where
    T: Ord,
{
    tree: Tree,
    value_slice: Vec<T>,
}

impl<T> SplayTree<T>
where
    T: Ord,
{
    /// Constructor
    pub fn new() -> SplayTree<T> {
        SplayTree {
            tree: Tree::new(),
            value_slice: Vec::new(),
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> SplayTree<T> {
        SplayTree {
            tree: Tree::with_capacity(capacity),
            value_slice: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of values in the `SplayTree`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any values in the `SplayTree`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all values from the `SplayTree`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.value_slice.truncate(0);
    }

    /// Reserves capacity for at least `additional` more values
    pub fn reserve(&mut self, additional: usize) {
        debug_assert_eq!(self.value_slice.len(), self.tree.count());

        self.tree.reserve(additional);
        self.value_slice.reserve(additional);
    }

    /// Insert a value.
    ///
    /// The value is placed in comparison order and splayed to the root. Values equal to one
    /// already present are kept alongside it rather than replacing it.
    pub fn insert(&mut self, value: T) {
        let leaf = self.tree.insert_k(&value, &self.value_slice);

        debug_assert_eq!(leaf, self.value_slice.len());
        self.value_slice.push(value);
    }

    /// Get the value at the root of the tree.
    ///
    /// The root is always the most recently inserted value. Returns `None` if the tree is empty.
    pub fn root(&self) -> Option<&T> {
        let leaf = self.tree.root();
        if !leaf == 0 {
            None
        } else {
            Some(&self.value_slice[leaf])
        }
    }
}

impl<T> Default for SplayTree<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for SplayTree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut tree = Self::with_capacity(iter.size_hint().0);
        for value in iter {
            tree.insert(value);
        }
        tree
    }
}

//-----------------------------------------------------------------------------------------------//

/// An insert-only splay tree of strings.
///
/// This is a specialised version of `SplayTree` that stores values as strings.
pub struct StringSplayTree {
    tree: Tree,
    value_slice: Vec<CompactString>,
}

impl StringSplayTree {
    /// Constructor
    pub fn new() -> StringSplayTree {
        StringSplayTree {
            tree: Tree::new(),
            value_slice: Vec::new(),
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> StringSplayTree {
        StringSplayTree {
            tree: Tree::with_capacity(capacity),
            value_slice: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of strings in the `StringSplayTree`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any strings in the `StringSplayTree`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all strings from the `StringSplayTree`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.value_slice.truncate(0);
    }

    /// Reserves capacity for at least `additional` more strings
    pub fn reserve(&mut self, additional: usize) {
        debug_assert_eq!(self.value_slice.len(), self.tree.count());

        self.tree.reserve(additional);
        self.value_slice.reserve(additional);
    }

    /// Insert a string.
    ///
    /// The string is placed in comparison order and splayed to the root. Strings equal to one
    /// already present are kept alongside it rather than replacing it.
    pub fn insert(&mut self, value: &str) {
        let leaf = self.tree.insert_s(value, &self.value_slice);

        debug_assert_eq!(leaf, self.value_slice.len());
        self.value_slice.push(CompactString::new(value));
    }

    /// Get the string at the root of the tree.
    ///
    /// The root is always the most recently inserted string. Returns `None` if the tree is empty.
    pub fn root(&self) -> Option<&str> {
        let leaf = self.tree.root();
        if !leaf == 0 {
            None
        } else {
            Some(&self.value_slice[leaf])
        }
    }
}

impl Default for StringSplayTree {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FromIterator<&'a str> for StringSplayTree {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut tree = Self::with_capacity(iter.size_hint().0);
        for value in iter {
            tree.insert(value);
        }
        tree
    }
}

//-----------------------------------------------------------------------------------------------//

/// An insert-only splay tree of values.
///
/// This version allows a custom sorting function to be used. The function is supplied once at
/// construction and held for the lifetime of the tree; inserting under a different ordering
/// would break the tree.
#[derive(Clone)]
pub struct SplayTreeBy<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    tree: Tree,
    value_slice: Vec<T>,
    compare: F,
}

impl<T, F> SplayTreeBy<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Constructor
    pub fn new(compare: F) -> SplayTreeBy<T, F> {
        SplayTreeBy {
            tree: Tree::new(),
            value_slice: Vec::new(),
            compare,
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize, compare: F) -> SplayTreeBy<T, F> {
        SplayTreeBy {
            tree: Tree::with_capacity(capacity),
            value_slice: Vec::with_capacity(capacity),
            compare,
        }
    }

    /// Get the number of values in the `SplayTreeBy`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any values in the `SplayTreeBy`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all values from the `SplayTreeBy`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.value_slice.truncate(0);
    }

    /// Reserves capacity for at least `additional` more values
    pub fn reserve(&mut self, additional: usize) {
        debug_assert_eq!(self.value_slice.len(), self.tree.count());

        self.tree.reserve(additional);
        self.value_slice.reserve(additional);
    }

    /// Insert a value.
    ///
    /// The value is placed in comparison order and splayed to the root. Values that compare
    /// equal to one already present are kept alongside it rather than replacing it.
    pub fn insert(&mut self, value: T) {
        let leaf = self
            .tree
            .insert_k_by(&value, &self.value_slice, &self.compare);

        debug_assert_eq!(leaf, self.value_slice.len());
        self.value_slice.push(value);
    }

    /// Get the value at the root of the tree.
    ///
    /// The root is always the most recently inserted value. Returns `None` if the tree is empty.
    pub fn root(&self) -> Option<&T> {
        let leaf = self.tree.root();
        if !leaf == 0 {
            None
        } else {
            Some(&self.value_slice[leaf])
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// An insert-only splay tree of strings.
///
/// This version allows a custom sorting function to be used. The function is supplied once at
/// construction and held for the lifetime of the tree; inserting under a different ordering
/// would break the tree.
pub struct StringSplayTreeBy<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    tree: Tree,
    value_slice: Vec<CompactString>,
    compare: F,
}

impl<F> StringSplayTreeBy<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    /// Constructor
    pub fn new(compare: F) -> StringSplayTreeBy<F> {
        StringSplayTreeBy {
            tree: Tree::new(),
            value_slice: Vec::new(),
            compare,
        }
    }

    /// Constructor
    pub fn with_capacity(capacity: usize, compare: F) -> StringSplayTreeBy<F> {
        StringSplayTreeBy {
            tree: Tree::with_capacity(capacity),
            value_slice: Vec::with_capacity(capacity),
            compare,
        }
    }

    /// Get the number of strings in the `StringSplayTreeBy`
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any strings in the `StringSplayTreeBy`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all strings from the `StringSplayTreeBy`
    pub fn clear(&mut self) {
        self.tree.clear();
        self.value_slice.truncate(0);
    }

    /// Reserves capacity for at least `additional` more strings
    pub fn reserve(&mut self, additional: usize) {
        debug_assert_eq!(self.value_slice.len(), self.tree.count());

        self.tree.reserve(additional);
        self.value_slice.reserve(additional);
    }

    /// Insert a string.
    ///
    /// The string is placed in comparison order and splayed to the root. Strings that compare
    /// equal to one already present are kept alongside it rather than replacing it.
    pub fn insert(&mut self, value: &str) {
        let leaf = self
            .tree
            .insert_s_by(value, &self.value_slice, &self.compare);

        debug_assert_eq!(leaf, self.value_slice.len());
        self.value_slice.push(CompactString::new(value));
    }

    /// Get the string at the root of the tree.
    ///
    /// The root is always the most recently inserted string. Returns `None` if the tree is empty.
    pub fn root(&self) -> Option<&str> {
        let leaf = self.tree.root();
        if !leaf == 0 {
            None
        } else {
            Some(&self.value_slice[leaf])
        }
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
// Collect the values of a tree in leaf order
fn in_order<T: Clone>(tree: &Tree, value_slice: &[T]) -> Vec<T> {
    let mut values = Vec::new();
    let mut leaf = tree.first();
    while !leaf != 0 {
        values.push(value_slice[leaf].clone());
        leaf = tree.next(leaf);
    }
    values
}

#[test]
// Inserting into an empty tree makes the value the root
fn test_tree_0() {
    let mut tree = SplayTree::new();

    debug_assert!(tree.is_empty());
    debug_assert_eq!(tree.root(), None);

    tree.insert(5);

    debug_assert_eq!(tree.root(), Some(&5));
    debug_assert_eq!(tree.count(), 1);
}

#[test]
// A second, smaller value reaches the root with a single rotation
fn test_tree_1() {
    let mut tree = SplayTree::new();

    tree.insert(5);
    tree.insert(3);

    let root = tree.tree.root();
    debug_assert_eq!(tree.value_slice[root], 3);
    debug_assert_eq!(tree.tree.left(root), !0);

    let right = tree.tree.right(root);
    debug_assert_eq!(tree.value_slice[right], 5);
    debug_assert_eq!(tree.tree.parent(right), root);
}

#[test]
// Strictly decreasing inserts leave a right-leaning chain
fn test_tree_2() {
    let mut tree = SplayTree::new();

    tree.insert(5);
    tree.insert(3);
    tree.insert(1);

    let root = tree.tree.root();
    debug_assert_eq!(tree.value_slice[root], 1);

    let right = tree.tree.right(root);
    debug_assert_eq!(tree.value_slice[right], 3);

    let right = tree.tree.right(right);
    debug_assert_eq!(tree.value_slice[right], 5);
}

#[test]
// An insert between two values ends with both as its children
fn test_tree_3() {
    let mut tree = SplayTree::new();

    tree.insert(5);
    tree.insert(1);
    tree.insert(3);

    let root = tree.tree.root();
    debug_assert_eq!(tree.value_slice[root], 3);
    debug_assert_eq!(tree.value_slice[tree.tree.left(root)], 1);
    debug_assert_eq!(tree.value_slice[tree.tree.right(root)], 5);
}

#[test]
// Duplicate values are kept, with the newest splayed to the root
fn test_tree_4() {
    let mut tree = SplayTree::new();

    tree.insert(5);
    tree.insert(5);

    debug_assert_eq!(tree.count(), 2);
    debug_assert_eq!(tree.root(), Some(&5));

    // The duplicate descends left of its equal, so after the splay the older value is the
    // right child of the new root
    let root = tree.tree.root();
    debug_assert_eq!(root, 1);
    debug_assert_eq!(tree.tree.right(root), 0);
    debug_assert_eq!(tree.tree.left(root), !0);
}

#[test]
// Values come back in sorted order whatever the insert order
fn test_tree_5() {
    use alloc::vec;

    let mut tree = SplayTree::new();

    for value in [5, 1, 9, 3, 7, 3] {
        tree.insert(value);
        debug_assert_eq!(tree.root(), Some(&value));
    }

    debug_assert_eq!(tree.count(), 6);
    debug_assert_eq!(
        in_order(&tree.tree, &tree.value_slice),
        vec![1, 3, 3, 5, 7, 9]
    );
}

#[test]
// Clearing empties the tree and it can be refilled
fn test_tree_6() {
    let mut tree = SplayTree::new();

    tree.insert(2);
    tree.insert(4);
    tree.clear();

    debug_assert!(tree.is_empty());
    debug_assert_eq!(tree.root(), None);

    tree.insert(8);
    debug_assert_eq!(tree.root(), Some(&8));
    debug_assert_eq!(tree.count(), 1);
}

#[test]
// A stress test of random inserts
fn test_tree_7() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(9876543210);

    let mut tree = SplayTree::new();
    for _ in 0..COUNT {
        let value = rng.random_range(0..usize::MAX);
        tree.insert(value);
        debug_assert_eq!(tree.root(), Some(&value));
    }

    debug_assert_eq!(tree.count(), COUNT);

    let values = in_order(&tree.tree, &tree.value_slice);
    debug_assert!(values.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
// A custom ordering reverses the leaf order
fn test_tree_by_0() {
    use alloc::vec;

    let mut tree = SplayTreeBy::new(|a: &i32, b: &i32| b.cmp(a));

    for value in [5, 1, 9, 3, 7] {
        tree.insert(value);
        debug_assert_eq!(tree.root(), Some(&value));
    }

    debug_assert_eq!(
        in_order(&tree.tree, &tree.value_slice),
        vec![9, 7, 5, 3, 1]
    );
}

#[test]
// A stress test of random inserts under a custom ordering
fn test_tree_by_1() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut tree = SplayTreeBy::new(|a: &usize, b: &usize| b.cmp(a));
    for _ in 0..COUNT {
        let value = rng.random_range(0..usize::MAX);
        tree.insert(value);
        debug_assert_eq!(tree.root(), Some(&value));
    }

    debug_assert_eq!(tree.count(), COUNT);

    let values = in_order(&tree.tree, &tree.value_slice);
    debug_assert!(values.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
// Strings sort lexicographically and the newest insert is the root
fn test_string_tree_0() {
    use alloc::vec;

    let mut tree = StringSplayTree::new();

    tree.insert("Five");
    tree.insert("One");
    tree.insert("Nine");

    debug_assert_eq!(tree.root(), Some("Nine"));
    debug_assert_eq!(tree.count(), 3);

    debug_assert_eq!(
        in_order(&tree.tree, &tree.value_slice),
        vec!["Five", "Nine", "One"]
    );
}

#[test]
// A case-insensitive ordering keeps differently-cased duplicates
fn test_string_tree_by_0() {
    use alloc::vec;

    let mut tree = StringSplayTreeBy::new(|a: &str, b: &str| {
        a.chars()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.chars().map(|c| c.to_ascii_lowercase()))
    });

    tree.insert("beta");
    tree.insert("Alpha");
    tree.insert("ALPHA");

    debug_assert_eq!(tree.root(), Some("ALPHA"));
    debug_assert_eq!(tree.count(), 3);

    debug_assert_eq!(
        in_order(&tree.tree, &tree.value_slice),
        vec!["ALPHA", "Alpha", "beta"]
    );
}
