//! Utility types to support insert-only splay trees

#![warn(missing_docs)]

extern crate alloc;
use alloc::vec::Vec;

use core::{cmp::Ordering, fmt::Display, ops::Deref};

//-----------------------------------------------------------------------------------------------//

// A leaf in a splay tree
//
// Leaves hold structure only. The value associated with a leaf is stored at the same index in an
// external slice owned by the calling collection. The `!0` index denotes an absent link.
#[derive(Clone)]
struct Leaf {
    parent: usize,
    left: usize,
    right: usize,
}

//-----------------------------------------------------------------------------------------------//

/// A tree of integer leaves
///
/// The tree manages a set of `usize` indices into an external vector of values, without storing
/// the vector itself. Each call to one of the `insert` methods allocates the next ascending leaf
/// index, attaches it in comparison order and splays it to the root, so the most recently
/// inserted leaf is always the root. The tree is insert-only: leaves are never removed, and
/// `count` equals the number of inserts performed.
#[derive(Clone)]
pub struct Tree {
    leaf: Vec<Leaf>,
    root: usize,
    count: usize,
}

impl Tree {
    /// Construct an empty tree
    pub fn new() -> Tree {
        Tree {
            leaf: Vec::new(),
            root: !0,
            count: 0,
        }
    }

    /// Construct an empty tree, pre-allocating a given capacity
    pub fn with_capacity(capacity: usize) -> Tree {
        Tree {
            leaf: Vec::with_capacity(capacity),
            root: !0,
            count: 0,
        }
    }

    /// Get the number of leaves in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check if the tree has any leaves
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Remove all leaves from the tree
    pub fn clear(&mut self) {
        self.leaf.truncate(0);
        self.root = !0;
        self.count = 0;
    }

    /// Reserves capacity for at least `additional` more leaves
    pub fn reserve(&mut self, additional: usize) {
        self.leaf.reserve(additional);
    }

    /// Get the root leaf of the tree, or `usize::MAX` if the tree is empty
    #[inline]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Get the parent of a leaf, or `usize::MAX` if the leaf is the root
    #[inline]
    pub fn parent(&self, leaf: usize) -> usize {
        self.leaf[leaf].parent
    }

    /// Get the left child of a leaf, or `usize::MAX` if there is none
    #[inline]
    pub fn left(&self, leaf: usize) -> usize {
        self.leaf[leaf].left
    }

    /// Get the right child of a leaf, or `usize::MAX` if there is none
    #[inline]
    pub fn right(&self, leaf: usize) -> usize {
        self.leaf[leaf].right
    }

    /// Insert a leaf by key
    ///
    /// The new leaf is attached in comparison order, splayed to the root and returned. Equal keys
    /// are not rejected or replaced: a duplicate descends to the left of its equal, so the tree
    /// behaves as a multiset. If the slice of keys is not sorted properly according to the binary
    /// tree, then the results are undefined.
    pub fn insert_k<K: Ord>(&mut self, key: &K, key_slice: &[K]) -> usize {
        let leaf = match locate_k(&self.leaf, self.root, key, key_slice) {
            Location::Root => {
                let leaf = self.alloc(!0);
                self.root = leaf;
                leaf
            }
            Location::Left(parent) => {
                let leaf = self.alloc(parent);
                self.leaf[parent].left = leaf;
                leaf
            }
            Location::Right(parent) => {
                let leaf = self.alloc(parent);
                self.leaf[parent].right = leaf;
                leaf
            }
        };

        self.root = splay(&mut self.leaf, self.root, leaf);
        debug_assert_eq!(self.root, leaf);
        leaf
    }

    /// Insert a leaf by string
    ///
    /// The new leaf is attached in comparison order, splayed to the root and returned. Equal
    /// strings are not rejected or replaced: a duplicate descends to the left of its equal, so
    /// the tree behaves as a multiset. If the slice of strings is not sorted properly according
    /// to the binary tree, then the results are undefined.
    pub fn insert_s<S: Deref<Target = str>>(&mut self, key: &str, key_slice: &[S]) -> usize {
        let leaf = match locate_s(&self.leaf, self.root, key, key_slice) {
            Location::Root => {
                let leaf = self.alloc(!0);
                self.root = leaf;
                leaf
            }
            Location::Left(parent) => {
                let leaf = self.alloc(parent);
                self.leaf[parent].left = leaf;
                leaf
            }
            Location::Right(parent) => {
                let leaf = self.alloc(parent);
                self.leaf[parent].right = leaf;
                leaf
            }
        };

        self.root = splay(&mut self.leaf, self.root, leaf);
        debug_assert_eq!(self.root, leaf);
        leaf
    }

    /// Insert a leaf by key, using a custom comparison function
    ///
    /// The new leaf is attached in comparison order, splayed to the root and returned. Keys that
    /// compare equal are not rejected or replaced: a duplicate descends to the left of its equal,
    /// so the tree behaves as a multiset. The comparison function must be a pure, consistent
    /// ordering and must be the same function for every insert into the tree; otherwise the
    /// results are undefined.
    pub fn insert_k_by<K, F>(&mut self, key: &K, key_slice: &[K], compare: F) -> usize
    where
        F: Fn(&K, &K) -> Ordering,
    {
        let leaf = match locate_k_by(&self.leaf, self.root, key, key_slice, compare) {
            Location::Root => {
                let leaf = self.alloc(!0);
                self.root = leaf;
                leaf
            }
            Location::Left(parent) => {
                let leaf = self.alloc(parent);
                self.leaf[parent].left = leaf;
                leaf
            }
            Location::Right(parent) => {
                let leaf = self.alloc(parent);
                self.leaf[parent].right = leaf;
                leaf
            }
        };

        self.root = splay(&mut self.leaf, self.root, leaf);
        debug_assert_eq!(self.root, leaf);
        leaf
    }

    /// Insert a leaf by string, using a custom comparison function
    ///
    /// The new leaf is attached in comparison order, splayed to the root and returned. Strings
    /// that compare equal are not rejected or replaced: a duplicate descends to the left of its
    /// equal, so the tree behaves as a multiset. The comparison function must be a pure,
    /// consistent ordering and must be the same function for every insert into the tree;
    /// otherwise the results are undefined.
    pub fn insert_s_by<S: Deref<Target = str>, F>(
        &mut self,
        key: &str,
        key_slice: &[S],
        compare: F,
    ) -> usize
    where
        F: Fn(&str, &str) -> Ordering,
    {
        let leaf = match locate_s_by(&self.leaf, self.root, key, key_slice, compare) {
            Location::Root => {
                let leaf = self.alloc(!0);
                self.root = leaf;
                leaf
            }
            Location::Left(parent) => {
                let leaf = self.alloc(parent);
                self.leaf[parent].left = leaf;
                leaf
            }
            Location::Right(parent) => {
                let leaf = self.alloc(parent);
                self.leaf[parent].right = leaf;
                leaf
            }
        };

        self.root = splay(&mut self.leaf, self.root, leaf);
        debug_assert_eq!(self.root, leaf);
        leaf
    }

    // Allocate and initialise a new leaf
    //
    // The leaf is pushed before any link in the tree is rewritten, so an allocation failure
    // cannot leave the tree partially attached.
    fn alloc(&mut self, parent: usize) -> usize {
        self.count += 1;

        let leaf = self.leaf.len();
        self.leaf.push(Leaf {
            parent,
            left: !0,
            right: !0,
        });

        leaf
    }

    // Get the first leaf in the tree (the left-most)
    #[inline]
    pub(crate) fn first(&self) -> usize {
        first(&self.leaf, self.root)
    }

    // Get the logical successor to a leaf
    #[inline]
    pub(crate) fn next(&self, leaf: usize) -> usize {
        next(&self.leaf, leaf)
    }

    // Debug tests
    #[cfg(any(debug_assertions, test))]
    #[allow(dead_code)]
    fn check(&self) {
        check_tree(&self.leaf, self.root);
        debug_assert_eq!(check_count(&self.leaf, self.root), self.count);
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        let mut leaf = self.first();
        while !leaf != 0 {
            write!(f, "{leaf} ")?;
            leaf = self.next(leaf);
        }
        write!(f, "]")?;
        Ok(())
    }
}

//-----------------------------------------------------------------------------------------------//

// IMPLEMENTATION NOTE
//
// The functions below are low level. They are not 'unsafe' in the Rust sense, but they implement
// very low level operations. Use with caution.

enum Location {
    Root,
    Left(usize),
    Right(usize),
}

// Locate the attachment point for a new key
//
// Walks down from the root, going right when the new key is strictly greater than the visited
// key and left otherwise. Equal keys therefore always descend left, which places a duplicate
// immediately before its equal in leaf order.
fn locate_k<K: Ord>(leaf: &[Leaf], mut x: usize, key: &K, key_slice: &[K]) -> Location {
    // `x` should be a root
    debug_assert!(!x == 0 || leaf[x].parent == !0);

    // First leaf is a special case
    if !x == 0 {
        return Location::Root;
    }

    loop {
        match key.cmp(&key_slice[x]) {
            Ordering::Greater => {
                let y = leaf[x].right;
                if !y == 0 {
                    return Location::Right(x);
                }
                x = y;
            }
            Ordering::Less | Ordering::Equal => {
                let y = leaf[x].left;
                if !y == 0 {
                    return Location::Left(x);
                }
                x = y;
            }
        }
    }
}

// Locate the attachment point for a new string
fn locate_s<S: Deref<Target = str>>(
    leaf: &[Leaf],
    mut x: usize,
    key: &str,
    key_slice: &[S],
) -> Location {
    // `x` should be a root
    debug_assert!(!x == 0 || leaf[x].parent == !0);

    // First leaf is a special case
    if !x == 0 {
        return Location::Root;
    }

    loop {
        match key.cmp(&key_slice[x]) {
            Ordering::Greater => {
                let y = leaf[x].right;
                if !y == 0 {
                    return Location::Right(x);
                }
                x = y;
            }
            Ordering::Less | Ordering::Equal => {
                let y = leaf[x].left;
                if !y == 0 {
                    return Location::Left(x);
                }
                x = y;
            }
        }
    }
}

// Locate the attachment point for a new key, using a custom comparison function
fn locate_k_by<K, F>(leaf: &[Leaf], mut x: usize, key: &K, key_slice: &[K], compare: F) -> Location
where
    F: Fn(&K, &K) -> Ordering,
{
    // `x` should be a root
    debug_assert!(!x == 0 || leaf[x].parent == !0);

    // First leaf is a special case
    if !x == 0 {
        return Location::Root;
    }

    loop {
        match compare(key, &key_slice[x]) {
            Ordering::Greater => {
                let y = leaf[x].right;
                if !y == 0 {
                    return Location::Right(x);
                }
                x = y;
            }
            Ordering::Less | Ordering::Equal => {
                let y = leaf[x].left;
                if !y == 0 {
                    return Location::Left(x);
                }
                x = y;
            }
        }
    }
}

// Locate the attachment point for a new string, using a custom comparison function
fn locate_s_by<S: Deref<Target = str>, F>(
    leaf: &[Leaf],
    mut x: usize,
    key: &str,
    key_slice: &[S],
    compare: F,
) -> Location
where
    F: Fn(&str, &str) -> Ordering,
{
    // `x` should be a root
    debug_assert!(!x == 0 || leaf[x].parent == !0);

    // First leaf is a special case
    if !x == 0 {
        return Location::Root;
    }

    loop {
        match compare(key, &key_slice[x]) {
            Ordering::Greater => {
                let y = leaf[x].right;
                if !y == 0 {
                    return Location::Right(x);
                }
                x = y;
            }
            Ordering::Less | Ordering::Equal => {
                let y = leaf[x].left;
                if !y == 0 {
                    return Location::Left(x);
                }
                x = y;
            }
        }
    }
}

// Left-rotation ('zag') at `p`
//
// Promotes `x = leaf[p].right` into `p`'s structural position and makes `p` the left child of
// `x`, transferring `x`'s former left subtree to `p`'s right. Returns the root of the tree,
// which changes to `x` when `p` was the root. The rotation is total: when `p` has no right child
// it still executes and leaves `p` detached under an absent replacement. `splay` never rotates
// towards an absent child; the shape exists only because the rotation does not test its own
// precondition.
//
// Only the links of `p`, `x`, the transferred subtree root and `p`'s former parent are touched.
fn zag(leaf: &mut [Leaf], root: usize, p: usize) -> usize {
    let x = leaf[p].right;

    if !x != 0 {
        let b = leaf[x].left;
        leaf[p].right = b;
        if !b != 0 {
            leaf[b].parent = p;
        }
        leaf[x].parent = leaf[p].parent;
    }

    let g = leaf[p].parent;
    let root = if !g == 0 {
        x
    } else if leaf[g].left == p {
        leaf[g].left = x;
        root
    } else {
        debug_assert_eq!(leaf[g].right, p);
        leaf[g].right = x;
        root
    };

    if !x != 0 {
        leaf[x].left = p;
    }
    leaf[p].parent = x;

    root
}

// Right-rotation ('zig') at `p`
//
// The mirror of `zag`: promotes `x = leaf[p].left` and makes `p` the right child of `x`.
fn zig(leaf: &mut [Leaf], root: usize, p: usize) -> usize {
    let x = leaf[p].left;

    if !x != 0 {
        let b = leaf[x].right;
        leaf[p].left = b;
        if !b != 0 {
            leaf[b].parent = p;
        }
        leaf[x].parent = leaf[p].parent;
    }

    let g = leaf[p].parent;
    let root = if !g == 0 {
        x
    } else if leaf[g].left == p {
        leaf[g].left = x;
        root
    } else {
        debug_assert_eq!(leaf[g].right, p);
        leaf[g].right = x;
        root
    };

    if !x != 0 {
        leaf[x].right = p;
    }
    leaf[p].parent = x;

    root
}

// Splay a leaf to the root of a tree
//
// Repeatedly rotates `x` towards the root until it has no parent. Each iteration is classified
// by the sides of `x` and of its parent:
//
// - no grandparent: a single rotation at the parent finishes the splay,
// - `x` and its parent on the same side: rotate the grandparent, then the parent,
// - `x` and its parent on opposite sides: rotate the parent, then the grandparent.
//
// Each iteration decreases the depth of `x` by one or two, so the loop terminates. `x` must be
// reachable from `root`; splaying a leaf of a detached subtree would loop on a stale parent
// chain. Splaying the root itself is a no-op.
fn splay(leaf: &mut [Leaf], mut root: usize, x: usize) -> usize {
    debug_assert!(!x != 0);

    loop {
        let y = leaf[x].parent;
        if !y == 0 {
            return root;
        }

        let z = leaf[y].parent;

        if !z == 0 {
            // Zig or zag: `x` reaches the root with a single rotation
            root = if leaf[y].left == x {
                zig(leaf, root, y)
            } else {
                debug_assert_eq!(leaf[y].right, x);
                zag(leaf, root, y)
            };
        } else if leaf[y].left == x {
            if leaf[z].left == y {
                // Zig-zig: rotate the grandparent first, then the parent
                root = zig(leaf, root, z);
                root = zig(leaf, root, y);
            } else {
                // Zig-zag: rotate `x` above its parent, then above the grandparent
                debug_assert_eq!(leaf[z].right, y);
                root = zig(leaf, root, y);
                root = zag(leaf, root, z);
            }
        } else {
            debug_assert_eq!(leaf[y].right, x);
            if leaf[z].right == y {
                // Zag-zag
                root = zag(leaf, root, z);
                root = zag(leaf, root, y);
            } else {
                // Zag-zig
                debug_assert_eq!(leaf[z].left, y);
                root = zag(leaf, root, y);
                root = zig(leaf, root, z);
            }
        }
    }
}

// Get the first leaf (the left-most)
fn first(leaf: &[Leaf], mut x: usize) -> usize {
    // `x` should be a root
    debug_assert!(!x == 0 || leaf[x].parent == !0);

    if !x == 0 {
        return !0;
    }

    loop {
        let y = leaf[x].left;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the logical successor to a leaf
fn next(leaf: &[Leaf], mut x: usize) -> usize {
    let mut y = leaf[x].right;
    if !y != 0 {
        loop {
            let z = leaf[y].left;
            if !z == 0 {
                return y;
            }
            y = z;
        }
    }

    loop {
        let y = leaf[x].parent;
        if !y == 0 {
            return !0;
        }
        if leaf[y].left == x {
            return y;
        }
        debug_assert_eq!(leaf[y].right, x);
        x = y;
    }
}

//-----------------------------------------------------------------------------------------------//

// DEBUG : Check the tree structure
#[cfg(any(debug_assertions, test))]
fn check_tree(leaf: &[Leaf], root: usize) {
    // Check we are starting at the root
    debug_assert!(!root == 0 || leaf[root].parent == !0);

    // Iterate over leaves and check each one
    let mut x = first(leaf, root);

    while !x != 0 {
        let y = leaf[x].left;
        let z = leaf[x].right;

        if !y != 0 {
            debug_assert_eq!(x, leaf[y].parent);
        }

        if !z != 0 {
            debug_assert_eq!(x, leaf[z].parent);
        }

        x = next(leaf, x);
    }
}

// DEBUG : Check the leaf count
#[cfg(any(debug_assertions, test))]
fn check_count(leaf: &[Leaf], root: usize) -> usize {
    let mut x = first(leaf, root);
    let mut count = 0;

    while !x != 0 {
        count += 1;
        x = next(leaf, x);
    }

    count
}

//-----------------------------------------------------------------------------------------------//

#[test]
// A left-rotation followed by a right-rotation at the promoted leaf restores the original shape
fn test_rotation_inverse() {
    use alloc::vec;

    // Leaf 0 is the root; leaf 2 is its right child carrying both children
    let original = vec![
        Leaf {
            parent: !0,
            left: 1,
            right: 2,
        },
        Leaf {
            parent: 0,
            left: !0,
            right: !0,
        },
        Leaf {
            parent: 0,
            left: 3,
            right: 4,
        },
        Leaf {
            parent: 2,
            left: !0,
            right: !0,
        },
        Leaf {
            parent: 2,
            left: !0,
            right: !0,
        },
    ];

    let mut leaf = original.clone();

    let root = zag(&mut leaf, 0, 0);
    debug_assert_eq!(root, 2);
    debug_assert_eq!(leaf[2].parent, !0);
    debug_assert_eq!(leaf[2].left, 0);
    debug_assert_eq!(leaf[0].right, 3);
    debug_assert_eq!(leaf[3].parent, 0);

    let root = zig(&mut leaf, root, 2);
    debug_assert_eq!(root, 0);

    for (x, y) in leaf.iter().zip(original.iter()) {
        debug_assert_eq!(x.parent, y.parent);
        debug_assert_eq!(x.left, y.left);
        debug_assert_eq!(x.right, y.right);
    }
}

#[test]
// A rotation with an absent promoted child still executes and detaches the target
fn test_rotation_absent_child() {
    use alloc::vec;

    let mut leaf = vec![Leaf {
        parent: !0,
        left: !0,
        right: !0,
    }];

    let root = zag(&mut leaf, 0, 0);
    debug_assert_eq!(root, !0);
    debug_assert_eq!(leaf[0].parent, !0);
}

#[test]
// Splaying the root leaves the tree untouched
fn test_splay_root_noop() {
    use alloc::vec::Vec;

    let mut tree = Tree::new();
    let mut key_slice = Vec::new();

    for key in [5, 3, 8, 1] {
        let leaf = tree.insert_k(&key, &key_slice);
        key_slice.push(key);
        debug_assert_eq!(tree.root(), leaf);
    }

    let root = tree.root();
    tree.root = splay(&mut tree.leaf, tree.root, root);
    debug_assert_eq!(tree.root(), root);
    tree.check();
}

#[test]
// Structural integrity and leaf order after a burst of ordered and duplicate inserts
fn test_insert_structure() {
    use alloc::vec::Vec;

    let mut tree = Tree::new();
    let mut key_slice = Vec::new();

    for key in [5, 3, 1, 2, 4, 5, 5, 0, 9, 7] {
        tree.insert_k(&key, &key_slice);
        key_slice.push(key);
    }

    debug_assert_eq!(tree.count(), 10);
    tree.check();

    // Leaf order is the sorted key order
    let mut x = tree.first();
    let mut previous = None;
    while !x != 0 {
        if let Some(previous) = previous {
            debug_assert!(key_slice[previous] <= key_slice[x]);
        }
        previous = Some(x);
        x = tree.next(x);
    }
}

#[test]
// A stress test of inserts against the debug checker
fn test_insert_stress() {
    use alloc::vec::Vec;
    use rand::prelude::*;

    const COUNT: usize = 10000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut tree = Tree::new();
    let mut key_slice = Vec::new();

    for _ in 0..COUNT {
        let key = rng.random_range(0..1000usize);
        let leaf = tree.insert_k(&key, &key_slice);
        key_slice.push(key);

        // Splay property: the new leaf is the root
        debug_assert_eq!(tree.root(), leaf);
    }

    debug_assert_eq!(tree.count(), COUNT);
    tree.check();
}
