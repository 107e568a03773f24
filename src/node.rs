use std::cmp::Ordering;

use crate::{
    alloc::NodeAllocator,
    error::InsertError,
    tracing_helpers::{debug_log, trace_log},
};

/// An owning link to a subtree, or [`None`] for an empty subtree.
pub(crate) type Link<P> = Option<Box<Node<P>>>;

/// Identifies one of the two child links of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// The result of an insert that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// A node for the key already existed, and the constructor was not
    /// called.
    Found,

    /// A new node was constructed and linked into the tree.
    Created,
}

#[derive(Debug)]
pub(crate) struct Node<P> {
    /// Child nodes pointers.
    left: Link<P>,
    right: Link<P>,

    /// The height of the subtree rooted at this node.
    ///
    /// A leaf has a height of 1, and an empty subtree a height of 0.
    ///
    /// A u8 holds a maximum value of 255, far beyond the height of a balanced
    /// tree of any size that fits in memory.
    height: u8,

    payload: P,
}

impl<P> Node<P> {
    /// Allocate a leaf node from `alloc` and initialise its payload by calling
    /// `ctor`.
    ///
    /// Storage is obtained before the constructor runs. If the constructor
    /// fails, the storage is released without ever holding a node.
    pub(crate) fn try_new<K, F, E, A>(
        key: &K,
        ctor: F,
        alloc: &A,
    ) -> Result<Box<Self>, InsertError<E>>
    where
        K: ?Sized,
        F: FnOnce(&K) -> Result<P, E>,
        A: NodeAllocator,
    {
        let mut storage = match alloc.allocate::<Self>() {
            Ok(v) => v,
            Err(e) => {
                debug_log!(error = %e, "node allocation failed");
                return Err(e.into());
            }
        };

        let payload = match ctor(key) {
            Ok(v) => v,
            Err(e) => {
                // Dropping the uninitialised storage frees it without running
                // any destructor.
                debug_log!("payload constructor failed");
                return Err(InsertError::Construct(e));
            }
        };

        storage.write(Self {
            left: None,
            right: None,
            height: 1,
            payload,
        });

        // SAFETY: every field was initialised by the write above.
        Ok(unsafe { storage.assume_init() })
    }

    /// Insert a node for `key` into the subtree rooted at `self`, unless one
    /// already exists.
    ///
    /// The subtree is rebalanced on the way back up the recursion, only at the
    /// nodes whose child subtree grew in height.
    pub(crate) fn insert<K, C, F, E, A>(
        self: &mut Box<Self>,
        key: &K,
        cmp: &mut C,
        ctor: F,
        alloc: &A,
    ) -> Result<Outcome, InsertError<E>>
    where
        K: ?Sized,
        C: FnMut(&K, &P) -> Ordering,
        F: FnOnce(&K) -> Result<P, E>,
        A: NodeAllocator,
    {
        let side = match cmp(key, &self.payload) {
            Ordering::Less => Side::Left,
            Ordering::Equal => return Ok(Outcome::Found),
            Ordering::Greater => Side::Right,
        };

        let child = self.child_mut(side);
        let before = height(child.as_deref());

        match child {
            Some(v) => {
                if v.insert(key, cmp, ctor, alloc)? == Outcome::Found {
                    // The tree structure has not been modified.
                    return Ok(Outcome::Found);
                }
            }
            None => {
                *child = Some(Self::try_new(key, ctor, alloc)?);
            }
        }

        // Only a child subtree that grew can unbalance this node. Otherwise
        // this node's height is unchanged too.
        if height(self.child(side)) != before {
            rebalance_after_growth(self, side);
        }

        Ok(Outcome::Created)
    }

    pub(crate) fn payload(&self) -> &P {
        &self.payload
    }

    pub(crate) fn height(&self) -> u8 {
        self.height
    }

    pub(crate) fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    pub(crate) fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    fn child(&self, side: Side) -> Option<&Self> {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Link<P> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Descend from `node` to the payload equal to `key`, if any.
pub(crate) fn find<'a, P, K, C>(
    mut node: Option<&'a Node<P>>,
    key: &K,
    cmp: &mut C,
) -> Option<&'a P>
where
    K: ?Sized,
    C: FnMut(&K, &P) -> Ordering,
{
    while let Some(n) = node {
        node = match cmp(key, &n.payload) {
            Ordering::Less => n.left(),
            Ordering::Equal => return Some(&n.payload),
            Ordering::Greater => n.right(),
        };
    }

    None
}

pub(crate) fn find_mut<'a, P, K, C>(
    mut node: Option<&'a mut Node<P>>,
    key: &K,
    cmp: &mut C,
) -> Option<&'a mut P>
where
    K: ?Sized,
    C: FnMut(&K, &P) -> Ordering,
{
    while let Some(n) = node {
        node = match cmp(key, &n.payload) {
            Ordering::Less => n.left.as_deref_mut(),
            Ordering::Equal => return Some(&mut n.payload),
            Ordering::Greater => n.right.as_deref_mut(),
        };
    }

    None
}

/// Tear down the subtree rooted at `node` in post-order, passing each payload
/// to `destructor` as its node is released.
pub(crate) fn destroy<P, D>(node: Box<Node<P>>, destructor: &mut D)
where
    D: FnMut(P),
{
    let Node {
        left,
        right,
        payload,
        ..
    } = *node;

    if let Some(v) = left {
        destroy(v, destructor);
    }
    if let Some(v) = right {
        destroy(v, destructor);
    }

    destructor(payload);
}

fn height<P>(n: Option<&Node<P>>) -> u8 {
    n.map(|v| v.height()).unwrap_or_default()
}

fn update_height<P>(n: &mut Node<P>) {
    n.height = height(n.left()).max(height(n.right())) + 1;
}

/// Compute the "balance factor" of the subtree rooted at `n`.
///
/// Returns the subtree height skew / magnitude, which is a positive number when
/// left heavy, and a negative number when right heavy.
fn balance<P>(n: &Node<P>) -> i8 {
    // Correctness: the height is a u8, the maximal value of which fits in an
    // i16 without truncation or sign inversion.
    (height(n.left()) as i16 - height(n.right()) as i16) as i8
}

/// Restore the AVL balance of `n` after the subtree on the `grown` side
/// increased in height by one.
///
/// ```text
///  Single rotation, when inner <= sibling:
///
///         5
///        / \                          4
///       4   D                        /   \
///      / \        --------------->   3     5
///     3   C                         / \   / \
///    / \                           A   B C   D
///   A   B
///
///  Double rotation, when inner > sibling:
///
///         5
///        / \                          4
///       3   D                        /   \
///      / \        --------------->   3     5
///     A   4                         / \   / \
///        / \                       A   B C   D
///       B   C
/// ```
///
/// The right-grown cases are the mirror image.
fn rebalance_after_growth<P>(n: &mut Box<Node<P>>, grown: Side) {
    let sibling = height(n.child(grown.opposite()));
    let child = n.child(grown);
    let grown_height = height(child);

    if grown_height <= sibling + 1 {
        update_height(n);
        debug_assert!(balance(n).abs() <= 1);
        return;
    }

    // Invariant: an insert grows a subtree by at most one level, so a node
    // that was balanced before it is skewed by exactly two.
    debug_assert_eq!(grown_height, sibling + 2);

    // The grandchild on the side of the grown child facing the sibling.
    let inner = height(child.and_then(|v| v.child(grown.opposite())));
    let single = inner <= sibling;

    trace_log!(side = ?grown, single, "rotating to restore balance");

    match (grown, single) {
        (Side::Left, true) => rotate_right(n),
        (Side::Left, false) => {
            if let Some(l) = n.left.as_mut() {
                rotate_left(l);
            }
            rotate_right(n);
        }
        (Side::Right, true) => rotate_left(n),
        (Side::Right, false) => {
            if let Some(r) = n.right.as_mut() {
                rotate_right(r);
            }
            rotate_left(n);
        }
    }

    // Invariant: the absolute difference between tree heights ("balance
    // factor") cannot exceed 1.
    debug_assert!(balance(n).abs() <= 1);
}

/// Left rotate the given subtree rooted at `x` around the pivot point `P`.
///
/// ```text
///
///      x
///     / \                               P
///    1   P         Rotate Left        /   \
///       / \      --------------->    x     y
///      2   y                        / \   / \
///         / \                      1   2 3   4
///        3   4
/// ```
///
/// # Panics
///
/// Panics if `x` has no right pointer (cannot be rotated).
fn rotate_left<P>(x: &mut Box<Node<P>>) {
    let mut p = x.right.take().unwrap();
    std::mem::swap(x, &mut p);

    p.right = x.left.take();
    update_height(&mut p);

    x.left = Some(p);
    update_height(x);
}

/// Right rotate the given subtree rooted at `y` around the pivot point `P`.
///
/// ```text
///          y
///         / \                           P
///        P   4     Rotate Right       /   \
///       / \      --------------->    x     y
///      x   3                        / \   / \
///     / \                          1   2 3   4
///    1   2
/// ```
///
/// # Panics
///
/// Panics if `y` has no left pointer (cannot be rotated).
fn rotate_right<P>(y: &mut Box<Node<P>>) {
    let mut p = y.left.take().unwrap();
    std::mem::swap(y, &mut p);

    p.left = y.right.take();
    update_height(&mut p);

    y.right = Some(p);
    update_height(y);
}
