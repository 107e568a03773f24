use std::cmp::Ordering;

use crate::{
    alloc::{Global, NodeAllocator},
    error::InsertError,
    node::{self, Link, Node, Outcome},
    payload::Payload,
};

/// An AVL tree of payloads of type `P`, with node storage obtained from `A`.
///
/// The tree is identified by its root node alone: there is no element count
/// or other bookkeeping outside the nodes. Nodes can be added and the whole
/// tree can be torn down, but individual nodes are never removed.
#[derive(Debug)]
pub struct AvlTree<P, A = Global> {
    root: Link<P>,
    alloc: A,
}

impl<P> AvlTree<P> {
    /// Construct an empty tree storing nodes on the global heap.
    pub fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<P, A> Default for AvlTree<P, A>
where
    A: Default,
{
    fn default() -> Self {
        Self {
            root: None,
            alloc: A::default(),
        }
    }
}

impl<P, A> AvlTree<P, A> {
    /// Construct an empty tree obtaining node storage from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self { root: None, alloc }
    }

    /// Returns a reference to the allocator backing this tree.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns true if the tree holds no payloads.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The height of the tree; 0 when empty, 1 for a single node.
    pub fn height(&self) -> u8 {
        self.root.as_ref().map(|v| v.height()).unwrap_or_default()
    }

    /// Return the payload ordered equal to `key` by `cmp`, if any.
    ///
    /// `cmp` orders `key` relative to a payload, returning [`Ordering::Less`]
    /// when the key sorts before it.
    pub fn find_by<K, C>(&self, key: &K, mut cmp: C) -> Option<&P>
    where
        K: ?Sized,
        C: FnMut(&K, &P) -> Ordering,
    {
        node::find(self.root.as_deref(), key, &mut cmp)
    }

    /// Return a mutable reference to the payload ordered equal to `key` by
    /// `cmp`, if any.
    ///
    /// Mutating the payload such that it no longer orders the same way
    /// against keys leaves the tree unable to find it.
    pub fn find_by_mut<K, C>(&mut self, key: &K, mut cmp: C) -> Option<&mut P>
    where
        K: ?Sized,
        C: FnMut(&K, &P) -> Ordering,
    {
        node::find_mut(self.root.as_deref_mut(), key, &mut cmp)
    }

    /// Tear down the tree, passing every payload to `destructor` exactly once.
    ///
    /// Nodes are visited in post-order (left subtree, right subtree, node).
    /// Dropping the tree instead drops each payload in place.
    pub fn destroy_with<D>(self, mut destructor: D)
    where
        D: FnMut(P),
    {
        if let Some(root) = self.root {
            node::destroy(root, &mut destructor);
        }
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<&Node<P>> {
        self.root.as_deref()
    }
}

impl<P, A> AvlTree<P, A>
where
    A: NodeAllocator,
{
    /// Return the payload ordered equal to `key` by `cmp`, constructing and
    /// inserting it with `ctor` if it does not exist.
    ///
    /// `ctor` is called at most once, and only after the storage for the new
    /// node has been obtained. If either step fails, the tree is unchanged.
    pub fn insert_with<K, C, F, E>(
        &mut self,
        key: &K,
        cmp: C,
        ctor: F,
    ) -> Result<&mut P, InsertError<E>>
    where
        K: ?Sized,
        C: FnMut(&K, &P) -> Ordering,
        F: FnOnce(&K) -> Result<P, E>,
    {
        self.insert_with_flag(key, cmp, ctor).map(|(v, _)| v)
    }

    /// As [`AvlTree::insert_with()`], also returning true if a new node was
    /// created, or false if an existing payload was found.
    pub fn insert_with_flag<K, C, F, E>(
        &mut self,
        key: &K,
        mut cmp: C,
        ctor: F,
    ) -> Result<(&mut P, bool), InsertError<E>>
    where
        K: ?Sized,
        C: FnMut(&K, &P) -> Ordering,
        F: FnOnce(&K) -> Result<P, E>,
    {
        let outcome = match self.root {
            Some(ref mut v) => v.insert(key, &mut cmp, ctor, &self.alloc)?,
            None => {
                self.root = Some(Node::try_new(key, ctor, &self.alloc)?);
                Outcome::Created
            }
        };

        // The rebalancing walk moves nodes around after the payload is found
        // or placed, so the reference is taken by a second descent.
        let payload = node::find_mut(self.root.as_deref_mut(), key, &mut cmp)
            .expect("comparator is inconsistent with the tree order");

        Ok((payload, outcome == Outcome::Created))
    }

    /// Return the payload for `key`, if any.
    pub fn find<K>(&self, key: &K) -> Option<&P>
    where
        K: ?Sized,
        P: Payload<K>,
    {
        self.find_by(key, P::compare)
    }

    /// Return a mutable reference to the payload for `key`, if any.
    pub fn find_mut<K>(&mut self, key: &K) -> Option<&mut P>
    where
        K: ?Sized,
        P: Payload<K>,
    {
        self.find_by_mut(key, P::compare)
    }

    /// Return the payload for `key`, constructing it with
    /// [`Payload::construct()`] if it does not exist.
    pub fn insert<K>(&mut self, key: &K) -> Result<&mut P, InsertError<P::Error>>
    where
        K: ?Sized,
        P: Payload<K>,
    {
        self.insert_with(key, P::compare, P::construct)
    }

    /// As [`AvlTree::insert()`], also returning true if a new node was
    /// created.
    pub fn insert_flag<K>(&mut self, key: &K) -> Result<(&mut P, bool), InsertError<P::Error>>
    where
        K: ?Sized,
        P: Payload<K>,
    {
        self.insert_with_flag(key, P::compare, P::construct)
    }
}
