use std::cmp::Ordering;

/// A payload type that knows how to order itself against, and construct
/// itself from, a key of type `K`.
///
/// Implementing this trait enables the [`AvlTree::find()`],
/// [`AvlTree::find_mut()`], [`AvlTree::insert()`] and
/// [`AvlTree::insert_flag()`] shorthands, which otherwise take the comparator
/// and constructor as closures. A payload is destroyed by its [`Drop`]
/// implementation, if any.
///
/// [`AvlTree::find()`]: crate::AvlTree::find
/// [`AvlTree::find_mut()`]: crate::AvlTree::find_mut
/// [`AvlTree::insert()`]: crate::AvlTree::insert
/// [`AvlTree::insert_flag()`]: crate::AvlTree::insert_flag
pub trait Payload<K: ?Sized>: Sized {
    /// The error returned when [`Payload::construct()`] declines to build a
    /// payload.
    type Error;

    /// Order `key` relative to the key of `payload`.
    ///
    /// This must be a strict total order, consistent for the lifetime of the
    /// tree, and consistent with the key each payload was constructed from.
    fn compare(key: &K, payload: &Self) -> Ordering;

    /// Build the payload for a new node holding `key`.
    fn construct(key: &K) -> Result<Self, Self::Error>;
}
