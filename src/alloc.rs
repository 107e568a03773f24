//! Storage for tree nodes.
//!
//! Nodes are always owned through a [`Box`] and released by dropping it, so
//! every [`NodeAllocator`] hands out global-heap storage. What an allocator
//! controls is whether a request is satisfied at all: a request may be
//! refused, which the tree reports as [`InsertError::Alloc`] without being
//! modified.
//!
//! [`InsertError::Alloc`]: crate::InsertError::Alloc

use std::{alloc::Layout, mem::MaybeUninit};

use crate::error::AllocError;

/// A source of uninitialised, correctly sized and aligned node storage.
pub trait NodeAllocator {
    /// Obtain storage for a single `T`, or report why it is unavailable.
    fn allocate<T>(&self) -> Result<Box<MaybeUninit<T>>, AllocError>;
}

impl<A> NodeAllocator for &A
where
    A: NodeAllocator,
{
    fn allocate<T>(&self) -> Result<Box<MaybeUninit<T>>, AllocError> {
        (**self).allocate()
    }
}

/// The global heap, reporting exhaustion as an [`AllocError`] rather than
/// aborting the process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

impl NodeAllocator for Global {
    fn allocate<T>(&self) -> Result<Box<MaybeUninit<T>>, AllocError> {
        let layout = Layout::new::<T>();
        if layout.size() == 0 {
            return Ok(Box::new_uninit());
        }

        // SAFETY: the layout has a non-zero size.
        let ptr = unsafe { std::alloc::alloc(layout) }.cast::<MaybeUninit<T>>();
        if ptr.is_null() {
            return Err(AllocError::new(layout));
        }

        // SAFETY: the pointer was returned by the global allocator for the
        // layout of `T`, which is the layout `Box` frees it with. A
        // `MaybeUninit<T>` has no validity requirements on its contents.
        Ok(unsafe { Box::from_raw(ptr) })
    }
}
