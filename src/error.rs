use std::alloc::Layout;

use thiserror::Error;

/// Storage for a new tree node could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to allocate {} bytes for a tree node", .layout.size())]
pub struct AllocError {
    layout: Layout,
}

impl AllocError {
    pub(crate) fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The [`Layout`] of the allocation that failed.
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

/// The reason an insert of a new key did not take place.
///
/// In both cases the tree is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError<E> {
    /// The allocator refused to provide storage for the new node.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// The payload constructor declined to initialise the new payload.
    #[error("payload construction failed: {0}")]
    Construct(E),
}
