//! A height-balanced (AVL) binary search tree that stores caller-constructed
//! payloads directly in its nodes.
//!
//! The tree never needs to know how a payload relates to the key it is
//! searched by: every lookup takes a comparator ordering a key against a
//! payload, and every insert takes a constructor that builds the payload for a
//! key that is not yet present. The constructor is only ever called once the
//! storage for the new node has been obtained, and may fail, in which case the
//! tree is left exactly as it was.
//!
//! ```
//! use inavl::AvlTree;
//!
//! #[derive(Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//! }
//!
//! let by_id = |id: &u32, u: &User| id.cmp(&u.id);
//!
//! let mut users = AvlTree::new();
//!
//! let (u, created) = users
//!     .insert_with_flag(&42, by_id, |id| {
//!         Ok::<_, ()>(User {
//!             id: *id,
//!             name: "bananas".to_string(),
//!         })
//!     })
//!     .unwrap();
//! assert!(created);
//! assert_eq!(u.name, "bananas");
//!
//! // The constructor is not called for a key that already exists.
//! let (_, created) = users
//!     .insert_with_flag(&42, by_id, |_| Err(()))
//!     .unwrap();
//! assert!(!created);
//!
//! assert_eq!(users.find_by(&42, by_id).unwrap().name, "bananas");
//! assert!(users.find_by(&24, by_id).is_none());
//!
//! let mut n = 0;
//! users.destroy_with(|_user| n += 1);
//! assert_eq!(n, 1);
//! ```
//!
//! The tree is not internally synchronised: it is [`Send`] / [`Sync`] when the
//! payload is, and concurrent readers are only possible through shared
//! references while nothing mutates it.
//!
//! Insert and teardown recurse once per tree level. As the tree is balanced,
//! the depth of recursion is bounded by ~1.44·log2(n).

#![deny(rust_2018_idioms, missing_debug_implementations, unreachable_pub)]
#![warn(missing_docs, clippy::todo, clippy::dbg_macro)]

pub mod alloc;
mod error;
mod node;
mod payload;
mod tracing_helpers;
mod tree;

pub use alloc::{Global, NodeAllocator};
pub use error::{AllocError, InsertError};
pub use payload::Payload;
pub use tree::AvlTree;

#[cfg(test)]
mod test_utils;
