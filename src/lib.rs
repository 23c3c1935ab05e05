#![no_std]

//! `DynVec`: a growable array that manages its own uninitialized storage.
//!
//! `DynVec<T>` keeps a heap buffer of `capacity` slots of which the first
//! `len` hold live elements. Elements enter the container by `Clone`, and
//! relocation during growth is done by cloning as well, so the container
//! works for any `T: Clone` and keeps its state intact when a clone panics.
//!
//! This crate is `no_std` compatible; it needs `alloc`.
//!
//! # Performance Characteristics
//!
//! ## Time Complexity
//! - `push_back()`: amortized O(1); capacity doubles when full, starting at 1
//! - `at()`, `Index`, `front()`, `back()`: O(1)
//! - `pop_back()`: O(1)
//! - `insert()`, `erase()`: O(n) element clones for the shifted tail
//! - `clear()`: O(n) drops, capacity is kept
//! - `swap()`: O(1), no element is touched
//!
//! ## Space Complexity
//! - One allocation holding `capacity` slots; nothing is allocated while empty
//! - Cursors are three machine words and own nothing
//!
//! # Error Handling
//!
//! Checked operations return `Result<_, DynVecError>`:
//!
//! ```
//! # use dynvec::{DynVec, DynVecError};
//! let mut vec: DynVec<i32> = DynVec::new();
//! assert_eq!(vec.pop_back(), Err(DynVecError::ContainerIsEmpty));
//!
//! vec.push_back(&5);
//! vec.push_back(&7);
//! assert_eq!(vec.at(1), Ok(&7));
//! assert_eq!(
//!     vec.at(2),
//!     Err(DynVecError::IndexOutOfBound { index: 2, length: 2 })
//! );
//!
//! vec.erase(0).unwrap();
//! vec.insert(0, &3).unwrap();
//! assert_eq!(vec.as_slice(), &[3, 7]);
//! ```
//!
//! Indexing with `[]` performs the same bounds check and panics with the
//! `IndexOutOfBound` message.
//!
//! ## Panic Safety
//!
//! A panicking `Clone` is propagated to the caller after cleanup:
//!
//! - Operations that reallocate (`push_back` or `insert` on a full
//!   container, `reserve`, `shrink_to_fit`) and `clone`/`clone_from` give
//!   the strong guarantee: the container is unchanged and nothing leaks.
//! - In-place `insert` and `erase` give the basic guarantee: every slot
//!   stays live and nothing leaks, but some elements may be duplicated.
//!
//! # Cursors
//!
//! `begin()`/`end()` hand out `Cursor`s, `begin_mut()`/`end_mut()` hand out
//! `CursorMut`s. Cursors do not borrow the container; each one remembers
//! the container that issued it. Handing a cursor to another container is
//! reported as `DynVecError::InvalidIterator`:
//!
//! ```
//! # use dynvec::{DynVec, DynVecError};
//! let mut vec: DynVec<&str> = ["a", "c"].into_iter().collect();
//!
//! let pos = vec.begin_mut() + 1;
//! let inserted = vec.insert_at_cursor(pos, &"b").unwrap();
//! assert_eq!(vec.get_at(inserted), Ok(&"b"));
//! assert_eq!(vec.end() - vec.begin(), Ok(3));
//!
//! let other: DynVec<&str> = DynVec::new();
//! assert_eq!(vec.end() - other.end(), Err(DynVecError::InvalidIterator));
//! ```
//!
//! Cursor equality only compares the addressed slot, so cursors from
//! different containers may compare equal even though their difference is
//! an error.
//!
//! # Iterator Support
//!
//! `DynVec` implements standard Rust iterator patterns:
//!
//! ```
//! # use dynvec::DynVec;
//! let mut vec: DynVec<u32> = (1..=3).collect();
//!
//! for item in &mut vec {
//!     *item *= 10;
//! }
//!
//! let collected: Vec<_> = vec.iter().copied().collect();
//! assert_eq!(collected, vec![10, 20, 30]);
//! ```

extern crate alloc;

mod cursor;
mod error;
mod iter;
mod raw;
mod vec;

// Re-export public types and traits
pub use cursor::{Cursor, CursorMut, OwnerId};
pub use error::{DynVecError, Result};
pub use iter::{Iter, IterMut};
pub use vec::DynVec;
