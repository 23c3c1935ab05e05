//! Position handles into a `DynVec` buffer.
//!
//! A cursor is a raw slot position plus the identity of the container that
//! issued it. It borrows nothing, so it can be kept across calls and handed
//! back to `insert_at_cursor` / `erase_at_cursor`. The price is that it is
//! only meaningful while the issuing container is structurally unchanged:
//! after a reallocation, insertion or erasure the position may be stale.
//! Structural operations taking a cursor resolve it by offset and check its
//! owner, so a stale cursor can give a surprising position but never
//! touches freed memory. Only the `unsafe` dereferences trust the cursor.

use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{DynVecError, Result};

/// Identity of a container instance.
///
/// Every `DynVec` draws a fresh id when it is created or cloned. Ids are
/// compared by value; swapping two containers' contents keeps their ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(usize);

impl OwnerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Mutable cursor: a position in a `DynVec` through which the element may be changed.
pub struct CursorMut<T> {
    base: *mut T,
    offset: isize,
    owner: OwnerId,
}

/// Read-only cursor: a position in a `DynVec`.
///
/// Built by `begin`/`end`/`cbegin`/`cend`, or narrowed from a `CursorMut`.
pub struct Cursor<T> {
    base: *const T,
    offset: isize,
    owner: OwnerId,
}

impl<T> CursorMut<T> {
    pub(crate) fn new(base: *mut T, offset: isize, owner: OwnerId) -> Self {
        Self {
            base,
            offset,
            owner,
        }
    }

    /// Raw pointer to the addressed slot. Never dereferenced by this call.
    #[must_use]
    pub fn as_ptr(&self) -> *mut T {
        self.base.wrapping_offset(self.offset)
    }

    /// Returns a mutable reference to the addressed element.
    ///
    /// # Safety
    ///
    /// The issuing container must still be alive and structurally unchanged
    /// since the cursor was obtained, the cursor must address a live element
    /// (`begin() <= self < end()`), and no other reference to that element
    /// may exist for the chosen lifetime `'a`.
    #[must_use]
    #[allow(unsafe_code, clippy::mut_from_ref)]
    pub unsafe fn as_mut<'a>(&self) -> &'a mut T {
        &mut *self.as_ptr()
    }
}

impl<T> Cursor<T> {
    pub(crate) fn new(base: *const T, offset: isize, owner: OwnerId) -> Self {
        Self {
            base,
            offset,
            owner,
        }
    }

    /// Raw pointer to the addressed slot. Never dereferenced by this call.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.base.wrapping_offset(self.offset)
    }
}

impl<T> From<CursorMut<T>> for Cursor<T> {
    fn from(cursor: CursorMut<T>) -> Self {
        Self::new(cursor.base.cast_const(), cursor.offset, cursor.owner)
    }
}

macro_rules! cursor_common {
    ($name:ident) => {
        impl<T> $name<T> {
            /// Slot index relative to the start of the issuing buffer.
            #[must_use]
            pub fn offset(&self) -> isize {
                self.offset
            }

            /// The container that issued this cursor.
            #[must_use]
            pub fn owner(&self) -> OwnerId {
                self.owner
            }

            /// Returns a shared reference to the addressed element.
            ///
            /// # Safety
            ///
            /// The issuing container must still be alive and structurally
            /// unchanged since the cursor was obtained, the cursor must
            /// address a live element, and no mutable reference to that
            /// element may exist for the chosen lifetime `'a`.
            #[must_use]
            #[allow(unsafe_code)]
            pub unsafe fn as_ref<'a>(&self) -> &'a T {
                &*self.as_ptr()
            }

            /// Pre-increment: moves to the next slot and returns the cursor.
            pub fn inc(&mut self) -> &mut Self {
                self.offset = self.offset.wrapping_add(1);
                self
            }

            /// Post-increment: moves to the next slot and returns the old position.
            pub fn post_inc(&mut self) -> Self {
                let old = *self;
                self.offset = self.offset.wrapping_add(1);
                old
            }

            /// Pre-decrement: moves to the previous slot and returns the cursor.
            pub fn dec(&mut self) -> &mut Self {
                self.offset = self.offset.wrapping_sub(1);
                self
            }

            /// Post-decrement: moves to the previous slot and returns the old position.
            pub fn post_dec(&mut self) -> Self {
                let old = *self;
                self.offset = self.offset.wrapping_sub(1);
                old
            }

            /// Number of slots from `other` to `self`.
            ///
            /// # Errors
            ///
            /// Returns `DynVecError::InvalidIterator` if the two cursors were
            /// issued by different containers.
            pub fn distance_from(&self, other: &Self) -> Result<isize> {
                if self.owner != other.owner {
                    return Err(DynVecError::InvalidIterator);
                }
                Ok(self.offset.wrapping_sub(other.offset))
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("offset", &self.offset)
                    .field("owner", &self.owner)
                    .finish()
            }
        }

        impl<T> Add<isize> for $name<T> {
            type Output = Self;

            fn add(mut self, n: isize) -> Self {
                self += n;
                self
            }
        }

        impl<T> Sub<isize> for $name<T> {
            type Output = Self;

            fn sub(mut self, n: isize) -> Self {
                self -= n;
                self
            }
        }

        impl<T> AddAssign<isize> for $name<T> {
            fn add_assign(&mut self, n: isize) {
                self.offset = self.offset.wrapping_add(n);
            }
        }

        impl<T> SubAssign<isize> for $name<T> {
            fn sub_assign(&mut self, n: isize) {
                self.offset = self.offset.wrapping_sub(n);
            }
        }

        /// Cursor difference. Unlike equality, this checks the owner.
        impl<T> Sub for $name<T> {
            type Output = Result<isize>;

            fn sub(self, rhs: Self) -> Result<isize> {
                self.distance_from(&rhs)
            }
        }
    };
}

cursor_common!(CursorMut);
cursor_common!(Cursor);

// Equality compares the slot only (buffer base and offset); the owner is
// not consulted. `distance_from` is the owner-checked comparison.

impl<T> PartialEq for CursorMut<T> {
    fn eq(&self, other: &Self) -> bool {
        self.base.cast_const() == other.base.cast_const() && self.offset == other.offset
    }
}

impl<T> Eq for CursorMut<T> {}

impl<T> PartialEq for Cursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.offset == other.offset
    }
}

impl<T> Eq for Cursor<T> {}

impl<T> PartialEq<Cursor<T>> for CursorMut<T> {
    fn eq(&self, other: &Cursor<T>) -> bool {
        self.base.cast_const() == other.base && self.offset == other.offset
    }
}

impl<T> PartialEq<CursorMut<T>> for Cursor<T> {
    fn eq(&self, other: &CursorMut<T>) -> bool {
        other == self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_ids_are_unique() {
        let a = OwnerId::next();
        let b = OwnerId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_arithmetic_does_not_touch_memory() {
        let mut slots = [10u32, 20, 30];
        let owner = OwnerId::next();
        let begin = CursorMut::new(slots.as_mut_ptr(), 0, owner);

        let far = begin + 1000;
        assert_eq!(far.offset(), 1000);
        assert_eq!((far - 1000).offset(), 0);
        assert_eq!(far - begin, Ok(1000));
    }

    #[test]
    fn test_increment_and_decrement() {
        let slots = [1u8, 2, 3];
        let mut cursor = Cursor::new(slots.as_ptr(), 0, OwnerId::next());

        let old = cursor.post_inc();
        assert_eq!(old.offset(), 0);
        assert_eq!(cursor.offset(), 1);

        cursor.inc().inc();
        assert_eq!(cursor.offset(), 3);

        let old = cursor.post_dec();
        assert_eq!(old.offset(), 3);
        cursor.dec();
        assert_eq!(cursor.offset(), 1);
        // SAFETY: offset 1 addresses a live element of `slots`.
        #[allow(unsafe_code)]
        let value = unsafe { *cursor.as_ref() };
        assert_eq!(value, 2);
    }

    #[test]
    fn test_distance_requires_same_owner() {
        let slots = [0i64; 4];
        let a = Cursor::new(slots.as_ptr(), 1, OwnerId::next());
        let b = Cursor::new(slots.as_ptr(), 3, OwnerId::next());
        assert_eq!(a.distance_from(&b), Err(DynVecError::InvalidIterator));
        // Same slot, different owners: still equal.
        assert_eq!(a, Cursor::new(slots.as_ptr(), 1, b.owner()));
    }

    #[test]
    fn test_narrowing_keeps_position_and_owner() {
        let mut slots = [5u16; 2];
        let wide = CursorMut::new(slots.as_mut_ptr(), 1, OwnerId::next());
        let narrow: Cursor<u16> = wide.into();
        assert_eq!(narrow.offset(), 1);
        assert_eq!(narrow.owner(), wide.owner());
        assert!(narrow == wide);
        assert!(wide == narrow);
    }
}
