use core::fmt;
use core::mem;
use core::ops::{Index, IndexMut};
use core::ptr;
use core::slice;

use crate::cursor::{Cursor, CursorMut, OwnerId};
use crate::error::{DynVecError, Result};
use crate::iter::{Iter, IterMut};
use crate::raw::{grown_capacity, FillGuard, RawBuf};

/// A growable array that copies its elements in by `Clone`
///
/// Slots `[0, len)` of the buffer hold live elements, slots
/// `[len, capacity)` are uninitialized. Growth doubles the capacity
/// (starting at 1) and relocates the existing elements by cloning them into
/// the new buffer.
pub struct DynVec<T> {
    buf: RawBuf<T>,
    len: usize,
    owner: OwnerId,
}

impl<T> DynVec<T> {
    /// Creates an empty `DynVec`. Nothing is allocated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
            owner: OwnerId::next(),
        }
    }

    /// Creates an empty `DynVec` with room for `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity overflows the address space.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: RawBuf::with_capacity(capacity),
            len: 0,
            owner: OwnerId::next(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots, live or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Identity checked against the owner of cursors handed back to this container.
    #[must_use]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    #[must_use]
    #[allow(unsafe_code)]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are live; the pointer is non-null
        // and aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    #[must_use]
    #[allow(unsafe_code)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` makes the borrow unique.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Bounds-checked access to the element at `pos`.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::IndexOutOfBound` if `pos >= len()`.
    pub fn at(&self, pos: usize) -> Result<&T> {
        let length = self.len;
        self.as_slice()
            .get(pos)
            .ok_or(DynVecError::IndexOutOfBound { index: pos, length })
    }

    /// Bounds-checked mutable access to the element at `pos`.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::IndexOutOfBound` if `pos >= len()`.
    pub fn at_mut(&mut self, pos: usize) -> Result<&mut T> {
        let length = self.len;
        self.as_mut_slice()
            .get_mut(pos)
            .ok_or(DynVecError::IndexOutOfBound { index: pos, length })
    }

    /// Returns the element at `pos`, or `None` if it is out of bounds.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<&T> {
        self.as_slice().get(pos)
    }

    #[must_use]
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(pos)
    }

    /// First element.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::ContainerIsEmpty` if there are no elements.
    pub fn front(&self) -> Result<&T> {
        self.as_slice().first().ok_or(DynVecError::ContainerIsEmpty)
    }

    /// Last element.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::ContainerIsEmpty` if there are no elements.
    pub fn back(&self) -> Result<&T> {
        self.as_slice().last().ok_or(DynVecError::ContainerIsEmpty)
    }

    /// # Errors
    ///
    /// Returns `DynVecError::ContainerIsEmpty` if there are no elements.
    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice()
            .first_mut()
            .ok_or(DynVecError::ContainerIsEmpty)
    }

    /// # Errors
    ///
    /// Returns `DynVecError::ContainerIsEmpty` if there are no elements.
    pub fn back_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice()
            .last_mut()
            .ok_or(DynVecError::ContainerIsEmpty)
    }

    /// Removes the last element and returns it.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::ContainerIsEmpty` if there are no elements.
    #[allow(unsafe_code)]
    pub fn pop_back(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(DynVecError::ContainerIsEmpty);
        }

        self.len -= 1;
        // SAFETY: slot `len` was live and is now outside the live range, so
        // ownership moves out exactly once.
        Ok(unsafe { ptr::read(self.buf.slot(self.len)) })
    }

    /// Drops every element in index order. The capacity is kept.
    #[allow(unsafe_code)]
    pub fn clear(&mut self) {
        let live: *mut [T] = self.as_mut_slice();
        // Shrink first so a panicking `Drop` cannot cause a double drop.
        self.len = 0;
        // SAFETY: the slots were live and are no longer reachable.
        unsafe { ptr::drop_in_place(live) };
    }

    /// Exchanges the contents of two containers without touching any element.
    ///
    /// Owner identities stay with the containers: cursors issued by `self`
    /// still belong to `self` afterwards.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.buf, &mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Read-only cursor at slot 0.
    #[must_use]
    pub fn begin(&self) -> Cursor<T> {
        Cursor::new(self.buf.as_ptr().cast_const(), 0, self.owner)
    }

    /// Read-only cursor one past the last element.
    #[must_use]
    pub fn end(&self) -> Cursor<T> {
        Cursor::new(self.buf.as_ptr().cast_const(), slot_offset(self.len), self.owner)
    }

    #[must_use]
    pub fn cbegin(&self) -> Cursor<T> {
        self.begin()
    }

    #[must_use]
    pub fn cend(&self) -> Cursor<T> {
        self.end()
    }

    /// Mutable cursor at slot 0.
    #[must_use]
    pub fn begin_mut(&mut self) -> CursorMut<T> {
        self.cursor_mut_at(0)
    }

    /// Mutable cursor one past the last element.
    #[must_use]
    pub fn end_mut(&mut self) -> CursorMut<T> {
        self.cursor_mut_at(self.len)
    }

    fn cursor_mut_at(&mut self, index: usize) -> CursorMut<T> {
        CursorMut::new(self.buf.as_ptr(), slot_offset(index), self.owner)
    }

    /// Checks that a cursor was issued by `self` and that its offset is below `bound`.
    fn resolve(&self, owner: OwnerId, offset: isize, bound: usize) -> Result<usize> {
        if owner != self.owner {
            return Err(DynVecError::InvalidIterator);
        }
        usize::try_from(offset)
            .ok()
            .filter(|&index| index < bound)
            .ok_or(DynVecError::InvalidIterator)
    }

    /// Checked dereference of a cursor.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::InvalidIterator` if the cursor was issued by
    /// another container or does not address a live element.
    pub fn get_at(&self, cursor: impl Into<Cursor<T>>) -> Result<&T> {
        let cursor = cursor.into();
        let index = self.resolve(cursor.owner(), cursor.offset(), self.len)?;
        Ok(&self.as_slice()[index])
    }

    /// Checked mutable dereference of a cursor.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::InvalidIterator` if the cursor was issued by
    /// another container or does not address a live element.
    pub fn get_at_mut(&mut self, cursor: CursorMut<T>) -> Result<&mut T> {
        let index = self.resolve(cursor.owner(), cursor.offset(), self.len)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.as_slice())
    }

    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.as_mut_slice())
    }
}

impl<T: Clone> DynVec<T> {
    /// Appends a clone of `value`.
    ///
    /// When the buffer is full the container moves to a buffer of twice the
    /// capacity. If any clone panics on that path the container is left
    /// exactly as it was.
    #[allow(unsafe_code)]
    pub fn push_back(&mut self, value: &T) {
        if self.len == self.capacity() {
            let new_cap = grown_capacity(self.capacity());
            self.reallocate(new_cap, Some((self.len, value)));
            return;
        }

        let item = value.clone();
        // SAFETY: `len < capacity`, so the slot exists and is uninitialized.
        unsafe { ptr::write(self.buf.slot(self.len), item) };
        self.len += 1;
    }

    /// Inserts a clone of `value` before index `index`; `index == len()` appends.
    ///
    /// Returns a cursor at the inserted element.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::IndexOutOfBound` if `index > len()`.
    pub fn insert(&mut self, index: usize, value: &T) -> Result<CursorMut<T>> {
        if index > self.len {
            return Err(DynVecError::IndexOutOfBound {
                index,
                length: self.len,
            });
        }
        Ok(self.insert_within(index, value))
    }

    /// Inserts a clone of `value` before the slot addressed by `pos`.
    ///
    /// Returns a cursor at the inserted element.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::InvalidIterator` if `pos` was issued by another
    /// container or lies outside `begin()..=end()`.
    pub fn insert_at_cursor(&mut self, pos: CursorMut<T>, value: &T) -> Result<CursorMut<T>> {
        let index = self.resolve(pos.owner(), pos.offset(), self.len + 1)?;
        Ok(self.insert_within(index, value))
    }

    /// Removes the element at `index`.
    ///
    /// Returns a cursor at the element that followed it, which is `end_mut()`
    /// when the last element was removed.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::IndexOutOfBound` if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> Result<CursorMut<T>> {
        if index >= self.len {
            return Err(DynVecError::IndexOutOfBound {
                index,
                length: self.len,
            });
        }
        Ok(self.erase_within(index))
    }

    /// Removes the element addressed by `pos`.
    ///
    /// Returns a cursor at the element that followed it.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::InvalidIterator` if `pos` was issued by another
    /// container or does not address a live element.
    pub fn erase_at_cursor(&mut self, pos: CursorMut<T>) -> Result<CursorMut<T>> {
        let index = self.resolve(pos.owner(), pos.offset(), self.len)?;
        Ok(self.erase_within(index))
    }

    /// Makes room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        let Some(required) = self.len.checked_add(additional) else {
            panic!("capacity overflow");
        };
        if required > self.capacity() {
            self.reallocate(required, None);
        }
    }

    /// Moves the elements to a buffer of exactly `len()` slots.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() == self.len {
            return;
        }
        log::debug!("shrinking buffer from {} to {} slots", self.capacity(), self.len);
        if self.len == 0 {
            self.buf = RawBuf::new();
        } else {
            self.reallocate(self.len, None);
        }
    }

    fn insert_within(&mut self, index: usize, value: &T) -> CursorMut<T> {
        if self.len == self.capacity() {
            let new_cap = grown_capacity(self.capacity());
            self.reallocate(new_cap, Some((index, value)));
        } else if index == self.len {
            self.push_back(value);
        } else {
            self.shift_right_from(index, value);
        }
        self.cursor_mut_at(index)
    }

    /// In-place insert at `index < len < capacity`.
    ///
    /// Every slot stays live if a clone panics, but elements may then be
    /// duplicated.
    #[allow(unsafe_code)]
    fn shift_right_from(&mut self, index: usize, value: &T) {
        let last = self.len - 1;
        let top = self.as_slice()[last].clone();
        // SAFETY: `len < capacity`, so slot `len` exists and is uninitialized.
        unsafe { ptr::write(self.buf.slot(self.len), top) };
        self.len += 1;

        let live = self.as_mut_slice();
        for i in (index + 1..=last).rev() {
            live[i] = live[i - 1].clone();
        }
        live[index] = value.clone();
    }

    /// In-place erase of a live `index`, same panic behavior as `shift_right_from`.
    #[allow(unsafe_code)]
    fn erase_within(&mut self, index: usize) -> CursorMut<T> {
        let live = self.as_mut_slice();
        for i in index..live.len() - 1 {
            live[i] = live[i + 1].clone();
        }

        self.len -= 1;
        // SAFETY: the old last slot is live and now outside the live range.
        unsafe { ptr::drop_in_place(self.buf.slot(self.len)) };
        self.cursor_mut_at(index)
    }

    /// Clones every element into a fresh buffer of `new_cap` slots, with
    /// `insert` (if any) cloned into its target index on the way.
    ///
    /// The old buffer is dropped only once the new one is complete; a
    /// panicking clone leaves `self` untouched.
    fn reallocate(&mut self, new_cap: usize, insert: Option<(usize, &T)>) {
        let mut fill = FillGuard::new(RawBuf::with_capacity(new_cap));
        let live = self.as_slice();
        match insert {
            Some((index, value)) => {
                for item in &live[..index] {
                    fill.write_next(item.clone());
                }
                fill.write_next(value.clone());
                for item in &live[index..] {
                    fill.write_next(item.clone());
                }
            }
            None => {
                for item in live {
                    fill.write_next(item.clone());
                }
            }
        }
        let (buf, filled) = fill.finish();

        log::trace!(
            "reallocated {} elements from {} to {} slots",
            filled,
            self.capacity(),
            new_cap
        );
        self.clear();
        self.buf = buf;
        self.len = filled;
    }
}

#[allow(clippy::cast_possible_wrap)]
fn slot_offset(index: usize) -> isize {
    index as isize
}

impl<T> Drop for DynVec<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for DynVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynVec<T> {
    /// Deep copy with the same capacity and a new owner identity.
    ///
    /// If an element clone panics, the elements already copied are dropped
    /// and the new buffer is released before the panic continues.
    fn clone(&self) -> Self {
        let mut fill = FillGuard::new(RawBuf::with_capacity(self.capacity()));
        for item in self {
            fill.write_next(item.clone());
        }
        let (buf, len) = fill.finish();
        Self {
            buf,
            len,
            owner: OwnerId::next(),
        }
    }

    /// Copy-and-swap: the old contents are dropped only after the copy is complete.
    fn clone_from(&mut self, source: &Self) {
        let mut fresh = source.clone();
        self.swap(&mut fresh);
    }
}

impl<T: fmt::Debug> fmt::Debug for DynVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynVec<T> {}

impl<T: PartialEq> PartialEq<[T]> for DynVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T> Index<usize> for DynVec<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics with the `IndexOutOfBound` message if `pos >= len()`.
    fn index(&self, pos: usize) -> &T {
        match self.at(pos) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for DynVec<T> {
    fn index_mut(&mut self, pos: usize) -> &mut T {
        match self.at_mut(pos) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T: Clone + 'a> Extend<&'a T> for DynVec<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T: Clone> FromIterator<T> for DynVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        for item in iter {
            vec.push_back(&item);
        }
        vec
    }
}

impl<T: Clone> From<&[T]> for DynVec<T> {
    fn from(items: &[T]) -> Self {
        let mut vec = Self::with_capacity(items.len());
        vec.extend(items);
        vec
    }
}
