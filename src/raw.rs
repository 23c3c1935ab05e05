use alloc::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};

/// Capacity of the first buffer allocated for an empty container.
pub(crate) const MIN_NON_ZERO_CAP: usize = 1;
/// Factor applied to the capacity when an insertion finds the buffer full.
pub(crate) const GROWTH_FACTOR: usize = 2;

/// An owned block of `cap` uninitialized slots for `T`.
///
/// `RawBuf` only manages memory: it never constructs or drops elements.
/// Whoever writes into the slots is responsible for dropping them before
/// the buffer goes away.
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

// SAFETY: `RawBuf` owns its slots exclusively, like `Box<[MaybeUninit<T>]>`.
#[allow(unsafe_code)]
unsafe impl<T: Send> Send for RawBuf<T> {}
// SAFETY: shared access to `RawBuf` only hands out shared access to slots.
#[allow(unsafe_code)]
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {
    /// A buffer with no slots. Nothing is allocated.
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates `cap` uninitialized slots.
    ///
    /// # Panics
    ///
    /// Panics with `capacity overflow` if the byte size of `cap` slots does
    /// not fit a `Layout`. Allocation failure goes through
    /// `handle_alloc_error`.
    #[allow(unsafe_code)]
    pub(crate) fn with_capacity(cap: usize) -> Self {
        if cap == 0 {
            return Self::new();
        }

        let layout = Self::layout(cap);
        if layout.size() == 0 {
            // Zero-sized elements need no memory, only the slot count.
            return Self {
                ptr: NonNull::dangling(),
                cap,
                _marker: PhantomData,
            };
        }

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            handle_alloc_error(layout)
        };

        Self {
            ptr,
            cap,
            _marker: PhantomData,
        }
    }

    fn layout(cap: usize) -> Layout {
        match Layout::array::<T>(cap) {
            Ok(layout) => layout,
            Err(_) => capacity_overflow(),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must not exceed `capacity()`.
    #[inline]
    #[allow(unsafe_code)]
    pub(crate) unsafe fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.cap);
        self.ptr.as_ptr().add(index)
    }
}

impl<T> Drop for RawBuf<T> {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        if self.cap == 0 || mem::size_of::<T>() == 0 {
            return;
        }
        // SAFETY: the pointer came from `alloc` with exactly this layout.
        unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), Self::layout(self.cap)) };
    }
}

/// Capacity to grow to when an insertion finds `cap` slots all live.
pub(crate) fn grown_capacity(cap: usize) -> usize {
    match cap.checked_mul(GROWTH_FACTOR) {
        Some(doubled) => doubled.max(MIN_NON_ZERO_CAP),
        None => capacity_overflow(),
    }
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

/// Fills a fresh buffer front to back, one constructed slot at a time.
///
/// If filling is abandoned (a `clone` panics and unwinds through the
/// owner), dropping the guard drops exactly the slots written so far, in
/// the order they were written, and then releases the buffer.
pub(crate) struct FillGuard<T> {
    buf: RawBuf<T>,
    filled: usize,
}

impl<T> FillGuard<T> {
    pub(crate) fn new(buf: RawBuf<T>) -> Self {
        Self { buf, filled: 0 }
    }

    /// Moves `value` into the next unwritten slot.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already written.
    #[allow(unsafe_code)]
    pub(crate) fn write_next(&mut self, value: T) {
        assert!(self.filled < self.buf.capacity(), "fill past buffer capacity");
        // SAFETY: `filled < capacity`, and the slot has not been written yet.
        unsafe { ptr::write(self.buf.slot(self.filled), value) };
        self.filled += 1;
    }

    /// Hands over the buffer and the count of constructed leading slots.
    pub(crate) fn finish(mut self) -> (RawBuf<T>, usize) {
        let filled = mem::replace(&mut self.filled, 0);
        let buf = mem::replace(&mut self.buf, RawBuf::new());
        (buf, filled)
    }
}

impl<T> Drop for FillGuard<T> {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        if self.filled == 0 && self.buf.capacity() == 0 {
            return;
        }
        log::debug!(
            "rolling back fill of {} slot buffer after {} elements",
            self.buf.capacity(),
            self.filled
        );
        let built = ptr::slice_from_raw_parts_mut(self.buf.as_ptr(), self.filled);
        // SAFETY: exactly the first `filled` slots were written.
        unsafe { ptr::drop_in_place(built) };
    }
}
