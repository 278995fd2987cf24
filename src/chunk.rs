use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ptr::{self, NonNull};

use crate::alloc::ChunkAllocator;
use crate::error::{AllocResultExt, Error, Result};

/// A fixed block of `N` element slots, the unit of payload allocation.
pub(crate) type Chunk<T, const N: usize> = [MaybeUninit<T>; N];

/// Where virtual index `0` physically lives: a slot of the chunk table and an
/// offset inside that chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Head {
    pub(crate) slot: usize,
    pub(crate) offset: usize,
}

impl Head {
    #[inline]
    pub(crate) const fn is_origin(&self) -> bool {
        self.slot == 0 && self.offset == 0
    }

    /// Distance in slots from the first slot of the table.
    #[inline]
    pub(crate) const fn linear<const N: usize>(&self) -> usize {
        self.slot * N + self.offset
    }

    #[inline]
    pub(crate) fn advance<const N: usize>(&mut self, count: usize) {
        let linear = self.offset + count;
        self.slot += linear / N;
        self.offset = linear % N;
    }

    /// Steps one slot towards the front of the table.
    ///
    /// The head must not be at the origin.
    #[inline]
    pub(crate) fn retreat<const N: usize>(&mut self) {
        debug_assert!(!self.is_origin());

        if self.offset == 0 {
            self.slot -= 1;
            self.offset = N - 1;
        } else {
            self.offset -= 1;
        }
    }
}

/// Maps a virtual index to its `(table slot, chunk offset)` coordinates.
#[inline]
pub(crate) const fn translate<const N: usize>(head: Head, index: usize) -> (usize, usize) {
    let linear = head.offset + index;
    (head.slot + linear / N, linear % N)
}

/// Address of the `offset`-th slot of `chunk`.
///
/// # Safety
/// `chunk` must be a live chunk and `offset < N`.
#[inline]
pub(crate) unsafe fn slot<T, const N: usize>(chunk: NonNull<Chunk<T, N>>, offset: usize) -> *mut T {
    debug_assert!(offset < N);
    unsafe { chunk.cast::<T>().as_ptr().add(offset) }
}

const MIN_TABLE_CAPACITY: usize = 4;

/// The chunk table: an owned buffer of chunk handles.
///
/// Live handles occupy `first..first + len` of the buffer, leaving spare handle
/// room on both sides so chunks can be attached at either end without touching
/// the elements they hold. The table owns the chunks' memory but never their
/// elements, which are managed by the deque.
pub(crate) struct ChunkTable<T, const N: usize, A: ChunkAllocator> {
    buf: NonNull<NonNull<Chunk<T, N>>>,
    cap: usize,
    first: usize,
    len: usize,
    alloc: A,
    marker: PhantomData<Chunk<T, N>>,
}

impl<T, const N: usize, A: ChunkAllocator> ChunkTable<T, N, A> {
    pub(crate) const fn new_in(alloc: A) -> Self {
        Self {
            buf: NonNull::dangling(),
            cap: 0,
            first: 0,
            len: 0,
            alloc,
            marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Pointer to the first live handle.
    #[inline]
    pub(crate) fn handles(&self) -> NonNull<NonNull<Chunk<T, N>>> {
        unsafe { self.buf.add(self.first) }
    }

    /// # Safety
    /// `slot` must be less than [`Self::len`].
    #[inline]
    pub(crate) unsafe fn chunk(&self, slot: usize) -> NonNull<Chunk<T, N>> {
        debug_assert!(slot < self.len, "chunk slot out of range");
        unsafe { self.handles().add(slot).read() }
    }

    #[inline]
    fn chunk_layout() -> Layout {
        Layout::new::<Chunk<T, N>>()
    }

    pub(crate) fn allocate_chunk(&self) -> Result<NonNull<Chunk<T, N>>> {
        let layout = Self::chunk_layout();
        self.alloc
            .allocate(layout)
            .for_layout(layout)
            .map(NonNull::cast)
    }

    /// # Safety
    /// `chunk` must come from `allocate_chunk` of this table, must not be
    /// referenced by the table anymore, and must hold no live element.
    pub(crate) unsafe fn deallocate_chunk(&self, chunk: NonNull<Chunk<T, N>>) {
        unsafe { self.alloc.deallocate(chunk.cast(), Self::chunk_layout()) }
    }

    /// Ensures `additional` handles can be attached at the front.
    pub(crate) fn try_reserve_front(&mut self, additional: usize) -> Result<()> {
        if self.first >= additional {
            return Ok(());
        }

        self.make_room(additional)
    }

    /// Ensures `additional` handles can be attached at the back.
    pub(crate) fn try_reserve_back(&mut self, additional: usize) -> Result<()> {
        if self.cap - self.first - self.len >= additional {
            return Ok(());
        }

        self.make_room(additional)
    }

    // Afterwards both sides have room for at least `additional` handles.
    fn make_room(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .and_then(|n| n.checked_mul(2))
            .ok_or(Error::CapacityOverflow)?;

        if self.cap >= required {
            let first = (self.cap - self.len) / 2;
            unsafe {
                ptr::copy(
                    self.buf.add(self.first).as_ptr(),
                    self.buf.add(first).as_ptr(),
                    self.len,
                );
            }
            self.first = first;
            return Ok(());
        }

        let cap = required
            .max(self.cap.saturating_mul(2))
            .max(MIN_TABLE_CAPACITY);
        self.reallocate(cap)
    }

    fn reallocate(&mut self, cap: usize) -> Result<()> {
        debug_assert!(cap >= self.len);

        let layout = Layout::array::<NonNull<Chunk<T, N>>>(cap)?;
        let buf: NonNull<NonNull<Chunk<T, N>>> =
            self.alloc.allocate(layout).for_layout(layout)?.cast();

        let first = (cap - self.len) / 2;
        unsafe {
            ptr::copy_nonoverlapping(
                self.buf.add(self.first).as_ptr(),
                buf.add(first).as_ptr(),
                self.len,
            );
            self.release_buffer();
        }

        self.buf = buf;
        self.cap = cap;
        self.first = first;
        Ok(())
    }

    /// Frees the handle buffer without touching the chunks it points to.
    unsafe fn release_buffer(&mut self) {
        if self.cap == 0 {
            return;
        }

        // the layout was valid when the buffer was allocated
        if let Ok(layout) = Layout::array::<NonNull<Chunk<T, N>>>(self.cap) {
            unsafe { self.alloc.deallocate(self.buf.cast(), layout) };
        }
    }

    /// The front must have room, see [`Self::try_reserve_front`].
    pub(crate) fn push_front(&mut self, chunk: NonNull<Chunk<T, N>>) {
        assert!(self.first > 0, "no handle room at the front");

        self.first -= 1;
        self.len += 1;
        unsafe { self.buf.add(self.first).write(chunk) };
    }

    /// The back must have room, see [`Self::try_reserve_back`].
    pub(crate) fn push_back(&mut self, chunk: NonNull<Chunk<T, N>>) {
        assert!(self.first + self.len < self.cap, "no handle room at the back");

        unsafe { self.buf.add(self.first + self.len).write(chunk) };
        self.len += 1;
    }

    pub(crate) fn pop_front(&mut self) -> Option<NonNull<Chunk<T, N>>> {
        if self.len == 0 {
            return None;
        }

        let chunk = unsafe { self.buf.add(self.first).read() };
        self.first += 1;
        self.len -= 1;
        Some(chunk)
    }

    pub(crate) fn pop_back(&mut self) -> Option<NonNull<Chunk<T, N>>> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        Some(unsafe { self.buf.add(self.first + self.len).read() })
    }

    /// Shrinks the handle buffer to the number of live handles.
    pub(crate) fn shrink_to_fit(&mut self) {
        if self.cap == self.len {
            return;
        }

        if self.len == 0 {
            unsafe { self.release_buffer() };
            self.buf = NonNull::dangling();
            self.cap = 0;
            self.first = 0;
            return;
        }

        if self.reallocate(self.len).is_err() {
            // the allocator refused; the larger buffer stays in use
        }
    }

    /// Exchanges buffers and handles, leaving each table its own allocator.
    pub(crate) fn swap_storage(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.buf, &mut other.buf);
        core::mem::swap(&mut self.cap, &mut other.cap);
        core::mem::swap(&mut self.first, &mut other.first);
        core::mem::swap(&mut self.len, &mut other.len);
    }
}

impl<T, const N: usize, A: ChunkAllocator> Drop for ChunkTable<T, N, A> {
    fn drop(&mut self) {
        while let Some(chunk) = self.pop_front() {
            unsafe { self.deallocate_chunk(chunk) };
        }

        unsafe { self.release_buffer() };
    }
}
