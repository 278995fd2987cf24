//! # chunk_deque
//!
//! `chunk_deque` implements a **double-ended queue** whose storage is a table of
//! fixed-size chunks, giving `O(1)` access by index together with `O(1)` amortized
//! pushes and pops at both ends, without ever moving the stored elements to grow.
//!
//! ## Features
//! - Random access through a two-level translation: a virtual index is mapped to a
//!   slot of the chunk table and an offset inside that chunk.
//! - Growth at either end only allocates a new chunk and copies chunk handles;
//!   elements stay where they were written.
//! - Chunks left empty at one end are recycled by growth at the other end, so a
//!   deque used as a FIFO queue keeps a bounded footprint.
//! - Pluggable memory supplier through the [`ChunkAllocator`] trait, with fallible
//!   `try_*` variants of every growing operation.
//! - Iterators and `Cursor`s (a position handle supporting `+`, `-`, `+=`, `-=`)
//!   over the elements.
//!
//! ## Example
//! ```rust
//! use chunk_deque::ChunkDeque;
//!
//! let mut deque: ChunkDeque<i64> = ChunkDeque::new();
//! deque.push_back(2);
//! deque.push_front(0);
//! deque.insert(1, 1);
//!
//! assert_eq!(deque.front(), Some(&0));
//! assert_eq!(deque[1], 1);
//! assert_eq!(deque.back(), Some(&2));
//!
//! assert_eq!(deque.remove(1), Some(1));
//! assert_eq!(deque.pop_back(), Some(2));
//! assert_eq!(deque.pop_front(), Some(0));
//! ```

mod alloc;
mod chunk;
mod cursor;
mod cursor_mut;
mod error;
mod into_iter;
mod iter;
mod iter_mut;
mod sailed;
#[cfg(test)]
mod test_util;

pub use crate::alloc::{AllocError, ChunkAllocator, Global};
pub use crate::cursor::Cursor;
pub use crate::cursor_mut::CursorMut;
pub use crate::error::{Error, Result};
pub use crate::into_iter::IntoIter;
pub use crate::iter::Iter;
pub use crate::iter_mut::IterMut;

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use core::{iter as core_iter, mem, ptr};

use crate::chunk::{ChunkTable, Head};

/// Number of elements per chunk when no capacity is spelled out.
pub const DEFAULT_CHUNK_CAPACITY: usize = 10;

pub enum Usize<const N: usize> {}

/// Marks the chunk capacities a [`ChunkDeque`] can be instantiated with.
pub trait ChunkCapacity: crate::sailed::Sailed {}

impl<const N: usize> ChunkCapacity for Usize<N> where Usize<N>: crate::sailed::Sailed {}

/// A double-ended queue stored in a table of fixed-size chunks.
///
/// # Layout
/// The deque owns a chunk table, each entry of which owns a chunk of `N` element
/// slots. Element `0` lives at a movable physical *head* (a table slot and an offset
/// inside that chunk); every other element is found by translating its index relative
/// to the head. The deque tracks three virtual markers: the begin (always index `0`),
/// the end (`len`) and the capacity end (the last slot the table can address from the
/// head). `0 <= len <= capacity` holds between operations.
///
/// # Type Parameters
/// - `T`: The type of elements stored in the deque.
/// - `N`: The number of elements each chunk can hold.
/// - `A`: The allocator chunks and the chunk table are drawn from.
///
/// # Example
/// ```rust
/// use chunk_deque::ChunkDeque;
///
/// let mut deque: ChunkDeque<i64, 4> = ChunkDeque::new();
/// deque.push_back(3);
/// deque.push_front(1);
/// deque.insert(1, 2);
///
/// assert!(!deque.is_empty());
/// assert_eq!(deque.len(), 3);
///
/// assert_eq!(deque.pop_front(), Some(1));
/// assert_eq!(deque.pop_front(), Some(2));
/// assert_eq!(deque.pop_front(), Some(3));
/// ```
pub struct ChunkDeque<T, const N: usize = { DEFAULT_CHUNK_CAPACITY }, A = Global>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    table: ChunkTable<T, N, A>,
    head: Head,
    len: usize,
    capacity: usize,
    marker: PhantomData<T>,
}

unsafe impl<T, const N: usize, A> Send for ChunkDeque<T, N, A>
where
    T: Send,
    A: ChunkAllocator + Send,
    Usize<N>: ChunkCapacity,
{
}

unsafe impl<T, const N: usize, A> Sync for ChunkDeque<T, N, A>
where
    T: Sync,
    A: ChunkAllocator + Sync,
    Usize<N>: ChunkCapacity,
{
}

impl<T, const N: usize> ChunkDeque<T, N, Global>
where
    Usize<N>: ChunkCapacity,
{
    /// Creates a new, empty `ChunkDeque` with no elements and no allocated chunks.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let deque: ChunkDeque<i64> = ChunkDeque::new();
    ///
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.capacity(), 0);
    /// ```
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates an empty deque able to hold at least `capacity` elements without
    /// allocating further chunks.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let deque: ChunkDeque<i64, 10> = ChunkDeque::with_capacity(15);
    ///
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.capacity(), 20);
    /// assert_eq!(deque.chunk_count(), 2);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// Creates a deque holding `len` clones of `value`.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let deque: ChunkDeque<&str> = ChunkDeque::from_elem("x", 3);
    ///
    /// assert_eq!(deque, ["x", "x", "x"]);
    /// ```
    pub fn from_elem(value: T, len: usize) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(value, len, Global)
    }
}

impl<T, const N: usize, A> ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    /// Creates a new, empty `ChunkDeque` drawing its memory from `alloc`.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            table: ChunkTable::new_in(alloc),
            head: Head { slot: 0, offset: 0 },
            len: 0,
            capacity: 0,
            marker: PhantomData,
        }
    }

    /// Creates an empty deque in `alloc` with room for at least `capacity` elements.
    ///
    /// # Panics
    /// Panics if the capacity overflows, aborts if the allocator fails.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(deque) => deque,
            Err(err) => err.raise(),
        }
    }

    /// Fallible version of [`Self::with_capacity_in`].
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        let mut deque = Self::new_in(alloc);
        deque.try_reserve(capacity)?;
        Ok(deque)
    }

    /// Creates a deque in `alloc` holding `len` clones of `value`.
    ///
    /// Should a clone panic, every element built so far is dropped and all memory
    /// is released before the panic continues.
    pub fn from_elem_in(value: T, len: usize, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut deque = Self::with_capacity_in(len, alloc);
        deque.fill_back(core_iter::repeat_n(value, len));
        deque
    }

    /// Returns a reference to the underlying allocator.
    #[inline]
    pub const fn allocator(&self) -> &A {
        self.table.allocator()
    }

    /// Returns the number of elements currently stored in the `ChunkDeque`.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64> = ChunkDeque::new();
    /// deque.push_back(1);
    /// deque.push_back(2);
    ///
    /// assert_eq!(deque.len(), 2);
    /// ```
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if the `ChunkDeque` is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the deque can hold, counted from its first
    /// element, before another chunk has to be attached at the back.
    ///
    /// Popping from the front consumes capacity: the slots left behind belong to
    /// chunks that are recycled once they are wholly unused.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64, 4> = ChunkDeque::new();
    /// deque.push_back(1);
    /// assert_eq!(deque.capacity(), 4);
    ///
    /// deque.pop_front();
    /// assert_eq!(deque.capacity(), 3);
    /// ```
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of chunks currently allocated.
    #[inline]
    pub const fn chunk_count(&self) -> usize {
        self.table.len()
    }

    /// Returns a reference to the element at the specified index, if any.
    ///
    /// # Examples
    /// ```
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64, 4> = ChunkDeque::new();
    /// deque.push_back(10);
    /// deque.push_back(20);
    ///
    /// assert_eq!(deque.get(0), Some(&10));
    /// assert_eq!(deque.get(1), Some(&20));
    /// assert_eq!(deque.get(2), None); // Out of bounds
    /// ```
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            return Some(unsafe { self.get_unchecked(index) });
        }

        None
    }

    /// Returns a mutable reference to the element at the specified index, if any.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            return Some(unsafe { self.get_unchecked_mut(index) });
        }

        None
    }

    /// Returns a reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    /// `index` must be less than [`Self::len`].
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { &*self.slot_ptr(index) }
    }

    /// Returns a mutable reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    /// `index` must be less than [`Self::len`].
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        unsafe { &mut *self.slot_ptr(index) }
    }

    /// Checked access reporting the offending index.
    ///
    /// # Examples
    /// ```
    /// use chunk_deque::{ChunkDeque, Error};
    ///
    /// let deque: ChunkDeque<_> = ChunkDeque::from([1, 2, 3]);
    ///
    /// assert_eq!(deque.at(2), Ok(&3));
    /// assert_eq!(deque.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.get(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Mutable flavour of [`Self::at`].
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.get_mut(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Returns a reference to the first element of the `ChunkDeque`, if any.
    ///
    /// # Examples
    /// ```
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64, 4> = ChunkDeque::new();
    /// deque.push_back(10);
    /// deque.push_back(20);
    ///
    /// assert_eq!(deque.front(), Some(&10));
    ///
    /// deque.pop_front();
    /// assert_eq!(deque.front(), Some(&20));
    ///
    /// deque.pop_front();
    /// assert_eq!(deque.front(), None);
    /// ```
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a mutable reference to the first element of the `ChunkDeque`, if any.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns a reference to the last element of the `ChunkDeque`, if any.
    ///
    /// # Examples
    /// ```
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64, 4> = ChunkDeque::new();
    /// deque.push_back(10);
    /// deque.push_back(20);
    ///
    /// assert_eq!(deque.back(), Some(&20));
    ///
    /// deque.pop_back();
    /// assert_eq!(deque.back(), Some(&10));
    ///
    /// deque.pop_back();
    /// assert_eq!(deque.back(), None);
    /// ```
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.get(self.len.wrapping_sub(1))
    }

    /// Returns a mutable reference to the last element of the `ChunkDeque`, if any.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.len.wrapping_sub(1))
    }

    /// Returns `true` if the deque contains an element equal to `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|candidate| candidate == value)
    }

    /// Adds an element to the back of the `ChunkDeque`.
    ///
    /// If every slot up to the capacity end is taken, a chunk is attached at the back,
    /// recycling a wholly unused front chunk when there is one.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64, 4> = ChunkDeque::new();
    /// deque.push_back(10);
    /// deque.push_back(20);
    ///
    /// assert_eq!(deque.len(), 2);
    ///
    /// assert_eq!(deque.pop_back(), Some(20));
    /// assert_eq!(deque.pop_back(), Some(10));
    /// ```
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.try_push_back(value) {
            err.raise()
        }
    }

    /// Fallible version of [`Self::push_back`]; `value` is dropped on error and the
    /// deque is left as it was.
    pub fn try_push_back(&mut self, value: T) -> Result<()> {
        if self.len == self.capacity {
            self.grow_back(1)?;
        }

        unsafe { self.slot_ptr(self.len).write(value) };
        self.len += 1;

        self.debug_assert_valid();
        Ok(())
    }

    /// Adds an element to the front of the `ChunkDeque`.
    ///
    /// When the head already sits on the very first slot of the table, a chunk is
    /// attached at the front of the table and the head moves to its last slot. Existing
    /// elements never move.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64, 4> = ChunkDeque::new();
    /// deque.push_front(10);
    /// deque.push_front(20);
    ///
    /// assert_eq!(deque.len(), 2);
    ///
    /// assert_eq!(deque.pop_front(), Some(20));
    /// assert_eq!(deque.pop_front(), Some(10));
    /// ```
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.try_push_front(value) {
            err.raise()
        }
    }

    /// Fallible version of [`Self::push_front`]; `value` is dropped on error and the
    /// deque is left as it was.
    pub fn try_push_front(&mut self, value: T) -> Result<()> {
        if self.head.is_origin() {
            self.grow_front()?;
        }

        self.head.retreat::<N>();
        self.capacity += 1;
        self.len += 1;
        unsafe { self.slot_ptr(0).write(value) };

        self.debug_assert_valid();
        Ok(())
    }

    /// Removes and returns the last element of the `ChunkDeque`, if any.
    /// The slot it occupied stays reserved.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        Some(unsafe { self.slot_ptr(self.len).read() })
    }

    /// Removes and returns the first element of the `ChunkDeque`, if any.
    ///
    /// # Examples
    /// ```
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64, 4> = ChunkDeque::new();
    /// deque.push_front(10);
    /// deque.push_front(20);
    ///
    /// assert_eq!(deque.pop_front(), Some(20));
    /// assert_eq!(deque.pop_front(), Some(10));
    /// assert_eq!(deque.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let value = unsafe { self.slot_ptr(0).read() };
        self.head.advance::<N>(1);
        self.capacity -= 1;
        self.len -= 1;

        self.debug_assert_valid();
        Some(value)
    }

    /// Inserts an element at the specified index, shifting the elements on the shorter
    /// side of `index` by one.
    ///
    /// # Panics
    /// - Panics if the `index` is out of bounds (greater than the deque's current length).
    ///
    /// # Examples
    /// ```
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64, 3> = ChunkDeque::new();
    /// deque.push_back(10);
    /// deque.push_back(30);
    /// deque.insert(1, 20);
    ///
    /// assert_eq!(deque, [10, 20, 30]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert(index, value) {
            err.raise()
        }
    }

    /// Fallible version of [`Self::insert`].
    ///
    /// # Panics
    /// - Panics if the `index` is out of bounds (greater than the deque's current length).
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<()> {
        assert!(
            index <= self.len,
            "insertion index (is {index}) should be <= len (is {})",
            self.len
        );

        if index < self.len - index {
            if self.head.is_origin() {
                self.grow_front()?;
            }

            self.head.retreat::<N>();
            self.capacity += 1;
            self.len += 1;
            unsafe { self.copy_slots(1, 0, index) };
        } else {
            if self.len == self.capacity {
                self.grow_back(1)?;
            }

            unsafe { self.copy_slots(index, index + 1, self.len - index) };
            self.len += 1;
        }

        unsafe { self.slot_ptr(index).write(value) };

        self.debug_assert_valid();
        Ok(())
    }

    /// Removes and returns the element at the specified index, closing the gap from the
    /// shorter side.
    ///
    /// # Examples
    /// ```
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i64, 4> = ChunkDeque::from([10, 20, 30, 40, 50]);
    ///
    /// assert_eq!(deque.remove(1), Some(20));
    /// assert_eq!(deque.get(1), Some(&30));
    /// assert_eq!(deque.len(), 4);
    ///
    /// assert_eq!(deque.remove(10), None);
    /// ```
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }

        let value = unsafe { self.slot_ptr(index).read() };
        let tail = self.len - index - 1;

        if index < tail {
            unsafe { self.copy_slots(0, 1, index) };
            self.head.advance::<N>(1);
            self.capacity -= 1;
        } else {
            unsafe { self.copy_slots(index + 1, index, tail) };
        }

        self.len -= 1;

        self.debug_assert_valid();
        Some(value)
    }

    /// Swaps the elements at indices `i` and `j`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(i < self.len, "swap index (is {i}) should be < len (is {})", self.len);
        assert!(j < self.len, "swap index (is {j}) should be < len (is {})", self.len);

        unsafe { ptr::swap(self.slot_ptr(i), self.slot_ptr(j)) };
    }

    /// Exchanges the whole contents of two deques without touching any element.
    ///
    /// Deques with equal allocators trade their chunk tables and markers and keep
    /// their own allocator; otherwise the allocators travel with the storage.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut a: ChunkDeque<_> = ChunkDeque::from([1, 2, 3]);
    /// let mut b: ChunkDeque<_> = ChunkDeque::from([4]);
    ///
    /// a.swap_with(&mut b);
    ///
    /// assert_eq!(a, [4]);
    /// assert_eq!(b, [1, 2, 3]);
    /// ```
    pub fn swap_with(&mut self, other: &mut Self)
    where
        A: PartialEq,
    {
        if self.table.allocator() != other.table.allocator() {
            mem::swap(self, other);
            return;
        }

        self.table.swap_storage(&mut other.table);
        mem::swap(&mut self.head, &mut other.head);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Moves all elements from the `other` deque to the back of this one, leaving
    /// `other` empty with its chunks still allocated.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque1: ChunkDeque<i32, 4> = ChunkDeque::from([1, 2]);
    /// let mut deque2: ChunkDeque<i32, 4> = ChunkDeque::from([3, 4]);
    ///
    /// deque1.append(&mut deque2);
    ///
    /// assert_eq!(deque1, [1, 2, 3, 4]);
    /// assert!(deque2.is_empty());
    /// ```
    pub fn append<B>(&mut self, other: &mut ChunkDeque<T, N, B>)
    where
        B: ChunkAllocator,
    {
        self.reserve(other.len());
        self.fill_back(core_iter::from_fn(|| other.pop_front()));
    }

    /// Reserves room for at least `additional` more elements at the back.
    ///
    /// # Panics
    /// Panics if the capacity overflows, aborts if the allocator fails.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            err.raise()
        }
    }

    /// Fallible version of [`Self::reserve`]. On error the elements are untouched.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::{ChunkDeque, Error};
    ///
    /// let mut deque: ChunkDeque<u8> = ChunkDeque::new();
    ///
    /// assert_eq!(deque.try_reserve(25), Ok(()));
    /// assert_eq!(deque.capacity(), 30);
    /// assert_eq!(deque.try_reserve(usize::MAX), Err(Error::CapacityOverflow));
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;

        if required <= self.capacity {
            return Ok(());
        }

        self.grow_back((required - self.capacity).div_ceil(N))
    }

    /// Releases every chunk no element lives in, along with the spare room of the
    /// chunk table.
    pub fn shrink_to_fit(&mut self) {
        if self.len == 0 {
            while let Some(chunk) = self.table.pop_back() {
                unsafe { self.table.deallocate_chunk(chunk) };
            }

            self.head = Head::default();
            self.capacity = 0;
        } else {
            for _ in 0..self.head.slot {
                if let Some(chunk) = self.table.pop_front() {
                    unsafe { self.table.deallocate_chunk(chunk) };
                }
            }

            self.head.slot = 0;
            while self.capacity - self.len >= N {
                if let Some(chunk) = self.table.pop_back() {
                    unsafe { self.table.deallocate_chunk(chunk) };
                }

                self.capacity -= N;
            }
        }

        self.table.shrink_to_fit();
        self.debug_assert_valid();
    }

    /// Shortens the deque to `len` elements, dropping the rest. Their slots stay
    /// reserved. Does nothing if the deque is not longer than `len`.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<_> = ChunkDeque::from([1, 2, 3, 4]);
    /// let capacity = deque.capacity();
    ///
    /// deque.truncate(1);
    ///
    /// assert_eq!(deque, [1]);
    /// assert_eq!(deque.capacity(), capacity);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        let old_len = mem::replace(&mut self.len, len);
        if mem::needs_drop::<T>() {
            for index in len..old_len {
                unsafe { ptr::drop_in_place(self.slot_ptr(index)) };
            }
        }
    }

    /// Resizes the deque in place so that its length equals `new_len`, filling new
    /// slots with clones of `value`.
    ///
    /// Shrinking drops the trailing elements and keeps their slots reserved. Should a
    /// clone panic while growing, the clones already written are dropped again and the
    /// deque keeps its former length.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<_, 2> = ChunkDeque::from([1, 2]);
    ///
    /// deque.resize(5, 0);
    /// assert_eq!(deque, [1, 2, 0, 0, 0]);
    ///
    /// deque.resize(1, 0);
    /// assert_eq!(deque, [1]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        let additional = new_len - self.len;
        self.reserve(additional);
        self.fill_back(core_iter::repeat_n(value, additional));
    }

    /// Resizes the deque in place, filling new slots with the values returned by `f`.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        let additional = new_len - self.len;
        self.reserve(additional);
        self.fill_back(core_iter::repeat_with(f).take(additional));
    }

    /// Removes all elements from the `ChunkDeque`; the capacity is kept.
    ///
    /// # Example
    /// ```rust
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<i32, 4> = ChunkDeque::from([1, 2, 3]);
    ///
    /// deque.clear();
    ///
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.front(), None);
    /// assert_eq!(deque.capacity(), 4);
    /// ```
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Provides an iterator over the deque's elements.
    ///
    /// # Examples
    /// ```
    /// use chunk_deque::ChunkDeque;
    ///
    /// let deque: ChunkDeque<_, 2> = ChunkDeque::from([0, 1, 2]);
    ///
    /// let mut iter = deque.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, N, A> {
        Iter::from_deque(self)
    }

    /// Provides a mutable iterator over the deque's elements.
    ///
    /// # Examples
    /// ```
    /// use chunk_deque::ChunkDeque;
    ///
    /// let mut deque: ChunkDeque<_, 2> = ChunkDeque::from([0, 1, 2]);
    /// deque.iter_mut().for_each(|value| *value *= 10);
    ///
    /// assert_eq!(deque, [0, 10, 20]);
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, N, A> {
        IterMut::from_deque(self)
    }

    /// Provides a cursor at the front element.
    ///
    /// The cursor is pointing to the “ghost” non-element if the deque is empty.
    #[inline]
    pub fn cursor_front(&self) -> Cursor<'_, T, N, A> {
        Cursor::from_index(self, 0)
    }

    /// Provides a cursor at the back element.
    ///
    /// The cursor is pointing to the “ghost” non-element if the deque is empty.
    #[inline]
    pub fn cursor_back(&self) -> Cursor<'_, T, N, A> {
        Cursor::from_index(self, self.len.saturating_sub(1))
    }

    /// Provides a cursor at `index`; `index == len` yields the “ghost” position past
    /// the last element.
    ///
    /// # Panics
    /// Panics if `index > len`.
    #[inline]
    pub fn cursor_at(&self, index: usize) -> Cursor<'_, T, N, A> {
        assert!(index <= self.len, "cursor index (is {index}) should be <= len (is {})", self.len);
        Cursor::from_index(self, index)
    }

    /// Provides a mutable cursor at the front element.
    ///
    /// The cursor is pointing to the “ghost” non-element if the deque is empty.
    #[inline]
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, N, A> {
        CursorMut::from_index(self, 0)
    }

    /// Provides a mutable cursor at the back element.
    ///
    /// The cursor is pointing to the “ghost” non-element if the deque is empty.
    #[inline]
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, N, A> {
        let index = self.len.saturating_sub(1);
        CursorMut::from_index(self, index)
    }

    /// Mutable flavour of [`Self::cursor_at`].
    ///
    /// # Panics
    /// Panics if `index > len`.
    #[inline]
    pub fn cursor_at_mut(&mut self, index: usize) -> CursorMut<'_, T, N, A> {
        assert!(index <= self.len, "cursor index (is {index}) should be <= len (is {})", self.len);
        CursorMut::from_index(self, index)
    }

    /// Address of the slot holding virtual index `index`.
    ///
    /// # Safety
    /// `index` must be less than the capacity.
    #[inline]
    unsafe fn slot_ptr(&self, index: usize) -> *mut T {
        debug_assert!(index < self.capacity);

        let (slot, offset) = chunk::translate::<N>(self.head, index);
        unsafe { chunk::slot(self.table.chunk(slot), offset) }
    }

    /// Bitwise moves `count` slots from `src` to `dst`, overlapping ranges included.
    ///
    /// # Safety
    /// Both ranges must lie below the capacity. Source slots that are not overwritten
    /// are left logically uninitialized.
    unsafe fn copy_slots(&mut self, src: usize, dst: usize, count: usize) {
        if src == dst || count == 0 {
            return;
        }

        let step = |i: usize| unsafe {
            ptr::copy_nonoverlapping(self.slot_ptr(src + i), self.slot_ptr(dst + i), 1);
        };

        if dst < src {
            (0..count).for_each(step);
        } else {
            (0..count).rev().for_each(step);
        }
    }

    /// Writes `items` into the reserved slots past the last element.
    ///
    /// Should `items` panic, the elements written by this call are dropped before the
    /// panic continues.
    fn fill_back<I>(&mut self, items: I)
    where
        I: Iterator<Item = T>,
    {
        let mut guard = Rollback {
            len: self.len,
            deque: &mut *self,
        };

        for item in items {
            let deque = &mut *guard.deque;
            assert!(deque.len < deque.capacity, "filled past the reserved capacity");

            unsafe { deque.slot_ptr(deque.len).write(item) };
            deque.len += 1;
        }

        mem::forget(guard);
        self.debug_assert_valid();
    }

    /// Makes `chunks` more chunks addressable at the back, first recycling the chunks
    /// wholly before the head. On error no element has moved and the capacity has not
    /// shrunk.
    fn grow_back(&mut self, chunks: usize) -> Result<()> {
        let capacity = chunks
            .checked_mul(N)
            .and_then(|slots| slots.checked_add(self.capacity))
            .ok_or(Error::CapacityOverflow)?;

        self.table.try_reserve_back(chunks)?;

        let recycled = self.head.slot.min(chunks);
        for _ in 0..recycled {
            if let Some(chunk) = self.table.pop_front() {
                self.table.push_back(chunk);
            }
        }

        self.head.slot -= recycled;
        self.capacity += recycled * N;

        for allocated in 0..chunks - recycled {
            match self.table.allocate_chunk() {
                Ok(chunk) => self.table.push_back(chunk),
                Err(err) => {
                    for _ in 0..allocated {
                        if let Some(chunk) = self.table.pop_back() {
                            unsafe { self.table.deallocate_chunk(chunk) };
                        }
                    }

                    return Err(err);
                }
            }
        }

        self.capacity = capacity;
        Ok(())
    }

    /// Attaches one chunk in front of the table, taking the last chunk when no element
    /// lives in it. The head keeps pointing at the same physical slot.
    fn grow_front(&mut self) -> Result<()> {
        self.table.try_reserve_front(1)?;

        let recycled = if self.capacity - self.len >= N {
            self.table.pop_back()
        } else {
            None
        };

        let chunk = match recycled {
            Some(chunk) => {
                self.capacity -= N;
                chunk
            }
            None => self.table.allocate_chunk()?,
        };

        self.table.push_front(chunk);
        self.head.slot += 1;
        Ok(())
    }

    #[inline]
    fn debug_assert_valid(&self) {
        debug_assert!(
            self.len <= self.capacity,
            "end marker ({}) past the capacity end ({})",
            self.len,
            self.capacity
        );
        debug_assert_eq!(
            self.head.linear::<N>() + self.capacity,
            self.table.len() * N,
            "head and capacity end do not span the chunk table"
        );
    }
}

struct Rollback<'a, T, const N: usize, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    deque: &'a mut ChunkDeque<T, N, A>,
    len: usize,
}

impl<T, const N: usize, A> Drop for Rollback<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn drop(&mut self) {
        self.deque.truncate(self.len);
    }
}

impl<T, const N: usize, A> Drop for ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn drop(&mut self) {
        self.truncate(0);
    }
}

impl<T, const N: usize, const M: usize> From<[T; M]> for ChunkDeque<T, N>
where
    Usize<N>: ChunkCapacity,
{
    fn from(values: [T; M]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, const N: usize> From<Vec<T>> for ChunkDeque<T, N>
where
    Usize<N>: ChunkCapacity,
{
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<T, const N: usize, A> FromIterator<T> for ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut this = Self::new_in(A::default());
        this.extend(iter);
        this
    }
}

impl<T, const N: usize, A> Extend<T> for ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        iter.for_each(|value| self.push_back(value));
    }
}

impl<'a, T, const N: usize, A> Extend<&'a T> for ChunkDeque<T, N, A>
where
    T: Clone,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T, const N: usize, A> Default for ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator + Default,
{
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, const N: usize, A> Clone for ChunkDeque<T, N, A>
where
    T: Clone,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator + Clone,
{
    /// Returns a deep copy holding as many chunks as `self`.
    fn clone(&self) -> Self {
        let slots = self.chunk_count() * N;
        let mut deque = Self::with_capacity_in(slots, self.allocator().clone());
        deque.fill_back(self.iter().cloned());
        deque
    }

    /// Makes `self` equal to `source`, reusing the elements already in place: the
    /// common prefix is assigned element-wise, the surplus is dropped, and missing
    /// elements are cloned into reserved slots.
    fn clone_from(&mut self, source: &Self) {
        self.truncate(source.len);

        let common = self.len;
        for (target, value) in self.iter_mut().zip(source.iter()) {
            target.clone_from(value);
        }

        self.reserve(source.len - common);
        self.fill_back(source.iter().skip(common).cloned());
    }
}

impl<T, const N: usize, A> Index<usize> for ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => out_of_bounds(index, self.len),
        }
    }
}

impl<T, const N: usize, A> IndexMut<usize> for ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => out_of_bounds(index, len),
        }
    }
}

#[cold]
#[track_caller]
fn out_of_bounds(index: usize, len: usize) -> ! {
    panic!("{}", Error::OutOfRange { index, len })
}

impl<T, const N: usize, const M: usize, A> PartialEq<[T; M]> for ChunkDeque<T, N, A>
where
    T: PartialEq,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn eq(&self, other: &[T; M]) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T, const N: usize, A> PartialEq<&[T]> for ChunkDeque<T, N, A>
where
    T: PartialEq,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn eq(&self, other: &&[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, const N: usize, A> PartialEq<[T]> for ChunkDeque<T, N, A>
where
    T: PartialEq,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T, const N: usize, A> PartialEq for ChunkDeque<T, N, A>
where
    T: PartialEq,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T, const N: usize, A> Eq for ChunkDeque<T, N, A>
where
    T: Eq,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
}

impl<T, const N: usize, A> PartialOrd for ChunkDeque<T, N, A>
where
    T: PartialOrd,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T, const N: usize, A> Ord for ChunkDeque<T, N, A>
where
    T: Ord,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T, const N: usize, A> Hash for ChunkDeque<T, N, A>
where
    T: Hash,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        self.iter().for_each(|v| v.hash(state));
    }
}

impl<T, const N: usize, A> core::fmt::Debug for ChunkDeque<T, N, A>
where
    T: core::fmt::Debug,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, const N: usize, A> IntoIterator for ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Item = T;
    type IntoIter = IntoIter<T, N, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::from_deque(self)
    }
}

impl<'a, T, const N: usize, A> IntoIterator for &'a ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N, A>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::from_deque(self)
    }
}

impl<'a, T, const N: usize, A> IntoIterator for &'a mut ChunkDeque<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, N, A>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut::from_deque(self)
    }
}
