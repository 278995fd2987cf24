use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::{ChunkAllocator, ChunkCapacity, ChunkDeque, Global, Usize};

/// A cursor over a ChunkDeque.
///
/// A Cursor is like an iterator, except that it can freely seek back-and-forth and
/// jump by any distance in constant time.
/// Cursors index in a logically circular way: there is a “ghost” non-element at index
/// `len` that yields None between the back and the front of the deque.
/// When created, cursors start at the front of the deque, or the “ghost” non-element if
/// the deque is empty.
///
/// # Example
/// ```rust
/// use chunk_deque::ChunkDeque;
///
/// let deque: ChunkDeque<_, 2> = ChunkDeque::from([0, 1, 2, 3, 4]);
///
/// let begin = deque.cursor_front();
/// let mut sut = begin + 3;
/// assert_eq!(sut.current(), Some(&3));
///
/// sut -= 2;
/// assert_eq!(sut.current(), Some(&1));
/// assert_eq!(sut - begin, 1);
/// ```
pub struct Cursor<'a, T, const N: usize, A = Global>
where
    T: 'a,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    deque: &'a ChunkDeque<T, N, A>,
    index: usize,
}

const _: [(); core::mem::size_of::<usize>() * 2] = [(); core::mem::size_of::<Cursor<usize, 2>>()];

impl<'a, T, const N: usize, A> Cursor<'a, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    pub(crate) fn from_index(deque: &'a ChunkDeque<T, N, A>, index: usize) -> Self {
        debug_assert!(index <= deque.len());
        Self { deque, index }
    }

    pub fn as_deque(&self) -> &'a ChunkDeque<T, N, A> {
        self.deque
    }

    pub fn back(&self) -> Option<&'a T> {
        self.deque.back()
    }

    pub fn current(&self) -> Option<&'a T> {
        self.deque.get(self.index)
    }

    pub fn front(&self) -> Option<&'a T> {
        self.deque.front()
    }

    /// Returns the index of the current element, or None at the “ghost” non-element.
    pub fn index(&self) -> Option<usize> {
        (self.index < self.deque.len()).then_some(self.index)
    }

    /// Returns the raw position, `len` standing for the “ghost” non-element.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn move_next(&mut self) {
        self.index = next_index(self.index, self.deque.len());
    }

    pub fn move_prev(&mut self) {
        self.index = prev_index(self.index, self.deque.len());
    }

    pub fn peek_next(&self) -> Option<&'a T> {
        self.deque.get(next_index(self.index, self.deque.len()))
    }

    pub fn peek_prev(&self) -> Option<&'a T> {
        self.deque.get(prev_index(self.index, self.deque.len()))
    }
}

/// Position after `index` on the circle `0..=len`.
#[inline]
pub(crate) const fn next_index(index: usize, len: usize) -> usize {
    if index >= len { 0 } else { index + 1 }
}

/// Position before `index` on the circle `0..=len`.
#[inline]
pub(crate) const fn prev_index(index: usize, len: usize) -> usize {
    if index == 0 { len } else { index - 1 }
}

/// Moves `index` by `offset` slots, staying within `0..=len`.
#[inline]
#[track_caller]
pub(crate) fn offset_index(index: usize, offset: isize, len: usize) -> usize {
    match index.checked_add_signed(offset) {
        Some(target) if target <= len => target,
        _ => panic!("cursor moved out of range: {index} {offset:+} not in 0..={len}"),
    }
}

impl<T, const N: usize, A> Clone for Cursor<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize, A> Copy for Cursor<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
}

impl<T, const N: usize, A> PartialEq for Cursor<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.deque, other.deque) && self.index == other.index
    }
}

impl<T, const N: usize, A> Eq for Cursor<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
}

impl<T, const N: usize, A> Add<usize> for Cursor<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Output = Self;

    /// # Panics
    /// Panics if the cursor would move past the “ghost” non-element.
    #[track_caller]
    fn add(mut self, rhs: usize) -> Self {
        self += rhs;
        self
    }
}

impl<T, const N: usize, A> Sub<usize> for Cursor<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Output = Self;

    /// # Panics
    /// Panics if the cursor would move before the front.
    #[track_caller]
    fn sub(mut self, rhs: usize) -> Self {
        self -= rhs;
        self
    }
}

impl<T, const N: usize, A> AddAssign<usize> for Cursor<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    #[track_caller]
    fn add_assign(&mut self, rhs: usize) {
        let offset = isize::try_from(rhs).unwrap_or(isize::MAX);
        self.index = offset_index(self.index, offset, self.deque.len());
    }
}

impl<T, const N: usize, A> SubAssign<usize> for Cursor<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    #[track_caller]
    fn sub_assign(&mut self, rhs: usize) {
        let offset = isize::try_from(rhs).map_or(isize::MIN, |rhs| -rhs);
        self.index = offset_index(self.index, offset, self.deque.len());
    }
}

impl<T, const N: usize, A> Sub for Cursor<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Output = isize;

    /// Signed distance between two cursors over the same deque.
    ///
    /// # Panics
    /// Panics if the cursors belong to different deques.
    #[track_caller]
    fn sub(self, rhs: Self) -> isize {
        assert!(
            core::ptr::eq(self.deque, rhs.deque),
            "cursors over different deques"
        );

        self.index as isize - rhs.index as isize
    }
}

impl<T, const N: usize, A> core::fmt::Debug for Cursor<'_, T, N, A>
where
    T: core::fmt::Debug,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Cursor")
            .field(self.deque)
            .field(&self.index)
            .finish()
    }
}
