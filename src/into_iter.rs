use core::iter::FusedIterator;

use crate::{ChunkAllocator, ChunkCapacity, ChunkDeque, Global, Usize};

/// An owning iterator over the elements of a ChunkDeque.
///
/// This struct is created by ChunkDeque::into_iter().
pub struct IntoIter<T, const N: usize, A = Global>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    deque: ChunkDeque<T, N, A>,
}

impl<T, const N: usize, A> IntoIter<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    pub(crate) fn from_deque(deque: ChunkDeque<T, N, A>) -> Self {
        Self { deque }
    }

    /// Returns the remaining elements as a deque.
    pub fn into_deque(self) -> ChunkDeque<T, N, A> {
        self.deque
    }
}

impl<T, const N: usize, A> Clone for IntoIter<T, N, A>
where
    T: Clone,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator + Clone,
{
    fn clone(&self) -> Self {
        Self {
            deque: self.deque.clone(),
        }
    }
}

impl<T, const N: usize, A> Iterator for IntoIter<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.deque.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.deque.len();
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        for _ in 0..n {
            self.deque.pop_front()?;
        }

        self.deque.pop_front()
    }

    #[inline]
    fn last(mut self) -> Option<Self::Item> {
        self.deque.pop_back()
    }

    #[inline]
    fn count(self) -> usize {
        self.deque.len()
    }
}

impl<T, const N: usize, A> DoubleEndedIterator for IntoIter<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.deque.pop_back()
    }
}

impl<T, const N: usize, A> ExactSizeIterator for IntoIter<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn len(&self) -> usize {
        self.deque.len()
    }
}

impl<T, const N: usize, A> FusedIterator for IntoIter<T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
}

impl<T, const N: usize, A> core::fmt::Debug for IntoIter<T, N, A>
where
    T: core::fmt::Debug,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("IntoIter").field(&self.deque).finish()
    }
}
