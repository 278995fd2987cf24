use core::iter::FusedIterator;

use crate::{ChunkAllocator, ChunkCapacity, ChunkDeque, Global, Usize};

/// An iterator over the elements of a ChunkDeque.
///
/// This struct is created by ChunkDeque::iter().
pub struct Iter<'a, T, const N: usize, A = Global>
where
    T: 'a,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    deque: &'a ChunkDeque<T, N, A>,
    front: usize,
    back: usize,
}

const _: [(); core::mem::size_of::<usize>() * 3] = [(); core::mem::size_of::<Iter<usize, 2>>()];

impl<'a, T, const N: usize, A> Iter<'a, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    pub(crate) fn from_deque(deque: &'a ChunkDeque<T, N, A>) -> Self {
        Self {
            deque,
            front: 0,
            back: deque.len(),
        }
    }
}

impl<T, const N: usize, A> Clone for Iter<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T, const N: usize, A> Iterator for Iter<'a, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        let out = unsafe { self.deque.get_unchecked(self.front) };
        self.front += 1;
        Some(out)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }

    #[inline]
    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }

    #[inline]
    fn count(self) -> usize {
        self.len()
    }
}

impl<T, const N: usize, A> DoubleEndedIterator for Iter<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        self.back -= 1;
        Some(unsafe { self.deque.get_unchecked(self.back) })
    }

    #[inline]
    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<T, const N: usize, A> ExactSizeIterator for Iter<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn len(&self) -> usize {
        self.back - self.front
    }
}

impl<T, const N: usize, A> FusedIterator for Iter<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
}

impl<T, const N: usize, A> core::fmt::Debug for Iter<'_, T, N, A>
where
    T: core::fmt::Debug,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Iter")
            .field(&self.clone().collect::<Vec<_>>())
            .field(&self.len())
            .finish()
    }
}
