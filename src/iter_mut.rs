use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::chunk::{self, Chunk, Head};
use crate::{ChunkAllocator, ChunkCapacity, ChunkDeque, Global, Usize};

/// A mutable iterator over the elements of a ChunkDeque.
///
/// This struct is created by ChunkDeque::iter_mut().
pub struct IterMut<'a, T, const N: usize, A = Global>
where
    T: 'a,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    chunks: NonNull<NonNull<Chunk<T, N>>>,
    head: Head,
    front: usize,
    back: usize,
    marker: PhantomData<&'a mut ChunkDeque<T, N, A>>,
}

const _: [(); core::mem::size_of::<usize>() * 5] =
    [(); core::mem::size_of::<IterMut<usize, 2>>()];

impl<'a, T, const N: usize, A> IterMut<'a, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    pub(crate) fn from_deque(deque: &'a mut ChunkDeque<T, N, A>) -> Self {
        Self {
            chunks: deque.table.handles(),
            head: deque.head,
            front: 0,
            back: deque.len(),
            marker: PhantomData,
        }
    }

    /// # Safety
    /// `index` must be a live element not handed out before.
    #[inline]
    unsafe fn element(&mut self, index: usize) -> &'a mut T {
        let (slot, offset) = chunk::translate::<N>(self.head, index);
        unsafe {
            let chunk = self.chunks.add(slot).read();
            &mut *chunk::slot(chunk, offset)
        }
    }
}

impl<'a, T, const N: usize, A> Iterator for IterMut<'a, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        let out = unsafe { self.element(self.front) };
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
}

impl<T, const N: usize, A> DoubleEndedIterator for IterMut<'_, T, N, A>
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
        Some(unsafe { self.element(self.back) })
    }
}

impl<T, const N: usize, A> ExactSizeIterator for IterMut<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn len(&self) -> usize {
        self.back - self.front
    }
}

impl<T, const N: usize, A> FusedIterator for IterMut<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
}

impl<T, const N: usize, A> core::fmt::Debug for IterMut<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("IterMut").field(&self.len()).finish()
    }
}

unsafe impl<T, const N: usize, A> Send for IterMut<'_, T, N, A>
where
    T: Send,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
}

unsafe impl<T, const N: usize, A> Sync for IterMut<'_, T, N, A>
where
    T: Sync,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
}

#[cfg(test)]
mod tests {
    use crate::ChunkDeque;

    #[test]
    fn iter_mut_forward() {
        let mut deque = ChunkDeque::<usize, 2>::from([0, 1, 2, 3, 4]);
        let sut = deque.iter_mut();
        assert_eq!(
            sut.map(|value| *value).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );

        deque.clear();
        assert_eq!(deque.iter_mut().next(), None);
    }

    #[test]
    fn iter_mut_backward() {
        let mut deque = ChunkDeque::<usize, 2>::from([0, 1, 2, 3, 4]);
        let sut = deque.iter_mut().rev();
        assert_eq!(
            sut.map(|value| *value).collect::<Vec<_>>(),
            vec![4, 3, 2, 1, 0]
        );
    }

    #[test]
    fn iter_mut_writes_through_every_chunk() {
        let mut deque = ChunkDeque::<usize, 3>::new();
        for i in 0..7 {
            deque.push_front(i);
        }
        deque.push_back(100);

        for (i, value) in deque.iter_mut().enumerate() {
            *value = i * 10;
        }

        assert_eq!(deque, [0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[test]
    fn handed_out_references_are_disjoint() {
        let mut deque = ChunkDeque::<usize, 2>::from([1, 2, 3]);

        let mut sut = deque.iter_mut();
        let first = sut.next().unwrap();
        let last = sut.next_back().unwrap();
        let middle = sut.next().unwrap();
        assert_eq!(sut.next(), None);

        core::mem::swap(first, last);
        *middle += 10;

        assert_eq!(deque, [3, 12, 1]);
    }

    #[test]
    fn debug_works_correctly() {
        let mut deque = ChunkDeque::<usize, 2>::from([0, 1, 2]);
        let sut = deque.iter_mut();
        assert_eq!(format!("{sut:?}"), "IterMut(3)");
    }
}
