use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::cursor::{next_index, offset_index, prev_index};
use crate::{ChunkAllocator, ChunkCapacity, ChunkDeque, Cursor, Global, Usize};

/// A cursor over a ChunkDeque with editing operations.
///
/// A CursorMut is like an iterator, except that it can freely seek back-and-forth, and can
/// safely mutate the deque during iteration. This is because the lifetime of its yielded
/// references is tied to its own lifetime, instead of just the underlying deque.
/// Cursors index in a logically circular way: there is a “ghost” non-element at index
/// `len` that yields None between the back and the front of the deque.
///
/// # Example
/// ```rust
/// use chunk_deque::ChunkDeque;
///
/// let mut deque: ChunkDeque<_, 2> = ChunkDeque::from([1, 2, 4]);
///
/// let mut sut = deque.cursor_at_mut(2);
/// sut.insert(3);
/// assert_eq!(sut.current(), Some(&mut 3));
///
/// sut -= 2;
/// assert_eq!(sut.remove_current(), Some(1));
/// assert_eq!(sut.current(), Some(&mut 2));
///
/// assert_eq!(deque, [2, 3, 4]);
/// ```
pub struct CursorMut<'a, T, const N: usize, A = Global>
where
    T: 'a,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    deque: &'a mut ChunkDeque<T, N, A>,
    index: usize,
}

const _: [(); core::mem::size_of::<usize>() * 2] =
    [(); core::mem::size_of::<CursorMut<usize, 2>>()];

impl<'a, T, const N: usize, A> CursorMut<'a, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    pub(crate) fn from_index(deque: &'a mut ChunkDeque<T, N, A>, index: usize) -> Self {
        debug_assert!(index <= deque.len());
        Self { deque, index }
    }

    /// Returns a read-only cursor at the same position, valid while this one is borrowed.
    pub fn as_cursor(&self) -> Cursor<'_, T, N, A> {
        Cursor::from_index(self.deque, self.index)
    }

    pub fn as_deque(&self) -> &ChunkDeque<T, N, A> {
        self.deque
    }

    pub fn back(&self) -> Option<&T> {
        self.deque.back()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.deque.back_mut()
    }

    pub fn current(&mut self) -> Option<&mut T> {
        self.deque.get_mut(self.index)
    }

    pub fn front(&self) -> Option<&T> {
        self.deque.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.deque.front_mut()
    }

    /// Returns the index of the current element, or None at the “ghost” non-element.
    pub fn index(&self) -> Option<usize> {
        (!self.is_ghost()).then_some(self.index)
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

    pub fn peek_next(&mut self) -> Option<&mut T> {
        let index = next_index(self.index, self.deque.len());
        self.deque.get_mut(index)
    }

    pub fn peek_prev(&mut self) -> Option<&mut T> {
        let index = prev_index(self.index, self.deque.len());
        self.deque.get_mut(index)
    }

    /// Inserts `value` at the cursor position; the cursor then points at it.
    ///
    /// At the “ghost” non-element the value is appended at the back.
    pub fn insert(&mut self, value: T) {
        self.deque.insert(self.index, value);
    }

    /// Inserts `value` just before the current element; the cursor keeps pointing at
    /// the same element.
    ///
    /// At the “ghost” non-element the value is appended at the back.
    pub fn insert_before(&mut self, value: T) {
        self.deque.insert(self.index, value);
        self.index += 1;
    }

    /// Inserts `value` just after the current element; the cursor keeps pointing at
    /// the same element.
    ///
    /// At the “ghost” non-element the value is prepended at the front.
    pub fn insert_after(&mut self, value: T) {
        if self.is_ghost() {
            self.push_front(value);
            return;
        }

        self.deque.insert(self.index + 1, value);
    }

    /// Removes the current element and returns it; the cursor then points at the
    /// element that followed, or the “ghost” non-element.
    pub fn remove_current(&mut self) -> Option<T> {
        self.deque.remove(self.index)
    }

    pub fn push_front(&mut self, value: T) {
        self.deque.push_front(value);
        self.index += 1;
    }

    pub fn push_back(&mut self, value: T) {
        let is_ghost = self.is_ghost();
        self.deque.push_back(value);

        if is_ghost {
            self.index += 1;
        }
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let out = self.deque.pop_front()?;
        self.index = self.index.saturating_sub(1);
        Some(out)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let out = self.deque.pop_back()?;
        self.index = self.index.min(self.deque.len());
        Some(out)
    }

    #[inline]
    fn is_ghost(&self) -> bool {
        self.index >= self.deque.len()
    }
}

impl<T, const N: usize, A> Add<usize> for CursorMut<'_, T, N, A>
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

impl<T, const N: usize, A> Sub<usize> for CursorMut<'_, T, N, A>
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

impl<T, const N: usize, A> AddAssign<usize> for CursorMut<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    /// # Panics
    /// Panics if the cursor would move past the “ghost” non-element.
    #[track_caller]
    fn add_assign(&mut self, rhs: usize) {
        let offset = isize::try_from(rhs).unwrap_or(isize::MAX);
        self.index = offset_index(self.index, offset, self.deque.len());
    }
}

impl<T, const N: usize, A> SubAssign<usize> for CursorMut<'_, T, N, A>
where
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    /// # Panics
    /// Panics if the cursor would move before the front.
    #[track_caller]
    fn sub_assign(&mut self, rhs: usize) {
        let offset = isize::try_from(rhs).map_or(isize::MIN, |rhs| -rhs);
        self.index = offset_index(self.index, offset, self.deque.len());
    }
}

impl<T, const N: usize, A> core::fmt::Debug for CursorMut<'_, T, N, A>
where
    T: core::fmt::Debug,
    Usize<N>: ChunkCapacity,
    A: ChunkAllocator,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CursorMut")
            .field("deque", self.deque)
            .field("current", &self.deque.get(self.index))
            .field("index", &self.index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Not;

    use quickcheck_macros::quickcheck;

    use crate::{ChunkCapacity, ChunkDeque, Usize};

    #[quickcheck]
    fn test_cursor_front_as_deque(seed: Vec<i32>) {
        fn _test<const N: usize>(seed: &[i32])
        where
            Usize<N>: ChunkCapacity,
        {
            let mut deque = ChunkDeque::<_, N>::from_iter(seed.iter().copied());
            let ptr = &deque as *const _;

            let sut = deque.cursor_front_mut();
            assert_eq!(sut.as_deque() as *const _, ptr);
            assert_eq!(sut.as_cursor().as_deque() as *const _, ptr);
        }

        _test::<1>(&seed);
        _test::<2>(&seed);
        _test::<3>(&seed);
        _test::<4>(&seed);
        _test::<5>(&seed);
        _test::<8>(&seed);
        _test::<16>(&seed);
        _test::<32>(&seed);
    }

    #[quickcheck]
    fn test_cursor_front_move_next(seed: Vec<i32>) {
        fn _test<const N: usize>(seed: &[i32])
        where
            Usize<N>: ChunkCapacity,
        {
            let mut deque = ChunkDeque::<_, N>::from_iter(seed.iter().copied());
            let mut sut = deque.cursor_front_mut();

            assert_eq!(sut.index(), seed.is_empty().not().then_some(0));
            assert_eq!(sut.current(), seed.first().copied().as_mut());
            assert_eq!(sut.peek_prev(), None);
            assert_eq!(sut.peek_next(), seed.get(1).copied().as_mut());

            for _ in 0..2 {
                for i in 0..seed.len() {
                    assert_eq!(sut.index(), Some(i));
                    assert_eq!(sut.current(), seed.get(i).copied().as_mut());
                    assert_eq!(
                        sut.peek_prev(),
                        seed.get(i.wrapping_sub(1)).copied().as_mut()
                    );
                    assert_eq!(sut.peek_next(), seed.get(i + 1).copied().as_mut());

                    sut.move_next();
                }

                assert_eq!(sut.index(), None);
                assert_eq!(sut.current(), None);
                assert_eq!(sut.peek_prev(), seed.last().copied().as_mut());
                assert_eq!(sut.peek_next(), seed.first().copied().as_mut());

                sut.move_next();
            }
        }

        _test::<1>(&seed);
        _test::<2>(&seed);
        _test::<3>(&seed);
        _test::<4>(&seed);
        _test::<5>(&seed);
        _test::<8>(&seed);
        _test::<16>(&seed);
        _test::<32>(&seed);
    }

    #[quickcheck]
    fn test_cursor_back_move_prev(seed: Vec<i32>) {
        fn _test<const N: usize>(seed: &[i32])
        where
            Usize<N>: ChunkCapacity,
        {
            let mut deque = ChunkDeque::<_, N>::from_iter(seed.iter().copied());
            let mut sut = deque.cursor_back_mut();

            assert_eq!(sut.current(), seed.last().copied().as_mut());
            if seed.is_empty() {
                return;
            }

            for _ in 0..2 {
                for i in (0..seed.len()).rev() {
                    assert_eq!(sut.index(), Some(i));
                    assert_eq!(sut.current(), seed.get(i).copied().as_mut());
                    sut.move_prev();
                }

                assert_eq!(sut.index(), None);
                assert_eq!(sut.peek_prev(), seed.last().copied().as_mut());
                assert_eq!(sut.peek_next(), seed.first().copied().as_mut());

                sut.move_prev();
            }
        }

        _test::<1>(&seed);
        _test::<2>(&seed);
        _test::<3>(&seed);
        _test::<4>(&seed);
        _test::<5>(&seed);
        _test::<8>(&seed);
        _test::<16>(&seed);
        _test::<32>(&seed);
    }

    #[quickcheck]
    fn test_cursor_front_insert_before(seed: Vec<i32>) {
        fn _test<const N: usize>(seed: &[i32])
        where
            Usize<N>: ChunkCapacity,
        {
            let mut deque = ChunkDeque::<i32, N>::from_iter(seed.iter().copied());
            let mut sut = deque.cursor_front_mut();

            let begin = -8;
            for (i, value) in (begin..0).enumerate() {
                sut.insert_before(value);

                assert_eq!(sut.index(), seed.is_empty().not().then_some(i + 1));
                assert_eq!(sut.current(), seed.first().copied().as_mut());
                assert_eq!(sut.peek_prev(), Some(&mut value.clone()));
                if seed.is_empty() {
                    assert_eq!(sut.peek_next(), Some(&mut begin.clone()));
                } else {
                    assert_eq!(sut.peek_next(), seed.get(1).copied().as_mut());
                }
            }

            let expected: Vec<_> = (begin..0).chain(seed.iter().copied()).collect();
            assert_eq!(deque, expected.as_slice());
        }

        _test::<1>(&seed);
        _test::<2>(&seed);
        _test::<3>(&seed);
        _test::<4>(&seed);
        _test::<5>(&seed);
        _test::<8>(&seed);
        _test::<16>(&seed);
        _test::<32>(&seed);
    }

    #[quickcheck]
    fn test_cursor_front_insert_after(seed: Vec<i32>) {
        fn _test<const N: usize>(seed: &[i32])
        where
            Usize<N>: ChunkCapacity,
        {
            let mut deque = ChunkDeque::<i32, N>::from_iter(seed.iter().copied());
            let mut sut = deque.cursor_front_mut();

            let begin = -8;
            for value in begin..0 {
                sut.insert_after(value);
                assert_eq!(sut.index(), seed.is_empty().not().then_some(0));
                assert_eq!(sut.current(), seed.first().copied().as_mut());
                if seed.is_empty() {
                    assert_eq!(sut.peek_prev(), Some(&mut begin.clone()));
                } else {
                    assert_eq!(sut.peek_prev(), None);
                }
                assert_eq!(sut.peek_next(), Some(&mut value.clone()));
            }
        }

        _test::<1>(&seed);
        _test::<2>(&seed);
        _test::<3>(&seed);
        _test::<4>(&seed);
        _test::<5>(&seed);
        _test::<8>(&seed);
        _test::<16>(&seed);
        _test::<32>(&seed);
    }

    #[quickcheck]
    fn test_cursor_insert_lands_on_inserted(seed: Vec<i32>, position: usize) {
        fn _test<const N: usize>(seed: &[i32], position: usize)
        where
            Usize<N>: ChunkCapacity,
        {
            let position = position % (seed.len() + 1);
            let mut deque = ChunkDeque::<i32, N>::from_iter(seed.iter().copied());
            let mut sut = deque.cursor_at_mut(position);

            sut.insert(i32::MIN);
            assert_eq!(sut.index(), Some(position));
            assert_eq!(sut.current(), Some(&mut i32::MIN));
            assert_eq!(sut.peek_next(), seed.get(position).copied().as_mut());

            let mut expected = seed.to_vec();
            expected.insert(position, i32::MIN);
            assert_eq!(deque, expected.as_slice());
        }

        _test::<1>(&seed, position);
        _test::<2>(&seed, position);
        _test::<3>(&seed, position);
        _test::<4>(&seed, position);
        _test::<5>(&seed, position);
        _test::<8>(&seed, position);
        _test::<16>(&seed, position);
        _test::<32>(&seed, position);
    }

    #[quickcheck]
    fn test_cursor_remove_current_drains(seed: Vec<i32>, position: usize) {
        fn _test<const N: usize>(seed: &[i32], position: usize)
        where
            Usize<N>: ChunkCapacity,
        {
            let position = position % (seed.len() + 1);
            let mut deque = ChunkDeque::<i32, N>::from_iter(seed.iter().copied());
            let mut sut = deque.cursor_at_mut(position);

            for expected in &seed[position..] {
                assert_eq!(sut.remove_current(), Some(*expected));
                assert_eq!(sut.index(), (position < sut.as_deque().len()).then_some(position));
            }

            assert_eq!(sut.remove_current(), None);
            assert_eq!(sut.index(), None);
            assert_eq!(deque, &seed[..position]);
        }

        _test::<1>(&seed, position);
        _test::<2>(&seed, position);
        _test::<3>(&seed, position);
        _test::<4>(&seed, position);
        _test::<5>(&seed, position);
        _test::<8>(&seed, position);
        _test::<16>(&seed, position);
        _test::<32>(&seed, position);
    }

    #[test]
    fn cursor_keeps_its_element_across_end_operations() {
        let mut deque = ChunkDeque::<i32, 2>::from([1, 2, 3]);
        let mut sut = deque.cursor_at_mut(1);

        sut.push_front(0);
        sut.push_back(4);
        assert_eq!(sut.index(), Some(2));
        assert_eq!(sut.current(), Some(&mut 2));

        assert_eq!(sut.pop_front(), Some(0));
        assert_eq!(sut.pop_back(), Some(4));
        assert_eq!(sut.current(), Some(&mut 2));

        assert_eq!(sut.pop_front(), Some(1));
        assert_eq!(sut.index(), Some(0));
        assert_eq!(sut.current(), Some(&mut 2));

        assert_eq!(sut.pop_back(), Some(3));
        assert_eq!(sut.pop_back(), Some(2));
        assert_eq!(sut.index(), None);
        assert_eq!(sut.pop_front(), None);
        assert_eq!(sut.position(), 0);
    }

    #[test]
    fn ghost_stays_ghost_across_end_operations() {
        let mut deque = ChunkDeque::<i32, 2>::from([1, 2]);
        let mut sut = deque.cursor_at_mut(2);

        sut.push_back(3);
        assert_eq!(sut.index(), None);
        sut.push_front(0);
        assert_eq!(sut.index(), None);
        sut.insert_before(4);
        assert_eq!(sut.index(), None);
        sut.insert_after(-1);
        assert_eq!(sut.index(), None);

        assert_eq!(sut.front(), Some(&-1));
        assert_eq!(sut.back(), Some(&4));
        *sut.front_mut().unwrap() = -2;
        *sut.back_mut().unwrap() = 5;

        sut.pop_back();
        assert_eq!(sut.index(), None);
        assert_eq!(sut.peek_prev(), Some(&mut 3));

        assert_eq!(deque, [-2, 0, 1, 2, 3]);
    }

    #[test]
    fn cursor_jumps() {
        let mut deque = ChunkDeque::<i32, 3>::from_iter(0..10);
        let mut sut = deque.cursor_front_mut();

        sut += 7;
        assert_eq!(sut.current(), Some(&mut 7));
        sut -= 5;
        assert_eq!(sut.current(), Some(&mut 2));
        sut += 8;
        assert_eq!(sut.index(), None);
    }

    #[test]
    fn cursor_jumps_by_value() {
        let mut deque = ChunkDeque::<i32, 3>::from_iter(0..10);

        let mut sut = deque.cursor_front_mut() + 6;
        assert_eq!(sut.current(), Some(&mut 6));
        sut.insert(-1);

        let mut sut = sut - 6_usize;
        assert_eq!(sut.current(), Some(&mut 0));
        sut = sut + 11;
        assert_eq!(sut.index(), None);
        assert_eq!(deque, [0, 1, 2, 3, 4, 5, -1, 6, 7, 8, 9]);
    }

    #[test]
    #[should_panic]
    fn cursor_cannot_step_before_the_front() {
        let mut deque = ChunkDeque::<i32, 3>::from_iter(0..10);
        let _cursor = deque.cursor_front_mut() - 1_usize;
    }

    #[test]
    #[should_panic]
    fn cursor_cannot_jump_past_the_ghost() {
        let mut deque = ChunkDeque::<i32, 3>::from_iter(0..10);
        let mut sut = deque.cursor_back_mut();
        sut += 2;
    }

    #[test]
    fn debug_works_correctly() {
        let mut deque = ChunkDeque::<i32, 2>::from([0, 1, 2]);
        let sut = deque.cursor_at_mut(1);
        assert_eq!(
            format!("{sut:?}"),
            "CursorMut { deque: [0, 1, 2], current: Some(1), index: Some(1) }"
        );
    }
}
