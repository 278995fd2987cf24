use core::alloc::Layout;
use core::fmt;
use core::ptr::{self, NonNull};

/// The memory supplier a [`ChunkDeque`](crate::ChunkDeque) draws its chunk table
/// and its chunks from.
///
/// Elements are constructed into and destroyed from the handed-out memory by the
/// container itself, so implementors only deal with raw blocks.
///
/// # Safety
/// - A block returned by `allocate` must be valid for reads and writes of
///   `layout.size()` bytes, aligned to `layout.align()`, and must stay valid until
///   it is passed back to `deallocate` of this allocator or of one that compares
///   equal to it.
/// - Allocators that compare equal through `PartialEq` must be able to free each
///   other's blocks.
pub unsafe trait ChunkAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// # Safety
    /// `ptr` must denote a block currently allocated by this allocator with `layout`.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The allocator refused to hand out a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

impl std::error::Error for AllocError {}

/// The global allocator registered with `#[global_allocator]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

unsafe impl ChunkAllocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }

        NonNull::new(unsafe { std::alloc::alloc(layout) }).ok_or(AllocError)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

unsafe impl<A> ChunkAllocator for &A
where
    A: ChunkAllocator + ?Sized,
{
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

fn dangling(layout: Layout) -> NonNull<u8> {
    // alignment is never zero
    unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(layout.align())) }
}

#[cfg(test)]
mod tests {
    use core::alloc::Layout;

    use super::{ChunkAllocator, Global};

    #[test]
    fn global_allocates_and_deallocates() {
        let layout = Layout::array::<u64>(16).unwrap();
        let ptr = Global.allocate(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize % layout.align(), 0);

        unsafe {
            ptr.cast::<u64>().as_ptr().write(42);
            assert_eq!(ptr.cast::<u64>().as_ptr().read(), 42);
            Global.deallocate(ptr, layout);
        }
    }

    #[test]
    fn global_hands_out_aligned_dangling_blocks_for_zero_sized_layouts() {
        let layout = Layout::from_size_align(0, 16).unwrap();
        let ptr = Global.allocate(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize, 16);
        unsafe { Global.deallocate(ptr, layout) };
    }

    #[test]
    fn references_forward_to_the_allocator() {
        let layout = Layout::new::<u32>();
        let alloc = &Global;
        let ptr = alloc.allocate(layout).unwrap();
        unsafe { alloc.deallocate(ptr, layout) };
    }
}
