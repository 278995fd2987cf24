use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;
use std::rc::Rc;

use crate::alloc::{AllocError, ChunkAllocator, Global};

#[derive(Debug)]
struct Budget {
    limit: Cell<usize>,
    in_use: Cell<usize>,
    allocations: Cell<usize>,
}

/// Refuses any allocation that would push the live bytes over `limit`.
#[derive(Clone, Debug)]
pub struct LimitedAllocator {
    budget: Rc<Budget>,
}

impl LimitedAllocator {
    pub fn new(limit: usize) -> Self {
        Self {
            budget: Rc::new(Budget {
                limit: Cell::new(limit),
                in_use: Cell::new(0),
                allocations: Cell::new(0),
            }),
        }
    }

    pub fn in_use(&self) -> usize {
        self.budget.in_use.get()
    }

    pub fn allocations(&self) -> usize {
        self.budget.allocations.get()
    }

    pub fn set_limit(&self, limit: usize) {
        self.budget.limit.set(limit);
    }
}

impl PartialEq for LimitedAllocator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.budget, &other.budget)
    }
}

unsafe impl ChunkAllocator for LimitedAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let in_use = self.budget.in_use.get();
        if in_use + layout.size() > self.budget.limit.get() {
            return Err(AllocError);
        }

        let ptr = Global.allocate(layout)?;
        self.budget.in_use.set(in_use + layout.size());
        self.budget.allocations.set(self.budget.allocations.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.budget.in_use.set(self.budget.in_use.get() - layout.size());
        unsafe { Global.deallocate(ptr, layout) };
    }
}

/// Counts live instances through a shared counter.
#[derive(Debug)]
pub struct Tracked {
    pub value: i32,
    live: Rc<Cell<usize>>,
}

impl Tracked {
    pub fn new(value: i32, live: &Rc<Cell<usize>>) -> Self {
        live.set(live.get() + 1);
        Self {
            value,
            live: Rc::clone(live),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self::new(self.value, &self.live)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Panics on the clone that would exceed its shared budget.
#[derive(Debug)]
pub struct Fragile {
    pub tracked: Tracked,
    clones_left: Rc<Cell<usize>>,
}

impl Fragile {
    pub fn new(value: i32, live: &Rc<Cell<usize>>, clones_left: &Rc<Cell<usize>>) -> Self {
        Self {
            tracked: Tracked::new(value, live),
            clones_left: Rc::clone(clones_left),
        }
    }
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        let left = self.clones_left.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }

        self.clones_left.set(left - 1);
        Self {
            tracked: self.tracked.clone(),
            clones_left: Rc::clone(&self.clones_left),
        }
    }
}
