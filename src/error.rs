use core::alloc::Layout;
use core::fmt::{self, Display, Formatter};

use crate::alloc::AllocError;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by the checked and the fallible operations of a
/// [`ChunkDeque`](crate::ChunkDeque).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A checked access named an index that is not less than the length.
    OutOfRange { index: usize, len: usize },
    /// The requested capacity does not fit in memory addressable by `usize`.
    CapacityOverflow,
    /// The allocator could not supply a block for `layout`.
    AllocFailed { layout: Layout },
}

impl Error {
    /// Turns a growth failure into the panic / abort the infallible API promises.
    #[cold]
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        match self {
            Self::AllocFailed { layout } => std::alloc::handle_alloc_error(layout),
            other => panic!("{other}"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index out of range: the len is {len} but the index is {index}")
            }
            Self::CapacityOverflow => f.write_str("capacity overflow"),
            Self::AllocFailed { layout } => write!(
                f,
                "memory allocation of {} bytes (align {}) failed",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<core::alloc::LayoutError> for Error {
    fn from(_: core::alloc::LayoutError) -> Self {
        Self::CapacityOverflow
    }
}

pub(crate) trait AllocResultExt<T> {
    fn for_layout(self, layout: Layout) -> Result<T>;
}

impl<T> AllocResultExt<T> for core::result::Result<T, AllocError> {
    #[inline]
    fn for_layout(self, layout: Layout) -> Result<T> {
        self.map_err(|AllocError| Error::AllocFailed { layout })
    }
}
