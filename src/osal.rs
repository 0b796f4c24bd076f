//! Operating System Abstraction Layer (OSAL) for the display engine core.
//!
//! The pipeline never touches kernel services directly. Register-block memory
//! comes from a [`RegAllocator`] owned by the DE instance, and the few live
//! hardware accesses (status words, histogram, write-1-to-clear acks) go
//! through [`DeIo`].

use core::ptr::NonNull;

/// Physical (device visible) address type
pub type PhysAddr = u64;

/// Device-coherent memory handed out by a [`RegAllocator`].
#[derive(Debug, Clone, Copy)]
pub struct DmaRegion {
    pub virt_addr: NonNull<u8>,
    pub phys_addr: PhysAddr,
    pub size: usize,
    /// Head of the queued-copy (RCQ) descriptor when the region was
    /// allocated in queued mode.
    pub rcq_head: Option<PhysAddr>,
}

/// Shared per-DE-instance register memory pool.
///
/// Implementations must return memory that is zeroed, at least 4-byte
/// aligned and valid until the DE instance is torn down. Regions are never
/// returned to the pool individually.
pub trait RegAllocator {
    /// Returns `None` when the pool is exhausted.
    fn alloc(&self, size: usize, queued: bool) -> Option<DmaRegion>;
}

/// 32-bit access to the live DE register space.
///
/// Offsets are byte offsets from the DE base the implementation is scoped to.
pub trait DeIo: Send + Sync {
    fn readl(&self, offset: usize) -> u32;

    fn writel(&self, offset: usize, value: u32);
}

/// [`DeIo`] over a memory mapped register window.
pub struct MmioIo {
    base: NonNull<u8>,
    size: usize,
}

unsafe impl Send for MmioIo {}
unsafe impl Sync for MmioIo {}

impl MmioIo {
    /// Creates an accessor for `size` bytes of MMIO starting at `base`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `base` is a valid, 4-byte aligned mapping
    /// of the DE register file for at least `size` bytes and that it remains
    /// mapped for the lifetime of the returned structure.
    pub const unsafe fn new(base: NonNull<u8>, size: usize) -> Self {
        Self { base, size }
    }

    fn offset_ptr(&self, offset: usize) -> Option<*mut u32> {
        if offset.checked_add(4).is_none_or(|end| end > self.size) {
            error!("DE register offset {offset:#x} outside {:#x} byte window", self.size);
            return None;
        }
        Some(unsafe { self.base.as_ptr().add(offset).cast::<u32>() })
    }
}

impl DeIo for MmioIo {
    /// Reads as 0 outside the mapped window.
    fn readl(&self, offset: usize) -> u32 {
        self.offset_ptr(offset)
            .map_or(0, |ptr| unsafe { ptr.read_volatile() })
    }

    /// Dropped outside the mapped window.
    fn writel(&self, offset: usize, value: u32) {
        if let Some(ptr) = self.offset_ptr(offset) {
            unsafe { ptr.write_volatile(value) }
        }
    }
}
