//! Register blocks and the typed layouts that live inside them.
//!
//! Every hardware-facing module owns one or more [`RegBlock`]s: shadow copies
//! of a register group in device-coherent memory. Modules write the shadow
//! and raise the block's dirty flag; the commit step outside this crate
//! pushes dirty blocks to the hardware (directly or through the RCQ) and
//! clears the flag again.
//!
//! The layouts are described with [`tock_registers`] so that bit-packed
//! fields are only ever touched through named fields. Each functional block
//! has its own sub-module.

use core::{
    marker::PhantomData,
    mem::size_of,
    ops::Deref,
    ptr::NonNull,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    err::DeError,
    osal::{PhysAddr, RegAllocator},
};

pub mod bld;
pub mod crc;
pub mod csc;
pub mod deband;
pub mod dither;
pub mod gamma;
pub mod smbl;

const fn align4(size: usize) -> usize {
    (size + 3) & !3
}

/// One contiguous shadow region of device register space.
#[derive(Debug)]
pub struct RegBlock {
    virt: NonNull<u8>,
    phys: PhysAddr,
    size: usize,
    rcq_head: Option<PhysAddr>,
    dirty: AtomicBool,
}

unsafe impl Send for RegBlock {}
unsafe impl Sync for RegBlock {}

impl RegBlock {
    /// Carves `N` blocks out of a single allocation.
    ///
    /// Each block is placed at a 4-byte aligned offset. Fails with
    /// [`DeError::NoMemory`] when the pool is exhausted, in which case no
    /// block is handed out.
    pub fn alloc_group<const N: usize>(
        alloc: &dyn RegAllocator,
        sizes: [usize; N],
        queued: bool,
    ) -> Result<[RegBlock; N], DeError> {
        let total: usize = sizes.iter().map(|&s| align4(s)).sum();
        let region = alloc.alloc(total, queued).ok_or(DeError::NoMemory)?;
        if region.size < total || region.virt_addr.as_ptr() as usize & 3 != 0 {
            error!(
                "register region {:#x}/{} unusable for {} bytes",
                region.phys_addr, region.size, total
            );
            return Err(DeError::NoMemory);
        }

        let mut offset = 0usize;
        Ok(core::array::from_fn(|i| {
            let block = RegBlock {
                // SAFETY: offset stays below `total`, which fits in the region.
                virt: unsafe { NonNull::new_unchecked(region.virt_addr.as_ptr().add(offset)) },
                phys: region.phys_addr + offset as u64,
                size: sizes[i],
                rcq_head: region.rcq_head,
                dirty: AtomicBool::new(false),
            };
            offset += align4(sizes[i]);
            block
        }))
    }

    pub fn phys_addr(&self) -> PhysAddr {
        self.phys
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rcq_head(&self) -> Option<PhysAddr> {
        self.rcq_head
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Clears the dirty flag, returning whether it was set.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    pub fn word_count(&self) -> usize {
        self.size / 4
    }

    /// Shadow word `idx`, 0 past the end of the block.
    pub fn read_word(&self, idx: usize) -> u32 {
        if idx >= self.word_count() {
            return 0;
        }
        unsafe { self.virt.as_ptr().cast::<u32>().add(idx).read_volatile() }
    }

    pub(crate) fn write_word(&self, idx: usize, value: u32) {
        if idx >= self.word_count() {
            error!("reg block {:#x}: word {} out of range", self.phys, idx);
            return;
        }
        unsafe { self.virt.as_ptr().cast::<u32>().add(idx).write_volatile(value) }
    }

    /// Snapshot of the shadow contents, in register order.
    pub fn words(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.word_count()).map(move |idx| self.read_word(idx))
    }
}

/// Typed view over a [`RegBlock`] whose size equals the layout `T`.
pub struct Regs<T> {
    block: RegBlock,
    _layout: PhantomData<T>,
}

impl<T> Regs<T> {
    pub const SIZE: usize = size_of::<T>();

    pub(crate) fn new(block: RegBlock) -> Self {
        assert_eq!(block.size(), Self::SIZE, "register block size mismatch");
        Self {
            block,
            _layout: PhantomData,
        }
    }

    pub fn block(&self) -> &RegBlock {
        &self.block
    }

    pub fn mark_dirty(&self) {
        self.block.mark_dirty();
    }
}

impl<T> Deref for Regs<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // SAFETY: the block was allocated with exactly `size_of::<T>()`
        // bytes, is 4-byte aligned, and `T` consists of 32-bit register cells.
        unsafe { &*self.block.virt.as_ptr().cast::<T>() }
    }
}
