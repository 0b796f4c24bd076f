mod common;

use std::ptr::NonNull;

use common::{HeapAlloc, MockIo, create_info};
use sunxi_de::{
    CrcHandle, DeError, DeIo, DeVersion, DitherHandle, MmioIo,
    registers::{RegBlock, Regs, crc::CrcCtlRegs, dither::DitherRegs},
};

#[test]
fn alloc_group_carves_aligned_blocks() {
    let alloc = HeapAlloc::new();
    let [a, b, c] = RegBlock::alloc_group(&alloc, [8, 6, 0x200], true).unwrap();

    assert_eq!(alloc.allocations(), 1);
    assert_eq!(b.phys_addr(), a.phys_addr() + 8);
    assert_eq!(c.phys_addr(), b.phys_addr() + 8);
    assert_eq!(b.size(), 6);
    assert_eq!(c.word_count(), 0x80);
    assert!(a.rcq_head().is_some());
    assert!(c.words().all(|w| w == 0));
}

#[test]
fn dirty_flag_is_idempotent() {
    let alloc = HeapAlloc::new();
    let [block] = RegBlock::alloc_group(&alloc, [Regs::<DitherRegs>::SIZE], false).unwrap();

    assert!(!block.is_dirty());
    block.mark_dirty();
    block.mark_dirty();
    assert!(block.is_dirty());
    assert!(block.take_dirty());
    assert!(!block.take_dirty());
    assert!(!block.is_dirty());
}

#[test]
fn exhausted_pool_fails_create() {
    let io = MockIo::new();
    let info = create_info(DeVersion::De350, 0, &io);

    let alloc = HeapAlloc::failing_after(0);
    assert_eq!(
        CrcHandle::create(&info, &alloc).err(),
        Some(DeError::NoMemory)
    );
    assert_eq!(
        DitherHandle::create(&info, &alloc).err(),
        Some(DeError::NoMemory)
    );
}

#[test]
fn absent_module_is_not_an_error() {
    let io = MockIo::new();
    let alloc = HeapAlloc::new();
    let info = create_info(DeVersion::De201, 0, &io);

    assert!(CrcHandle::create(&info, &alloc).unwrap().is_none());
    assert_eq!(alloc.allocations(), 0);
}

#[test]
fn typed_view_matches_layout_size() {
    assert_eq!(Regs::<CrcCtlRegs>::SIZE, 8);
    assert_eq!(Regs::<DitherRegs>::SIZE, 8);
}

#[test]
fn out_of_range_access_is_contained() {
    let alloc = HeapAlloc::new();
    let [block] = RegBlock::alloc_group(&alloc, [8], false).unwrap();
    assert_eq!(block.word_count(), 2);
    assert_eq!(block.read_word(2), 0);
    assert_eq!(block.read_word(usize::MAX), 0);

    let mut window = [0x1111_1111u32, 0x2222_2222, 0x3333_3333];
    let io = unsafe { MmioIo::new(NonNull::from(&mut window).cast::<u8>(), 8) };
    assert_eq!(io.readl(4), 0x2222_2222);
    assert_eq!(io.readl(8), 0);
    assert_eq!(io.readl(usize::MAX - 1), 0);
    io.writel(8, 0xdead_beef);
    io.writel(0, 0xa5a5_a5a5);
    drop(io);
    assert_eq!(window, [0xa5a5_a5a5, 0x2222_2222, 0x3333_3333]);
}
