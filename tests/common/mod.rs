#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    ptr::NonNull,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use sunxi_de::{
    DeIo, DeVersion, DmaRegion, ModuleCreateInfo, RegAllocator,
    registers::{crc::CRC_STATUS_OFFSET, smbl::SMBL_HIST_OFFSET},
    smbl_desc,
};

/// Register pool backed by leaked heap memory.
pub struct HeapAlloc {
    fail_after: Option<usize>,
    count: AtomicUsize,
    next_phys: AtomicU64,
}

impl HeapAlloc {
    pub fn new() -> Self {
        Self {
            fail_after: None,
            count: AtomicUsize::new(0),
            next_phys: AtomicU64::new(0x4000_0000),
        }
    }

    /// Pool that hands out `n` regions and then reports exhaustion.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new()
        }
    }

    pub fn allocations(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl RegAllocator for HeapAlloc {
    fn alloc(&self, size: usize, queued: bool) -> Option<DmaRegion> {
        let n = self.count.fetch_add(1, Ordering::Relaxed);
        if self.fail_after.is_some_and(|limit| n >= limit) {
            return None;
        }
        let words = size.div_ceil(4).max(1);
        let buf: &'static mut [u32] = Vec::leak(vec![0u32; words]);
        let virt_addr = NonNull::new(buf.as_mut_ptr().cast::<u8>())?;
        let phys_addr = self
            .next_phys
            .fetch_add((words as u64 * 4 + 0xfff) & !0xfff, Ordering::Relaxed);
        Some(DmaRegion {
            virt_addr,
            phys_addr,
            size: words * 4,
            rcq_head: queued.then_some(phys_addr | 0x8000_0000),
        })
    }
}

/// Fake DE register space with write-1-to-clear status words.
#[derive(Default)]
pub struct MockIo {
    regs: Mutex<HashMap<usize, u32>>,
    w1c: Mutex<HashSet<usize>>,
    writes: Mutex<Vec<(usize, u32)>>,
}

impl MockIo {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, offset: usize, value: u32) {
        self.regs.lock().unwrap().insert(offset, value);
    }

    pub fn get(&self, offset: usize) -> u32 {
        self.regs.lock().unwrap().get(&offset).copied().unwrap_or(0)
    }

    pub fn mark_w1c(&self, offset: usize) {
        self.w1c.lock().unwrap().insert(offset);
    }

    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn set_histogram(&self, version: DeVersion, id: u32, hist: &[u32; 8]) {
        let base = smbl_desc(version, id).unwrap().reg_offset + SMBL_HIST_OFFSET;
        for (i, &v) in hist.iter().enumerate() {
            self.set(base + i * 4, v);
        }
    }
}

impl DeIo for MockIo {
    fn readl(&self, offset: usize) -> u32 {
        self.get(offset)
    }

    fn writel(&self, offset: usize, value: u32) {
        self.writes.lock().unwrap().push((offset, value));
        let mut regs = self.regs.lock().unwrap();
        let reg = regs.entry(offset).or_insert(0);
        if self.w1c.lock().unwrap().contains(&offset) {
            *reg &= !value;
        } else {
            *reg = value;
        }
    }
}

/// CRC status word offset for displays whose CRC block sits at base 0.
pub const CRC_STATUS: usize = CRC_STATUS_OFFSET;

pub fn create_info(version: DeVersion, id: u32, io: &Arc<MockIo>) -> ModuleCreateInfo {
    io.mark_w1c(CRC_STATUS);
    ModuleCreateInfo {
        version,
        id,
        reg_base: 0,
        io: io.clone(),
    }
}
