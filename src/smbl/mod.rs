//! Smart backlight (SMBL).
//!
//! The block measures a luma histogram every frame and lets software trade
//! panel backlight for digital luma gain. [`SmblHandle::apply`] runs on the
//! commit path, [`SmblHandle::update_local_param`] on the vblank tasklet.
//!
//! Two locks guard the handle. `status` holds the bookkeeping in
//! [`SmblStatus`], `regs_lock` serializes writes to the shadow registers.
//! No path ever holds both at once.

use core::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

use bitflags::bitflags;
use spin::Mutex;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};

use crate::{
    config::{ColorSpace, FormatSpace, ModuleCreateInfo, SmblDesc, smbl_desc},
    csc::{
        matrix::{Bcsh, Ctm},
        read_coeffs, resolve_coeffs, write_coeffs,
    },
    err::DeError,
    osal::RegAllocator,
    registers::{
        RegBlock, Regs,
        smbl::{
            SMBL_CSC_BYPASS, SMBL_CSC_CTL, SMBL_CTL, SMBL_FILTER, SMBL_HIST_BINS,
            SMBL_HIST_OFFSET, SMBL_LGC, SMBL_LGC_LEN, SMBL_SIZE, SMBL_WIN, SmblCscRegs,
            SmblCtlRegs, SmblLutRegs,
        },
    },
};

pub mod pwrsave;

use pwrsave::{HIST_SENTINEL, IEP_LH_PWRSV_NUM, NEUTRAL_INDEX, lgc_row, pwrsave_core};

/// The power-save step runs on every other frame unless forced.
pub const SMBL_FRAME_MASK: u32 = 0x1;

/// Histogram low-pass taps programmed at enable time.
const SMBL_FILTER_TAPS: [u32; 4] = [0x20, 0x40, 0x40, 0x20];

bitflags! {
    /// Which parts of a [`DispSmblInfo`] carry new values.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct SmblDirty: u32 {
        const ENABLE = 1 << 0;
        const WINDOW = 1 << 1;
        const BL = 1 << 2;
    }
}

/// Region the histogram is measured over.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SmblWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SmblWindow {
    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispSmblInfo {
    pub dirty: SmblDirty,
    pub enable: bool,
    pub window: SmblWindow,
    pub backlight: u32,
}

/// Power-save bookkeeping shared by the commit and tasklet paths.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SmblStatus {
    pub isenable: bool,
    /// Latches to 1 once the power-save step has run after an enable.
    pub runtime: u32,
    pub backlight: u32,
    pub backlight_after_dimming: u32,
    /// Gain in 1/256 units, 256 meaning no reduction.
    pub dimming: u32,
    pub min_adj_index_hist: [u8; IEP_LH_PWRSV_NUM],
    /// Active pixels divided by 100, for histogram percentages.
    pub size: u32,
}

impl Default for SmblStatus {
    fn default() -> Self {
        Self {
            isenable: false,
            runtime: 0,
            backlight: 0,
            backlight_after_dimming: 0,
            dimming: 256,
            min_adj_index_hist: [HIST_SENTINEL; IEP_LH_PWRSV_NUM],
            size: 1,
        }
    }
}

pub struct SmblHandle {
    info: ModuleCreateInfo,
    dsc: &'static SmblDesc,
    status: Mutex<SmblStatus>,
    /// Serializes shadow register writes; holds the LUT row last written.
    regs_lock: Mutex<Option<u8>>,
    ctl: Regs<SmblCtlRegs>,
    lut: Regs<SmblLutRegs>,
    csc: Option<Regs<SmblCscRegs>>,
    frame_cnt: AtomicU32,
}

// SAFETY: every access to the register views goes through `regs_lock`, the
// status through `status`, and the frame counter is atomic.
unsafe impl Send for SmblHandle {}
unsafe impl Sync for SmblHandle {}

impl SmblHandle {
    pub fn create(
        info: &ModuleCreateInfo,
        alloc: &dyn RegAllocator,
    ) -> Result<Option<Self>, DeError> {
        let Some(dsc) = smbl_desc(info.version, info.id) else {
            return Ok(None);
        };

        let (ctl, lut, csc) = if dsc.support_csc {
            let [ctl, lut, csc] = RegBlock::alloc_group(
                alloc,
                [
                    Regs::<SmblCtlRegs>::SIZE,
                    Regs::<SmblLutRegs>::SIZE,
                    Regs::<SmblCscRegs>::SIZE,
                ],
                false,
            )?;
            (ctl, lut, Some(Regs::new(csc)))
        } else {
            let [ctl, lut] = RegBlock::alloc_group(
                alloc,
                [Regs::<SmblCtlRegs>::SIZE, Regs::<SmblLutRegs>::SIZE],
                false,
            )?;
            (ctl, lut, None)
        };

        Ok(Some(Self {
            info: info.clone(),
            dsc,
            status: Mutex::new(SmblStatus::default()),
            regs_lock: Mutex::new(None),
            ctl: Regs::new(ctl),
            lut: Regs::new(lut),
            csc,
            frame_cnt: AtomicU32::new(0),
        }))
    }

    pub fn desc(&self) -> &'static SmblDesc {
        self.dsc
    }

    pub fn support_csc(&self) -> bool {
        self.csc.is_some()
    }

    pub fn hue_default(&self) -> u32 {
        self.dsc.hue_default
    }

    pub fn reg_blocks(&self) -> impl Iterator<Item = &RegBlock> {
        [self.ctl.block(), self.lut.block()]
            .into_iter()
            .chain(self.csc.as_ref().map(|c| c.block()))
    }

    /// Applies the categories flagged in `info.dirty` for a `width`x`height`
    /// frame.
    ///
    /// An enable request for a frame beyond the descriptor limits turns the
    /// block off and fails with [`DeError::SizeLimit`].
    pub fn apply(&self, width: u32, height: u32, info: &DispSmblInfo) -> Result<(), DeError> {
        if info.dirty.contains(SmblDirty::ENABLE) {
            if info.enable {
                self.enable(width, height)?;
            } else {
                self.disable_hw();
                self.status.lock().isenable = false;
                debug!("smbl{}: disabled", self.info.id);
            }
        }

        if info.dirty.contains(SmblDirty::WINDOW) {
            let w = &info.window;
            let _regs = self.regs_lock.lock();
            self.ctl
                .win0
                .write(SMBL_WIN::X.val(w.x) + SMBL_WIN::Y.val(w.y));
            self.ctl.win1.write(
                SMBL_WIN::X.val(w.x.saturating_add(w.width).saturating_sub(1))
                    + SMBL_WIN::Y.val(w.y.saturating_add(w.height).saturating_sub(1)),
            );
            self.ctl
                .ctl
                .modify(SMBL_CTL::WIN_EN.val(!w.is_empty() as u32));
            self.ctl.mark_dirty();
        }

        if info.dirty.contains(SmblDirty::BL) {
            self.set_backlight(info.backlight);
        }
        Ok(())
    }

    fn enable(&self, width: u32, height: u32) -> Result<(), DeError> {
        if width > self.dsc.width_max || height > self.dsc.height_max {
            error!(
                "smbl{}: {}x{} exceeds {}x{}",
                self.info.id, width, height, self.dsc.width_max, self.dsc.height_max
            );
            self.disable_hw();
            self.status.lock().isenable = false;
            return Err(DeError::SizeLimit {
                width,
                height,
                max_width: self.dsc.width_max,
                max_height: self.dsc.height_max,
            });
        }

        let first = {
            let mut st = self.status.lock();
            let first = !st.isenable;
            st.isenable = true;
            st.size = (width * height / 100).max(1);
            if first {
                st.runtime = 0;
                st.min_adj_index_hist = [HIST_SENTINEL; IEP_LH_PWRSV_NUM];
                st.dimming = 256;
                st.backlight_after_dimming = st.backlight;
            }
            first
        };

        let mut lut_index = self.regs_lock.lock();
        self.ctl.size.write(
            SMBL_SIZE::WIDTH.val(width.saturating_sub(1))
                + SMBL_SIZE::HEIGHT.val(height.saturating_sub(1)),
        );
        if first {
            for reg in self.ctl.filter.iter() {
                reg.write(
                    SMBL_FILTER::C0.val(SMBL_FILTER_TAPS[0])
                        + SMBL_FILTER::C1.val(SMBL_FILTER_TAPS[1])
                        + SMBL_FILTER::C2.val(SMBL_FILTER_TAPS[2])
                        + SMBL_FILTER::C3.val(SMBL_FILTER_TAPS[3]),
                );
            }
            let csc_on = self
                .csc
                .as_ref()
                .is_some_and(|c| c.ctl.is_set(SMBL_CSC_CTL::EN));
            self.ctl
                .csc_bypass
                .write(SMBL_CSC_BYPASS::BYPASS.val(!csc_on as u32));
            // Neutral curve right away, the tasklet has not run yet.
            self.set_lut(NEUTRAL_INDEX);
            *lut_index = Some(NEUTRAL_INDEX);
        }
        self.ctl.ctl.modify(SMBL_CTL::EN::SET);
        self.ctl.mark_dirty();
        drop(lut_index);

        debug!("smbl{}: enabled {}x{} first {}", self.info.id, width, height, first);
        Ok(())
    }

    fn disable_hw(&self) {
        let _regs = self.regs_lock.lock();
        self.ctl.ctl.modify(SMBL_CTL::EN::CLEAR);
        self.ctl.mark_dirty();
    }

    pub fn is_hw_enabled(&self) -> bool {
        let _regs = self.regs_lock.lock();
        self.ctl.ctl.is_set(SMBL_CTL::EN)
    }

    /// Caller must hold `regs_lock`.
    fn set_lut(&self, index: u8) {
        let mut row = [0u16; SMBL_LGC_LEN];
        lgc_row(index, &mut row);
        for (reg, pair) in self.lut.lgc.iter().zip(row.chunks_exact(2)) {
            reg.write(SMBL_LGC::LO.val(pair[0] as u32) + SMBL_LGC::HI.val(pair[1] as u32));
        }
        self.lut.mark_dirty();
    }

    fn read_histogram(&self) -> [u32; SMBL_HIST_BINS] {
        let base = self.info.reg_base + self.dsc.reg_offset + SMBL_HIST_OFFSET;
        core::array::from_fn(|i| self.info.io.readl(base + i * 4))
    }

    /// Tasklet step: runs the power-save algorithm on the live histogram and
    /// uploads the resulting gain curve when it changed.
    ///
    /// Skips every other frame unless `force` is set. Returns whether the
    /// algorithm ran.
    pub fn update_local_param(&self, force: bool) -> bool {
        let frame = self.frame_cnt.fetch_add(1, Ordering::Relaxed);
        if !force && frame & SMBL_FRAME_MASK != 0 {
            return false;
        }
        if !self.status.lock().isenable {
            return false;
        }

        let hist = self.read_histogram();
        let index = {
            let mut st = self.status.lock();
            if !st.isenable {
                return false;
            }
            let index = pwrsave_core(&mut st, &hist);
            if st.runtime < 1 {
                st.runtime += 1;
            }
            index
        };

        let mut lut_index = self.regs_lock.lock();
        if *lut_index != Some(index) {
            self.set_lut(index);
            *lut_index = Some(index);
        }
        true
    }

    pub fn set_backlight(&self, backlight: u32) {
        self.status.lock().backlight = backlight;
    }

    pub fn get_status(&self) -> SmblStatus {
        *self.status.lock()
    }

    /// Programs the input color matrix, or bypasses it when both `bcsh` and
    /// `ctm` are absent or neutral.
    pub fn apply_csc(
        &self,
        fmt: FormatSpace,
        cs: ColorSpace,
        bcsh: Option<&Bcsh>,
        ctm: Option<&Ctm>,
    ) -> Result<(), DeError> {
        let Some(csc) = self.csc.as_ref() else {
            return Err(DeError::Unsupported);
        };
        let coeffs = resolve_coeffs(fmt, cs, bcsh, ctm, self.dsc.hue_default);

        let _regs = self.regs_lock.lock();
        match coeffs {
            Some(c) => {
                write_coeffs(&csc.coeff, &c);
                csc.ctl.write(SMBL_CSC_CTL::EN::SET);
                self.ctl.csc_bypass.write(SMBL_CSC_BYPASS::BYPASS::CLEAR);
            }
            None => {
                csc.ctl.write(SMBL_CSC_CTL::EN::CLEAR);
                self.ctl.csc_bypass.write(SMBL_CSC_BYPASS::BYPASS::SET);
            }
        }
        csc.mark_dirty();
        self.ctl.mark_dirty();
        Ok(())
    }

    pub fn matrix(&self) -> Option<[i32; 12]> {
        let csc = self.csc.as_ref()?;
        let _regs = self.regs_lock.lock();
        csc.ctl
            .is_set(SMBL_CSC_CTL::EN)
            .then(|| read_coeffs(&csc.coeff))
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let st = self.get_status();
        let (hw_en, lut) = {
            let lut_index = self.regs_lock.lock();
            (self.ctl.ctl.read(SMBL_CTL::EN), *lut_index)
        };
        writeln!(
            out,
            "  smbl: en {}/{} run {} bl {} -> {} dimming {} lut {:?}",
            st.isenable as u8,
            hw_en,
            st.runtime,
            st.backlight,
            st.backlight_after_dimming,
            st.dimming,
            lut,
        )
    }
}
