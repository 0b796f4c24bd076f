//! CRC region monitor.
//!
//! Computes a CRC over the pixels of up to `region_cnt` rectangles per frame
//! and raises one status bit per region whose check fired.

use core::fmt;

use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};

use crate::{
    config::{CrcDesc, ModuleCreateInfo, crc_desc},
    err::DeError,
    osal::RegAllocator,
    registers::{
        RegBlock, Regs,
        crc::{
            CRC_CTL, CRC_POL, CRC_POLY, CRC_SIZE, CRC_SPAN, CRC_STATUS_OFFSET, CRC_STEP,
            CRC_VALUE_OFFSET, CrcCtlRegs, CrcSizeRegs, CrcStepRegs, CrcWinRegs,
        },
    },
};

/// Polynomial reloaded whenever a region's enable bit changes.
pub const CRC_DEFAULT_POLY: u32 = 0x1021;
const CRC_DEFAULT_INIT: u32 = 0xffff;

/// Which pixels of the window feed the CRC.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CrcMode {
    #[default]
    Inside,
    Outside,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CrcRegionCfg {
    pub region: u32,
    pub enable: bool,
    pub irq_enable: bool,
    pub mode: CrcMode,
    /// Check one frame out of every `check_frame_step`.
    pub check_frame_step: u32,
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
}

pub struct CrcHandle {
    info: ModuleCreateInfo,
    dsc: &'static CrcDesc,
    ctl: Regs<CrcCtlRegs>,
    win: Regs<CrcWinRegs>,
    size: Regs<CrcSizeRegs>,
    step: Regs<CrcStepRegs>,
}

impl CrcHandle {
    /// Returns `Ok(None)` when this display has no CRC monitor.
    pub fn create(
        info: &ModuleCreateInfo,
        alloc: &dyn RegAllocator,
    ) -> Result<Option<Self>, DeError> {
        let Some(dsc) = crc_desc(info.version, info.id) else {
            return Ok(None);
        };

        let [ctl, win, size, step] = RegBlock::alloc_group(
            alloc,
            [
                Regs::<CrcCtlRegs>::SIZE,
                Regs::<CrcWinRegs>::SIZE,
                Regs::<CrcSizeRegs>::SIZE,
                Regs::<CrcStepRegs>::SIZE,
            ],
            false,
        )?;

        Ok(Some(Self {
            info: info.clone(),
            dsc,
            ctl: Regs::new(ctl),
            win: Regs::new(win),
            size: Regs::new(size),
            step: Regs::new(step),
        }))
    }

    pub fn desc(&self) -> &'static CrcDesc {
        self.dsc
    }

    pub fn reg_blocks(&self) -> impl Iterator<Item = &RegBlock> {
        [
            self.ctl.block(),
            self.win.block(),
            self.size.block(),
            self.step.block(),
        ]
        .into_iter()
    }

    fn check_region(&self, region: u32) -> Result<(), DeError> {
        if region >= self.dsc.region_cnt {
            error!(
                "crc{}: region {} out of range (max {})",
                self.info.id,
                region,
                self.dsc.region_cnt - 1
            );
            return Err(DeError::InvalidArgument);
        }
        Ok(())
    }

    /// Frame size shared by all regions.
    pub fn global_config(&mut self, width: u32, height: u32) {
        self.size
            .size
            .write(CRC_SIZE::WIDTH.val(width) + CRC_SIZE::HEIGHT.val(height));
        self.size.mark_dirty();
    }

    pub fn frame_size(&self) -> (u32, u32) {
        let size = self.size.size.extract();
        (size.read(CRC_SIZE::WIDTH), size.read(CRC_SIZE::HEIGHT))
    }

    pub fn set_run_frames(&mut self, frames: u32) {
        self.size.run_frames.set(frames);
        self.size.mark_dirty();
    }

    pub fn region_config(&mut self, cfg: &CrcRegionCfg) -> Result<(), DeError> {
        self.check_region(cfg.region)?;
        let r = cfg.region as usize;

        self.win.win[2 * r].write(CRC_SPAN::START.val(cfg.x_start) + CRC_SPAN::END.val(cfg.x_end));
        self.win.win[2 * r + 1]
            .write(CRC_SPAN::START.val(cfg.y_start) + CRC_SPAN::END.val(cfg.y_end));
        self.win.mark_dirty();

        self.step.step[r].write(CRC_STEP::FRAMES.val(cfg.check_frame_step));
        self.step.mark_dirty();

        self.set_polarity(cfg.region, cfg.mode)?;
        self.enable_region(cfg.region, cfg.enable, cfg.irq_enable)
    }

    pub fn set_polarity(&mut self, region: u32, mode: CrcMode) -> Result<(), DeError> {
        self.check_region(region)?;
        let bit = 1 << region;
        let outside = self.ctl.pol.read(CRC_POL::OUTSIDE);
        let outside = match mode {
            CrcMode::Inside => outside & !bit,
            CrcMode::Outside => outside | bit,
        };
        self.ctl.pol.modify(CRC_POL::OUTSIDE.val(outside));
        self.ctl.mark_dirty();
        Ok(())
    }

    /// Enabling or disabling a region reloads the default polynomial.
    pub fn enable_region(&mut self, region: u32, enable: bool, irq: bool) -> Result<(), DeError> {
        self.check_region(region)?;
        let bit = 1 << region;
        let mut en = self.ctl.ctl.read(CRC_CTL::EN);
        let mut irq_en = self.ctl.ctl.read(CRC_CTL::IRQ_EN);
        if enable {
            en |= bit;
        } else {
            en &= !bit;
        }
        if enable && irq {
            irq_en |= bit;
        } else {
            irq_en &= !bit;
        }
        self.ctl
            .ctl
            .write(CRC_CTL::EN.val(en) + CRC_CTL::IRQ_EN.val(irq_en));
        self.ctl.mark_dirty();

        self.size
            .poly
            .write(CRC_POLY::POLY.val(CRC_DEFAULT_POLY) + CRC_POLY::INIT.val(CRC_DEFAULT_INIT));
        self.size.mark_dirty();
        Ok(())
    }

    pub fn enabled_regions(&self) -> u32 {
        self.ctl.ctl.read(CRC_CTL::EN)
    }

    fn live_offset(&self, offset: usize) -> usize {
        self.info.reg_base + self.dsc.reg_offset + offset
    }

    /// Returns which regions in `region_mask` fired and acknowledges them.
    ///
    /// Region `r` reports at status bit `r << 2`. The status word is
    /// write-1-to-clear; exactly the reported bits are written back, and the
    /// write happens even when nothing fired.
    pub fn check_status_with_clear(&self, region_mask: u32) -> u32 {
        let addr = self.live_offset(CRC_STATUS_OFFSET);
        let status = self.info.io.readl(addr);

        let mut fired = 0u32;
        let mut clear = 0u32;
        for region in 0..self.dsc.region_cnt {
            let status_bit = 1u32 << (region << 2);
            if region_mask & (1 << region) != 0 && status & status_bit != 0 {
                fired |= 1 << region;
                clear |= status_bit;
            }
        }
        self.info.io.writel(addr, clear);
        fired
    }

    /// CRC computed by the hardware for `region` on the last checked frame.
    pub fn read_value(&self, region: u32) -> Result<u32, DeError> {
        self.check_region(region)?;
        let addr = self.live_offset(CRC_VALUE_OFFSET + region as usize * 4);
        Ok(self.info.io.readl(addr))
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let (w, h) = self.frame_size();
        writeln!(
            out,
            "  crc: {}x{} regions {} en {:#04x} irq {:#04x} outside {:#04x}",
            w,
            h,
            self.dsc.region_cnt,
            self.ctl.ctl.read(CRC_CTL::EN),
            self.ctl.ctl.read(CRC_CTL::IRQ_EN),
            self.ctl.pol.read(CRC_POL::OUTSIDE),
        )?;
        for r in 0..self.dsc.region_cnt as usize {
            let x = self.win.win[2 * r].extract();
            let y = self.win.win[2 * r + 1].extract();
            writeln!(
                out,
                "    [{}] x {}..{} y {}..{} step {}",
                r,
                x.read(CRC_SPAN::START),
                x.read(CRC_SPAN::END),
                y.read(CRC_SPAN::START),
                y.read(CRC_SPAN::END),
                self.step.step[r].read(CRC_STEP::FRAMES),
            )?;
        }
        Ok(())
    }
}
