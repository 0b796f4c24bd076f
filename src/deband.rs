//! Debanding filter.
//!
//! The filter state depends on frame geometry, format space, color space and
//! bit depth, so the backend re-applies it whenever any of those change.

use core::fmt;

use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};

use crate::{
    config::{ColorSpace, DebandDesc, FormatSpace, ModuleCreateInfo, deband_desc},
    err::DeError,
    osal::RegAllocator,
    registers::{
        RegBlock, Regs,
        deband::{DEBAND_CTL, DEBAND_SIZE, DEBAND_STEP, DEBAND_THR, DebandRegs},
    },
};

/// Tuning knobs, thresholds in 8-bit code values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DebandParams {
    pub luma_thr: u8,
    pub chroma_thr: u8,
    pub edge_thr: u8,
    pub step_h: u8,
    pub step_v: u8,
    pub seed: u16,
}

impl Default for DebandParams {
    fn default() -> Self {
        Self {
            luma_thr: 4,
            chroma_thr: 6,
            edge_thr: 32,
            step_h: 4,
            step_v: 2,
            seed: 0x5a5a,
        }
    }
}

/// Pipe state the filter has to follow.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DebandFrame {
    pub width: u32,
    pub height: u32,
    pub fmt: FormatSpace,
    pub cs: ColorSpace,
    pub bits: u32,
}

pub struct DebandHandle {
    info: ModuleCreateInfo,
    dsc: &'static DebandDesc,
    regs: Regs<DebandRegs>,
    params: DebandParams,
}

impl DebandHandle {
    pub fn create(
        info: &ModuleCreateInfo,
        alloc: &dyn RegAllocator,
    ) -> Result<Option<Self>, DeError> {
        let Some(dsc) = deband_desc(info.version, info.id) else {
            return Ok(None);
        };
        let [block] = RegBlock::alloc_group(alloc, [Regs::<DebandRegs>::SIZE], false)?;

        Ok(Some(Self {
            info: info.clone(),
            dsc,
            regs: Regs::new(block),
            params: DebandParams::default(),
        }))
    }

    pub fn reg_blocks(&self) -> impl Iterator<Item = &RegBlock> {
        core::iter::once(self.regs.block())
    }

    pub fn params(&self) -> DebandParams {
        self.params
    }

    /// Reprograms the filter for `frame`, replacing the tuning when `params`
    /// is given.
    pub fn apply(
        &mut self,
        enable: bool,
        frame: &DebandFrame,
        params: Option<&DebandParams>,
    ) -> Result<(), DeError> {
        if let Some(p) = params {
            self.params = *p;
        }
        if !enable {
            self.disable();
            return Ok(());
        }
        if frame.width > self.dsc.width_max || frame.height > self.dsc.height_max {
            error!(
                "deband{}: {}x{} exceeds {}x{}",
                self.info.id, frame.width, frame.height, self.dsc.width_max, self.dsc.height_max
            );
            self.disable();
            return Err(DeError::SizeLimit {
                width: frame.width,
                height: frame.height,
                max_width: self.dsc.width_max,
                max_height: self.dsc.height_max,
            });
        }

        let shift = frame.bits.saturating_sub(8).min(2);
        let scale = |thr: u8| ((thr as u32) << shift).min(0xff);
        let chroma = match frame.fmt {
            FormatSpace::Rgb => DEBAND_CTL::CHROMA::Rgb,
            FormatSpace::Yuv444 => DEBAND_CTL::CHROMA::Yuv444,
            FormatSpace::Yuv422 => DEBAND_CTL::CHROMA::Yuv422,
            FormatSpace::Yuv420 => DEBAND_CTL::CHROMA::Yuv420,
        };
        let out_bits = if frame.bits > 8 {
            DEBAND_CTL::OUT_BITS::Bits10
        } else {
            DEBAND_CTL::OUT_BITS::Bits8
        };

        self.regs.size.write(
            DEBAND_SIZE::WIDTH.val(frame.width.saturating_sub(1))
                + DEBAND_SIZE::HEIGHT.val(frame.height.saturating_sub(1)),
        );
        self.regs.thr.write(
            DEBAND_THR::LUMA.val(scale(self.params.luma_thr))
                + DEBAND_THR::CHROMA.val(scale(self.params.chroma_thr))
                + DEBAND_THR::EDGE.val(scale(self.params.edge_thr)),
        );
        self.regs.step.write(
            DEBAND_STEP::H.val(self.params.step_h as u32)
                + DEBAND_STEP::V.val(self.params.step_v as u32)
                + DEBAND_STEP::RANDOM_SEED.val(self.params.seed as u32),
        );
        self.regs.ctl.write(
            DEBAND_CTL::EN::SET
                + out_bits
                + chroma
                + DEBAND_CTL::CS_WIDE.val(frame.cs.is_bt2020() as u32),
        );
        self.regs.mark_dirty();
        Ok(())
    }

    pub fn disable(&mut self) {
        self.regs.ctl.modify(DEBAND_CTL::EN::CLEAR);
        self.regs.mark_dirty();
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.ctl.is_set(DEBAND_CTL::EN)
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let ctl = self.regs.ctl.extract();
        writeln!(
            out,
            "  deband: en {} bits {} chroma {} size {}x{} {:?}",
            ctl.read(DEBAND_CTL::EN),
            ctl.read(DEBAND_CTL::OUT_BITS),
            ctl.read(DEBAND_CTL::CHROMA),
            self.regs.size.read(DEBAND_SIZE::WIDTH) + 1,
            self.regs.size.read(DEBAND_SIZE::HEIGHT) + 1,
            self.params,
        )
    }
}
