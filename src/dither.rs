//! Output bit-depth reduction.
//!
//! The descriptor lists which output formats and algorithms the silicon
//! implements. [`DitherHandle::config`] does not validate against it; callers
//! check [`DitherHandle::validate`] first.

use core::fmt;

use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};

use crate::{
    config::{DitherDesc, DitherFmts, DitherModes, ModuleCreateInfo, dither_desc},
    err::DeError,
    osal::RegAllocator,
    registers::{
        RegBlock, Regs,
        dither::{DITHER_CTL, DITHER_SIZE, DitherRegs},
    },
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DitherOutFmt {
    #[default]
    Rgb888,
    Rgb666,
    Rgb565,
    Rgb444,
}

impl DitherOutFmt {
    pub fn flag(self) -> DitherFmts {
        match self {
            DitherOutFmt::Rgb888 => DitherFmts::RGB888,
            DitherOutFmt::Rgb666 => DitherFmts::RGB666,
            DitherOutFmt::Rgb565 => DitherFmts::RGB565,
            DitherOutFmt::Rgb444 => DitherFmts::RGB444,
        }
    }

    fn field(self) -> u32 {
        match self {
            DitherOutFmt::Rgb888 => 0,
            DitherOutFmt::Rgb666 => 1,
            DitherOutFmt::Rgb565 => 2,
            DitherOutFmt::Rgb444 => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DitherMode {
    #[default]
    Quantization,
    FloydSteinberg,
    Ordered,
    SierraLite,
    Burke,
    Random,
}

impl DitherMode {
    pub fn flag(self) -> DitherModes {
        match self {
            DitherMode::Quantization => DitherModes::QUANTIZATION,
            DitherMode::FloydSteinberg => DitherModes::FLOYD_STEINBERG,
            DitherMode::Ordered => DitherModes::ORDERED,
            DitherMode::SierraLite => DitherModes::SIERRA_LITE,
            DitherMode::Burke => DitherModes::BURKE,
            DitherMode::Random => DitherModes::RANDOM,
        }
    }

    fn field(self) -> u32 {
        match self {
            DitherMode::Quantization => 0,
            DitherMode::FloydSteinberg => 1,
            DitherMode::Ordered => 2,
            DitherMode::SierraLite => 3,
            DitherMode::Burke => 4,
            DitherMode::Random => 5,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DitherConfig {
    pub enable: bool,
    pub out_fmt: DitherOutFmt,
    pub mode: DitherMode,
    pub width: u32,
    pub height: u32,
    pub enable_3d_fifo: bool,
}

pub struct DitherHandle {
    info: ModuleCreateInfo,
    dsc: &'static DitherDesc,
    regs: Regs<DitherRegs>,
}

impl DitherHandle {
    pub fn create(
        info: &ModuleCreateInfo,
        alloc: &dyn RegAllocator,
    ) -> Result<Option<Self>, DeError> {
        let Some(dsc) = dither_desc(info.version, info.id) else {
            return Ok(None);
        };
        let [block] = RegBlock::alloc_group(alloc, [Regs::<DitherRegs>::SIZE], false)?;

        Ok(Some(Self {
            info: info.clone(),
            dsc,
            regs: Regs::new(block),
        }))
    }

    pub fn support_fmts(&self) -> DitherFmts {
        self.dsc.support_fmts
    }

    pub fn support_modes(&self) -> DitherModes {
        self.dsc.support_modes
    }

    pub fn validate(&self, fmt: DitherOutFmt, mode: DitherMode) -> Result<(), DeError> {
        if !self.dsc.support_fmts.contains(fmt.flag()) || !self.dsc.support_modes.contains(mode.flag())
        {
            warn!(
                "dither{}: {:?}/{:?} not supported by this revision",
                self.info.id, fmt, mode
            );
            return Err(DeError::Unsupported);
        }
        Ok(())
    }

    pub fn reg_blocks(&self) -> impl Iterator<Item = &RegBlock> {
        core::iter::once(self.regs.block())
    }

    pub fn config(&mut self, cfg: &DitherConfig) {
        self.regs.ctl.write(
            DITHER_CTL::EN.val(cfg.enable as u32)
                + DITHER_CTL::OUT_FMT.val(cfg.out_fmt.field())
                + DITHER_CTL::MODE.val(cfg.mode.field())
                + DITHER_CTL::FIFO_3D.val(cfg.enable_3d_fifo as u32),
        );
        self.regs
            .size
            .write(DITHER_SIZE::WIDTH.val(cfg.width) + DITHER_SIZE::HEIGHT.val(cfg.height));
        self.regs.mark_dirty();
    }

    pub fn enable(&mut self, enable: bool) {
        self.regs.ctl.modify(DITHER_CTL::EN.val(enable as u32));
        self.regs.mark_dirty();
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.regs
            .size
            .write(DITHER_SIZE::WIDTH.val(width) + DITHER_SIZE::HEIGHT.val(height));
        self.regs.mark_dirty();
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.ctl.is_set(DITHER_CTL::EN)
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let ctl = self.regs.ctl.extract();
        writeln!(
            out,
            "  dither: en {} fmt {} mode {} fifo3d {} size {}x{}",
            ctl.read(DITHER_CTL::EN),
            ctl.read(DITHER_CTL::OUT_FMT),
            ctl.read(DITHER_CTL::MODE),
            ctl.read(DITHER_CTL::FIFO_3D),
            self.regs.size.read(DITHER_SIZE::WIDTH),
            self.regs.size.read(DITHER_SIZE::HEIGHT),
        )
    }
}
