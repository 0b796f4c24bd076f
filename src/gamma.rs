//! Output gamma LUT, optionally carrying the color transform matrix.

use core::fmt;

use tock_registers::interfaces::{ReadWriteable, Readable};

use crate::{
    config::{ColorSpace, FormatSpace, GammaDesc, ModuleCreateInfo, gamma_desc},
    csc::{
        matrix::{Bcsh, Ctm},
        read_coeffs, resolve_coeffs, write_coeffs,
    },
    err::DeError,
    osal::RegAllocator,
    registers::{
        RegBlock, Regs,
        gamma::{GAMMA_CTL, GammaCtlRegs, gamma_entry},
    },
};

fn linear_entry(idx: usize, len: usize) -> u32 {
    let v = (idx * 1023 / len.saturating_sub(1).max(1)) as u16;
    gamma_entry(v, v, v)
}

pub struct GammaHandle {
    info: ModuleCreateInfo,
    dsc: &'static GammaDesc,
    ctl: Regs<GammaCtlRegs>,
    lut: RegBlock,
}

impl GammaHandle {
    pub fn create(
        info: &ModuleCreateInfo,
        alloc: &dyn RegAllocator,
    ) -> Result<Option<Self>, DeError> {
        let Some(dsc) = gamma_desc(info.version, info.id) else {
            return Ok(None);
        };
        let [ctl, lut] = RegBlock::alloc_group(
            alloc,
            [Regs::<GammaCtlRegs>::SIZE, dsc.lut_len as usize * 4],
            false,
        )?;

        // Identity curve until the first upload.
        let len = dsc.lut_len as usize;
        for idx in 0..len {
            lut.write_word(idx, linear_entry(idx, len));
        }
        lut.mark_dirty();

        Ok(Some(Self {
            info: info.clone(),
            dsc,
            ctl: Regs::new(ctl),
            lut,
        }))
    }

    pub fn lut_len(&self) -> u32 {
        self.dsc.lut_len
    }

    pub fn support_ctm(&self) -> bool {
        self.dsc.support_ctm
    }

    pub fn hue_default(&self) -> u32 {
        self.dsc.hue_default
    }

    pub fn reg_blocks(&self) -> impl Iterator<Item = &RegBlock> {
        [self.ctl.block(), &self.lut].into_iter()
    }

    /// Linear ramp matching the LUT length of this revision.
    pub fn linear_lut(&self, out: &mut [u32]) {
        let len = self.dsc.lut_len as usize;
        for (i, e) in out.iter_mut().take(len).enumerate() {
            *e = linear_entry(i, len);
        }
    }

    /// Enables the unit and, when given, uploads a new LUT.
    pub fn apply(&mut self, enable: bool, lut: Option<&[u32]>) -> Result<(), DeError> {
        if let Some(lut) = lut {
            if lut.len() != self.dsc.lut_len as usize {
                error!(
                    "gamma{}: lut has {} entries, hardware takes {}",
                    self.info.id,
                    lut.len(),
                    self.dsc.lut_len
                );
                return Err(DeError::InvalidArgument);
            }
            for (idx, &entry) in lut.iter().enumerate() {
                self.lut.write_word(idx, entry);
            }
            self.lut.mark_dirty();
        }
        self.ctl.ctl.modify(GAMMA_CTL::EN.val(enable as u32));
        self.ctl.mark_dirty();
        Ok(())
    }

    pub fn disable(&mut self) {
        self.ctl.ctl.modify(GAMMA_CTL::EN::CLEAR);
        self.ctl.mark_dirty();
    }

    pub fn is_enabled(&self) -> bool {
        self.ctl.ctl.is_set(GAMMA_CTL::EN)
    }

    pub fn apply_ctm(
        &mut self,
        fmt: FormatSpace,
        cs: ColorSpace,
        bcsh: Option<&Bcsh>,
        ctm: Option<&Ctm>,
    ) -> Result<(), DeError> {
        if !self.dsc.support_ctm {
            return Err(DeError::Unsupported);
        }
        match resolve_coeffs(fmt, cs, bcsh, ctm, self.dsc.hue_default) {
            Some(coeffs) => {
                write_coeffs(&self.ctl.ctm, &coeffs);
                self.ctl.ctl.modify(GAMMA_CTL::CTM_EN::SET);
            }
            None => self.ctl.ctl.modify(GAMMA_CTL::CTM_EN::CLEAR),
        }
        self.ctl.mark_dirty();
        Ok(())
    }

    pub fn matrix(&self) -> Option<[i32; 12]> {
        self.ctl
            .ctl
            .is_set(GAMMA_CTL::CTM_EN)
            .then(|| read_coeffs(&self.ctl.ctm))
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(
            out,
            "  gamma: en {} lut {} ctm {}",
            self.is_enabled() as u8,
            self.dsc.lut_len,
            self.ctl.ctl.read(GAMMA_CTL::CTM_EN),
        )
    }
}
