//! Dedicated color-space converter (DCSC) unit.
//!
//! The matrix math lives in [`matrix`] because gamma and SMBL reuse it on
//! revisions where they carry the color matrix instead.

use core::fmt;

use tock_registers::{
    interfaces::{Readable, Writeable},
    registers::ReadWrite,
};

use crate::{
    config::{ColorSpace, DcscDesc, FormatSpace, ModuleCreateInfo, dcsc_desc},
    err::DeError,
    osal::RegAllocator,
    registers::{
        RegBlock, Regs,
        csc::{CSC_CTL, CscRegs},
    },
};

pub mod matrix;

pub use matrix::{Bcsh, Ctm};

/// Programs a 12-entry coefficient bank.
pub(crate) fn write_coeffs(bank: &[ReadWrite<u32>; 12], coeffs: &[i32; 12]) {
    for (reg, &c) in bank.iter().zip(coeffs.iter()) {
        reg.set(c as u32);
    }
}

pub(crate) fn read_coeffs(bank: &[ReadWrite<u32>; 12]) -> [i32; 12] {
    let mut out = [0i32; 12];
    for (o, reg) in out.iter_mut().zip(bank.iter()) {
        *o = reg.get() as i32;
    }
    out
}

/// Coefficients for the requested enhancement, or `None` for bypass.
///
/// Both inputs absent means "restore passthrough and leave the user's
/// settings alone".
pub(crate) fn resolve_coeffs(
    fmt: FormatSpace,
    cs: ColorSpace,
    bcsh: Option<&Bcsh>,
    ctm: Option<&Ctm>,
    hue_default: u32,
) -> Option<[i32; 12]> {
    let neutral = Bcsh::neutral(hue_default);
    let bcsh = bcsh.unwrap_or(&neutral);
    if bcsh.is_neutral(hue_default) && ctm.is_none() {
        return None;
    }
    let m = matrix::compose(fmt, cs, bcsh, hue_default, ctm);
    Some(matrix::to_coeffs(&m))
}

pub struct DcscHandle {
    info: ModuleCreateInfo,
    dsc: &'static DcscDesc,
    regs: Regs<CscRegs>,
}

impl DcscHandle {
    pub fn create(
        info: &ModuleCreateInfo,
        alloc: &dyn RegAllocator,
    ) -> Result<Option<Self>, DeError> {
        let Some(dsc) = dcsc_desc(info.version, info.id) else {
            return Ok(None);
        };
        let [block] = RegBlock::alloc_group(alloc, [Regs::<CscRegs>::SIZE], false)?;

        Ok(Some(Self {
            info: info.clone(),
            dsc,
            regs: Regs::new(block),
        }))
    }

    pub fn hue_default(&self) -> u32 {
        self.dsc.hue_default
    }

    pub fn reg_blocks(&self) -> impl Iterator<Item = &RegBlock> {
        core::iter::once(self.regs.block())
    }

    pub fn apply(
        &mut self,
        fmt: FormatSpace,
        cs: ColorSpace,
        bcsh: Option<&Bcsh>,
        ctm: Option<&Ctm>,
    ) {
        match resolve_coeffs(fmt, cs, bcsh, ctm, self.dsc.hue_default) {
            Some(coeffs) => {
                write_coeffs(&self.regs.coeff, &coeffs);
                self.regs.ctl.write(CSC_CTL::EN::SET);
            }
            None => {
                debug!("dcsc{}: bypass", self.info.id);
                self.regs.ctl.write(CSC_CTL::EN::CLEAR);
            }
        }
        self.regs.mark_dirty();
    }

    /// Active coefficients, `None` while bypassed.
    pub fn matrix(&self) -> Option<[i32; 12]> {
        self.regs
            .ctl
            .is_set(CSC_CTL::EN)
            .then(|| read_coeffs(&self.regs.coeff))
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        match self.matrix() {
            Some(c) => writeln!(out, "  dcsc: on {:?}", c),
            None => writeln!(out, "  dcsc: bypass"),
        }
    }
}
