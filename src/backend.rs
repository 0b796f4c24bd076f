//! Post-processing backend of one display pipe.
//!
//! The backend owns every optional leaf module of the pipe and decides, per
//! commit, which of them must be reprogrammed. The decision starts from the
//! snapshot taken on the previous commit ([`BackendInnerInfo`]): modules
//! whose enable state flips are dirty, geometry changes dirty the modules
//! that depend on frame size, and format changes dirty the modules that
//! depend on pixel encoding. Parameter-only updates of an enabled module ride
//! on the per-module dirty flags in [`BackendData`], which are cleared once
//! consumed.

use alloc::vec::Vec;
use core::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

use bitflags::bitflags;

use crate::{
    config::{ColorSpace, FormatSpace, ModuleCreateInfo},
    crc::{CrcHandle, CrcRegionCfg},
    csc::{
        DcscHandle,
        matrix::{Bcsh, Ctm, IDENTITY, to_coeffs},
    },
    deband::{DebandFrame, DebandHandle, DebandParams},
    dither::{DitherConfig, DitherHandle, DitherMode, DitherOutFmt},
    err::DeError,
    gamma::GammaHandle,
    osal::RegAllocator,
    registers::RegBlock,
    smbl::{DispSmblInfo, SmblDirty, SmblHandle},
};

/// Hue midpoint used when no unit implements the color matrix.
const HUE_DEFAULT: u32 = 50;
/// Highest bit depth the deband filter accepts.
const DEBAND_MAX_BITS: u32 = 10;

bitflags! {
    /// One bit per post-processing module.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PqModules: u32 {
        const CRC = 1 << 0;
        const GAMMA = 1 << 1;
        const CSC = 1 << 2;
        const DEBAND = 1 << 3;
        const SMBL = 1 << 4;
        const DITHER = 1 << 5;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct CscDirty: u32 {
        const BCSH = 1 << 0;
        const CTM = 1 << 1;
        /// Read back the active coefficients.
        const MATRIX = 1 << 2;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct DebandDirty: u32 {
        const ENABLE = 1 << 0;
        /// Tuning parameters, written or read back.
        const PQD = 1 << 1;
    }
}

/// Direction of a picture-quality request.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PqCmd {
    #[default]
    Write,
    Read,
}

/// Geometry and encoding of the frame being committed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BackendApplyCfg {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub bit_depth: u32,
    pub format: FormatSpace,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GammaData {
    pub dirty: bool,
    pub enable: bool,
    /// New LUT, or `None` to keep the current one.
    pub lut: Option<Vec<u32>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CscData {
    pub dirty: CscDirty,
    pub bcsh: Bcsh,
    pub ctm: Option<Ctm>,
    /// Filled by a [`CscDirty::MATRIX`] read.
    pub matrix: [i32; 12],
}

impl Default for CscData {
    fn default() -> Self {
        Self {
            dirty: CscDirty::empty(),
            bcsh: Bcsh::neutral(HUE_DEFAULT),
            ctm: None,
            matrix: [0; 12],
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DebandData {
    pub dirty: DebandDirty,
    pub enable: bool,
    pub params: DebandParams,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DitherData {
    pub dirty: bool,
    pub enable: bool,
    pub out_fmt: DitherOutFmt,
    pub mode: DitherMode,
    pub enable_3d_fifo: bool,
}

/// Per-module picture-quality payload of one commit.
///
/// Each dirty flag is consumed (cleared) by the call that acts on it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackendData {
    pub cmd: PqCmd,
    pub gamma: GammaData,
    pub csc: CscData,
    pub deband: DebandData,
    pub smbl: DispSmblInfo,
    pub dither: DitherData,
}

impl BackendData {
    fn has_write_intent(&self) -> bool {
        self.gamma.dirty
            || self.dither.dirty
            || !self.smbl.dirty.is_empty()
            || self.csc.dirty.intersects(CscDirty::BCSH | CscDirty::CTM)
            || self.deband.dirty.contains(DebandDirty::ENABLE)
    }
}

/// What the hardware state reflects after the last commit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BackendInnerInfo {
    pub width: u32,
    pub height: u32,
    pub cs: ColorSpace,
    pub bits: u32,
    pub fmt: FormatSpace,
    pub size_dirty: bool,
    pub enable: PqModules,
    pub module_dirty: PqModules,
}

/// Unit carrying the color matrix on this revision, picked once at create.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorMatrixUnit {
    Gamma,
    Smbl,
    Dcsc,
    None,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BackendFeatures {
    pub support_gamma: bool,
    pub gamma_lut_len: u32,
    pub hue_default_value: u32,
    pub color_matrix: ColorMatrixUnit,
    pub modules: PqModules,
}

/// Exchanged with the vblank tasklet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskletState {
    /// Backlight the panel is currently driven at.
    pub backlight: u32,
    /// Set when the tasklet should run again next frame.
    pub need_schedule: bool,
    /// Set when `dimming` holds a new value for backlight consumers.
    pub dimming_changed: bool,
    pub dimming: u32,
}

/// Whether deband can run on frames of this encoding.
pub fn deband_allowed(fmt: FormatSpace, cs: ColorSpace, bits: u32) -> bool {
    if bits > DEBAND_MAX_BITS {
        return false;
    }
    match fmt {
        FormatSpace::Rgb => matches!(
            cs,
            ColorSpace::Bt601 | ColorSpace::Bt2020Nc | ColorSpace::Bt2020C
        ),
        FormatSpace::Yuv422 | FormatSpace::Yuv420 => true,
        FormatSpace::Yuv444 => false,
    }
}

pub struct Backend {
    info: ModuleCreateInfo,
    crc: Option<CrcHandle>,
    gamma: Option<GammaHandle>,
    dcsc: Option<DcscHandle>,
    deband: Option<DebandHandle>,
    smbl: Option<SmblHandle>,
    dither: Option<DitherHandle>,
    color_matrix: ColorMatrixUnit,
    present: PqModules,
    /// Modules the caller wants on, before format policy.
    requested: PqModules,
    inner: BackendInnerInfo,
    bcsh: Option<Bcsh>,
    ctm: Option<Ctm>,
    dither_cfg: DitherConfig,
    /// Dimming reported by the previous `vblank_work`.
    last_dimming: AtomicU32,
}

impl Backend {
    /// Creates every leaf module this display has.
    ///
    /// Absent modules are skipped; an allocation failure in any of them
    /// fails the whole backend.
    pub fn create(info: &ModuleCreateInfo, alloc: &dyn RegAllocator) -> Result<Self, DeError> {
        let crc = CrcHandle::create(info, alloc)?;
        let gamma = GammaHandle::create(info, alloc)?;
        let dither = DitherHandle::create(info, alloc)?;
        let smbl = SmblHandle::create(info, alloc)?;
        let deband = DebandHandle::create(info, alloc)?;
        let dcsc = DcscHandle::create(info, alloc)?;

        let color_matrix = if gamma.as_ref().is_some_and(|g| g.support_ctm()) {
            ColorMatrixUnit::Gamma
        } else if smbl.as_ref().is_some_and(|s| s.support_csc()) {
            ColorMatrixUnit::Smbl
        } else if dcsc.is_some() {
            ColorMatrixUnit::Dcsc
        } else {
            ColorMatrixUnit::None
        };

        let mut present = PqModules::empty();
        present.set(PqModules::CRC, crc.is_some());
        present.set(PqModules::GAMMA, gamma.is_some());
        present.set(PqModules::CSC, color_matrix != ColorMatrixUnit::None);
        present.set(PqModules::DEBAND, deband.is_some());
        present.set(PqModules::SMBL, smbl.is_some());
        present.set(PqModules::DITHER, dither.is_some());

        let backend = Self {
            info: info.clone(),
            crc,
            gamma,
            dcsc,
            deband,
            smbl,
            dither,
            color_matrix,
            present,
            requested: PqModules::CSC | PqModules::DEBAND,
            inner: BackendInnerInfo::default(),
            bcsh: None,
            ctm: None,
            dither_cfg: DitherConfig::default(),
            last_dimming: AtomicU32::new(256),
        };
        info!(
            "backend{}: {:?} modules {:?} color matrix {:?}",
            info.id, info.version, present, color_matrix
        );
        Ok(backend)
    }

    pub fn id(&self) -> u32 {
        self.info.id
    }

    pub fn features(&self) -> BackendFeatures {
        let hue_default_value = match self.color_matrix {
            ColorMatrixUnit::Gamma => self.gamma.as_ref().map(|g| g.hue_default()),
            ColorMatrixUnit::Smbl => self.smbl.as_ref().map(|s| s.hue_default()),
            ColorMatrixUnit::Dcsc => self.dcsc.as_ref().map(|c| c.hue_default()),
            ColorMatrixUnit::None => None,
        }
        .unwrap_or(HUE_DEFAULT);

        BackendFeatures {
            support_gamma: self.gamma.is_some(),
            gamma_lut_len: self.gamma.as_ref().map_or(0, |g| g.lut_len()),
            hue_default_value,
            color_matrix: self.color_matrix,
            modules: self.present,
        }
    }

    pub fn inner_info(&self) -> &BackendInnerInfo {
        &self.inner
    }

    pub fn crc(&self) -> Option<&CrcHandle> {
        self.crc.as_ref()
    }

    pub fn gamma(&self) -> Option<&GammaHandle> {
        self.gamma.as_ref()
    }

    pub fn deband(&self) -> Option<&DebandHandle> {
        self.deband.as_ref()
    }

    pub fn smbl(&self) -> Option<&SmblHandle> {
        self.smbl.as_ref()
    }

    pub fn dither(&self) -> Option<&DitherHandle> {
        self.dither.as_ref()
    }

    pub fn dcsc(&self) -> Option<&DcscHandle> {
        self.dcsc.as_ref()
    }

    /// Every register block of every present module.
    pub fn reg_blocks(&self) -> impl Iterator<Item = &RegBlock> + '_ {
        let crc = self.crc.iter().flat_map(|m| m.reg_blocks());
        let gamma = self.gamma.iter().flat_map(|m| m.reg_blocks());
        let dcsc = self.dcsc.iter().flat_map(|m| m.reg_blocks());
        let deband = self.deband.iter().flat_map(|m| m.reg_blocks());
        let smbl = self.smbl.iter().flat_map(|m| m.reg_blocks());
        let dither = self.dither.iter().flat_map(|m| m.reg_blocks());
        crc.chain(gamma)
            .chain(dcsc)
            .chain(deband)
            .chain(smbl)
            .chain(dither)
    }

    /// Hands every dirty block to `sink` and clears its flag. Returns the
    /// number of blocks flushed.
    pub fn flush(&self, sink: &mut dyn FnMut(&RegBlock)) -> usize {
        let mut n = 0;
        for block in self.reg_blocks() {
            if block.take_dirty() {
                sink(block);
                n += 1;
            }
        }
        n
    }

    /// Takes a new snapshot for `cfg` and returns the modules that must be
    /// reprogrammed.
    pub fn check_and_reconfig(&mut self, cfg: &BackendApplyCfg) -> PqModules {
        let old = self.inner;
        let mut new = BackendInnerInfo {
            width: cfg.width,
            height: cfg.height,
            cs: cfg.color_space,
            bits: cfg.bit_depth,
            fmt: cfg.format,
            size_dirty: cfg.width != old.width || cfg.height != old.height,
            enable: self.requested & self.present,
            module_dirty: PqModules::empty(),
        };

        if !deband_allowed(new.fmt, new.cs, new.bits) {
            new.enable.remove(PqModules::DEBAND);
        }

        let mut dirty = new.enable ^ old.enable;
        if new.size_dirty {
            dirty |= PqModules::DEBAND | PqModules::DITHER;
        }
        if new.fmt != old.fmt || new.cs != old.cs {
            dirty |= PqModules::CSC | PqModules::DEBAND;
        }
        if new.bits != old.bits {
            dirty |= PqModules::DEBAND;
        }
        new.module_dirty = dirty & self.present;

        self.inner = new;
        new.module_dirty
    }

    fn absorb_requests(&mut self, data: &BackendData) {
        if data.gamma.dirty {
            self.requested.set(PqModules::GAMMA, data.gamma.enable);
        }
        if data.deband.dirty.contains(DebandDirty::ENABLE) {
            self.requested.set(PqModules::DEBAND, data.deband.enable);
        }
        if data.smbl.dirty.contains(SmblDirty::ENABLE) {
            self.requested.set(PqModules::SMBL, data.smbl.enable);
        }
        if data.dither.dirty {
            self.requested.set(PqModules::DITHER, data.dither.enable);
            self.dither_cfg.out_fmt = data.dither.out_fmt;
            self.dither_cfg.mode = data.dither.mode;
            self.dither_cfg.enable_3d_fifo = data.dither.enable_3d_fifo;
        }
    }

    fn apply_color_matrix(
        &mut self,
        fmt: FormatSpace,
        cs: ColorSpace,
        bcsh: Option<Bcsh>,
        ctm: Option<Ctm>,
    ) -> Result<(), DeError> {
        let (bcsh, ctm) = (bcsh.as_ref(), ctm.as_ref());
        match self.color_matrix {
            ColorMatrixUnit::Gamma => match self.gamma.as_mut() {
                Some(g) => g.apply_ctm(fmt, cs, bcsh, ctm),
                None => Ok(()),
            },
            ColorMatrixUnit::Smbl => match self.smbl.as_ref() {
                Some(s) => s.apply_csc(fmt, cs, bcsh, ctm),
                None => Ok(()),
            },
            ColorMatrixUnit::Dcsc => {
                if let Some(c) = self.dcsc.as_mut() {
                    c.apply(fmt, cs, bcsh, ctm);
                }
                Ok(())
            }
            ColorMatrixUnit::None => Ok(()),
        }
    }

    /// Commits one frame: CRC size, gamma, color matrix, deband, SMBL and
    /// dither, in that order.
    ///
    /// Every module is processed even when an earlier one fails; the first
    /// failure is returned and the commit should be rejected.
    pub fn apply(
        &mut self,
        mut data: Option<&mut BackendData>,
        cfg: &BackendApplyCfg,
    ) -> Result<(), DeError> {
        if let Some(d) = data.as_deref() {
            if d.cmd != PqCmd::Write || d.csc.dirty.contains(CscDirty::MATRIX) {
                error!("backend{}: read request on the apply path", self.info.id);
                return Err(DeError::PqdContract);
            }
            self.absorb_requests(d);
        }

        let dirty = self.check_and_reconfig(cfg);
        let inner = self.inner;
        let mut result = Ok(());
        debug!(
            "backend{}: {}x{} {:?}/{:?}/{}bit enable {:?} dirty {:?} size_dirty {}",
            self.info.id,
            inner.width,
            inner.height,
            inner.fmt,
            inner.cs,
            inner.bits,
            inner.enable,
            dirty,
            inner.size_dirty
        );

        if inner.size_dirty {
            if let Some(crc) = self.crc.as_mut() {
                crc.global_config(inner.width, inner.height);
            }
        }

        if let Some(gamma) = self.gamma.as_mut() {
            let req = data.as_deref_mut().map(|d| &mut d.gamma);
            let user_dirty = req.as_ref().is_some_and(|g| g.dirty);
            if dirty.contains(PqModules::GAMMA) || user_dirty {
                if inner.enable.contains(PqModules::GAMMA) {
                    let lut = req.as_ref().and_then(|g| g.lut.as_deref());
                    if let Err(e) = gamma.apply(true, lut) {
                        gamma.disable();
                        self.inner.enable.remove(PqModules::GAMMA);
                        result = result.and(Err(e));
                    }
                } else {
                    gamma.disable();
                }
            }
            if let Some(g) = req {
                g.dirty = false;
            }
        }

        {
            let mut user_dirty = false;
            if let Some(d) = data.as_deref_mut() {
                if d.csc.dirty.contains(CscDirty::BCSH) {
                    self.bcsh = Some(d.csc.bcsh);
                    user_dirty = true;
                }
                if d.csc.dirty.contains(CscDirty::CTM) {
                    self.ctm = d.csc.ctm;
                    user_dirty = true;
                }
                d.csc.dirty.remove(CscDirty::BCSH | CscDirty::CTM);
            }
            if dirty.contains(PqModules::CSC) || (user_dirty && self.present.contains(PqModules::CSC))
            {
                let (bcsh, ctm) = if inner.enable.contains(PqModules::CSC) {
                    (self.bcsh, self.ctm)
                } else {
                    (None, None)
                };
                if let Err(e) = self.apply_color_matrix(inner.fmt, inner.cs, bcsh, ctm) {
                    warn!("backend{}: color matrix not applied: {}", self.info.id, e);
                }
            }
        }

        if let Some(deband) = self.deband.as_mut() {
            let req = data.as_deref_mut().map(|d| &mut d.deband);
            let user_dirty = req.as_ref().is_some_and(|d| !d.dirty.is_empty());
            if dirty.contains(PqModules::DEBAND) || user_dirty {
                let params = req
                    .as_ref()
                    .filter(|d| d.dirty.contains(DebandDirty::PQD))
                    .map(|d| d.params);
                let frame = DebandFrame {
                    width: inner.width,
                    height: inner.height,
                    fmt: inner.fmt,
                    cs: inner.cs,
                    bits: inner.bits,
                };
                let enable = inner.enable.contains(PqModules::DEBAND);
                if let Err(e) = deband.apply(enable, &frame, params.as_ref()) {
                    self.inner.enable.remove(PqModules::DEBAND);
                    result = result.and(Err(e));
                }
            }
            if let Some(d) = req {
                d.dirty = DebandDirty::empty();
            }
        }

        if let Some(smbl) = self.smbl.as_ref() {
            let req = data.as_deref_mut().map(|d| &mut d.smbl);
            let mut smbl_info = req.as_deref().copied().unwrap_or_default();
            let enabled = inner.enable.contains(PqModules::SMBL);
            if dirty.contains(PqModules::SMBL) || (inner.size_dirty && enabled) {
                smbl_info.dirty |= SmblDirty::ENABLE;
                smbl_info.enable = enabled;
            }
            if !smbl_info.dirty.is_empty() {
                if let Err(e) = smbl.apply(inner.width, inner.height, &smbl_info) {
                    self.inner.enable.remove(PqModules::SMBL);
                    result = result.and(Err(e));
                }
            }
            if let Some(s) = req {
                s.dirty = SmblDirty::empty();
            }
        }

        if let Some(dither) = self.dither.as_mut() {
            let user_dirty = data.as_deref().is_some_and(|d| d.dither.dirty);
            if dirty.contains(PqModules::DITHER) || user_dirty {
                self.dither_cfg.width = inner.width;
                self.dither_cfg.height = inner.height;
                self.dither_cfg.enable = inner.enable.contains(PqModules::DITHER);
                if self.dither_cfg.enable {
                    match dither.validate(self.dither_cfg.out_fmt, self.dither_cfg.mode) {
                        Ok(()) => dither.config(&self.dither_cfg),
                        Err(e) => {
                            dither.enable(false);
                            self.inner.enable.remove(PqModules::DITHER);
                            result = result.and(Err(e));
                        }
                    }
                } else {
                    dither.enable(false);
                }
            }
            if let Some(d) = data.as_deref_mut() {
                d.dither.dirty = false;
            }
        }

        result
    }

    /// Serves a picture-quality read-back request.
    ///
    /// The request must carry [`PqCmd::Read`] and nothing but
    /// [`DebandDirty::PQD`] and/or [`CscDirty::MATRIX`]. The bits that were
    /// served are cleared.
    pub fn get_pqd_config(&self, data: &mut BackendData) -> Result<(), DeError> {
        let deband_req = data.deband.dirty;
        let csc_req = data.csc.dirty;
        let valid = data.cmd == PqCmd::Read
            && !data.has_write_intent()
            && (deband_req.is_empty() || deband_req == DebandDirty::PQD)
            && (csc_req.is_empty() || csc_req == CscDirty::MATRIX)
            && !(deband_req.is_empty() && csc_req.is_empty());
        if !valid {
            error!(
                "backend{}: bad pqd request {:?} deband {:?} csc {:?}",
                self.info.id, data.cmd, deband_req, csc_req
            );
            return Err(DeError::PqdContract);
        }

        if !deband_req.is_empty() {
            let deband = self.deband.as_ref().ok_or(DeError::Unsupported)?;
            data.deband.params = deband.params();
            data.deband.enable = deband.is_enabled();
        }
        if !csc_req.is_empty() {
            let active = match self.color_matrix {
                ColorMatrixUnit::Gamma => self.gamma.as_ref().and_then(|g| g.matrix()),
                ColorMatrixUnit::Smbl => self.smbl.as_ref().and_then(|s| s.matrix()),
                ColorMatrixUnit::Dcsc => self.dcsc.as_ref().and_then(|c| c.matrix()),
                ColorMatrixUnit::None => return Err(DeError::Unsupported),
            };
            data.csc.matrix = active.unwrap_or_else(|| to_coeffs(&IDENTITY));
        }

        data.deband.dirty.remove(DebandDirty::PQD);
        data.csc.dirty.remove(CscDirty::MATRIX);
        Ok(())
    }

    /// Turns every module off and forgets the snapshot, so that the next
    /// `apply` reprograms everything.
    pub fn disable(&mut self) {
        self.inner = BackendInnerInfo::default();

        if let Some(deband) = self.deband.as_mut() {
            deband.disable();
        }
        if let Some(smbl) = self.smbl.as_ref() {
            let off = DispSmblInfo {
                dirty: SmblDirty::ENABLE,
                enable: false,
                ..DispSmblInfo::default()
            };
            if let Err(e) = smbl.apply(0, 0, &off) {
                warn!("backend{}: smbl disable failed: {}", self.info.id, e);
            }
        }
        if let Some(gamma) = self.gamma.as_mut() {
            gamma.disable();
        }
        if let Some(dither) = self.dither.as_mut() {
            dither.enable(false);
        }
        if let Err(e) =
            self.apply_color_matrix(FormatSpace::Rgb, ColorSpace::Bt601, None, None)
        {
            warn!("backend{}: color matrix bypass failed: {}", self.info.id, e);
        }
        debug!("backend{}: disabled", self.info.id);
    }

    pub fn crc_region_config(&mut self, cfg: &CrcRegionCfg) -> Result<(), DeError> {
        self.crc
            .as_mut()
            .ok_or(DeError::Unsupported)?
            .region_config(cfg)
    }

    /// Fired CRC regions out of `region_mask`, 0 without a CRC monitor.
    pub fn check_crc_status_with_clear(&self, region_mask: u32) -> u32 {
        self.crc
            .as_ref()
            .map_or(0, |crc| crc.check_status_with_clear(region_mask))
    }

    pub fn is_need_update_work(&self) -> bool {
        self.smbl.is_some()
    }

    pub fn is_need_vblank_work(&self) -> bool {
        self.smbl.is_some()
    }

    /// Per-frame deferred work: forwards backlight changes into SMBL and
    /// runs its power-save step.
    pub fn process_late(&self, state: &mut TaskletState) {
        let Some(smbl) = self.smbl.as_ref() else {
            return;
        };

        let status = smbl.get_status();
        if status.isenable
            && state.backlight != status.backlight
            && state.backlight != status.backlight_after_dimming
        {
            smbl.set_backlight(state.backlight);
            state.need_schedule = true;
        }

        smbl.update_local_param(false);
        if smbl.get_status().isenable {
            state.need_schedule = true;
        }
    }

    /// Reports a changed dimming factor to backlight consumers.
    pub fn vblank_work(&self, state: &mut TaskletState) {
        let Some(smbl) = self.smbl.as_ref() else {
            return;
        };
        let dimming = smbl.get_status().dimming;
        if self.last_dimming.swap(dimming, Ordering::AcqRel) != dimming {
            state.dimming_changed = true;
            state.dimming = dimming;
        }
    }

    pub fn dump_state(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let i = &self.inner;
        writeln!(
            out,
            "backend{} ({:?}): {}x{} {:?} {:?} {}bit",
            self.info.id, self.info.version, i.width, i.height, i.fmt, i.cs, i.bits
        )?;
        writeln!(
            out,
            "  present {:?} enable {:?} color matrix {:?}",
            self.present, i.enable, self.color_matrix
        )?;
        if let Some(m) = &self.crc {
            m.dump(out)?;
        }
        if let Some(m) = &self.gamma {
            m.dump(out)?;
        }
        if let Some(m) = &self.dcsc {
            m.dump(out)?;
        }
        if let Some(m) = &self.deband {
            m.dump(out)?;
        }
        if let Some(m) = &self.smbl {
            m.dump(out)?;
        }
        if let Some(m) = &self.dither {
            m.dump(out)?;
        }
        Ok(())
    }
}
