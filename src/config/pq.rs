//! Gamma, deband and DCSC descriptors.

use super::DeVersion;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GammaDesc {
    pub lut_len: u32,
    /// The gamma unit carries the color transform matrix.
    pub support_ctm: bool,
    pub hue_default: u32,
    pub reg_offset: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DebandDesc {
    pub width_max: u32,
    pub height_max: u32,
    pub reg_offset: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DcscDesc {
    pub hue_default: u32,
    pub reg_offset: usize,
}

const GAMMA_256: GammaDesc = GammaDesc {
    lut_len: 256,
    support_ctm: false,
    hue_default: 50,
    reg_offset: 0x2000,
};

const GAMMA_1024: GammaDesc = GammaDesc {
    lut_len: 1024,
    support_ctm: false,
    hue_default: 50,
    reg_offset: 0x2000,
};

const GAMMA_1024_CTM: GammaDesc = GammaDesc {
    lut_len: 1024,
    support_ctm: true,
    hue_default: 50,
    reg_offset: 0x2000,
};

static DE201_GAMMA: [GammaDesc; 2] = [GAMMA_256, GAMMA_256];
static DE350_GAMMA: [GammaDesc; 2] = [GAMMA_1024_CTM, GAMMA_1024_CTM];
static DE352_GAMMA: [GammaDesc; 1] = [GAMMA_1024];
static DE355_GAMMA: [GammaDesc; 2] = [GAMMA_1024, GAMMA_1024];

pub fn gamma_desc(version: DeVersion, id: u32) -> Option<&'static GammaDesc> {
    let table: &[GammaDesc] = match version {
        DeVersion::De201 => &DE201_GAMMA,
        DeVersion::De350 => &DE350_GAMMA,
        DeVersion::De352 => &DE352_GAMMA,
        DeVersion::De355 => &DE355_GAMMA,
    };
    table.get(id as usize)
}

const DEBAND: DebandDesc = DebandDesc {
    width_max: 4096,
    height_max: 2160,
    reg_offset: 0x3000,
};

static DE350_DEBAND: [DebandDesc; 1] = [DEBAND];
static DE352_DEBAND: [DebandDesc; 1] = [DEBAND];
static DE355_DEBAND: [DebandDesc; 2] = [DEBAND, DEBAND];

pub fn deband_desc(version: DeVersion, id: u32) -> Option<&'static DebandDesc> {
    let table: &[DebandDesc] = match version {
        DeVersion::De201 => &[],
        DeVersion::De350 => &DE350_DEBAND,
        DeVersion::De352 => &DE352_DEBAND,
        DeVersion::De355 => &DE355_DEBAND,
    };
    table.get(id as usize)
}

const DCSC: DcscDesc = DcscDesc {
    hue_default: 50,
    reg_offset: 0x4000,
};

static DE350_DCSC: [DcscDesc; 2] = [DCSC, DCSC];
static DE355_DCSC: [DcscDesc; 2] = [DCSC, DCSC];

pub fn dcsc_desc(version: DeVersion, id: u32) -> Option<&'static DcscDesc> {
    let table: &[DcscDesc] = match version {
        DeVersion::De201 | DeVersion::De352 => &[],
        DeVersion::De350 => &DE350_DCSC,
        DeVersion::De355 => &DE355_DCSC,
    };
    table.get(id as usize)
}
