use bitflags::bitflags;

use super::DeVersion;

bitflags! {
    /// Output byte formats a dither unit can reduce to.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DitherFmts: u32 {
        const RGB888 = 1 << 0;
        const RGB666 = 1 << 1;
        const RGB565 = 1 << 2;
        const RGB444 = 1 << 3;
    }
}

bitflags! {
    /// Spatial dithering algorithms.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DitherModes: u32 {
        const QUANTIZATION = 1 << 0;
        const FLOYD_STEINBERG = 1 << 1;
        const ORDERED = 1 << 2;
        const SIERRA_LITE = 1 << 3;
        const BURKE = 1 << 4;
        const RANDOM = 1 << 5;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DitherDesc {
    pub support_fmts: DitherFmts,
    pub support_modes: DitherModes,
    pub reg_offset: usize,
}

static DE201_DITHER: [DitherDesc; 1] = [DitherDesc {
    support_fmts: DitherFmts::RGB666.union(DitherFmts::RGB565),
    support_modes: DitherModes::QUANTIZATION
        .union(DitherModes::FLOYD_STEINBERG)
        .union(DitherModes::ORDERED),
    reg_offset: 0x0100,
}];

static DE350_DITHER: [DitherDesc; 2] = [
    DitherDesc {
        support_fmts: DitherFmts::all(),
        support_modes: DitherModes::all(),
        reg_offset: 0x0100,
    },
    DitherDesc {
        support_fmts: DitherFmts::all(),
        support_modes: DitherModes::all(),
        reg_offset: 0x0100,
    },
];

static DE352_DITHER: [DitherDesc; 1] = [DitherDesc {
    support_fmts: DitherFmts::RGB666
        .union(DitherFmts::RGB565)
        .union(DitherFmts::RGB444),
    support_modes: DitherModes::all().difference(DitherModes::RANDOM),
    reg_offset: 0x0100,
}];

static DE355_DITHER: [DitherDesc; 2] = [
    DitherDesc {
        support_fmts: DitherFmts::all(),
        support_modes: DitherModes::all(),
        reg_offset: 0x0100,
    },
    DitherDesc {
        support_fmts: DitherFmts::all().difference(DitherFmts::RGB888),
        support_modes: DitherModes::all().difference(DitherModes::RANDOM),
        reg_offset: 0x0100,
    },
];

pub fn dither_desc(version: DeVersion, id: u32) -> Option<&'static DitherDesc> {
    let table: &[DitherDesc] = match version {
        DeVersion::De201 => &DE201_DITHER,
        DeVersion::De350 => &DE350_DITHER,
        DeVersion::De352 => &DE352_DITHER,
        DeVersion::De355 => &DE355_DITHER,
    };
    table.get(id as usize)
}
