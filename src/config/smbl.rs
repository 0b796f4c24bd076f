use super::DeVersion;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SmblDesc {
    pub width_max: u32,
    pub height_max: u32,
    /// Input-side color-space converter inside the SMBL block.
    pub support_csc: bool,
    pub hue_default: u32,
    pub reg_offset: usize,
}

static DE201_SMBL: [SmblDesc; 1] = [SmblDesc {
    width_max: 2048,
    height_max: 1536,
    support_csc: true,
    hue_default: 50,
    reg_offset: 0x1000,
}];

static DE350_SMBL: [SmblDesc; 1] = [SmblDesc {
    width_max: 4096,
    height_max: 2160,
    support_csc: false,
    hue_default: 50,
    reg_offset: 0x1000,
}];

static DE352_SMBL: [SmblDesc; 1] = [SmblDesc {
    width_max: 2048,
    height_max: 1152,
    support_csc: true,
    hue_default: 50,
    reg_offset: 0x1000,
}];

pub fn smbl_desc(version: DeVersion, id: u32) -> Option<&'static SmblDesc> {
    let table: &[SmblDesc] = match version {
        DeVersion::De201 => &DE201_SMBL,
        DeVersion::De350 => &DE350_SMBL,
        DeVersion::De352 => &DE352_SMBL,
        DeVersion::De355 => &[],
    };
    table.get(id as usize)
}
