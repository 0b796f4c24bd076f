use super::DeVersion;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CrcDesc {
    /// Regions the monitor can check in one frame.
    pub region_cnt: u32,
    pub reg_offset: usize,
}

static DE350_CRC: [CrcDesc; 2] = [
    CrcDesc {
        region_cnt: 8,
        reg_offset: 0x0000,
    },
    CrcDesc {
        region_cnt: 4,
        reg_offset: 0x0000,
    },
];

static DE352_CRC: [CrcDesc; 1] = [CrcDesc {
    region_cnt: 4,
    reg_offset: 0x0000,
}];

static DE355_CRC: [CrcDesc; 2] = [
    CrcDesc {
        region_cnt: 8,
        reg_offset: 0x0000,
    },
    CrcDesc {
        region_cnt: 8,
        reg_offset: 0x0000,
    },
];

pub fn crc_desc(version: DeVersion, id: u32) -> Option<&'static CrcDesc> {
    let table: &[CrcDesc] = match version {
        DeVersion::De201 => &[],
        DeVersion::De350 => &DE350_CRC,
        DeVersion::De352 => &DE352_CRC,
        DeVersion::De355 => &DE355_CRC,
    };
    table.get(id as usize)
}
