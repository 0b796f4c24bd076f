use tock_registers::{register_bitfields, register_structs, registers::ReadWrite};

register_structs! {
    pub GammaCtlRegs {
        (0x00 => pub ctl: ReadWrite<u32, GAMMA_CTL::Register>),
        (0x04 => pub ctm: [ReadWrite<u32>; 12]),
        (0x34 => @END),
    }
}

register_bitfields! {u32,
    pub GAMMA_CTL [
        EN OFFSET(0) NUMBITS(1) [],
        CTM_EN OFFSET(4) NUMBITS(1) [],
        BLUE_FIRST OFFSET(8) NUMBITS(1) []
    ]
}

/// Packs one 10-bit-per-channel LUT entry.
pub const fn gamma_entry(r: u16, g: u16, b: u16) -> u32 {
    ((r as u32 & 0x3ff) << 20) | ((g as u32 & 0x3ff) << 10) | (b as u32 & 0x3ff)
}
