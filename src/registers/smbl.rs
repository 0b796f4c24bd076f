//! Smart backlight layouts.

use tock_registers::{register_bitfields, register_structs, registers::ReadWrite};

/// Luma histogram buckets reported by the hardware.
pub const SMBL_HIST_BINS: usize = 8;
/// Entries in one luma gain curve.
pub const SMBL_LGC_LEN: usize = 256;

/// Live histogram offset relative to the SMBL register base.
pub const SMBL_HIST_OFFSET: usize = 0x60;

register_structs! {
    pub SmblCtlRegs {
        (0x00 => pub ctl: ReadWrite<u32, SMBL_CTL::Register>),
        (0x04 => pub size: ReadWrite<u32, SMBL_SIZE::Register>),
        (0x08 => pub win0: ReadWrite<u32, SMBL_WIN::Register>),
        (0x0C => pub win1: ReadWrite<u32, SMBL_WIN::Register>),
        (0x10 => pub filter: [ReadWrite<u32, SMBL_FILTER::Register>; 4]),
        (0x20 => pub csc_bypass: ReadWrite<u32, SMBL_CSC_BYPASS::Register>),
        (0x24 => @END),
    }
}

register_structs! {
    /// Gain curve, two 16-bit entries per word.
    pub SmblLutRegs {
        (0x000 => pub lgc: [ReadWrite<u32, SMBL_LGC::Register>; SMBL_LGC_LEN / 2]),
        (0x200 => @END),
    }
}

register_structs! {
    pub SmblCscRegs {
        (0x00 => pub ctl: ReadWrite<u32, SMBL_CSC_CTL::Register>),
        (0x04 => pub coeff: [ReadWrite<u32>; 12]),
        (0x34 => @END),
    }
}

register_bitfields! {u32,
    pub SMBL_CTL [
        EN OFFSET(0) NUMBITS(1) [],
        WIN_EN OFFSET(1) NUMBITS(1) [],
        HIST_CLR OFFSET(4) NUMBITS(1) []
    ],

    pub SMBL_SIZE [
        WIDTH OFFSET(0) NUMBITS(13) [],
        HEIGHT OFFSET(16) NUMBITS(13) []
    ],

    pub SMBL_WIN [
        X OFFSET(0) NUMBITS(13) [],
        Y OFFSET(16) NUMBITS(13) []
    ],

    pub SMBL_FILTER [
        C0 OFFSET(0) NUMBITS(8) [],
        C1 OFFSET(8) NUMBITS(8) [],
        C2 OFFSET(16) NUMBITS(8) [],
        C3 OFFSET(24) NUMBITS(8) []
    ],

    pub SMBL_CSC_BYPASS [
        BYPASS OFFSET(0) NUMBITS(1) []
    ],

    pub SMBL_LGC [
        LO OFFSET(0) NUMBITS(16) [],
        HI OFFSET(16) NUMBITS(16) []
    ],

    pub SMBL_CSC_CTL [
        EN OFFSET(0) NUMBITS(1) []
    ]
}
