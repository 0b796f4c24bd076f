//! CRC region monitor layouts.
//!
//! The shadow is split into four groups so the window table and step table
//! can be flushed independently of the control word.

use tock_registers::{register_bitfields, register_structs, registers::ReadWrite};

/// Upper bound of regions any CRC revision implements.
pub const CRC_REGION_MAX: usize = 8;

/// Live status word offset relative to the CRC register base.
pub const CRC_STATUS_OFFSET: usize = 0x40;
/// Live computed-value table offset relative to the CRC register base.
pub const CRC_VALUE_OFFSET: usize = 0x44;

register_structs! {
    pub CrcCtlRegs {
        (0x00 => pub ctl: ReadWrite<u32, CRC_CTL::Register>),
        (0x04 => pub pol: ReadWrite<u32, CRC_POL::Register>),
        (0x08 => @END),
    }
}

register_structs! {
    pub CrcWinRegs {
        (0x00 => pub win: [ReadWrite<u32, CRC_SPAN::Register>; 2 * CRC_REGION_MAX]),
        (0x40 => @END),
    }
}

register_structs! {
    pub CrcSizeRegs {
        (0x00 => pub size: ReadWrite<u32, CRC_SIZE::Register>),
        (0x04 => pub poly: ReadWrite<u32, CRC_POLY::Register>),
        (0x08 => pub run_frames: ReadWrite<u32>),
        (0x0C => @END),
    }
}

register_structs! {
    pub CrcStepRegs {
        (0x00 => pub step: [ReadWrite<u32, CRC_STEP::Register>; CRC_REGION_MAX]),
        (0x20 => @END),
    }
}

register_bitfields! {u32,
    pub CRC_CTL [
        EN OFFSET(0) NUMBITS(8) [],
        IRQ_EN OFFSET(8) NUMBITS(8) []
    ],

    pub CRC_POL [
        /// One bit per region: set checks pixels outside the window.
        OUTSIDE OFFSET(0) NUMBITS(8) []
    ],

    pub CRC_SPAN [
        START OFFSET(0) NUMBITS(13) [],
        END OFFSET(16) NUMBITS(13) []
    ],

    pub CRC_SIZE [
        WIDTH OFFSET(0) NUMBITS(13) [],
        HEIGHT OFFSET(16) NUMBITS(13) []
    ],

    pub CRC_POLY [
        POLY OFFSET(0) NUMBITS(16) [],
        INIT OFFSET(16) NUMBITS(16) []
    ],

    pub CRC_STEP [
        FRAMES OFFSET(0) NUMBITS(8) []
    ]
}
