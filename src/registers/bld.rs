//! Blender layout: six pipes, each routed from one channel-mux port.

use tock_registers::{register_bitfields, register_structs, registers::ReadWrite};

/// Pipes a blender can composite.
pub const BLD_PORT_MAX: usize = 6;

register_structs! {
    pub BldRegs {
        (0x00 => pub pipe_ctl: ReadWrite<u32, BLD_PIPE_CTL::Register>),
        (0x04 => pub fcolor: [ReadWrite<u32>; BLD_PORT_MAX]),
        (0x1C => pub insize: [ReadWrite<u32, BLD_SIZE::Register>; BLD_PORT_MAX]),
        (0x34 => pub offset: [ReadWrite<u32, BLD_OFFSET::Register>; BLD_PORT_MAX]),
        (0x4C => pub route: ReadWrite<u32, BLD_ROUTE::Register>),
        (0x50 => pub premul: ReadWrite<u32, BLD_PREMUL::Register>),
        (0x54 => pub bk_color: ReadWrite<u32>),
        (0x58 => pub out_size: ReadWrite<u32, BLD_SIZE::Register>),
        (0x5C => pub out_ctl: ReadWrite<u32, BLD_OUT_CTL::Register>),
        (0x60 => pub mode: [ReadWrite<u32, BLD_MODE::Register>; BLD_PORT_MAX]),
        (0x78 => @END),
    }
}

register_bitfields! {u32,
    pub BLD_PIPE_CTL [
        FC_EN OFFSET(0) NUMBITS(6) [],
        P_EN OFFSET(8) NUMBITS(6) []
    ],

    pub BLD_SIZE [
        WIDTH OFFSET(0) NUMBITS(13) [],
        HEIGHT OFFSET(16) NUMBITS(13) []
    ],

    pub BLD_OFFSET [
        X OFFSET(0) NUMBITS(16) [],
        Y OFFSET(16) NUMBITS(16) []
    ],

    /// Four bits per pipe holding the routed mux port.
    pub BLD_ROUTE [
        P0 OFFSET(0) NUMBITS(4) [],
        P1 OFFSET(4) NUMBITS(4) [],
        P2 OFFSET(8) NUMBITS(4) [],
        P3 OFFSET(12) NUMBITS(4) [],
        P4 OFFSET(16) NUMBITS(4) [],
        P5 OFFSET(20) NUMBITS(4) []
    ],

    pub BLD_PREMUL [
        EN OFFSET(0) NUMBITS(6) []
    ],

    pub BLD_OUT_CTL [
        INTERLACE OFFSET(1) NUMBITS(1) [],
        YUV OFFSET(4) NUMBITS(1) []
    ],

    /// Porter-Duff factors: 0 zero, 1 one, 2 Sa, 3 1-Sa, 4 Da, 5 1-Da.
    pub BLD_MODE [
        PFS OFFSET(0) NUMBITS(4) [],
        PFD OFFSET(8) NUMBITS(4) [],
        AFS OFFSET(16) NUMBITS(4) [],
        AFD OFFSET(24) NUMBITS(4) []
    ]
}
