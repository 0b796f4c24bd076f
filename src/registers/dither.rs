use tock_registers::{register_bitfields, register_structs, registers::ReadWrite};

register_structs! {
    pub DitherRegs {
        (0x00 => pub ctl: ReadWrite<u32, DITHER_CTL::Register>),
        (0x04 => pub size: ReadWrite<u32, DITHER_SIZE::Register>),
        (0x08 => @END),
    }
}

register_bitfields! {u32,
    pub DITHER_CTL [
        EN OFFSET(0) NUMBITS(1) [],
        OUT_FMT OFFSET(4) NUMBITS(2) [
            Rgb888 = 0,
            Rgb666 = 1,
            Rgb565 = 2,
            Rgb444 = 3
        ],
        MODE OFFSET(8) NUMBITS(3) [
            Quantization = 0,
            FloydSteinberg = 1,
            Ordered = 2,
            SierraLite = 3,
            Burke = 4,
            Random = 5
        ],
        FIFO_3D OFFSET(12) NUMBITS(1) []
    ],

    pub DITHER_SIZE [
        WIDTH OFFSET(0) NUMBITS(13) [],
        HEIGHT OFFSET(16) NUMBITS(13) []
    ]
}
