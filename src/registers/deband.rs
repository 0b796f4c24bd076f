use tock_registers::{register_bitfields, register_structs, registers::ReadWrite};

register_structs! {
    pub DebandRegs {
        (0x00 => pub ctl: ReadWrite<u32, DEBAND_CTL::Register>),
        (0x04 => pub size: ReadWrite<u32, DEBAND_SIZE::Register>),
        (0x08 => pub thr: ReadWrite<u32, DEBAND_THR::Register>),
        (0x0C => pub step: ReadWrite<u32, DEBAND_STEP::Register>),
        (0x10 => @END),
    }
}

register_bitfields! {u32,
    pub DEBAND_CTL [
        EN OFFSET(0) NUMBITS(1) [],
        OUT_BITS OFFSET(4) NUMBITS(2) [
            Bits8 = 0,
            Bits10 = 1
        ],
        CHROMA OFFSET(8) NUMBITS(2) [
            Rgb = 0,
            Yuv444 = 1,
            Yuv422 = 2,
            Yuv420 = 3
        ],
        CS_WIDE OFFSET(12) NUMBITS(1) []
    ],

    pub DEBAND_SIZE [
        WIDTH OFFSET(0) NUMBITS(13) [],
        HEIGHT OFFSET(16) NUMBITS(13) []
    ],

    pub DEBAND_THR [
        LUMA OFFSET(0) NUMBITS(8) [],
        CHROMA OFFSET(8) NUMBITS(8) [],
        EDGE OFFSET(16) NUMBITS(8) []
    ],

    pub DEBAND_STEP [
        H OFFSET(0) NUMBITS(4) [],
        V OFFSET(4) NUMBITS(4) [],
        RANDOM_SEED OFFSET(16) NUMBITS(16) []
    ]
}
