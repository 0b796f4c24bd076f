use tock_registers::{register_bitfields, register_structs, registers::ReadWrite};

register_structs! {
    pub CscRegs {
        (0x00 => pub ctl: ReadWrite<u32, CSC_CTL::Register>),
        (0x04 => pub coeff: [ReadWrite<u32>; 12]),
        (0x34 => @END),
    }
}

register_bitfields! {u32,
    pub CSC_CTL [
        EN OFFSET(0) NUMBITS(1) []
    ]
}
