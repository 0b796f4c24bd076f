mod common;

use common::{CRC_STATUS, HeapAlloc, MockIo, create_info};
use sunxi_de::{
    CRC_DEFAULT_POLY, CrcHandle, CrcMode, CrcRegionCfg, DeError, DeVersion,
    registers::crc::CRC_VALUE_OFFSET,
};

fn crc(version: DeVersion, id: u32) -> (CrcHandle, std::sync::Arc<MockIo>) {
    let io = MockIo::new();
    let alloc = HeapAlloc::new();
    let handle = CrcHandle::create(&create_info(version, id, &io), &alloc)
        .unwrap()
        .unwrap();
    (handle, io)
}

fn status_bits(regions: u32) -> u32 {
    (0..8)
        .filter(|r| regions & (1 << r) != 0)
        .map(|r| 1u32 << (r << 2))
        .sum()
}

#[test]
fn status_clear_reports_and_acks_exact_subset() {
    let (handle, io) = crc(DeVersion::De355, 0);
    // bits 1 and 3 are not region bits and must survive every ack
    let noise = 0b1010;

    for hw in [0x00u32, 0xff, 0xa5, 0x3c, 0x81] {
        for mask in 0..=0xffu32 {
            let before = status_bits(hw) | noise;
            io.set(CRC_STATUS, before);

            let fired = handle.check_status_with_clear(mask);

            assert_eq!(fired, mask & hw, "hw {hw:#x} mask {mask:#x}");
            assert_eq!(io.get(CRC_STATUS), before & !status_bits(fired));
        }
    }
}

#[test]
fn status_clear_writes_even_when_nothing_fired() {
    let (handle, io) = crc(DeVersion::De350, 1);
    io.set(CRC_STATUS, status_bits(0xf));

    assert_eq!(handle.check_status_with_clear(0), 0);
    assert_eq!(io.writes(), vec![(CRC_STATUS, 0)]);
    assert_eq!(io.get(CRC_STATUS), status_bits(0xf));
}

#[test]
fn status_ignores_regions_beyond_descriptor() {
    // display 1 of DE350 has four regions
    let (handle, io) = crc(DeVersion::De350, 1);
    io.set(CRC_STATUS, status_bits(0xff));

    assert_eq!(handle.check_status_with_clear(0xff), 0x0f);
    assert_eq!(io.get(CRC_STATUS), status_bits(0xf0));
}

#[test]
fn region_out_of_range_is_rejected() {
    let (mut handle, _io) = crc(DeVersion::De352, 0);
    let cfg = CrcRegionCfg {
        region: 4,
        enable: true,
        ..Default::default()
    };

    assert_eq!(handle.region_config(&cfg), Err(DeError::InvalidArgument));
    assert_eq!(handle.set_polarity(8, CrcMode::Outside), Err(DeError::InvalidArgument));
    assert_eq!(handle.enable_region(9, true, true), Err(DeError::InvalidArgument));
    assert_eq!(handle.read_value(4), Err(DeError::InvalidArgument));
    assert!(handle.reg_blocks().all(|b| !b.is_dirty()));
}

#[test]
fn region_config_programs_window_and_reloads_poly() {
    let (mut handle, _io) = crc(DeVersion::De355, 1);
    let cfg = CrcRegionCfg {
        region: 2,
        enable: true,
        irq_enable: true,
        mode: CrcMode::Outside,
        check_frame_step: 3,
        x_start: 10,
        x_end: 99,
        y_start: 20,
        y_end: 199,
    };
    handle.region_config(&cfg).unwrap();

    assert_eq!(handle.enabled_regions(), 1 << 2);
    assert!(handle.reg_blocks().all(|b| b.is_dirty()));

    let size_block: Vec<u32> = handle.reg_blocks().nth(2).unwrap().words().collect();
    assert_eq!(size_block[1] & 0xffff, CRC_DEFAULT_POLY);

    let win: Vec<u32> = handle.reg_blocks().nth(1).unwrap().words().collect();
    assert_eq!(win[4], 10 | 99 << 16);
    assert_eq!(win[5], 20 | 199 << 16);

    handle.enable_region(2, false, true).unwrap();
    assert_eq!(handle.enabled_regions(), 0);
}

#[test]
fn global_config_marks_size_block() {
    let (mut handle, _io) = crc(DeVersion::De350, 0);
    handle.global_config(1920, 1080);

    assert_eq!(handle.frame_size(), (1920, 1080));
    let dirty: Vec<bool> = handle.reg_blocks().map(|b| b.is_dirty()).collect();
    assert_eq!(dirty, vec![false, false, true, false]);
}

#[test]
fn read_value_comes_from_live_registers() {
    let (handle, io) = crc(DeVersion::De350, 0);
    io.set(CRC_VALUE_OFFSET + 3 * 4, 0xbeef);
    assert_eq!(handle.read_value(3), Ok(0xbeef));
}
