mod common;

use std::sync::Arc;

use common::{HeapAlloc, MockIo, create_info};
use sunxi_de::{
    Bcsh, ColorSpace, DeError, DeVersion, DispSmblInfo, FormatSpace, SmblDirty, SmblHandle,
    SmblWindow,
    pwrsave::{HIST_SENTINEL, IEP_LH_PWRSV_NUM, PWRSAVE_PROC_THRES},
};

fn smbl(version: DeVersion) -> (SmblHandle, Arc<MockIo>) {
    let io = MockIo::new();
    let alloc = HeapAlloc::new();
    let handle = SmblHandle::create(&create_info(version, 0, &io), &alloc)
        .unwrap()
        .unwrap();
    (handle, io)
}

fn enable(backlight: u32) -> DispSmblInfo {
    DispSmblInfo {
        dirty: SmblDirty::ENABLE | SmblDirty::BL,
        enable: true,
        backlight,
        ..Default::default()
    }
}

const DARK: [u32; 8] = [1_000_000, 0, 0, 0, 0, 0, 0, 0];

#[test]
fn size_limit_boundary() {
    // DE201: 2048x1536
    let (handle, _io) = smbl(DeVersion::De201);

    assert_eq!(handle.apply(2048, 1536, &enable(200)), Ok(()));
    assert!(handle.get_status().isenable);
    assert!(handle.is_hw_enabled());

    for (w, h) in [(2049, 1536), (2048, 1537)] {
        let err = handle.apply(w, h, &enable(200)).unwrap_err();
        assert_eq!(
            err,
            DeError::SizeLimit {
                width: w,
                height: h,
                max_width: 2048,
                max_height: 1536
            }
        );
        assert!(!handle.get_status().isenable);
        assert!(!handle.is_hw_enabled());

        handle.apply(2048, 1536, &enable(200)).unwrap();
    }
}

#[test]
fn size_error_skips_other_updates() {
    let (handle, _io) = smbl(DeVersion::De352);
    assert!(handle.apply(4096, 2160, &enable(123)).is_err());
    assert_eq!(handle.get_status().backlight, 0);
}

#[test]
fn first_enable_resets_history_and_writes_neutral_curve() {
    let (handle, io) = smbl(DeVersion::De350);
    io.set_histogram(DeVersion::De350, 0, &DARK);

    handle.apply(1000, 1000, &enable(255)).unwrap();
    let lut: Vec<u32> = handle.reg_blocks().nth(1).unwrap().words().collect();
    assert_eq!(lut[0], 1 << 16);
    assert_eq!(lut[127], 254 | 255 << 16);

    assert!(handle.update_local_param(true));
    assert_eq!(handle.get_status().dimming, 237);
    assert_eq!(handle.get_status().runtime, 1);

    // off and on again starts from a clean history
    handle
        .apply(
            1000,
            1000,
            &DispSmblInfo {
                dirty: SmblDirty::ENABLE,
                enable: false,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(handle.get_status().min_adj_index_hist[0], 102);
    handle.apply(1000, 1000, &enable(255)).unwrap();
    let st = handle.get_status();
    assert_eq!(st.runtime, 0);
    assert_eq!(st.dimming, 256);
    assert_eq!(st.min_adj_index_hist, [HIST_SENTINEL; IEP_LH_PWRSV_NUM]);
}

#[test]
fn low_backlight_keeps_full_gain() {
    let (handle, io) = smbl(DeVersion::De350);
    io.set_histogram(DeVersion::De350, 0, &DARK);
    handle.apply(1000, 1000, &enable(255)).unwrap();
    handle.update_local_param(true);
    assert!(handle.get_status().dimming < 256);

    for backlight in [0, 1, PWRSAVE_PROC_THRES - 1] {
        handle.set_backlight(backlight);
        handle.update_local_param(true);
        let st = handle.get_status();
        assert_eq!(st.dimming, 256);
        assert_eq!(st.min_adj_index_hist, [HIST_SENTINEL; IEP_LH_PWRSV_NUM]);
        assert_eq!(st.backlight_after_dimming, backlight);
    }
}

#[test]
fn update_runs_every_other_frame() {
    let (handle, _io) = smbl(DeVersion::De350);
    handle.apply(640, 480, &enable(255)).unwrap();

    assert!(handle.update_local_param(false));
    assert!(!handle.update_local_param(false));
    assert!(handle.update_local_param(false));
    assert!(handle.update_local_param(true));
}

#[test]
fn update_is_noop_while_disabled() {
    let (handle, _io) = smbl(DeVersion::De350);
    assert!(!handle.update_local_param(true));
    assert_eq!(handle.get_status().runtime, 0);
}

#[test]
fn lut_upload_only_on_change() {
    let (handle, io) = smbl(DeVersion::De350);
    handle.apply(1000, 1000, &enable(255)).unwrap();
    let lut = handle.reg_blocks().nth(1).unwrap();
    lut.take_dirty();

    // empty histogram: no adjustment, neutral curve already in place
    handle.update_local_param(true);
    assert!(!lut.is_dirty());

    io.set_histogram(DeVersion::De350, 0, &DARK);
    handle.update_local_param(true);
    assert!(lut.take_dirty());
}

#[test]
fn window_and_backlight_in_one_call() {
    let (handle, _io) = smbl(DeVersion::De350);
    let info = DispSmblInfo {
        dirty: SmblDirty::WINDOW | SmblDirty::BL,
        enable: false,
        window: SmblWindow {
            x: 8,
            y: 16,
            width: 100,
            height: 50,
        },
        backlight: 180,
    };
    handle.apply(640, 480, &info).unwrap();

    let ctl: Vec<u32> = handle.reg_blocks().next().unwrap().words().collect();
    assert_eq!(ctl[2], 8 | 16 << 16);
    assert_eq!(ctl[3], 107 | 65 << 16);
    assert_eq!(handle.get_status().backlight, 180);
    assert!(!handle.get_status().isenable);
}

#[test]
fn input_csc_follows_bcsh() {
    let (handle, _io) = smbl(DeVersion::De201);
    assert!(handle.support_csc());
    assert_eq!(handle.matrix(), None);

    let bcsh = Bcsh {
        saturation: 80,
        ..Bcsh::neutral(handle.hue_default())
    };
    handle
        .apply_csc(FormatSpace::Yuv444, ColorSpace::Bt709, Some(&bcsh), None)
        .unwrap();
    let m = handle.matrix().unwrap();
    assert_eq!(m[0], 4096);

    handle
        .apply_csc(FormatSpace::Yuv444, ColorSpace::Bt709, None, None)
        .unwrap();
    assert_eq!(handle.matrix(), None);

    let (no_csc, _io) = smbl(DeVersion::De350);
    assert_eq!(
        no_csc.apply_csc(FormatSpace::Rgb, ColorSpace::Bt601, Some(&bcsh), None),
        Err(DeError::Unsupported)
    );
}

#[test]
fn out_of_range_inputs_saturate() {
    let (handle, io) = smbl(DeVersion::De350);
    io.set_histogram(DeVersion::De350, 0, &DARK);
    handle.apply(1000, 1000, &enable(u32::MAX)).unwrap();
    handle.update_local_param(true);
    let st = handle.get_status();
    assert_eq!(st.dimming, 237);
    assert_eq!(st.backlight_after_dimming, u32::MAX / 256);

    let info = DispSmblInfo {
        dirty: SmblDirty::WINDOW,
        window: SmblWindow {
            x: u32::MAX - 3,
            y: 0,
            width: 16,
            height: u32::MAX,
        },
        ..Default::default()
    };
    handle.apply(1000, 1000, &info).unwrap();
    let ctl: Vec<u32> = handle.reg_blocks().next().unwrap().words().collect();
    assert_eq!(ctl[3], 0x1ffe | 0x1ffe << 16);
}
