mod common;

use common::{HeapAlloc, MockIo, create_info};
use sunxi_de::{
    BK_COLOR_RGB, BK_COLOR_YUV, BlendMode, BldHandle, BldRect, DeError, DeVersion, FormatSpace,
    PipeOwner,
};

fn bld(version: DeVersion, id: u32) -> BldHandle {
    let io = MockIo::new();
    let alloc = HeapAlloc::new();
    BldHandle::create(&create_info(version, id, &io), &alloc)
        .unwrap()
        .unwrap()
}

const RECT: BldRect = BldRect {
    x: 16,
    y: 32,
    width: 640,
    height: 480,
};

#[test]
fn background_follows_format_space() {
    let mut handle = bld(DeVersion::De350, 0);
    for fmt in FormatSpace::ALL {
        handle.output_set_attr(1920, 1080, fmt, false);
        let (bk, fc) = if fmt == FormatSpace::Rgb {
            (BK_COLOR_RGB, 0xff00_0000)
        } else {
            (BK_COLOR_YUV, 0xff10_8080)
        };
        assert_eq!(handle.background(), bk, "{fmt:?}");
        assert_eq!(handle.fixed_color(0), Some(fc), "{fmt:?}");
        assert!(handle.reg_blocks().all(|b| b.take_dirty()));
    }
    assert_eq!(BK_COLOR_RGB, 0);
    assert_eq!(BK_COLOR_YUV, 0x108080);
}

#[test]
fn attached_pipe_blends_src_over() {
    let mut handle = bld(DeVersion::De201, 0);
    handle.pipe_set_attr(1, 2, &RECT, true).unwrap();

    assert_eq!(handle.pipe_route(1), Some(2));
    assert_eq!(handle.blend_mode(1), Some(BlendMode::SRC_OVER));
    assert!(handle.is_premultiplied(1));
    assert_eq!(handle.pipe_route(0), None);

    handle.pipe_set_attr(1, 3, &RECT, false).unwrap();
    assert_eq!(handle.pipe_route(1), Some(3));
    assert!(!handle.is_premultiplied(1));
}

#[test]
fn pipe_and_port_ranges_are_checked() {
    let mut handle = bld(DeVersion::De201, 1);
    assert_eq!(handle.port_cnt(), 2);
    assert_eq!(
        handle.pipe_set_attr(2, 0, &RECT, false),
        Err(DeError::InvalidArgument)
    );
    assert_eq!(
        handle.pipe_set_attr(0, 2, &RECT, false),
        Err(DeError::InvalidArgument)
    );
    assert_eq!(
        handle.pipe_reset(5, PipeOwner::Any),
        Err(DeError::InvalidArgument)
    );
}

#[test]
fn reset_requires_owner_unless_forced() {
    let mut handle = bld(DeVersion::De355, 0);
    handle.pipe_set_attr(3, 4, &RECT, false).unwrap();

    assert_eq!(handle.pipe_reset(3, PipeOwner::Port(1)), Ok(false));
    assert_eq!(handle.pipe_route(3), Some(4));

    assert_eq!(handle.pipe_reset(3, PipeOwner::Port(4)), Ok(true));
    assert_eq!(handle.pipe_route(3), None);
    assert_eq!(handle.blend_mode(3), Some(BlendMode::CLEAR));

    handle.pipe_set_attr(3, 5, &RECT, false).unwrap();
    assert_eq!(handle.pipe_reset(3, PipeOwner::Any), Ok(true));
    assert_eq!(handle.pipe_route(3), None);
}

#[test]
fn mux_port_lookup() {
    let d0 = bld(DeVersion::De350, 0);
    assert_eq!(d0.get_chn_mux_port(0, true, 2), Some(2));
    assert_eq!(d0.get_chn_mux_port(0, false, 0), Some(3));
    assert_eq!(d0.get_chn_mux_port(1, false, 0), Some(2));
    assert_eq!(d0.get_chn_mux_port(1, true, 2), None);
    assert_eq!(d0.get_chn_mux_port(7, true, 0), None);

    let d1 = bld(DeVersion::De352, 1);
    assert_eq!(d1.get_chn_mux_port(0, false, 3), Some(1));
    assert_eq!(d1.get_chn_mux_port(1, true, 2), Some(0));

    // fixed routing ignores the mode
    let fixed = bld(DeVersion::De201, 0);
    assert_eq!(fixed.get_chn_mux_port(0, false, 2), Some(3));
    assert_eq!(fixed.get_chn_mux_port(5, false, 2), Some(3));
    assert_eq!(fixed.get_chn_mux_port(0, true, 1), None);
}

#[test]
fn porter_duff_encoding() {
    assert_eq!(BlendMode::SRC_OVER.0, 0x0301_0301);
    assert_eq!(BlendMode::XOR.0, 0x0305_0305);
    assert_eq!(BlendMode::DST_ATOP.0, 0x0205_0205);
}

#[test]
fn dump_lists_routed_pipes() {
    let mut handle = bld(DeVersion::De350, 0);
    handle.output_set_attr(1280, 720, FormatSpace::Rgb, false);
    handle.pipe_set_attr(0, 1, &RECT, false).unwrap();

    let mut out = String::new();
    handle.dump(&mut out).unwrap();
    assert!(out.contains("out 1280x720"));
    assert!(out.contains("pipe0 <- port1"));
}
