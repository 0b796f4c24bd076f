//! Color matrix composition shared by every unit that implements DCSC.
//!
//! All matrices are 3x4 affine transforms in Q12: the first three columns are
//! gains (4096 = 1.0) and the last column is an offset in 8-bit code values
//! scaled by 4096. The final coefficients handed to hardware keep the gains in
//! Q12 and convert the offsets to 10-bit code values.

use crate::config::{ColorSpace, FormatSpace};

pub const Q12_ONE: i64 = 1 << 12;

/// 3x4 affine matrix in Q12.
pub type Matrix34 = [[i64; 4]; 3];

pub const IDENTITY: Matrix34 = [
    [Q12_ONE, 0, 0, 0],
    [0, Q12_ONE, 0, 0],
    [0, 0, Q12_ONE, 0],
];

/// sin(0..=90 degrees) in Q12.
static SIN_Q12: [i64; 91] = [
    0, 71, 143, 214, 286, 357, 428, 499, 570, 641, 711, 782, 852, 921, 991, 1060, 1129, 1198,
    1266, 1334, 1401, 1468, 1534, 1600, 1666, 1731, 1796, 1860, 1923, 1986, 2048, 2110, 2171, 2231,
    2290, 2349, 2408, 2465, 2522, 2578, 2633, 2687, 2741, 2793, 2845, 2896, 2946, 2996, 3044, 3091,
    3138, 3183, 3228, 3271, 3314, 3355, 3396, 3435, 3474, 3511, 3547, 3582, 3617, 3650, 3681, 3712,
    3742, 3770, 3798, 3824, 3849, 3873, 3896, 3917, 3937, 3956, 3974, 3991, 4006, 4021, 4034, 4046,
    4056, 4065, 4074, 4080, 4086, 4090, 4094, 4095, 4096,
];

static RGB2YUV_BT601: Matrix34 = [
    [1053, 2064, 401, 65536],
    [-606, -1192, 1798, 524288],
    [1798, -1507, -291, 524288],
];

static RGB2YUV_BT709: Matrix34 = [
    [750, 2515, 254, 65536],
    [-414, -1389, 1798, 524288],
    [1798, -1634, -164, 524288],
];

static RGB2YUV_BT2020: Matrix34 = [
    [924, 2385, 208, 65536],
    [-502, -1297, 1799, 524288],
    [1799, -1654, -145, 524288],
];

static YUV2RGB_BT601: Matrix34 = [
    [4768, 0, 6537, -913048],
    [4768, -1602, -3330, 554959],
    [4768, 8266, 0, -1134297],
];

static YUV2RGB_BT709: Matrix34 = [
    [4768, 0, 7344, -1016332],
    [4768, -872, -2183, 314835],
    [4768, 8651, 0, -1183580],
];

static YUV2RGB_BT2020: Matrix34 = [
    [4768, 0, 6873, -956039],
    [4768, -770, -2662, 363069],
    [4768, 8770, 0, -1198785],
];

/// Brightness, contrast, saturation and hue, each in `0..=100`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bcsh {
    pub brightness: u32,
    pub contrast: u32,
    pub saturation: u32,
    pub hue: u32,
}

impl Bcsh {
    /// Settings that leave the picture untouched for a unit whose hue
    /// midpoint is `hue_default`.
    pub const fn neutral(hue_default: u32) -> Self {
        Self {
            brightness: 50,
            contrast: 50,
            saturation: 50,
            hue: hue_default,
        }
    }

    pub fn is_neutral(&self, hue_default: u32) -> bool {
        *self == Self::neutral(hue_default)
    }
}

/// User color transform applied in RGB, same encoding as [`Matrix34`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ctm {
    pub matrix: Matrix34,
}

fn sin_deg(deg: i64) -> i64 {
    let d = deg.rem_euclid(360);
    match d {
        0..=90 => SIN_Q12[d as usize],
        91..=180 => SIN_Q12[(180 - d) as usize],
        181..=270 => -SIN_Q12[(d - 180) as usize],
        _ => -SIN_Q12[(360 - d) as usize],
    }
}

fn cos_deg(deg: i64) -> i64 {
    sin_deg(deg + 90)
}

fn q12_mul(a: i64, b: i64) -> i64 {
    let p = a * b;
    (p + (Q12_ONE / 2)) >> 12
}

/// `a ∘ b`: applies `b` first, then `a`.
pub fn mul(a: &Matrix34, b: &Matrix34) -> Matrix34 {
    let mut out = [[0i64; 4]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for j in 0..4 {
            let mut acc = 0i64;
            for k in 0..3 {
                acc += a[i][k] * b[k][j];
            }
            row[j] = (acc + (Q12_ONE / 2)) >> 12;
        }
        row[3] += a[i][3];
    }
    out
}

pub fn rgb2yuv(cs: ColorSpace) -> &'static Matrix34 {
    match cs {
        ColorSpace::Bt601 => &RGB2YUV_BT601,
        ColorSpace::Bt709 => &RGB2YUV_BT709,
        ColorSpace::Bt2020Nc | ColorSpace::Bt2020C => &RGB2YUV_BT2020,
    }
}

pub fn yuv2rgb(cs: ColorSpace) -> &'static Matrix34 {
    match cs {
        ColorSpace::Bt601 => &YUV2RGB_BT601,
        ColorSpace::Bt709 => &YUV2RGB_BT709,
        ColorSpace::Bt2020Nc | ColorSpace::Bt2020C => &YUV2RGB_BT2020,
    }
}

/// Enhancement matrix operating on limited-range YCbCr.
pub fn bcsh_matrix(bcsh: &Bcsh, hue_default: u32) -> Matrix34 {
    let contrast = bcsh.contrast.min(100) as i64 * Q12_ONE / 50;
    let saturation = bcsh.saturation.min(100) as i64 * Q12_ONE / 50;
    let brightness = (bcsh.brightness.min(100) as i64 - 50) * 2 * Q12_ONE;
    let angle = (bcsh.hue.min(100) as i64 - hue_default as i64) * 180 / 50;

    let k = q12_mul(contrast, saturation);
    let kc = q12_mul(k, cos_deg(angle));
    let ks = q12_mul(k, sin_deg(angle));
    let y_off = 16 * Q12_ONE;
    let c_off = 128 * Q12_ONE;

    [
        [contrast, 0, 0, y_off - 16 * contrast + brightness],
        [0, kc, -ks, c_off - 128 * kc + 128 * ks],
        [0, ks, kc, c_off - 128 * ks - 128 * kc],
    ]
}

/// Composes the full DCSC transform for a pipe carrying `fmt` pixels.
///
/// Enhancement always happens in YCbCr and the CTM always in RGB, so each is
/// wrapped in the conversions its domain needs.
pub fn compose(
    fmt: FormatSpace,
    cs: ColorSpace,
    bcsh: &Bcsh,
    hue_default: u32,
    ctm: Option<&Ctm>,
) -> Matrix34 {
    let enhance = bcsh_matrix(bcsh, hue_default);
    if fmt.is_yuv() {
        match ctm {
            Some(ctm) => {
                let in_rgb = mul(&ctm.matrix, yuv2rgb(cs));
                mul(&enhance, &mul(rgb2yuv(cs), &in_rgb))
            }
            None => enhance,
        }
    } else {
        let m = mul(yuv2rgb(cs), &mul(&enhance, rgb2yuv(cs)));
        match ctm {
            Some(ctm) => mul(&ctm.matrix, &m),
            None => m,
        }
    }
}

/// Hardware coefficient order: row-major gains in Q12, offsets in 10-bit
/// code values.
pub fn to_coeffs(m: &Matrix34) -> [i32; 12] {
    let mut out = [0i32; 12];
    for (i, row) in m.iter().enumerate() {
        for j in 0..3 {
            out[i * 4 + j] = row[j] as i32;
        }
        // 8-bit Q12 offset -> 10-bit integer
        out[i * 4 + 3] = ((row[3] + (1 << 9)) >> 10) as i32;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: i64, b: i64, tol: i64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn neutral_rgb_is_near_identity() {
        for cs in ColorSpace::ALL {
            let m = compose(FormatSpace::Rgb, cs, &Bcsh::neutral(50), 50, None);
            for i in 0..3 {
                for j in 0..3 {
                    let want = if i == j { Q12_ONE } else { 0 };
                    assert!(close(m[i][j], want, 24), "{cs:?} [{i}][{j}] = {}", m[i][j]);
                }
                assert!(close(m[i][3], 0, 4 * Q12_ONE), "{cs:?} offset {}", m[i][3]);
            }
        }
    }

    #[test]
    fn yuv_contrast_doubles_luma() {
        let bcsh = Bcsh {
            contrast: 100,
            ..Bcsh::neutral(50)
        };
        let m = compose(FormatSpace::Yuv444, ColorSpace::Bt709, &bcsh, 50, None);
        assert_eq!(m[0][0], 2 * Q12_ONE);
        assert_eq!(m[0][3], 16 * Q12_ONE - 32 * Q12_ONE);
    }

    #[test]
    fn half_turn_hue_negates_chroma() {
        let bcsh = Bcsh {
            hue: 100,
            ..Bcsh::neutral(50)
        };
        let m = compose(FormatSpace::Yuv422, ColorSpace::Bt601, &bcsh, 50, None);
        assert_eq!(m[1][1], -Q12_ONE);
        assert_eq!(m[2][2], -Q12_ONE);
        assert_eq!(m[1][2], 0);
        let c = to_coeffs(&m);
        assert_eq!(c[7], 1024);
    }

    #[test]
    fn trig_table_symmetry() {
        assert_eq!(sin_deg(0), 0);
        assert_eq!(sin_deg(90), Q12_ONE);
        assert_eq!(sin_deg(-90), -Q12_ONE);
        assert_eq!(cos_deg(180), -Q12_ONE);
        assert_eq!(sin_deg(210), -sin_deg(30));
    }
}
