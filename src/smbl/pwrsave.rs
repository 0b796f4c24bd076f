//! Histogram driven backlight power-save.
//!
//! Each run picks a minimum luma level the scene still needs, smooths it over
//! the last [`IEP_LH_PWRSV_NUM`] runs and turns it into a dimming factor plus
//! the gain curve that compensates for it.

use crate::registers::smbl::{SMBL_HIST_BINS, SMBL_LGC_LEN};

use super::SmblStatus;

/// Backlight level below which power-save is bypassed.
pub const PWRSAVE_PROC_THRES: u32 = 85;
pub const BACKLIGHT_MAX: u32 = 255;
/// Depth of the adjustment-index history.
pub const IEP_LH_PWRSV_NUM: usize = 24;
/// History slot value meaning "no adjustment".
pub const HIST_SENTINEL: u8 = 255;
/// Adjustment index whose gain curve is the identity.
pub const NEUTRAL_INDEX: u8 = 255;

/// Cumulative share (percent) a bucket must stay under to count as highlight.
const CDF_LIMIT: u32 = 80;

/// Minimum adjustment index per histogram bucket.
pub static HIST_THRES_PWRSV: [u32; SMBL_HIST_BINS] = [102, 153, 181, 201, 217, 230, 242, 255];

/// History weights, newest first; they sum to 1024.
pub static DRC_FILTER: [u32; IEP_LH_PWRSV_NUM] = [
    127, 113, 100, 88, 77, 68, 60, 53, 46, 41, 36, 32, 28, 24, 22, 19, 17, 15, 13, 11, 10, 9, 8, 7,
];

/// Runs one power-save step, updating `status` and returning the adjustment
/// index whose gain curve must be uploaded.
pub fn pwrsave_core(status: &mut SmblStatus, hist: &[u32; SMBL_HIST_BINS]) -> u8 {
    let backlight = status.backlight.min(BACKLIGHT_MAX);

    if backlight < PWRSAVE_PROC_THRES {
        status.min_adj_index_hist = [HIST_SENTINEL; IEP_LH_PWRSV_NUM];
        status.dimming = 256;
        status.backlight_after_dimming = status.backlight;
        return NEUTRAL_INDEX;
    }

    let size = status.size.max(1);
    let mut cdf = [0u32; SMBL_HIST_BINS];
    let mut acc = 0u32;
    for (c, &count) in cdf.iter_mut().zip(hist.iter()) {
        acc += count / size;
        *c = acc;
    }

    // The bucket holding the 80th percentile: one above the brightest bucket
    // whose cumulative share is still under the limit. A small bright
    // highlight must not keep the whole frame at full backlight.
    let bin = (0..SMBL_HIST_BINS)
        .rev()
        .find(|&i| cdf[i] < CDF_LIMIT)
        .map(|i| (i + 1).min(SMBL_HIST_BINS - 1))
        .unwrap_or(0);
    let candidate = HIST_THRES_PWRSV[bin] as u8;

    let hist_buf = &mut status.min_adj_index_hist;
    hist_buf.copy_within(0..IEP_LH_PWRSV_NUM - 1, 1);
    hist_buf[0] = candidate;

    let weighted: u32 = hist_buf
        .iter()
        .zip(DRC_FILTER.iter())
        .map(|(&h, &w)| h as u32 * w)
        .sum();
    let mut index = weighted >> 10;

    let ramp = (BACKLIGHT_MAX - PWRSAVE_PROC_THRES) / 5;
    if backlight < PWRSAVE_PROC_THRES + ramp {
        index = 255 - (255 - index) * (backlight - PWRSAVE_PROC_THRES) / ramp;
    }

    let index = index.clamp(HIST_THRES_PWRSV[0], 255);
    status.dimming = index + 1;
    status.backlight_after_dimming = status.backlight.saturating_mul(status.dimming) / 256;
    trace!(
        "pwrsave: bin {} cand {} index {} dimming {}",
        bin, candidate, index, status.dimming
    );
    index as u8
}

/// Gain curve for adjustment `index`: boosts luma by `256 / (index + 1)`.
pub fn lgc_row(index: u8, out: &mut [u16; SMBL_LGC_LEN]) {
    let dimming = index as u32 + 1;
    for (x, e) in out.iter_mut().enumerate() {
        *e = ((x as u32 * 256 + dimming / 2) / dimming).min(255) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(backlight: u32) -> SmblStatus {
        SmblStatus {
            isenable: true,
            backlight,
            size: 100,
            ..SmblStatus::default()
        }
    }

    fn single_bucket(bucket: usize) -> [u32; SMBL_HIST_BINS] {
        let mut hist = [0; SMBL_HIST_BINS];
        hist[bucket] = 10_000;
        hist
    }

    #[test]
    fn filter_weights_sum_to_unity() {
        assert_eq!(DRC_FILTER.iter().sum::<u32>(), 1024);
    }

    #[test]
    fn low_backlight_bypasses() {
        let mut st = status(PWRSAVE_PROC_THRES - 1);
        st.min_adj_index_hist = [10; IEP_LH_PWRSV_NUM];
        st.dimming = 100;

        let index = pwrsave_core(&mut st, &single_bucket(0));

        assert_eq!(index, NEUTRAL_INDEX);
        assert_eq!(st.dimming, 256);
        assert_eq!(st.min_adj_index_hist, [HIST_SENTINEL; IEP_LH_PWRSV_NUM]);
        assert_eq!(st.backlight_after_dimming, PWRSAVE_PROC_THRES - 1);
    }

    #[test]
    fn bright_scene_keeps_full_backlight() {
        let mut st = status(255);
        st.min_adj_index_hist = [HIST_SENTINEL; IEP_LH_PWRSV_NUM];
        assert_eq!(pwrsave_core(&mut st, &single_bucket(7)), 255);
        assert_eq!(st.dimming, 256);
        assert_eq!(st.backlight_after_dimming, 255);
    }

    #[test]
    fn dark_scene_converges_through_filter() {
        let mut st = status(255);
        st.min_adj_index_hist = [HIST_SENTINEL; IEP_LH_PWRSV_NUM];

        assert_eq!(pwrsave_core(&mut st, &single_bucket(0)), 236);
        assert_eq!(st.dimming, 237);

        for _ in 1..IEP_LH_PWRSV_NUM {
            pwrsave_core(&mut st, &single_bucket(0));
        }
        assert_eq!(st.min_adj_index_hist, [102; IEP_LH_PWRSV_NUM]);
        assert_eq!(st.dimming, 103);
        assert_eq!(st.backlight_after_dimming, 255 * 103 / 256);
    }

    #[test]
    fn highlight_does_not_pin_backlight() {
        let mut st = status(255);
        st.min_adj_index_hist = [HIST_SENTINEL; IEP_LH_PWRSV_NUM];
        let mut hist = [0; SMBL_HIST_BINS];
        hist[3] = 8_500;
        hist[7] = 1_500;
        pwrsave_core(&mut st, &hist);
        assert_eq!(st.min_adj_index_hist[0], 201);
    }

    #[test]
    fn ramp_near_threshold() {
        let mut st = status(PWRSAVE_PROC_THRES + 17);
        st.min_adj_index_hist = [102; IEP_LH_PWRSV_NUM];
        assert_eq!(pwrsave_core(&mut st, &single_bucket(0)), 179);

        let mut st = status(PWRSAVE_PROC_THRES);
        st.min_adj_index_hist = [102; IEP_LH_PWRSV_NUM];
        assert_eq!(pwrsave_core(&mut st, &single_bucket(0)), 255);
        assert_eq!(st.dimming, 256);
    }

    #[test]
    fn neutral_curve_is_identity() {
        let mut row = [0u16; SMBL_LGC_LEN];
        lgc_row(NEUTRAL_INDEX, &mut row);
        for (x, &v) in row.iter().enumerate() {
            assert_eq!(v as usize, x);
        }
        lgc_row(127, &mut row);
        assert_eq!(row[64], 128);
        assert_eq!(row[200], 255);
    }
}
