//! Temperature-derived body colors.
//!
//! Unless a body pins its color explicitly (nonzero `color` field or the
//! `free_color` capability), its display color is derived from its
//! temperature through a stellar B−V color index: hot bodies render blue,
//! cool ones red. The covered range is 0..100 000 K; values outside are
//! clamped, keeping the mapping total and monotonic.

/// Upper end of the supported temperature range, in kelvin.
pub const T_MAX_KELVIN: f32 = 100_000.0;

/// Map a temperature in kelvin to a B−V color index in `[-0.4, 2.0]`.
///
/// Linear and decreasing: 0 K maps to 2.0 (deep red), `T_MAX_KELVIN`
/// maps to −0.4 (blue-white). Input is clamped to the supported range.
pub fn temperature_to_bv(t_kelvin: f32) -> f32 {
    let t = t_kelvin.clamp(0.0, T_MAX_KELVIN);
    2.0 - (t / T_MAX_KELVIN) * 2.4
}

/// Convert a B−V color index in `[-0.4, 2.0]` to a packed `0xRRGGBB` value.
///
/// Piecewise-linear approximation of black-body star colors. Input is
/// clamped to the valid index range. The result carries no alpha byte.
pub fn bv_to_rgb(bv: f32) -> u32 {
    let bv = bv.clamp(-0.4, 2.0);

    let r = match bv {
        b if b < 0.0 => 0.61 + 0.11 * (b + 0.40) / 0.40 + 0.1 * ((b + 0.40) / 0.40).powi(2),
        b if b < 0.4 => 0.83 + 0.17 * b / 0.40,
        _ => 1.0,
    };
    let g = match bv {
        b if b < 0.0 => 0.70 + 0.07 * (b + 0.40) / 0.40 + 0.1 * ((b + 0.40) / 0.40).powi(2),
        b if b < 0.4 => 0.87 + 0.11 * b / 0.40,
        b if b < 1.6 => 0.98 - 0.16 * (b - 0.40) / 1.20,
        b => 0.82 - 0.5 * (b - 1.60) / 0.40,
    };
    let b = match bv {
        b if b < 0.4 => 1.0,
        b if b < 1.5 => 1.0 - 0.47 * (b - 0.40) / 1.10,
        b if b < 1.94 => 0.63 - 0.6 * ((b - 1.50) / 0.44).powi(2),
        _ => 0.0,
    };

    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
}

/// Map a temperature in kelvin directly to a packed `0xRRGGBB` color.
pub fn temperature_to_rgb(t_kelvin: f32) -> u32 {
    bv_to_rgb(temperature_to_bv(t_kelvin))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(rgb: u32) -> (u32, u32, u32) {
        ((rgb >> 16) & 0xff, (rgb >> 8) & 0xff, rgb & 0xff)
    }

    #[test]
    fn bv_extremes_clamp() {
        assert_eq!(bv_to_rgb(-10.0), bv_to_rgb(-0.4));
        assert_eq!(bv_to_rgb(10.0), bv_to_rgb(2.0));
    }

    #[test]
    fn cold_is_red_dominant() {
        let (r, _g, b) = channels(temperature_to_rgb(0.0));
        assert!(r > b, "cold body should lean red, got r={r} b={b}");
    }

    #[test]
    fn hot_is_blue_dominant() {
        let (r, _g, b) = channels(temperature_to_rgb(T_MAX_KELVIN));
        assert!(b >= r, "hot body should lean blue, got r={r} b={b}");
    }

    #[test]
    fn bv_index_is_monotone_in_temperature() {
        let mut prev = temperature_to_bv(0.0);
        for step in 1..=100 {
            let bv = temperature_to_bv(step as f32 * 1000.0);
            assert!(bv <= prev, "bv must not increase with temperature");
            prev = bv;
        }
    }

    #[test]
    fn blue_channel_spans_the_range() {
        // The per-channel curves are piecewise and not individually
        // monotone, but the endpoints are fixed: no blue at 0 K, full
        // blue at the top of the range.
        assert_eq!(channels(temperature_to_rgb(0.0)).2, 0);
        assert_eq!(channels(temperature_to_rgb(T_MAX_KELVIN)).2, 255);
    }

    #[test]
    fn result_has_no_alpha_byte() {
        assert_eq!(temperature_to_rgb(5000.0) & 0xff00_0000, 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bv_stays_in_valid_range(t in 0.0f32..1.0e7) {
                let bv = temperature_to_bv(t);
                prop_assert!((-0.4..=2.0).contains(&bv));
            }

            #[test]
            fn hotter_never_redder_index(a in 0.0f32..T_MAX_KELVIN, b in 0.0f32..T_MAX_KELVIN) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(temperature_to_bv(hi) <= temperature_to_bv(lo));
            }
        }
    }
}
