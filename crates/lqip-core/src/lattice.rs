//! Quantized base color and the nearest-lattice-point search.
//!
//! The dominant color of an image is stored as three small indices into
//! fixed OkLab lattices: 2 bits of lightness and 3 bits for each chroma
//! axis. The mapping from index to coordinate is part of the wire format:
//! a decoder must use exactly the same functions.
//!
//! Note the `b` lattice is shifted by one step relative to `a`
//! (`bbb + 1`). Existing encodings depend on it.

use std::fmt;

use crate::color::Oklab;
use crate::error::RangeError;

/// Largest `ll` index (2 bits).
pub const LL_MAX: u8 = 0b11;
/// Largest `aaa` index (3 bits).
pub const AAA_MAX: u8 = 0b111;
/// Largest `bbb` index (3 bits).
pub const BBB_MAX: u8 = 0b111;

/// Keeps the chroma scaling finite at the achromatic point.
const CHROMA_EPSILON: f64 = 1e-6;

/// Lightness lattice: {0, 1, 2, 3} -> {0.2, 0.4, 0.6, 0.8}.
#[inline]
pub fn lattice_l(ll: u8) -> f64 {
    (ll as f64 / 0b11 as f64) * 0.6 + 0.2
}

/// Green-red lattice: {0..7} -> -0.35..=0.2625 in steps of 0.0875.
#[inline]
pub fn lattice_a(aaa: u8) -> f64 {
    (aaa as f64 / 0b1000 as f64) * 0.7 - 0.35
}

/// Blue-yellow lattice: {0..7} -> -0.2625..=0.35 in steps of 0.0875.
#[inline]
pub fn lattice_b(bbb: u8) -> f64 {
    ((bbb as f64 + 1.0) / 0b1000 as f64) * 0.7 - 0.35
}

/// The dominant color snapped to the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuantizedColor {
    ll: u8,
    aaa: u8,
    bbb: u8,
}

impl QuantizedColor {
    /// Create a quantized color, checking each index against its bit width.
    ///
    /// # Example
    ///
    /// ```
    /// use lqip_core::QuantizedColor;
    ///
    /// assert!(QuantizedColor::new(3, 7, 7).is_ok());
    /// assert!(QuantizedColor::new(4, 0, 0).is_err());
    /// ```
    pub fn new(ll: u8, aaa: u8, bbb: u8) -> Result<Self, RangeError> {
        check("ll", ll, LL_MAX)?;
        check("aaa", aaa, AAA_MAX)?;
        check("bbb", bbb, BBB_MAX)?;
        Ok(Self { ll, aaa, bbb })
    }

    /// Build from the 8-bit `[ll:2][aaa:3][bbb:3]` field. Every byte is valid.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            ll: (bits >> 6) & LL_MAX,
            aaa: (bits >> 3) & AAA_MAX,
            bbb: bits & BBB_MAX,
        }
    }

    /// The 8-bit `[ll:2][aaa:3][bbb:3]` field.
    #[inline]
    pub const fn bits(self) -> u8 {
        (self.ll << 6) | (self.aaa << 3) | self.bbb
    }

    #[inline]
    pub const fn ll(self) -> u8 {
        self.ll
    }

    #[inline]
    pub const fn aaa(self) -> u8 {
        self.aaa
    }

    #[inline]
    pub const fn bbb(self) -> u8 {
        self.bbb
    }

    /// Lattice lightness of this point.
    #[inline]
    pub fn lightness(self) -> f64 {
        lattice_l(self.ll)
    }

    /// Real OkLab coordinate of this lattice point.
    #[inline]
    pub fn to_oklab(self) -> Oklab {
        Oklab::new(lattice_l(self.ll), lattice_a(self.aaa), lattice_b(self.bbb))
    }

    /// All 256 lattice points in search order (`ll`, then `aaa`, then `bbb`, ascending).
    pub fn all() -> impl Iterator<Item = QuantizedColor> {
        (0..=u8::MAX).map(QuantizedColor::from_bits)
    }
}

impl fmt::Display for QuantizedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ll={} aaa={} bbb={}", self.ll, self.aaa, self.bbb)
    }
}

fn check(name: &'static str, value: u8, max: u8) -> Result<(), RangeError> {
    if value > max {
        return Err(RangeError::Component { name, value, max });
    }
    Ok(())
}

/// Scale a chroma component away from the neutral axis.
///
/// Plain Euclidean distance would favour desaturated lattice points.
#[inline]
fn scale_for_diff(x: f64, chroma: f64) -> f64 {
    x / (CHROMA_EPSILON + chroma.sqrt())
}

/// Chroma-scaled distance between a target color and a lattice candidate.
///
/// Each point's `a` and `b` are divided by `1e-6 + sqrt(chroma)` of that
/// same point before differencing; `L` is compared unscaled.
pub fn scaled_distance(target: Oklab, candidate: Oklab) -> f64 {
    let target_chroma = target.chroma();
    let candidate_chroma = candidate.chroma();

    let da = scale_for_diff(candidate.a, candidate_chroma) - scale_for_diff(target.a, target_chroma);
    let db = scale_for_diff(candidate.b, candidate_chroma) - scale_for_diff(target.b, target_chroma);

    (candidate.l - target.l).hypot(da).hypot(db)
}

/// Find the lattice point closest to `target` under [`scaled_distance`].
///
/// All 256 candidates are evaluated; on equal distance the first one in
/// [`QuantizedColor::all`] order wins.
///
/// # Example
///
/// ```
/// use lqip_core::{find_oklab_bits, Oklab};
///
/// let gray = Oklab::new(0.6, 0.0, 0.0);
/// let bits = find_oklab_bits(gray);
/// assert_eq!((bits.ll(), bits.aaa(), bits.bbb()), (2, 4, 3));
/// ```
pub fn find_oklab_bits(target: Oklab) -> QuantizedColor {
    first_minimum(
        QuantizedColor::all().map(|candidate| (candidate, scaled_distance(target, candidate.to_oklab()))),
    )
}

/// First item with strictly minimal distance. Falls back to the origin
/// lattice point when the iterator is empty or every distance is NaN.
fn first_minimum(candidates: impl Iterator<Item = (QuantizedColor, f64)>) -> QuantizedColor {
    let mut best = QuantizedColor::from_bits(0);
    let mut best_distance = f64::INFINITY;

    for (candidate, distance) in candidates {
        if distance < best_distance {
            best_distance = distance;
            best = candidate;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_lattice_l_values() {
        let expected = [0.2, 0.4, 0.6, 0.8];
        for (ll, want) in expected.iter().enumerate() {
            assert!((lattice_l(ll as u8) - want).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_lattice_a_and_b_are_offset_by_one_step() {
        assert!((lattice_a(0) + 0.35).abs() < TOLERANCE);
        assert!((lattice_a(7) - 0.2625).abs() < TOLERANCE);
        assert!((lattice_b(0) + 0.2625).abs() < TOLERANCE);
        assert!((lattice_b(7) - 0.35).abs() < TOLERANCE);

        for i in 0..7u8 {
            assert!((lattice_b(i) - lattice_a(i + 1)).abs() < TOLERANCE);
            assert!((lattice_a(i + 1) - lattice_a(i) - 0.0875).abs() < TOLERANCE);
        }

        // Both lattices contain the neutral axis exactly
        assert_eq!(lattice_a(4), 0.0);
        assert_eq!(lattice_b(3), 0.0);
    }

    #[test]
    fn test_new_rejects_overflowing_components() {
        assert_eq!(
            QuantizedColor::new(4, 0, 0),
            Err(RangeError::Component {
                name: "ll",
                value: 4,
                max: 3
            })
        );
        assert!(matches!(
            QuantizedColor::new(0, 8, 0),
            Err(RangeError::Component { name: "aaa", .. })
        ));
        assert!(matches!(
            QuantizedColor::new(0, 0, 8),
            Err(RangeError::Component { name: "bbb", .. })
        ));
    }

    #[test]
    fn test_bits_round_trip_over_whole_domain() {
        for ll in 0..=LL_MAX {
            for aaa in 0..=AAA_MAX {
                for bbb in 0..=BBB_MAX {
                    let q = QuantizedColor::new(ll, aaa, bbb).unwrap();
                    let back = QuantizedColor::from_bits(q.bits());
                    assert_eq!((back.ll(), back.aaa(), back.bbb()), (ll, aaa, bbb));
                }
            }
        }
    }

    #[test]
    fn test_all_enumerates_in_search_order() {
        let all: Vec<_> = QuantizedColor::all().collect();
        assert_eq!(all.len(), 256);
        assert_eq!(all[0], QuantizedColor::new(0, 0, 0).unwrap());
        assert_eq!(all[1], QuantizedColor::new(0, 0, 1).unwrap());
        assert_eq!(all[8], QuantizedColor::new(0, 1, 0).unwrap());
        assert_eq!(all[64], QuantizedColor::new(1, 0, 0).unwrap());
        assert_eq!(all[255], QuantizedColor::new(3, 7, 7).unwrap());
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for q in QuantizedColor::all() {
            assert_eq!(scaled_distance(q.to_oklab(), q.to_oklab()), 0.0);
        }
    }

    #[test]
    fn test_lattice_points_map_to_themselves() {
        for q in QuantizedColor::all() {
            assert_eq!(find_oklab_bits(q.to_oklab()), q, "lattice point {q} moved");
        }
    }

    #[test]
    fn test_gray_snaps_to_neutral_axis() {
        let gray = Oklab::from_srgb(Srgb::new(128, 128, 128));
        assert_eq!(find_oklab_bits(gray), QuantizedColor::new(2, 4, 3).unwrap());

        let black = Oklab::from_srgb(Srgb::new(0, 0, 0));
        assert_eq!(find_oklab_bits(black), QuantizedColor::new(0, 4, 3).unwrap());

        let white = Oklab::from_srgb(Srgb::new(255, 255, 255));
        assert_eq!(find_oklab_bits(white), QuantizedColor::new(3, 4, 3).unwrap());
    }

    #[test]
    fn test_saturated_colors_keep_their_hue_quadrant() {
        let red = find_oklab_bits(Oklab::from_srgb(Srgb::new(255, 0, 0)));
        assert!(lattice_a(red.aaa()) > 0.0, "red landed on {red}");
        assert!(lattice_b(red.bbb()) > 0.0, "red landed on {red}");

        let blue = find_oklab_bits(Oklab::from_srgb(Srgb::new(0, 0, 255)));
        assert!(lattice_b(blue.bbb()) < 0.0, "blue landed on {blue}");
    }

    #[test]
    fn test_search_result_is_optimal() {
        let mut targets = Vec::new();
        for r in (0..=255u8).step_by(51) {
            for g in (0..=255u8).step_by(51) {
                for b in (0..=255u8).step_by(51) {
                    targets.push(Oklab::from_srgb(Srgb::new(r, g, b)));
                }
            }
        }

        for target in targets {
            let best = find_oklab_bits(target);
            let best_distance = scaled_distance(target, best.to_oklab());

            for candidate in QuantizedColor::all() {
                let d = scaled_distance(target, candidate.to_oklab());
                assert!(
                    best_distance <= d,
                    "{best} ({best_distance}) beaten by {candidate} ({d}) for {target:?}"
                );
                if d == best_distance {
                    assert!(best <= candidate, "tie must resolve to the earliest candidate");
                }
            }
        }
    }

    #[test]
    fn test_first_minimum_prefers_earliest_tie() {
        let a = QuantizedColor::new(0, 1, 2).unwrap();
        let b = QuantizedColor::new(1, 0, 0).unwrap();
        let c = QuantizedColor::new(2, 0, 0).unwrap();

        let picked = first_minimum([(a, 0.5), (b, 0.25), (c, 0.25)].into_iter());
        assert_eq!(picked, b);
    }

    #[test]
    fn test_first_minimum_ignores_nan() {
        let a = QuantizedColor::new(1, 1, 1).unwrap();
        let picked = first_minimum([(QuantizedColor::from_bits(9), f64::NAN), (a, 1.0)].into_iter());
        assert_eq!(picked, a);
    }
}
