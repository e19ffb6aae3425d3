//! # Boundary reflection module
//!
//! Maps out-of-range coordinates back into the domain interval by mirrored
//! (billiard-style) reflection, so the distance travelled past a boundary is
//! preserved instead of being clamped away.

/// Mirror-step cap after the modulo reduction
///
/// Two steps suffice for any domain containing the origin; the slack covers
/// intervals far from zero, after which the clamp fallback applies.
const MAX_MIRRORS: usize = 8;

/// Reflects `x` into the interval `[lo, hi]`.
///
/// The input is first reduced modulo twice the interval width, keeping its sign, which
/// bounds the remaining overshoot. Any value still out of range is then mirrored across
/// the violated boundary (`x -> 2 lo - x` below, `x -> 2 hi - x` above) until it lands
/// inside the interval.
///
/// Degenerate intervals (`lo >= hi`) and non-finite inputs return `lo`.
pub fn reflect(x: f64, lo: f64, hi: f64) -> f64 {
    if lo >= hi || !x.is_finite() {
        return lo;
    }
    let span = 2.0 * (hi - lo);
    let mut x = x % span;
    for _ in 0..MAX_MIRRORS {
        if x < lo {
            x = 2.0 * lo - x;
        } else if x > hi {
            x = 2.0 * hi - x;
        } else {
            return x;
        }
    }
    x.clamp(lo, hi)
}
