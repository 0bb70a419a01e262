//! 16.16 fixed-point helpers.
//!
//! Map coordinates, heights and momenta are plain `i32` values scaled by
//! [`FRACUNIT`]. Everything the simulation and the culler compute goes
//! through these helpers so results are bit-identical on every platform.

pub type Fixed = i32;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: Fixed = 1 << FRACBITS;

/// Whole map units → fixed.
#[inline(always)]
pub const fn units(n: i32) -> Fixed {
    n << FRACBITS
}

/// Fixed → whole map units (floor).
#[inline(always)]
pub const fn to_units(f: Fixed) -> i32 {
    f >> FRACBITS
}

#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 * b as i64) >> FRACBITS) as Fixed
}

/// Saturates to `i32::MIN`/`i32::MAX` when the quotient would not fit.
#[inline]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if (a.unsigned_abs() >> 14) >= b.unsigned_abs() {
        return if (a ^ b) < 0 { i32::MIN } else { i32::MAX };
    }
    (((a as i64) << FRACBITS) / b as i64) as Fixed
}

/// Octagonal distance estimate: `dx + dy - min(dx, dy) / 2`.
#[inline]
pub fn approx_distance(dx: Fixed, dy: Fixed) -> Fixed {
    let dx = dx.wrapping_abs();
    let dy = dy.wrapping_abs();
    if dx < dy {
        dx + dy - (dx >> 1)
    } else {
        dx + dy - (dy >> 1)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_and_div_round_trip_whole_units() {
        assert_eq!(fixed_mul(units(3), units(4)), units(12));
        assert_eq!(fixed_mul(units(-3), FRACUNIT / 2), -(units(3) / 2));
        assert_eq!(fixed_div(units(12), units(4)), units(3));
        assert_eq!(fixed_div(units(1), units(4)), FRACUNIT / 4);
    }

    #[test]
    fn div_saturates_instead_of_overflowing() {
        assert_eq!(fixed_div(units(100), 0), i32::MAX);
        assert_eq!(fixed_div(units(-100), 0), i32::MIN);
        assert_eq!(fixed_div(units(30_000), 1), i32::MAX);
    }

    #[test]
    fn approx_distance_is_symmetric() {
        assert_eq!(approx_distance(units(10), units(0)), units(10));
        assert_eq!(approx_distance(units(-4), units(8)), units(10));
        assert_eq!(approx_distance(units(8), units(-4)), units(10));
    }

    #[test]
    fn unit_conversion_floors() {
        assert_eq!(to_units(units(7) + FRACUNIT / 2), 7);
        assert_eq!(to_units(units(-7) + 1), -7);
    }
}
