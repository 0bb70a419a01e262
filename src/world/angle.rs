//! Binary angles and the slope → angle lookup.
//!
//! A full turn is `2^32`, so every add/sub wraps exactly like the hardware
//! the engine was tuned for, and angular differences are circular.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use once_cell::sync::Lazy;

use super::fixed::Fixed;

pub const FINEANGLES: usize = 8192;
pub const ANGLETOFINESHIFT: u32 = 19;

pub const SLOPERANGE: usize = 2048;

/// Wrapping binary angle (BAM). 0 = east, counter-clockwise positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(pub u32);

impl Angle {
    pub const ZERO: Angle = Angle(0);
    pub const ANG45: Angle = Angle(0x2000_0000);
    pub const ANG90: Angle = Angle(0x4000_0000);
    pub const ANG180: Angle = Angle(0x8000_0000);
    pub const ANG270: Angle = Angle(0xC000_0000);

    pub fn from_degrees(deg: f64) -> Angle {
        let turns = deg.rem_euclid(360.0) / 360.0;
        Angle((turns * 4_294_967_296.0) as u64 as u32)
    }

    pub fn to_degrees(self) -> f64 {
        self.0 as f64 * 360.0 / 4_294_967_296.0
    }

    /// Index into the 8192-entry fine tables.
    #[inline(always)]
    pub const fn fine(self) -> usize {
        (self.0 >> ANGLETOFINESHIFT) as usize
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline(always)]
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline(always)]
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Angle {
    type Output = Angle;
    #[inline(always)]
    fn neg(self) -> Angle {
        Angle(self.0.wrapping_neg())
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Angle) {
        *self = *self + rhs;
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Angle) {
        *self = *self - rhs;
    }
}

/// `atan(i / SLOPERANGE)` as a binary angle, `i` in `0..=SLOPERANGE`.
static TANTOANGLE: Lazy<Vec<Angle>> = Lazy::new(|| {
    (0..=SLOPERANGE)
        .map(|i| {
            let a = (i as f64 / SLOPERANGE as f64).atan();
            Angle((a * 4_294_967_296.0 / std::f64::consts::TAU).round() as u32)
        })
        .collect()
});

#[inline]
fn tantoangle(slope: usize) -> Angle {
    TANTOANGLE[slope]
}

/// Sine over `5 * FINEANGLES / 4` entries so cosine is a quarter-turn offset.
static FINESINE: Lazy<Vec<Fixed>> = Lazy::new(|| {
    (0..5 * FINEANGLES / 4)
        .map(|i| {
            let a = (i as f64 + 0.5) * std::f64::consts::TAU / FINEANGLES as f64;
            (a.sin() * 65536.0) as Fixed
        })
        .collect()
});

#[inline]
pub fn finesine(fine: usize) -> Fixed {
    FINESINE[fine & (FINEANGLES - 1)]
}

#[inline]
pub fn finecosine(fine: usize) -> Fixed {
    FINESINE[(fine & (FINEANGLES - 1)) + FINEANGLES / 4]
}

/// Slope index for `num / den`, both non-negative, clamped to the table.
#[inline]
pub fn slope_div(num: u32, den: u32) -> usize {
    if den < 512 {
        return SLOPERANGE;
    }
    let ans = ((num as u64) << 3) / ((den >> 8) as u64);
    ans.min(SLOPERANGE as u64) as usize
}

/// Angle of the offset `(dx, dy)`.
///
/// The offset is folded into the first octant, a slope is looked up and
/// the result is mapped back to the true octant.
pub fn offset_to_angle(dx: i64, dy: i64) -> Angle {
    if dx == 0 && dy == 0 {
        return Angle::ZERO;
    }

    let mag = |v: i64| u32::try_from(v.abs()).unwrap_or(u32::MAX);
    let (ax, ay) = (mag(dx), mag(dy));

    if dx >= 0 {
        if dy >= 0 {
            if ax > ay {
                tantoangle(slope_div(ay, ax)) // octant 0
            } else {
                Angle::ANG90 - Angle(1) - tantoangle(slope_div(ax, ay)) // octant 1
            }
        } else if ax > ay {
            -tantoangle(slope_div(ay, ax)) // octant 7
        } else {
            Angle::ANG270 + tantoangle(slope_div(ax, ay)) // octant 6
        }
    } else if dy >= 0 {
        if ax > ay {
            Angle::ANG180 - Angle(1) - tantoangle(slope_div(ay, ax)) // octant 3
        } else {
            Angle::ANG90 + tantoangle(slope_div(ax, ay)) // octant 2
        }
    } else if ax > ay {
        Angle::ANG180 + tantoangle(slope_div(ay, ax)) // octant 4
    } else {
        Angle::ANG270 - Angle(1) - tantoangle(slope_div(ax, ay)) // octant 5
    }
}

/// Angle from `(from_x, from_y)` towards `(x, y)`.
#[inline]
pub fn point_to_angle(from_x: Fixed, from_y: Fixed, x: Fixed, y: Fixed) -> Angle {
    offset_to_angle(x as i64 - from_x as i64, y as i64 - from_y as i64)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixed::units;

    fn close(a: Angle, b: Angle, tol: u32) -> bool {
        (a - b).0.min((b - a).0) <= tol
    }

    #[test]
    fn cardinal_directions() {
        assert_eq!(offset_to_angle(units(5) as i64, 0), Angle::ZERO);
        assert!(close(offset_to_angle(0, units(5) as i64), Angle::ANG90, 1));
        assert!(close(offset_to_angle(-(units(5) as i64), 0), Angle::ANG180, 1));
        assert_eq!(offset_to_angle(0, -(units(5) as i64)), Angle::ANG270);
    }

    #[test]
    fn diagonals_hit_the_octant_boundaries() {
        let d = units(64) as i64;
        assert!(close(offset_to_angle(d, d), Angle::ANG45, 1));
        assert!(close(offset_to_angle(-d, d), Angle::ANG90 + Angle::ANG45, 1));
        assert!(close(offset_to_angle(-d, -d), Angle::ANG180 + Angle::ANG45, 1));
        assert!(close(offset_to_angle(d, -d), Angle::ANG270 + Angle::ANG45, 1));
    }

    #[test]
    fn first_quadrant_sweep_is_monotonic() {
        let r = units(256) as i64;
        let mut last = Angle::ZERO;
        for step in 1..64 {
            let y = r * step / 64;
            let a = offset_to_angle(r, y);
            assert!(a >= last, "step {step}: {a:?} < {last:?}");
            last = a;
        }
        for step in (0..64).rev() {
            let x = r * step / 64;
            let a = offset_to_angle(x, r);
            assert!(a >= last, "step {step}: {a:?} < {last:?}");
            last = a;
        }
    }

    #[test]
    fn wrapping_arithmetic_is_circular() {
        assert_eq!(Angle::ANG270 + Angle::ANG180, Angle::ANG90);
        assert_eq!(Angle::ZERO - Angle::ANG90, Angle::ANG270);
        assert_eq!(-Angle::ANG90, Angle::ANG270);
    }

    #[test]
    fn slope_div_clamps_small_denominators() {
        assert_eq!(slope_div(10, 100), SLOPERANGE);
        assert_eq!(slope_div(units(1) as u32, units(1) as u32), SLOPERANGE);
        assert_eq!(slope_div(units(1) as u32, units(2) as u32), SLOPERANGE / 2);
    }

    #[test]
    fn generated_tables_match_the_classic_lumps() {
        assert_eq!(tantoangle(0), Angle::ZERO);
        assert_eq!(tantoangle(1), Angle(333_772));
        assert_eq!(tantoangle(2), Angle(667_544));
        assert_eq!(tantoangle(1024), Angle(316_933_406));
        assert_eq!(tantoangle(SLOPERANGE), Angle::ANG45);

        assert_eq!(finesine(0), 25);
        assert_eq!(finesine(1), 75);
        assert_eq!(finesine(1024), 46_358);
        assert_eq!(finesine(2047), 65_535);
        assert_eq!(finesine(2048), 65_535);
        assert_eq!(finecosine(0), finesine(2048));
    }

    #[test]
    fn degrees_round_trip() {
        assert_eq!(Angle::from_degrees(90.0), Angle::ANG90);
        assert_eq!(Angle::from_degrees(-90.0), Angle::ANG270);
        assert!((Angle::ANG180.to_degrees() - 180.0).abs() < 1e-9);
    }
}
