//! Directed lines and the point-vs-line side test shared by every query.

use super::fixed::{FRACBITS, Fixed, fixed_div, fixed_mul};

/// Origin + direction, all fixed-point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Divline {
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
}

/// Result of [`Divline::side`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    Front = 0,
    Back = 1,
    On = 2,
}

impl Side {
    /// Child slot for tree descent; "on" counts as front.
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Side::Back => 1,
            Side::Front | Side::On => 0,
        }
    }
}

impl Divline {
    pub const fn new(x: Fixed, y: Fixed, dx: Fixed, dy: Fixed) -> Self {
        Self { x, y, dx, dy }
    }

    pub fn from_points(x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed) -> Self {
        Self {
            x: x1,
            y: y1,
            dx: x2.wrapping_sub(x1),
            dy: y2.wrapping_sub(y1),
        }
    }

    /// Three-way side test.
    ///
    /// Axis-aligned lines are compared directly; otherwise two cross
    /// products of deltas pre-shifted to whole units are compared. The
    /// products are formed in 64 bits, which gives the same sign and zero
    /// results as 32-bit products without their overflow window.
    pub fn side(&self, x: Fixed, y: Fixed) -> Side {
        if self.dx == 0 {
            if x == self.x {
                return Side::On;
            }
            let back = if x <= self.x { self.dy > 0 } else { self.dy < 0 };
            return if back { Side::Back } else { Side::Front };
        }

        if self.dy == 0 {
            if y == self.y {
                return Side::On;
            }
            let back = if y <= self.y { self.dx < 0 } else { self.dx > 0 };
            return if back { Side::Back } else { Side::Front };
        }

        let dx = (x as i64 - self.x as i64) >> FRACBITS;
        let dy = (y as i64 - self.y as i64) >> FRACBITS;

        let left = (self.dy >> FRACBITS) as i64 * dx;
        let right = dy * (self.dx >> FRACBITS) as i64;

        if right < left {
            Side::Front
        } else if left == right {
            Side::On
        } else {
            Side::Back
        }
    }

    /// Two-way variant used for BSP descent: points on the line go back.
    pub fn point_on_side(&self, x: Fixed, y: Fixed) -> usize {
        if self.dx == 0 {
            return if x <= self.x {
                (self.dy > 0) as usize
            } else {
                (self.dy < 0) as usize
            };
        }
        if self.dy == 0 {
            return if y <= self.y {
                (self.dx < 0) as usize
            } else {
                (self.dx > 0) as usize
            };
        }

        let dx = (x as i64 - self.x as i64) >> FRACBITS;
        let dy = (y as i64 - self.y as i64) >> FRACBITS;

        let left = (self.dy >> FRACBITS) as i64 * dx;
        let right = dy * (self.dx >> FRACBITS) as i64;

        if right < left { 0 } else { 1 }
    }
}

/// Fraction along `trace` at which it meets `line` (16.16, 0 = trace origin).
///
/// Returns 0 for parallel lines.
pub fn intercept_vector(trace: &Divline, line: &Divline) -> Fixed {
    let den = fixed_mul(line.dy >> 8, trace.dx).wrapping_sub(fixed_mul(line.dx >> 8, trace.dy));
    if den == 0 {
        return 0;
    }

    let num = fixed_mul(line.x.wrapping_sub(trace.x) >> 8, line.dy)
        .wrapping_add(fixed_mul(trace.y.wrapping_sub(line.y) >> 8, line.dx));

    fixed_div(num, den)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixed::{FRACUNIT, units};

    fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Divline {
        Divline::from_points(units(x1), units(y1), units(x2), units(y2))
    }

    #[test]
    fn points_on_the_line_report_on() {
        for l in [line(0, 0, 64, 32), line(0, 0, 0, 64), line(0, 0, 64, 0)] {
            assert_eq!(l.side(l.x, l.y), Side::On);
            assert_eq!(l.side(l.x + l.dx, l.y + l.dy), Side::On);
            assert_eq!(l.side(l.x + l.dx * 2, l.y + l.dy * 2), Side::On);
        }
    }

    #[test]
    fn front_is_the_right_hand_side() {
        // heading north: east is front
        let north = line(0, 0, 0, 64);
        assert_eq!(north.side(units(10), units(5)), Side::Front);
        assert_eq!(north.side(units(-10), units(5)), Side::Back);

        // heading east: south is front
        let east = line(0, 0, 64, 0);
        assert_eq!(east.side(units(5), units(-10)), Side::Front);
        assert_eq!(east.side(units(5), units(10)), Side::Back);

        let diag = line(0, 0, 64, 64);
        assert_eq!(diag.side(units(40), units(10)), Side::Front);
        assert_eq!(diag.side(units(10), units(40)), Side::Back);
    }

    #[test]
    fn swapping_endpoints_flips_off_line_points() {
        let samples = [(17, -3), (-40, 12), (100, 99), (3, 250), (-7, -7)];
        for (x1, y1, x2, y2) in [(0, 0, 64, 32), (10, 10, 10, 80), (-5, 20, 90, 20), (3, 4, -60, 77)]
        {
            let fwd = line(x1, y1, x2, y2);
            let rev = line(x2, y2, x1, y1);
            for (px, py) in samples {
                let a = fwd.side(units(px), units(py));
                let b = rev.side(units(px), units(py));
                match a {
                    Side::On => assert_eq!(b, Side::On),
                    Side::Front => assert_eq!(b, Side::Back),
                    Side::Back => assert_eq!(b, Side::Front),
                }
            }
        }
    }

    #[test]
    fn two_way_side_agrees_off_the_line() {
        let l = line(0, 0, 64, 32);
        for (px, py) in [(50, 0), (0, 50), (-20, -30), (200, 10)] {
            let three = l.side(units(px), units(py));
            assert_ne!(three, Side::On);
            assert_eq!(l.point_on_side(units(px), units(py)), three as usize);
        }
        // exactly on the line → back for descent
        assert_eq!(l.point_on_side(units(32), units(16)), 1);
    }

    #[test]
    fn intercept_is_fraction_along_trace() {
        let trace = line(0, 0, 100, 0);
        let wall = line(25, -50, 25, 50);
        let frac = intercept_vector(&trace, &wall);
        assert!((frac - FRACUNIT / 4).abs() <= 2, "frac = {frac:#x}");

        let parallel = line(0, 10, 100, 10);
        assert_eq!(intercept_vector(&trace, &parallel), 0);
    }
}
