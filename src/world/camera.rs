use super::angle::{Angle, finecosine, finesine};
use super::fixed::{Fixed, fixed_mul, units};

/// Player view-point in world space.
///
/// * Only **yaw** (heading) is simulated – Doom never tilts up/down.
/// * `z` is the absolute eye altitude; the culler only needs `x`, `y` and
///   `angle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub angle: Angle,
}

impl Camera {
    pub fn new(x: Fixed, y: Fixed, z: Fixed, angle: Angle) -> Self {
        Self { x, y, z, angle }
    }

    /// Camera at whole map units facing `degrees` (0 = east, CCW).
    pub fn at_units(x: i32, y: i32, degrees: f64) -> Self {
        Self::new(units(x), units(y), units(41), Angle::from_degrees(degrees))
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` and `side` (strafe right), both fixed-point.
    pub fn step(&mut self, forward: Fixed, side: Fixed) {
        let f = self.angle.fine();
        let r = (self.angle - Angle::ANG90).fine();
        self.x += fixed_mul(forward, finecosine(f)) + fixed_mul(side, finecosine(r));
        self.y += fixed_mul(forward, finesine(f)) + fixed_mul(side, finesine(r));
    }

    /// Rotate around Z-axis (positive = turn left).
    pub fn turn(&mut self, delta: Angle) {
        self.angle += delta;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: Fixed, b: Fixed) -> bool {
        (a - b).abs() <= 1024
    }

    #[test]
    fn step_follows_heading() {
        let mut cam = Camera::at_units(0, 0, 0.0);
        cam.step(units(10), 0);
        assert!(near(cam.x, units(10)) && near(cam.y, 0), "{cam:?}");

        cam.turn(Angle::ANG90);
        cam.step(units(10), 0);
        assert!(near(cam.x, units(10)) && near(cam.y, units(10)), "{cam:?}");
    }

    #[test]
    fn strafe_is_to_the_right() {
        // facing north, right is east
        let mut cam = Camera::at_units(0, 0, 90.0);
        cam.step(0, units(8));
        assert!(near(cam.x, units(8)) && near(cam.y, 0), "{cam:?}");
    }

    #[test]
    fn turning_wraps() {
        let mut cam = Camera::at_units(0, 0, 270.0);
        cam.turn(Angle::ANG180);
        assert_eq!(cam.angle, Angle::ANG90);
    }
}
