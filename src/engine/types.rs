//! Screen-dependent tables and the per-frame output of the culler.

use thiserror::Error;

use crate::world::angle::{ANGLETOFINESHIFT, Angle, FINEANGLES};
use crate::world::{FRACBITS, FRACUNIT, Fixed, SegmentId, SubsectorId};
use crate::world::fixed::{fixed_div, fixed_mul};

/// Horizontal field of view in fine angles (90°).
pub const FIELDOFVIEW: usize = 2048;

/// Widest screen the 16.16 column maths can address.
pub const MAX_SCREEN_WIDTH: usize = 4096;

/// Angle ↔ column lookups for one screen width.
///
/// `viewangletox` is indexed by `(angle + 90°) >> ANGLETOFINESHIFT` with the
/// angle relative to the view direction (positive = left). `xtoviewangle`
/// holds the view-relative angle of each column edge.
#[derive(Clone, Debug)]
pub struct ViewTables {
    pub width: i32,
    pub viewangletox: Vec<i32>,
    pub xtoviewangle: Vec<Angle>,
    /// Half of the visible angular span.
    pub clipangle: Angle,
}

/// `tan` over half a turn, centred on zero, in 16.16.
fn finetangent(i: usize) -> Fixed {
    let a = (i as f64 - (FINEANGLES / 4) as f64 + 0.5) * std::f64::consts::TAU / FINEANGLES as f64;
    (a.tan() * FRACUNIT as f64).clamp(i32::MIN as f64, i32::MAX as f64) as Fixed
}

impl ViewTables {
    /// `width` must lie in `2..=MAX_SCREEN_WIDTH`; see [`CullConfig::validate`].
    pub fn new(width: usize) -> Self {
        let width = width as i32;
        let centerxfrac = (width / 2) << FRACBITS;
        let focallength = fixed_div(centerxfrac, finetangent(FINEANGLES / 4 + FIELDOFVIEW / 2));

        let mut viewangletox: Vec<i32> = (0..FINEANGLES / 2)
            .map(|i| {
                let t = finetangent(i);
                if t > FRACUNIT * 2 {
                    -1
                } else if t < -FRACUNIT * 2 {
                    width + 1
                } else {
                    let t = fixed_mul(t, focallength);
                    ((centerxfrac - t + FRACUNIT - 1) >> FRACBITS).clamp(-1, width + 1)
                }
            })
            .collect();

        // column x sees the smallest angle that maps onto it
        let xtoviewangle: Vec<Angle> = (0..=width)
            .map(|x| {
                let i = viewangletox.iter().position(|&v| v <= x).unwrap_or(FINEANGLES / 2);
                Angle((i as u32) << ANGLETOFINESHIFT) - Angle::ANG90
            })
            .collect();

        for v in &mut viewangletox {
            if *v == -1 {
                *v = 0;
            } else if *v == width + 1 {
                *v = width;
            }
        }

        Self {
            width,
            clipangle: xtoviewangle[0],
            viewangletox,
            xtoviewangle,
        }
    }

    /// Screen column for a view-relative angle already clipped to the frustum.
    #[inline]
    pub fn angle_to_x(&self, rel: Angle) -> i32 {
        let idx = ((rel + Angle::ANG90).0 >> ANGLETOFINESHIFT) as usize;
        self.viewangletox[idx.min(self.viewangletox.len() - 1)]
    }
}

/// One visible fragment of a seg, in inclusive screen columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisWall {
    pub seg: SegmentId,
    pub start: i32,
    pub stop: i32,
    /// World angle from the camera to the seg's first vertex.
    pub angle1: Angle,
}

/// Everything the rasteriser needs from one descent, in traversal order.
#[derive(Clone, Debug, Default)]
pub struct FrameOutput {
    pub walls: Vec<VisWall>,
    pub subsectors: Vec<SubsectorId>,
}

impl FrameOutput {
    pub fn clear(&mut self) {
        self.walls.clear();
        self.subsectors.clear();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullStats {
    pub nodes_visited: u32,
    /// Far subtrees skipped by the bounding-box test.
    pub boxes_culled: u32,
}

/// Culler capacities. `None` means grow as needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CullConfig {
    pub screen_width: usize,
    pub max_solid_segs: Option<usize>,
    pub max_vis_walls: Option<usize>,
    pub max_vis_subsectors: Option<usize>,
}

impl CullConfig {
    pub fn validate(&self) -> Result<(), CullError> {
        if !(2..=MAX_SCREEN_WIDTH).contains(&self.screen_width) {
            return Err(CullError::ScreenWidth {
                width: self.screen_width,
                max: MAX_SCREEN_WIDTH,
            });
        }
        Ok(())
    }
}

impl Default for CullConfig {
    fn default() -> Self {
        Self {
            screen_width: 160,
            max_solid_segs: Some(32),
            max_vis_walls: None,
            max_vis_subsectors: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CullError {
    #[error("screen width {width} outside 2..={max}")]
    ScreenWidth { width: usize, max: usize },
    #[error("solid segment list full ({limit} ranges)")]
    SolidSegsFull { limit: usize },
    #[error("visible wall list full ({limit} fragments)")]
    VisWallsFull { limit: usize },
    #[error("visible subsector list full ({limit} entries)")]
    VisSubsectorsFull { limit: usize },
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_of_the_frustum_hit_the_screen_edges() {
        let t = ViewTables::new(160);
        // 90° field of view: a quarter turn split evenly
        assert!((t.clipangle.to_degrees() - 45.0).abs() < 0.1, "{:?}", t.clipangle);
        assert_eq!(t.angle_to_x(t.clipangle), 0);
        assert_eq!(t.angle_to_x(-t.clipangle), 160);
        assert_eq!(t.angle_to_x(Angle::ZERO), 80);
    }

    #[test]
    fn screen_width_is_bounded() {
        assert!(CullConfig::default().validate().is_ok());
        let wide = CullConfig {
            screen_width: 65536,
            ..CullConfig::default()
        };
        assert_eq!(
            wide.validate(),
            Err(CullError::ScreenWidth {
                width: 65536,
                max: MAX_SCREEN_WIDTH
            })
        );
        let narrow = CullConfig {
            screen_width: 0,
            ..CullConfig::default()
        };
        assert!(narrow.validate().is_err());
    }

    #[test]
    fn tangent_table_matches_the_shipped_one() {
        // entries shared with the classic finetangent lump
        assert_eq!(finetangent(2047), -25);
        assert_eq!(finetangent(2048), 25);
        assert_eq!(finetangent(3072), 65_586);
        // the extremes are odd-symmetric
        assert_eq!(finetangent(0), -finetangent(FINEANGLES / 2 - 1));
    }

    #[test]
    fn columns_run_right_to_left_in_angle() {
        let t = ViewTables::new(160);
        assert_eq!(t.xtoviewangle.len(), 161);
        for w in t.xtoviewangle.windows(2) {
            // angles shrink (wrapping) from the left edge to the right edge
            assert!((w[0] - w[1]).0 < Angle::ANG90.0, "{w:?}");
        }
        assert!(t.viewangletox.iter().all(|&x| (0..=160).contains(&x)));
    }
}
