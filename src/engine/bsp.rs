//! ----------------------------------------------------------------------------
//! **BSP front-to-back visibility culling**
//!
//! Responsible for
//! * visiting subsectors in **front-to-back** order from the camera
//! * skipping far subtrees whose bounding box is already fully occluded
//! * turning every front-facing seg into column fragments, solid or pass
//!
//! Drawing is somebody else's job: the result is a [`FrameOutput`] listing
//! visible fragments and visited subsectors in traversal order.
//! ----------------------------------------------------------------------------

use log::{trace, warn};

use super::clip::SolidSegs;
use super::types::{CullConfig, CullError, CullStats, FrameOutput, ViewTables, VisWall};
use crate::world::{
    Aabb, Angle, Camera, Level, NO_TEXTURE, NodeChild, SegmentId, SubsectorId, point_to_angle,
};

/// Box corners to project for each camera region, as `Aabb::coord` indices
/// `[x1, y1, x2, y2]`. Row is `boxy << 2 | boxx`; region 5 is inside.
const CHECKCOORD: [[usize; 4]; 12] = [
    [3, 0, 2, 1],
    [3, 0, 2, 0],
    [3, 1, 2, 0],
    [0, 0, 0, 0],
    [2, 0, 2, 1],
    [0, 0, 0, 0],
    [3, 1, 3, 0],
    [0, 0, 0, 0],
    [2, 0, 3, 1],
    [2, 1, 3, 1],
    [2, 1, 3, 0],
    [0, 0, 0, 0],
];

/// Frustum-clipped view-relative span, or `None` when it is off-screen.
fn clip_span(mut angle1: Angle, mut angle2: Angle, span: Angle, clip: Angle) -> Option<(Angle, Angle)> {
    let double = clip + clip;

    let tspan = angle1 + clip;
    if tspan > double {
        if tspan - double >= span {
            return None;
        }
        angle1 = clip;
    }
    let tspan = clip - angle2;
    if tspan > double {
        if tspan - double >= span {
            return None;
        }
        angle2 = -clip;
    }
    Some((angle1, angle2))
}

/// Owns the per-frame scratch state. Reuse one per screen size.
pub struct VisibilityCuller {
    config: CullConfig,
    tables: ViewTables,
    solid: SolidSegs,
    out: FrameOutput,
    stats: CullStats,
}

impl VisibilityCuller {
    pub fn new(config: CullConfig) -> Result<Self, CullError> {
        if let Err(e) = config.validate() {
            warn!("refusing culler config: {e}");
            return Err(e);
        }
        let tables = ViewTables::new(config.screen_width);
        let solid = SolidSegs::new(tables.width, config.max_solid_segs);
        Ok(Self {
            config,
            tables,
            solid,
            out: FrameOutput::default(),
            stats: CullStats::default(),
        })
    }

    pub fn config(&self) -> &CullConfig {
        &self.config
    }

    pub fn tables(&self) -> &ViewTables {
        &self.tables
    }

    pub fn solid_segs(&self) -> &SolidSegs {
        &self.solid
    }

    pub fn stats(&self) -> CullStats {
        self.stats
    }

    /*──────────────────────────── Entry point ────────────────────────────*/

    /// Walk the tree from `cam` and collect what it can see.
    ///
    /// On error the frame is abandoned and the partial output discarded on
    /// the next call.
    pub fn render_bsp(&mut self, level: &Level, cam: &Camera) -> Result<&FrameOutput, CullError> {
        self.solid.clear();
        self.out.clear();
        self.stats = CullStats::default();

        self.walk(level, cam, level.bsp_root())?;
        trace!(
            "frame: {} walls, {} subsectors, {} nodes",
            self.out.walls.len(),
            self.out.subsectors.len(),
            self.stats.nodes_visited
        );
        Ok(&self.out)
    }

    fn walk(&mut self, level: &Level, cam: &Camera, child: NodeChild) -> Result<(), CullError> {
        let node_id = match child {
            NodeChild::Subsector(ss) => return self.subsector(level, cam, ss),
            NodeChild::Node(n) => n,
        };
        self.stats.nodes_visited += 1;

        let node = &level.nodes[node_id as usize];
        let side = node.point_side(cam.x, cam.y);

        // near side first, far side only if some of it can still show
        self.walk(level, cam, node.child[side])?;
        if self.check_bbox(cam, &node.bbox[side ^ 1]) {
            self.walk(level, cam, node.child[side ^ 1])?;
        } else {
            trace!("node {node_id}: far side occluded");
            self.stats.boxes_culled += 1;
        }
        Ok(())
    }

    /// Could any part of `bbox` be visible?
    fn check_bbox(&self, cam: &Camera, bbox: &Aabb) -> bool {
        let boxx = if cam.x <= bbox.left {
            0
        } else if cam.x < bbox.right {
            1
        } else {
            2
        };
        let boxy = if cam.y >= bbox.top {
            0
        } else if cam.y > bbox.bottom {
            1
        } else {
            2
        };

        let boxpos = (boxy << 2) + boxx;
        if boxpos == 5 {
            return true;
        }

        let [x1, y1, x2, y2] = CHECKCOORD[boxpos].map(|i| bbox.coord(i));
        let angle1 = point_to_angle(cam.x, cam.y, x1, y1) - cam.angle;
        let angle2 = point_to_angle(cam.x, cam.y, x2, y2) - cam.angle;

        let span = angle1 - angle2;
        if span >= Angle::ANG180 {
            return true; // sitting on the box edge
        }
        let Some((angle1, angle2)) = clip_span(angle1, angle2, span, self.tables.clipangle) else {
            return false;
        };

        let sx1 = self.tables.angle_to_x(angle1);
        let sx2 = self.tables.angle_to_x(angle2);
        if sx1 == sx2 {
            return false;
        }
        !self.solid.covers(sx1, sx2 - 1)
    }

    fn subsector(&mut self, level: &Level, cam: &Camera, ss: SubsectorId) -> Result<(), CullError> {
        if let Some(limit) = self.config.max_vis_subsectors {
            if self.out.subsectors.len() >= limit {
                warn!("visible subsector list full at {limit}");
                return Err(CullError::VisSubsectorsFull { limit });
            }
        }
        self.out.subsectors.push(ss);

        for seg in level.segs_of_subsector(ss) {
            self.add_line(level, cam, seg)?;
        }
        Ok(())
    }

    /// Clip one seg against the frustum and the solid list.
    fn add_line(&mut self, level: &Level, cam: &Camera, seg_id: SegmentId) -> Result<(), CullError> {
        let seg = &level.segs[seg_id as usize];
        let v1 = &level.vertices[seg.v1 as usize];
        let v2 = &level.vertices[seg.v2 as usize];

        let angle1 = point_to_angle(cam.x, cam.y, v1.x, v1.y);
        let angle2 = point_to_angle(cam.x, cam.y, v2.x, v2.y);

        // back side faces the camera
        let span = angle1 - angle2;
        if span >= Angle::ANG180 {
            return Ok(());
        }

        let rw_angle1 = angle1;
        let Some((a1, a2)) = clip_span(
            angle1 - cam.angle,
            angle2 - cam.angle,
            span,
            self.tables.clipangle,
        ) else {
            return Ok(());
        };

        let x1 = self.tables.angle_to_x(a1);
        let x2 = self.tables.angle_to_x(a2);
        if x1 == x2 {
            return Ok(()); // thinner than a column
        }

        let front = &level.sectors[seg.front_sector as usize];
        let solid = match seg.back_sector {
            None => true,
            Some(b) => {
                let back = &level.sectors[b as usize];
                if back.ceil_h <= front.floor_h || back.floor_h >= front.ceil_h {
                    true // closed door
                } else if back.ceil_h != front.ceil_h || back.floor_h != front.floor_h {
                    false
                } else if back.looks_like(front)
                    && level.sidedefs[seg.sidedef as usize].middle == NO_TEXTURE
                {
                    return Ok(()); // invisible trigger line
                } else {
                    false
                }
            }
        };

        let Self {
            solid: segs,
            out,
            config,
            ..
        } = self;
        let limit = config.max_vis_walls;
        let mut emit = |start: i32, stop: i32| {
            if let Some(limit) = limit {
                if out.walls.len() >= limit {
                    warn!("visible wall list full at {limit}");
                    return Err(CullError::VisWallsFull { limit });
                }
            }
            out.walls.push(VisWall {
                seg: seg_id,
                start,
                stop,
                angle1: rw_angle1,
            });
            Ok(())
        };

        if solid {
            segs.clip_solid(x1, x2 - 1, &mut emit)
        } else {
            segs.clip_pass(x1, x2 - 1, &mut emit)
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::MAX_SCREEN_WIDTH;
    use crate::world::demo;

    fn culler() -> VisibilityCuller {
        VisibilityCuller::new(CullConfig::default()).unwrap()
    }

    fn lines_of(level: &Level, out: &FrameOutput) -> Vec<u16> {
        out.walls
            .iter()
            .map(|w| level.segs[w.seg as usize].linedef)
            .collect()
    }

    #[test]
    fn doorway_reveals_the_next_room() {
        let lvl = demo::two_rooms().unwrap();
        let mut c = culler();
        let cam = Camera::at_units(64, 128, 0.0);

        let out = c.render_bsp(&lvl, &cam).unwrap().clone();
        assert_eq!(
            out.subsectors,
            vec![demo::ROOM_A_SUBSECTOR, demo::ROOM_B_SUBSECTOR]
        );
        let lines = lines_of(&lvl, &out);
        assert!(lines.contains(&demo::DOORWAY), "{lines:?}");
        assert!(lines.contains(&demo::ROOM_B_EAST_WALL), "{lines:?}");
        // the wall behind the camera never shows
        assert!(!lines.contains(&demo::ROOM_A_WEST_WALL), "{lines:?}");

        // every column is solid once the far wall closes the doorway
        let ranges = c.solid_segs().ranges();
        assert_eq!((ranges[0].first, ranges[0].last), (-2, 161), "{ranges:?}");
        assert_eq!(c.stats().nodes_visited, 1);
    }

    #[test]
    fn fragments_never_overlap() {
        let lvl = demo::two_rooms().unwrap();
        let mut c = culler();
        let out = c.render_bsp(&lvl, &Camera::at_units(64, 128, 0.0)).unwrap();

        // solid fragments are disjoint and cover the screen exactly once
        let mut drawn = vec![0u8; 160];
        for w in &out.walls {
            assert!(w.start <= w.stop, "{w:?}");
            let seg = &lvl.segs[w.seg as usize];
            if seg.back_sector.is_none() {
                for x in w.start..=w.stop {
                    drawn[x as usize] += 1;
                }
            }
        }
        assert!(drawn.iter().all(|&n| n == 1), "{drawn:?}");
    }

    #[test]
    fn facing_away_from_the_doorway() {
        let lvl = demo::two_rooms().unwrap();
        let mut c = culler();
        let out = c.render_bsp(&lvl, &Camera::at_units(64, 128, 180.0)).unwrap();
        assert_eq!(out.subsectors, vec![demo::ROOM_A_SUBSECTOR]);
        assert!(lines_of(&lvl, out).contains(&demo::ROOM_A_WEST_WALL));
        assert_eq!(c.stats().boxes_culled, 1);
    }

    #[test]
    fn closed_box_fills_the_screen() {
        let lvl = demo::single_room().unwrap();
        let mut c = culler();
        let out = c.render_bsp(&lvl, &Camera::at_units(64, 128, 0.0)).unwrap();
        assert_eq!(out.subsectors, vec![0]);
        // north, east and south walls
        assert_eq!(out.walls.len(), 3);
        let ranges = c.solid_segs().ranges();
        assert_eq!(ranges.len(), 1);
        assert_eq!((ranges[0].first, ranges[0].last), (-2, 161));
    }

    #[test]
    fn outside_box_regions_project_correctly() {
        let c = culler();
        let bbox = Aabb::from_units(256, 0, 256, 512);

        // looking straight at it from the west
        assert!(c.check_bbox(&Camera::at_units(64, 128, 0.0), &bbox));
        // behind the camera
        assert!(!c.check_bbox(&Camera::at_units(64, 128, 180.0), &bbox));
        // above and to the left, looking south-east
        assert!(c.check_bbox(&Camera::at_units(100, 400, -45.0), &bbox));
        // inside: always visible
        assert!(c.check_bbox(&Camera::at_units(300, 100, 90.0), &bbox));
    }

    #[test]
    fn capacity_limits_abort_the_frame() {
        let lvl = demo::two_rooms().unwrap();
        let cam = Camera::at_units(64, 128, 0.0);

        let mut c = VisibilityCuller::new(CullConfig {
            max_vis_walls: Some(2),
            ..CullConfig::default()
        })
        .unwrap();
        assert_eq!(
            c.render_bsp(&lvl, &cam).unwrap_err(),
            CullError::VisWallsFull { limit: 2 }
        );

        let mut c = VisibilityCuller::new(CullConfig {
            max_vis_subsectors: Some(1),
            ..CullConfig::default()
        })
        .unwrap();
        assert_eq!(
            c.render_bsp(&lvl, &cam).unwrap_err(),
            CullError::VisSubsectorsFull { limit: 1 }
        );

        // a later frame with room to spare starts clean
        let mut c = culler();
        assert!(c.render_bsp(&lvl, &cam).is_ok());
        assert!(c.render_bsp(&lvl, &cam).is_ok());
    }

    #[test]
    fn oversized_screens_are_refused() {
        let wide = VisibilityCuller::new(CullConfig {
            screen_width: 70_000,
            ..CullConfig::default()
        });
        assert_eq!(
            wide.err(),
            Some(CullError::ScreenWidth {
                width: 70_000,
                max: MAX_SCREEN_WIDTH
            })
        );

        let widest = VisibilityCuller::new(CullConfig {
            screen_width: MAX_SCREEN_WIDTH,
            ..CullConfig::default()
        })
        .unwrap();
        let lvl = demo::two_rooms().unwrap();
        let mut c = widest;
        let out = c.render_bsp(&lvl, &Camera::at_units(64, 128, 0.0)).unwrap();
        assert!(!out.walls.is_empty());
        assert!(out.walls.iter().all(|w| w.stop < MAX_SCREEN_WIDTH as i32));
    }
}
