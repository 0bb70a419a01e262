//! Line-of-sight through the BSP.
//!
//! A trace runs from the looker's eyes to the target. Descending the tree
//! near side first, every crossed line either blocks outright (one-sided,
//! closed) or narrows the vertical window `bottom_slope..top_slope` through
//! which the target's body is visible. Sight fails once the window closes.

use hecs::{Entity, World};
use log::trace;

use super::components::{ActorFlags, Animation, Body, Latecall, Position, Subsector, Target};
use super::effects::Effect;
use crate::defs::MobjFlags;
use crate::world::divline::intercept_vector;
use crate::world::fixed::fixed_div;
use crate::world::{
    Divline, Fixed, Level, LineMarks, LinedefFlags, NodeChild, SectorId, SubsectorId,
};

/// The parts of an actor sight cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SightActor {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub height: Fixed,
    pub sector: SectorId,
}

impl SightActor {
    pub fn of(world: &World, level: &Level, ent: Entity) -> Option<SightActor> {
        let mut q = world.query_one::<(&Position, &Body, &Subsector)>(ent).ok()?;
        let (pos, body, ss) = q.get()?;
        let sector = level.subsectors.get(ss.0 as usize)?.sector;
        Some(SightActor {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            height: body.height,
            sector,
        })
    }
}

/// Per-query state threaded through the descent.
struct Trace {
    line: Divline,
    end_x: Fixed,
    end_y: Fixed,
    eye_z: Fixed,
    top_slope: Fixed,
    bottom_slope: Fixed,
}

/// Keep traces off the map's whole-unit grid so vertices never sit exactly
/// on them.
#[inline]
fn nudge(v: Fixed) -> Fixed {
    (v & !0x1ffff) | 0x10000
}

/// Owns its own line stamps, separate from the movement code's.
#[derive(Clone, Debug)]
pub struct SightCaster {
    marks: LineMarks,
    /// Tree nodes and leaves entered by the last [`SightCaster::check_sight`].
    pub nodes_visited: usize,
}

impl SightCaster {
    pub fn new(level: &Level) -> Self {
        Self {
            marks: LineMarks::new(level.linedefs.len()),
            nodes_visited: 0,
        }
    }

    /// Can `looker` see any part of `target`?
    pub fn check_sight(&mut self, level: &Level, looker: &SightActor, target: &SightActor) -> bool {
        self.nodes_visited = 0;

        if level.reject.is_rejected(looker.sector, target.sector) {
            return false;
        }

        self.marks.next_query();

        let eye_z = looker.z + looker.height - (looker.height >> 2);
        let (sx, sy) = (nudge(looker.x), nudge(looker.y));
        let (ex, ey) = (nudge(target.x), nudge(target.y));
        let mut tr = Trace {
            line: Divline::from_points(sx, sy, ex, ey),
            end_x: ex,
            end_y: ey,
            eye_z,
            top_slope: (target.z + target.height) - eye_z,
            bottom_slope: target.z - eye_z,
        };

        let seen = self.cross_node(level, level.bsp_root(), &mut tr);
        trace!(
            "sight ({:#x},{:#x}) -> ({:#x},{:#x}): {seen} after {} nodes",
            looker.x, looker.y, target.x, target.y, self.nodes_visited
        );
        seen
    }

    fn cross_node(&mut self, level: &Level, child: NodeChild, tr: &mut Trace) -> bool {
        self.nodes_visited += 1;
        let n = match child {
            NodeChild::Subsector(ss) => return self.cross_subsector(level, ss, tr),
            NodeChild::Node(n) => n,
        };
        let node = &level.nodes[n as usize];
        let part = node.divline();

        let side = part.side(tr.line.x, tr.line.y).index();
        if !self.cross_node(level, node.child[side], tr) {
            return false;
        }

        // the end point is on the same side: the far child is never entered
        if part.side(tr.end_x, tr.end_y) as usize == side {
            return true;
        }
        self.cross_node(level, node.child[side ^ 1], tr)
    }

    fn cross_subsector(&mut self, level: &Level, ss: SubsectorId, tr: &mut Trace) -> bool {
        for seg_id in level.segs_of_subsector(ss) {
            let seg = &level.segs[seg_id as usize];
            if !self.marks.mark(seg.linedef) {
                continue;
            }
            let line = &level.linedefs[seg.linedef as usize];
            let v1 = level.vertices[line.v1 as usize];
            let v2 = level.vertices[line.v2 as usize];

            // the line must straddle the trace ...
            if tr.line.side(v1.x, v1.y) == tr.line.side(v2.x, v2.y) {
                continue;
            }
            // ... and the trace must straddle the line
            let divl = Divline::new(v1.x, v1.y, line.dx, line.dy);
            if divl.side(tr.line.x, tr.line.y) == divl.side(tr.end_x, tr.end_y) {
                continue;
            }

            if !line.flags.contains(LinedefFlags::TWO_SIDED) {
                return false;
            }
            let Some(back) = seg.back_sector else {
                return false;
            };
            let front = &level.sectors[seg.front_sector as usize];
            let back = &level.sectors[back as usize];

            if front.floor_h == back.floor_h && front.ceil_h == back.ceil_h {
                continue; // nothing to look past
            }

            let open_top = front.ceil_h.min(back.ceil_h);
            let open_bottom = front.floor_h.max(back.floor_h);
            if open_bottom >= open_top {
                return false; // closed door
            }

            let frac = intercept_vector(&tr.line, &divl);

            if front.floor_h != back.floor_h {
                let slope = fixed_div(open_bottom - tr.eye_z, frac);
                if slope > tr.bottom_slope {
                    tr.bottom_slope = slope;
                }
            }
            if front.ceil_h != back.ceil_h {
                let slope = fixed_div(open_top - tr.eye_z, frac);
                if slope < tr.top_slope {
                    tr.top_slope = slope;
                }
            }
            if tr.top_slope <= tr.bottom_slope {
                return false;
            }
        }
        true
    }
}

/// Refresh `SEETARGET` for killable actors about to change state.
///
/// Only actors whose animation is one tic from advancing are checked; the
/// flag is consulted on that transition and left stale otherwise.
pub fn check_sights(world: &mut World, level: &Level, caster: &mut SightCaster, active: &[Entity]) {
    for &ent in active {
        let target = {
            let Ok(mut q) = world.query_one::<(&ActorFlags, &Animation, &Target, &Latecall)>(ent)
            else {
                continue;
            };
            let Some((flags, anim, target, late)) = q.get() else {
                continue;
            };
            if late.0 == Effect::Reap
                || !flags.0.contains(MobjFlags::COUNTKILL)
                || anim.tics != 1
            {
                continue;
            }
            target.0
        };

        let seen = match target {
            Some(t) => match (
                SightActor::of(world, level, ent),
                SightActor::of(world, level, t),
            ) {
                (Some(a), Some(b)) => caster.check_sight(level, &a, &b),
                _ => false,
            },
            None => false,
        };

        if let Ok(mut f) = world.get::<&mut ActorFlags>(ent) {
            f.0.set(MobjFlags::SEETARGET, seen);
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
