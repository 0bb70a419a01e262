//! P_TryMove / P_CheckPosition on fixed-point maths.
//!
//! The mover is a by-value snapshot ([`Mover`]) so the query can read every
//! other entity through a shared `&World` while it relinks the thing grid.
//! All per-call scratch lives in [`PositionCheck`]; nothing is global.

use hecs::{Entity, World};
use log::trace;

use super::components::{ActorFlags, Body, Bounds, Class, Position, Subsector, Target};
use super::config::SimConfig;
use super::spacial::ThingGrid;
use crate::defs::{MobjFlags, MobjType};
use crate::world::{
    Aabb, FRACBITS, Fixed, Level, LineMarks, Linedef, LinedefFlags, LinedefId, SlopeType,
    SubsectorId,
};

/// Everything collision needs to know about the thing being moved.
#[derive(Clone, Copy, Debug)]
pub struct Mover {
    pub ent: Entity,
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub radius: Fixed,
    pub height: Fixed,
    pub flags: MobjFlags,
    pub kind: MobjType,
    pub target: Option<Entity>,
    /// Species of the target; a missile passes through its shooter's kin.
    pub target_kind: Option<MobjType>,
    pub floor_z: Fixed,
    pub ceiling_z: Fixed,
    pub subsector: SubsectorId,
}

impl Mover {
    /// Snapshot `ent`. `None` if it lacks a body or was despawned.
    pub fn load(world: &World, ent: Entity) -> Option<Mover> {
        let mut q = world
            .query_one::<(&Position, &Body, &Bounds, &Subsector, &ActorFlags, &Class, &Target)>(ent)
            .ok()?;
        let (pos, body, bounds, ss, flags, class, target) = q.get()?;
        let target = target.0;
        let target_kind = target.and_then(|t| world.get::<&Class>(t).ok().map(|c| c.0.kind));
        Some(Mover {
            ent,
            x: pos.x,
            y: pos.y,
            z: pos.z,
            radius: body.radius,
            height: body.height,
            flags: flags.0,
            kind: class.0.kind,
            target,
            target_kind,
            floor_z: bounds.floor_z,
            ceiling_z: bounds.ceiling_z,
            subsector: ss.0,
        })
    }

    /// Write position, bounds and subsector back.
    pub fn store(&self, world: &mut World) {
        if let Ok((pos, bounds, ss)) =
            world.query_one_mut::<(&mut Position, &mut Bounds, &mut Subsector)>(self.ent)
        {
            *pos = Position {
                x: self.x,
                y: self.y,
                z: self.z,
            };
            *bounds = Bounds {
                floor_z: self.floor_z,
                ceiling_z: self.ceiling_z,
            };
            ss.0 = self.subsector;
        }
    }

    #[inline]
    pub fn is_missile(&self) -> bool {
        self.flags.contains(MobjFlags::MISSILE)
    }
}

/// Borrowed state shared by every move in one thinker step.
pub struct MoveCtx<'a> {
    pub level: &'a Level,
    pub world: &'a World,
    pub grid: &'a mut ThingGrid,
    pub marks: &'a mut LineMarks,
    pub config: &'a SimConfig,
}

/// Why a move was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockReason {
    Thing(Entity),
    Line(LinedefId),
    /// Floor-to-ceiling gap smaller than the body.
    NoRoom,
    /// Would have to duck under the destination ceiling.
    Ceiling,
    StepTooHigh,
    Dropoff,
}

/// Result of probing one spot.
#[derive(Clone, Copy, Debug)]
pub struct PositionCheck {
    pub floor_z: Fixed,
    pub ceiling_z: Fixed,
    pub dropoff_z: Fixed,
    pub subsector: SubsectorId,
    /// Line that lowered `ceiling_z` last.
    pub ceiling_line: Option<LinedefId>,
    /// Thing a skull or missile ran into.
    pub hit: Option<Entity>,
    pub blocked: Option<BlockReason>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Blocked {
    pub reason: BlockReason,
    pub hit: Option<Entity>,
    pub ceiling_line: Option<LinedefId>,
}

enum Contact {
    Pass,
    Block,
    Hit,
}

/* ================================================================= */
/*  Things                                                            */
/* ================================================================= */

fn check_thing(world: &World, mover: &Mover, x: Fixed, y: Fixed, other: Entity) -> Contact {
    let Ok(mut q) = world.query_one::<(&Position, &Body, &ActorFlags, &Class)>(other) else {
        return Contact::Pass;
    };
    let Some((pos, body, flags, class)) = q.get() else {
        return Contact::Pass;
    };

    if !flags.0.contains(MobjFlags::SOLID) {
        return Contact::Pass;
    }
    let block_dist = body.radius + mover.radius;
    if (pos.x - x).abs() >= block_dist || (pos.y - y).abs() >= block_dist {
        return Contact::Pass;
    }
    if other == mover.ent {
        return Contact::Pass;
    }

    if mover.flags.contains(MobjFlags::SKULLFLY) {
        return Contact::Hit;
    }

    if mover.is_missile() {
        if mover.z > pos.z + body.height {
            return Contact::Pass; // overhead
        }
        if mover.z + mover.height < pos.z {
            return Contact::Pass; // underneath
        }
        if mover.target_kind == Some(class.0.kind) {
            if Some(other) == mover.target {
                return Contact::Pass; // own shooter
            }
            if class.0.kind != MobjType::Player {
                return Contact::Block; // kin: explode without damage
            }
        }
        if !flags.0.contains(MobjFlags::SHOOTABLE) {
            return Contact::Block;
        }
        return Contact::Hit;
    }

    Contact::Block
}

/* ================================================================= */
/*  Lines                                                             */
/* ================================================================= */

/// True if `bbox` straddles the line. Touching the line's bounds counts
/// as outside.
pub fn box_crosses_line(level: &Level, bbox: &Aabb, line: &Linedef) -> bool {
    if bbox.right <= line.bbox.left
        || bbox.left >= line.bbox.right
        || bbox.top <= line.bbox.bottom
        || bbox.bottom >= line.bbox.top
    {
        return false;
    }

    let (x1, x2) = if line.slope == SlopeType::Positive {
        (bbox.left, bbox.right)
    } else {
        (bbox.right, bbox.left)
    };

    let v1 = level.vertices[line.v1 as usize];
    let ldx = (line.dx >> FRACBITS) as i64;
    let ldy = (line.dy >> FRACBITS) as i64;

    let dx1 = ((x1 - v1.x) >> FRACBITS) as i64;
    let dy1 = ((bbox.top - v1.y) >> FRACBITS) as i64;
    let dx2 = ((x2 - v1.x) >> FRACBITS) as i64;
    let dy2 = ((bbox.bottom - v1.y) >> FRACBITS) as i64;

    let side1 = ldy * dx1 < dy1 * ldx;
    let side2 = ldy * dx2 < dy2 * ldx;
    side1 != side2
}

/// Narrow the running floor / ceiling / dropoff for a crossed line.
/// Returns `false` when the line blocks outright.
fn check_line(level: &Level, id: LinedefId, flags: MobjFlags, chk: &mut PositionCheck) -> bool {
    let line = &level.linedefs[id as usize];
    let Some(back) = line.back_sector else {
        return false; // one-sided
    };
    if !flags.contains(MobjFlags::MISSILE)
        && line
            .flags
            .intersects(LinedefFlags::IMPASSABLE | LinedefFlags::BLOCK_MONSTERS)
    {
        return false;
    }

    let front = &level.sectors[line.front_sector as usize];
    let back = &level.sectors[back as usize];

    let open_top = front.ceil_h.min(back.ceil_h);
    let (open_bottom, low_floor) = if front.floor_h > back.floor_h {
        (front.floor_h, back.floor_h)
    } else {
        (back.floor_h, front.floor_h)
    };

    if open_top < chk.ceiling_z {
        chk.ceiling_z = open_top;
        chk.ceiling_line = Some(id);
    }
    if open_bottom > chk.floor_z {
        chk.floor_z = open_bottom;
    }
    if low_floor < chk.dropoff_z {
        chk.dropoff_z = low_floor;
    }
    true
}

/* ================================================================= */
/*  P_CheckPosition / P_TryMove                                       */
/* ================================================================= */

/// Test `(x, y)` for `mover` against things and lines.
pub fn check_position(ctx: &mut MoveCtx, mover: &Mover, x: Fixed, y: Fixed) -> PositionCheck {
    let level = ctx.level;
    let bbox = Aabb::around(x, y, mover.radius);

    // base heights come from the sector under the destination point;
    // crossed lines can only squeeze them
    let ss = level.locate_subsector(x, y);
    let sector = level.subsector_sector(ss);
    let mut chk = PositionCheck {
        floor_z: sector.floor_h,
        ceiling_z: sector.ceil_h,
        dropoff_z: sector.floor_h,
        subsector: ss,
        ceiling_line: None,
        hit: None,
        blocked: None,
    };

    ctx.marks.next_query();

    // things are filed by origin, so widen by the largest radius
    let range = level.blockmap.cell_range(&bbox, ctx.config.max_radius);
    for (bx, by) in range.cells() {
        for &other in ctx.grid.things_in(bx, by) {
            match check_thing(ctx.world, mover, x, y, other) {
                Contact::Pass => {}
                Contact::Block => {
                    chk.blocked = Some(BlockReason::Thing(other));
                    return chk;
                }
                Contact::Hit => {
                    chk.hit = Some(other);
                    chk.blocked = Some(BlockReason::Thing(other));
                    return chk;
                }
            }
        }
        for &id in level.blockmap.lines_in(bx, by) {
            if !ctx.marks.mark(id) {
                continue;
            }
            let line = &level.linedefs[id as usize];
            if box_crosses_line(level, &bbox, line) && !check_line(level, id, mover.flags, &mut chk)
            {
                chk.blocked = Some(BlockReason::Line(id));
                return chk;
            }
        }
    }
    chk
}

/// Move `mover` to `(x, y)` if it fits, relinking it in the thing grid.
/// `z` is left alone; the vertical integrator settles it.
pub fn try_move(ctx: &mut MoveCtx, mover: &mut Mover, x: Fixed, y: Fixed) -> Result<(), Blocked> {
    let chk = check_position(ctx, mover, x, y);
    let fail = |reason| Blocked {
        reason,
        hit: chk.hit,
        ceiling_line: chk.ceiling_line,
    };

    let reason = if let Some(r) = chk.blocked {
        Some(r)
    } else if chk.ceiling_z - chk.floor_z < mover.height {
        Some(BlockReason::NoRoom)
    } else if chk.ceiling_z - mover.z < mover.height {
        Some(BlockReason::Ceiling)
    } else if chk.floor_z - mover.z > ctx.config.max_step {
        Some(BlockReason::StepTooHigh)
    } else if !mover.flags.intersects(MobjFlags::DROPOFF | MobjFlags::FLOAT)
        && chk.floor_z - chk.dropoff_z > ctx.config.max_step
    {
        Some(BlockReason::Dropoff)
    } else {
        None
    };
    if let Some(r) = reason {
        trace!("{:?} blocked at ({x:#x}, {y:#x}): {r:?}", mover.ent);
        return Err(fail(r));
    }

    let linked = !mover.flags.contains(MobjFlags::NOBLOCKMAP);
    if linked {
        ctx.grid.remove(mover.ent, mover.x, mover.y);
    }
    mover.floor_z = chk.floor_z;
    mover.ceiling_z = chk.ceiling_z;
    mover.subsector = chk.subsector;
    mover.x = x;
    mover.y = y;
    if linked {
        ctx.grid.insert(mover.ent, x, y);
    }
    Ok(())
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::by_id;
    use crate::sim::mob::{SpawnZ, set_target, spawn_mobj};
    use crate::world::{LevelBuilder, NodeChild, Sector, demo, units};

    struct Rig {
        level: Level,
        world: World,
        grid: ThingGrid,
        marks: LineMarks,
        config: SimConfig,
    }

    impl Rig {
        fn new(level: Level) -> Self {
            let grid = ThingGrid::new(&level.blockmap);
            let marks = LineMarks::new(level.linedefs.len());
            Rig {
                level,
                world: World::new(),
                grid,
                marks,
                config: SimConfig::default(),
            }
        }

        fn spawn(&mut self, id: &str, x: i32, y: i32) -> Entity {
            let info = by_id(id).unwrap();
            spawn_mobj(
                &mut self.world,
                &mut self.grid,
                &self.level,
                info,
                units(x),
                units(y),
                SpawnZ::Floor,
            )
        }

        fn try_move(&mut self, ent: Entity, x: i32, y: i32) -> (Mover, Result<(), Blocked>) {
            let mut mover = Mover::load(&self.world, ent).unwrap();
            let mut ctx = MoveCtx {
                level: &self.level,
                world: &self.world,
                grid: &mut self.grid,
                marks: &mut self.marks,
                config: &self.config,
            };
            let res = try_move(&mut ctx, &mut mover, units(x), units(y));
            (mover, res)
        }
    }

    #[test]
    fn walks_through_the_doorway_onto_the_raised_floor() {
        let mut rig = Rig::new(demo::two_rooms().unwrap());
        let e = rig.spawn("PLAYER", 240, 128);
        let (m, res) = rig.try_move(e, 264, 128);
        assert!(res.is_ok());
        assert_eq!((m.x, m.y), (units(264), units(128)));
        assert_eq!(m.floor_z, units(demo::ROOM_B_FLOOR));
        assert_eq!(m.subsector, demo::ROOM_B_SUBSECTOR);
        // z is settled later by the vertical integrator
        assert_eq!(m.z, 0);
    }

    #[test]
    fn a_wider_monster_still_fits_the_doorway() {
        let mut rig = Rig::new(demo::two_rooms().unwrap());
        let e = rig.spawn("POSSESSED", 240, 128);
        let (_, res) = rig.try_move(e, 264, 128);
        assert!(res.is_ok());
    }

    #[test]
    fn one_sided_wall_blocks_without_moving() {
        let mut rig = Rig::new(demo::two_rooms().unwrap());
        let e = rig.spawn("PLAYER", 240, 40);
        let (m, res) = rig.try_move(e, 264, 40);
        let err = res.unwrap_err();
        assert!(matches!(err.reason, BlockReason::Line(_)));
        assert_eq!((m.x, m.y), (units(240), units(40)));
    }

    #[test]
    fn solid_things_block_and_non_solid_ones_do_not() {
        let mut rig = Rig::new(demo::two_rooms().unwrap());
        let p = rig.spawn("PLAYER", 64, 128);
        let barrel = rig.spawn("BARREL", 100, 128);
        let (_, res) = rig.try_move(p, 80, 128);
        assert_eq!(res.unwrap_err().reason, BlockReason::Thing(barrel));

        rig.world.get::<&mut ActorFlags>(barrel).unwrap().0.remove(MobjFlags::SOLID);
        let (_, res) = rig.try_move(p, 80, 128);
        assert!(res.is_ok());
    }

    #[test]
    fn charging_skull_records_its_victim() {
        let mut rig = Rig::new(demo::two_rooms().unwrap());
        let skull = rig.spawn("SKULL", 64, 128);
        let victim = rig.spawn("TROOP", 100, 128);
        rig.world.get::<&mut ActorFlags>(skull).unwrap().0.insert(MobjFlags::SKULLFLY);
        let (_, res) = rig.try_move(skull, 70, 128);
        let err = res.unwrap_err();
        assert_eq!(err.hit, Some(victim));
    }

    #[test]
    fn missile_passes_shooter_and_explodes_on_kin_without_hit() {
        let mut rig = Rig::new(demo::two_rooms().unwrap());
        let shooter = rig.spawn("TROOP", 64, 128);
        let kin = rig.spawn("TROOP", 64, 200);
        let marine = rig.spawn("PLAYER", 150, 128);
        let shot = rig.spawn("TROOPSHOT", 64, 128);
        set_target(&mut rig.world, shot, Some(shooter));
        rig.world.get::<&mut Position>(shot).unwrap().z = units(32);

        // right on top of the shooter
        let (_, res) = rig.try_move(shot, 66, 128);
        assert!(res.is_ok());

        // kin: blocked, no victim
        let (_, res) = rig.try_move(shot, 64, 190);
        let err = res.unwrap_err();
        assert_eq!(err.reason, BlockReason::Thing(kin));
        assert_eq!(err.hit, None);

        let (_, res) = rig.try_move(shot, 140, 128);
        assert_eq!(res.unwrap_err().hit, Some(marine));

        // flying overhead
        rig.world.get::<&mut Position>(shot).unwrap().z = units(100);
        let (_, res) = rig.try_move(shot, 140, 128);
        assert!(res.is_ok());
    }

    /// Two rooms joined by a two-sided line with configurable far side.
    fn ledge(far_floor: i32, far_ceiling: i32, flags: LinedefFlags) -> Level {
        let mut b = LevelBuilder::new("LEDGE");
        let a = b.add_sector(Sector::new(0, 128, 160));
        let c = b.add_sector(Sector::new(far_floor, far_ceiling, 160));
        let v = [
            b.add_vertex(0, 0),
            b.add_vertex(0, 256),
            b.add_vertex(256, 256),
            b.add_vertex(256, 0),
            b.add_vertex(512, 256),
            b.add_vertex(512, 0),
        ];
        let l0 = b.add_wall(v[0], v[1], a);
        let l1 = b.add_wall(v[1], v[2], a);
        let l2 = b.add_portal(v[2], v[3], flags, a, c);
        let l3 = b.add_wall(v[3], v[0], a);
        let l4 = b.add_wall(v[2], v[4], c);
        let l5 = b.add_wall(v[4], v[5], c);
        let l6 = b.add_wall(v[5], v[3], c);
        let near = b.add_subsector(&[(l0, 0), (l1, 0), (l2, 0), (l3, 0)]);
        let far = b.add_subsector(&[(l4, 0), (l5, 0), (l6, 0), (l2, 1)]);
        b.add_node(
            (256, 0, 0, 256),
            [
                Aabb::from_units(256, 0, 256, 512),
                Aabb::from_units(256, 0, 0, 256),
            ],
            [NodeChild::Subsector(far), NodeChild::Subsector(near)],
        );
        b.build().unwrap()
    }

    #[test]
    fn step_too_high_is_refused() {
        let mut rig = Rig::new(ledge(32, 128, LinedefFlags::empty()));
        let e = rig.spawn("TROOP", 240, 128);
        let (_, res) = rig.try_move(e, 264, 128);
        assert_eq!(res.unwrap_err().reason, BlockReason::StepTooHigh);
    }

    #[test]
    fn low_gap_is_refused() {
        let mut rig = Rig::new(ledge(0, 40, LinedefFlags::empty()));
        let e = rig.spawn("TROOP", 240, 128);
        let (_, res) = rig.try_move(e, 244, 128);
        assert_eq!(res.unwrap_err().reason, BlockReason::NoRoom);
    }

    #[test]
    fn dropoff_needs_permission() {
        let mut rig = Rig::new(ledge(-64, 128, LinedefFlags::empty()));
        let troop = rig.spawn("TROOP", 228, 128);
        let (_, res) = rig.try_move(troop, 240, 128);
        assert_eq!(res.unwrap_err().reason, BlockReason::Dropoff);

        // players carry DROPOFF
        let player = rig.spawn("PLAYER", 228, 64);
        let (_, res) = rig.try_move(player, 244, 64);
        assert!(res.is_ok());

        // floaters do not care either
        let head = rig.spawn("HEAD", 200, 200);
        let (_, res) = rig.try_move(head, 232, 200);
        assert!(res.is_ok());
    }

    #[test]
    fn blocking_lines_stop_walkers_but_not_missiles() {
        let mut rig = Rig::new(ledge(0, 128, LinedefFlags::BLOCK_MONSTERS));
        let troop = rig.spawn("TROOP", 240, 128);
        let (_, res) = rig.try_move(troop, 264, 128);
        assert!(matches!(res.unwrap_err().reason, BlockReason::Line(_)));

        let shot = rig.spawn("TROOPSHOT", 240, 64);
        rig.world.get::<&mut Position>(shot).unwrap().z = units(32);
        let (_, res) = rig.try_move(shot, 264, 64);
        assert!(res.is_ok());
    }

    #[test]
    fn impassable_lines_stop_players_but_not_missiles() {
        let mut rig = Rig::new(ledge(0, 128, LinedefFlags::IMPASSABLE));
        let player = rig.spawn("PLAYER", 240, 128);
        let (m, res) = rig.try_move(player, 264, 128);
        assert!(matches!(res.unwrap_err().reason, BlockReason::Line(_)));
        assert_eq!(m.x, units(240));

        let shot = rig.spawn("TROOPSHOT", 240, 64);
        rig.world.get::<&mut Position>(shot).unwrap().z = units(32);
        let (m, res) = rig.try_move(shot, 264, 64);
        assert!(res.is_ok());
        assert_eq!(m.x, units(264));
    }

    #[test]
    fn box_crossing_ignores_touching_bounds() {
        let lvl = demo::two_rooms().unwrap();
        let line = &lvl.linedefs[demo::ROOM_A_WEST_WALL as usize];
        // box right edge exactly on x = 0
        let touching = Aabb::around(units(-16), units(128), units(16));
        assert!(!box_crosses_line(&lvl, &touching, line));
        let straddling = Aabb::around(units(8), units(128), units(16));
        assert!(box_crosses_line(&lvl, &straddling, line));
    }
}
