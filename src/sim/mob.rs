use hecs::{Entity, World};
use log::debug;

use super::components::*;
use super::effects::Effect;
use super::spacial::ThingGrid;
use crate::defs::{MobjFlags, MobjInfo, MobjType, State};
use crate::world::{Fixed, Level};

/// Where a freshly spawned thing's feet go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnZ {
    Floor,
    /// Hang from the ceiling (top of the body touches it).
    Ceiling,
    At(Fixed),
}

pub fn spawn_mobj(
    world: &mut World,
    grid: &mut ThingGrid,
    level: &Level,
    info: &'static MobjInfo,
    x: Fixed,
    y: Fixed,
    z: SpawnZ,
) -> Entity {
    let ss = level.locate_subsector(x, y);
    let sector = level.subsector_sector(ss);
    let z = match z {
        SpawnZ::Floor => sector.floor_h,
        SpawnZ::Ceiling => sector.ceil_h - info.height,
        SpawnZ::At(z) => z,
    };

    let ent = world.spawn((
        Position { x, y, z },
        Velocity::default(),
        Body {
            radius: info.radius,
            height: info.height,
        },
        Bounds {
            floor_z: sector.floor_h,
            ceiling_z: sector.ceil_h,
        },
        Subsector(ss),
        Class(info),
        Animation::enter(info.spawnstate),
        ActorFlags(info.flags),
        Health(info.spawnhealth),
        Target(None),
        RefCount(0),
        Latecall::default(),
    ));
    if info.kind == MobjType::Player {
        let _ = world.insert_one(ent, Player);
    }

    if !info.flags.contains(MobjFlags::NOBLOCKMAP) {
        grid.insert(ent, x, y);
    }
    debug!("spawned {} as {ent:?} in subsector {ss}", info.id);
    ent
}

/// Point `holder` at `target`, keeping reference counts balanced.
///
/// A target that no longer exists is stored as `None`.
pub fn set_target(world: &mut World, holder: Entity, target: Option<Entity>) {
    let old = match world.get::<&Target>(holder) {
        Ok(t) => t.0,
        Err(_) => return,
    };
    if old == target {
        return;
    }
    if let Some(o) = old {
        if let Ok(mut rc) = world.get::<&mut RefCount>(o) {
            rc.0 = rc.0.saturating_sub(1);
        }
    }
    let mut new = None;
    if let Some(n) = target {
        if let Ok(mut rc) = world.get::<&mut RefCount>(n) {
            rc.0 += 1;
            new = Some(n);
        }
    }
    if let Ok(mut t) = world.get::<&mut Target>(holder) {
        t.0 = new;
    }
}

/// Take `ent` out of play. The entity itself is freed by a later
/// [`Effect::Reap`] once nothing targets it.
pub fn remove_mobj(world: &mut World, grid: &mut ThingGrid, ent: Entity) {
    let linked = match world.query_one_mut::<(&Position, &ActorFlags)>(ent) {
        Ok((p, f)) => (!f.0.contains(MobjFlags::NOBLOCKMAP)).then_some((p.x, p.y)),
        Err(_) => return,
    };
    if let Some((x, y)) = linked {
        grid.remove(ent, x, y);
    }
    // an unlinked thing must never be relinked by a stray move
    if let Ok(mut f) = world.get::<&mut ActorFlags>(ent) {
        f.0.insert(MobjFlags::NOBLOCKMAP);
    }
    set_target(world, ent, None);
    if let Ok(mut late) = world.get::<&mut Latecall>(ent) {
        late.0 = Effect::Reap;
    }
    debug!("removed {ent:?}");
}

/// Enter `state`. Returns `false` when the state chain ended and the
/// thing was removed.
pub fn set_mobj_state(world: &mut World, grid: &mut ThingGrid, ent: Entity, state: State) -> bool {
    if state == State::S_NULL {
        remove_mobj(world, grid, ent);
        return false;
    }
    if let Ok(mut anim) = world.get::<&mut Animation>(ent) {
        *anim = Animation::enter(state);
    }
    true
}

/// Hurt `target`. Things that are not shootable, or are already being
/// removed, shrug it off. Returns `true` if the hit killed it.
pub fn damage_mobj(world: &mut World, grid: &mut ThingGrid, target: Entity, damage: i32) -> bool {
    let Ok((flags, health, late)) =
        world.query_one_mut::<(&ActorFlags, &mut Health, &Latecall)>(target)
    else {
        return false;
    };
    if !flags.0.contains(MobjFlags::SHOOTABLE) || late.0 == Effect::Reap {
        return false;
    }
    health.0 -= damage;
    let dead = health.0 <= 0;
    debug!("{target:?} takes {damage}, health {}", health.0);
    if dead {
        kill_mobj(world, grid, target);
    }
    dead
}

/// Turn a living thing into a corpse.
pub fn kill_mobj(world: &mut World, grid: &mut ThingGrid, ent: Entity) {
    let Ok((flags, body, class)) = world.query_one_mut::<(&mut ActorFlags, &mut Body, &Class)>(ent)
    else {
        return;
    };
    flags.0.remove(
        MobjFlags::SHOOTABLE | MobjFlags::FLOAT | MobjFlags::SKULLFLY | MobjFlags::SOLID,
    );
    // lost souls keep floating as they burst
    if class.0.kind != MobjType::Skull {
        flags.0.remove(MobjFlags::NOGRAVITY);
    }
    flags.0.insert(MobjFlags::CORPSE | MobjFlags::DROPOFF);
    body.height >>= 2;
    let death = class.0.deathstate;
    debug!("{ent:?} ({}) dies", class.0.id);
    set_mobj_state(world, grid, ent, death);
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
