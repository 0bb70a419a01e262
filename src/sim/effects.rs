//! Deferred per-entity effects.
//!
//! The integrators never touch other entities' state directly. They return
//! an [`Effect`] which is parked in the entity's [`Latecall`] and applied by
//! the late pass once every thinker has run.

use hecs::{Entity, World};
use log::debug;

use super::components::{ActorFlags, Class, Latecall, RefCount, Velocity};
use super::mob::{damage_mobj, set_mobj_state};
use super::spacial::ThingGrid;
use crate::defs::MobjFlags;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Effect {
    #[default]
    None,
    /// Unlink from the world and wait to be reaped.
    Remove,
    /// Missile impact; `target` is the thing it hit, if any.
    Explode { target: Option<Entity> },
    /// Charging skull slammed into `target` (or a wall).
    Bash { target: Option<Entity> },
    /// Free once nothing targets this entity any more.
    Reap,
}

impl Effect {
    #[inline]
    pub fn is_none(self) -> bool {
        self == Effect::None
    }
}

/// What the late pass should do with its cursor after an effect ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Kept,
    /// The entity was despawned; drop it from the active list.
    Reaped,
}

/// Run the pending effect of `ent`, if any.
pub fn run_latecall(world: &mut World, grid: &mut ThingGrid, ent: Entity) -> Applied {
    let effect = match world.get::<&mut Latecall>(ent) {
        Ok(mut late) => std::mem::take(&mut late.0),
        Err(_) => return Applied::Reaped,
    };
    apply_effect(world, grid, ent, effect)
}

pub fn apply_effect(world: &mut World, grid: &mut ThingGrid, ent: Entity, effect: Effect) -> Applied {
    match effect {
        Effect::None => Applied::Kept,

        Effect::Remove => {
            super::mob::remove_mobj(world, grid, ent);
            Applied::Kept
        }

        Effect::Explode { target } => {
            if let Some(t) = target {
                let damage = class_damage(world, ent);
                damage_mobj(world, grid, t, damage);
            }
            explode_missile(world, grid, ent);
            Applied::Kept
        }

        Effect::Bash { target } => {
            if let Some(t) = target {
                let damage = class_damage(world, ent);
                damage_mobj(world, grid, t, damage);
            }
            if let Ok(mut f) = world.get::<&mut ActorFlags>(ent) {
                f.0.remove(MobjFlags::SKULLFLY);
            }
            if let Ok(mut v) = world.get::<&mut Velocity>(ent) {
                *v = Velocity::default();
            }
            let spawn = world.get::<&Class>(ent).map(|c| c.0.spawnstate);
            if let Ok(state) = spawn {
                set_mobj_state(world, grid, ent, state);
            }
            Applied::Kept
        }

        Effect::Reap => {
            let refs = world.get::<&RefCount>(ent).map(|r| r.0).unwrap_or(0);
            if refs > 0 {
                // still targeted by someone; try again next tic
                if let Ok(mut late) = world.get::<&mut Latecall>(ent) {
                    late.0 = Effect::Reap;
                }
                return Applied::Kept;
            }
            debug!("reaping {ent:?}");
            let _ = world.despawn(ent);
            Applied::Reaped
        }
    }
}

fn class_damage(world: &World, ent: Entity) -> i32 {
    world.get::<&Class>(ent).map(|c| c.0.damage).unwrap_or(0)
}

/// Stop a missile dead and play its death frames.
fn explode_missile(world: &mut World, grid: &mut ThingGrid, ent: Entity) {
    if let Ok(mut v) = world.get::<&mut Velocity>(ent) {
        *v = Velocity::default();
    }
    if let Ok(mut f) = world.get::<&mut ActorFlags>(ent) {
        f.0.remove(MobjFlags::MISSILE);
    }
    let death = world.get::<&Class>(ent).map(|c| c.0.deathstate);
    if let Ok(state) = death {
        debug!("{ent:?} explodes");
        set_mobj_state(world, grid, ent, state);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{State, by_id};
    use crate::sim::components::{Animation, Health};
    use crate::sim::mob::{SpawnZ, set_target, spawn_mobj};
    use crate::world::{demo, units};

    #[test]
    fn bash_hurts_the_victim_and_resets_the_skull() {
        let lvl = demo::two_rooms().unwrap();
        let mut world = World::new();
        let mut grid = ThingGrid::new(&lvl.blockmap);
        let skull = spawn_mobj(&mut world, &mut grid, &lvl, by_id("SKULL").unwrap(), units(64), units(128), SpawnZ::Floor);
        let victim = spawn_mobj(&mut world, &mut grid, &lvl, by_id("TROOP").unwrap(), units(120), units(128), SpawnZ::Floor);
        world.get::<&mut ActorFlags>(skull).unwrap().0.insert(MobjFlags::SKULLFLY);
        *world.get::<&mut Velocity>(skull).unwrap() = Velocity { x: units(20), y: 0, z: 0 };

        let applied = apply_effect(&mut world, &mut grid, skull, Effect::Bash { target: Some(victim) });
        assert_eq!(applied, Applied::Kept);
        assert_eq!(world.get::<&Health>(victim).unwrap().0, 60 - 3);
        assert!(!world.get::<&ActorFlags>(skull).unwrap().0.contains(MobjFlags::SKULLFLY));
        assert_eq!(*world.get::<&Velocity>(skull).unwrap(), Velocity::default());
        assert_eq!(world.get::<&Animation>(skull).unwrap().state, State::S_SKULL_STND);
    }

    #[test]
    fn reap_waits_for_the_last_reference() {
        let lvl = demo::two_rooms().unwrap();
        let mut world = World::new();
        let mut grid = ThingGrid::new(&lvl.blockmap);
        let prey = spawn_mobj(&mut world, &mut grid, &lvl, by_id("TROOP").unwrap(), units(64), units(128), SpawnZ::Floor);
        let hunter = spawn_mobj(&mut world, &mut grid, &lvl, by_id("TROOP").unwrap(), units(160), units(128), SpawnZ::Floor);
        set_target(&mut world, hunter, Some(prey));

        world.get::<&mut Latecall>(prey).unwrap().0 = Effect::Reap;
        assert_eq!(run_latecall(&mut world, &mut grid, prey), Applied::Kept);
        assert_eq!(world.get::<&Latecall>(prey).unwrap().0, Effect::Reap);

        set_target(&mut world, hunter, None);
        assert_eq!(run_latecall(&mut world, &mut grid, prey), Applied::Reaped);
        assert!(!world.contains(prey));
        // a stale handle reads as already gone
        assert_eq!(run_latecall(&mut world, &mut grid, prey), Applied::Reaped);
    }
}
