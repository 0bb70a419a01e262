use hecs::{Entity, World};
use log::debug;

use super::collision::{Blocked, MoveCtx, Mover, try_move};
use super::components::{Animation, Latecall, Player, Position, Velocity};
use super::config::SimConfig;
use super::effects::{Applied, Effect, run_latecall};
use super::mob::{self, SpawnZ};
use super::sight::{SightActor, SightCaster, check_sights};
use super::spacial::ThingGrid;
use super::xy_movement::xy_movement;
use super::z_movement::z_movement;
use crate::defs::{MobjInfo, State};
use crate::world::{Fixed, Level, LineMarks};

pub const SIM_FPS: u32 = 35;

/// Owns the ECS world and drives all game‑logic systems.
///
/// `active` is the thinker list: spawn order, walked front to back every
/// tic. Entities leave it only when the late pass reaps them.
pub struct TicRunner {
    world: World,
    grid: ThingGrid,
    marks: LineMarks,
    sight: SightCaster,
    active: Vec<Entity>,
    config: SimConfig,
    gametic: u64,
}

impl TicRunner {
    pub fn new(level: &Level) -> Self {
        Self::with_config(level, SimConfig::default())
    }

    pub fn with_config(level: &Level, config: SimConfig) -> Self {
        Self {
            world: World::new(),
            grid: ThingGrid::new(&level.blockmap),
            marks: LineMarks::new(level.linedefs.len()),
            sight: SightCaster::new(level),
            active: Vec::new(),
            config,
            gametic: 0,
        }
    }

    #[inline]
    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn grid(&self) -> &ThingGrid {
        &self.grid
    }

    /// Thinkers in run order.
    pub fn active(&self) -> &[Entity] {
        &self.active
    }

    pub fn gametic(&self) -> u64 {
        self.gametic
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Spawn a monster/item entity and return its `Entity` handle.
    pub fn spawn_mobj(
        &mut self,
        level: &Level,
        info: &'static MobjInfo,
        x: Fixed,
        y: Fixed,
        z: SpawnZ,
    ) -> Entity {
        let ent = mob::spawn_mobj(&mut self.world, &mut self.grid, level, info, x, y, z);
        self.active.push(ent);
        ent
    }

    pub fn set_target(&mut self, holder: Entity, target: Option<Entity>) {
        mob::set_target(&mut self.world, holder, target);
    }

    pub fn set_velocity(&mut self, ent: Entity, vel: Velocity) {
        if let Ok(mut v) = self.world.get::<&mut Velocity>(ent) {
            *v = vel;
        }
    }

    /// Take `ent` out of play; it is freed once nothing targets it.
    pub fn remove_mobj(&mut self, ent: Entity) {
        mob::remove_mobj(&mut self.world, &mut self.grid, ent);
    }

    /// One-off move outside the tic loop. `None` if `ent` is not a mobj.
    pub fn try_move(
        &mut self,
        level: &Level,
        ent: Entity,
        x: Fixed,
        y: Fixed,
    ) -> Option<Result<(), Blocked>> {
        let mut mover = Mover::load(&self.world, ent)?;
        let mut ctx = MoveCtx {
            level,
            world: &self.world,
            grid: &mut self.grid,
            marks: &mut self.marks,
            config: &self.config,
        };
        let res = try_move(&mut ctx, &mut mover, x, y);
        mover.store(&mut self.world);
        Some(res)
    }

    /// Can `looker` see `target` right now?
    pub fn check_sight(&mut self, level: &Level, looker: Entity, target: Entity) -> bool {
        match (
            SightActor::of(&self.world, level, looker),
            SightActor::of(&self.world, level, target),
        ) {
            (Some(a), Some(b)) => self.sight.check_sight(level, &a, &b),
            _ => false,
        }
    }

    pub fn sight(&self) -> &SightCaster {
        &self.sight
    }

    /* ---------------------------------------------------------------- */
    /* internal: run one fixed‑rate game tic                             */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self, level: &Level) {
        self.gametic += 1;
        check_sights(&mut self.world, level, &mut self.sight, &self.active);
        self.run_mobjs(level);
        self.run_late();
    }

    fn run_mobjs(&mut self, level: &Level) {
        for i in 0..self.active.len() {
            let ent = self.active[i];
            let pending = match self.world.get::<&Latecall>(ent) {
                Ok(late) => late.0,
                Err(_) => continue,
            };
            if pending == Effect::Reap || self.world.get::<&Player>(ent).is_ok() {
                continue;
            }
            let effect = self.think(level, ent);
            if let Ok(mut late) = self.world.get::<&mut Latecall>(ent) {
                late.0 = effect;
            }
        }
    }

    /// Integrate, then cycle the animation. Any effect from integration
    /// suppresses the rest of the step.
    fn think(&mut self, level: &Level, ent: Entity) -> Effect {
        let Some(mut mover) = Mover::load(&self.world, ent) else {
            return Effect::None;
        };
        let mut vel = match self.world.get::<&Velocity>(ent) {
            Ok(v) => *v,
            Err(_) => return Effect::None,
        };

        let mut effect = Effect::None;
        if vel.x != 0 || vel.y != 0 {
            let mut ctx = MoveCtx {
                level,
                world: &self.world,
                grid: &mut self.grid,
                marks: &mut self.marks,
                config: &self.config,
            };
            effect = xy_movement(&mut ctx, &mut mover, &mut vel);
        }

        if effect.is_none() && (mover.z != mover.floor_z || vel.z != 0) {
            let target_pos = mover
                .target
                .and_then(|t| self.world.get::<&Position>(t).ok().map(|p| *p));
            effect = z_movement(&mut mover, &mut vel, target_pos.as_ref(), &self.config);
        }

        mover.store(&mut self.world);
        self.set_velocity(ent, vel);

        if effect.is_none() {
            effect = self.advance_state(ent);
        }
        effect
    }

    fn advance_state(&mut self, ent: Entity) -> Effect {
        let Ok(mut anim) = self.world.get::<&mut Animation>(ent) else {
            return Effect::None;
        };
        if anim.tics == -1 {
            return Effect::None;
        }
        anim.tics -= 1;
        if anim.tics != 0 {
            return Effect::None;
        }
        match anim.state.next() {
            State::S_NULL => Effect::Remove,
            next => {
                *anim = Animation::enter(next);
                Effect::None
            }
        }
    }

    /// Apply pending effects in list order. Reaped entities are dropped
    /// from the list without advancing the cursor.
    fn run_late(&mut self) {
        let mut i = 0;
        while i < self.active.len() {
            let ent = self.active[i];
            match run_latecall(&mut self.world, &mut self.grid, ent) {
                Applied::Reaped => {
                    self.active.remove(i);
                }
                Applied::Kept => i += 1,
            }
        }
        debug!("tic {} done, {} thinkers", self.gametic, self.active.len());
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
