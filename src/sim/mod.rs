mod collision;
mod components;
mod config;
mod effects;
mod mob;
mod sight;
mod spacial;
mod tic;
mod xy_movement;
mod z_movement;

pub use collision::{
    BlockReason, Blocked, MoveCtx, Mover, PositionCheck, box_crosses_line, check_position,
    try_move,
};
pub use components::{
    ActorFlags, Animation, Body, Bounds, Class, Health, Latecall, Player, Position, RefCount,
    Subsector, Target, Velocity,
};
pub use config::SimConfig;
pub use effects::{Applied, Effect, apply_effect, run_latecall};
pub use mob::{SpawnZ, damage_mobj, kill_mobj, remove_mobj, set_mobj_state, set_target, spawn_mobj};
pub use sight::{SightActor, SightCaster, check_sights};
pub use spacial::ThingGrid;
pub use tic::{SIM_FPS, TicRunner};
pub use xy_movement::xy_movement;
pub use z_movement::z_movement;
