use hecs::Entity;

use crate::defs::{MobjFlags, MobjInfo, State};
use crate::world::{Fixed, SubsectorId};

use super::effects::Effect;

/// World-space position.  z is separate to match Doom's 2½-D maths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}

/// Momentum per tic, fixed-point on all three axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Velocity {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}

impl Velocity {
    #[inline]
    pub fn zero_xy(&mut self) {
        self.x = 0;
        self.y = 0;
    }
}

/// Collision cylinder. Starts as the class size; a corpse shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub radius: Fixed,
    pub height: Fixed,
}

/// Floor and ceiling heights last accepted by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub floor_z: Fixed,
    pub ceiling_z: Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subsector(pub SubsectorId);

#[derive(Debug, Copy, Clone)]
pub struct Class(pub &'static MobjInfo);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub state: State,
    pub tics: i32,
}

impl Animation {
    pub fn enter(state: State) -> Self {
        Self {
            state,
            tics: state.tics(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorFlags(pub MobjFlags);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Health(pub i32);

/// Entity this one chases / shot at. Counted in the target's [`RefCount`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Target(pub Option<Entity>);

/// Number of [`Target`] links pointing at this entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefCount(pub u32);

/// Effect scheduled during the mobj pass, applied in the late pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Latecall(pub Effect);

/// Marks the player body: the mobj pass leaves it to player code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Player;
