//! Vertical integrator: floating, gravity, floor and ceiling clipping.

use super::collision::Mover;
use super::components::{Position, Velocity};
use super::config::SimConfig;
use super::effects::Effect;
use crate::defs::MobjFlags;
use crate::world::fixed::approx_distance;

/// Drift a floater toward its target's altitude.
fn float_change(mover: &mut Mover, target: &Position, config: &SimConfig) {
    let delta = (target.z + (mover.height >> 1)) - mover.z;
    let dist = approx_distance(target.x - mover.x, target.y - mover.y);
    let delta = delta.saturating_mul(3);

    if delta < 0 {
        if dist < -delta {
            mover.z -= config.float_speed;
        }
    } else if dist < delta {
        mover.z += config.float_speed;
    }
}

/// One tic of vertical motion. `target` is where the mover's target stands,
/// if it has one.
pub fn z_movement(
    mover: &mut Mover,
    vel: &mut Velocity,
    target: Option<&Position>,
    config: &SimConfig,
) -> Effect {
    let mut effect = Effect::None;
    mover.z += vel.z;

    if let Some(t) = target.filter(|_| mover.flags.contains(MobjFlags::FLOAT)) {
        float_change(mover, t, config);
    }

    if mover.z <= mover.floor_z {
        if vel.z < 0 {
            vel.z = 0;
        }
        mover.z = mover.floor_z;
        if mover.is_missile() {
            return Effect::Explode { target: None };
        }
    } else if !mover.flags.contains(MobjFlags::NOGRAVITY) {
        // first falling tic pulls twice as hard
        if vel.z == 0 {
            vel.z = -config.gravity * 2;
        } else {
            vel.z -= config.gravity;
        }
    }

    if mover.z + mover.height > mover.ceiling_z {
        if vel.z > 0 {
            vel.z = 0;
        }
        mover.z = mover.ceiling_z - mover.height;
        if mover.is_missile() {
            effect = Effect::Explode { target: None };
        }
    }
    effect
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
