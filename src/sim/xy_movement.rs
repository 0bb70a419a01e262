//! Doom-style XY movement for the *hecs* ECS.
//!
//! Momentum is split into equal sub-steps no longer than `max_move` on
//! either axis; each sub-step goes through [`try_move`]. Anything that has
//! to touch other entities (bashing, exploding, removal) comes back as an
//! [`Effect`] for the late pass.

use log::trace;

use super::collision::{MoveCtx, Mover, try_move};
use super::components::Velocity;
use super::effects::Effect;
use crate::defs::MobjFlags;
use crate::world::{Fixed, SKY_FLAT};

/// Sub-step size and count for one tic of momentum. No momentum, no steps.
fn split_move(mx: Fixed, my: Fixed, max_move: Fixed) -> (Fixed, Fixed, u32) {
    if mx == 0 && my == 0 {
        return (0, 0, 0);
    }
    let (mut xuse, mut yuse) = (mx, my);
    let mut steps = 1u32;
    while xuse > max_move || xuse < -max_move || yuse > max_move || yuse < -max_move {
        xuse >>= 1;
        yuse >>= 1;
        steps <<= 1;
    }
    (xuse, yuse, steps)
}

/// Apply one tic of horizontal momentum to `mover`.
pub fn xy_movement(ctx: &mut MoveCtx, mover: &mut Mover, vel: &mut Velocity) -> Effect {
    // the low bits never move anything and would break the even split
    let mx = vel.x & !7;
    let my = vel.y & !7;
    let (xuse, yuse, steps) = split_move(mx, my, ctx.config.max_move);

    for _ in 0..steps {
        let (tx, ty) = (mover.x + xuse, mover.y + yuse);
        let Err(blocked) = try_move(ctx, mover, tx, ty) else {
            continue;
        };

        if mover.flags.contains(MobjFlags::SKULLFLY) {
            return Effect::Bash {
                target: blocked.hit,
            };
        }

        if mover.is_missile() {
            // shot into the sky: vanish without a blast
            let sky = blocked
                .ceiling_line
                .and_then(|id| ctx.level.linedefs[id as usize].back_sector)
                .is_some_and(|s| ctx.level.sectors[s as usize].ceil_tex == SKY_FLAT);
            if sky {
                trace!("{:?} left through the sky", mover.ent);
                return Effect::Remove;
            }
            return Effect::Explode {
                target: blocked.hit,
            };
        }

        vel.zero_xy();
        return Effect::None;
    }

    apply_friction(ctx, mover, vel);
    Effect::None
}

fn apply_friction(ctx: &MoveCtx, mover: &Mover, vel: &mut Velocity) {
    if mover.flags.intersects(MobjFlags::MISSILE | MobjFlags::SKULLFLY) {
        return;
    }
    if mover.z > mover.floor_z {
        return; // airborne
    }
    if mover.flags.contains(MobjFlags::CORPSE)
        && mover.floor_z != ctx.level.subsector_sector(mover.subsector).floor_h
    {
        return; // corpse still sliding off a ledge
    }

    let stop = ctx.config.stop_speed;
    if vel.x > -stop && vel.x < stop && vel.y > -stop && vel.y < stop {
        vel.zero_xy();
    } else {
        let f = ctx.config.friction >> 8;
        vel.x = (vel.x >> 8) * f;
        vel.y = (vel.y >> 8) * f;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
