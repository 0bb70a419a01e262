//! spatial_query - run the spatial queries against the demo map.
//!
//! USAGE:
//! ```bash
//! RUST_LOG=trace cargo run -- trymove --from 240,128 --to 264,128
//! cargo run -- sight --looker 64,128 --target 400,40
//! cargo run -- cull --at 64,128 --angle 0 --width 320
//! cargo run -- run --tics 70
//! ```

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::info;

use yadoom_spatial::{
    defs::{self, MobjInfo},
    engine::{CullConfig, VisibilityCuller},
    sim::{Health, Position, SIM_FPS, SpawnZ, TicRunner, Velocity},
    world::{Camera, Level, demo, fixed::to_units, units},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Use the single closed room instead of the two-room map
    #[arg(long)]
    single_room: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Spawn a thing and try one move
    Trymove {
        #[arg(long, default_value = "TROOP")]
        thing: String,
        #[arg(long, value_parser = parse_point, default_value = "240,128")]
        from: (i32, i32),
        #[arg(long, value_parser = parse_point, default_value = "264,128")]
        to: (i32, i32),
    },
    /// Line of sight between two things
    Sight {
        #[arg(long, value_parser = parse_point, default_value = "64,128")]
        looker: (i32, i32),
        #[arg(long, value_parser = parse_point, default_value = "400,128")]
        target: (i32, i32),
    },
    /// Visible segs and subsectors from a camera
    Cull {
        #[arg(long, value_parser = parse_point, default_value = "64,128")]
        at: (i32, i32),
        /// Heading in degrees, 0 = east, counter-clockwise
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        angle: f64,
        #[arg(long, default_value_t = 160)]
        width: usize,
        /// Extra frames, each 16 units further forward
        #[arg(long, default_value_t = 0)]
        frames: u32,
    },
    /// Fire an imp ball at a marine and step the simulation
    Run {
        #[arg(long, default_value_t = 2 * SIM_FPS)]
        tics: u32,
    },
}

/// `"x,y"` in map units.
fn parse_point(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("{x:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("{y:?}: {e}"))?;
    Ok((x, y))
}

fn info(id: &str) -> Result<&'static MobjInfo> {
    defs::by_id(id).ok_or_else(|| anyhow!("unknown thing {id:?}"))
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let level = if opts.single_room {
        demo::single_room()
    } else {
        demo::two_rooms()
    }
    .context("building demo level")?;
    info!(
        "level {}: {} lines, {} subsectors, {} nodes",
        level.name,
        level.linedefs.len(),
        level.subsectors.len(),
        level.nodes.len()
    );

    match opts.cmd {
        Cmd::Trymove { thing, from, to } => trymove(&level, &thing, from, to),
        Cmd::Sight { looker, target } => sight(&level, looker, target),
        Cmd::Cull {
            at,
            angle,
            width,
            frames,
        } => cull(&level, at, angle, width, frames),
        Cmd::Run { tics } => run(&level, tics),
    }
}

fn trymove(level: &Level, thing: &str, from: (i32, i32), to: (i32, i32)) -> Result<()> {
    let mut sim = TicRunner::new(level);
    let ent = sim.spawn_mobj(level, info(thing)?, units(from.0), units(from.1), SpawnZ::Floor);

    let res = sim
        .try_move(level, ent, units(to.0), units(to.1))
        .context("spawned thing has no body")?;
    let pos = *sim.world().get::<&Position>(ent)?;
    match res {
        Ok(()) => println!(
            "{thing} moved to ({}, {}), floor {}",
            to_units(pos.x),
            to_units(pos.y),
            to_units(level.sector_at(pos.x, pos.y).floor_h)
        ),
        Err(blocked) => println!(
            "{thing} blocked by {:?}, still at ({}, {})",
            blocked.reason,
            to_units(pos.x),
            to_units(pos.y)
        ),
    }
    Ok(())
}

fn sight(level: &Level, looker: (i32, i32), target: (i32, i32)) -> Result<()> {
    let mut sim = TicRunner::new(level);
    let a = sim.spawn_mobj(level, info("POSSESSED")?, units(looker.0), units(looker.1), SpawnZ::Floor);
    let b = sim.spawn_mobj(level, info("PLAYER")?, units(target.0), units(target.1), SpawnZ::Floor);

    let visible = sim.check_sight(level, a, b);
    println!(
        "{:?} -> {:?}: {} ({} nodes)",
        looker,
        target,
        if visible { "visible" } else { "blocked" },
        sim.sight().nodes_visited
    );
    Ok(())
}

fn cull(level: &Level, at: (i32, i32), angle: f64, width: usize, frames: u32) -> Result<()> {
    let mut culler = VisibilityCuller::new(CullConfig {
        screen_width: width,
        ..CullConfig::default()
    })?;
    let mut cam = Camera::at_units(at.0, at.1, angle);

    for frame in 0..=frames {
        if frame > 0 {
            cam.step(units(16), 0);
        }
        let out = culler.render_bsp(level, &cam)?;
        println!(
            "frame {frame} at ({}, {}): subsectors {:?}",
            to_units(cam.x),
            to_units(cam.y),
            out.subsectors
        );
        for w in &out.walls {
            let seg = &level.segs[w.seg as usize];
            println!(
                "  seg {:3} (line {:3}) columns {:4}..={:<4} {}",
                w.seg,
                seg.linedef,
                w.start,
                w.stop,
                if seg.back_sector.is_some() { "pass" } else { "solid" }
            );
        }
        println!("  nodes visited: {}", culler.stats().nodes_visited);
    }
    Ok(())
}

fn run(level: &Level, tics: u32) -> Result<()> {
    let mut sim = TicRunner::new(level);
    let imp = sim.spawn_mobj(level, info("TROOP")?, units(64), units(128), SpawnZ::Floor);
    let marine = sim.spawn_mobj(level, info("POSSESSED")?, units(200), units(128), SpawnZ::Floor);
    let ball = sim.spawn_mobj(level, info("TROOPSHOT")?, units(90), units(128), SpawnZ::At(units(32)));
    sim.set_target(ball, Some(imp));
    sim.set_target(imp, Some(marine));
    let speed = info("TROOPSHOT")?.speed;
    sim.set_velocity(ball, Velocity { x: speed, y: 0, z: 0 });

    for _ in 0..tics {
        sim.tick(level);
    }

    println!(
        "{} tics ({:.2}s), {} things active",
        sim.gametic(),
        sim.gametic() as f64 / SIM_FPS as f64,
        sim.active().len()
    );
    for &ent in sim.active() {
        let pos = *sim.world().get::<&Position>(ent)?;
        let hp = sim.world().get::<&Health>(ent)?.0;
        println!(
            "  {ent:?} at ({}, {}, {}) health {hp}",
            to_units(pos.x),
            to_units(pos.y),
            to_units(pos.z)
        );
    }
    Ok(())
}
