//! Hand-built demonstration maps used by the query binary and the tests.
//!
//! ```text
//!  y
//! 256  v1 ───────── L1 ───────── v2 ───────── L6 ───────── v6
//!       │                         │ L2 / L10                 │
//!       │                        v3                          │
//!       L0       room A           ┆ L3 doorway    room B     L7
//!       │     floor 0            v4               floor 16   │
//!       │                         │ L4 / L9                  │
//!   0  v0 ───────── L5 ───────── v5 ───────── L8 ───────── v7
//!       0                        256                        512  x
//! ```
//!
//! One node splits the map along `x = 256`. The doorway spans
//! `96 ≤ y ≤ 160`; everywhere else the rooms are separated by back-to-back
//! one-sided walls.

use super::builder::{LevelBuilder, LevelError};
use super::geometry::*;

pub const ROOM_A_SUBSECTOR: SubsectorId = 0;
pub const ROOM_B_SUBSECTOR: SubsectorId = 1;

pub const ROOM_A_SECTOR: SectorId = 0;
pub const ROOM_B_SECTOR: SectorId = 1;

/// Floor of room B in map units.
pub const ROOM_B_FLOOR: i32 = 16;
pub const CEILING: i32 = 128;

pub const ROOM_A_WEST_WALL: LinedefId = 0;
pub const DOORWAY: LinedefId = 3;
/// Lower half of the wall between the rooms, as seen from room A.
pub const DIVIDER_SOUTH: LinedefId = 4;
pub const ROOM_B_EAST_WALL: LinedefId = 7;

/// The two-room map drawn above.
pub fn two_rooms() -> Result<Level, LevelError> {
    let mut b = LevelBuilder::new("TWOROOMS");

    let a = b.add_sector(Sector::new(0, CEILING, 160));
    let bb = b.add_sector(Sector::new(ROOM_B_FLOOR, CEILING, 160));

    let v0 = b.add_vertex(0, 0);
    let v1 = b.add_vertex(0, 256);
    let v2 = b.add_vertex(256, 256);
    let v3 = b.add_vertex(256, 160);
    let v4 = b.add_vertex(256, 96);
    let v5 = b.add_vertex(256, 0);
    let v6 = b.add_vertex(512, 256);
    let v7 = b.add_vertex(512, 0);

    // room A, clockwise so the right-hand side faces inwards
    let l0 = b.add_wall(v0, v1, a);
    let l1 = b.add_wall(v1, v2, a);
    let l2 = b.add_wall(v2, v3, a);
    let l3 = b.add_portal(v3, v4, LinedefFlags::empty(), a, bb);
    let l4 = b.add_wall(v4, v5, a);
    let l5 = b.add_wall(v5, v0, a);

    // room B
    let l6 = b.add_wall(v2, v6, bb);
    let l7 = b.add_wall(v6, v7, bb);
    let l8 = b.add_wall(v7, v5, bb);
    let l9 = b.add_wall(v5, v4, bb);
    let l10 = b.add_wall(v3, v2, bb);

    let ss_a = b.add_subsector(&[(l0, 0), (l1, 0), (l2, 0), (l3, 0), (l4, 0), (l5, 0)]);
    let ss_b = b.add_subsector(&[(l6, 0), (l7, 0), (l8, 0), (l9, 0), (l3, 1), (l10, 0)]);

    b.add_node(
        (256, 0, 0, 256),
        [
            Aabb::from_units(256, 0, 256, 512),
            Aabb::from_units(256, 0, 0, 256),
        ],
        [NodeChild::Subsector(ss_b), NodeChild::Subsector(ss_a)],
    );

    b.build()
}

/// A closed 256×256 box: one sector, one subsector, no nodes.
pub fn single_room() -> Result<Level, LevelError> {
    let mut b = LevelBuilder::new("BOX");
    let s = b.add_sector(Sector::new(0, CEILING, 200));
    let v0 = b.add_vertex(0, 0);
    let v1 = b.add_vertex(0, 256);
    let v2 = b.add_vertex(256, 256);
    let v3 = b.add_vertex(256, 0);
    let walls = [
        b.add_wall(v0, v1, s),
        b.add_wall(v1, v2, s),
        b.add_wall(v2, v3, s),
        b.add_wall(v3, v0, s),
    ];
    b.add_subsector(&walls.map(|l| (l, 0)));
    b.build()
}
