use crate::defs::flags::MobjFlags as MF;
use crate::defs::state::State;
use crate::world::fixed::{FRACUNIT, Fixed};

/// Species tag; lets a missile recognise its shooter's kin.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MobjType {
    Player,
    Possessed,
    Troop,
    TroopShot,
    Skull,
    Head,
    Barrel,
}

#[derive(Debug, Clone)]
pub struct MobjInfo {
    pub id: &'static str,
    pub kind: MobjType,
    pub doomednum: i32,
    /* state chain */
    pub spawnstate: State,
    pub spawnhealth: i32,
    pub deathstate: State,
    /* physics & damage */
    pub speed: Fixed,
    pub radius: Fixed,
    pub height: Fixed,
    pub damage: i32,
    pub flags: MF,
}

const U: Fixed = FRACUNIT;

const fn flags(bits: u32) -> MF {
    MF::from_bits_truncate(bits)
}

pub const MOBJINFO: &[MobjInfo] = &[
    MobjInfo {
        id: "PLAYER",
        kind: MobjType::Player,
        doomednum: -1,
        spawnstate: State::S_PLAY,
        spawnhealth: 100,
        deathstate: State::S_PLAY_DIE1,
        speed: 0,
        radius: 16 * U,
        height: 56 * U,
        damage: 0,
        flags: flags(MF::SOLID.bits() | MF::SHOOTABLE.bits() | MF::DROPOFF.bits()),
    },
    MobjInfo {
        id: "POSSESSED",
        kind: MobjType::Possessed,
        doomednum: 3004,
        spawnstate: State::S_POSS_STND,
        spawnhealth: 20,
        deathstate: State::S_POSS_DIE1,
        speed: 8 * U,
        radius: 20 * U,
        height: 56 * U,
        damage: 0,
        flags: flags(MF::SOLID.bits() | MF::SHOOTABLE.bits() | MF::COUNTKILL.bits()),
    },
    MobjInfo {
        id: "TROOP",
        kind: MobjType::Troop,
        doomednum: 3001,
        spawnstate: State::S_TROO_STND,
        spawnhealth: 60,
        deathstate: State::S_TROO_DIE1,
        speed: 8 * U,
        radius: 20 * U,
        height: 56 * U,
        damage: 0,
        flags: flags(MF::SOLID.bits() | MF::SHOOTABLE.bits() | MF::COUNTKILL.bits()),
    },
    MobjInfo {
        id: "TROOPSHOT",
        kind: MobjType::TroopShot,
        doomednum: -1,
        spawnstate: State::S_TBALL1,
        spawnhealth: 1000,
        deathstate: State::S_TBALLX1,
        speed: 10 * U,
        radius: 6 * U,
        height: 8 * U,
        damage: 3,
        flags: flags(
            MF::NOBLOCKMAP.bits() | MF::MISSILE.bits() | MF::DROPOFF.bits() | MF::NOGRAVITY.bits(),
        ),
    },
    MobjInfo {
        id: "SKULL",
        kind: MobjType::Skull,
        doomednum: 3006,
        spawnstate: State::S_SKULL_STND,
        spawnhealth: 100,
        deathstate: State::S_SKULL_DIE1,
        speed: 8 * U,
        radius: 16 * U,
        height: 56 * U,
        damage: 3,
        flags: flags(
            MF::SOLID.bits()
                | MF::SHOOTABLE.bits()
                | MF::FLOAT.bits()
                | MF::NOGRAVITY.bits()
                | MF::COUNTKILL.bits(),
        ),
    },
    MobjInfo {
        id: "HEAD",
        kind: MobjType::Head,
        doomednum: 3005,
        spawnstate: State::S_HEAD_STND,
        spawnhealth: 400,
        deathstate: State::S_HEAD_DIE1,
        speed: 8 * U,
        radius: 31 * U,
        height: 56 * U,
        damage: 0,
        flags: flags(
            MF::SOLID.bits()
                | MF::SHOOTABLE.bits()
                | MF::FLOAT.bits()
                | MF::NOGRAVITY.bits()
                | MF::COUNTKILL.bits(),
        ),
    },
    MobjInfo {
        id: "BARREL",
        kind: MobjType::Barrel,
        doomednum: 2035,
        spawnstate: State::S_BAR1,
        spawnhealth: 20,
        deathstate: State::S_BEXP,
        speed: 0,
        radius: 10 * U,
        height: 42 * U,
        damage: 0,
        flags: flags(MF::SOLID.bits() | MF::SHOOTABLE.bits()),
    },
];
