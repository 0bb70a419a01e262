pub mod flags;
pub mod mobjinfo;
pub mod state;
pub mod states;

pub use self::{
    flags::MobjFlags,
    mobjinfo::{MOBJINFO, MobjInfo, MobjType},
    state::State,
    states::{STATES, StateInfo},
};

use once_cell::sync::Lazy;
use std::collections::HashMap;

static BY_ID: Lazy<HashMap<&'static str, &'static MobjInfo>> =
    Lazy::new(|| MOBJINFO.iter().map(|info| (info.id, info)).collect());

pub fn by_id(id: &str) -> Option<&'static MobjInfo> {
    BY_ID.get(id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_agree() {
        let troop = by_id("TROOP").unwrap();
        assert_eq!(troop.kind, MobjType::Troop);
        assert_eq!(troop.doomednum, 3001);
        assert!(by_id("CYBORG").is_none());
    }

    #[test]
    fn every_species_has_an_entry() {
        for kind in [
            MobjType::Player,
            MobjType::Possessed,
            MobjType::Troop,
            MobjType::TroopShot,
            MobjType::Skull,
            MobjType::Head,
            MobjType::Barrel,
        ] {
            assert_eq!(MOBJINFO.iter().filter(|info| info.kind == kind).count(), 1);
        }
    }
}
