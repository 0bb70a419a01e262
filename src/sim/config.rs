use crate::world::{Fixed, units};

/// Movement constants. Defaults are the console engine's values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Largest per-axis sub-step a single `try_move` may take.
    pub max_move: Fixed,
    /// Largest radius of any thing; widens the thing-grid search.
    pub max_radius: Fixed,
    /// Highest step a walker climbs and deepest drop it walks off.
    pub max_step: Fixed,
    pub gravity: Fixed,
    pub float_speed: Fixed,
    pub stop_speed: Fixed,
    pub friction: Fixed,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_move: units(16),
            max_radius: units(32),
            max_step: units(24),
            gravity: units(4),
            float_speed: units(8),
            stop_speed: 0x1000,
            friction: 0xd240,
        }
    }
}
