use super::state::State;

#[derive(Debug, Copy, Clone)]
pub struct StateInfo {
    pub state: State,
    pub sprite: &'static str,
    pub frame: u8,
    pub tics: i32,
    pub next_state: State,
}

const fn st(state: State, sprite: &'static str, frame: u8, tics: i32, next_state: State) -> StateInfo {
    StateInfo {
        state,
        sprite,
        frame,
        tics,
        next_state,
    }
}

use State::*;

/// Indexed by `State as usize`; order must match the enum.
pub const STATES: &[StateInfo] = &[
    st(S_NULL, "TROO", 0, -1, S_NULL),
    st(S_PLAY, "PLAY", 0, -1, S_NULL),
    st(S_PLAY_DIE1, "PLAY", 7, 10, S_PLAY_DEAD),
    st(S_PLAY_DEAD, "PLAY", 13, -1, S_NULL),
    st(S_POSS_STND, "POSS", 0, 10, S_POSS_STND2),
    st(S_POSS_STND2, "POSS", 1, 10, S_POSS_STND),
    st(S_POSS_DIE1, "POSS", 7, 5, S_POSS_DIE2),
    st(S_POSS_DIE2, "POSS", 8, 5, S_POSS_DEAD),
    st(S_POSS_DEAD, "POSS", 11, -1, S_NULL),
    st(S_TROO_STND, "TROO", 0, 10, S_TROO_STND2),
    st(S_TROO_STND2, "TROO", 1, 10, S_TROO_STND),
    st(S_TROO_DIE1, "TROO", 8, 8, S_TROO_DIE2),
    st(S_TROO_DIE2, "TROO", 9, 8, S_TROO_DEAD),
    st(S_TROO_DEAD, "TROO", 12, -1, S_NULL),
    st(S_TBALL1, "BAL1", 0, 4, S_TBALL2),
    st(S_TBALL2, "BAL1", 1, 4, S_TBALL1),
    st(S_TBALLX1, "BAL1", 2, 6, S_TBALLX2),
    st(S_TBALLX2, "BAL1", 3, 6, S_TBALLX3),
    st(S_TBALLX3, "BAL1", 4, 6, S_NULL),
    st(S_SKULL_STND, "SKUL", 0, 10, S_SKULL_STND2),
    st(S_SKULL_STND2, "SKUL", 1, 10, S_SKULL_STND),
    st(S_SKULL_DIE1, "SKUL", 5, 6, S_SKULL_DIE2),
    st(S_SKULL_DIE2, "SKUL", 6, 6, S_NULL),
    st(S_HEAD_STND, "HEAD", 0, 10, S_HEAD_STND),
    st(S_HEAD_DIE1, "HEAD", 6, 8, S_HEAD_DIE2),
    st(S_HEAD_DIE2, "HEAD", 7, 8, S_HEAD_DEAD),
    st(S_HEAD_DEAD, "HEAD", 11, -1, S_NULL),
    st(S_BAR1, "BAR1", 0, 6, S_BAR2),
    st(S_BAR2, "BAR1", 1, 6, S_BAR1),
    st(S_BEXP, "BEXP", 0, 5, S_BEXP2),
    st(S_BEXP2, "BEXP", 1, 5, S_NULL),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_enum() {
        for (i, info) in STATES.iter().enumerate() {
            assert_eq!(info.state as usize, i, "{:?}", info.state);
        }
    }

    #[test]
    fn chains_loop_or_terminate() {
        assert_eq!(S_POSS_STND.next().next(), S_POSS_STND);
        assert_eq!(S_TBALLX3.next(), S_NULL);
        assert_eq!(S_POSS_DEAD.tics(), -1);
    }
}
