use super::states::{STATES, StateInfo};

/// Animation frame identifier; indexes [`STATES`].
#[repr(usize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum State {
    S_NULL = 0,
    S_PLAY,
    S_PLAY_DIE1,
    S_PLAY_DEAD,
    S_POSS_STND,
    S_POSS_STND2,
    S_POSS_DIE1,
    S_POSS_DIE2,
    S_POSS_DEAD,
    S_TROO_STND,
    S_TROO_STND2,
    S_TROO_DIE1,
    S_TROO_DIE2,
    S_TROO_DEAD,
    S_TBALL1,
    S_TBALL2,
    S_TBALLX1,
    S_TBALLX2,
    S_TBALLX3,
    S_SKULL_STND,
    S_SKULL_STND2,
    S_SKULL_DIE1,
    S_SKULL_DIE2,
    S_HEAD_STND,
    S_HEAD_DIE1,
    S_HEAD_DIE2,
    S_HEAD_DEAD,
    S_BAR1,
    S_BAR2,
    S_BEXP,
    S_BEXP2,
}

impl State {
    #[inline(always)]
    pub fn info(self) -> &'static StateInfo {
        &STATES[self as usize]
    }

    /// Duration in tics; `-1` never advances.
    #[inline(always)]
    pub fn tics(self) -> i32 {
        self.info().tics
    }

    #[inline(always)]
    pub fn next(self) -> State {
        self.info().next_state
    }
}
