//! Camera-side visibility: which segs and subsectors a frame can show.

mod bsp;
mod clip;
mod types;

pub use bsp::VisibilityCuller;
pub use clip::{ClipRange, SolidSegs};
pub use types::{
    CullConfig, CullError, CullStats, FIELDOFVIEW, FrameOutput, MAX_SCREEN_WIDTH, ViewTables, VisWall,
};
