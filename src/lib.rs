//! Spatial core of a Doom-style engine.
//!
//! * [`world`] – fixed-point maths, level geometry, BSP, blockmap, reject
//! * [`defs`] – thing and state tables
//! * [`sim`] – entities, collision, movement, line of sight, the tic loop
//! * [`engine`] – camera-side visibility culling

pub mod defs;
pub mod engine;
pub mod sim;
pub mod world;
