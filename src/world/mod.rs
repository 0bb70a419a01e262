pub mod angle;
pub mod blockmap;
mod bsp;
pub mod builder;
mod camera;
pub mod demo;
pub mod divline;
pub mod fixed;
mod geometry;
pub mod marks;
pub mod reject;

pub use geometry::*;

pub use angle::{Angle, point_to_angle};
pub use blockmap::{Blockmap, CellLines, CellRange, MAPBLOCKSHIFT};
pub use builder::{LevelBuilder, LevelError};
pub use camera::Camera;
pub use divline::{Divline, Side};
pub use fixed::{FRACBITS, FRACUNIT, Fixed, units};
pub use marks::LineMarks;
pub use reject::RejectMatrix;
