use bitflags::bitflags;

use super::blockmap::Blockmap;
use super::divline::Divline;
use super::fixed::{Fixed, units};
use super::reject::RejectMatrix;

pub type SubsectorId = u16;
pub type LinedefId = u16;
pub type SegmentId = u16;
pub type VertexId = u16;
pub type SidedefId = u16;
pub type SectorId = u16;
pub type NodeId = u16;

/// Surface identifier for walls and flats. Resolved by the renderer.
pub type TextureId = u16;

pub const NO_TEXTURE: TextureId = 0;
/// Ceiling surface that opens to the sky.
pub const SKY_FLAT: TextureId = u16::MAX;

/// Runtime snapshot of one map (immutable after load).
#[derive(Debug)]
pub struct Level {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub sectors: Vec<Sector>,
    pub sidedefs: Vec<Sidedef>,
    pub linedefs: Vec<Linedef>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub blockmap: Blockmap,
    pub reject: RejectMatrix,
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vertex {
    pub x: Fixed,
    pub y: Fixed,
}

/// Axis-aligned box stored as (top, bottom, left, right).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Aabb {
    pub top: Fixed,
    pub bottom: Fixed,
    pub left: Fixed,
    pub right: Fixed,
}

pub const BOXTOP: usize = 0;
pub const BOXBOTTOM: usize = 1;
pub const BOXLEFT: usize = 2;
pub const BOXRIGHT: usize = 3;

impl Aabb {
    pub fn from_units(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self {
            top: units(top),
            bottom: units(bottom),
            left: units(left),
            right: units(right),
        }
    }

    /// Box of `radius` around `(x, y)`.
    pub fn around(x: Fixed, y: Fixed, radius: Fixed) -> Self {
        Self {
            top: y + radius,
            bottom: y - radius,
            left: x - radius,
            right: x + radius,
        }
    }

    /// Coordinate by `BOX*` index.
    #[inline]
    pub fn coord(&self, i: usize) -> Fixed {
        match i {
            BOXTOP => self.top,
            BOXBOTTOM => self.bottom,
            BOXLEFT => self.left,
            _ => self.right,
        }
    }

    pub fn contains(&self, x: Fixed, y: Fixed) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }

    pub fn add_point(&mut self, x: Fixed, y: Fixed) {
        self.left = self.left.min(x);
        self.right = self.right.max(x);
        self.bottom = self.bottom.min(y);
        self.top = self.top.max(y);
    }
}

/*--------------------------- sectors --------------------------------*/

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sector {
    pub floor_h: Fixed,
    pub ceil_h: Fixed,
    pub floor_tex: TextureId,
    pub ceil_tex: TextureId,
    pub light: u8,
    pub special: i16,
    pub tag: i16,
}

impl Sector {
    /// Plain sector with heights in map units.
    pub fn new(floor: i32, ceiling: i32, light: u8) -> Self {
        Self {
            floor_h: units(floor),
            ceil_h: units(ceiling),
            floor_tex: 1,
            ceil_tex: 1,
            light,
            special: 0,
            tag: 0,
        }
    }

    pub fn with_flats(mut self, floor_tex: TextureId, ceil_tex: TextureId) -> Self {
        self.floor_tex = floor_tex;
        self.ceil_tex = ceil_tex;
        self
    }

    /// Same heights, light and surfaces: a boundary between the two draws
    /// nothing and occludes nothing.
    pub fn looks_like(&self, other: &Sector) -> bool {
        self.floor_h == other.floor_h
            && self.ceil_h == other.ceil_h
            && self.floor_tex == other.floor_tex
            && self.ceil_tex == other.ceil_tex
            && self.light == other.light
    }
}

/*--------------------------- sidedefs -------------------------------*/

#[derive(Clone, Debug)]
pub struct Sidedef {
    pub upper: TextureId,
    pub lower: TextureId,
    pub middle: TextureId,
    pub sector: SectorId,
}

/*--------------------------- linedefs -------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct LinedefFlags: u16 {
        const IMPASSABLE      = 0x0001;
        const BLOCK_MONSTERS  = 0x0002;
        const TWO_SIDED       = 0x0004;
        const UPPER_UNPEGGED  = 0x0010;
        const LOWER_UNPEGGED  = 0x0020;
        const SECRET          = 0x0040;
        const BLOCK_SOUND     = 0x0080;
        const NOT_ON_MAP      = 0x0200;
    }
}

/// Orientation class used by the box-vs-line crossing test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlopeType {
    Horizontal,
    Vertical,
    Positive,
    Negative,
}

impl SlopeType {
    pub fn of(dx: Fixed, dy: Fixed) -> Self {
        if dx == 0 {
            SlopeType::Vertical
        } else if dy == 0 {
            SlopeType::Horizontal
        } else if (dy > 0) == (dx > 0) {
            SlopeType::Positive
        } else {
            SlopeType::Negative
        }
    }
}

#[derive(Clone, Debug)]
pub struct Linedef {
    pub v1: VertexId,
    pub v2: VertexId,
    pub dx: Fixed,
    pub dy: Fixed,
    pub flags: LinedefFlags,
    pub special: u16,
    pub tag: u16,
    pub right_sidedef: SidedefId,
    pub left_sidedef: Option<SidedefId>,
    pub front_sector: SectorId,
    /// `None` for one-sided walls.
    pub back_sector: Option<SectorId>,
    pub bbox: Aabb,
    pub slope: SlopeType,
}

/*--------------------------- BSP pieces -----------------------------*/

/// Directed boundary edge of a subsector.
#[derive(Clone, Debug)]
pub struct Seg {
    pub v1: VertexId,
    pub v2: VertexId,
    pub linedef: LinedefId,
    /// 0 = along the linedef, 1 = against it.
    pub side: u8,
    pub sidedef: SidedefId,
    pub front_sector: SectorId,
    pub back_sector: Option<SectorId>,
}

#[derive(Clone, Debug)]
pub struct Subsector {
    pub sector: SectorId,
    pub first_seg: SegmentId,
    pub seg_count: u16,
}

/// Child slot of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeChild {
    Node(NodeId),
    Subsector(SubsectorId),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
    pub bbox: [Aabb; 2],
    pub child: [NodeChild; 2],
}

impl Node {
    #[inline(always)]
    pub fn divline(&self) -> Divline {
        Divline::new(self.x, self.y, self.dx, self.dy)
    }
}
