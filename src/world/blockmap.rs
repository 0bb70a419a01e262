//! Static blockmap: a uniform grid of 128×128-unit cells listing the
//! linedefs that pass through each cell.
//!
//! Mobile things are indexed separately (see `sim::ThingGrid`) but share
//! the same origin and cell size.

use smallvec::SmallVec;

use super::divline::{Divline, Side};
use super::fixed::{FRACBITS, Fixed, units};
use super::geometry::{Aabb, Linedef, LinedefId, Vertex};

/// size of one grid cell in world units
pub const MAPBLOCKUNITS: i32 = 128;
pub const MAPBLOCKSHIFT: u32 = FRACBITS + 7; // 2^7 = 128

#[derive(Clone, Debug)]
pub struct Blockmap {
    pub origin_x: Fixed,
    pub origin_y: Fixed,
    pub width: i32,
    pub height: i32,
    /// row-major, `by * width + bx`
    pub lines: Vec<CellLines>,
}

/// Lines through one cell; most cells hold only a handful.
pub type CellLines = SmallVec<[LinedefId; 8]>;

/// Inclusive, clamped rectangle of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub xl: i32,
    pub xh: i32,
    pub yl: i32,
    pub yh: i32,
}

impl CellRange {
    pub fn is_empty(&self) -> bool {
        self.xl > self.xh || self.yl > self.yh
    }

    /// Column-major walk (x outer, y inner) – the order queries visit cells.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (self.xl..=self.xh).flat_map(move |bx| (self.yl..=self.yh).map(move |by| (bx, by)))
    }
}

impl Blockmap {
    /// Grid covering `vertices` with an 8-unit margin, each cell listing
    /// the lines that actually pass through it.
    pub fn build(vertices: &[Vertex], linedefs: &[Linedef]) -> Self {
        let mut bounds = match vertices.first() {
            Some(v) => Aabb {
                top: v.y,
                bottom: v.y,
                left: v.x,
                right: v.x,
            },
            None => Aabb::default(),
        };
        for v in vertices {
            bounds.add_point(v.x, v.y);
        }

        let origin_x = bounds.left - units(8);
        let origin_y = bounds.bottom - units(8);
        let width = ((bounds.right - origin_x) >> MAPBLOCKSHIFT) + 1;
        let height = ((bounds.top - origin_y) >> MAPBLOCKSHIFT) + 1;

        let mut bm = Blockmap {
            origin_x,
            origin_y,
            width,
            height,
            lines: vec![CellLines::new(); (width * height) as usize],
        };

        for (id, ld) in linedefs.iter().enumerate() {
            let v1 = &vertices[ld.v1 as usize];
            let dl = Divline::new(v1.x, v1.y, ld.dx, ld.dy);
            let range = bm.cell_range(&ld.bbox, 0);
            for (bx, by) in range.cells() {
                if bm.line_touches_cell(&dl, bx, by) {
                    let cell = bm.cell_index(bx, by);
                    bm.lines[cell].push(id as LinedefId);
                }
            }
        }

        bm
    }

    /// Empty grid with the given placement; for hand-built levels.
    pub fn empty(origin_x: Fixed, origin_y: Fixed, width: i32, height: i32) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
            lines: vec![CellLines::new(); (width.max(0) * height.max(0)) as usize],
        }
    }

    #[inline]
    pub fn block_x(&self, x: Fixed) -> i32 {
        x.wrapping_sub(self.origin_x) >> MAPBLOCKSHIFT
    }

    #[inline]
    pub fn block_y(&self, y: Fixed) -> i32 {
        y.wrapping_sub(self.origin_y) >> MAPBLOCKSHIFT
    }

    #[inline]
    pub fn in_bounds(&self, bx: i32, by: i32) -> bool {
        bx >= 0 && by >= 0 && bx < self.width && by < self.height
    }

    #[inline]
    fn cell_index(&self, bx: i32, by: i32) -> usize {
        (by * self.width + bx) as usize
    }

    /// Cells touched by `bbox` grown by `expand` on every side, clamped to
    /// the grid.
    pub fn cell_range(&self, bbox: &Aabb, expand: Fixed) -> CellRange {
        CellRange {
            xl: self.block_x(bbox.left - expand).max(0),
            xh: self.block_x(bbox.right + expand).min(self.width - 1),
            yl: self.block_y(bbox.bottom - expand).max(0),
            yh: self.block_y(bbox.top + expand).min(self.height - 1),
        }
    }

    /// Lines listed in cell `(bx, by)`; empty outside the grid.
    pub fn lines_in(&self, bx: i32, by: i32) -> &[LinedefId] {
        if !self.in_bounds(bx, by) {
            return &[];
        }
        &self.lines[self.cell_index(bx, by)]
    }

    fn line_touches_cell(&self, dl: &Divline, bx: i32, by: i32) -> bool {
        let left = self.origin_x + (bx << MAPBLOCKSHIFT);
        let bottom = self.origin_y + (by << MAPBLOCKSHIFT);
        let right = left + units(MAPBLOCKUNITS);
        let top = bottom + units(MAPBLOCKUNITS);

        let corners = [(left, bottom), (left, top), (right, bottom), (right, top)];
        let first = dl.side(corners[0].0, corners[0].1);
        first == Side::On
            || corners[1..]
                .iter()
                .any(|&(x, y)| dl.side(x, y) != first)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::demo;

    #[test]
    fn grid_covers_the_map_with_margin() {
        let lvl = demo::two_rooms().unwrap();
        let bm = &lvl.blockmap;
        assert_eq!(bm.origin_x, units(-8));
        assert_eq!(bm.origin_y, units(-8));
        // 520 / 128 → 4, +1
        assert_eq!(bm.width, 5);
        assert_eq!(bm.height, 3);
        assert_eq!(bm.lines.len(), 15);
    }

    #[test]
    fn every_line_is_listed_in_the_cells_it_crosses() {
        let lvl = demo::two_rooms().unwrap();
        let bm = &lvl.blockmap;
        for (id, ld) in lvl.linedefs.iter().enumerate() {
            let v1 = &lvl.vertices[ld.v1 as usize];
            let v2 = &lvl.vertices[ld.v2 as usize];
            for (x, y) in [(v1.x, v1.y), (v2.x, v2.y)] {
                let (bx, by) = (bm.block_x(x), bm.block_y(y));
                assert!(
                    bm.lines_in(bx, by).contains(&(id as LinedefId)),
                    "line {id} missing from cell ({bx}, {by})"
                );
            }
        }
    }

    #[test]
    fn cells_away_from_a_line_do_not_list_it() {
        let lvl = demo::two_rooms().unwrap();
        let bm = &lvl.blockmap;
        // the west wall of room A sits at x = 0; the column at x ≈ 400 never sees it
        let west = demo::ROOM_A_WEST_WALL;
        let bx = bm.block_x(units(400));
        for by in 0..bm.height {
            assert!(!bm.lines_in(bx, by).contains(&west));
        }
    }

    #[test]
    fn ranges_clamp_to_the_grid() {
        let lvl = demo::two_rooms().unwrap();
        let bm = &lvl.blockmap;
        let r = bm.cell_range(&Aabb::from_units(5000, -5000, -5000, 5000), 0);
        assert_eq!((r.xl, r.xh, r.yl, r.yh), (0, bm.width - 1, 0, bm.height - 1));

        let off = bm.cell_range(&Aabb::from_units(-1000, -1100, 0, 10), 0);
        assert!(off.is_empty());
        assert_eq!(off.cells().count(), 0);
        assert!(bm.lines_in(-1, 0).is_empty());
    }
}
