//! Runtime "thing" grid – a very small, cache‑friendly spatial hash.
//!
//! * Shares origin and 128×128 cell size with the static line blockmap.
//! * Each cell keeps a `SmallVec` – Doom maps rarely exceed a handful
//!   of live mobjs per block, so this is fast and allocation‑free in
//!   the common case.
//! * A thing is filed under the cell holding its **origin**; searches
//!   widen their box by the largest radius to catch overlap.
//!
//! The grid is **write‑through** from the movement code:
//! [`ThingGrid::remove`] is called with the old coords before a move and
//! [`ThingGrid::insert`] with the new ones after it.

use hecs::Entity;
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::world::{Blockmap, Fixed, MAPBLOCKSHIFT};

/// Row / column index in the blockmap grid
pub type Bx = i32;
pub type By = i32;

/// Small fixed‑capacity cell, most recently linked first
type Cell = SmallVec<[Entity; 8]>;

/// Hash‑map grid (sparse – only allocated where something lives)
#[derive(Debug, Default)]
pub struct ThingGrid {
    origin_x: Fixed,
    origin_y: Fixed,
    width: i32,
    height: i32,
    cells: HashMap<(Bx, By), Cell>,
}

/*───────────────────────── API ──────────────────────────────*/

impl ThingGrid {
    pub fn new(blockmap: &Blockmap) -> ThingGrid {
        ThingGrid {
            origin_x: blockmap.origin_x,
            origin_y: blockmap.origin_y,
            width: blockmap.width,
            height: blockmap.height,
            cells: HashMap::new(),
        }
    }

    #[inline]
    fn cell_of(&self, x: Fixed, y: Fixed) -> Option<(Bx, By)> {
        let bx = x.wrapping_sub(self.origin_x) >> MAPBLOCKSHIFT;
        let by = y.wrapping_sub(self.origin_y) >> MAPBLOCKSHIFT;
        (bx >= 0 && by >= 0 && bx < self.width && by < self.height).then_some((bx, by))
    }

    /// Link `ent` at `(x, y)`. Things off the map are not linked anywhere.
    #[inline]
    pub fn insert(&mut self, ent: Entity, x: Fixed, y: Fixed) {
        if let Some(key) = self.cell_of(x, y) {
            self.cells.entry(key).or_default().insert(0, ent);
        }
    }

    /// Unlink `ent` from the cell that `(x, y)` falls in.
    ///
    /// *Call this **before** you move the actor; provide the old
    /// position so we do not need to remember it.*
    #[inline]
    pub fn remove(&mut self, ent: Entity, x: Fixed, y: Fixed) {
        let Some(key) = self.cell_of(x, y) else {
            return;
        };
        if let Some(cell) = self.cells.get_mut(&key) {
            if let Some(i) = cell.iter().position(|&e| e == ent) {
                cell.remove(i);
            }
            if cell.is_empty() {
                self.cells.remove(&key);
            }
        }
    }

    /// Things filed in cell `(bx, by)`, most recently linked first.
    #[inline]
    pub fn things_in(&self, bx: Bx, by: By) -> &[Entity] {
        self.cells.get(&(bx, by)).map_or(&[], |c| c.as_slice())
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{demo, units};
    use hecs::World;

    #[test]
    fn insert_front_remove_keeps_order() {
        let lvl = demo::two_rooms().unwrap();
        let mut grid = ThingGrid::new(&lvl.blockmap);
        let mut world = World::new();
        let [a, b, c] = [0u8, 1, 2].map(|i| world.spawn((i,)));

        let (x, y) = (units(40), units(40));
        grid.insert(a, x, y);
        grid.insert(b, x, y);
        grid.insert(c, x, y);

        let bx = lvl.blockmap.block_x(x);
        let by = lvl.blockmap.block_y(y);
        assert_eq!(grid.things_in(bx, by), &[c, b, a]);

        grid.remove(b, x, y);
        assert_eq!(grid.things_in(bx, by), &[c, a]);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn off_map_things_are_not_linked() {
        let lvl = demo::two_rooms().unwrap();
        let mut grid = ThingGrid::new(&lvl.blockmap);
        let mut world = World::new();
        let e = world.spawn((0u8,));
        grid.insert(e, units(-500), units(10));
        assert!(grid.is_empty());
        grid.remove(e, units(-500), units(10));
        assert!(grid.is_empty());
    }

    #[test]
    fn emptied_cells_are_dropped() {
        let lvl = demo::two_rooms().unwrap();
        let mut grid = ThingGrid::new(&lvl.blockmap);
        let mut world = World::new();
        let e = world.spawn((0u8,));
        grid.insert(e, units(300), units(200));
        assert!(!grid.is_empty());
        grid.remove(e, units(300), units(200));
        assert!(grid.is_empty());
    }
}
