use std::ops::Range;

use super::fixed::Fixed;
use super::geometry::{Level, Node, NodeChild, Sector, SegmentId, SubsectorId};

// ──────────────────────────────────────────────────────────────────────────
//                       Level – public helpers
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// Entry point of every descent. A map without nodes is one subsector.
    #[inline(always)]
    pub fn bsp_root(&self) -> NodeChild {
        match self.nodes.len() {
            0 => NodeChild::Subsector(0),
            n => NodeChild::Node((n - 1) as u16),
        }
    }

    /// Walk the BSP and return the subsector id containing `(x, y)`.
    pub fn locate_subsector(&self, x: Fixed, y: Fixed) -> SubsectorId {
        let mut child = self.bsp_root();
        loop {
            match child {
                NodeChild::Subsector(ss) => return ss,
                NodeChild::Node(n) => {
                    let node = &self.nodes[n as usize];
                    child = node.child[node.point_side(x, y)];
                }
            }
        }
    }

    /// Sector under `(x, y)`.
    pub fn sector_at(&self, x: Fixed, y: Fixed) -> &Sector {
        let ss = self.locate_subsector(x, y);
        self.subsector_sector(ss)
    }

    #[inline]
    pub fn subsector_sector(&self, ss: SubsectorId) -> &Sector {
        &self.sectors[self.subsectors[ss as usize].sector as usize]
    }

    /// Seg indices bounding subsector `ss`, in stored order.
    #[inline]
    pub fn segs_of_subsector(&self, ss: SubsectorId) -> Range<SegmentId> {
        let sub = &self.subsectors[ss as usize];
        sub.first_seg..sub.first_seg + sub.seg_count
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Node geometry helpers
// ──────────────────────────────────────────────────────────────────────────
impl Node {
    /// 0 = *front* of splitter, 1 = *back*. Points on the splitter go back.
    #[inline(always)]
    pub fn point_side(&self, x: Fixed, y: Fixed) -> usize {
        self.divline().point_on_side(x, y)
    }
}
