// ──────────────────────────────────────────────────────────────────────────
// world/builder.rs
//
//  *   vertices / sectors / sidedefs     ──╮
//  *   line + subsector drafts             │   --->  world::geometry::Level
//  *   nodes, reject pairs                 │          + derived bbox, slope,
//                                          ╯            seg sectors, blockmap
// ──────────────────────────────────────────────────────────────────────────

use log::debug;
use thiserror::Error;

use super::blockmap::Blockmap;
use super::fixed::units;
use super::geometry::*;
use super::reject::RejectMatrix;

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("level has no {0}")]
    Empty(&'static str),

    #[error("too many {0} for 16-bit indices")]
    TooMany(&'static str),

    #[error("linedef {line} references missing vertex {vertex}")]
    DanglingVertex { line: LinedefId, vertex: VertexId },

    #[error("linedef {line} references missing sidedef {sidedef}")]
    DanglingSidedef { line: LinedefId, sidedef: SidedefId },

    #[error("sidedef {sidedef} references missing sector {sector}")]
    DanglingSector { sidedef: SidedefId, sector: SectorId },

    #[error("linedef {0} is flagged two-sided but has no back side")]
    TwoSidedWithoutBack(LinedefId),

    #[error("subsector {subsector} references missing linedef {line}")]
    DanglingLine { subsector: SubsectorId, line: LinedefId },

    #[error("subsector {subsector} uses the back of one-sided linedef {line}")]
    NoBackSide { subsector: SubsectorId, line: LinedefId },

    #[error("subsector {0} has no segs")]
    EmptySubsector(SubsectorId),

    #[error("node {node} references missing or later child {child:?}")]
    DanglingChild { node: NodeId, child: NodeChild },

    #[error("reject table needs {expected} bytes, found {found}")]
    RejectSize { expected: usize, found: usize },
}

/*──────────────────────────── Drafts ───────────────────────────────*/

#[derive(Clone, Debug)]
struct LineDraft {
    v1: VertexId,
    v2: VertexId,
    flags: LinedefFlags,
    special: u16,
    tag: u16,
    right: SidedefId,
    left: Option<SidedefId>,
}

/// One seg before resolution: the linedef it lies on and which face of it
/// the subsector sees (0 = right/front, 1 = left/back).
pub type SegDraft = (LinedefId, u8);

impl Sidedef {
    /// Face of a solid wall: every surface textured.
    pub fn wall(sector: SectorId) -> Self {
        Self {
            upper: 1,
            lower: 1,
            middle: 1,
            sector,
        }
    }

    /// Face of an open boundary: upper/lower surfaces only.
    pub fn portal(sector: SectorId) -> Self {
        Self {
            upper: 1,
            lower: 1,
            middle: NO_TEXTURE,
            sector,
        }
    }
}

/// Assembles a [`Level`] from hand-placed pieces and validates every index
/// before any query can see it.
#[derive(Clone, Debug, Default)]
pub struct LevelBuilder {
    name: String,
    vertices: Vec<Vertex>,
    sectors: Vec<Sector>,
    sidedefs: Vec<Sidedef>,
    lines: Vec<LineDraft>,
    subsectors: Vec<Vec<SegDraft>>,
    nodes: Vec<Node>,
    reject_bytes: Option<Vec<u8>>,
    rejected_pairs: Vec<(SectorId, SectorId)>,
}

impl LevelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Vertex at whole map units.
    pub fn add_vertex(&mut self, x: i32, y: i32) -> VertexId {
        self.vertices.push(Vertex {
            x: units(x),
            y: units(y),
        });
        (self.vertices.len() - 1) as VertexId
    }

    pub fn add_sector(&mut self, sector: Sector) -> SectorId {
        self.sectors.push(sector);
        (self.sectors.len() - 1) as SectorId
    }

    pub fn add_sidedef(&mut self, side: Sidedef) -> SidedefId {
        self.sidedefs.push(side);
        (self.sidedefs.len() - 1) as SidedefId
    }

    /// Linedef from `v1` to `v2`. A back side implies [`LinedefFlags::TWO_SIDED`].
    pub fn add_line(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        flags: LinedefFlags,
        front: SidedefId,
        back: Option<SidedefId>,
    ) -> LinedefId {
        let flags = if back.is_some() {
            flags | LinedefFlags::TWO_SIDED
        } else {
            flags
        };
        self.lines.push(LineDraft {
            v1,
            v2,
            flags,
            special: 0,
            tag: 0,
            right: front,
            left: back,
        });
        (self.lines.len() - 1) as LinedefId
    }

    /// Shorthand: one-sided wall facing into `sector`.
    pub fn add_wall(&mut self, v1: VertexId, v2: VertexId, sector: SectorId) -> LinedefId {
        let side = self.add_sidedef(Sidedef::wall(sector));
        self.add_line(v1, v2, LinedefFlags::empty(), side, None)
    }

    /// Shorthand: open two-sided boundary between `front` and `back`.
    pub fn add_portal(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        flags: LinedefFlags,
        front: SectorId,
        back: SectorId,
    ) -> LinedefId {
        let f = self.add_sidedef(Sidedef::portal(front));
        let b = self.add_sidedef(Sidedef::portal(back));
        self.add_line(v1, v2, flags, f, Some(b))
    }

    /// Convex leaf bounded by `segs`, stored in the given order.
    pub fn add_subsector(&mut self, segs: &[SegDraft]) -> SubsectorId {
        self.subsectors.push(segs.to_vec());
        (self.subsectors.len() - 1) as SubsectorId
    }

    /// Partition node; `x, y, dx, dy` in map units. The last node added is
    /// the root and children must be added before their parent.
    pub fn add_node(
        &mut self,
        (x, y, dx, dy): (i32, i32, i32, i32),
        bbox: [Aabb; 2],
        child: [NodeChild; 2],
    ) -> NodeId {
        self.nodes.push(Node {
            x: units(x),
            y: units(y),
            dx: units(dx),
            dy: units(dy),
            bbox,
            child,
        });
        (self.nodes.len() - 1) as NodeId
    }

    /// Use a raw row-major reject lump instead of an all-visible table.
    pub fn reject_bytes(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.reject_bytes = Some(bytes);
        self
    }

    /// Mark `to` as never visible from `from`.
    pub fn reject(&mut self, from: SectorId, to: SectorId) -> &mut Self {
        self.rejected_pairs.push((from, to));
        self
    }

    pub fn build(self) -> Result<Level, LevelError> {
        for (what, len) in [
            ("vertices", self.vertices.len()),
            ("sectors", self.sectors.len()),
            ("subsectors", self.subsectors.len()),
        ] {
            if len == 0 {
                return Err(LevelError::Empty(what));
            }
        }
        for (what, len) in [
            ("vertices", self.vertices.len()),
            ("sectors", self.sectors.len()),
            ("sidedefs", self.sidedefs.len()),
            ("linedefs", self.lines.len()),
            ("subsectors", self.subsectors.len()),
            ("nodes", self.nodes.len()),
        ] {
            if len > u16::MAX as usize {
                return Err(LevelError::TooMany(what));
            }
        }

        for (id, side) in self.sidedefs.iter().enumerate() {
            if side.sector as usize >= self.sectors.len() {
                return Err(LevelError::DanglingSector {
                    sidedef: id as SidedefId,
                    sector: side.sector,
                });
            }
        }

        /*----- linedefs: derived delta, bbox, slope, sectors -------------*/
        let mut linedefs = Vec::with_capacity(self.lines.len());
        for (id, d) in self.lines.iter().enumerate() {
            let id = id as LinedefId;
            let v1 = *self.vertex(id, d.v1)?;
            let v2 = *self.vertex(id, d.v2)?;
            let front_sector = self.side(id, d.right)?.sector;
            let back_sector = match d.left {
                Some(s) => Some(self.side(id, s)?.sector),
                None if d.flags.contains(LinedefFlags::TWO_SIDED) => {
                    return Err(LevelError::TwoSidedWithoutBack(id));
                }
                None => None,
            };

            let dx = v2.x - v1.x;
            let dy = v2.y - v1.y;
            let mut bbox = Aabb {
                top: v1.y,
                bottom: v1.y,
                left: v1.x,
                right: v1.x,
            };
            bbox.add_point(v2.x, v2.y);

            linedefs.push(Linedef {
                v1: d.v1,
                v2: d.v2,
                dx,
                dy,
                flags: d.flags,
                special: d.special,
                tag: d.tag,
                right_sidedef: d.right,
                left_sidedef: d.left,
                front_sector,
                back_sector,
                bbox,
                slope: SlopeType::of(dx, dy),
            });
        }

        /*----- segs + subsectors ----------------------------------------*/
        let mut segs = Vec::new();
        let mut subsectors = Vec::with_capacity(self.subsectors.len());
        for (ss_id, drafts) in self.subsectors.iter().enumerate() {
            let ss_id = ss_id as SubsectorId;
            let first_seg = segs.len() as SegmentId;
            for &(line_id, side) in drafts {
                let ld = linedefs
                    .get(line_id as usize)
                    .ok_or(LevelError::DanglingLine {
                        subsector: ss_id,
                        line: line_id,
                    })?;
                let seg = if side == 0 {
                    Seg {
                        v1: ld.v1,
                        v2: ld.v2,
                        linedef: line_id,
                        side: 0,
                        sidedef: ld.right_sidedef,
                        front_sector: ld.front_sector,
                        back_sector: ld.back_sector,
                    }
                } else {
                    let (Some(sidedef), Some(back)) = (ld.left_sidedef, ld.back_sector) else {
                        return Err(LevelError::NoBackSide {
                            subsector: ss_id,
                            line: line_id,
                        });
                    };
                    Seg {
                        v1: ld.v2,
                        v2: ld.v1,
                        linedef: line_id,
                        side: 1,
                        sidedef,
                        front_sector: back,
                        back_sector: Some(ld.front_sector),
                    }
                };
                segs.push(seg);
            }

            let Some(first) = segs.get(first_seg as usize) else {
                return Err(LevelError::EmptySubsector(ss_id));
            };
            subsectors.push(Subsector {
                sector: first.front_sector,
                first_seg,
                seg_count: drafts.len() as u16,
            });
        }
        if segs.len() > u16::MAX as usize {
            return Err(LevelError::TooMany("segs"));
        }

        /*----- nodes: children must exist and precede their parent -------*/
        for (id, node) in self.nodes.iter().enumerate() {
            for child in node.child {
                let ok = match child {
                    NodeChild::Node(n) => (n as usize) < id,
                    NodeChild::Subsector(s) => (s as usize) < subsectors.len(),
                };
                if !ok {
                    return Err(LevelError::DanglingChild {
                        node: id as NodeId,
                        child,
                    });
                }
            }
        }

        /*----- reject + blockmap ----------------------------------------*/
        let mut reject = match self.reject_bytes {
            Some(bytes) => RejectMatrix::from_bytes(self.sectors.len(), &bytes)?,
            None => RejectMatrix::all_visible(self.sectors.len()),
        };
        for &(from, to) in &self.rejected_pairs {
            reject.set_rejected(from, to, true);
        }

        let blockmap = Blockmap::build(&self.vertices, &linedefs);

        debug!(
            "level {}: {} vertices, {} lines, {} segs, {} subsectors, {} nodes, blockmap {}x{}",
            self.name,
            self.vertices.len(),
            linedefs.len(),
            segs.len(),
            subsectors.len(),
            self.nodes.len(),
            blockmap.width,
            blockmap.height
        );

        Ok(Level {
            name: self.name,
            vertices: self.vertices,
            sectors: self.sectors,
            sidedefs: self.sidedefs,
            linedefs,
            segs,
            subsectors,
            nodes: self.nodes,
            blockmap,
            reject,
        })
    }

    fn vertex(&self, line: LinedefId, v: VertexId) -> Result<&Vertex, LevelError> {
        self.vertices
            .get(v as usize)
            .ok_or(LevelError::DanglingVertex { line, vertex: v })
    }

    fn side(&self, line: LinedefId, s: SidedefId) -> Result<&Sidedef, LevelError> {
        self.sidedefs
            .get(s as usize)
            .ok_or(LevelError::DanglingSidedef { line, sidedef: s })
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
