//! Sector-pair reject table.
//!
//! One bit per ordered `(from, to)` sector pair, row-major, LSB first. A set
//! bit means "no line of sight is possible" and lets sight checks bail out
//! before touching the BSP.

use super::builder::LevelError;
use super::geometry::SectorId;

#[derive(Clone, Debug)]
pub struct RejectMatrix {
    sector_count: usize,
    bits: Vec<u8>,
}

impl RejectMatrix {
    /// Table with every pair potentially visible.
    pub fn all_visible(sector_count: usize) -> Self {
        Self {
            sector_count,
            bits: vec![0; Self::byte_len(sector_count)],
        }
    }

    /// Wrap a raw lump. Trailing bytes are tolerated, a short table is not.
    pub fn from_bytes(sector_count: usize, bytes: &[u8]) -> Result<Self, LevelError> {
        let need = Self::byte_len(sector_count);
        if bytes.len() < need {
            return Err(LevelError::RejectSize {
                expected: need,
                found: bytes.len(),
            });
        }
        Ok(Self {
            sector_count,
            bits: bytes[..need].to_vec(),
        })
    }

    #[inline]
    fn byte_len(sector_count: usize) -> usize {
        (sector_count * sector_count).div_ceil(8)
    }

    #[inline]
    fn locate(&self, from: SectorId, to: SectorId) -> Option<(usize, u8)> {
        let (from, to) = (from as usize, to as usize);
        if from >= self.sector_count || to >= self.sector_count {
            return None;
        }
        let pnum = from * self.sector_count + to;
        Some((pnum >> 3, 1 << (pnum & 7)))
    }

    /// True when `to` can never be seen from `from`.
    #[inline]
    pub fn is_rejected(&self, from: SectorId, to: SectorId) -> bool {
        self.locate(from, to)
            .is_some_and(|(byte, mask)| self.bits[byte] & mask != 0)
    }

    pub fn set_rejected(&mut self, from: SectorId, to: SectorId, rejected: bool) {
        if let Some((byte, mask)) = self.locate(from, to) {
            if rejected {
                self.bits[byte] |= mask;
            } else {
                self.bits[byte] &= !mask;
            }
        }
    }

    pub fn sector_count(&self) -> usize {
        self.sector_count
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
