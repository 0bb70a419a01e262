//! ----------------------------------------------------------------------------
//! Solid-segment occlusion list
//!
//! A sorted list of inclusive screen-column ranges that are already fully
//! covered by solid walls. Two sentinels sit just outside the screen so every
//! search terminates without bounds checks. Ranges stay pairwise disjoint and
//! two ranges that touch are always merged.
//! ----------------------------------------------------------------------------

use log::warn;

use super::types::CullError;

/// Inclusive run of occluded columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRange {
    pub first: i32,
    pub last: i32,
}

#[derive(Clone, Debug)]
pub struct SolidSegs {
    ranges: Vec<ClipRange>,
    width: i32,
    limit: Option<usize>,
}

impl SolidSegs {
    pub fn new(width: i32, limit: Option<usize>) -> Self {
        let mut segs = Self {
            ranges: Vec::with_capacity(limit.unwrap_or(32)),
            width,
            limit,
        };
        segs.clear();
        segs
    }

    /// Back to an empty screen: only the off-screen sentinels.
    pub fn clear(&mut self) {
        self.ranges.clear();
        self.ranges.push(ClipRange { first: -2, last: -1 });
        self.ranges.push(ClipRange {
            first: self.width,
            last: self.width + 1,
        });
    }

    pub fn ranges(&self) -> &[ClipRange] {
        &self.ranges
    }

    /// Index of the first range that ends at or past `x - 1`.
    #[inline]
    fn first_reaching(&self, x: i32) -> usize {
        let mut i = 0;
        while self.ranges[i].last < x - 1 {
            i += 1;
        }
        i
    }

    /// True when every column of `first..=last` is already occluded.
    pub fn covers(&self, first: i32, last: i32) -> bool {
        let mut i = 0;
        while self.ranges[i].last < last {
            i += 1;
        }
        first >= self.ranges[i].first && last <= self.ranges[i].last
    }

    /// Report the open gaps of `first..=last` and mark the whole run solid.
    pub fn clip_solid<F>(&mut self, first: i32, last: i32, mut emit: F) -> Result<(), CullError>
    where
        F: FnMut(i32, i32) -> Result<(), CullError>,
    {
        let mut start = self.first_reaching(first);

        if first < self.ranges[start].first {
            if last < self.ranges[start].first - 1 {
                // entirely in a gap: new range
                self.reserve_one()?;
                emit(first, last)?;
                self.ranges.insert(start, ClipRange { first, last });
                return Ok(());
            }
            // grow the found range to the left
            emit(first, self.ranges[start].first - 1)?;
            self.ranges[start].first = first;
        }

        if last <= self.ranges[start].last {
            return Ok(());
        }

        let mut next = start;
        let mut swallowed = false;
        while last >= self.ranges[next + 1].first - 1 {
            // the gap up to the next range
            emit(self.ranges[next].last + 1, self.ranges[next + 1].first - 1)?;
            next += 1;
            if last <= self.ranges[next].last {
                swallowed = true;
                break;
            }
        }
        if swallowed {
            self.ranges[start].last = self.ranges[next].last;
        } else {
            emit(self.ranges[next].last + 1, last)?;
            self.ranges[start].last = last;
        }

        // ranges swallowed by `start`
        if next != start {
            start += 1;
            self.ranges.drain(start..=next);
        }
        Ok(())
    }

    /// Report the open gaps of `first..=last` without occluding anything.
    pub fn clip_pass<F>(&self, first: i32, last: i32, mut emit: F) -> Result<(), CullError>
    where
        F: FnMut(i32, i32) -> Result<(), CullError>,
    {
        let mut start = self.first_reaching(first);

        if first < self.ranges[start].first {
            if last < self.ranges[start].first - 1 {
                return emit(first, last);
            }
            emit(first, self.ranges[start].first - 1)?;
        }

        if last <= self.ranges[start].last {
            return Ok(());
        }

        while last >= self.ranges[start + 1].first - 1 {
            emit(self.ranges[start].last + 1, self.ranges[start + 1].first - 1)?;
            start += 1;
            if last <= self.ranges[start].last {
                return Ok(());
            }
        }
        emit(self.ranges[start].last + 1, last)
    }

    fn reserve_one(&self) -> Result<(), CullError> {
        match self.limit {
            Some(limit) if self.ranges.len() >= limit => {
                warn!("solid segment list full at {limit} ranges");
                Err(CullError::SolidSegsFull { limit })
            }
            _ => Ok(()),
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
