//! Segment storage for media playlists
//!
//! One buffer with two policies. `Grow` keeps every segment and doubles
//! the capacity when full. `Evict` drops the oldest segment once the live
//! window is full. The window also owns sequence numbering: the segment at
//! position `i` always has id `first_seq + i`.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::{PlaylistError, Result};
use crate::types::MediaSegment;

/// Smallest capacity a full buffer grows to
const MIN_GROWTH: usize = 8;

/// What happens when a segment is pushed into a full window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Keep everything, extending capacity as needed
    Grow,
    /// Keep at most `window` segments, dropping the oldest
    Evict { window: usize },
}

impl EvictionPolicy {
    fn for_window(window_size: usize) -> Self {
        if window_size == 0 {
            EvictionPolicy::Grow
        } else {
            EvictionPolicy::Evict {
                window: window_size,
            }
        }
    }
}

/// FIFO segment buffer
#[derive(Debug, Clone)]
pub struct SegmentWindow {
    segments: VecDeque<MediaSegment>,
    capacity: usize,
    policy: EvictionPolicy,
    first_seq: u64,
}

impl SegmentWindow {
    /// Create a buffer. A window size of 0 means unbounded.
    pub fn new(window_size: usize, capacity: usize) -> Result<Self> {
        if window_size > capacity {
            return Err(PlaylistError::WindowExceedsCapacity {
                window_size,
                capacity,
            });
        }
        Ok(Self {
            segments: VecDeque::with_capacity(capacity),
            capacity,
            policy: EvictionPolicy::for_window(window_size),
            first_seq: 0,
        })
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub fn window_size(&self) -> usize {
        match self.policy {
            EvictionPolicy::Grow => 0,
            EvictionPolicy::Evict { window } => window,
        }
    }

    pub fn set_window_size(&mut self, window_size: usize) -> Result<()> {
        if window_size > self.capacity {
            return Err(PlaylistError::WindowExceedsCapacity {
                window_size,
                capacity: self.capacity,
            });
        }
        self.policy = EvictionPolicy::for_window(window_size);
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sequence id of the oldest held segment
    pub fn first_seq(&self) -> u64 {
        self.first_seq
    }

    /// Id the next pushed segment takes, `None` once the id space is used up
    pub fn next_seq(&self) -> Option<u64> {
        self.first_seq.checked_add(self.segments.len() as u64)
    }

    /// Move the sequence start, renumbering every held segment
    ///
    /// The start is clamped so the newest held segment fits in a `u64`.
    pub fn set_first_seq(&mut self, first_seq: u64) {
        self.first_seq = first_seq.min(self.last_possible_first());
        self.renumber();
    }

    fn last_possible_first(&self) -> u64 {
        u64::MAX - self.segments.len().saturating_sub(1) as u64
    }

    /// Append under the current policy, returning the evicted segment if any
    pub fn push(&mut self, segment: MediaSegment) -> Option<MediaSegment> {
        let evicted = match self.policy {
            EvictionPolicy::Evict { window } if self.segments.len() >= window => {
                self.pop_front()
            }
            _ => None,
        };
        self.push_unbounded(segment);
        evicted
    }

    /// Append regardless of the policy, growing capacity when full
    ///
    /// Once ids run out the held segments shift down so the new one takes
    /// `u64::MAX`.
    pub fn push_unbounded(&mut self, mut segment: MediaSegment) {
        if self.segments.len() >= self.capacity {
            self.grow();
        }
        let seq_id = match self.next_seq() {
            Some(seq_id) => seq_id,
            None => {
                warn!(first_seq = self.first_seq, "segment ids exhausted, renumbering");
                self.first_seq = u64::MAX - self.segments.len() as u64;
                self.renumber();
                u64::MAX
            }
        };
        segment.seq_id = seq_id;
        self.segments.push_back(segment);
    }

    /// Remove the oldest segment; its id is never reissued
    pub fn pop_front(&mut self) -> Option<MediaSegment> {
        let segment = self.segments.pop_front()?;
        self.first_seq = self.first_seq.saturating_add(1);
        Some(segment)
    }

    fn grow(&mut self) {
        let grown = (self.capacity.saturating_mul(2)).max(MIN_GROWTH);
        debug!(from = self.capacity, to = grown, "growing segment buffer");
        self.segments.reserve(grown.saturating_sub(self.segments.len()));
        self.capacity = grown;
    }

    fn renumber(&mut self) {
        let first = self.first_seq;
        for (i, segment) in self.segments.iter_mut().enumerate() {
            segment.seq_id = first + i as u64;
        }
    }

    /// Segment at logical position `index` (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&MediaSegment> {
        self.segments.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut MediaSegment> {
        self.segments.get_mut(index)
    }

    pub fn back(&self) -> Option<&MediaSegment> {
        self.segments.back()
    }

    pub fn back_mut(&mut self) -> Option<&mut MediaSegment> {
        self.segments.back_mut()
    }

    /// Oldest to newest
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, MediaSegment> {
        self.segments.iter()
    }
}
