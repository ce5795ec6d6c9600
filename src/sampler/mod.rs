//! Bounded random sampling of representative frames
//!
//! Indices are drawn uniformly from the middle of the video (10th to 90th
//! percentile of the frame count) so intros and outros are skipped. Drawing
//! stops once enough unique indices were accepted or the attempt budget is
//! spent, whichever comes first; a short result is not an error.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use crate::domain::model::FrameSampleSet;
use crate::error::{VidprepError, VidprepResult};

/// Draw attempts before sampling gives up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;
/// Lower edge of the sampling window, as a fraction of the frame count
pub const DEFAULT_MIN_PERCENTILE: f64 = 0.10;
/// Upper edge of the sampling window, as a fraction of the frame count
pub const DEFAULT_MAX_PERCENTILE: f64 = 0.90;

/// Frame sampler configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSampler {
    min_percentile: f64,
    max_percentile: f64,
    max_attempts: u32,
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self {
            min_percentile: DEFAULT_MIN_PERCENTILE,
            max_percentile: DEFAULT_MAX_PERCENTILE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl FrameSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Override the percentile window; both ends are fractions in `[0, 1]`
    pub fn with_window(mut self, min_percentile: f64, max_percentile: f64) -> VidprepResult<Self> {
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        if !in_unit(min_percentile) || !in_unit(max_percentile) || min_percentile > max_percentile
        {
            return Err(VidprepError::InvalidArgument(format!(
                "sampling window [{}, {}] must lie within [0, 1] and be ordered",
                min_percentile, max_percentile
            )));
        }
        self.min_percentile = min_percentile;
        self.max_percentile = max_percentile;
        Ok(self)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Inclusive `(min, max)` index bounds for a video of `total_frames`
    pub fn window(&self, total_frames: u64) -> (u64, u64) {
        let total = total_frames as f64;
        let last = total_frames.saturating_sub(1);
        (
            ((self.min_percentile * total).floor() as u64).min(last),
            ((self.max_percentile * total).floor() as u64).min(last),
        )
    }

    /// Start an incremental draw, for callers that need to try each index
    /// (for instance by decoding it) before keeping it
    pub fn begin(&self, total_frames: u64, amount: usize) -> SampleDraw {
        let (min_bound, max_bound) = self.window(total_frames);
        SampleDraw {
            min_bound,
            max_bound,
            // no frames, nothing to draw
            amount: if total_frames == 0 { 0 } else { amount },
            max_attempts: self.max_attempts,
            attempts: 0,
            indices: BTreeSet::new(),
        }
    }

    /// Sample indices, accepting every draw
    pub fn sample<R: Rng + ?Sized>(
        &self,
        total_frames: u64,
        amount: usize,
        rng: &mut R,
    ) -> FrameSampleSet {
        self.sample_with(total_frames, amount, rng, |_| true)
    }

    /// Sample indices, keeping only those for which `accept` returns true.
    ///
    /// A rejected index is not kept and its draw still counts against the
    /// attempt budget.
    pub fn sample_with<R, F>(
        &self,
        total_frames: u64,
        amount: usize,
        rng: &mut R,
        mut accept: F,
    ) -> FrameSampleSet
    where
        R: Rng + ?Sized,
        F: FnMut(u64) -> bool,
    {
        let mut draw = self.begin(total_frames, amount);
        while let Some(index) = draw.next_candidate(rng) {
            if accept(index) {
                draw.accept(index);
            }
        }
        draw.finish()
    }
}

/// In-progress sampling run
#[derive(Debug, Clone)]
pub struct SampleDraw {
    min_bound: u64,
    max_bound: u64,
    amount: usize,
    max_attempts: u32,
    attempts: u32,
    indices: BTreeSet<u64>,
}

impl SampleDraw {
    /// Draw until an index not yet accepted comes up. Returns `None` once the
    /// set is full or the attempt budget is exhausted.
    pub fn next_candidate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u64> {
        while !self.is_done() {
            self.attempts += 1;
            let index = rng.gen_range(self.min_bound..=self.max_bound);
            if !self.indices.contains(&index) {
                return Some(index);
            }
        }
        None
    }

    /// Keep a drawn index. Returns false if it was already kept.
    pub fn accept(&mut self, index: u64) -> bool {
        self.indices.insert(index)
    }

    pub fn is_done(&self) -> bool {
        self.indices.len() >= self.amount || self.attempts >= self.max_attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn finish(self) -> FrameSampleSet {
        debug!(
            sampled = self.indices.len(),
            requested = self.amount,
            attempts = self.attempts,
            "Frame sampling finished"
        );
        FrameSampleSet {
            indices: self.indices,
            min_bound: self.min_bound,
            max_bound: self.max_bound,
            attempts: self.attempts,
        }
    }
}
