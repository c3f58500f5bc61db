//! Per-block progress for exports.
//!
//! Building a pool walks every block of a volume. The `*_with_progress`
//! entry points hand a [`BlockProgress`] snapshot to the callback once each
//! block's quads have been added to the pool.
//!
//! # Example
//!
//! ```
//! use voxport::progress::{BlockProgress, Progress};
//!
//! let progress = Progress::new(|p: &BlockProgress| {
//!     println!("block {}/{} at {:?}: {} quads", p.blocks_done, p.blocks_total, p.offset, p.quads);
//! });
//! progress.report(&BlockProgress {
//!     blocks_done: 1,
//!     blocks_total: 4,
//!     offset: [0, 0, 0],
//!     quads: 6,
//!     quads_total: 6,
//! });
//! ```

/// Snapshot taken after one block has been meshed into the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockProgress {
    /// Blocks finished so far, including this one.
    pub blocks_done: usize,
    /// Blocks in the export. Never less than `blocks_done`.
    pub blocks_total: usize,
    /// World offset of the block just finished.
    pub offset: [i32; 3],
    /// Quads the generator produced for this block.
    pub quads: usize,
    /// Quads produced so far across all blocks.
    pub quads_total: usize,
}

impl BlockProgress {
    /// Finished share of the export in `[0, 1]`. An empty export is complete.
    pub fn fraction(&self) -> f32 {
        if self.blocks_total == 0 {
            1.0
        } else {
            self.blocks_done as f32 / self.blocks_total as f32
        }
    }

    /// True once the last block has been reported.
    pub fn is_finished(&self) -> bool {
        self.blocks_done >= self.blocks_total
    }
}

/// A progress callback invoked once per exported block.
pub struct Progress {
    callback: Box<dyn Fn(&BlockProgress) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&BlockProgress) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report a finished block.
    #[inline]
    pub fn report(&self, block: &BlockProgress) {
        (self.callback)(block);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
