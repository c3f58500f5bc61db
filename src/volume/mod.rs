//! Sparse voxel volumes made of fixed-size blocks.
//!
//! [`VoxelVolume`] is the reference input for the exporter: a map from block
//! coordinates to [`Block`]s, addressed by world voxel position. The
//! exporter itself only needs an iterator of `&Block`, so any other block
//! source works too.
//!
//! # Addressing
//!
//! World voxel `w` belongs to block coordinate `b = ⌊(w + N/2 - 1) / N⌋`
//! (per axis, `N = BLOCK_SIZE`), whose offset is `b * N`. Combined with the
//! mesher frame (local voxel `i` spans `[i, i + 1]`) and the block transform,
//! the exported cube of voxel `w` spans `[w - 0.5, w + 0.5]`.

mod block;

use std::collections::BTreeMap;

pub use block::{
    Block, BlockData, Rgba, BLOCK_SIZE, EMPTY, HALF_BLOCK_OFFSET, MAX_QUADS_PER_BLOCK,
    PADDED_BLOCK_SIZE, PADDED_BLOCK_VOLUME,
};

const N: i32 = BLOCK_SIZE as i32;

/// Largest absolute world coordinate a volume accepts.
///
/// Corners of voxels within this range still land exactly on half-voxel
/// positions in `f32`, and block addressing cannot overflow.
pub const MAX_COORD: i32 = 1 << 22;

/// Returns true if every component of `pos` is within `±MAX_COORD`.
#[inline]
pub fn in_bounds(pos: [i32; 3]) -> bool {
    pos.iter().all(|p| (-MAX_COORD..=MAX_COORD).contains(p))
}

/// Split a world voxel position into its block coordinate and local index.
///
/// Returns `None` for positions outside [`MAX_COORD`].
#[inline]
pub fn locate(pos: [i32; 3]) -> Option<([i32; 3], [i32; 3])> {
    if !in_bounds(pos) {
        return None;
    }
    let shifted = pos.map(|p| p + N / 2 - 1);
    Some((shifted.map(|s| s.div_euclid(N)), shifted.map(|s| s.rem_euclid(N))))
}

/// World position of local voxel `[0, 0, 0]` of the block at `coord`.
#[inline]
fn block_base(coord: [i32; 3]) -> [i32; 3] {
    coord.map(|c| c * N - N / 2 + 1)
}

/// A sparse collection of voxel blocks.
///
/// # Example
///
/// ```
/// use voxport::volume::VoxelVolume;
///
/// let mut volume = VoxelVolume::new();
/// volume.set([0, 0, 0], [255, 0, 0, 255]);
/// volume.set([40, 0, 0], [0, 255, 0, 255]);
///
/// assert_eq!(volume.get([0, 0, 0]), [255, 0, 0, 255]);
/// assert_eq!(volume.block_count(), 2);
/// assert_eq!(volume.voxel_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VoxelVolume {
    blocks: BTreeMap<[i32; 3], Block>,
}

impl VoxelVolume {
    /// Create an empty volume.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the voxel at world position `pos`. Out-of-range positions read
    /// as empty.
    pub fn get(&self, pos: [i32; 3]) -> Rgba {
        match locate(pos) {
            Some((coord, local)) => self.blocks.get(&coord).map_or(EMPTY, |b| b.data().get(local)),
            None => EMPTY,
        }
    }

    /// Set the voxel at world position `pos`.
    ///
    /// Every existing block whose padded border covers `pos` is updated as
    /// well, so neighbouring blocks stay consistent for face culling.
    /// Returns false, leaving the volume untouched, if `pos` is outside
    /// [`MAX_COORD`].
    pub fn set(&mut self, pos: [i32; 3], voxel: Rgba) -> bool {
        let Some((coord, _)) = locate(pos) else {
            return false;
        };

        if !self.blocks.contains_key(&coord) {
            if voxel[3] == 0 {
                return true;
            }
            let block = self.new_block(coord);
            self.blocks.insert(coord, block);
        }

        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let c = [coord[0] + dx, coord[1] + dy, coord[2] + dz];
                    if let Some(block) = self.blocks.get_mut(&c) {
                        let base = block_base(c);
                        let local = [pos[0] - base[0], pos[1] - base[1], pos[2] - base[2]];
                        block.data_mut().set(local, voxel);
                    }
                }
            }
        }
        true
    }

    /// Create a block at `coord` whose border is filled from existing
    /// neighbours.
    fn new_block(&self, coord: [i32; 3]) -> Block {
        let mut block = Block::new(coord.map(|c| c * N));
        let base = block_base(coord);

        for z in -1..=N {
            for y in -1..=N {
                for x in -1..=N {
                    let local = [x, y, z];
                    if BlockData::is_inner(local) {
                        continue;
                    }
                    let voxel = self.get([base[0] + x, base[1] + y, base[2] + z]);
                    if voxel[3] != 0 {
                        block.data_mut().set(local, voxel);
                    }
                }
            }
        }

        block
    }

    /// Iterate blocks in block-coordinate order.
    pub fn blocks(&self) -> impl ExactSizeIterator<Item = &Block> + '_ {
        self.blocks.values()
    }

    /// Number of allocated blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of non-empty voxels.
    pub fn voxel_count(&self) -> usize {
        self.blocks.values().map(|b| b.data().solid_count()).sum()
    }

    /// Returns true if the volume has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl FromIterator<([i32; 3], Rgba)> for VoxelVolume {
    fn from_iter<T: IntoIterator<Item = ([i32; 3], Rgba)>>(iter: T) -> Self {
        let mut volume = VoxelVolume::new();
        for (pos, voxel) in iter {
            volume.set(pos, voxel);
        }
        volume
    }
}
