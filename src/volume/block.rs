//! Fixed-size voxel blocks.
//!
//! A block is a `BLOCK_SIZE`³ cube of RGBA voxels at an integer offset. Its
//! payload is stored padded by one voxel on every side: the border mirrors
//! the neighbouring blocks so a mesher can decide face visibility at block
//! edges without looking anything up.

/// Edge length of a block, in voxels.
pub const BLOCK_SIZE: usize = 16;

/// Edge length of a padded block payload.
pub const PADDED_BLOCK_SIZE: usize = BLOCK_SIZE + 2;

/// Number of cells in a padded block payload.
pub const PADDED_BLOCK_VOLUME: usize = PADDED_BLOCK_SIZE * PADDED_BLOCK_SIZE * PADDED_BLOCK_SIZE;

/// Centering translation applied on each axis after the block offset.
///
/// The half size uses integer division, so odd block sizes round toward zero
/// before the half-voxel shift.
pub const HALF_BLOCK_OFFSET: f32 = -((BLOCK_SIZE / 2) as f32) + 0.5;

/// Upper bound on the quads a mesher can produce for one block: six faces
/// for every voxel.
pub const MAX_QUADS_PER_BLOCK: usize = 6 * BLOCK_SIZE * BLOCK_SIZE * BLOCK_SIZE;

/// An RGBA voxel color. Alpha 0 marks an empty voxel.
pub type Rgba = [u8; 4];

/// The empty voxel.
pub const EMPTY: Rgba = [0, 0, 0, 0];

/// Padded voxel payload of one block.
///
/// Local coordinates run from `-1` to `BLOCK_SIZE` inclusive on every axis;
/// `0..BLOCK_SIZE` is the block itself, the rest is neighbour data.
#[derive(Clone, PartialEq, Eq)]
pub struct BlockData {
    voxels: Box<[Rgba]>,
}

impl Default for BlockData {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockData {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self {
            voxels: vec![EMPTY; PADDED_BLOCK_VOLUME].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(local: [i32; 3]) -> Option<usize> {
        let mut idx = 0;
        for axis in (0..3).rev() {
            let p = local[axis] + 1;
            if p < 0 || p >= PADDED_BLOCK_SIZE as i32 {
                return None;
            }
            idx = idx * PADDED_BLOCK_SIZE + p as usize;
        }
        Some(idx)
    }

    /// Returns true if `local` lies inside the block itself (not the border).
    #[inline]
    pub fn is_inner(local: [i32; 3]) -> bool {
        local.iter().all(|&c| c >= 0 && c < BLOCK_SIZE as i32)
    }

    /// Get the voxel at padded local coordinates. Anything outside the
    /// padded range reads as empty.
    #[inline]
    pub fn get(&self, local: [i32; 3]) -> Rgba {
        Self::index(local).map_or(EMPTY, |i| self.voxels[i])
    }

    /// Set the voxel at padded local coordinates.
    ///
    /// Returns false if `local` is outside the padded range.
    #[inline]
    pub fn set(&mut self, local: [i32; 3], voxel: Rgba) -> bool {
        match Self::index(local) {
            Some(i) => {
                self.voxels[i] = voxel;
                true
            }
            None => false,
        }
    }

    /// Returns true if the voxel at `local` is empty.
    #[inline]
    pub fn is_empty_at(&self, local: [i32; 3]) -> bool {
        self.get(local)[3] == 0
    }

    /// Number of non-empty voxels inside the block (border excluded).
    pub fn solid_count(&self) -> usize {
        let n = BLOCK_SIZE as i32;
        let mut count = 0;
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    if !self.is_empty_at([x, y, z]) {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

impl std::fmt::Debug for BlockData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockData")
            .field("solid_count", &self.solid_count())
            .finish_non_exhaustive()
    }
}

/// A block of voxels at an integer offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    offset: [i32; 3],
    data: BlockData,
}

impl Block {
    /// Create an empty block at `offset`.
    pub fn new(offset: [i32; 3]) -> Self {
        Self::with_data(offset, BlockData::new())
    }

    /// Create a block from an existing payload.
    pub fn with_data(offset: [i32; 3], data: BlockData) -> Self {
        Self { offset, data }
    }

    /// Integer offset of the block in voxel-grid coordinates.
    #[inline]
    pub fn offset(&self) -> [i32; 3] {
        self.offset
    }

    /// The padded voxel payload.
    #[inline]
    pub fn data(&self) -> &BlockData {
        &self.data
    }

    /// Mutable access to the padded voxel payload.
    #[inline]
    pub fn data_mut(&mut self) -> &mut BlockData {
        &mut self.data
    }
}
