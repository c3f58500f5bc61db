//! # Voxport
//!
//! Export block-based voxel volumes to Wavefront OBJ and ASCII PLY.
//!
//! Voxport walks the blocks of a voxel volume, asks a quad generator for the
//! visible faces of each block, and collects the resulting vertices, normals
//! and faces in a deduplicating record pool. The pool is then written in one
//! of two text formats.
//!
//! ## Features
//!
//! - **Deduplicated output**: identical corners, normals and faces are stored
//!   once and referenced by stable 1-based indices
//! - **Two formats**: OBJ with per-corner normals, PLY with per-vertex color
//! - **Pluggable meshing**: any [`QuadGenerator`](mesher::QuadGenerator) can
//!   drive the export; [`CulledMesher`](mesher::CulledMesher) is included
//! - **Readers**: load exported files back for inspection and testing
//!
//! ## Quick Start
//!
//! ```no_run
//! use voxport::prelude::*;
//!
//! // Load voxels from a text list
//! let volume = voxport::io::txt::load("scene.txt").unwrap();
//!
//! // Export with automatic format detection
//! let options = ExportOptions::default();
//! let pool = voxport::io::export(volume.blocks(), &CulledMesher, "scene.obj", &options).unwrap();
//! println!("Vertices: {}", pool.count(Category::Vertex));
//! ```
//!
//! ## Building a Pool in Memory
//!
//! ```
//! use voxport::prelude::*;
//!
//! let mut volume = VoxelVolume::new();
//! volume.set([0, 0, 0], [255, 0, 0, 255]);
//! volume.set([1, 0, 0], [255, 0, 0, 255]);
//!
//! let pool = build_ply_pool(volume.blocks(), &CulledMesher, &ExportOptions::default()).unwrap();
//! // Two touching cubes: 10 visible faces over 12 distinct corners.
//! assert_eq!(pool.count(Category::Face), 10);
//! assert_eq!(pool.count(Category::Vertex), 12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod export;
pub mod io;
pub mod mesh;
pub mod mesher;
pub mod progress;
pub mod volume;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use voxport::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ExportError, Result};
    pub use crate::export::{build_obj_pool, build_ply_pool, ExportOptions};
    pub use crate::io::{Format, ParsedMesh};
    pub use crate::mesh::{Category, Face, Normal, Record, RecordPool, Vertex};
    pub use crate::mesher::{CulledMesher, FaceMask, QuadGenerator};
    pub use crate::progress::{BlockProgress, Progress};
    pub use crate::volume::{Block, BlockData, VoxelVolume, BLOCK_SIZE};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_cube_across_block_boundary() {
        // A 2x2x2 cube straddling the x boundary between blocks 0 and 1.
        let n = BLOCK_SIZE as i32;
        let x0 = n / 2;
        let mut volume = VoxelVolume::new();
        for z in 0..2 {
            for y in 0..2 {
                for x in x0..x0 + 2 {
                    volume.set([x, y, z], [10, 20, 30, 255]);
                }
            }
        }
        assert_eq!(volume.block_count(), 2);

        let pool = build_obj_pool(volume.blocks(), &CulledMesher, &ExportOptions::default()).unwrap();

        // Interior faces on the block boundary are culled: 6 sides x 4 quads.
        assert_eq!(pool.count(Category::Face), 24);
        // 3x3x3 lattice minus the hidden center point.
        assert_eq!(pool.count(Category::Vertex), 26);
        assert_eq!(pool.count(Category::Normal), 6);

        let xs: Vec<f32> = pool.vertices().map(|v| v.position.x).collect();
        let min = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, x0 as f32 - 0.5);
        assert_eq!(max, x0 as f32 + 1.5);
    }

    #[test]
    fn test_face_mask_limits_output() {
        let mut volume = VoxelVolume::new();
        volume.set([3, 3, 3], [1, 1, 1, 255]);

        let options = ExportOptions::default().with_faces("+z".parse().unwrap());
        let pool = build_obj_pool(volume.blocks(), &CulledMesher, &options).unwrap();
        assert_eq!(pool.count(Category::Face), 1);

        let face = *pool.faces().next().unwrap();
        for v in face.vertices {
            assert_eq!(pool.vertex(v).unwrap().position.z, 3.5);
        }
    }
}
