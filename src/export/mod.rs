//! Building the export record pool from voxel blocks.
//!
//! For every block the orchestrator asks a [`QuadGenerator`] for the block's
//! quads, moves each corner into world space, and inserts the resulting
//! vertex, normal and face records into a [`RecordPool`]. The two output
//! formats want different records:
//!
//! | Format | Vertex record | Normals | Face record |
//! |--------|---------------|---------|-------------|
//! | OBJ    | position only | yes     | vertex + normal indices |
//! | PLY    | position + RGB | no     | vertex indices |
//!
//! The pool keeps each category in its own list, so once every block has
//! been processed the records are already grouped vertices → normals → faces
//! in insertion order and can be written directly.
//!
//! # Example
//!
//! ```
//! use voxport::export::{build_obj_pool, ExportOptions};
//! use voxport::mesh::Category;
//! use voxport::mesher::CulledMesher;
//! use voxport::volume::VoxelVolume;
//!
//! let mut volume = VoxelVolume::new();
//! volume.set([0, 0, 0], [255, 0, 0, 255]);
//!
//! let pool = build_obj_pool(volume.blocks(), &CulledMesher, &ExportOptions::default()).unwrap();
//! assert_eq!(pool.count(Category::Vertex), 8);
//! assert_eq!(pool.count(Category::Normal), 6);
//! assert_eq!(pool.count(Category::Face), 6);
//! ```

mod options;

use log::{debug, trace};

pub use options::ExportOptions;

use crate::error::{ExportError, Result};
use crate::io::Format;
use crate::mesh::{BlockTransform, Face, Normal, RecordPool, Vertex};
use crate::mesher::{Corner, FaceMask, QuadGenerator};
use crate::progress::{BlockProgress, Progress};
use crate::volume::{Block, BlockData, MAX_QUADS_PER_BLOCK};

/// Reusable corner buffer sized for the worst-case quads of one block.
///
/// Allocated once per export and handed to the generator for every block.
#[derive(Debug)]
pub struct ScratchBuffer {
    corners: Vec<Corner>,
}

impl ScratchBuffer {
    /// Allocate a buffer for [`MAX_QUADS_PER_BLOCK`] quads.
    pub fn new() -> Result<Self> {
        Self::with_quad_capacity(MAX_QUADS_PER_BLOCK)
    }

    /// Allocate a buffer for `quads` quads.
    pub fn with_quad_capacity(quads: usize) -> Result<Self> {
        let len = quads
            .checked_mul(4)
            .ok_or_else(|| ExportError::out_of_memory("scratch buffer", usize::MAX))?;
        let mut corners = Vec::new();
        corners
            .try_reserve_exact(len)
            .map_err(|_| ExportError::out_of_memory("scratch buffer", len))?;
        corners.resize(len, Corner::default());
        Ok(Self { corners })
    }

    /// Number of quads the buffer holds.
    pub fn quad_capacity(&self) -> usize {
        self.corners.len() / 4
    }

    /// Run `generator` on `data` and return the corners it produced.
    ///
    /// Fails with [`ExportError::MalformedInput`] if the generator reports
    /// more quads than the buffer holds.
    pub fn fill<G: QuadGenerator + ?Sized>(
        &mut self,
        generator: &G,
        data: &BlockData,
        mask: FaceMask,
    ) -> Result<&[Corner]> {
        let quads = generator.generate(data, mask, &mut self.corners);
        let capacity = self.quad_capacity();
        if quads > capacity {
            return Err(ExportError::MalformedInput { quads, capacity });
        }
        Ok(&self.corners[..quads * 4])
    }
}

/// Build the OBJ record pool: positions, normals, and faces referencing both.
pub fn build_obj_pool<'a, I, G>(blocks: I, generator: &G, options: &ExportOptions) -> Result<RecordPool>
where
    I: IntoIterator<Item = &'a Block>,
    G: QuadGenerator + ?Sized,
{
    build_pool(blocks, generator, Format::Obj, options, &Progress::none())
}

/// Build the OBJ record pool with progress reporting.
pub fn build_obj_pool_with_progress<'a, I, G>(
    blocks: I,
    generator: &G,
    options: &ExportOptions,
    progress: &Progress,
) -> Result<RecordPool>
where
    I: IntoIterator<Item = &'a Block>,
    G: QuadGenerator + ?Sized,
{
    build_pool(blocks, generator, Format::Obj, options, progress)
}

/// Build the PLY record pool: colored positions and vertex-only faces.
pub fn build_ply_pool<'a, I, G>(blocks: I, generator: &G, options: &ExportOptions) -> Result<RecordPool>
where
    I: IntoIterator<Item = &'a Block>,
    G: QuadGenerator + ?Sized,
{
    build_pool(blocks, generator, Format::Ply, options, &Progress::none())
}

/// Build the PLY record pool with progress reporting.
pub fn build_ply_pool_with_progress<'a, I, G>(
    blocks: I,
    generator: &G,
    options: &ExportOptions,
    progress: &Progress,
) -> Result<RecordPool>
where
    I: IntoIterator<Item = &'a Block>,
    G: QuadGenerator + ?Sized,
{
    build_pool(blocks, generator, Format::Ply, options, progress)
}

/// Build the record pool for `format`.
pub fn build_pool<'a, I, G>(
    blocks: I,
    generator: &G,
    format: Format,
    options: &ExportOptions,
    progress: &Progress,
) -> Result<RecordPool>
where
    I: IntoIterator<Item = &'a Block>,
    G: QuadGenerator + ?Sized,
{
    let mut scratch = ScratchBuffer::new()?;
    build_pool_in(blocks, generator, format, options, progress, &mut scratch)
}

fn build_pool_in<'a, I, G>(
    blocks: I,
    generator: &G,
    format: Format,
    options: &ExportOptions,
    progress: &Progress,
    scratch: &mut ScratchBuffer,
) -> Result<RecordPool>
where
    I: IntoIterator<Item = &'a Block>,
    G: QuadGenerator + ?Sized,
{
    let blocks = blocks.into_iter();
    let total = blocks.size_hint().0;
    let mut pool = RecordPool::new();
    let mut quad_total = 0;

    for (done, block) in blocks.enumerate() {
        let corners = scratch.fill(generator, block.data(), options.faces)?;
        let transform = BlockTransform::new(block.offset());

        for quad in corners.chunks_exact(4) {
            match format {
                Format::Obj => add_obj_quad(&mut pool, &transform, quad)?,
                Format::Ply => add_ply_quad(&mut pool, &transform, quad)?,
            }
        }

        let quads = corners.len() / 4;
        quad_total += quads;
        trace!("block {:?}: {} quads", block.offset(), quads);
        progress.report(&BlockProgress {
            blocks_done: done + 1,
            blocks_total: total.max(done + 1),
            offset: block.offset(),
            quads,
            quads_total: quad_total,
        });
    }

    debug!(
        "{:?} pool: {} quads -> {} vertices, {} normals, {} faces",
        format,
        quad_total,
        pool.vertices().len(),
        pool.normals().len(),
        pool.faces().len()
    );
    Ok(pool)
}

fn add_obj_quad(pool: &mut RecordPool, transform: &BlockTransform, quad: &[Corner]) -> Result<()> {
    let mut vertices = Vec::with_capacity(4);
    for corner in quad {
        let position = transform.to_world(&corner.position);
        vertices.push(pool.insert_vertex(Vertex { position, color: None })?);
    }

    let mut normals = Vec::with_capacity(4);
    for corner in quad {
        let direction = transform.normal_to_world(&corner.normal);
        normals.push(pool.insert_normal(Normal { direction })?);
    }

    pool.insert_face(Face {
        vertices: [vertices[0], vertices[1], vertices[2], vertices[3]],
        normals: Some([normals[0], normals[1], normals[2], normals[3]]),
    })?;
    Ok(())
}

fn add_ply_quad(pool: &mut RecordPool, transform: &BlockTransform, quad: &[Corner]) -> Result<()> {
    let mut vertices = Vec::with_capacity(4);
    for corner in quad {
        let position = transform.to_world(&corner.position);
        let [r, g, b, _] = corner.color;
        vertices.push(pool.insert_vertex(Vertex { position, color: Some([r, g, b]) })?);
    }

    pool.insert_face(Face {
        vertices: [vertices[0], vertices[1], vertices[2], vertices[3]],
        normals: None,
    })?;
    Ok(())
}
