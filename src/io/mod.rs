//! Mesh file I/O.
//!
//! This module writes record pools to disk and reads exported files back.
//!
//! # Supported Formats
//!
//! | Format | Extension | Export | Load | Notes |
//! |--------|-----------|--------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Positions, normals, quads; no color |
//! | PLY | `.ply` | ✓ | ✓ | ASCII, per-vertex RGB, quads |
//! | Voxel list | `.txt` | ✗ | ✓ | `X Y Z RRGGBB` input for the exporter |
//!
//! # Usage
//!
//! The easiest way to export is with automatic format detection:
//!
//! ```no_run
//! use voxport::export::ExportOptions;
//! use voxport::io::{export, load, txt};
//! use voxport::mesher::CulledMesher;
//!
//! let volume = txt::load("scene.txt").unwrap();
//! export(volume.blocks(), &CulledMesher, "scene.ply", &ExportOptions::default()).unwrap();
//!
//! let mesh = load("scene.ply").unwrap();
//! println!("{} faces", mesh.face_count());
//! ```
//!
//! The format modules can also be used directly with a pool built by
//! [`crate::export`]:
//!
//! ```no_run
//! use voxport::export::{build_obj_pool, ExportOptions};
//! use voxport::io::obj;
//! use voxport::mesher::CulledMesher;
//! use voxport::volume::VoxelVolume;
//!
//! let volume = VoxelVolume::new();
//! let options = ExportOptions::default();
//! let pool = build_obj_pool(volume.blocks(), &CulledMesher, &options).unwrap();
//! obj::save(&pool, "scene.obj", &options).unwrap();
//! ```

mod number;
pub mod obj;
mod parsed;
pub mod ply;
pub mod txt;

use std::path::Path;

use log::info;

use crate::error::{ExportError, Result};
use crate::export::{build_pool, ExportOptions};
use crate::mesh::RecordPool;
use crate::mesher::QuadGenerator;
use crate::progress::Progress;
use crate::volume::Block;

pub use number::Compact;
pub use parsed::{ParsedFace, ParsedMesh};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Obj => "obj",
            Format::Ply => "ply",
        }
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| ExportError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Mesh `blocks` and save them to `path`, choosing the format from the
/// file extension.
///
/// Returns the record pool that was written.
pub fn export<'a, I, G, P>(blocks: I, generator: &G, path: P, options: &ExportOptions) -> Result<RecordPool>
where
    I: IntoIterator<Item = &'a Block>,
    G: QuadGenerator + ?Sized,
    P: AsRef<Path>,
{
    export_with_progress(blocks, generator, path, options, &Progress::none())
}

/// Like [`export`], reporting progress after each block.
pub fn export_with_progress<'a, I, G, P>(
    blocks: I,
    generator: &G,
    path: P,
    options: &ExportOptions,
    progress: &Progress,
) -> Result<RecordPool>
where
    I: IntoIterator<Item = &'a Block>,
    G: QuadGenerator + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let format = detect(path)?;

    // Nothing is written until the whole pool is built.
    let pool = build_pool(blocks, generator, format, options, progress)?;
    save(&pool, format, path, options)?;

    info!(
        "wrote {} ({} vertices, {} normals, {} faces)",
        path.display(),
        pool.vertices().len(),
        pool.normals().len(),
        pool.faces().len()
    );
    Ok(pool)
}

/// Save a pool in the given format.
pub fn save<P: AsRef<Path>>(pool: &RecordPool, format: Format, path: P, options: &ExportOptions) -> Result<()> {
    match format {
        Format::Obj => obj::save(pool, path, options),
        Format::Ply => ply::save(pool, path, options),
    }
}

/// Load an exported mesh with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use voxport::io::load;
///
/// let mesh = load("scene.obj").unwrap();
/// println!("{} vertices", mesh.vertex_count());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<ParsedMesh> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Ply => ply::load(path),
    }
}

/// Attach `path` to a parse error raised before the file name was known.
pub(crate) fn relocate(err: ExportError, path: &Path) -> ExportError {
    match err {
        ExportError::LoadError { message, .. } => ExportError::load(path, message),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::CulledMesher;
    use crate::volume::VoxelVolume;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/scene.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("scene.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("scene.stl"), None);
        assert_eq!(Format::from_path("scene"), None);
        assert_eq!(Format::Ply.extension(), "ply");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.stl");
        let blocks: Vec<Block> = Vec::new();
        let err = export(&blocks, &CulledMesher, &path, &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat { ref extension } if extension == "stl"));
        assert!(!path.exists());

        let err = load(dir.path().join("noext")).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat { ref extension } if extension == "(none)"));
    }

    #[test]
    fn test_export_and_load_cube() {
        let dir = tempfile::tempdir().unwrap();
        let mut volume = VoxelVolume::new();
        volume.set([0, 0, 0], [255, 0, 0, 255]);

        for name in ["cube.obj", "cube.ply"] {
            let path = dir.path().join(name);
            let pool = export(volume.blocks(), &CulledMesher, &path, &ExportOptions::default()).unwrap();
            let mesh = load(&path).unwrap();

            assert_eq!(mesh.vertex_count(), pool.vertices().len());
            assert_eq!(mesh.vertex_count(), 8);
            assert_eq!(mesh.face_count(), 6);

            let (lo, hi) = mesh.bounding_box().unwrap();
            assert_eq!(lo, nalgebra::Point3::new(-0.5, -0.5, -0.5));
            assert_eq!(hi, nalgebra::Point3::new(0.5, 0.5, 0.5));
        }
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("scene.obj");
        let blocks: Vec<Block> = Vec::new();
        let err = export(&blocks, &CulledMesher, &path, &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
