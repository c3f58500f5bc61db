//! Meshes read back from exported files.

use nalgebra::{Point3, Vector3};

use crate::error::{ExportError, Result};

/// A polygon read from a file, with 0-based indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFace {
    /// Vertex indices in winding order.
    pub vertices: Vec<usize>,
    /// Per-corner normal indices, when the file stores them.
    pub normals: Option<Vec<usize>>,
}

/// A polygon mesh read from an OBJ or PLY file.
///
/// Readers keep the file's element order, so vertex `i` of an export is
/// `positions[i]` here. `colors` is either empty or parallel to `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f32>>,
    /// Vertex normals.
    pub normals: Vec<Vector3<f32>>,
    /// Per-vertex RGB colors.
    pub colors: Vec<[u8; 3]>,
    /// Faces.
    pub faces: Vec<ParsedFace>,
}

impl ParsedMesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of normals.
    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned bounds of the vertex positions, or `None` if there are
    /// no vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    /// Check every face index against the element counts.
    pub fn validate(&self) -> Result<()> {
        for (face, f) in self.faces.iter().enumerate() {
            check(face, &f.vertices, self.positions.len())?;
            if let Some(normals) = &f.normals {
                check(face, normals, self.normals.len())?;
            }
        }
        Ok(())
    }
}

fn check(face: usize, indices: &[usize], count: usize) -> Result<()> {
    match indices.iter().find(|&&i| i >= count) {
        Some(&index) => Err(ExportError::InvalidIndex { face, index, count }),
        None => Ok(()),
    }
}
