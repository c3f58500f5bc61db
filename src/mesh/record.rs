//! Geometry records stored in the pool.
//!
//! A record is one line of an exported file: a vertex position (optionally
//! colored), a normal direction, or a quad face referencing earlier records
//! by index.

use std::fmt::Debug;
use std::hash::Hash;

use nalgebra::{Point3, Vector3};

use super::index::{NormalIndex, VertexIndex};

/// The category a record belongs to.
///
/// Indices are relative to a category, and files emit categories in
/// declaration order: vertices, then normals, then faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Vertex positions.
    Vertex,
    /// Vertex normals.
    Normal,
    /// Quad faces.
    Face,
}

impl Category {
    /// All categories in emission order.
    pub const ALL: [Category; 3] = [Category::Vertex, Category::Normal, Category::Face];

    /// Human-readable name, used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Category::Vertex => "vertices",
            Category::Normal => "normals",
            Category::Face => "faces",
        }
    }
}

/// A vertex position with an optional RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// World-space position.
    pub position: Point3<f32>,
    /// Per-vertex color, only carried by formats that store it.
    pub color: Option<[u8; 3]>,
}

/// A vertex normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    /// Normal direction (not necessarily unit length).
    pub direction: Vector3<f32>,
}

/// A quad face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    /// Corner vertices in winding order.
    pub vertices: [VertexIndex; 4],
    /// Per-corner normals, for formats that reference them.
    pub normals: Option<[NormalIndex; 4]>,
}

/// A pool record: one of the three categories with its payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Record {
    /// A vertex record.
    Vertex(Vertex),
    /// A normal record.
    Normal(Normal),
    /// A face record.
    Face(Face),
}

impl Record {
    /// The category of this record.
    pub fn category(&self) -> Category {
        match self {
            Record::Vertex(_) => Category::Vertex,
            Record::Normal(_) => Category::Normal,
            Record::Face(_) => Category::Face,
        }
    }
}

impl From<Vertex> for Record {
    fn from(v: Vertex) -> Self {
        Record::Vertex(v)
    }
}

impl From<Normal> for Record {
    fn from(n: Normal) -> Self {
        Record::Normal(n)
    }
}

impl From<Face> for Record {
    fn from(f: Face) -> Self {
        Record::Face(f)
    }
}

/// Records that can be deduplicated in a pool bucket.
///
/// The key must be equal exactly when every field is bit-identical.
pub(crate) trait PoolEntry: Copy + Debug {
    /// Hashable exact-bits key.
    type Key: Hash + Eq + Debug;

    /// The category this entry lives in.
    const CATEGORY: Category;

    /// Compute the dedup key.
    fn key(&self) -> Self::Key;
}

#[inline]
fn bits3(x: f32, y: f32, z: f32) -> [u32; 3] {
    [x.to_bits(), y.to_bits(), z.to_bits()]
}

impl PoolEntry for Vertex {
    type Key = ([u32; 3], Option<[u8; 3]>);
    const CATEGORY: Category = Category::Vertex;

    fn key(&self) -> Self::Key {
        let p = &self.position;
        (bits3(p.x, p.y, p.z), self.color)
    }
}

impl PoolEntry for Normal {
    type Key = [u32; 3];
    const CATEGORY: Category = Category::Normal;

    fn key(&self) -> Self::Key {
        let d = &self.direction;
        bits3(d.x, d.y, d.z)
    }
}

impl PoolEntry for Face {
    type Key = Face;
    const CATEGORY: Category = Category::Face;

    fn key(&self) -> Self::Key {
        *self
    }
}
