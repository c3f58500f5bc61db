//! The intermediate mesh model shared by both exporters.
//!
//! # Overview
//!
//! The primary type is [`RecordPool`], a deduplicating store of geometry
//! [`Record`]s discovered while walking voxel blocks. Each record belongs
//! to a [`Category`] (vertex, normal or face) and receives a 1-based index
//! within that category the first time it is inserted. Inserting an
//! identical record again returns the existing index, so shared corners
//! between adjacent quads collapse into one vertex.
//!
//! # Index Types
//!
//! Records are identified by type-safe, 1-based index wrappers:
//! - [`VertexIndex`] - Identifies a vertex
//! - [`NormalIndex`] - Identifies a normal
//! - [`FaceIndex`] - Identifies a face
//!
//! # Coordinates
//!
//! Quad corners arrive in a block's local frame. [`BlockTransform`] moves
//! them into the world frame shared by all blocks before they enter the
//! pool.
//!
//! ```
//! use voxport::mesh::{RecordPool, Vertex, to_world};
//! use nalgebra::Point3;
//!
//! let mut pool = RecordPool::new();
//! let position = to_world([16, 0, 0], &Point3::new(0.0, 0.0, 0.0));
//! let a = pool.insert_vertex(Vertex { position, color: None }).unwrap();
//! let b = pool.insert_vertex(Vertex { position, color: None }).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.get(), 1);
//! ```

mod index;
mod pool;
mod record;
mod transform;

pub use index::{FaceIndex, NormalIndex, VertexIndex};
pub use pool::RecordPool;
pub use record::{Category, Face, Normal, Record, Vertex};
pub use transform::{to_world, BlockTransform};
