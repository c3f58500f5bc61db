//! The deduplicating record pool.
//!
//! Each category is an insertion-ordered [`IndexMap`] from the record's exact
//! bit pattern to the record. Inserting a record that is already present
//! returns the existing index; anything else is appended. Because categories
//! never share storage, emitting "all vertices, then all normals, then all
//! faces" needs no reordering, and an index handed out once stays valid for
//! the lifetime of the pool.

use indexmap::map::{Entry, IndexMap};

use super::index::{FaceIndex, NormalIndex, VertexIndex};
use super::record::{Category, Face, Normal, PoolEntry, Record, Vertex};
use crate::error::{ExportError, Result};

/// Insertion-ordered, deduplicated storage for one category.
#[derive(Debug)]
struct Bucket<T: PoolEntry> {
    items: IndexMap<T::Key, T>,
}

impl<T: PoolEntry> Default for Bucket<T> {
    fn default() -> Self {
        Self { items: IndexMap::new() }
    }
}

impl<T: PoolEntry> Bucket<T> {
    /// Return the 1-based ordinal of `item`, appending it if it is new.
    fn find_or_insert(&mut self, item: T) -> Result<usize> {
        let key = item.key();
        if let Some(position) = self.items.get_index_of(&key) {
            return Ok(position + 1);
        }

        if self.items.len() >= u32::MAX as usize {
            return Err(ExportError::out_of_memory(T::CATEGORY.name(), 1));
        }
        self.items
            .try_reserve(1)
            .map_err(|_| ExportError::out_of_memory(T::CATEGORY.name(), 1))?;

        let position = match self.items.entry(key) {
            Entry::Occupied(entry) => entry.index(),
            Entry::Vacant(entry) => {
                let position = entry.index();
                entry.insert(item);
                position
            }
        };
        Ok(position + 1)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, ordinal: usize) -> Option<&T> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.items.get_index(i))
            .map(|(_, item)| item)
    }

    fn iter(&self) -> indexmap::map::Values<'_, T::Key, T> {
        self.items.values()
    }
}

/// Deduplicating store of vertex, normal and face records.
///
/// # Example
///
/// ```
/// use voxport::mesh::{Category, Normal, RecordPool};
/// use nalgebra::Vector3;
///
/// let mut pool = RecordPool::new();
/// let up = Normal { direction: Vector3::new(0.0, 1.0, 0.0) };
///
/// let a = pool.insert_normal(up).unwrap();
/// let b = pool.insert_normal(up).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.get(), 1);
/// assert_eq!(pool.count(Category::Normal), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordPool {
    vertices: Bucket<Vertex>,
    normals: Bucket<Normal>,
    faces: Bucket<Face>,
}

impl RecordPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find `record` among the records of its category, inserting it if it is
    /// not there yet. Returns its 1-based index within the category.
    ///
    /// Faces are checked like [`insert_face`](Self::insert_face).
    pub fn find_or_insert(&mut self, record: Record) -> Result<usize> {
        match record {
            Record::Vertex(v) => self.vertices.find_or_insert(v),
            Record::Normal(n) => self.normals.find_or_insert(n),
            Record::Face(f) => self.insert_face(f).map(FaceIndex::get),
        }
    }

    /// Insert a vertex, returning its index.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> Result<VertexIndex> {
        let ordinal = self.vertices.find_or_insert(vertex)?;
        VertexIndex::new(ordinal).ok_or_else(|| ExportError::out_of_memory("vertices", 1))
    }

    /// Insert a normal, returning its index.
    pub fn insert_normal(&mut self, normal: Normal) -> Result<NormalIndex> {
        let ordinal = self.normals.find_or_insert(normal)?;
        NormalIndex::new(ordinal).ok_or_else(|| ExportError::out_of_memory("normals", 1))
    }

    /// Insert a face, returning its index.
    ///
    /// Every vertex and normal the face references must already be in the
    /// pool; otherwise this fails with [`ExportError::InvalidIndex`] and the
    /// pool is left unchanged.
    pub fn insert_face(&mut self, face: Face) -> Result<FaceIndex> {
        self.check_face(&face)?;
        let ordinal = self.faces.find_or_insert(face)?;
        FaceIndex::new(ordinal).ok_or_else(|| ExportError::out_of_memory("faces", 1))
    }

    fn check_face(&self, face: &Face) -> Result<()> {
        let at = self.faces.len();
        let vertices = self.vertices.len();
        if let Some(v) = face.vertices.iter().find(|v| v.get() > vertices) {
            return Err(ExportError::InvalidIndex { face: at, index: v.zero_based(), count: vertices });
        }
        let normals = self.normals.len();
        if let Some(n) = face.normals.iter().flatten().find(|n| n.get() > normals) {
            return Err(ExportError::InvalidIndex { face: at, index: n.zero_based(), count: normals });
        }
        Ok(())
    }

    /// Number of records stored in `category`.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Vertex => self.vertices.len(),
            Category::Normal => self.normals.len(),
            Category::Face => self.faces.len(),
        }
    }

    /// Total number of records across all categories.
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|&c| self.count(c)).sum()
    }

    /// Returns true if the pool holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = &Vertex> + DoubleEndedIterator + Clone + '_ {
        self.vertices.iter()
    }

    /// Normals in insertion order.
    pub fn normals(&self) -> impl ExactSizeIterator<Item = &Normal> + DoubleEndedIterator + Clone + '_ {
        self.normals.iter()
    }

    /// Faces in insertion order.
    pub fn faces(&self) -> impl ExactSizeIterator<Item = &Face> + DoubleEndedIterator + Clone + '_ {
        self.faces.iter()
    }

    /// Iterate the records of one category in insertion order.
    pub fn iter(&self, category: Category) -> Box<dyn Iterator<Item = Record> + '_> {
        match category {
            Category::Vertex => Box::new(self.vertices().map(|&v| Record::Vertex(v))),
            Category::Normal => Box::new(self.normals().map(|&n| Record::Normal(n))),
            Category::Face => Box::new(self.faces().map(|&f| Record::Face(f))),
        }
    }

    /// Iterate every record, grouped by category in emission order.
    pub fn iter_all(&self) -> impl Iterator<Item = Record> + '_ {
        Category::ALL.into_iter().flat_map(move |c| self.iter(c))
    }

    /// Look up a vertex by index.
    pub fn vertex(&self, index: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(index.get())
    }

    /// Look up a normal by index.
    pub fn normal(&self, index: NormalIndex) -> Option<&Normal> {
        self.normals.get(index.get())
    }

    /// Look up a face by index.
    pub fn face(&self, index: FaceIndex) -> Option<&Face> {
        self.faces.get(index.get())
    }
}
