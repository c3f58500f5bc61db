//! Block-local to world-space coordinate transform.
//!
//! Quad corners come out of the mesher in the block's local frame, with the
//! origin at a block corner. Moving them into world space is a translation by
//! the block's integer offset followed by the fixed centering correction
//! [`HALF_BLOCK_OFFSET`] on every axis. Blocks are axis-aligned, so the
//! rotation part is the identity and normals pass through unchanged.

use nalgebra::{Point3, Translation3, Vector3};

use crate::volume::HALF_BLOCK_OFFSET;

/// The transform of one block into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockTransform {
    translation: Translation3<f32>,
}

impl BlockTransform {
    /// Build the transform for a block at `offset`.
    pub fn new(offset: [i32; 3]) -> Self {
        let t = offset.map(|o| o as f32 + HALF_BLOCK_OFFSET);
        Self {
            translation: Translation3::new(t[0], t[1], t[2]),
        }
    }

    /// The combined translation applied to positions.
    pub fn translation(&self) -> Vector3<f32> {
        self.translation.vector
    }

    /// Map a block-local corner position into world space.
    #[inline]
    pub fn to_world(&self, local: &Point3<f32>) -> Point3<f32> {
        self.translation.transform_point(local)
    }

    /// Map a normal into world space. Normals are never translated.
    #[inline]
    pub fn normal_to_world(&self, normal: &Vector3<f32>) -> Vector3<f32> {
        *normal
    }
}

/// Map a block-local position into world space for a block at `offset`.
///
/// # Example
///
/// ```
/// use voxport::mesh::to_world;
/// use voxport::volume::BLOCK_SIZE;
/// use nalgebra::Point3;
///
/// let p = to_world([0, 0, 0], &Point3::new(0.0, 0.0, 0.0));
/// let c = -((BLOCK_SIZE / 2) as f32) + 0.5;
/// assert_eq!(p, Point3::new(c, c, c));
/// ```
pub fn to_world(offset: [i32; 3], local: &Point3<f32>) -> Point3<f32> {
    BlockTransform::new(offset).to_world(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::BLOCK_SIZE;

    #[test]
    fn test_centering_offset() {
        assert_eq!(HALF_BLOCK_OFFSET, -((BLOCK_SIZE / 2) as f32) + 0.5);
        let p = to_world([0, 0, 0], &Point3::new(8.0, 8.0, 8.0));
        assert_eq!(p, Point3::new(8.5, 8.5, 8.5) - Vector3::repeat((BLOCK_SIZE / 2) as f32));
    }

    #[test]
    fn test_offset_then_centering() {
        let n = BLOCK_SIZE as i32;
        let t = BlockTransform::new([n, -n, 2 * n]);
        let p = t.to_world(&Point3::new(1.0, 2.0, 3.0));
        let c = HALF_BLOCK_OFFSET;
        assert_eq!(p, Point3::new(n as f32 + 1.0 + c, -n as f32 + 2.0 + c, 2.0 * n as f32 + 3.0 + c));
    }

    #[test]
    fn test_normals_not_translated() {
        let t = BlockTransform::new([32, 48, -16]);
        let n = Vector3::new(0.0, -1.0, 0.0);
        assert_eq!(t.normal_to_world(&n), n);
        assert_ne!(t.translation(), Vector3::zeros());
    }
}
