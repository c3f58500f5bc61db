//! Quad generation for voxel blocks.
//!
//! The exporter does not mesh voxels itself. It hands each block's payload to
//! a [`QuadGenerator`], which fills a caller-provided corner buffer with one
//! quad (four consecutive [`Corner`]s) per visible voxel face and reports how
//! many quads it produced.
//!
//! [`CulledMesher`] is the reference generator: one unmerged quad per voxel
//! face whose neighbour is empty.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::volume::{BlockData, Rgba, BLOCK_SIZE, EMPTY};

/// One corner of a generated quad, in the block's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Local position (voxel `i` spans `[i, i + 1]` on each axis).
    pub position: Point3<f32>,
    /// Face normal.
    pub normal: Vector3<f32>,
    /// Voxel color.
    pub color: Rgba,
}

impl Default for Corner {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            normal: Vector3::zeros(),
            color: EMPTY,
        }
    }
}

/// One of the six axis-aligned faces of a voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFace {
    /// Facing +X.
    PosX,
    /// Facing -X.
    NegX,
    /// Facing +Y.
    PosY,
    /// Facing -Y.
    NegY,
    /// Facing +Z.
    PosZ,
    /// Facing -Z.
    NegZ,
}

impl BlockFace {
    /// All faces, in mask bit order.
    pub const ALL: [BlockFace; 6] = [
        BlockFace::PosX,
        BlockFace::NegX,
        BlockFace::PosY,
        BlockFace::NegY,
        BlockFace::PosZ,
        BlockFace::NegZ,
    ];

    /// The axis this face is perpendicular to (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            BlockFace::PosX | BlockFace::NegX => 0,
            BlockFace::PosY | BlockFace::NegY => 1,
            BlockFace::PosZ | BlockFace::NegZ => 2,
        }
    }

    /// Returns true for the faces pointing along the positive axis.
    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, BlockFace::PosX | BlockFace::PosY | BlockFace::PosZ)
    }

    /// Integer offset to the neighbouring voxel across this face.
    #[inline]
    pub fn offset(self) -> [i32; 3] {
        let mut o = [0; 3];
        o[self.axis()] = if self.is_positive() { 1 } else { -1 };
        o
    }

    /// Unit outward normal.
    #[inline]
    pub fn normal(self) -> Vector3<f32> {
        let o = self.offset();
        Vector3::new(o[0] as f32, o[1] as f32, o[2] as f32)
    }

    /// Mask bit for this face.
    #[inline]
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Short name used by [`FaceMask`] parsing (`+x`, `-y`, ...).
    pub fn name(self) -> &'static str {
        match self {
            BlockFace::PosX => "+x",
            BlockFace::NegX => "-x",
            BlockFace::PosY => "+y",
            BlockFace::NegY => "-y",
            BlockFace::PosZ => "+z",
            BlockFace::NegZ => "-z",
        }
    }

    /// The four corners of this face of voxel `voxel`, counter-clockwise
    /// when seen from outside.
    pub fn corners(self, voxel: [i32; 3]) -> [Point3<f32>; 4] {
        let d = self.axis();
        let u = (d + 1) % 3;
        let v = (d + 2) % 3;
        // (u, v) steps; the reversed order flips the winding for negative faces.
        let steps: [(i32, i32); 4] = if self.is_positive() {
            [(0, 0), (1, 0), (1, 1), (0, 1)]
        } else {
            [(0, 0), (0, 1), (1, 1), (1, 0)]
        };
        let plane = voxel[d] + i32::from(self.is_positive());

        steps.map(|(su, sv)| {
            let mut p = [0i32; 3];
            p[d] = plane;
            p[u] = voxel[u] + su;
            p[v] = voxel[v] + sv;
            Point3::new(p[0] as f32, p[1] as f32, p[2] as f32)
        })
    }
}

/// A set of [`BlockFace`]s to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceMask(u8);

impl FaceMask {
    /// Every face.
    pub const ALL: FaceMask = FaceMask(0b11_1111);

    /// No face.
    pub const NONE: FaceMask = FaceMask(0);

    /// Build a mask from raw bits; unknown bits are dropped.
    pub fn from_bits(bits: u8) -> Self {
        FaceMask(bits & Self::ALL.0)
    }

    /// Raw bits.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if `face` is in the mask.
    #[inline]
    pub fn contains(self, face: BlockFace) -> bool {
        self.0 & face.bit() != 0
    }

    /// The mask with `face` added.
    pub fn with(self, face: BlockFace) -> Self {
        FaceMask(self.0 | face.bit())
    }

    /// The mask with `face` removed.
    pub fn without(self, face: BlockFace) -> Self {
        FaceMask(self.0 & !face.bit())
    }

    /// Returns true if no face is selected.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for FaceMask {
    fn default() -> Self {
        FaceMask::ALL
    }
}

impl FromIterator<BlockFace> for FaceMask {
    fn from_iter<T: IntoIterator<Item = BlockFace>>(iter: T) -> Self {
        iter.into_iter().fold(FaceMask::NONE, FaceMask::with)
    }
}

impl fmt::Display for FaceMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == FaceMask::ALL {
            return f.write_str("all");
        }
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = BlockFace::ALL
            .iter()
            .filter(|&&face| self.contains(face))
            .map(|face| face.name())
            .collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for FaceMask {
    type Err = String;

    /// Parse `all`, `none`, or a comma-separated list such as `+x,-y,+z`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => return Ok(FaceMask::ALL),
            "none" | "" => return Ok(FaceMask::NONE),
            _ => {}
        }

        s.split(',')
            .map(|part| {
                let part = part.trim().to_ascii_lowercase();
                BlockFace::ALL
                    .into_iter()
                    .find(|face| face.name() == part)
                    .ok_or_else(|| format!("unknown face '{}' (expected one of +x,-x,+y,-y,+z,-z)", part))
            })
            .collect()
    }
}

/// Turns a block's voxel payload into quads.
pub trait QuadGenerator {
    /// Fill `out` with four corners per generated quad and return the number
    /// of quads.
    ///
    /// Implementations must not write past `out`. They may return a count
    /// larger than `out.len() / 4` to signal that the buffer was too small;
    /// callers treat that as malformed input.
    fn generate(&self, data: &BlockData, mask: FaceMask, out: &mut [Corner]) -> usize;
}

impl<G: QuadGenerator + ?Sized> QuadGenerator for &G {
    fn generate(&self, data: &BlockData, mask: FaceMask, out: &mut [Corner]) -> usize {
        (**self).generate(data, mask, out)
    }
}

/// One quad per visible voxel face, no merging.
///
/// A face is visible when the voxel across it is empty, including voxels
/// mirrored from neighbouring blocks in the padded border.
#[derive(Debug, Clone, Copy, Default)]
pub struct CulledMesher;

impl CulledMesher {
    /// Create a mesher.
    pub fn new() -> Self {
        CulledMesher
    }
}

impl QuadGenerator for CulledMesher {
    fn generate(&self, data: &BlockData, mask: FaceMask, out: &mut [Corner]) -> usize {
        let n = BLOCK_SIZE as i32;
        let mut quads = 0;

        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let voxel = [x, y, z];
                    let color = data.get(voxel);
                    if color[3] == 0 {
                        continue;
                    }

                    for face in BlockFace::ALL {
                        if !mask.contains(face) {
                            continue;
                        }
                        let o = face.offset();
                        if !data.is_empty_at([x + o[0], y + o[1], z + o[2]]) {
                            continue;
                        }

                        let start = quads * 4;
                        if let Some(slot) = out.get_mut(start..start + 4) {
                            let normal = face.normal();
                            for (corner, position) in slot.iter_mut().zip(face.corners(voxel)) {
                                *corner = Corner { position, normal, color };
                            }
                        }
                        quads += 1;
                    }
                }
            }
        }

        quads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::MAX_QUADS_PER_BLOCK;

    fn buffer() -> Vec<Corner> {
        vec![Corner::default(); MAX_QUADS_PER_BLOCK * 4]
    }

    #[test]
    fn test_winding_matches_normal() {
        for face in BlockFace::ALL {
            let c = face.corners([2, 3, 4]);
            let n = (c[1] - c[0]).cross(&(c[2] - c[0]));
            assert_eq!(n, face.normal(), "bad winding for {:?}", face);
        }
    }

    #[test]
    fn test_corners_lie_on_face_plane() {
        let c = BlockFace::NegY.corners([0, 5, 0]);
        assert!(c.iter().all(|p| p.y == 5.0));
        let c = BlockFace::PosY.corners([0, 5, 0]);
        assert!(c.iter().all(|p| p.y == 6.0));
    }

    #[test]
    fn test_single_voxel_has_six_faces() {
        let mut data = BlockData::new();
        data.set([1, 1, 1], [255, 0, 0, 255]);

        let mut out = buffer();
        let quads = CulledMesher.generate(&data, FaceMask::ALL, &mut out);
        assert_eq!(quads, 6);
        assert!(out[..24].iter().all(|c| c.color == [255, 0, 0, 255]));
    }

    #[test]
    fn test_shared_face_is_culled() {
        let mut data = BlockData::new();
        data.set([1, 1, 1], [255, 0, 0, 255]);
        data.set([2, 1, 1], [0, 255, 0, 255]);

        let mut out = buffer();
        assert_eq!(CulledMesher.generate(&data, FaceMask::ALL, &mut out), 10);
    }

    #[test]
    fn test_border_neighbour_culls() {
        let mut data = BlockData::new();
        data.set([0, 0, 0], [255, 0, 0, 255]);
        data.set([-1, 0, 0], [0, 0, 255, 255]);

        let mut out = buffer();
        // The border voxel is not meshed but hides the -x face.
        assert_eq!(CulledMesher.generate(&data, FaceMask::ALL, &mut out), 5);
    }

    #[test]
    fn test_mask_filters_faces() {
        let mut data = BlockData::new();
        data.set([4, 4, 4], [1, 2, 3, 255]);

        let mask = FaceMask::NONE.with(BlockFace::PosY);
        let mut out = buffer();
        assert_eq!(CulledMesher.generate(&data, mask, &mut out), 1);
        assert_eq!(out[0].normal, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_small_buffer_reports_full_count() {
        let mut data = BlockData::new();
        data.set([1, 1, 1], [255, 255, 255, 255]);

        let mut out = vec![Corner::default(); 8];
        assert_eq!(CulledMesher.generate(&data, FaceMask::ALL, &mut out), 6);
    }

    #[test]
    fn test_face_mask_parse() {
        assert_eq!("all".parse::<FaceMask>().unwrap(), FaceMask::ALL);
        assert_eq!("none".parse::<FaceMask>().unwrap(), FaceMask::NONE);

        let mask: FaceMask = "+x, -Z".parse().unwrap();
        assert!(mask.contains(BlockFace::PosX));
        assert!(mask.contains(BlockFace::NegZ));
        assert!(!mask.contains(BlockFace::PosY));
        assert_eq!(mask.to_string(), "+x,-z");

        assert!("+w".parse::<FaceMask>().is_err());
        assert_eq!(FaceMask::ALL.without(BlockFace::NegX).bits(), 0b11_1101);
    }
}
