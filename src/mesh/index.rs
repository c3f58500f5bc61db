//! Index types for pool records.
//!
//! Every record in a [`RecordPool`](super::RecordPool) is addressed by a
//! type-safe, 1-based index relative to its own category. The wrappers keep
//! vertex, normal and face indices from being mixed up when building faces.

use std::fmt::{self, Debug, Display};
use std::num::NonZeroU32;

/// A type-safe vertex index (1-based).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexIndex(NonZeroU32);

/// A type-safe normal index (1-based).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NormalIndex(NonZeroU32);

/// A type-safe face index (1-based).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceIndex(NonZeroU32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create an index from its 1-based ordinal.
            ///
            /// Returns `None` for 0 or for ordinals that do not fit in `u32`.
            #[inline]
            pub fn new(ordinal: usize) -> Option<Self> {
                u32::try_from(ordinal).ok().and_then(NonZeroU32::new).map(Self)
            }

            /// Create an index from a 0-based position.
            #[inline]
            pub fn from_zero_based(position: usize) -> Option<Self> {
                position.checked_add(1).and_then(Self::new)
            }

            /// Get the 1-based ordinal, as written in OBJ files.
            #[inline]
            pub fn get(self) -> usize {
                self.0.get() as usize
            }

            /// Get the 0-based position, as written in PLY files.
            #[inline]
            pub fn zero_based(self) -> usize {
                self.get() - 1
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.get())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.get())
            }
        }
    };
}

impl_index_type!(VertexIndex, "V");
impl_index_type!(NormalIndex, "N");
impl_index_type!(FaceIndex, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_based() {
        let v = VertexIndex::new(1).unwrap();
        assert_eq!(v.get(), 1);
        assert_eq!(v.zero_based(), 0);

        assert!(VertexIndex::new(0).is_none());
        assert_eq!(NormalIndex::from_zero_based(4).unwrap().get(), 5);
    }

    #[test]
    fn test_out_of_range() {
        assert!(FaceIndex::new(u32::MAX as usize + 1).is_none());
        assert!(FaceIndex::new(u32::MAX as usize).is_some());
    }

    #[test]
    fn test_debug_format() {
        let v = VertexIndex::new(42).unwrap();
        assert_eq!(format!("{:?}", v), "V(42)");
        assert_eq!(format!("{}", v), "42");
        assert_eq!(format!("{:?}", NormalIndex::new(3).unwrap()), "N(3)");
    }
}
