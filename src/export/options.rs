//! Export options.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::mesher::FaceMask;

/// Options shared by both export formats.
///
/// Options can be built in code or read from a TOML file; missing keys fall
/// back to the defaults.
///
/// ```
/// use voxport::export::ExportOptions;
///
/// let options = ExportOptions::from_toml_str(r#"
///     product = "Goxel"
///     version = "0.15.1"
/// "#).unwrap();
/// assert_eq!(options.header_name(), "Goxel 0.15.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    /// Product name written in file headers.
    pub product: String,

    /// Product version written in file headers.
    pub version: String,

    /// Which voxel faces the mesher emits.
    pub faces: FaceMask,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            product: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            faces: FaceMask::ALL,
        }
    }
}

impl ExportOptions {
    /// Set the product name.
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    /// Set the product version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the face mask.
    pub fn with_faces(mut self, faces: FaceMask) -> Self {
        self.faces = faces;
        self
    }

    /// `<product> <version>`, as written in headers.
    pub fn header_name(&self) -> String {
        if self.version.is_empty() {
            self.product.clone()
        } else {
            format!("{} {}", self.product, self.version)
        }
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ExportError::InvalidConfig(e.to_string()))
    }

    /// Read options from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::BlockFace;

    #[test]
    fn test_defaults() {
        let options = ExportOptions::default();
        assert_eq!(options.product, "voxport");
        assert_eq!(options.faces, FaceMask::ALL);
        assert!(options.header_name().starts_with("voxport "));
    }

    #[test]
    fn test_builders() {
        let options = ExportOptions::default()
            .with_product("Goxel")
            .with_version("")
            .with_faces(FaceMask::NONE.with(BlockFace::PosZ));
        assert_eq!(options.header_name(), "Goxel");
        assert!(options.faces.contains(BlockFace::PosZ));
    }

    #[test]
    fn test_toml_partial() {
        let options = ExportOptions::from_toml_str("faces = 3").unwrap();
        assert_eq!(options.faces.bits(), 3);
        assert_eq!(options.product, "voxport");
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        let err = ExportOptions::from_toml_str("colour = true").unwrap_err();
        assert!(matches!(err, ExportError::InvalidConfig(_)));
    }

    #[test]
    fn test_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.toml");
        std::fs::write(&path, "product = \"Test\"\nversion = \"1\"\n").unwrap();
        let options = ExportOptions::from_toml_file(&path).unwrap();
        assert_eq!(options.header_name(), "Test 1");
    }
}
