//! Plain-text voxel lists.
//!
//! One voxel per line as `X Y Z RRGGBB` (or `RRGGBBAA`), integer world
//! coordinates and a hex color. Blank lines and `#` comments are skipped.
//!
//! ```text
//! # X Y Z RRGGBB
//! 0 0 0 ff0000
//! 1 0 0 00ff0080
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use super::relocate;
use crate::error::{ExportError, Result};
use crate::volume::{in_bounds, Rgba, VoxelVolume, MAX_COORD};

/// Load a voxel list file into a volume.
pub fn load<P: AsRef<Path>>(path: P) -> Result<VoxelVolume> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let volume = parse(BufReader::new(file)).map_err(|e| relocate(e, path))?;
    debug!(
        "loaded {} voxels in {} blocks from {}",
        volume.voxel_count(),
        volume.block_count(),
        path.display()
    );
    Ok(volume)
}

/// Parse a voxel list.
///
/// Later lines overwrite earlier ones at the same position; a color with
/// zero alpha clears the voxel.
pub fn parse<R: BufRead>(reader: R) -> Result<VoxelVolume> {
    let mut volume = VoxelVolume::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (pos, color) = parse_line(line).map_err(|message| {
            ExportError::load("<input>", format!("line {}: {}", n + 1, message))
        })?;
        volume.set(pos, color);
    }

    Ok(volume)
}

fn parse_line(line: &str) -> std::result::Result<([i32; 3], Rgba), String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [x, y, z, color] = tokens.as_slice() else {
        return Err(format!("expected 'X Y Z RRGGBB', found {} fields", tokens.len()));
    };

    let mut pos = [0; 3];
    for (value, token) in pos.iter_mut().zip([x, y, z]) {
        *value = token
            .parse()
            .map_err(|_| format!("invalid coordinate '{}'", token))?;
    }
    if !in_bounds(pos) {
        return Err(format!(
            "position {:?} is outside the supported range ±{}",
            pos, MAX_COORD
        ));
    }

    Ok((pos, parse_color(color)?))
}

fn parse_color(hex: &str) -> std::result::Result<Rgba, String> {
    let hex = hex.trim_start_matches('#');
    let invalid = || format!("invalid color '{}'", hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;

    match hex.len() {
        6 => {
            let [_, r, g, b] = value.to_be_bytes();
            Ok([r, g, b, 255])
        }
        8 => Ok(value.to_be_bytes()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_voxels() {
        let text = "\
# Goxel 0.15.1
# One line per voxel
# X Y Z RRGGBB

0 0 0 ff0000
-3 7 12 00ff0080
";
        let volume = parse(Cursor::new(text)).unwrap();
        assert_eq!(volume.voxel_count(), 2);
        assert_eq!(volume.get([0, 0, 0]), [255, 0, 0, 255]);
        assert_eq!(volume.get([-3, 7, 12]), [0, 255, 0, 128]);
    }

    #[test]
    fn test_zero_alpha_clears() {
        let volume = parse(Cursor::new("1 1 1 ffffff\n1 1 1 ffffff00\n")).unwrap();
        assert_eq!(volume.voxel_count(), 0);
    }

    #[test]
    fn test_bad_color_names_line() {
        let err = parse(Cursor::new("# header\n0 0 0 ff0000\n1 2 3 red\n")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 3"), "{message}");
        assert!(message.contains("invalid color 'red'"), "{message}");
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse(Cursor::new("1 2 ff0000\n")).unwrap_err();
        assert!(err.to_string().contains("found 3 fields"));
    }

    #[test]
    fn test_out_of_range_position_names_line() {
        let err = parse("0 0 0 ff0000\n2147483647 0 0 ff0000\n".as_bytes()).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ExportError::LoadError { .. }));
        assert!(message.contains("line 2"), "{message}");
        assert!(message.contains("outside the supported range"), "{message}");

        let err = parse("0 -2147483648 0 ff0000\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 1"));

        let edge = format!("{} 0 {} 102030\n", MAX_COORD, -MAX_COORD);
        let volume = parse(edge.as_bytes()).unwrap();
        assert_eq!(volume.get([MAX_COORD, 0, -MAX_COORD]), [16, 32, 48, 255]);
    }

    #[test]
    fn test_color_lengths() {
        assert_eq!(parse_color("#102030"), Ok([16, 32, 48, 255]));
        assert_eq!(parse_color("10203040"), Ok([16, 32, 48, 64]));
        assert!(parse_color("1020").is_err());
        assert!(parse_color("+10203").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.txt");
        std::fs::write(&path, "0 0 0 abcdef\n20 0 0 abcdef\n").unwrap();
        let volume = load(&path).unwrap();
        assert_eq!(volume.block_count(), 2);

        std::fs::write(&path, "0 0 zero abcdef\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("scene.txt"), "{err}");
    }
}
