//! PLY (Stanford polygon) format support.
//!
//! Exports are ASCII PLY with colored vertices and quad faces. Loading goes
//! through `ply-rs` and accepts any ASCII or binary PLY with `x y z`
//! vertices and a face index list.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use super::number::Compact;
use super::parsed::{ParsedFace, ParsedMesh};
use super::relocate;
use crate::error::{ExportError, Result};
use crate::export::ExportOptions;
use crate::mesh::RecordPool;

/// Write `pool` as ASCII PLY.
///
/// Vertices without a color are written black.
pub fn write<W: Write>(pool: &RecordPool, writer: &mut W, options: &ExportOptions) -> Result<()> {
    let vertices = pool.vertices();
    let faces = pool.faces();

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated from {}", options.header_name())?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_index")?;
    writeln!(writer, "end_header")?;

    for v in vertices {
        let p = v.position;
        let [r, g, b] = v.color.unwrap_or([0, 0, 0]);
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            Compact::from(p.x),
            Compact::from(p.y),
            Compact::from(p.z),
            r,
            g,
            b
        )?;
    }

    for f in faces {
        let [a, b, c, d] = f.vertices.map(|v| v.zero_based());
        writeln!(writer, "4 {} {} {} {}", a, b, c, d)?;
    }

    Ok(())
}

/// Save `pool` to an ASCII PLY file.
///
/// # Example
///
/// ```no_run
/// use voxport::export::{build_ply_pool, ExportOptions};
/// use voxport::io::ply;
/// use voxport::mesher::CulledMesher;
/// use voxport::volume::VoxelVolume;
///
/// let volume = VoxelVolume::new();
/// let options = ExportOptions::default();
/// let pool = build_ply_pool(volume.blocks(), &CulledMesher, &options).unwrap();
/// ply::save(&pool, "scene.ply", &options).unwrap();
/// ```
pub fn save<P: AsRef<Path>>(pool: &RecordPool, path: P, options: &ExportOptions) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(pool, &mut writer, options)?;
    writer.flush()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// Load a PLY file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ParsedMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse(BufReader::new(file)).map_err(|e| relocate(e, path))
}

/// Parse PLY data.
///
/// Colors are read when every vertex has `red green blue`. Faces come from
/// `vertex_index` or `vertex_indices`.
pub fn parse<R: BufRead>(mut reader: R) -> Result<ParsedMesh> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| ExportError::load("<input>", e.to_string()))?;

    let mut mesh = ParsedMesh::default();

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| ExportError::load("<input>", "PLY file has no vertex element"))?;

    let mut colors = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name)
                .ok_or_else(|| ExportError::load("<input>", format!("vertex missing {name} coordinate")))
        };
        mesh.positions.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));

        let rgb = ["red", "green", "blue"].map(|name| get_byte_property(vertex, name));
        if let [Some(r), Some(g), Some(b)] = rgb {
            colors.push([r, g, b]);
        }
    }
    if colors.len() == mesh.positions.len() {
        mesh.colors = colors;
    }

    if let Some(face_element) = ply.payload.get("face") {
        mesh.faces.reserve(face_element.len());
        for face in face_element {
            let vertices = get_list_property(face, "vertex_index")
                .or_else(|| get_list_property(face, "vertex_indices"))
                .ok_or_else(|| ExportError::load("<input>", "face missing vertex_index property"))?;
            mesh.faces.push(ParsedFace { vertices, normals: None });
        }
    }

    mesh.validate()?;
    Ok(mesh)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f32> {
    match element.get(name)? {
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        Property::Int(v) => Some(*v as f32),
        Property::UInt(v) => Some(*v as f32),
        Property::Short(v) => Some(*v as f32),
        Property::UShort(v) => Some(*v as f32),
        Property::Char(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32),
        _ => None,
    }
}

fn get_byte_property(element: &DefaultElement, name: &str) -> Option<u8> {
    match element.get(name)? {
        Property::UChar(v) => Some(*v),
        Property::Char(v) => u8::try_from(*v).ok(),
        Property::UShort(v) => u8::try_from(*v).ok(),
        Property::Int(v) => u8::try_from(*v).ok(),
        Property::UInt(v) => u8::try_from(*v).ok(),
        // Float channels are in [0, 1].
        Property::Float(v) => Some((v.clamp(0.0, 1.0) * 255.0).round() as u8),
        _ => None,
    }
}

/// Negative entries map past any valid index so validation rejects them.
fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    fn index<T: TryInto<usize>>(x: T) -> usize {
        x.try_into().unwrap_or(usize::MAX)
    }

    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| index(x)).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| index(x)).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| index(x)).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| index(x)).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| index(x)).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| index(x)).collect()),
        _ => None,
    }
}
