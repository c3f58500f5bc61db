//! Wavefront OBJ support.
//!
//! Exports carry positions (`v`), normals (`vn`) and quad faces referencing
//! both (`f v//n ...`). Colors are not written.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};

use super::number::Compact;
use super::parsed::{ParsedFace, ParsedMesh};
use super::relocate;
use crate::error::{ExportError, Result};
use crate::export::ExportOptions;
use crate::mesh::RecordPool;

/// Write `pool` as OBJ text.
pub fn write<W: Write>(pool: &RecordPool, writer: &mut W, options: &ExportOptions) -> Result<()> {
    writeln!(writer, "# {}", options.header_name())?;

    for v in pool.vertices() {
        let p = v.position;
        writeln!(writer, "v {} {} {}", Compact::from(p.x), Compact::from(p.y), Compact::from(p.z))?;
    }

    for n in pool.normals() {
        let d = n.direction;
        writeln!(writer, "vn {} {} {}", Compact::from(d.x), Compact::from(d.y), Compact::from(d.z))?;
    }

    for face in pool.faces() {
        let [a, b, c, d] = face.vertices;
        match face.normals {
            Some([na, nb, nc, nd]) => {
                writeln!(writer, "f {a}//{na} {b}//{nb} {c}//{nc} {d}//{nd}")?;
            }
            None => writeln!(writer, "f {a} {b} {c} {d}")?,
        }
    }

    Ok(())
}

/// Save `pool` to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use voxport::export::{build_obj_pool, ExportOptions};
/// use voxport::io::obj;
/// use voxport::mesher::CulledMesher;
/// use voxport::volume::VoxelVolume;
///
/// let volume = VoxelVolume::new();
/// let options = ExportOptions::default();
/// let pool = build_obj_pool(volume.blocks(), &CulledMesher, &options).unwrap();
/// obj::save(&pool, "scene.obj", &options).unwrap();
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

/// Load an OBJ file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ParsedMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse(BufReader::new(file)).map_err(|e| relocate(e, path))
}

/// Parse OBJ text.
///
/// Reads `v`, `vn` and `f` statements and skips everything else. Face
/// corners may be `v`, `v/t`, `v/t/n` or `v//n`; negative indices count back
/// from the latest element. Every index is validated before returning.
pub fn parse<R: BufRead>(reader: R) -> Result<ParsedMesh> {
    let mut mesh = ParsedMesh::default();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = n + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let [x, y, z] = floats(tokens, line_no)?;
                mesh.positions.push(Point3::new(x, y, z));
            }
            Some("vn") => {
                let [x, y, z] = floats(tokens, line_no)?;
                mesh.normals.push(Vector3::new(x, y, z));
            }
            Some("f") => {
                let face = face(tokens, &mesh, line_no)?;
                mesh.faces.push(face);
            }
            _ => {}
        }
    }

    mesh.validate()?;
    Ok(mesh)
}

fn floats<'a>(mut tokens: impl Iterator<Item = &'a str>, line: usize) -> Result<[f32; 3]> {
    let mut out = [0.0; 3];
    for value in &mut out {
        let token = tokens
            .next()
            .ok_or_else(|| ExportError::load("<input>", format!("line {line}: expected 3 coordinates")))?;
        *value = token
            .parse()
            .map_err(|_| ExportError::load("<input>", format!("line {line}: invalid number '{token}'")))?;
    }
    Ok(out)
}

fn face<'a>(tokens: impl Iterator<Item = &'a str>, mesh: &ParsedMesh, line: usize) -> Result<ParsedFace> {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();

    for corner in tokens {
        let mut parts = corner.split('/');
        let v = parts.next().unwrap_or_default();
        vertices.push(resolve(v, mesh.positions.len(), line)?);

        match parts.nth(1) {
            Some(n) if !n.is_empty() => normals.push(resolve(n, mesh.normals.len(), line)?),
            _ => {}
        }
    }

    if vertices.len() < 3 {
        return Err(ExportError::load("<input>", format!("line {line}: face needs at least 3 corners")));
    }

    let normals = if normals.is_empty() {
        None
    } else if normals.len() == vertices.len() {
        Some(normals)
    } else {
        return Err(ExportError::load(
            "<input>",
            format!("line {line}: face mixes corners with and without normals"),
        ));
    };

    Ok(ParsedFace { vertices, normals })
}

/// Turn a 1-based or negative OBJ index into a 0-based one.
fn resolve(token: &str, count: usize, line: usize) -> Result<usize> {
    let index: i64 = token
        .parse()
        .map_err(|_| ExportError::load("<input>", format!("line {line}: invalid index '{token}'")))?;

    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(count as i64 + i),
    };

    match resolved {
        Some(i) if i >= 0 => Ok(i as usize),
        _ => Err(ExportError::load("<input>", format!("line {line}: index {index} out of range"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Face, Normal, Vertex};
    use std::io::Cursor;

    fn options() -> ExportOptions {
        ExportOptions::default().with_product("Goxel").with_version("0.15.1")
    }

    fn single_quad() -> RecordPool {
        let mut pool = RecordPool::new();
        let corners = [[0.5, 0.5, 1.5], [1.5, 0.5, 1.5], [1.5, 1.5, 1.5], [0.5, 1.5, 1.5]];
        let vertices = corners.map(|[x, y, z]| {
            pool.insert_vertex(Vertex { position: Point3::new(x, y, z), color: None }).unwrap()
        });
        let normal = pool.insert_normal(Normal { direction: Vector3::z() }).unwrap();
        pool.insert_face(Face { vertices, normals: Some([normal; 4]) }).unwrap();
        pool
    }

    fn to_text(pool: &RecordPool) -> String {
        let mut buf = Vec::new();
        write(pool, &mut buf, &options()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_pool_is_header_only() {
        assert_eq!(to_text(&RecordPool::new()), "# Goxel 0.15.1\n");
    }

    #[test]
    fn test_single_quad() {
        let text = to_text(&single_quad());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# Goxel 0.15.1",
                "v 0.5 0.5 1.5",
                "v 1.5 0.5 1.5",
                "v 1.5 1.5 1.5",
                "v 0.5 1.5 1.5",
                "vn 0 0 1",
                "f 1//1 2//1 3//1 4//1",
            ]
        );
    }

    #[test]
    fn test_faces_without_normals() {
        let mut pool = RecordPool::new();
        let v = pool.insert_vertex(Vertex { position: Point3::origin(), color: None }).unwrap();
        pool.insert_face(Face { vertices: [v; 4], normals: None }).unwrap();
        assert!(to_text(&pool).ends_with("f 1 1 1 1\n"));
    }

    #[test]
    fn test_categories_are_grouped() {
        let text = to_text(&single_quad());
        let kinds: Vec<&str> = text
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        let mut sorted = kinds.clone();
        sorted.sort_by_key(|k| match *k {
            "v" => 0,
            "vn" => 1,
            _ => 2,
        });
        assert_eq!(kinds, sorted);
    }

    #[test]
    fn test_parse_round_trip() {
        let mesh = parse(Cursor::new(to_text(&single_quad()))).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.normal_count(), 1);
        assert_eq!(mesh.faces, vec![ParsedFace { vertices: vec![0, 1, 2, 3], normals: Some(vec![0; 4]) }]);
    }

    #[test]
    fn test_parse_corner_forms() {
        let text = "\
# comment
o thing
v 0 0 0
v 1 0 0
v 1 1 0
vt 0 0
vn 0 0 1
f 1 2 3
f 1/1/1 2/1/1 3/1/1
f -3//-1 -2//-1 -1//-1
";
        let mesh = parse(Cursor::new(text)).unwrap();
        assert_eq!(mesh.face_count(), 3);
        assert_eq!(mesh.faces[0].normals, None);
        assert_eq!(mesh.faces[1].normals, Some(vec![0, 0, 0]));
        assert_eq!(mesh.faces[2].vertices, vec![0, 1, 2]);
    }

    #[test]
    fn test_parse_rejects_dangling_index() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 9\n";
        let err = parse(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, ExportError::InvalidIndex { face: 0, index: 8, count: 3 }));
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = parse(Cursor::new("v 0 0 0\nv 1 oops 0\n")).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        save(&single_quad(), &path, &options()).unwrap();

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_load_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.obj");
        std::fs::write(&path, "f 0 1 2\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("bad.obj"), "{err}");
    }
}
