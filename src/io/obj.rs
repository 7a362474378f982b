//! Wavefront OBJ format support.
//!
//! Reads and writes the subset of OBJ used for sphere meshes: object names,
//! positions, normals, texture coordinates and triangular faces. Other tags
//! (`s`, `g`, `usemtl`, `mtllib`, …) are skipped on input.
//!
//! Output is written in a fixed section order: `o`, `v`, `vn`, `vt`, `f`.
//! Positions and texture coordinates use 6 decimals, normals are written back
//! exactly as they were read.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use tracing::{debug, trace};

use crate::error::{MeshError, Result};
use crate::mesh::{Corner, Face, Normal, NormalId, ObjMesh, TexCoord, TexCoordId, VertexId};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use spheremap::io::obj;
///
/// let mesh = obj::load("sphere.obj").unwrap();
/// println!("{} faces", mesh.num_faces());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<ObjMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mesh = read(BufReader::new(file)).map_err(|e| e.with_load_path(path))?;
    debug!(
        "Loaded {:?}: {} vertices, {} normals, {} texcoords, {} faces",
        path,
        mesh.num_vertices(),
        mesh.num_normals(),
        mesh.tex_coords().len(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>>(mesh: &ObjMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);

    write(mesh, &mut writer)?;
    writer.flush().map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(())
}

/// Raw face corner as written in the file, before range checking.
type RawCorner = (i64, Option<i64>, Option<i64>);

/// Read a mesh from OBJ text.
///
/// Faces must be triangles. Negative (relative) indices are resolved against
/// the elements read so far; positive indices are checked once the whole
/// input has been read.
pub fn read<R: BufRead>(reader: R) -> Result<ObjMesh> {
    let mut mesh = ObjMesh::new();
    let mut raw_faces: Vec<[RawCorner; 3]> = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (tag, rest) = split_tag(line);
        match tag {
            "o" => mesh.add_name(rest),
            "v" => {
                let [x, y, z] = parse_floats::<3>(rest, line_no, "v")?;
                mesh.add_vertex(Point3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(rest, line_no, "vn")?;
                mesh.add_normal(Normal::with_source(Vector3::new(x, y, z), rest));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(rest, line_no, "vt")?;
                mesh.tex_coords_mut().push(TexCoord::new(u, v));
            }
            "f" => {
                let groups: Vec<&str> = rest.split_whitespace().collect();
                if groups.len() != 3 {
                    return Err(MeshError::NonTriangularFace {
                        line: line_no,
                        count: groups.len(),
                    });
                }
                let counts = (
                    mesh.num_vertices(),
                    mesh.tex_coords().len(),
                    mesh.num_normals(),
                );
                let mut corners = [(0, None, None); 3];
                for (slot, group) in corners.iter_mut().zip(&groups) {
                    *slot = parse_group(group, line_no, counts)?;
                }
                raw_faces.push(corners);
            }
            _ => trace!("line {}: skipping '{}'", line_no, tag),
        }
    }

    for (face, raw) in raw_faces.into_iter().enumerate() {
        let mut corners = [Corner::new(VertexId::new(0)); 3];
        for (corner, (p, t, n)) in corners.iter_mut().zip(raw) {
            *corner = resolve_corner(&mesh, face, p, t, n)?;
        }
        mesh.add_face(Face::new(corners));
    }

    Ok(mesh)
}

/// Write a mesh as OBJ text.
pub fn write<W: Write>(mesh: &ObjMesh, writer: &mut W) -> Result<()> {
    for name in mesh.names() {
        writeln!(writer, "o {}", name)?;
    }

    for p in mesh.positions() {
        writeln!(writer, "v {} {} {}", Fixed6(p.x), Fixed6(p.y), Fixed6(p.z))?;
    }

    for n in mesh.normals() {
        match n.source() {
            Some(source) => writeln!(writer, "vn {}", source)?,
            None => {
                let d = n.direction;
                writeln!(writer, "vn {} {} {}", Fixed6(d.x), Fixed6(d.y), Fixed6(d.z))?
            }
        }
    }

    for (_, tc) in mesh.tex_coords().iter() {
        let uv = tc.resolved();
        writeln!(writer, "vt {} {}", Fixed6(uv.x), Fixed6(uv.y))?;
    }

    for face in mesh.faces() {
        let [a, b, c] = face.corners;
        writeln!(writer, "f {} {} {}", CornerText(a), CornerText(b), CornerText(c))?;
    }

    Ok(())
}

/// Render a mesh as OBJ text.
pub fn to_string(mesh: &ObjMesh) -> Result<String> {
    let mut buf = Vec::new();
    write(mesh, &mut buf)?;
    String::from_utf8(buf).map_err(|e| MeshError::InvalidParameter {
        name: "mesh",
        value: e.to_string(),
        reason: "OBJ output is not valid UTF-8",
    })
}

/// Split a trimmed line into its tag and the trimmed remainder.
pub(crate) fn split_tag(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((tag, rest)) => (tag, rest.trim()),
        None => (line, ""),
    }
}

fn parse_floats<const N: usize>(rest: &str, line: usize, tag: &str) -> Result<[f64; N]> {
    let mut out = [0.0; N];
    let mut fields = rest.split_whitespace();
    for slot in out.iter_mut() {
        let field = fields.next().ok_or_else(|| MeshError::Parse {
            line,
            message: format!("'{}' needs {} components", tag, N),
        })?;
        *slot = field.parse().map_err(|_| MeshError::Parse {
            line,
            message: format!("'{}' has non-numeric component '{}'", tag, field),
        })?;
    }
    Ok(out)
}

/// Parse a `p`, `p/t`, `p//n` or `p/t/n` group, turning negative indices into
/// their 1-based absolute equivalent.
fn parse_group(
    group: &str,
    line: usize,
    (num_v, num_vt, num_vn): (usize, usize, usize),
) -> Result<RawCorner> {
    let malformed = || MeshError::MalformedIndex {
        line,
        group: group.to_string(),
    };

    let parts: Vec<&str> = group.split('/').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(malformed());
    }

    let field = |i: usize, len: usize| -> Result<Option<i64>> {
        match parts.get(i) {
            None | Some(&"") => Ok(None),
            Some(s) => {
                let raw: i64 = s.parse().map_err(|_| malformed())?;
                Ok(Some(if raw < 0 { len as i64 + raw + 1 } else { raw }))
            }
        }
    };

    let p = field(0, num_v)?.ok_or_else(malformed)?;
    let t = field(1, num_vt)?;
    let n = field(2, num_vn)?;
    Ok((p, t, n))
}

fn resolve_corner(
    mesh: &ObjMesh,
    face: usize,
    p: i64,
    t: Option<i64>,
    n: Option<i64>,
) -> Result<Corner> {
    let vertex = one_based_to_index(p, mesh.num_vertices())
        .ok_or(MeshError::InvalidVertexIndex { face, vertex: p })?;
    let mut corner = Corner::new(VertexId::new(vertex));

    if let Some(t) = t {
        let idx = one_based_to_index(t, mesh.tex_coords().len())
            .ok_or(MeshError::InvalidTexCoordIndex { face, index: t })?;
        corner = corner.with_tex_coord(TexCoordId::new(idx));
    }
    if let Some(n) = n {
        let idx = one_based_to_index(n, mesh.num_normals())
            .ok_or(MeshError::InvalidNormalIndex { face, index: n })?;
        corner = corner.with_normal(NormalId::new(idx));
    }
    Ok(corner)
}

fn one_based_to_index(raw: i64, len: usize) -> Option<usize> {
    if raw >= 1 && (raw as u64) <= len as u64 {
        Some(raw as usize - 1)
    } else {
        None
    }
}

/// A float formatted with 6 decimals, never as negative zero.
///
/// Tiny negatives such as `-4e-7` are written `0.000000` as well. A plain
/// JavaScript `toFixed(6)` would keep the sign and write `-0.000000`.
struct Fixed6(f64);

impl fmt::Display for Fixed6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Anything that rounds to zero is written unsigned
        let text = format!("{:.6}", self.0);
        match text.strip_prefix('-') {
            Some(magnitude) if magnitude == "0.000000" => f.write_str(magnitude),
            _ => f.write_str(&text),
        }
    }
}

struct CornerText(Corner);

impl fmt::Display for CornerText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(f, "{}", c.vertex.one_based())?;
        match (c.tex_coord, c.normal) {
            (None, None) => Ok(()),
            (Some(t), None) => write!(f, "/{}", t.one_based()),
            (None, Some(n)) => write!(f, "//{}", n.one_based()),
            (Some(t), Some(n)) => write!(f, "/{}/{}", t.one_based(), n.one_based()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::FaceId;

    const OCTANT: &str = "\
# one octant of the unit sphere
o Sphere
v 1.0 0.0 0.0
v 0.0 1.0 0.0
v 0.0 0.0 1.0
vn 0.5774 0.5774 0.5774
s off
f 1//1 2//1 3//1
";

    #[test]
    fn test_read_basic() {
        let mesh = read(OCTANT.as_bytes()).unwrap();
        assert_eq!(mesh.names(), ["Sphere".to_string()]);
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_normals(), 1);
        assert!(mesh.tex_coords().is_empty());
        assert_eq!(mesh.num_faces(), 1);

        let face = mesh.face(FaceId::new(0));
        assert_eq!(face.corners[2].vertex, VertexId::new(2));
        assert_eq!(face.corners[2].normal, Some(NormalId::new(0)));
        assert!(face.tex_coords().is_none());
    }

    #[test]
    fn test_write_format() {
        let mesh = read(OCTANT.as_bytes()).unwrap();
        let text = to_string(&mesh).unwrap();
        assert_eq!(
            text,
            "o Sphere\n\
             v 1.000000 0.000000 0.000000\n\
             v 0.000000 1.000000 0.000000\n\
             v 0.000000 0.000000 1.000000\n\
             vn 0.5774 0.5774 0.5774\n\
             f 1//1 2//1 3//1\n"
        );
    }

    #[test]
    fn test_texcoords_and_full_groups() {
        let text = "v 0 0 1\nv 0 1 0\nv 1 0 0\nvt 0.1 0.2\nvt 0.3 0.4\nvn 0 0 1\nf 1/2/1 2/1/1 3/2/1\n";
        let mesh = read(text.as_bytes()).unwrap();
        let face = mesh.face(FaceId::new(0));
        assert_eq!(
            face.tex_coords(),
            Some([TexCoordId::new(1), TexCoordId::new(0), TexCoordId::new(1)])
        );

        let out = to_string(&mesh).unwrap();
        assert!(out.contains("vt 0.100000 0.200000\n"));
        assert!(out.ends_with("f 1/2/1 2/1/1 3/2/1\n"));
    }

    #[test]
    fn test_negative_indices() {
        let text = "v 0 0 1\nv 0 1 0\nv 1 0 0\nf -3 -2 -1\n";
        let mesh = read(text.as_bytes()).unwrap();
        assert_eq!(
            mesh.face(FaceId::new(0)).vertices(),
            [VertexId::new(0), VertexId::new(1), VertexId::new(2)]
        );
    }

    #[test]
    fn test_negative_zero_is_written_positive() {
        let mut mesh = ObjMesh::new();
        mesh.add_vertex(Point3::new(-0.0, 1.0, -0.0));
        mesh.add_vertex(Point3::new(-1.2e-16, -0.5, -4e-7));
        let text = to_string(&mesh).unwrap();
        assert_eq!(
            text,
            "v 0.000000 1.000000 0.000000\nv 0.000000 -0.500000 0.000000\n"
        );
    }

    #[test]
    fn test_undefined_texcoord_fallback() {
        let mut mesh = ObjMesh::new();
        mesh.tex_coords_mut().push(TexCoord::pole(1.0));
        assert_eq!(to_string(&mesh).unwrap(), "vt 0.500000 1.000000\n");
    }

    #[test]
    fn test_quad_rejected() {
        let text = "v 0 0 1\nv 0 1 0\nv 1 0 0\nv 1 1 0\nf 1 2 3 4\n";
        match read(text.as_bytes()) {
            Err(MeshError::NonTriangularFace { line, count }) => {
                assert_eq!(line, 5);
                assert_eq!(count, 4);
            }
            other => panic!("expected NonTriangularFace, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_group() {
        let text = "v 0 0 1\nv 0 1 0\nv 1 0 0\nf 1/a 2 3\n";
        assert!(matches!(
            read(text.as_bytes()),
            Err(MeshError::MalformedIndex { line: 4, .. })
        ));

        let text = "v 0 0 1\nv 0 1 0\nv 1 0 0\nf /1 2 3\n";
        assert!(matches!(
            read(text.as_bytes()),
            Err(MeshError::MalformedIndex { .. })
        ));
    }

    #[test]
    fn test_out_of_range_index() {
        let text = "v 0 0 1\nv 0 1 0\nf 1 2 3\n";
        assert!(matches!(
            read(text.as_bytes()),
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 3 })
        ));

        let text = "v 0 0 1\nv 0 1 0\nv 1 0 0\nf 1/1 2/1 3/1\n";
        assert!(matches!(
            read(text.as_bytes()),
            Err(MeshError::InvalidTexCoordIndex { face: 0, index: 1 })
        ));
    }

    #[test]
    fn test_bad_number() {
        let text = "v 0 zero 1\n";
        assert!(matches!(
            read(text.as_bytes()),
            Err(MeshError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load("definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, MeshError::LoadError { .. }));
    }
}
