//! Wavefront OBJ geometry reader.
//!
//! Only the records needed to recover triangles are read: `v`, `f`, `o` and
//! `g`. Normals, texture coordinates, materials and smoothing groups are
//! skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use glam::Vec3;

use crate::error::MeshError;
use crate::mesh::TriangleMesh;

/// A named object (`o` / `g` record) and the triangles declared under it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjObject {
    pub name: String,
    /// Zero-based indices into the file-wide vertex list.
    pub faces: Vec<[u32; 3]>,
}

/// Parsed OBJ file: one shared vertex pool and the objects that index it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    vertices: Vec<Vec3>,
    objects: Vec<ObjObject>,
}

impl ObjMesh {
    /// Reads and parses the OBJ file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mesh = Self::from_reader(file)?;
        log::debug!(
            "loaded {}: {} vertices, {} objects",
            path.display(),
            mesh.vertices.len(),
            mesh.objects.len()
        );
        Ok(mesh)
    }

    /// Parses OBJ text from any `Read` source.
    ///
    /// Lines are decoded lossily: exporters often write comments and object
    /// names in a legacy 8-bit encoding.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MeshError> {
        let mut reader = BufReader::new(reader);
        let mut parser = Parser::default();
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            parser.line(line_no, &String::from_utf8_lossy(&buf))?;
        }
        Ok(parser.finish())
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn objects(&self) -> &[ObjObject] {
        &self.objects
    }

    /// Returns the first object that declares at least one face.
    pub fn primary(&self) -> Option<&ObjObject> {
        self.objects.iter().find(|o| !o.faces.is_empty())
    }

    /// Builds the triangle mesh of the primary object.
    pub fn primary_mesh(&self) -> Result<TriangleMesh, MeshError> {
        let object = self.primary().ok_or(MeshError::NoFaces)?;
        Ok(TriangleMesh::new(self.vertices.clone(), object.faces.clone()))
    }
}

#[derive(Default)]
struct Parser {
    vertices: Vec<Vec3>,
    objects: Vec<ObjObject>,
}

impl Parser {
    fn line(&mut self, line_no: usize, raw: &str) -> Result<(), MeshError> {
        let line = raw.trim();
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => {
                let mut coord = [0.0f32; 3];
                for (axis, slot) in coord.iter_mut().enumerate() {
                    let token = parts.next().ok_or_else(|| {
                        MeshError::parse(line_no, format!("vertex is missing component {axis}"))
                    })?;
                    *slot = token.parse().map_err(|_| {
                        MeshError::parse(line_no, format!("invalid number `{token}`"))
                    })?;
                }
                self.vertices.push(Vec3::from_array(coord));
            }

            Some("f") => {
                let corners = parts
                    .map(|token| self.resolve_index(line_no, token))
                    .collect::<Result<Vec<u32>, _>>()?;

                if corners.len() < 3 {
                    return Err(MeshError::parse(
                        line_no,
                        format!("face needs at least 3 corners, got {}", corners.len()),
                    ));
                }

                let object = self.current_object();
                // Fan triangulation around the first corner.
                for pair in corners[1..].windows(2) {
                    object.faces.push([corners[0], pair[0], pair[1]]);
                }
            }

            Some("o") | Some("g") => {
                let name = parts.collect::<Vec<_>>().join(" ");
                self.start_object(name);
            }

            _ => {}
        }

        Ok(())
    }

    /// Resolves one `f` corner token (`i`, `i/t`, `i//n`, `i/t/n`) to a zero-based index.
    fn resolve_index(&self, line_no: usize, token: &str) -> Result<u32, MeshError> {
        let head = token.split('/').next().unwrap_or(token);
        let raw: i64 = head
            .parse()
            .map_err(|_| MeshError::parse(line_no, format!("invalid face index `{token}`")))?;

        let count = self.vertices.len();
        let resolved = match raw {
            0 => return Err(MeshError::parse(line_no, "face index 0 is not valid")),
            r if r > 0 => r - 1,
            r => count as i64 + r,
        };

        if resolved < 0 || resolved >= count as i64 {
            return Err(MeshError::IndexOutOfRange { line: line_no, index: raw, count });
        }

        Ok(resolved as u32)
    }

    fn current_object(&mut self) -> &mut ObjObject {
        if self.objects.is_empty() {
            self.objects.push(ObjObject::default());
        }
        let last = self.objects.len() - 1;
        &mut self.objects[last]
    }

    fn start_object(&mut self, name: String) {
        // An object that has not received faces yet is renamed instead of left empty.
        match self.objects.last_mut() {
            Some(last) if last.faces.is_empty() => last.name = name,
            _ => self.objects.push(ObjObject { name, faces: Vec::new() }),
        }
    }

    fn finish(self) -> ObjMesh {
        ObjMesh {
            vertices: self.vertices,
            objects: self.objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> ObjMesh {
        ObjMesh::from_reader(src.as_bytes()).unwrap()
    }

    fn parse_err(src: &str) -> MeshError {
        parse_err_bytes(src.as_bytes())
    }

    fn parse_err_bytes(src: &[u8]) -> MeshError {
        ObjMesh::from_reader(src).unwrap_err()
    }

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn quad_is_fan_triangulated() {
        let obj = parse(QUAD);
        assert_eq!(obj.vertices().len(), 4);
        let faces = &obj.primary().unwrap().faces;
        assert_eq!(faces, &vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn slash_forms_use_vertex_index() {
        let obj = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1/1 3\n");
        assert_eq!(obj.primary().unwrap().faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn negative_indices_are_relative() {
        let obj = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n");
        assert_eq!(obj.primary().unwrap().faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn fourth_vertex_component_is_ignored() {
        let obj = parse("v 1 2 3 1.0\n");
        assert_eq!(obj.vertices()[0], Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn primary_skips_objects_without_faces() {
        let src = "\
o empty
g body
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o wheel
f 3 2 1
";
        let obj = parse(src);
        // `empty` had no faces yet, so `g body` renamed it.
        assert_eq!(obj.objects().len(), 2);
        assert_eq!(obj.primary().unwrap().name, "body");
        assert_eq!(obj.primary_mesh().unwrap().triangle_count(), 1);
    }

    #[test]
    fn no_faces_is_an_error() {
        let obj = parse("v 0 0 0\nv 1 0 0\n");
        assert!(matches!(obj.primary_mesh(), Err(MeshError::NoFaces)));
    }

    #[test]
    fn bad_number_reports_line() {
        match parse_err("v 0 0 0\nv 1 x 0\n") {
            MeshError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_component_is_an_error() {
        assert!(matches!(parse_err("v 1 2\n"), MeshError::Parse { line: 1, .. }));
    }

    #[test]
    fn out_of_range_index() {
        match parse_err("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n") {
            MeshError::IndexOutOfRange { line, index, count } => {
                assert_eq!((line, index, count), (4, 9, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_index_is_rejected() {
        assert!(matches!(parse_err("v 0 0 0\nf 0 1 1\n"), MeshError::Parse { .. }));
    }

    #[test]
    fn degenerate_face_is_rejected() {
        assert!(matches!(parse_err("v 0 0 0\nv 1 0 0\nf 1 2\n"), MeshError::Parse { .. }));
    }

    #[test]
    fn latin1_comment_is_tolerated() {
        let src = b"# cr\xe9\xe9 par exporter\r\nv 0 0 0\nv 1 0 0\nv 0 1 0\no b\xe2te\nf 1 2 3\n";
        let obj = ObjMesh::from_reader(&src[..]).unwrap();
        assert_eq!(obj.vertices().len(), 3);
        let primary = obj.primary().unwrap();
        assert_eq!(primary.name, "b\u{fffd}te");
        assert_eq!(primary.faces, vec![[0, 1, 2]]);
        assert_eq!(obj.primary_mesh().unwrap().triangle_count(), 1);
    }

    #[test]
    fn invalid_bytes_keep_line_numbers() {
        match parse_err_bytes(b"# \xff\xfe\nv 0 0 0\nv 1 \xe9 0\n") {
            MeshError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ObjMesh::load("/definitely/not/here.obj").unwrap_err();
        assert!(err.to_string().contains("here.obj"));
    }
}
