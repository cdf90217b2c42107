use crate::errors::{Result, TpmsError};
use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::fmt::Write as _;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Triangles of `mesh` as position triples with a unit normal from winding.
fn facets(mesh: &Mesh) -> impl Iterator<Item = (Vector3<Real>, [Point3<Real>; 3])> + '_ {
    mesh.face_normals()
        .into_iter()
        .zip(&mesh.faces)
        .map(|(n, f)| (n, f.map(|i| mesh.vertices[i])))
}

/// Export to ASCII STL
/// Convert a mesh to an **ASCII STL** string with the given `name`.
///
/// Every face is written as its own facet; shared vertices are repeated.
///
/// ```rust
/// # use tpmsgen::mesh::shapes::cuboid;
/// # use nalgebra::Vector3;
/// let cube = cuboid(&Vector3::repeat(1.0));
/// let text = tpmsgen::io::to_stl_ascii(&cube, "my_solid");
/// assert!(text.starts_with("solid my_solid\n"));
/// assert_eq!(text.matches("facet normal").count(), 12);
/// ```
pub fn to_stl_ascii(mesh: &Mesh, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {name}");

    for (n, tri) in facets(mesh) {
        let _ = writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z);
        out.push_str("    outer loop\n");
        for p in &tri {
            let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// The binary header carries no name, so `_name` is accepted only for
/// symmetry with [`to_stl_ascii`].
pub fn to_stl_binary(mesh: &Mesh, _name: &str) -> Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let triangles: Vec<Triangle> = facets(mesh)
        .map(|(n, tri)| Triangle {
            normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
            vertices: tri.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
        })
        .collect();

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Read an ASCII or binary STL into an indexed mesh.
///
/// `stl_io` merges identical vertices while reading; no normals are kept.
pub fn read_stl(bytes: &[u8]) -> Result<Mesh> {
    let indexed = stl_io::read_stl(&mut Cursor::new(bytes))?;
    let vertices = indexed
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as Real, v[1] as Real, v[2] as Real))
        .collect();
    let faces = indexed.faces.iter().map(|f| f.vertices).collect();
    Mesh::from_parts(vertices, faces, None)
}

/// Write `mesh` as ASCII STL to `<directory>/<file_name>.stl`.
///
/// The directory must exist. Returns the path written.
pub fn export_stl_file(mesh: &Mesh, file_name: &str, directory: impl AsRef<Path>) -> Result<PathBuf> {
    if file_name.is_empty() {
        return Err(TpmsError::invalid("file_name", "must not be empty"));
    }
    let path = directory.as_ref().join(format!("{file_name}.stl"));
    std::fs::write(&path, to_stl_ascii(mesh, file_name))?;
    log::info!("wrote {} triangles to {}", mesh.face_count(), path.display());
    Ok(path)
}

impl Mesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self, name: &str) -> Result<Vec<u8>> {
        self::to_stl_binary(self, name)
    }
}
