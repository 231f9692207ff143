//! Mesh file loading (STL and OBJ formats) and solid-volume geometry.
//!
//! One visual mesh file stands for one robot link; the link name is the
//! file's base name. Meshes are assumed to be closed, consistently wound
//! solids. STL loading enforces this with `stl_io`'s solidity check, and
//! the estimator rejects anything whose signed volume comes out degenerate.

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An indexed triangle surface in meters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriMesh {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,
    /// Counter-clockwise vertex indices, one triple per triangle.
    pub faces: Vec<[u32; 3]>,
}

impl TriMesh {
    /// Signed volume of the surface via the divergence theorem: the sum of
    /// signed tetrahedra spanned by each face and the origin.
    ///
    /// Positive for a closed surface with outward-facing winding; negative
    /// for an inside-out mesh; near zero when the surface is open or the
    /// winding is inconsistent.
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for &[i0, i1, i2] in &self.faces {
            let v0 = self.vertices[i0 as usize];
            let v1 = self.vertices[i1 as usize];
            let v2 = self.vertices[i2 as usize];
            volume += v0.dot(v1.cross(v2));
        }
        volume / 6.0
    }
}

/// Mesh format detected from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
    Unknown,
}

impl MeshFormat {
    /// Detect format from a file path.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("stl") => MeshFormat::Stl,
            Some("obj") => MeshFormat::Obj,
            _ => MeshFormat::Unknown,
        }
    }
}

/// Load an STL file as a solid mesh.
///
/// The indexed mesh is checked for solidity (every edge shared by exactly
/// two faces) before the f32 vertices are widened to f64.
pub fn load_stl(path: impl AsRef<Path>) -> Result<TriMesh> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| Error::MeshLoad {
        path: path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;
    let mut reader = BufReader::new(file);

    let mesh = stl_io::read_stl(&mut reader).map_err(|e| Error::MeshLoad {
        path: path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;
    mesh.validate().map_err(|e| Error::NonManifoldMesh {
        path: path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;

    let vertices = mesh
        .vertices
        .iter()
        .map(|v| DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let faces = mesh
        .faces
        .iter()
        .map(|f| {
            [
                f.vertices[0] as u32,
                f.vertices[1] as u32,
                f.vertices[2] as u32,
            ]
        })
        .collect();

    let tri = TriMesh { vertices, faces };
    if tri.faces.is_empty() {
        return Err(Error::MeshLoad {
            path: path.to_string_lossy().to_string(),
            reason: "no triangles found".to_string(),
        });
    }
    Ok(tri)
}

/// Load an OBJ file as a solid mesh.
///
/// All models in the file are merged into one surface; faces are
/// triangulated on load. OBJ carries no connectivity guarantees, so
/// closedness is only caught later by the degenerate-volume check.
pub fn load_obj(path: impl AsRef<Path>) -> Result<TriMesh> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        },
    )
    .map_err(|e| Error::MeshLoad {
        path: path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;

    let mut tri = TriMesh::default();
    for model in &models {
        let base = tri.vertices.len() as u32;
        tri.vertices.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        );
        tri.faces.extend(
            model
                .mesh
                .indices
                .chunks_exact(3)
                .map(|f| [base + f[0], base + f[1], base + f[2]]),
        );
    }

    if tri.faces.is_empty() {
        return Err(Error::MeshLoad {
            path: path.to_string_lossy().to_string(),
            reason: "no triangles found".to_string(),
        });
    }
    Ok(tri)
}

/// Load any supported mesh format.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<TriMesh> {
    let path = path.as_ref();
    match MeshFormat::from_path(path) {
        MeshFormat::Stl => load_stl(path),
        MeshFormat::Obj => load_obj(path),
        MeshFormat::Unknown => Err(Error::UnsupportedMeshFormat {
            path: path.to_string_lossy().to_string(),
        }),
    }
}

/// Load every mesh file of a directory, keyed by link name.
///
/// The link name is the file name without its extension. Files are visited
/// in sorted path order so diagnostics and downstream processing are
/// reproducible. Every regular file in the directory must be a supported
/// mesh: a stray unsupported file is an error rather than a skip, so a link
/// can never silently drop out of the mass budget.
pub fn load_mesh_dir(dir: impl AsRef<Path>) -> Result<BTreeMap<String, TriMesh>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| Error::MeshDirectory {
        path: dir.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::MeshDirectory {
            path: dir.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;
        if entry.path().is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(Error::EmptyMeshDirectory {
            path: dir.to_string_lossy().to_string(),
        });
    }

    let mut meshes = BTreeMap::new();
    for path in paths {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();
        let mesh = load_mesh(&path)?;
        if meshes.insert(name.clone(), mesh).is_some() {
            return Err(Error::DuplicateLink { link: name });
        }
    }
    Ok(meshes)
}

/// Axis-aligned box mesh used as a known-volume solid in tests.
#[cfg(test)]
pub(crate) fn box_mesh(size: DVec3, center: DVec3) -> TriMesh {
    let h = size / 2.0;
    let vertices = vec![
        center + DVec3::new(-h.x, -h.y, -h.z),
        center + DVec3::new(h.x, -h.y, -h.z),
        center + DVec3::new(h.x, h.y, -h.z),
        center + DVec3::new(-h.x, h.y, -h.z),
        center + DVec3::new(-h.x, -h.y, h.z),
        center + DVec3::new(h.x, -h.y, h.z),
        center + DVec3::new(h.x, h.y, h.z),
        center + DVec3::new(-h.x, h.y, h.z),
    ];
    let faces = vec![
        [0, 3, 2],
        [0, 2, 1],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [3, 7, 6],
        [3, 6, 2],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ];
    TriMesh { vertices, faces }
}

/// Write a mesh as a binary STL file for fixture directories in tests.
#[cfg(test)]
pub(crate) fn write_stl_fixture(path: &Path, mesh: &TriMesh) {
    let triangles: Vec<stl_io::Triangle> = mesh
        .faces
        .iter()
        .map(|&[a, b, c]| {
            let v0 = mesh.vertices[a as usize];
            let v1 = mesh.vertices[b as usize];
            let v2 = mesh.vertices[c as usize];
            let n = (v1 - v0).cross(v2 - v0).normalize_or_zero();
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([v0.x as f32, v0.y as f32, v0.z as f32]),
                    stl_io::Vertex::new([v1.x as f32, v1.y as f32, v1.z as f32]),
                    stl_io::Vertex::new([v2.x as f32, v2.y as f32, v2.z as f32]),
                ],
            }
        })
        .collect();
    let mut file = std::fs::File::create(path).unwrap();
    stl_io::write_stl(&mut file, triangles.iter()).unwrap();
}
