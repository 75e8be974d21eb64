use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use glam::Vec3;

use crate::error::ModelLoadError;
use crate::files::FileLoader;

use super::vertex::Vertex;

/// CPU-side geometry of one mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Geometry returned by a [`ModelLoader`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
}

pub trait ModelLoader {
    fn load_model(&self, path: &Path) -> Result<ModelData, ModelLoadError>;
}

/// Wavefront OBJ importer.
///
/// Faces are triangulated and each position/normal pair gets a single index.
/// Files without normals get smooth per-vertex normals. Materials are ignored.
#[derive(Debug, Clone)]
pub struct ObjLoader {
    files: Arc<dyn FileLoader>,
}

impl ObjLoader {
    pub fn new(files: Arc<dyn FileLoader>) -> Self {
        Self { files }
    }

    /// Parses OBJ `source`; `path` is only used in errors.
    pub fn parse(path: &Path, source: &str) -> Result<ModelData, ModelLoadError> {
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let mut reader = BufReader::new(source.as_bytes());
        let (models, _) = tobj::load_obj_buf(&mut reader, &options, |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| ModelLoadError {
            path: path.to_path_buf(),
            info: e.to_string(),
        })?;

        let meshes: Vec<MeshData> = models.into_iter().map(|m| mesh_data(m.mesh)).collect();
        if meshes.iter().all(|m| m.indices.is_empty()) {
            return Err(ModelLoadError {
                path: path.to_path_buf(),
                info: "no faces".to_string(),
            });
        }

        log::debug!(
            target: "kiln::models",
            "loaded {} ({} meshes)",
            path.display(),
            meshes.len()
        );
        Ok(ModelData { meshes })
    }
}

impl ModelLoader for ObjLoader {
    fn load_model(&self, path: &Path) -> Result<ModelData, ModelLoadError> {
        let source = self.files.load_text_file(path).map_err(|e| ModelLoadError {
            path: path.to_path_buf(),
            info: e.to_string(),
        })?;
        Self::parse(path, &source)
    }
}

fn mesh_data(mesh: tobj::Mesh) -> MeshData {
    let positions: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    let normals: Vec<[f32; 3]> = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect()
    } else {
        smooth_normals(&positions, &mesh.indices)
    };

    MeshData {
        vertices: positions
            .into_iter()
            .zip(normals)
            .map(|(position, normal)| Vertex::new(position, normal))
            .collect(),
        indices: mesh.indices,
    }
}

/// Area-weighted average of the face normals around each vertex.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        let n = (pb - pa).cross(pc - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }

    acc.into_iter().map(|n| n.normalize_or_zero().to_array()).collect()
}
