//! Reading OBJ scenes into plain arrays, ready for upload.
//!
//! Faces are triangulated and position/UV indices are merged into a single index stream per
//! mesh. The importer guarantees that every mesh's material index is valid.

use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::config;

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedMesh {
    pub name: String,
    /// 3 floats per vertex.
    pub positions: Vec<f32>,
    /// 2 floats per vertex, with V flipped so row 0 of the image is the top of the texture.
    pub uvs: Option<Vec<f32>>,
    pub indices: Vec<u32>,
    pub material_index: usize,
}

impl ImportedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedMaterial {
    pub name: String,
    pub diffuse_color: Vec3,
    /// Resolved relative to the directory of the scene file.
    pub diffuse_texture: Option<PathBuf>,
}

impl ImportedMaterial {
    fn fallback() -> Self {
        Self {
            name: "DefaultMaterial".to_string(),
            diffuse_color: config::DEFAULT_DIFFUSE,
            diffuse_texture: None,
        }
    }
}

/// Everything the importer read from a scene file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedScene {
    pub meshes: Vec<ImportedMesh>,
    pub materials: Vec<ImportedMaterial>,
}

/// Reads the OBJ file at `path` along with its material library.
///
/// A missing material library is only a warning; the meshes then use a default material.
pub fn import(path: &Path) -> Result<ImportedScene, String> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| format!("Error loading model {}: {e}", path.display()))?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("Could not load materials for {}: {e}", path.display());
        Vec::new()
    });

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let mut materials: Vec<ImportedMaterial> = materials
        .into_iter()
        .map(|material| ImportedMaterial {
            diffuse_color: material
                .diffuse
                .map(Vec3::from)
                .unwrap_or(config::DEFAULT_DIFFUSE),
            diffuse_texture: material
                .diffuse_texture
                .filter(|texture| !texture.is_empty())
                .map(|texture| base_dir.join(texture)),
            name: material.name,
        })
        .collect();

    let mut fallback = None;
    let meshes = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            let material_index = match mesh.material_id {
                Some(index) if index < materials.len() => index,
                other => {
                    if let Some(index) = other {
                        log::warn!("Mesh '{}' references missing material {index}", model.name);
                    }
                    *fallback.get_or_insert_with(|| {
                        materials.push(ImportedMaterial::fallback());
                        materials.len() - 1
                    })
                }
            };

            let vertex_count = mesh.positions.len() / 3;
            let uvs = (mesh.texcoords.len() == vertex_count * 2 && vertex_count > 0).then(|| {
                mesh.texcoords
                    .chunks_exact(2)
                    .flat_map(|uv| [uv[0], 1.0 - uv[1]])
                    .collect()
            });

            ImportedMesh {
                name: model.name,
                positions: mesh.positions,
                uvs,
                indices: mesh.indices,
                material_index,
            }
        })
        .collect();

    Ok(ImportedScene { meshes, materials })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    /// A scratch directory under the system temp dir, removed on drop.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("crate-viewer-{name}-{}", std::process::id()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, file: &str, contents: &str) -> PathBuf {
            let path = self.0.join(file);
            fs::write(&path, contents).unwrap();
            path
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    const QUAD_OBJ: &str = "\
mtllib quad.mtl
o Quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
usemtl Painted
f 1/1 2/2 3/3 4/4
";

    const QUAD_MTL: &str = "\
newmtl Painted
Kd 1.0 0.5 0.25
map_Kd paint.png
";

    #[test]
    fn test_import_textured_quad() {
        let dir = ScratchDir::new("quad");
        dir.write("quad.mtl", QUAD_MTL);
        let path = dir.write("quad.obj", QUAD_OBJ);

        let scene = import(&path).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.materials.len(), 1);

        let mesh = &scene.meshes[0];
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));

        let uvs = mesh.uvs.as_ref().unwrap();
        assert_eq!(uvs.len(), 8);
        // V is flipped: every v is 0 or 1, so flipping maps the set onto itself per vertex.
        for (vertex, uv) in mesh.positions.chunks(3).zip(uvs.chunks(2)) {
            assert_eq!(uv[0], vertex[0]);
            assert_eq!(uv[1], 1.0 - vertex[1]);
        }

        let material = &scene.materials[mesh.material_index];
        assert_eq!(material.name, "Painted");
        assert_eq!(material.diffuse_color, Vec3::new(1.0, 0.5, 0.25));
        assert_eq!(material.diffuse_texture, Some(dir.0.join("paint.png")));
    }

    #[test]
    fn test_mesh_without_material_gets_default() {
        let dir = ScratchDir::new("bare");
        let path = dir.write(
            "bare.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );

        let scene = import(&path).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].uvs, None);
        assert_eq!(scene.meshes[0].indices, vec![0, 1, 2]);
        assert_eq!(scene.materials, vec![ImportedMaterial::fallback()]);
        assert_eq!(scene.meshes[0].material_index, 0);
    }

    #[test]
    fn test_missing_material_library_is_not_fatal() {
        let dir = ScratchDir::new("nomtl");
        let path = dir.write("nomtl.obj", QUAD_OBJ);

        let scene = import(&path).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        for mesh in &scene.meshes {
            assert!(mesh.material_index < scene.materials.len());
        }
        assert_eq!(scene.materials[scene.meshes[0].material_index].diffuse_texture, None);
    }

    #[test]
    fn test_meshes_share_one_default_material() {
        let dir = ScratchDir::new("shared");
        let path = dir.write(
            "shared.obj",
            "o A\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no B\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        );

        let scene = import(&path).unwrap();
        assert_eq!(scene.meshes.len(), 2);
        assert_eq!(scene.materials.len(), 1);
        assert!(scene.meshes.iter().all(|mesh| mesh.material_index == 0));
    }

    #[test]
    fn test_shipped_crate_model() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(config::MODEL_PATH);
        let scene = import(&path).unwrap();

        assert_eq!(scene.meshes.len(), 1);
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.indices.len(), 6 * 2 * 3);
        assert!(mesh.uvs.is_some());

        let texture = scene.materials[mesh.material_index]
            .diffuse_texture
            .as_ref()
            .unwrap();
        assert!(texture.ends_with("crate.png"));
        let image = crate::abs::TextureImage::load(texture).unwrap();
        assert!(image.format.upload().is_some());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = ScratchDir::new("missing");
        assert!(import(&dir.0.join("nope.obj")).is_err());
    }
}
