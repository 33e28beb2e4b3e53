//! The loaded model: GPU meshes and the materials they reference.
//!
//! A [`Model`] owns every GPU object created while uploading an imported scene. Dropping it
//! releases all of them.

use std::{path::Path, sync::Arc};

use glam::Vec3;

use crate::{
    abs::{self, Gpu, Texture, TextureImage},
    import::{self, ImportedMaterial, ImportedScene},
};

/// A flat diffuse color and an optional diffuse texture.
pub struct Material<G: Gpu = glow::Context> {
    pub diffuse_color: Vec3,
    pub diffuse_texture: Option<Texture<G>>,
}

impl<G: Gpu> Material<G> {
    pub fn has_diffuse_texture(&self) -> bool {
        self.diffuse_texture.is_some()
    }
}

/// Geometry on the GPU plus the index of the material it is drawn with.
pub struct Mesh<G: Gpu = glow::Context> {
    pub geometry: abs::Mesh<G>,
    pub material_index: usize,
}

/// An ordered list of meshes and the materials they reference by index.
///
/// Every mesh's material index is valid within the material list.
pub struct Model<G: Gpu = glow::Context> {
    meshes: Vec<Mesh<G>>,
    materials: Vec<Material<G>>,
}

impl<G: Gpu> Model<G> {
    /// A model with no content.
    pub fn empty() -> Self {
        Self {
            meshes: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Imports the scene file at `path` and uploads it. If the file can't be read the error is
    /// logged and the model is empty.
    pub fn load(gpu: &Arc<G>, path: &Path) -> Self {
        match import::import(path) {
            Ok(scene) => {
                log::info!("Loaded model file: {}", path.display());
                Self::upload(gpu, &scene, TextureImage::load)
            }
            Err(e) => {
                log::error!("{e}");
                Self::empty()
            }
        }
    }

    /// Uploads an imported scene. `load_image` decodes texture files.
    ///
    /// Materials are always kept, falling back to flat color when their texture can't be
    /// loaded or uploaded. Meshes that can't be uploaded, or that reference a material that
    /// doesn't exist, are skipped.
    pub fn upload(
        gpu: &Arc<G>,
        scene: &ImportedScene,
        load_image: impl Fn(&Path) -> Result<TextureImage, String>,
    ) -> Self {
        let materials: Vec<_> = scene
            .materials
            .iter()
            .map(|material| upload_material(gpu, material, &load_image))
            .collect();

        let mut meshes = Vec::with_capacity(scene.meshes.len());
        for mesh in &scene.meshes {
            if mesh.material_index >= materials.len() {
                log::warn!(
                    "Skipping mesh '{}': material {} out of range",
                    mesh.name,
                    mesh.material_index
                );
                continue;
            }
            if mesh.indices.is_empty() || mesh.positions.is_empty() {
                log::warn!("Skipping mesh '{}': no geometry", mesh.name);
                continue;
            }
            match abs::Mesh::new(gpu, &mesh.positions, mesh.uvs.as_deref(), &mesh.indices) {
                Ok(geometry) => {
                    log::debug!(
                        "Uploaded mesh '{}': {} vertices, {} triangles",
                        mesh.name,
                        mesh.vertex_count(),
                        geometry.triangle_count()
                    );
                    meshes.push(Mesh {
                        geometry,
                        material_index: mesh.material_index,
                    });
                }
                Err(e) => log::error!("Failed to upload mesh '{}': {e}", mesh.name),
            }
        }

        Self { meshes, materials }
    }

    pub fn meshes(&self) -> &[Mesh<G>] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material<G>] {
        &self.materials
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Iterates the meshes in order, each with its material.
    pub fn draw_list(&self) -> impl Iterator<Item = (&Mesh<G>, &Material<G>)> {
        self.meshes
            .iter()
            .map(|mesh| (mesh, &self.materials[mesh.material_index]))
    }

    /// Releases every GPU object owned by the model.
    pub fn unload(self) {
        log::info!(
            "Unloading model: {} meshes, {} materials",
            self.meshes.len(),
            self.materials.len()
        );
    }
}

fn upload_material<G: Gpu>(
    gpu: &Arc<G>,
    material: &ImportedMaterial,
    load_image: &impl Fn(&Path) -> Result<TextureImage, String>,
) -> Material<G> {
    log::debug!(
        "Material '{}': diffuse color {}",
        material.name,
        material.diffuse_color
    );

    let diffuse_texture = material.diffuse_texture.as_deref().and_then(|path| {
        let image = match load_image(path) {
            Ok(image) => image,
            Err(e) => {
                log::error!("Failed to load texture {}: {e}", path.display());
                return None;
            }
        };
        match Texture::new(gpu, &image) {
            Ok(texture) => {
                log::info!("Loaded texture: {}", path.display());
                Some(texture)
            }
            Err(e) => {
                log::warn!("Skipping texture {}: {e}", path.display());
                None
            }
        }
    });

    Material {
        diffuse_color: material.diffuse_color,
        diffuse_texture,
    }
}
