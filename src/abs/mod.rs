//! This module contains the thin GPU layer of the viewer, including application setup, shader
//! management, mesh geometry and textures.

pub mod app;
pub mod gpu;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use gpu::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
