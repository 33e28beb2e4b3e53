//! Fixed settings of the viewer. There is no runtime configuration.

use glam::Vec3;

pub const WINDOW_TITLE: &str = "Crate Viewer";
pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 800;

/// Requested OpenGL core profile version.
pub const GL_VERSION: (u8, u8) = (3, 3);

pub const MODEL_PATH: &str = "models/Crate.obj";
pub const VERTEX_SHADER_PATH: &str = "shaders/shader.vert";
pub const FRAGMENT_SHADER_PATH: &str = "shaders/shader.frag";

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Vertical field of view in radians (about 57 degrees).
pub const FIELD_OF_VIEW: f32 = 1.0;
pub const Z_NEAR: f32 = 0.01;
pub const Z_FAR: f32 = 1000.0;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 5.0);

/// Camera travel along Z, in units per second.
pub const CAMERA_SPEED: f32 = 5.0;
/// Model yaw, in degrees per second.
pub const MODEL_TURN_RATE: f32 = 45.0;
/// Model scale change, per second.
pub const MODEL_SCALE_RATE: f32 = 0.1;

/// Diffuse color for materials that don't specify one.
pub const DEFAULT_DIFFUSE: Vec3 = Vec3::new(0.6, 0.6, 0.6);
