//! Camera and model transforms, and how held keys move them.

use glam::{EulerRot, Mat4, Quat, Vec3};
use sdl2::keyboard::Scancode;

use crate::{config, input::UpdateContext};

/// Position, rotation and scale of an object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Returns `translate * rotate * scale`.
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A perspective camera. It is never scaled.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: Vec3::ONE,
        }
        .matrix()
        .inverse()
    }

    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect_ratio, self.z_near, self.z_far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: config::CAMERA_START,
            rotation: Vec3::ZERO,
            fov: config::FIELD_OF_VIEW,
            z_near: config::Z_NEAR,
            z_far: config::Z_FAR,
        }
    }
}

/// The matrices uploaded to the shader each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMatrices {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

/// What a held key does, as a rate of change per second.
#[derive(Clone, Copy, Debug)]
enum Control {
    MoveCamera(Vec3),
    TurnModel(Vec3),
    ScaleModel(f32),
}

const FORWARD_KEYS: &[Scancode] = &[Scancode::Up, Scancode::W];
const BACKWARD_KEYS: &[Scancode] = &[Scancode::Down, Scancode::S];
const TURN_LEFT_KEYS: &[Scancode] = &[Scancode::Left, Scancode::A];
const TURN_RIGHT_KEYS: &[Scancode] = &[Scancode::Right, Scancode::D];
const SHRINK_KEYS: &[Scancode] = &[Scancode::LeftBracket];
const GROW_KEYS: &[Scancode] = &[Scancode::RightBracket];

fn controls() -> [(&'static [Scancode], Control); 6] {
    let turn = config::MODEL_TURN_RATE.to_radians();
    [
        (
            FORWARD_KEYS,
            Control::MoveCamera(Vec3::new(0.0, 0.0, -config::CAMERA_SPEED)),
        ),
        (
            BACKWARD_KEYS,
            Control::MoveCamera(Vec3::new(0.0, 0.0, config::CAMERA_SPEED)),
        ),
        (TURN_LEFT_KEYS, Control::TurnModel(Vec3::new(0.0, -turn, 0.0))),
        (TURN_RIGHT_KEYS, Control::TurnModel(Vec3::new(0.0, turn, 0.0))),
        (SHRINK_KEYS, Control::ScaleModel(-config::MODEL_SCALE_RATE)),
        (GROW_KEYS, Control::ScaleModel(config::MODEL_SCALE_RATE)),
    ]
}

/// Camera and model state, owned by the viewer and mutated once per frame.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub camera: Camera,
    pub model: Transform,
    pub matrices: FrameMatrices,
}

impl SceneState {
    pub fn new(aspect_ratio: f32) -> Self {
        let mut scene = Self {
            camera: Camera::default(),
            model: Transform::IDENTITY,
            matrices: FrameMatrices {
                model: Mat4::IDENTITY,
                view: Mat4::IDENTITY,
                projection: Mat4::IDENTITY,
            },
        };
        scene.recompute(aspect_ratio);
        scene
    }

    /// Applies the held keys scaled by the frame time, then recomputes the matrices.
    pub fn update(&mut self, ctx: &UpdateContext, aspect_ratio: f32) {
        for (keys, control) in controls() {
            if !ctx.keyboard.any_down(keys) {
                continue;
            }
            match control {
                Control::MoveCamera(rate) => self.camera.position += rate * ctx.delta_time,
                Control::TurnModel(rate) => self.model.rotation += rate * ctx.delta_time,
                Control::ScaleModel(rate) => self.model.scale += Vec3::splat(rate * ctx.delta_time),
            }
        }
        self.recompute(aspect_ratio);
    }

    /// Recomputes the matrices from the current transforms.
    pub fn recompute(&mut self, aspect_ratio: f32) {
        self.matrices = FrameMatrices {
            model: self.model.matrix(),
            view: self.camera.view(),
            projection: self.camera.projection(aspect_ratio),
        };
    }
}
