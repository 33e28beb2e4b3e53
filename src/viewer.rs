//! The viewer's application context: everything the frame loop updates and draws.

use std::{path::Path, sync::Arc};

use glow::HasContext;
use sdl2::event::{Event, WindowEvent};

use crate::{
    abs::ShaderProgram,
    config,
    input::{self, UpdateContext},
    model::Model,
    scene::SceneState,
};

/// The two states of the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Quitting,
}

impl LoopState {
    /// Returns the state after seeing `event`. Quitting is final.
    pub fn after(self, event: &Event) -> Self {
        match self {
            LoopState::Running if input::is_quit_event(event) => LoopState::Quitting,
            state => state,
        }
    }
}

/// Owns the GL state of the viewer: the shader program, the model, and the scene transforms.
pub struct Viewer {
    gl: Arc<glow::Context>,
    program: Option<ShaderProgram>,
    model: Model,
    scene: SceneState,
    width: u32,
    height: u32,
    state: LoopState,
}

impl Viewer {
    /// Configures the fixed GL state, then loads the shader program and the model.
    ///
    /// Nothing here is fatal. A missing shader leaves the screen cleared; a missing model
    /// leaves it empty.
    pub fn new(gl: &Arc<glow::Context>, (width, height): (u32, u32)) -> Self {
        unsafe {
            gl.enable(glow::CULL_FACE);
            gl.cull_face(glow::BACK);
            gl.front_face(glow::CCW);
            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LEQUAL);
            let [r, g, b, a] = config::CLEAR_COLOR;
            gl.clear_color(r, g, b, a);
            gl.clear_depth_f32(1.0);
            gl.viewport(0, 0, width as i32, height as i32);
        }

        let program = match load_shader_program(
            gl,
            Path::new(config::VERTEX_SHADER_PATH),
            Path::new(config::FRAGMENT_SHADER_PATH),
        ) {
            Ok(program) => Some(program),
            Err(e) => {
                log::error!("{e}");
                None
            }
        };

        let model = Model::load(gl, Path::new(config::MODEL_PATH));
        if model.is_empty() {
            log::warn!("Nothing to draw, the model has no meshes");
        }

        Self {
            gl: Arc::clone(gl),
            program,
            model,
            scene: SceneState::new(aspect_ratio(width, height)),
            width,
            height,
            state: LoopState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Handles one pending event: quit requests and window resizes.
    pub fn handle_event(&mut self, event: &Event) {
        self.state = self.state.after(event);

        if let Event::Window {
            win_event: WindowEvent::Resized(width, height),
            ..
        } = event
        {
            self.width = (*width).max(1) as u32;
            self.height = (*height).max(1) as u32;
            unsafe {
                self.gl.viewport(0, 0, *width, *height);
            }
        }
    }

    /// Moves the camera and model from the held keys and recomputes the matrices.
    pub fn update(&mut self, ctx: &UpdateContext) {
        self.scene
            .update(ctx, aspect_ratio(self.width, self.height));
    }

    /// Draws the model.
    pub fn render(&self) {
        unsafe {
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        let Some(program) = &self.program else {
            return;
        };

        program.use_program();
        program.set_uniform("model", self.scene.matrices.model);
        program.set_uniform("cameraView", self.scene.matrices.view);
        program.set_uniform("cameraProjection", self.scene.matrices.projection);

        for (mesh, material) in self.model.draw_list() {
            program.set_uniform("diffuseColor", material.diffuse_color);
            program.set_uniform("hasDiffuseTexture", material.has_diffuse_texture());
            if let Some(texture) = &material.diffuse_texture {
                texture.bind(0);
                program.set_uniform("diffuseTexture", 0);
            }
            mesh.geometry.draw();
        }
    }

    /// Releases the model and then the shader program.
    pub fn shutdown(self) {
        let Self { model, program, .. } = self;
        model.unload();
        drop(program);
        log::info!("Viewer shut down");
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

fn load_shader_program(
    gl: &Arc<glow::Context>,
    vertex_path: &Path,
    fragment_path: &Path,
) -> Result<ShaderProgram, String> {
    let read = |path: &Path| {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Couldn't open shader {}: {e}", path.display()))
    };
    let program = ShaderProgram::from_sources(gl, &read(vertex_path)?, &read(fragment_path)?)?;
    log::info!(
        "Loaded shader program from {} and {}",
        vertex_path.display(),
        fragment_path.display()
    );
    Ok(program)
}

#[cfg(test)]
mod tests {
    use sdl2::keyboard::{Keycode, Mod, Scancode};

    use super::*;

    fn key_down(scancode: Scancode, keycode: Keycode) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 1,
            keycode: Some(keycode),
            scancode: Some(scancode),
            keymod: Mod::NOMOD,
            repeat: false,
        }
    }

    #[test]
    fn test_running_until_quit() {
        let state = LoopState::Running
            .after(&key_down(Scancode::W, Keycode::W))
            .after(&Event::Window {
                timestamp: 0,
                window_id: 1,
                win_event: WindowEvent::Resized(640, 480),
            });
        assert_eq!(state, LoopState::Running);

        assert_eq!(
            state.after(&key_down(Scancode::Escape, Keycode::Escape)),
            LoopState::Quitting
        );
        assert_eq!(
            state.after(&Event::Quit { timestamp: 0 }),
            LoopState::Quitting
        );
    }

    #[test]
    fn test_quitting_is_final() {
        let state = LoopState::Quitting.after(&key_down(Scancode::W, Keycode::W));
        assert_eq!(state, LoopState::Quitting);
    }

    #[test]
    fn test_aspect_ratio_never_divides_by_zero() {
        assert_eq!(aspect_ratio(800, 800), 1.0);
        assert_eq!(aspect_ratio(1600, 800), 2.0);
        assert!(aspect_ratio(800, 0).is_finite());
    }
}
