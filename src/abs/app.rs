//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use glow::HasContext;

use crate::config;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
///
/// Fields drop in declaration order, so the GL context goes before the window and SDL itself.
pub struct App {
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
    pub gl_context: sdl2::video::GLContext,
    pub window: sdl2::video::Window,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub sdl: sdl2::Sdl,
}

impl App {
    /// Creates a new [`App`] with a resizable window of the given title and size and a current
    /// OpenGL core context.
    ///
    /// Any error here is fatal for the viewer.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl = sdl2::init().map_err(|e| format!("SDL initialisation failed: {e}"))?;
        let video_subsystem = sdl
            .video()
            .map_err(|e| format!("SDL video initialisation failed: {e}"))?;
        log::info!("SDL initialised");

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(config::GL_VERSION.0, config::GL_VERSION.1);
        gl_attr.set_double_buffer(true);

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .opengl()
            .resizable()
            .build()
            .map_err(|e| format!("Error creating window: {e}"))?;
        let gl_context = window
            .gl_create_context()
            .map_err(|e| format!("Error creating context: {e}"))?;
        window
            .gl_make_current(&gl_context)
            .map_err(|e| format!("Error making context current: {e}"))?;
        if let Err(e) = video_subsystem.gl_set_swap_interval(sdl2::video::SwapInterval::VSync) {
            log::warn!("Could not enable vsync: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump()?;
        let gl = Arc::new(gl);

        Ok(Self {
            gl,
            event_pump,
            gl_context,
            window,
            video_subsystem,
            sdl,
        })
    }

    /// Logs the version strings of the current OpenGL context.
    pub fn log_gl_info(&self) {
        unsafe {
            log::info!("OpenGL version: {}", self.gl.get_parameter_string(glow::VERSION));
            log::info!(
                "GLSL version: {}",
                self.gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION)
            );
            log::info!("Vendor: {}", self.gl.get_parameter_string(glow::VENDOR));
            log::info!("Renderer: {}", self.gl.get_parameter_string(glow::RENDERER));
        }
    }
}
