use std::time::Instant;

use crate::{
    abs::App,
    input::{KeyboardState, UpdateContext},
    viewer::Viewer,
};

mod abs;
mod config;
mod import;
mod input;
mod model;
mod scene;
mod viewer;

fn setup_logger() -> Result<(), fern::InitError> {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn main() {
    if let Err(e) = setup_logger() {
        eprintln!("Failed to set up logging: {e}");
    }

    let mut app = match App::new(config::WINDOW_TITLE, config::WINDOW_WIDTH, config::WINDOW_HEIGHT) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    app.log_gl_info();

    let mut viewer = Viewer::new(&app.gl, app.window.drawable_size());
    let mut last_frame_time = Instant::now();

    while viewer.is_running() {
        let now = Instant::now();
        let delta_time = now.duration_since(last_frame_time).as_secs_f32();
        last_frame_time = now;

        for event in app.event_pump.poll_iter() {
            viewer.handle_event(&event);
        }

        // Key state is only current once the event queue has been drained.
        let keyboard = KeyboardState::capture(&app.event_pump);
        viewer.update(&UpdateContext::new(&keyboard, delta_time));
        viewer.render();

        if delta_time > 0.0 {
            let title = format!("{} - FPS: {:.0}", config::WINDOW_TITLE, 1.0 / delta_time);
            if let Err(e) = app.window.set_title(&title) {
                log::warn!("Could not set window title: {e}");
            }
        }
        app.window.gl_swap_window();
    }

    viewer.shutdown();
}
