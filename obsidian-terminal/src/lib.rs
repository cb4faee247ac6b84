/// Terminal front end: renders an object into a character canvas
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{self},
};
use obsidian_core::{Camera, Color, Object, RenderLoop, Renderer, WindowSize};
use std::io::{self, stdout, Write};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub mod canvas;
pub mod config;
pub mod error;

pub use canvas::AsciiCanvas;
pub use config::Config;
pub use error::AppError;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 0.5;
/// Camera movement per key press
const CAMERA_STEP: f64 = 0.5;

const OBJECT_COLOR: Color = Color::CYAN;
const OVERLAY_COLOR: Color = Color::YELLOW;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Apply a key press to the camera
pub fn handle_key(camera: &mut Camera, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('w') | KeyCode::Up => camera.translate(0.0, 0.0, CAMERA_STEP),
        KeyCode::Char('s') | KeyCode::Down => camera.translate(0.0, 0.0, -CAMERA_STEP),
        KeyCode::Char('a') | KeyCode::Left => camera.translate(-CAMERA_STEP, 0.0, 0.0),
        KeyCode::Char('d') | KeyCode::Right => camera.translate(CAMERA_STEP, 0.0, 0.0),
        // Screen y grows downwards
        KeyCode::Char('r') => camera.translate(0.0, -CAMERA_STEP, 0.0),
        KeyCode::Char('f') => camera.translate(0.0, CAMERA_STEP, 0.0),
        _ => {}
    }
    Action::Continue
}

/// Everything one frame touches, shared between the input and render threads
pub struct Scene {
    pub renderer: Renderer,
    pub canvas: AsciiCanvas,
    pub window: WindowSize,
}

impl Scene {
    pub fn new(width: u16, height: u16, config: &Config) -> Self {
        let mut renderer = Renderer::with_scale(config.scale, config.scale * CELL_ASPECT);
        renderer.camera_mut().set_z(config.camera_z);
        Self {
            renderer,
            canvas: AsciiCanvas::new(width as usize, height as usize, Color::BLACK),
            window: WindowSize::new(u32::from(width), u32::from(height)),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.canvas.resize(width as usize, height as usize);
        self.window = WindowSize::new(u32::from(width), u32::from(height));
    }

    /// Draw `object` and the status line into the back buffer.
    pub fn draw(&mut self, object: &Object, filled: bool, fps: u32) -> Result<(), AppError> {
        self.canvas.clear();
        let drawn = self.renderer.render_object(
            object,
            OBJECT_COLOR,
            filled,
            &mut self.canvas,
            self.window,
        );

        let camera = self.renderer.camera();
        self.canvas.draw_text(
            0,
            0,
            &format!(
                "Obsidian | FPS: {} | Camera ({:.1}, {:.1}, {:.1}) | WASD/Arrows=Move R/F=Up/Down Q=Quit",
                fps,
                camera.x(),
                camera.y(),
                camera.z()
            ),
            OVERLAY_COLOR,
        );

        drawn.map_err(AppError::from)
    }
}

/// Runs `restore` when dropped, so early returns still undo terminal setup
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    /// Raw mode plus alternate screen; the guard exists as soon as raw mode is on
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self {
            restore: restore_terminal,
        };
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(err) = terminal::disable_raw_mode() {
        log::warn!("failed to disable raw mode: {}", err);
    }
    if let Err(err) = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show) {
        log::warn!("failed to leave alternate screen: {}", err);
    }
}

fn lock(scene: &Mutex<Scene>) -> MutexGuard<'_, Scene> {
    scene.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    object: Arc<Object>,
    scene: Arc<Mutex<Scene>>,
    filled: bool,
    render_loop: RenderLoop,
}

impl TerminalApp {
    pub fn new(object: Object, config: &Config) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let mut render_loop = RenderLoop::new();
        if let Some(fps) = config.fps_cap {
            render_loop = render_loop.with_fps_cap(fps);
        }

        Ok(Self {
            object: Arc::new(object),
            scene: Arc::new(Mutex::new(Scene::new(width, height, config))),
            filled: config.filled,
            render_loop,
        })
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        let _terminal = TerminalGuard::enter()?;

        let result = self.main_loop();
        // Stop drawing before the guard leaves the alternate screen
        self.render_loop.stop();
        result
    }

    fn start_rendering(&mut self) -> io::Result<()> {
        let object = Arc::clone(&self.object);
        let scene = Arc::clone(&self.scene);
        let fps = self.render_loop.fps_handle();
        let filled = self.filled;

        self.render_loop.start(move || -> Result<(), AppError> {
            let mut scene = lock(&scene);
            let drawn = scene.draw(&object, filled, fps.load(Ordering::Relaxed));

            // Present whatever was drawn even when a mesh failed
            let mut stdout = stdout();
            scene.canvas.present(&mut stdout)?;
            stdout.flush()?;
            drawn
        })
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        self.start_rendering()?;

        loop {
            if !event::poll(Duration::from_millis(50))? {
                continue;
            }

            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    let mut scene = lock(&self.scene);
                    if handle_key(scene.renderer.camera_mut(), code) == Action::Quit {
                        break;
                    }
                }
                Event::Resize(width, height) => {
                    log::info!("terminal resized to {}x{}", width, height);
                    lock(&self.scene).resize(width, height);
                }
                _ => {}
            }
        }

        Ok(())
    }
}
