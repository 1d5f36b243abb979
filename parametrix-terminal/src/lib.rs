/// Terminal front end for the Parametrix shape engine
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Point3;
use parametrix_core::tessellate::tessellate;
use parametrix_core::{compose, render, Camera, RotationState, ShapeList, Transform};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub mod config;
pub mod renderer;
pub mod source;

pub use config::{ConfigError, TerminalConfig, ViewMode};
pub use renderer::AsciiRenderer;
pub use source::{ShapeSource, SourceError};

const AXIS_LENGTH: f32 = 20.0;
const ROTATE_STEP: f64 = 0.1;
const ZOOM_STEP: f32 = 0.9;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    source: ShapeSource,
    shapes: ShapeList,
    config: TerminalConfig,
    view: ViewMode,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    last_poll: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    status: Option<String>,
}

impl TerminalApp {
    pub fn new(mut source: ShapeSource, config: TerminalConfig) -> Result<Self, SourceError> {
        let shapes = source.load()?;
        let (width, height) = terminal::size().unwrap_or((80, 24));

        Ok(Self {
            source,
            shapes,
            view: config.start_view,
            config,
            rotation: RotationState::zero(),
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_poll: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            status: None,
        })
    }

    pub fn shapes(&self) -> &ShapeList {
        &self.shapes
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.reload_if_due();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Tab => {
                    self.view = self.view.toggled();
                    info!(view = self.view.label(), "switched view");
                }
                KeyCode::Char('w') | KeyCode::Up => {
                    self.rotation.rotate(ROTATE_STEP, 0.0, 0.0);
                }
                KeyCode::Char('s') | KeyCode::Down => {
                    self.rotation.rotate(-ROTATE_STEP, 0.0, 0.0);
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    self.rotation.rotate(0.0, 0.0, -ROTATE_STEP);
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    self.rotation.rotate(0.0, 0.0, ROTATE_STEP);
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    self.camera.zoom(ZOOM_STEP);
                }
                KeyCode::Char('-') => {
                    self.camera.zoom(1.0 / ZOOM_STEP);
                }
                KeyCode::Char('p') => {
                    self.camera.toggle_projection();
                    info!(mode = ?self.camera.mode, "switched projection");
                }
                KeyCode::Char('0') => {
                    self.rotation = RotationState::zero();
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Swap in a fresh snapshot between frames. A failed reload keeps the
    /// previous snapshot on screen.
    fn reload_if_due(&mut self) {
        if self.last_poll.elapsed() < self.config.poll_interval() {
            return;
        }
        self.last_poll = Instant::now();
        match self.source.poll() {
            Ok(Some(shapes)) => {
                self.shapes = shapes;
                self.status = None;
            }
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "keeping previous shape snapshot");
                self.status = Some(error.to_string());
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.renderer.resize(width as usize, height as usize);
        self.camera.aspect = width as f32 / height as f32;

        let skipped = match self.view {
            ViewMode::Flat => self.draw_flat(width, height),
            ViewMode::Solid => self.draw_solid(),
        };

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let line = format!(
            "Parametrix {} | {} | shapes: {} skipped: {} | FPS: {:.1} | Tab=View WASD=Rotate +/-=Zoom P=Proj Q=Quit",
            self.view.label(),
            self.source.path().display(),
            self.shapes.len(),
            skipped,
            self.fps
        );
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(fit(&line, width)),
            ResetColor
        )?;

        if let Some(status) = &self.status {
            queue!(
                stdout,
                cursor::MoveTo(0, height - 1),
                SetForegroundColor(Color::Red),
                Print(fit(status, width)),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn draw_flat(&mut self, width: u16, height: u16) -> usize {
        // Two canvas pixels per terminal row keeps the view's aspect.
        let view = self
            .config
            .view
            .resized(width as f64, height as f64 * 2.0);
        let frame = render(self.shapes.as_slice(), &view);
        self.renderer.draw_frame(&frame);
        frame.skipped.len()
    }

    fn draw_solid(&mut self) -> usize {
        let model = Transform::rotation_matrix(&self.rotation).cast::<f32>();
        let scene = compose(self.shapes.as_slice());

        self.renderer.clear();
        for node in &scene.nodes {
            let color = renderer::terminal_color(node.color);
            self.renderer
                .render_mesh(&tessellate(&node.solid), &model, &self.camera, color);
        }

        let origin = Point3::origin();
        let axes = [
            Point3::new(AXIS_LENGTH, 0.0, 0.0),
            Point3::new(0.0, AXIS_LENGTH, 0.0),
            Point3::new(0.0, 0.0, AXIS_LENGTH),
        ];
        for axis in axes {
            self.renderer.draw_line_3d(
                &(origin - axis.coords),
                &axis,
                &self.camera,
                &model,
                Color::DarkGrey,
            );
        }
        scene.skipped.len()
    }
}

/// Cut a status line to the terminal width.
fn fit(text: &str, width: u16) -> String {
    text.chars().take(width as usize).collect()
}
