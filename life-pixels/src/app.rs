use crate::command::{Command, DEFAULT_RANDOMIZE_PROBABILITY};
use crate::console;
use error_iter::ErrorIter as _;
use life_grid::{Color, Direction, GridConfig, LifeError, Painter, Random, SharedGrid};
use life_loop::{Engine, LoopError, LoopHost, LoopRates};
use log::{info, warn};
use pixels::wgpu;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const TITLE: &str = "Game of Life";
const BACKGROUND_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Colors the `1` and `2` keys step through.
const COLOR_PRESETS: [Color; 6] = [
    Color::DARK_GRAY,
    Color::LIGHT_GRAY,
    Color::rgb(0x00, 0x00, 0x40),
    Color::rgb(0xff, 0xff, 0xff),
    Color::rgb(0x20, 0xc0, 0x40),
    Color::rgb(0xff, 0xa0, 0x00),
];

#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop failed")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("could not create the window")]
    Window(#[from] winit::error::OsError),
    #[error("could not create the pixel buffer")]
    Pixels(#[from] pixels::Error),
    #[error("could not resize the pixel buffer")]
    Texture(#[from] pixels::TextureError),
    #[error("could not start the console reader")]
    Console(#[source] io::Error),
    #[error("could not start the simulation loop")]
    Loop(#[from] LoopError),
    #[error(transparent)]
    Grid(#[from] LifeError),
}

#[derive(Clone, Copy, Debug)]
pub enum UserEvent {
    Redraw,
    Command(Command),
}

/// Forwards the loop thread's redraw requests to the event loop. Once the
/// event loop is gone the window counts as no longer visible.
#[derive(Clone)]
struct ProxyHost {
    proxy: EventLoopProxy<UserEvent>,
    closed: Arc<AtomicBool>,
}

impl ProxyHost {
    fn new(proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            proxy,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

impl LoopHost for ProxyHost {
    fn request_redraw(&mut self) {
        if self.proxy.send_event(UserEvent::Redraw).is_err() {
            self.close();
        }
    }

    fn is_visible(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }
}

pub fn run(config: GridConfig, rates: LoopRates) -> Result<(), AppError> {
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let console_proxy = event_loop.create_proxy();
    console::spawn(move |command| console_proxy.send_event(UserEvent::Command(command)).is_ok())
        .map_err(AppError::Console)?;

    let grid = Arc::new(SharedGrid::from_config(&config, Random::new()));
    let host = ProxyHost::new(event_loop.create_proxy());
    let mut handler = AppEventHandler::new(&config, Engine::new(grid, rates, host.clone()), host);
    event_loop.run_app(&mut handler)?;
    handler.failure.map_or(Ok(()), Err)
}

struct App {
    window: Arc<Window>,
    pixels: Pixels<'static>,
}

impl App {
    fn new(event_loop: &ActiveEventLoop, frame_size: PhysicalSize<u32>) -> Result<Self, AppError> {
        let window = Arc::new(Self::build_window(event_loop, frame_size)?);
        let pixels = Self::build_pixels(&window, frame_size)?;
        Ok(Self { window, pixels })
    }

    fn build_window(
        event_loop: &ActiveEventLoop,
        frame_size: PhysicalSize<u32>,
    ) -> Result<Window, AppError> {
        let window_attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(frame_size)
            .with_min_inner_size(frame_size)
            .with_visible(false);
        Ok(event_loop.create_window(window_attributes)?)
    }

    fn build_pixels(
        window: &Arc<Window>,
        frame_size: PhysicalSize<u32>,
    ) -> Result<Pixels<'static>, AppError> {
        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        let pixels = PixelsBuilder::new(frame_size.width, frame_size.height, surface_texture)
            .clear_color(BACKGROUND_COLOR)
            .build()?;
        Ok(pixels)
    }

    fn resize_buffer(&mut self, frame_size: PhysicalSize<u32>) -> Result<(), AppError> {
        self.pixels
            .resize_buffer(frame_size.width, frame_size.height)?;
        Ok(())
    }

    fn fit_window(&mut self, frame_size: PhysicalSize<u32>) -> Result<(), AppError> {
        self.window.set_min_inner_size(Some(frame_size));
        if let Some(size) = self.window.request_inner_size(frame_size) {
            self.pixels.resize_surface(size.width, size.height)?;
        }
        Ok(())
    }
}

struct AppEventHandler {
    engine: Engine<ProxyHost>,
    host: ProxyHost,
    painter: Painter,
    app: Option<App>,
    cursor: Option<PhysicalPosition<f64>>,
    direction: Direction,
    dead_preset: usize,
    alive_preset: usize,
    failure: Option<AppError>,
}

impl AppEventHandler {
    fn new(config: &GridConfig, engine: Engine<ProxyHost>, host: ProxyHost) -> Self {
        Self {
            engine,
            host,
            painter: Painter::from_config(config),
            app: None,
            cursor: None,
            direction: Direction::default(),
            dead_preset: 0,
            alive_preset: 1,
            failure: None,
        }
    }

    fn grid(&self) -> &SharedGrid {
        self.engine.grid()
    }

    fn frame_size(&self, painter: &Painter) -> Result<PhysicalSize<u32>, LifeError> {
        let (width, height) = painter.frame_size(&self.grid().snapshot())?;
        Ok(PhysicalSize::new(width, height))
    }

    fn on_create(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let app = App::new(event_loop, self.frame_size(&self.painter)?)?;
        app.window.request_redraw();
        app.window.set_visible(true);
        self.app = Some(app);

        info!(
            "Keys: space start/stop, R reset, N randomize, G glider at cursor, \
             D glider direction, 1/2 dead/alive color, Esc quit"
        );
        self.engine.start()?;
        Ok(())
    }

    fn on_redraw(&mut self) -> Result<(), AppError> {
        let generation = self.grid().snapshot();
        if let Some(app) = self.app.as_mut() {
            self.painter.render(&generation, app.pixels.frame_mut())?;
            app.pixels.render()?;
        }
        Ok(())
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        let command = match code {
            KeyCode::Space if self.engine.is_running() => Command::Stop,
            KeyCode::Space => Command::Start,
            KeyCode::KeyR => Command::Reset,
            KeyCode::KeyN => Command::Randomize {
                probability: DEFAULT_RANDOMIZE_PROBABILITY,
            },
            KeyCode::KeyG => match self.cursor_cell() {
                Some((x, y)) => Command::Glider {
                    x,
                    y,
                    direction: self.direction,
                },
                None => return,
            },
            KeyCode::KeyD => {
                self.direction = self.direction.next();
                info!("Glider direction {}", self.direction);
                return;
            }
            KeyCode::Digit1 => {
                self.dead_preset = (self.dead_preset + 1) % COLOR_PRESETS.len();
                Command::SetDeadColor(COLOR_PRESETS[self.dead_preset])
            }
            KeyCode::Digit2 => {
                self.alive_preset = (self.alive_preset + 1) % COLOR_PRESETS.len();
                Command::SetAliveColor(COLOR_PRESETS[self.alive_preset])
            }
            KeyCode::Escape | KeyCode::KeyQ => Command::Exit,
            _ => return,
        };
        self.execute(event_loop, command);
    }

    /// The grid cell under the mouse, if the mouse is over the grid.
    fn cursor_cell(&self) -> Option<(i64, i64)> {
        let app = self.app.as_ref()?;
        let position = self.cursor?;
        let (px, py) = app
            .pixels
            .window_pos_to_pixel((position.x as f32, position.y as f32))
            .ok()?;
        let scale = self.painter.scale() as usize;
        Some(((px / scale) as i64, (py / scale) as i64))
    }

    fn execute(&mut self, event_loop: &ActiveEventLoop, command: Command) {
        let result = match command {
            Command::Reset => {
                self.grid().reset_cells();
                Ok(())
            }
            Command::Randomize { probability } => self.grid().randomize_cells(probability),
            Command::Glider { x, y, direction } => self.grid().create_glider(x, y, direction),
            Command::SetDeadColor(color) => {
                self.painter.set_dead_color(color);
                info!("Dead cell color {}", self.painter.dead_color());
                Ok(())
            }
            Command::SetAliveColor(color) => {
                self.painter.set_alive_color(color);
                info!("Alive cell color {}", self.painter.alive_color());
                Ok(())
            }
            Command::Scale(scale) => {
                if let Err(err) = self.rescale(scale) {
                    warn!("Keeping cell scale {}: {err}", self.painter.scale());
                    for source in err.sources().skip(1) {
                        warn!("  Caused by: {source}");
                    }
                }
                Ok(())
            }
            Command::Start => {
                if let Err(err) = self.engine.start() {
                    warn!("{err}");
                }
                Ok(())
            }
            Command::Stop => {
                if self.engine.is_running() {
                    self.engine.stop();
                }
                Ok(())
            }
            Command::Exit => {
                self.exit(event_loop);
                Ok(())
            }
        };

        match result {
            Ok(()) => self.request_redraw(),
            Err(err) => warn!("Ignoring {command:?}: {err}"),
        }
    }

    /// Scale changes resize the frame buffer and the window, so they are
    /// applied as a fresh painter rather than a field update. The painter is
    /// only replaced once the frame buffer has taken the new size.
    fn rescale(&mut self, scale: u32) -> Result<(), AppError> {
        let painter = self.painter.rescaled(scale)?;
        let frame_size = self.frame_size(&painter)?;
        if let Some(app) = self.app.as_mut() {
            app.resize_buffer(frame_size)?;
        }
        self.painter = painter;
        info!("Cell scale {scale}");

        if let Some(app) = self.app.as_mut() {
            app.fit_window(frame_size)?;
        }
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(app) = &self.app {
            app.window.request_redraw();
        }
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.host.close();
        if self.engine.is_running() {
            self.engine.stop();
        }
        if let Some(app) = &self.app {
            app.window.set_visible(false);
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        self.failure.get_or_insert(err);
        self.exit(event_loop);
    }
}

impl ApplicationHandler<UserEvent> for AppEventHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_none() {
            if let Err(err) = self.on_create(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Redraw => self.request_redraw(),
            UserEvent::Command(command) => self.execute(event_loop, command),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.exit(event_loop);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Released,
                        repeat: false,
                        ..
                    },
                ..
            } => self.on_key(event_loop, code),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::Resized(size) => {
                if let Some(app) = self.app.as_mut() {
                    if let Err(err) = app.pixels.resize_surface(size.width, size.height) {
                        self.fail(event_loop, err.into());
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.on_redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.engine.join();
    }
}
