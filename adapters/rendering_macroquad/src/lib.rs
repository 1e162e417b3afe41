#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Dynamo.
//!
//! Dynamo is silent, so macroquad is built without its `audio` feature and
//! the adapter needs no sound libraries on the host.
//!
//! The adapter owns the window and the render loop. Each frame it polls the
//! keyboard, hands the input to the update closure, and blits the resulting
//! two-tone canvas as scaled squares, letterboxed to keep the aspect ratio.

use anyhow::Result;
use dynamo_core::{Key, KeySet};
use dynamo_rendering::{
    Canvas, Color, FrameControl, FrameInput, Presentation, RenderingBackend, Tone,
};
use glam::Vec2;
use log::info;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::{
    sync::mpsc,
    time::{Duration, Instant},
};

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

fn key_code(key: Key) -> KeyCode {
    match key {
        Key::W => KeyCode::W,
        Key::A => KeyCode::A,
        Key::S => KeyCode::S,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::Q => KeyCode::Q,
        Key::Escape => KeyCode::Escape,
    }
}

fn poll_keyboard() -> FrameInput {
    let mut held = KeySet::EMPTY;
    let mut pressed = KeySet::EMPTY;
    for key in Key::ALL {
        let code = key_code(key);
        if is_key_down(code) {
            held.insert(key);
        }
        if is_key_pressed(code) {
            pressed.insert(key);
        }
    }
    FrameInput { held, pressed }
}

/// Placement of the scaled canvas inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Viewport {
    origin: Vec2,
    pixel: f32,
}

impl Viewport {
    /// Largest whole-pixel magnification that fits the window, centred.
    ///
    /// Windows smaller than the canvas fall back to a fractional scale so the
    /// whole canvas stays visible.
    fn fit(screen: Vec2, canvas: Vec2) -> Self {
        if canvas.x <= 0.0 || canvas.y <= 0.0 {
            return Self {
                origin: Vec2::ZERO,
                pixel: 1.0,
            };
        }

        let exact = (screen.x / canvas.x).min(screen.y / canvas.y).max(0.0);
        let pixel = if exact >= 1.0 { exact.floor() } else { exact };
        let origin = (screen - canvas * pixel) * 0.5;
        Self { origin, pixel }
    }
}

fn draw_canvas(canvas: &Canvas, light: macroquad::color::Color, viewport: Viewport) {
    for (y, row) in canvas.rows().enumerate() {
        for (x, tone) in row.iter().enumerate() {
            if *tone != Tone::Light {
                continue;
            }
            let corner = viewport.origin + Vec2::new(x as f32, y as f32) * viewport.pixel;
            macroquad::shapes::draw_rectangle(
                corner.x,
                corner.y,
                viewport.pixel,
                viewport.pixel,
                light,
            );
        }
    }
}

/// Frame timings collected between two log lines.
#[derive(Debug, Default)]
struct FrameStats {
    window: Duration,
    frames: u32,
    update: Duration,
    draw: Duration,
}

/// Averages over one reporting window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    update: Duration,
    draw: Duration,
}

impl FrameStats {
    const REPORT_EVERY: Duration = Duration::from_secs(1);

    /// Adds one frame and, once a full window has passed, hands back its
    /// averages and starts a new window.
    fn record(&mut self, frame: Duration, update: Duration, draw: Duration) -> Option<FrameReport> {
        self.window += frame;
        self.frames = self.frames.saturating_add(1);
        self.update += update;
        self.draw += draw;

        if self.window < Self::REPORT_EVERY {
            return None;
        }

        let Self {
            window,
            frames,
            update,
            draw,
        } = std::mem::take(self);
        Some(FrameReport {
            fps: frames as f32 / window.as_secs_f32(),
            update: update / frames,
            draw: draw / frames,
        })
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Canvas) -> Result<FrameControl> + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            palette,
            canvas: canvas_size,
            window_scale,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: (canvas_size.width() * window_scale) as i32,
            window_height: (canvas_size.height() * window_scale) as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (outcome_sender, outcome_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let dark = to_macroquad_color(palette.color(Tone::Dark));
            let light = to_macroquad_color(palette.color(Tone::Light));
            let letterbox = macroquad::color::BLACK;
            let mut canvas = Canvas::new(canvas_size);
            let canvas_extent = Vec2::new(canvas.width() as f32, canvas.height() as f32);
            let mut stats = FrameStats::default();
            macroquad::input::show_mouse(false);

            loop {
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let input = poll_keyboard();

                let simulation_start = Instant::now();
                let control = update(frame_dt, input, &mut canvas);
                let simulation = simulation_start.elapsed();
                match control {
                    Ok(FrameControl::Continue) => {}
                    Ok(FrameControl::Exit) => {
                        let _ = outcome_sender.send(Ok(()));
                        break;
                    }
                    Err(error) => {
                        let _ = outcome_sender.send(Err(error));
                        break;
                    }
                }

                let render_start = Instant::now();
                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let viewport = Viewport::fit(screen, canvas_extent);
                macroquad::window::clear_background(letterbox);
                macroquad::shapes::draw_rectangle(
                    viewport.origin.x,
                    viewport.origin.y,
                    canvas_extent.x * viewport.pixel,
                    canvas_extent.y * viewport.pixel,
                    dark,
                );
                draw_canvas(&canvas, light, viewport);
                let render = render_start.elapsed();

                let report = stats.record(frame_dt, simulation, render);
                if let (true, Some(report)) = (show_fps, report) {
                    info!(
                        "{:.1} fps, update {:.2} ms, draw {:.2} ms",
                        report.fps,
                        report.update.as_secs_f64() * 1_000.0,
                        report.draw.as_secs_f64() * 1_000.0,
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        outcome_receiver.recv().unwrap_or_else(|_| Ok(()))
    }
}
