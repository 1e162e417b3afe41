#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Dynamo adapters.
//!
//! Everything is drawn into a two-tone [`Canvas`] the size of the logical
//! display. Backends only ever blit that canvas, so the look of every screen is
//! decided here and can be tested without a window.

mod glyphs;

use anyhow::Result as AnyResult;
use dynamo_core::{CanvasSize, KeySet, OccupancyBitmap, Point, Tile};
use glam::UVec2;
use std::time::Duration;

pub use self::glyphs::{draw_text, text_width, GLYPH_HEIGHT};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// One of the two shades a pixel can take.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tone {
    /// The "off" shade, close to black.
    #[default]
    Dark,
    /// The "on" shade, close to white.
    Light,
}

/// Maps the two tones to display colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Color used for [`Tone::Dark`].
    pub dark: Color,
    /// Color used for [`Tone::Light`].
    pub light: Color,
}

impl Palette {
    /// Greenish palette of the Nokia 3310 screen.
    pub const NOKIA: Palette = Palette {
        dark: Color::from_rgb_u8(67, 82, 61),
        light: Color::from_rgb_u8(199, 240, 216),
    };

    /// Resolves the display color of `tone`.
    #[must_use]
    pub const fn color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Dark => self.dark,
            Tone::Light => self.light,
        }
    }
}

/// Two-tone pixel buffer addressed by logical coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: UVec2,
    pixels: Vec<Tone>,
}

impl Canvas {
    /// Creates a dark canvas of the given logical size.
    #[must_use]
    pub fn new(size: CanvasSize) -> Self {
        let size = UVec2::new(size.width(), size.height());
        Self {
            size,
            pixels: vec![Tone::Dark; (size.x as usize) * (size.y as usize)],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.x
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.y
    }

    /// Paints every pixel with `tone`.
    pub fn fill(&mut self, tone: Tone) {
        self.pixels.fill(tone);
    }

    /// Paints a single pixel; coordinates outside the canvas are clipped.
    pub fn set(&mut self, point: Point, tone: Tone) {
        if let Some(index) = self.index(point) {
            self.pixels[index] = tone;
        }
    }

    /// Tone of a pixel, or `None` outside the canvas.
    #[must_use]
    pub fn get(&self, point: Point) -> Option<Tone> {
        self.index(point).map(|index| self.pixels[index])
    }

    /// Iterator over rows of pixels, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tone]> {
        self.pixels.chunks(self.size.x.max(1) as usize)
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = u32::try_from(point.x()).ok()?;
        let y = u32::try_from(point.y()).ok()?;
        if x < self.size.x && y < self.size.y {
            Some(y as usize * self.size.x as usize + x as usize)
        } else {
            None
        }
    }
}

/// Everything needed to draw the running level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelScene {
    /// Maze walls and passages.
    pub bitmap: OccupancyBitmap,
    /// Translation centring the maze on the canvas.
    pub offset: Point,
    /// Exit gap in bitmap coordinates.
    pub exit: Point,
    /// Player position in bitmap coordinates.
    pub player: Point,
    /// Whether the maze is visible.
    pub torch_on: bool,
    /// Periodic blink flag.
    pub blink_on: bool,
}

/// Declarative description of the frame to draw.
#[derive(Clone, Debug, PartialEq)]
pub enum Scene {
    /// Title banner with its blinking prompt.
    Title {
        /// Whether the "PRESS E" prompt is shown this frame.
        prompt_visible: bool,
    },
    /// Wipe between the title and the first level.
    Transition {
        /// Share of the animation already played, between 0 and 1.
        progress: f32,
    },
    /// A maze being played.
    Level(LevelScene),
}

const TITLE: &str = "DYNAMO";
const PROMPT: &str = "PRESS E";

impl Scene {
    /// Draws the scene over the whole canvas.
    pub fn draw(&self, canvas: &mut Canvas) {
        match self {
            Self::Title { prompt_visible } => draw_title(canvas, *prompt_visible),
            Self::Transition { progress } => {
                draw_title(canvas, false);
                let covered = (progress.clamp(0.0, 1.0) * canvas.height() as f32).round() as i32;
                for y in 0..covered {
                    for x in 0..canvas.width() as i32 {
                        canvas.set(Point::new(x, y), Tone::Dark);
                    }
                }
            }
            Self::Level(level) => draw_level(canvas, level),
        }
    }
}

const BANNER_TOP: i32 = 10;
const BANNER_SCALE: i32 = 2;
const PROMPT_GAP: i32 = 12;

fn draw_title(canvas: &mut Canvas, prompt_visible: bool) {
    canvas.fill(Tone::Dark);
    let width = canvas.width() as i32;
    let banner_x = (width - text_width(TITLE) as i32 * BANNER_SCALE) / 2;
    draw_text(
        canvas,
        TITLE,
        Point::new(banner_x, BANNER_TOP),
        BANNER_SCALE,
        Tone::Light,
    );

    if prompt_visible {
        let prompt_x = (width - text_width(PROMPT) as i32) / 2;
        let prompt_y = BANNER_TOP + GLYPH_HEIGHT as i32 * BANNER_SCALE + PROMPT_GAP;
        draw_text(canvas, PROMPT, Point::new(prompt_x, prompt_y), 1, Tone::Light);
    }
}

fn draw_level(canvas: &mut Canvas, level: &LevelScene) {
    canvas.fill(Tone::Dark);

    if level.torch_on {
        for (point, tile) in level.bitmap.iter() {
            if tile == Tile::Open {
                canvas.set(point.add(level.offset), Tone::Light);
            }
        }

        let trail = level.exit.add(level.offset);
        for y in trail.y()..canvas.height() as i32 {
            canvas.set(Point::new(trail.x(), y), Tone::Light);
        }
    }

    let player_tone = if level.blink_on || !level.torch_on {
        Tone::Light
    } else {
        Tone::Dark
    };
    canvas.set(level.player.add(level.offset), player_tone);
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Keys held down during the frame.
    pub held: KeySet,
    /// Keys that went down during the frame.
    pub pressed: KeySet,
}

/// Whether the render loop should keep running after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Render another frame.
    Continue,
    /// Close the window and return from [`RenderingBackend::run`].
    Exit,
}

/// Describes how the canvas is presented on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Colors used for the two tones.
    pub palette: Palette,
    /// Logical canvas size.
    pub canvas: CanvasSize,
    /// Integer magnification applied to every logical pixel.
    pub window_scale: u32,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, palette: Palette, canvas: CanvasSize, window_scale: u32) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            palette,
            canvas,
            window_scale: window_scale.max(1),
        }
    }
}

/// Rendering backend capable of presenting Dynamo canvases.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure asks to exit.
    ///
    /// The provided `update` closure receives the frame delta and the input
    /// captured by the adapter, draws into the canvas, and decides whether the
    /// loop continues. Errors returned by the closure stop the loop and are
    /// handed back to the caller.
    fn run<F>(self, presentation: Presentation, update: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Canvas) -> AnyResult<FrameControl> + 'static;
}
