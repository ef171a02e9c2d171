use crate::{Cell, Generation, GridConfig, LifeError, Loc};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color([u8; 4]);

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const DARK_GRAY: Color = Color::rgb(0x40, 0x40, 0x40);
    pub const LIGHT_GRAY: Color = Color::rgb(0xc0, 0xc0, 0xc0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self([red, green, blue, 0xff])
    }

    pub fn rgba(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [red, green, blue, _] = self.0;
        write!(f, "#{red:02x}{green:02x}{blue:02x}")
    }
}

/// Parses `#rrggbb` (the `#` is optional).
impl FromStr for Color {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LifeError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub dead: Color,
    pub alive: Color,
}

impl Palette {
    pub fn new(dead: Color, alive: Color) -> Self {
        Self { dead, alive }
    }

    pub fn color(&self, cell: Cell) -> Color {
        match cell {
            Cell::Dead => self.dead,
            Cell::Alive => self.alive,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Color::DARK_GRAY, Color::LIGHT_GRAY)
    }
}

/// Draws generations into RGBA frames: one `scale`×`scale` square per cell
/// with a one-pixel black line along its top and left edges.
#[derive(Clone, Debug)]
pub struct Painter {
    scale: u32,
    palette: Palette,
}

impl Painter {
    pub const BORDER_COLOR: Color = Color::BLACK;
    /// Widest or tallest frame a painter will size, the common GPU texture
    /// limit.
    pub const MAX_FRAME_SIDE: u32 = 8192;

    pub fn new(scale: u32, palette: Palette) -> Self {
        assert!(scale > 0);
        Self { scale, palette }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.scale, config.palette)
    }

    /// A painter for a different cell size. The caller owns the frame and
    /// must resize it to match.
    pub fn rescaled(&self, scale: u32) -> Result<Self, LifeError> {
        if scale == 0 {
            return Err(LifeError::ZeroScale);
        }
        Ok(Self::new(scale, self.palette))
    }

    /// Largest scale whose frame for a `width`×`height` grid stays within
    /// [`Self::MAX_FRAME_SIDE`].
    pub fn max_scale(width: u32, height: u32) -> u32 {
        Self::MAX_FRAME_SIDE / width.max(height).max(1)
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn dead_color(&self) -> Color {
        self.palette.dead
    }

    pub fn set_dead_color(&mut self, color: Color) {
        self.palette.dead = color;
    }

    pub fn alive_color(&self) -> Color {
        self.palette.alive
    }

    pub fn set_alive_color(&mut self, color: Color) {
        self.palette.alive = color;
    }

    pub fn frame_size(&self, generation: &Generation) -> Result<(u32, u32), LifeError> {
        let too_large = || LifeError::FrameTooLarge {
            width: generation.width(),
            height: generation.height(),
            scale: self.scale,
            max: Self::MAX_FRAME_SIDE,
        };
        let side = |cells: u32| {
            cells
                .checked_mul(self.scale)
                .filter(|&pixels| pixels <= Self::MAX_FRAME_SIDE)
                .ok_or_else(too_large)
        };
        Ok((side(generation.width())?, side(generation.height())?))
    }

    pub fn frame_len(&self, generation: &Generation) -> Result<usize, LifeError> {
        let (width, height) = self.frame_size(generation)?;
        Ok(4 * width as usize * height as usize)
    }

    pub fn render(&self, generation: &Generation, frame: &mut [u8]) -> Result<(), LifeError> {
        let expected = self.frame_len(generation)?;
        if frame.len() != expected {
            return Err(LifeError::FrameSize {
                expected,
                actual: frame.len(),
            });
        }

        let (frame_width, _) = self.frame_size(generation)?;
        for (index, pixel) in frame.chunks_exact_mut(4).enumerate() {
            let px = index as u32 % frame_width;
            let py = index as u32 / frame_width;
            let color = if px % self.scale == 0 || py % self.scale == 0 {
                Self::BORDER_COLOR
            } else {
                let loc = Loc::new(px / self.scale, py / self.scale);
                self.palette.color(generation[loc])
            };
            pixel.copy_from_slice(&color.rgba());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEAD: Color = Color::rgb(0x10, 0x20, 0x30);
    const ALIVE: Color = Color::rgb(0xa0, 0xb0, 0xc0);

    fn pixel(frame: &[u8], frame_width: u32, px: u32, py: u32) -> [u8; 4] {
        let start = 4 * (py * frame_width + px) as usize;
        frame[start..start + 4].try_into().unwrap()
    }

    #[test]
    fn color_parses_with_or_without_hash() {
        assert_eq!("#ff8000".parse::<Color>(), Ok(Color::rgb(0xff, 0x80, 0x00)));
        assert_eq!("0A0b0C".parse::<Color>(), Ok(Color::rgb(0x0a, 0x0b, 0x0c)));
        assert_eq!(Color::rgb(0xff, 0x80, 0x00).to_string(), "#ff8000");
    }

    #[test]
    fn color_rejects_malformed_text() {
        for text in ["", "#fff", "#gg0000", "#12345678", "#ééé"] {
            assert_eq!(
                text.parse::<Color>(),
                Err(LifeError::InvalidColor(text.to_string())),
                "{text:?}"
            );
        }
    }

    #[test]
    fn render_fills_cells_and_draws_borders() {
        let generation = Generation::with_live_cells(2, 2, [Loc::new(1, 0)]);
        let painter = Painter::new(4, Palette::new(DEAD, ALIVE));
        let mut frame = vec![0; painter.frame_len(&generation).unwrap()];
        painter.render(&generation, &mut frame).unwrap();

        let black = Color::BLACK.rgba();
        assert_eq!(pixel(&frame, 8, 0, 0), black);
        assert_eq!(pixel(&frame, 8, 4, 2), black);
        assert_eq!(pixel(&frame, 8, 2, 4), black);
        assert_eq!(pixel(&frame, 8, 1, 1), DEAD.rgba());
        assert_eq!(pixel(&frame, 8, 3, 3), DEAD.rgba());
        assert_eq!(pixel(&frame, 8, 5, 1), ALIVE.rgba());
        assert_eq!(pixel(&frame, 8, 7, 3), ALIVE.rgba());
        assert_eq!(pixel(&frame, 8, 6, 6), DEAD.rgba());
    }

    #[test]
    fn render_uses_updated_colors() {
        let generation = Generation::with_live_cells(1, 1, [Loc::new(0, 0)]);
        let mut painter = Painter::new(3, Palette::default());
        painter.set_alive_color(ALIVE);
        painter.set_dead_color(DEAD);
        assert_eq!(painter.alive_color(), ALIVE);
        assert_eq!(painter.dead_color(), DEAD);

        let mut frame = vec![0; painter.frame_len(&generation).unwrap()];
        painter.render(&generation, &mut frame).unwrap();
        assert_eq!(pixel(&frame, 3, 1, 1), ALIVE.rgba());
    }

    #[test]
    fn render_rejects_wrong_frame_length() {
        let generation = Generation::new(2, 2);
        let painter = Painter::new(2, Palette::default());
        let mut frame = vec![0; 15];
        assert_eq!(
            painter.render(&generation, &mut frame),
            Err(LifeError::FrameSize {
                expected: 64,
                actual: 15
            })
        );
    }

    #[test]
    fn rescaled_painter_keeps_palette() {
        let painter = Painter::new(2, Palette::new(DEAD, ALIVE)).rescaled(5).unwrap();
        assert_eq!(painter.scale(), 5);
        assert_eq!(painter.palette(), Palette::new(DEAD, ALIVE));
        assert_eq!(painter.frame_size(&Generation::new(3, 2)), Ok((15, 10)));
    }

    #[test]
    fn rescaled_rejects_zero() {
        let painter = Painter::new(2, Palette::default());
        assert_eq!(painter.rescaled(0).map(|p| p.scale()), Err(LifeError::ZeroScale));
    }

    #[test]
    fn oversized_scale_is_an_error_not_an_overflow() {
        let generation = Generation::new(256, 256);
        let painter = Painter::new(2, Palette::default()).rescaled(20_000_000).unwrap();
        let too_large = LifeError::FrameTooLarge {
            width: 256,
            height: 256,
            scale: 20_000_000,
            max: Painter::MAX_FRAME_SIDE,
        };
        assert_eq!(painter.frame_size(&generation), Err(too_large.clone()));
        assert_eq!(painter.frame_len(&generation), Err(too_large.clone()));
        assert_eq!(painter.render(&generation, &mut []), Err(too_large));
    }

    #[test]
    fn frame_is_capped_at_the_texture_limit() {
        let generation = Generation::new(256, 128);
        assert_eq!(Painter::max_scale(256, 128), 32);
        let largest = Painter::new(32, Palette::default());
        assert_eq!(largest.frame_size(&generation), Ok((8192, 4096)));
        let too_large = largest.rescaled(33).unwrap();
        assert!(matches!(
            too_large.frame_size(&generation),
            Err(LifeError::FrameTooLarge { scale: 33, .. })
        ));
    }
}
