use crate::Palette;

pub const DEFAULT_WIDTH: u32 = 256;
pub const DEFAULT_HEIGHT: u32 = 256;
pub const DEFAULT_SCALE: u32 = 3;

/// Everything fixed when a grid and its window are built.
///
/// The scale sizes the frame buffer, so changing it later means building a
/// new painter with [`crate::Painter::rescaled`] and resizing the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub palette: Palette,
}

impl GridConfig {
    pub fn new(width: u32, height: u32, scale: u32) -> Self {
        assert!(width > 0 && height > 0 && scale > 0);
        Self {
            width,
            height,
            scale,
            palette: Palette::default(),
        }
    }

    pub fn with_palette(self, palette: Palette) -> Self {
        Self { palette, ..self }
    }

    pub fn frame_width(&self) -> u32 {
        self.width * self.scale
    }

    pub fn frame_height(&self) -> u32 {
        self.height * self.scale
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_SCALE)
    }
}
