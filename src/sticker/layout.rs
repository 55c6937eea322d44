use crate::sticker::StickerSpec;

// Logical-unit geometry of a sticker. Every value is multiplied by the zoom
// factor when drawing.
pub const AVATAR_OFFSET: f32 = 4.0;
pub const AVATAR_SIZE: f32 = 32.0;
pub const AVATAR_CENTER: f32 = 20.0;
pub const AVATAR_RADIUS: f32 = 16.0;
pub const AVATAR_GAP: f32 = 10.0;

pub const NAME_X: f32 = 42.0;
pub const NAME_BASELINE: f32 = 14.0;
pub const NAME_FONT_SIZE: f32 = 12.0;
pub const NAME_BLOCK_PADDING: f32 = 46.0;

pub const BUBBLE_X: f32 = 42.0;
pub const BUBBLE_Y: f32 = 20.0;
pub const BUBBLE_PADDING_X: f32 = 20.0;
pub const BUBBLE_PADDING_Y: f32 = 16.0;
pub const BUBBLE_RADIUS: f32 = 8.0;
pub const BOTTOM_MARGIN: f32 = 20.0;

pub const TEXT_X: f32 = 52.0;
pub const TEXT_BASELINE: f32 = 41.0;
pub const TEXT_WRAP_SLACK: f32 = 2.0;
pub const TEXT_LINE_HEIGHT: f32 = 22.0;
pub const TEXT_FONT_SIZE: f32 = 14.0;

/// Canvas dimensions for one sticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickerLayout {
    pub zoom: f32,
    pub name_block_width: f32,
    /// Logical canvas width.
    pub width: f32,
    /// Logical canvas height.
    pub height: f32,
}

impl StickerLayout {
    /// `name_width` is the user name measured at [`NAME_FONT_SIZE`].
    pub fn compute(spec: &StickerSpec, name_width: f32, zoom: f32) -> Self {
        let name_block_width = name_width + NAME_BLOCK_PADDING;
        let bubble_block_width =
            AVATAR_OFFSET + AVATAR_SIZE + AVATAR_GAP + spec.width + BUBBLE_PADDING_X;
        Self {
            zoom,
            name_block_width,
            width: name_block_width.max(bubble_block_width),
            height: AVATAR_OFFSET + spec.height + BUBBLE_PADDING_Y + BOTTOM_MARGIN,
        }
    }

    pub fn zoom_for(high_resolution: bool) -> f32 {
        if high_resolution {
            2.0
        } else {
            1.0
        }
    }

    /// Logical length to device pixels.
    pub fn scale(&self, value: f32) -> f32 {
        value * self.zoom
    }

    /// Surface size in device pixels; fractional sizes are truncated.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.scale(self.width).max(0.0) as u32,
            self.scale(self.height).max(0.0) as u32,
        )
    }
}
