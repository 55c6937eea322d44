//! Rendering a single chat message into a shareable PNG sticker.

pub mod compose;
pub mod layout;
pub mod raster;
pub mod save;
pub mod text;

use serde::{Deserialize, Serialize};

pub use compose::StickerComposer;
pub use layout::StickerLayout;

/// Snapshot of everything needed to redraw a text message as an image.
/// `width` and `height` are the rendered size of the message text in
/// logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerSpec {
    pub user_name: String,
    pub user_uid: String,
    pub content: String,
    pub font_family: String,
    pub width: f32,
    pub height: f32,
}
