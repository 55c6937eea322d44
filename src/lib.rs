pub mod app;
pub mod context_menu;
pub mod host;
pub mod icons;
pub mod logging;
pub mod options;
pub mod sticker;
