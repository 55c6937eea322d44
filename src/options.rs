use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder replaced by the search term in search URL templates.
pub const SEARCH_PLACEHOLDER: &str = "%search%";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// URL template containing [`SEARCH_PLACEHOLDER`].
    pub search_url: String,
}

impl SearchOptions {
    pub fn url_for(&self, term: &str) -> String {
        self.search_url.replacen(SEARCH_PLACEHOLDER, term, 1)
    }
}

/// A destination folder offered in the "save to local emoticons" submenu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoticonFolder {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalEmoticonsOptions {
    #[serde(default)]
    pub enabled: bool,
    /// Offer the copy entry when right-clicking images and market stickers.
    #[serde(default)]
    pub copy_file_to_local_emoticons: bool,
    #[serde(default)]
    pub folders: Vec<EmoticonFolder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageToImageOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Render stickers at twice the logical size.
    #[serde(default)]
    pub high_resolution: bool,
}

impl Default for MessageToImageOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            high_resolution: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// When enabled logging is initialised at debug level.
    /// Defaults to `false` when the field is missing in the options file.
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default = "default_word_search")]
    pub word_search: SearchOptions,
    #[serde(default = "default_image_search")]
    pub image_search: SearchOptions,
    #[serde(default)]
    pub local_emoticons: LocalEmoticonsOptions,
    #[serde(default)]
    pub message_to_image: MessageToImageOptions,
    /// Folder receiving generated stickers. If `None`, the user's picture
    /// directory is used.
    #[serde(default)]
    pub sticker_dir: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_word_search() -> SearchOptions {
    SearchOptions {
        enabled: true,
        search_url: "https://www.google.com/search?q=%search%".into(),
    }
}

fn default_image_search() -> SearchOptions {
    SearchOptions {
        enabled: true,
        search_url: "https://lens.google.com/uploadbyurl?url=%search%".into(),
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debug_logging: false,
            word_search: default_word_search(),
            image_search: default_image_search(),
            local_emoticons: LocalEmoticonsOptions::default(),
            message_to_image: MessageToImageOptions::default(),
            sticker_dir: None,
        }
    }
}

impl Options {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Output folder for generated stickers.
    pub fn sticker_dir(&self) -> PathBuf {
        if let Some(dir) = &self.sticker_dir {
            return PathBuf::from(dir);
        }
        dirs_next::picture_dir()
            .or_else(dirs_next::home_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("LiteTools_Stickers")
    }
}
