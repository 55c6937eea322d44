use crate::context_menu::tracker::{RightClickContext, SelectionState};
use crate::icons;
use crate::options::Options;
use crate::sticker::StickerSpec;
use serde_json::json;
use std::path::PathBuf;

const SEARCH_LABEL_CHARS: usize = 4;
const IMAGE_SEARCH_HOST: &str = "https://gchat.qpic.cn/gchatpic_new/0/0-0-";

/// A row of a submenu. The payload is handed back untouched on activation.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmenuItem {
    pub name: String,
    pub payload: serde_json::Value,
}

impl SubmenuItem {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// What activating an injected entry does.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    OpenUrl(String),
    /// Copy `source` into the folder named by the activated submenu row's
    /// `path` payload.
    SaveToFolder { source: PathBuf },
    ComposeSticker(StickerSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntryDescriptor {
    pub icon: &'static str,
    pub title: String,
    pub submenu: Option<Vec<SubmenuItem>>,
    pub action: MenuAction,
}

/// An activation produced by clicking an entry or one of its submenu rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub action: MenuAction,
    pub item: Option<SubmenuItem>,
}

/// Entries to add for the current session state, in menu order.
pub fn build_entries(
    selection: &SelectionState,
    context: &RightClickContext,
    options: &Options,
) -> Vec<MenuEntryDescriptor> {
    [
        word_search_entry(selection, context, options),
        image_search_entry(context, options),
        save_emoticon_entry(context, options),
        sticker_entry(context, options),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn word_search_entry(
    selection: &SelectionState,
    context: &RightClickContext,
    options: &Options,
) -> Option<MenuEntryDescriptor> {
    if !context.secondary || selection.text.is_empty() || !options.word_search.enabled {
        return None;
    }
    let text = &selection.text;
    Some(MenuEntryDescriptor {
        icon: icons::SEARCH,
        title: format!("Search: {}", truncate(text, SEARCH_LABEL_CHARS)),
        submenu: None,
        action: MenuAction::OpenUrl(
            options
                .word_search
                .url_for(&urlencoding::encode(text)),
        ),
    })
}

fn image_search_entry(context: &RightClickContext, options: &Options) -> Option<MenuEntryDescriptor> {
    let path = context.search_image_path.as_deref()?;
    if !options.image_search.enabled {
        return None;
    }
    Some(MenuEntryDescriptor {
        icon: icons::SEARCH,
        title: "Search image".into(),
        submenu: None,
        action: MenuAction::OpenUrl(options.image_search.url_for(&remote_picture_url(path))),
    })
}

fn save_emoticon_entry(context: &RightClickContext, options: &Options) -> Option<MenuEntryDescriptor> {
    let path = context.image_path.as_deref()?;
    let emoticons = &options.local_emoticons;
    if !emoticons.enabled || !emoticons.copy_file_to_local_emoticons {
        return None;
    }
    let rows = emoticons
        .folders
        .iter()
        .map(|folder| {
            SubmenuItem::new(
                folder.name.clone(),
                json!({ "name": folder.name, "path": folder.path }),
            )
        })
        .collect();
    Some(MenuEntryDescriptor {
        icon: icons::LOCAL_EMOTICONS,
        title: "Save to local emoticons".into(),
        submenu: Some(rows),
        action: MenuAction::SaveToFolder {
            source: PathBuf::from(path),
        },
    })
}

fn sticker_entry(context: &RightClickContext, options: &Options) -> Option<MenuEntryDescriptor> {
    let spec = context.sticker.as_ref()?;
    if !options.message_to_image.enabled {
        return None;
    }
    Some(MenuEntryDescriptor {
        icon: icons::IMAGE,
        title: "Convert to image".into(),
        submenu: None,
        action: MenuAction::ComposeSticker(spec.clone()),
    })
}

/// First `len` characters of `text`, with an ellipsis when cut.
pub fn truncate(text: &str, len: usize) -> String {
    if text.chars().count() > len {
        let head: String = text.chars().take(len).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Public CDN address of a received picture, derived from its cache file
/// name: the stem up to the first dot, upper-cased, with the first `_0`
/// removed.
pub fn remote_picture_url(local_path: &str) -> String {
    let file_name = local_path.rsplit(['/', '\\']).next().unwrap_or(local_path);
    let stem = file_name.split('.').next().unwrap_or(file_name).to_uppercase();
    let stem = stem.replacen("_0", "", 1);
    format!("{IMAGE_SEARCH_HOST}{stem}/0")
}
