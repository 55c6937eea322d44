use crate::context_menu::ancestor::find_ancestor;
use crate::host::{Document, NodeId};
use crate::sticker::StickerSpec;

const MESSAGE_CLASS: &str = "message";
const USER_NAME_CLASS: &str = "user-name";
const USER_NAME_TEXT_CLASS: &str = "text-ellipsis";
const CONTENT_WRAPPER_CLASS: &str = "message-content__wrapper";
const TEXT_ELEMENT_CLASS: &str = "text-element";
const IMAGE_CONTENT_CLASS: &str = "image-content";
const APP_IMAGE_SCHEME: &str = "appimg://";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(u8),
}

impl PointerButton {
    /// Map a host button index (0 = primary, 1 = auxiliary, 2 = secondary).
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub button: PointerButton,
    pub target: NodeId,
}

impl PointerEvent {
    pub fn down(button: PointerButton, target: NodeId) -> Self {
        Self {
            phase: PointerPhase::Down,
            button,
            target,
        }
    }

    pub fn up(button: PointerButton, target: NodeId) -> Self {
        Self {
            phase: PointerPhase::Up,
            button,
            target,
        }
    }
}

/// Host operating system family. The native menu opens on button release on
/// Windows and on button press elsewhere, and the context capture follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    pub fn trigger_phase(self) -> PointerPhase {
        match self {
            Platform::Windows => PointerPhase::Up,
            Platform::Other => PointerPhase::Down,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub text: String,
    pub left_button_down: bool,
}

/// Candidates captured by the most recent trigger-phase button event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RightClickContext {
    /// Set when the event was a secondary-button trigger.
    pub secondary: bool,
    pub image_path: Option<String>,
    pub search_image_path: Option<String>,
    pub sticker: Option<StickerSpec>,
}

/// Session state derived from pointer and selection events.
#[derive(Debug, Clone)]
pub struct InteractionTracker {
    platform: Platform,
    selection: SelectionState,
    context: RightClickContext,
}

impl Default for InteractionTracker {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl InteractionTracker {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            selection: SelectionState::default(),
            context: RightClickContext::default(),
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn context(&self) -> &RightClickContext {
        &self.context
    }

    /// Feed one button event. Handlers run in their registration order:
    /// release capture, press bookkeeping, then the trigger capture.
    pub fn handle_pointer(&mut self, doc: &Document, event: &PointerEvent) {
        match (event.phase, event.button) {
            (PointerPhase::Up, PointerButton::Primary) => {
                self.selection.text = doc.selection_text().to_string();
                self.selection.left_button_down = false;
            }
            (PointerPhase::Down, PointerButton::Primary) => {
                self.selection.left_button_down = true;
            }
            (PointerPhase::Down, PointerButton::Secondary) if self.selection.left_button_down => {
                self.selection.text = doc.selection_text().to_string();
            }
            _ => {}
        }

        if event.phase != self.platform.trigger_phase() {
            return;
        }
        if event.button == PointerButton::Secondary {
            self.context = capture_context(doc, event.target);
        } else {
            self.context = RightClickContext::default();
        }
    }
}

fn capture_context(doc: &Document, target: NodeId) -> RightClickContext {
    let mut context = RightClickContext {
        secondary: true,
        ..RightClickContext::default()
    };
    let Some(message) = find_ancestor(doc, target, MESSAGE_CLASS) else {
        return context;
    };
    let Some(record) = doc.record(message) else {
        tracing::debug!("message node has no view-model attached");
        return context;
    };

    context.sticker = capture_sticker(doc, message);

    if doc.has_class(target, IMAGE_CONTENT_CLASS) && record.has_picture() {
        if let Some(path) = doc.attribute(target, "src").and_then(image_path_from_src) {
            context.image_path = Some(path.clone());
            context.search_image_path = Some(path);
        }
    }

    if let Some(face) = record.market_face() {
        context.image_path = face
            .static_face_path
            .clone()
            .filter(|path| !path.is_empty());
    }

    tracing::debug!(?context, "captured right-click context");
    context
}

fn capture_sticker(doc: &Document, message: NodeId) -> Option<StickerSpec> {
    let record = doc.record(message)?;
    let text = record.sole_text()?;
    let name_label = doc.nested_with_class(message, USER_NAME_CLASS, USER_NAME_TEXT_CLASS)?;
    let user_name = record.author_name()?;
    let text_node = doc.nested_with_class(message, CONTENT_WRAPPER_CLASS, TEXT_ELEMENT_CLASS)?;
    let (width, height) = doc.offset_size(text_node);

    let spec = StickerSpec {
        user_name: user_name.to_string(),
        user_uid: record.sender_uid.clone().unwrap_or_default(),
        content: text.content.clone(),
        font_family: doc.font_family(name_label).unwrap_or_default().to_string(),
        width,
        height,
    };
    tracing::debug!(?spec, "message qualifies for sticker conversion");
    Some(spec)
}

/// Bytes whose escapes survive URI decoding.
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Strip the host image scheme and percent-decode the remainder as a URI:
/// escapes of reserved characters such as `%23` are kept verbatim.
pub fn image_path_from_src(src: &str) -> Option<String> {
    let raw = src.strip_prefix(APP_IMAGE_SCHEME).unwrap_or(src);
    match decode_uri(raw) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::debug!("cannot decode image src {src}: {e}");
            None
        }
    }
}

fn decode_uri(raw: &str) -> Result<String, std::string::FromUtf8Error> {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = reserved_escape(rest) {
        decoded.push_str(&urlencoding::decode(&rest[..pos])?);
        decoded.push_str(&rest[pos..pos + 3]);
        rest = &rest[pos + 3..];
    }
    decoded.push_str(&urlencoding::decode(rest)?);
    Ok(decoded)
}

/// Byte offset of the first `%XX` escape naming a reserved character.
fn reserved_escape(s: &str) -> Option<usize> {
    s.match_indices('%').map(|(i, _)| i).find(|&i| {
        s.get(i + 1..i + 3)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .is_some_and(|byte| RESERVED.contains(&byte))
    })
}
