use crate::context_menu::entries::SubmenuItem;
use crate::host::{Document, NodeId, Rect};
use std::time::{Duration, Instant};

pub const OVERLAY_CLASS: &str = "lite-tools-sub-context-menu";
pub const SCROLL_BOX_CLASS: &str = "lite-tools-scroll-box";
pub const ROW_CLASS: &str = "sub-context-menu-item";
pub const VISIBLE_CLASS: &str = "show";

pub const CLOSE_DELAY_MS: u64 = 300;
pub const CLOSE_DELAY: Duration = Duration::from_millis(CLOSE_DELAY_MS);
pub const WHEEL_STEP: f32 = 30.0;
const SCROLL_PADDING: f32 = 8.0;
/// Below this overflow the content is considered to fit and wheel events are
/// ignored.
const MIN_SCROLL_RANGE: f32 = 10.0;

/// Floating panel listing submenu rows next to its trigger entry.
///
/// Geometry is published through the `--top`, `--left`, `--height` and
/// `--width` style properties; visibility through the `show` class.
#[derive(Debug, Clone)]
pub struct SubmenuOverlay {
    root: NodeId,
    scroll_box: NodeId,
    rows: Vec<(NodeId, SubmenuItem)>,
    offset_y: f32,
    close_deadline: Option<Instant>,
}

impl SubmenuOverlay {
    /// Build the panel and attach it to the document body, hidden.
    pub fn new(doc: &mut Document, items: &[SubmenuItem]) -> Self {
        let root = doc.create_element("div");
        let scroll_box = doc.create_element("div");
        doc.add_class(scroll_box, SCROLL_BOX_CLASS);
        doc.append_child(root, scroll_box);
        doc.add_class(root, OVERLAY_CLASS);

        let rows = items
            .iter()
            .map(|item| {
                let row = doc.create_child(scroll_box, "div", &[ROW_CLASS]);
                doc.set_text(row, &item.name);
                (row, item.clone())
            })
            .collect();

        let body = doc.body();
        doc.append_child(body, root);
        Self {
            root,
            scroll_box,
            rows,
            offset_y: 0.0,
            close_deadline: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn scroll_box(&self) -> NodeId {
        self.scroll_box
    }

    pub fn rows(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.rows.iter().map(|(id, _)| *id)
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    pub fn close_pending(&self) -> bool {
        self.close_deadline.is_some()
    }

    pub fn is_visible(&self, doc: &Document) -> bool {
        doc.has_class(self.root, VISIBLE_CLASS)
    }

    pub fn contains(&self, doc: &Document, node: NodeId) -> bool {
        doc.contains(self.root, node)
    }

    /// Pointer entered the trigger entry: show the panel beside `anchor`.
    pub fn open_at(&mut self, doc: &mut Document, anchor: Rect) {
        self.close_deadline = None;
        doc.add_class(self.root, VISIBLE_CLASS);
        let (width, height) = doc.offset_size(self.root);
        doc.set_style_property(self.root, "--top", &format!("calc({}px - 0vh)", anchor.y));
        doc.set_style_property(
            self.root,
            "--left",
            &format!("calc({}px - 0vh)", anchor.right()),
        );
        doc.set_style_property(self.root, "--height", &format!("{height}px"));
        doc.set_style_property(self.root, "--width", &format!("{width}px"));
    }

    /// Pointer entered the panel itself.
    pub fn pointer_enter(&mut self, doc: &mut Document) {
        self.close_deadline = None;
        doc.add_class(self.root, VISIBLE_CLASS);
    }

    /// Pointer left the panel or its trigger; hide after [`CLOSE_DELAY`]
    /// unless re-entered first.
    pub fn schedule_close(&mut self, now: Instant) {
        self.close_deadline = Some(now + CLOSE_DELAY);
    }

    /// Apply a due close. Returns `true` when the panel was hidden.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> bool {
        match self.close_deadline {
            Some(deadline) if now >= deadline => {
                self.close_deadline = None;
                doc.remove_class(self.root, VISIBLE_CLASS);
                true
            }
            _ => false,
        }
    }

    /// Scroll one wheel notch. Positive `delta_y` moves the content up.
    pub fn wheel(&mut self, doc: &mut Document, delta_y: f32) {
        let (_, content_height) = doc.offset_size(self.scroll_box);
        let (_, panel_height) = doc.offset_size(self.root);
        let max_top = content_height - panel_height + SCROLL_PADDING;
        if max_top < MIN_SCROLL_RANGE {
            return;
        }
        let step = if delta_y > 0.0 { -WHEEL_STEP } else { WHEEL_STEP };
        self.offset_y = (self.offset_y + step).clamp(-max_top, 0.0);
        doc.set_style_property(
            self.scroll_box,
            "transform",
            &format!("translateY({}px)", self.offset_y),
        );
    }

    /// Payload of the row containing `target`, if any.
    pub fn item_at(&self, doc: &Document, target: NodeId) -> Option<&SubmenuItem> {
        self.rows
            .iter()
            .find(|(row, _)| doc.contains(*row, target))
            .map(|(_, item)| item)
    }
}
