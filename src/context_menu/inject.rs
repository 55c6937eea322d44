use crate::context_menu::ancestor::find_ancestor;
use crate::context_menu::entries::{build_entries, Activation, MenuAction, MenuEntryDescriptor};
use crate::context_menu::overlay::{SubmenuOverlay, OVERLAY_CLASS};
use crate::context_menu::tracker::{RightClickContext, SelectionState};
use crate::host::{Document, NodeId};
use crate::icons;
use crate::options::Options;
use std::collections::BTreeMap;
use std::time::Instant;

pub const HOST_MENU_CLASS: &str = "q-context-menu";
pub const INJECTED_MARKER: &str = "lite-tools-context-menu";
pub const ITEM_TEXT_CLASS: &str = "q-context-menu-item__text";
pub const ICON_CLASS: &str = "q-icon";
pub const SUBMENU_ARROW_CLASS: &str = "lite-tools-sub-menu-icon";

/// Result of handling one batch of body mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// A fresh host menu was found and augmented.
    Injected { menu: NodeId, entries: usize },
    /// Host menus exist but all of them were already augmented.
    Unchanged,
    /// No host menu is open; leftover overlays were removed.
    TornDown { overlays: usize },
}

#[derive(Debug)]
struct InjectedEntry {
    menu: NodeId,
    action: MenuAction,
    has_submenu: bool,
    overlay: Option<SubmenuOverlay>,
}

/// Adds augmented entries to the host context menu once per open cycle and
/// routes pointer input for them and their submenu overlays.
#[derive(Debug, Default)]
pub struct MenuInjector {
    entries: BTreeMap<NodeId, InjectedEntry>,
}

impl MenuInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injected entry nodes currently tracked.
    pub fn entries(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.keys().copied()
    }

    pub fn overlays(&self) -> impl Iterator<Item = &SubmenuOverlay> + '_ {
        self.entries.values().filter_map(|e| e.overlay.as_ref())
    }

    /// Overlay owned by the entry node `entry`.
    pub fn overlay_for(&self, entry: NodeId) -> Option<&SubmenuOverlay> {
        self.entries.get(&entry)?.overlay.as_ref()
    }

    pub fn reconcile(
        &mut self,
        doc: &mut Document,
        selection: &SelectionState,
        context: &RightClickContext,
        options: &Options,
    ) -> Reconcile {
        let fresh = doc.find_first(|id| {
            doc.has_class(id, HOST_MENU_CLASS) && !doc.has_class(id, INJECTED_MARKER)
        });
        let Some(menu) = fresh else {
            if doc.first_with_class(HOST_MENU_CLASS).is_some() {
                return Reconcile::Unchanged;
            }
            let overlays = self.teardown(doc);
            return Reconcile::TornDown { overlays };
        };

        doc.add_class(menu, INJECTED_MARKER);
        let mut injected = 0;
        for descriptor in build_entries(selection, context, options) {
            if self.inject(doc, menu, descriptor).is_some() {
                injected += 1;
            }
        }
        tracing::debug!(?menu, injected, "augmented host context menu");
        Reconcile::Injected {
            menu,
            entries: injected,
        }
    }

    /// Clone a live menu item, dress it as `descriptor` and append it to
    /// `menu`. Returns `None` when no usable template exists.
    pub fn inject(
        &mut self,
        doc: &mut Document,
        menu: NodeId,
        descriptor: MenuEntryDescriptor,
    ) -> Option<NodeId> {
        let Some(template) = find_template(doc) else {
            tracing::debug!("no enabled host menu item to clone");
            return None;
        };
        tracing::debug!(tag = doc.tag(template), "cloning host menu item");
        let entry = doc.clone_subtree(template);

        let mut overlay = None;
        let has_submenu = descriptor.submenu.is_some();
        if let Some(items) = descriptor.submenu.as_deref() {
            if !items.is_empty() && doc.descendant_with_class(entry, ITEM_TEXT_CLASS).is_some() {
                doc.append_markup(entry, SUBMENU_ARROW_CLASS, icons::SUBMENU_ARROW);
                overlay = Some(SubmenuOverlay::new(doc, items));
            }
        }

        if let Some(icon) = doc.descendant_with_class(entry, ICON_CLASS) {
            doc.set_markup(icon, descriptor.icon);
        }
        let label = if doc.has_class(entry, ITEM_TEXT_CLASS) {
            Some(entry)
        } else {
            doc.descendant_with_class(entry, ITEM_TEXT_CLASS)
        };
        if let Some(label) = label {
            doc.set_text(label, &descriptor.title);
        }

        doc.append_child(menu, entry);
        self.entries.insert(
            entry,
            InjectedEntry {
                menu,
                action: descriptor.action,
                has_submenu,
                overlay,
            },
        );
        Some(entry)
    }

    fn teardown(&mut self, doc: &mut Document) -> usize {
        let stale = doc.all_with_class(OVERLAY_CLASS);
        for node in &stale {
            doc.remove(*node);
        }
        self.entries.clear();
        stale.len()
    }

    fn entry_at(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        self.entries
            .keys()
            .copied()
            .find(|entry| doc.contains(*entry, target))
    }

    fn overlay_owner_at(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|(_, e)| e.overlay.as_ref().is_some_and(|o| o.contains(doc, target)))
            .map(|(id, _)| *id)
    }

    pub fn pointer_enter(&mut self, doc: &mut Document, target: NodeId) {
        if let Some(owner) = self.overlay_owner_at(doc, target) {
            if let Some(overlay) = self.overlay_mut(owner) {
                overlay.pointer_enter(doc);
            }
            return;
        }
        if let Some(entry) = self.entry_at(doc, target) {
            let anchor = doc.rect(entry);
            if let Some(overlay) = self.overlay_mut(entry) {
                overlay.open_at(doc, anchor);
            }
        }
    }

    pub fn pointer_leave(&mut self, doc: &Document, target: NodeId, now: Instant) {
        let owner = self
            .overlay_owner_at(doc, target)
            .or_else(|| self.entry_at(doc, target));
        if let Some(overlay) = owner.and_then(|id| self.overlay_mut(id)) {
            overlay.schedule_close(now);
        }
    }

    pub fn wheel(&mut self, doc: &mut Document, target: NodeId, delta_y: f32) {
        if let Some(owner) = self.overlay_owner_at(doc, target) {
            if let Some(overlay) = self.overlay_mut(owner) {
                overlay.wheel(doc, delta_y);
            }
        }
    }

    /// Resolve a click. Plain entries close the host menu; submenu rows
    /// report their payload and leave closing to the caller.
    pub fn click(&mut self, doc: &mut Document, target: NodeId) -> Option<Activation> {
        if let Some(owner) = self.overlay_owner_at(doc, target) {
            let entry = self.entries.get(&owner)?;
            let item = entry
                .overlay
                .as_ref()
                .and_then(|o| o.item_at(doc, target))
                .cloned();
            return Some(Activation {
                action: entry.action.clone(),
                item,
            });
        }

        let id = self.entry_at(doc, target)?;
        let entry = self.entries.get(&id)?;
        if entry.has_submenu {
            return None;
        }
        let activation = Activation {
            action: entry.action.clone(),
            item: None,
        };
        doc.remove(entry.menu);
        Some(activation)
    }

    /// Apply due overlay close deadlines.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        for overlay in self.entries.values_mut().filter_map(|e| e.overlay.as_mut()) {
            overlay.tick(doc, now);
        }
    }

    fn overlay_mut(&mut self, entry: NodeId) -> Option<&mut SubmenuOverlay> {
        self.entries.get_mut(&entry)?.overlay.as_mut()
    }
}

/// First enabled node inside any host menu, in document order.
fn find_template(doc: &Document) -> Option<NodeId> {
    doc.find_first(|id| {
        doc.attribute(id, "disabled") != Some("true")
            && find_ancestor(doc, id, HOST_MENU_CLASS).is_some()
    })
}
