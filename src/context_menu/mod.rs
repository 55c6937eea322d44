//! Augmenting the host's native context menu.
//!
//! [`MenuSession`] is the single owner of all per-window state. The host
//! forwards its events to it in the order they happen; every handler runs to
//! completion before the next one starts.

pub mod actions;
pub mod ancestor;
pub mod entries;
pub mod inject;
pub mod overlay;
pub mod tracker;

pub use actions::{ActionOutcome, ActionRunner};
pub use entries::{Activation, MenuAction, MenuEntryDescriptor, SubmenuItem};
pub use inject::{MenuInjector, Reconcile};
pub use overlay::SubmenuOverlay;
pub use tracker::{
    InteractionTracker, Platform, PointerButton, PointerEvent, PointerPhase, RightClickContext,
    SelectionState,
};

use crate::host::{Document, NodeId};
use crate::options::Options;
use std::time::Instant;

pub struct MenuSession {
    options: Options,
    tracker: InteractionTracker,
    injector: MenuInjector,
}

impl MenuSession {
    pub fn new(options: Options, platform: Platform) -> Self {
        Self {
            options,
            tracker: InteractionTracker::new(platform),
            injector: MenuInjector::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn tracker(&self) -> &InteractionTracker {
        &self.tracker
    }

    pub fn injector(&self) -> &MenuInjector {
        &self.injector
    }

    pub fn handle_pointer(&mut self, doc: &Document, event: &PointerEvent) {
        self.tracker.handle_pointer(doc, event);
    }

    /// Drain pending body mutations and reconcile once if there were any.
    pub fn handle_mutations(&mut self, doc: &mut Document) -> Option<Reconcile> {
        if doc.take_mutations().is_empty() {
            return None;
        }
        Some(self.injector.reconcile(
            doc,
            self.tracker.selection(),
            self.tracker.context(),
            &self.options,
        ))
    }

    pub fn pointer_enter(&mut self, doc: &mut Document, target: NodeId) {
        self.injector.pointer_enter(doc, target);
    }

    pub fn pointer_leave(&mut self, doc: &Document, target: NodeId, now: Instant) {
        self.injector.pointer_leave(doc, target, now);
    }

    pub fn wheel(&mut self, doc: &mut Document, target: NodeId, delta_y: f32) {
        self.injector.wheel(doc, target, delta_y);
    }

    pub fn click(&mut self, doc: &mut Document, target: NodeId) -> Option<Activation> {
        self.injector.click(doc, target)
    }

    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        self.injector.tick(doc, now);
    }
}
