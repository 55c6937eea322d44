use std::time::{Duration, Instant};

use lite_menu_tools::context_menu::inject::{HOST_MENU_CLASS, ITEM_TEXT_CLASS};
use lite_menu_tools::context_menu::overlay::VISIBLE_CLASS;
use lite_menu_tools::context_menu::{
    MenuAction, MenuSession, Platform, PointerButton, PointerEvent, Reconcile,
};
use lite_menu_tools::host::{Document, MsgElement, MsgRecord, NodeId, Rect};
use lite_menu_tools::options::{EmoticonFolder, Options};
use serde_json::json;

fn open_host_menu(doc: &mut Document) -> NodeId {
    let body = doc.body();
    let menu = doc.create_child(body, "div", &[HOST_MENU_CLASS]);
    let disabled = doc.create_child(menu, "div", &["q-context-menu-item"]);
    doc.set_attribute(disabled, "disabled", "true");
    let item = doc.create_child(menu, "div", &["q-context-menu-item"]);
    doc.create_child(item, "i", &["q-icon"]);
    let text = doc.create_child(item, "span", &[ITEM_TEXT_CLASS]);
    doc.set_text(text, "Copy");
    menu
}

fn label_of(doc: &Document, entry: NodeId) -> String {
    doc.descendants(entry)
        .into_iter()
        .find(|id| doc.has_class(*id, ITEM_TEXT_CLASS))
        .map(|id| doc.text(id).to_string())
        .unwrap_or_default()
}

fn emoticon_options() -> Options {
    let mut options = Options::default();
    options.local_emoticons.enabled = true;
    options.local_emoticons.copy_file_to_local_emoticons = true;
    options.local_emoticons.folders = vec![
        EmoticonFolder {
            name: "cats".into(),
            path: "/faces/cats".into(),
        },
        EmoticonFolder {
            name: "dogs".into(),
            path: "/faces/dogs".into(),
        },
    ];
    options
}

/// Right-click a received picture and open the host menu.
fn picture_menu(doc: &mut Document, session: &mut MenuSession) -> NodeId {
    let body = doc.body();
    let msg = doc.create_child(body, "div", &["message"]);
    doc.set_record(
        msg,
        MsgRecord {
            elements: vec![MsgElement::picture("/cache/ab_0.jpg")],
            ..MsgRecord::default()
        },
    );
    let img = doc.create_child(msg, "img", &["image-content"]);
    doc.set_attribute(img, "src", "appimg:///cache/ab_0.jpg");
    session.handle_pointer(doc, &PointerEvent::down(PointerButton::Secondary, img));
    doc.take_mutations();
    open_host_menu(doc)
}

fn submenu_entry(session: &MenuSession) -> NodeId {
    session
        .injector()
        .entries()
        .find(|id| session.injector().overlay_for(*id).is_some())
        .expect("entry with submenu")
}

#[test]
fn word_search_is_injected_once_per_menu() {
    let mut doc = Document::new();
    let body = doc.body();
    let p = doc.create_child(body, "p", &[]);
    let mut session = MenuSession::new(Options::default(), Platform::Other);

    doc.set_selection("hello world");
    session.handle_pointer(&doc, &PointerEvent::up(PointerButton::Primary, p));
    session.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, p));
    doc.take_mutations();

    let menu = open_host_menu(&mut doc);
    assert_eq!(
        session.handle_mutations(&mut doc),
        Some(Reconcile::Injected { menu, entries: 1 })
    );
    for _ in 0..2 {
        doc.create_child(body, "div", &["tooltip"]);
        assert_eq!(session.handle_mutations(&mut doc), Some(Reconcile::Unchanged));
    }
    assert_eq!(session.handle_mutations(&mut doc), None);

    assert_eq!(doc.children(menu).len(), 3);
    let entries: Vec<_> = session.injector().entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(label_of(&doc, entries[0]), "Search: hell...");

    let activation = session.click(&mut doc, entries[0]).expect("activation");
    assert_eq!(
        activation.action,
        MenuAction::OpenUrl("https://www.google.com/search?q=hello%20world".into())
    );
    assert!(!doc.is_connected(menu));
    assert_eq!(
        session.handle_mutations(&mut doc),
        Some(Reconcile::TornDown { overlays: 0 })
    );
}

#[test]
fn disabled_features_add_nothing() {
    let mut doc = Document::new();
    let body = doc.body();
    let p = doc.create_child(body, "p", &[]);
    let mut options = Options::default();
    options.word_search.enabled = false;
    let mut session = MenuSession::new(options, Platform::Other);

    doc.set_selection("hello");
    session.handle_pointer(&doc, &PointerEvent::up(PointerButton::Primary, p));
    session.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, p));
    let menu = open_host_menu(&mut doc);
    assert_eq!(
        session.handle_mutations(&mut doc),
        Some(Reconcile::Injected { menu, entries: 0 })
    );
    assert_eq!(doc.children(menu).len(), 2);
}

#[test]
fn picture_menu_offers_search_and_save() {
    let mut doc = Document::new();
    let mut session = MenuSession::new(emoticon_options(), Platform::Other);
    let menu = picture_menu(&mut doc, &mut session);

    assert_eq!(
        session.handle_mutations(&mut doc),
        Some(Reconcile::Injected { menu, entries: 2 })
    );
    let labels: Vec<_> = session
        .injector()
        .entries()
        .map(|id| label_of(&doc, id))
        .collect();
    assert_eq!(labels, ["Search image", "Save to local emoticons"]);

    let search = session
        .injector()
        .entries()
        .find(|id| session.injector().overlay_for(*id).is_none())
        .expect("search entry");
    let activation = session.click(&mut doc, search).expect("activation");
    assert_eq!(
        activation.action,
        MenuAction::OpenUrl(
            "https://lens.google.com/uploadbyurl?url=https://gchat.qpic.cn/gchatpic_new/0/0-0-AB/0"
                .into()
        )
    );
}

#[test]
fn submenu_row_click_reports_payload() {
    let mut doc = Document::new();
    let mut session = MenuSession::new(emoticon_options(), Platform::Other);
    let menu = picture_menu(&mut doc, &mut session);
    session.handle_mutations(&mut doc);

    let entry = submenu_entry(&session);
    assert!(session.click(&mut doc, entry).is_none());
    assert!(doc.is_connected(menu));

    doc.set_rect(entry, Rect::new(100.0, 50.0, 180.0, 32.0));
    session.pointer_enter(&mut doc, entry);
    let overlay = session.injector().overlay_for(entry).expect("overlay");
    assert!(overlay.is_visible(&doc));
    assert_eq!(
        doc.style_property(overlay.root(), "--top"),
        Some("calc(50px - 0vh)")
    );
    assert_eq!(
        doc.style_property(overlay.root(), "--left"),
        Some("calc(280px - 0vh)")
    );

    let rows: Vec<_> = overlay.rows().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(doc.text(rows[1]), "dogs");

    let activation = session.click(&mut doc, rows[1]).expect("activation");
    assert_eq!(
        activation.action,
        MenuAction::SaveToFolder {
            source: "/cache/ab_0.jpg".into()
        }
    );
    let item = activation.item.expect("row payload");
    assert_eq!(item.name, "dogs");
    assert_eq!(item.payload, json!({ "name": "dogs", "path": "/faces/dogs" }));
}

#[test]
fn closing_menu_removes_overlays() {
    let mut doc = Document::new();
    let mut session = MenuSession::new(emoticon_options(), Platform::Other);
    let menu = picture_menu(&mut doc, &mut session);
    session.handle_mutations(&mut doc);

    let entry = submenu_entry(&session);
    let overlay_root = session
        .injector()
        .overlay_for(entry)
        .map(|o| o.root())
        .expect("overlay");
    assert!(doc.is_connected(overlay_root));

    doc.remove(menu);
    assert_eq!(
        session.handle_mutations(&mut doc),
        Some(Reconcile::TornDown { overlays: 1 })
    );
    assert!(!doc.is_connected(overlay_root));
    assert_eq!(session.injector().entries().count(), 0);
}

#[test]
fn overlay_hides_after_delay_unless_reentered() {
    let mut doc = Document::new();
    let mut session = MenuSession::new(emoticon_options(), Platform::Other);
    picture_menu(&mut doc, &mut session);
    session.handle_mutations(&mut doc);

    let entry = submenu_entry(&session);
    let root = session.injector().overlay_for(entry).expect("overlay").root();
    session.pointer_enter(&mut doc, entry);

    let t0 = Instant::now();
    session.pointer_leave(&doc, entry, t0);
    session.pointer_enter(&mut doc, root);
    session.tick(&mut doc, t0 + Duration::from_millis(400));
    assert!(doc.has_class(root, VISIBLE_CLASS));

    session.pointer_leave(&doc, root, t0);
    session.tick(&mut doc, t0 + Duration::from_millis(299));
    assert!(doc.has_class(root, VISIBLE_CLASS));
    session.tick(&mut doc, t0 + Duration::from_millis(300));
    assert!(!doc.has_class(root, VISIBLE_CLASS));
}

#[test]
fn wheel_scrolls_overflowing_submenu() {
    let mut doc = Document::new();
    let mut session = MenuSession::new(emoticon_options(), Platform::Other);
    picture_menu(&mut doc, &mut session);
    session.handle_mutations(&mut doc);

    let entry = submenu_entry(&session);
    let (root, scroll_box) = {
        let overlay = session.injector().overlay_for(entry).expect("overlay");
        (overlay.root(), overlay.scroll_box())
    };
    doc.set_rect(root, Rect::new(0.0, 0.0, 120.0, 100.0));
    doc.set_rect(scroll_box, Rect::new(0.0, 0.0, 120.0, 300.0));

    session.wheel(&mut doc, scroll_box, 1.0);
    assert_eq!(
        doc.style_property(scroll_box, "transform"),
        Some("translateY(-30px)")
    );
    session.wheel(&mut doc, scroll_box, -1.0);
    session.wheel(&mut doc, scroll_box, -1.0);
    assert_eq!(
        session.injector().overlay_for(entry).map(|o| o.offset_y()),
        Some(0.0)
    );
}
