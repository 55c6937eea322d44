use lite_menu_tools::context_menu::{
    InteractionTracker, Platform, PointerButton, PointerEvent, RightClickContext,
};
use lite_menu_tools::host::{Document, MsgElement, MsgRecord, NodeId, Rect};

fn message(doc: &mut Document, record: MsgRecord) -> NodeId {
    let body = doc.body();
    let node = doc.create_child(body, "div", &["message"]);
    doc.set_record(node, record);
    node
}

fn text_message(doc: &mut Document) -> (NodeId, NodeId) {
    let msg = message(
        doc,
        MsgRecord {
            elements: vec![MsgElement::text("hello there")],
            send_member_name: Some(String::new()),
            send_nick_name: Some("Alice".into()),
            sender_uid: Some("u_42".into()),
        },
    );
    let name = doc.create_child(msg, "div", &["user-name"]);
    let label = doc.create_child(name, "span", &["text-ellipsis"]);
    doc.set_font_family(label, "\"Segoe UI\", sans-serif");
    let wrapper = doc.create_child(msg, "div", &["message-content__wrapper"]);
    let text = doc.create_child(wrapper, "span", &["text-element"]);
    doc.set_rect(text, Rect::new(60.0, 30.0, 120.0, 22.0));
    (msg, text)
}

#[test]
fn release_captures_selection() {
    let mut doc = Document::new();
    let body = doc.body();
    let p = doc.create_child(body, "p", &[]);
    let mut tracker = InteractionTracker::new(Platform::Other);

    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Primary, p));
    assert!(tracker.selection().left_button_down);

    doc.set_selection("rust");
    tracker.handle_pointer(&doc, &PointerEvent::up(PointerButton::Primary, p));
    assert_eq!(tracker.selection().text, "rust");
    assert!(!tracker.selection().left_button_down);
}

#[test]
fn secondary_press_while_dragging_recaptures_selection() {
    let mut doc = Document::new();
    let body = doc.body();
    let p = doc.create_child(body, "p", &[]);
    let mut tracker = InteractionTracker::new(Platform::Other);

    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Primary, p));
    doc.set_selection("half sel");
    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, p));
    assert_eq!(tracker.selection().text, "half sel");
    assert!(tracker.context().secondary);
}

#[test]
fn right_click_outside_message_has_no_candidates() {
    let mut doc = Document::new();
    let body = doc.body();
    let p = doc.create_child(body, "p", &[]);
    let mut tracker = InteractionTracker::new(Platform::Other);

    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, p));
    assert_eq!(
        tracker.context(),
        &RightClickContext {
            secondary: true,
            ..RightClickContext::default()
        }
    );
}

#[test]
fn right_click_on_picture_records_decoded_path() {
    let mut doc = Document::new();
    let msg = message(
        &mut doc,
        MsgRecord {
            elements: vec![MsgElement::picture("/cache/pic/ab_0.jpg")],
            ..MsgRecord::default()
        },
    );
    let img = doc.create_child(msg, "img", &["image-content"]);
    doc.set_attribute(img, "src", "appimg:///cache/pic/my%20ab_0.jpg");
    let mut tracker = InteractionTracker::new(Platform::Other);

    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, img));
    let ctx = tracker.context();
    assert_eq!(ctx.image_path.as_deref(), Some("/cache/pic/my ab_0.jpg"));
    assert_eq!(ctx.search_image_path, ctx.image_path);
    assert!(ctx.sticker.is_none());
}

#[test]
fn market_face_overrides_image_path_only() {
    let mut doc = Document::new();
    let msg = message(
        &mut doc,
        MsgRecord {
            elements: vec![MsgElement::market_face("/faces/cat.png")],
            ..MsgRecord::default()
        },
    );
    let img = doc.create_child(msg, "img", &["market-face"]);
    let mut tracker = InteractionTracker::new(Platform::Other);

    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, img));
    assert_eq!(tracker.context().image_path.as_deref(), Some("/faces/cat.png"));
    assert!(tracker.context().search_image_path.is_none());
}

#[test]
fn plain_text_message_yields_sticker_spec() {
    let mut doc = Document::new();
    let (_, text) = text_message(&mut doc);
    let mut tracker = InteractionTracker::new(Platform::Other);

    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, text));
    let spec = tracker.context().sticker.clone().expect("sticker spec");
    assert_eq!(spec.user_name, "Alice");
    assert_eq!(spec.user_uid, "u_42");
    assert_eq!(spec.content, "hello there");
    assert_eq!(spec.font_family, "\"Segoe UI\", sans-serif");
    assert_eq!((spec.width, spec.height), (120.0, 22.0));
}

#[test]
fn message_without_name_label_is_not_a_sticker() {
    let mut doc = Document::new();
    let msg = message(
        &mut doc,
        MsgRecord {
            elements: vec![MsgElement::text("hi")],
            send_nick_name: Some("Bob".into()),
            ..MsgRecord::default()
        },
    );
    let wrapper = doc.create_child(msg, "div", &["message-content__wrapper"]);
    let text = doc.create_child(wrapper, "span", &["text-element"]);
    let mut tracker = InteractionTracker::new(Platform::Other);

    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, text));
    assert!(tracker.context().secondary);
    assert!(tracker.context().sticker.is_none());
}

#[test]
fn windows_captures_on_release() {
    let mut doc = Document::new();
    let (_, text) = text_message(&mut doc);
    let mut tracker = InteractionTracker::new(Platform::Windows);

    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, text));
    assert!(!tracker.context().secondary);
    tracker.handle_pointer(&doc, &PointerEvent::up(PointerButton::Secondary, text));
    assert!(tracker.context().sticker.is_some());
}

#[test]
fn other_buttons_reset_context() {
    let mut doc = Document::new();
    let (_, text) = text_message(&mut doc);
    let mut tracker = InteractionTracker::new(Platform::Other);

    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, text));
    assert!(tracker.context().sticker.is_some());
    tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::from_index(1), text));
    assert_eq!(tracker.context(), &RightClickContext::default());
}

#[test]
fn release_selection_wins_after_right_click() {
    for platform in [Platform::Windows, Platform::Other] {
        let mut doc = Document::new();
        let (_, text) = text_message(&mut doc);
        let mut tracker = InteractionTracker::new(platform);

        tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Primary, text));
        doc.set_selection("a");
        tracker.handle_pointer(&doc, &PointerEvent::up(PointerButton::Primary, text));
        tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Secondary, text));
        tracker.handle_pointer(&doc, &PointerEvent::up(PointerButton::Secondary, text));
        assert!(tracker.context().sticker.is_some(), "{platform:?}");
        assert_eq!(tracker.selection().text, "a");

        tracker.handle_pointer(&doc, &PointerEvent::down(PointerButton::Primary, text));
        doc.set_selection("b");
        tracker.handle_pointer(&doc, &PointerEvent::up(PointerButton::Primary, text));
        assert_eq!(tracker.selection().text, "b", "{platform:?}");
        assert!(!tracker.selection().left_button_down);
    }
}
