use crate::host::message::MsgRecord;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Layout box of a node in viewport coordinates, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Child-list change observed on the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    markup: Option<String>,
    style: BTreeMap<String, String>,
    rect: Rect,
    font_family: Option<String>,
    record: Option<MsgRecord>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory view of the host page.
///
/// Nodes live in an arena and are never freed; removing a node only detaches
/// it. Child-list changes of the body are queued as [`MutationRecord`]s until
/// the owner drains them with [`Document::take_mutations`].
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    selection: String,
    mutations: Vec<MutationRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = Node {
            tag: "body".into(),
            ..Node::default()
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            selection: String::new(),
            mutations: Vec::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Convenience for building host trees: create, classify and attach.
    pub fn create_child(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let id = self.create_element(tag);
        for class in classes {
            self.add_class(id, class);
        }
        self.append_child(parent, id);
        id
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        if parent == self.body {
            self.mutations.push(MutationRecord {
                added: vec![child],
                removed: Vec::new(),
            });
        }
    }

    /// Detach `node` from its parent. The node keeps its own subtree.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|c| *c != node);
        if parent == self.body {
            self.mutations.push(MutationRecord {
                added: Vec::new(),
                removed: vec![node],
            });
        }
    }

    /// Copy `node` and its subtree into a new detached node.
    ///
    /// Mirrors a structural clone: classes, attributes, text, markup, style
    /// and layout are copied, host-attached view-model data is not.
    pub fn clone_subtree(&mut self, node: NodeId) -> NodeId {
        let mut copy = self.nodes[node.0].clone();
        copy.parent = None;
        copy.record = None;
        let children = std::mem::take(&mut copy.children);
        self.nodes.push(copy);
        let id = NodeId(self.nodes.len() - 1);
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.nodes[child_copy.0].parent = Some(id);
            self.nodes[id.0].children.push(child_copy);
        }
        id
    }

    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Whether `node` is attached (directly or transitively) to the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    /// Whether `ancestor` is `node` itself or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.nodes[node.0].classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    /// Replace the node's content with plain text, dropping its children.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        let n = &mut self.nodes[node.0];
        n.markup = None;
        n.text = text.to_string();
    }

    pub fn markup(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].markup.as_deref()
    }

    /// Replace the node's content with opaque markup, dropping its children.
    pub fn set_markup(&mut self, node: NodeId, markup: &str) {
        self.clear_children(node);
        let n = &mut self.nodes[node.0];
        n.text.clear();
        n.markup = Some(markup.to_string());
    }

    /// Append opaque markup as a new last child of `node`.
    pub fn append_markup(&mut self, node: NodeId, class: &str, markup: &str) -> NodeId {
        let child = self.create_child(node, "span", &[class]);
        self.nodes[child.0].markup = Some(markup.to_string());
        child
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn style_property(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].style.get(name).map(String::as_str)
    }

    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .style
            .insert(name.to_string(), value.to_string());
    }

    pub fn rect(&self, node: NodeId) -> Rect {
        self.nodes[node.0].rect
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.0].rect = rect;
    }

    /// Rendered `(width, height)` of the node.
    pub fn offset_size(&self, node: NodeId) -> (f32, f32) {
        let rect = self.nodes[node.0].rect;
        (rect.width, rect.height)
    }

    pub fn font_family(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].font_family.as_deref()
    }

    pub fn set_font_family(&mut self, node: NodeId, family: &str) {
        self.nodes[node.0].font_family = Some(family.to_string());
    }

    pub fn record(&self, node: NodeId) -> Option<&MsgRecord> {
        self.nodes[node.0].record.as_ref()
    }

    pub fn set_record(&mut self, node: NodeId, record: MsgRecord) {
        self.nodes[node.0].record = Some(record);
    }

    pub fn selection_text(&self) -> &str {
        &self.selection
    }

    pub fn set_selection(&mut self, text: &str) {
        self.selection = text.to_string();
    }

    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations)
    }

    /// Descendants of `scope` in document order, excluding `scope` itself.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// First connected node (document order) satisfying `pred`.
    pub fn find_first<F>(&self, pred: F) -> Option<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        self.descendants(self.body).into_iter().find(|id| pred(*id))
    }

    pub fn find_all<F>(&self, pred: F) -> Vec<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| pred(*id))
            .collect()
    }

    pub fn first_with_class(&self, class: &str) -> Option<NodeId> {
        self.find_first(|id| self.has_class(id, class))
    }

    pub fn all_with_class(&self, class: &str) -> Vec<NodeId> {
        self.find_all(|id| self.has_class(id, class))
    }

    /// First descendant of `scope` carrying `class`, excluding `scope` itself.
    pub fn descendant_with_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.has_class(*id, class))
    }

    /// First descendant of `scope` with `inner` class that sits below a node
    /// with `outer` class, both inside `scope`. Equivalent to the descendant
    /// combinator `.outer .inner`.
    pub fn nested_with_class(&self, scope: NodeId, outer: &str, inner: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|id| {
            if !self.has_class(*id, inner) {
                return false;
            }
            let mut current = self.nodes[id.0].parent;
            while let Some(p) = current {
                if p == scope {
                    return self.has_class(p, outer);
                }
                if self.has_class(p, outer) {
                    return true;
                }
                current = self.nodes[p.0].parent;
            }
            false
        })
    }
}
