//! MemoryDocument - in-memory text tree
//!
//! A small arena-backed element/text tree with just enough DOM behavior
//! (attributes, classes, replace, normalize, textContent) to run the
//! highlight engine without a browser. Used by the native test suites and by
//! hosts that render their own documents.

use std::collections::BTreeMap;

use super::tree::{ContainerPlan, Segment, TextNode, TextTree};
use crate::config::HighlightConfig;
use crate::error::{HighlightError, HighlightResult};

/// Handle into a `MemoryDocument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        classes: Vec<String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    scrolls: Vec<(NodeId, bool)>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// `<html><head></head><body></body></html>`
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            scrolls: Vec::new(),
        };
        doc.root = doc.alloc(element_kind("html"), None);
        doc.head = doc.append_element(doc.root, "head");
        doc.body = doc.append_element(doc.root, "body");
        doc
    }

    /// A body holding one `<p>` per entry.
    pub fn with_paragraphs(paragraphs: &[&str]) -> Self {
        let mut doc = Self::new();
        for text in paragraphs {
            let p = doc.append_element(doc.body, "p");
            doc.append_text(p, text);
        }
        doc
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.alloc(element_kind(tag), Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.alloc(NodeKind::Text(text.to_string()), Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node.0].kind {
            attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Detach `node` from its parent, as a page script might.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(NodeData { kind, parent, children: Vec::new() });
        NodeId(self.nodes.len() - 1)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        match &self.nodes[node.0].kind {
            NodeKind::Element { classes, .. } => classes.iter().any(|c| c == class),
            NodeKind::Text(_) => false,
        }
    }

    /// Descendant text concatenated, like `Node.textContent`.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    pub fn body_text(&self) -> String {
        self.text_content(self.body)
    }

    /// Number of text nodes under the body; tracks fragmentation.
    pub fn text_node_count(&self) -> usize {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| matches!(self.nodes[id.0].kind, NodeKind::Text(_)))
            .count()
    }

    /// Attached elements under the body carrying `class`, in document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    /// Markers scrolled to so far and whether the scroll was smooth.
    pub fn scroll_log(&self) -> &[(NodeId, bool)] {
        &self.scrolls
    }

    /// Serialized markup, attributes in name order; for assertions.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    pub fn body_html(&self) -> String {
        self.to_html(self.body)
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element { .. } => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element { tag, attributes, classes } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", classes.join(" ")));
                }
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, value));
                }
                out.push('>');
                for child in &self.nodes[node.0].children {
                    self.write_html(*child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }

    fn is_excluded_element(&self, node: NodeId, config: &HighlightConfig) -> bool {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, attributes, .. } => {
                config.skips_tag(tag)
                    || attributes.contains_key("hidden")
                    || attributes.get(&config.container_attribute).is_some_and(|v| v == "true")
            }
            NodeKind::Text(_) => false,
        }
    }

    fn replace_child(&mut self, old: NodeId, new: NodeId) -> HighlightResult<NodeId> {
        let parent = self.nodes[old.0].parent.ok_or(HighlightError::DetachedNode)?;
        let slot = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == old)
            .ok_or(HighlightError::DetachedNode)?;
        self.nodes[parent.0].children[slot] = new;
        self.nodes[new.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        Ok(parent)
    }

    fn new_element(&mut self, tag: &str) -> NodeId {
        self.alloc(element_kind(tag), None)
    }

    fn new_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()), None)
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn class_list_mut(&mut self, node: NodeId) -> HighlightResult<&mut Vec<String>> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element { classes, .. } => Ok(classes),
            NodeKind::Text(_) => Err(HighlightError::dom("text nodes have no class list")),
        }
    }
}

fn element_kind(tag: &str) -> NodeKind {
    NodeKind::Element {
        tag: tag.to_ascii_lowercase(),
        attributes: BTreeMap::new(),
        classes: Vec::new(),
    }
}

impl TextTree for MemoryDocument {
    type Node = NodeId;
    type Container = NodeId;
    type Marker = NodeId;

    fn text_nodes(&self, config: &HighlightConfig) -> HighlightResult<Vec<TextNode<NodeId>>> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> =
            self.nodes[self.body.0].children.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            match &self.nodes[id.0].kind {
                NodeKind::Text(text) => {
                    if !text.trim().is_empty() {
                        found.push(TextNode { node: id, text: text.clone() });
                    }
                }
                NodeKind::Element { .. } => {
                    if self.is_excluded_element(id, config) {
                        continue;
                    }
                    stack.extend(self.nodes[id.0].children.iter().rev().copied());
                }
            }
        }
        Ok(found)
    }

    fn apply_container(
        &mut self,
        node: &NodeId,
        plan: &ContainerPlan,
        config: &HighlightConfig,
    ) -> HighlightResult<(NodeId, Vec<NodeId>)> {
        if self.nodes[node.0].parent.is_none() {
            return Err(HighlightError::DetachedNode);
        }

        let container = self.new_element("span");
        self.set_attribute(container, &config.container_attribute, "true");
        self.set_attribute(container, "style", "display: contents");

        let mut markers = Vec::with_capacity(plan.marker_count());
        for segment in &plan.segments {
            match segment {
                Segment::Text(text) => {
                    let t = self.new_text(text);
                    self.adopt(container, t);
                }
                Segment::Mark(text) => {
                    let mark = self.new_element("mark");
                    self.class_list_mut(mark)?.push(config.marker_class.clone());
                    let t = self.new_text(text);
                    self.adopt(mark, t);
                    self.adopt(container, mark);
                    markers.push(mark);
                }
            }
        }

        self.replace_child(*node, container)?;
        Ok((container, markers))
    }

    fn restore_container(&mut self, container: &NodeId) -> HighlightResult<Option<NodeId>> {
        if self.nodes[container.0].parent.is_none() {
            return Ok(None);
        }
        let text = self.text_content(*container);
        let replacement = self.new_text(&text);
        self.replace_child(*container, replacement).map(Some)
    }

    fn normalize(&mut self, node: &NodeId) -> HighlightResult<()> {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());

        for child in children {
            let text = match &self.nodes[child.0].kind {
                NodeKind::Text(t) => Some(t.clone()),
                NodeKind::Element { .. } => None,
            };
            match text {
                Some(t) if t.is_empty() => {
                    self.nodes[child.0].parent = None;
                }
                Some(t) => {
                    if let Some(&previous) = kept.last() {
                        if let NodeKind::Text(prev) = &mut self.nodes[previous.0].kind {
                            prev.push_str(&t);
                            self.nodes[child.0].parent = None;
                            continue;
                        }
                    }
                    kept.push(child);
                }
                None => {
                    self.normalize(&child)?;
                    kept.push(child);
                }
            }
        }

        self.nodes[node.0].children = kept;
        Ok(())
    }

    fn set_marker_active(
        &mut self,
        marker: &NodeId,
        active: bool,
        config: &HighlightConfig,
    ) -> HighlightResult<()> {
        let classes = self.class_list_mut(*marker)?;
        let present = classes.iter().any(|c| *c == config.active_class);
        if active && !present {
            classes.push(config.active_class.clone());
        } else if !active {
            classes.retain(|c| *c != config.active_class);
        }
        Ok(())
    }

    fn scroll_into_view(&mut self, marker: &NodeId, smooth: bool) {
        self.scrolls.push((*marker, smooth));
    }
}
