//! WebTree - `TextTree` over the live page DOM via `web-sys`.
//!
//! Only usable on `wasm32` inside a page; every call goes through JS.

use wasm_bindgen::JsValue;
use web_sys::{
    Document, Element, Node, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use super::tree::{ContainerPlan, Segment, TextNode, TextTree};
use crate::config::HighlightConfig;
use crate::error::{HighlightError, HighlightResult};

/// `NodeFilter.SHOW_TEXT`
const SHOW_TEXT: u32 = 0x4;

pub struct WebTree {
    document: Document,
}

impl WebTree {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Tree over `window.document`.
    pub fn from_window() -> HighlightResult<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| HighlightError::dom("no window.document in this context"))?;
        Ok(Self::new(document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// `closest()` selector matching any ancestor whose text is off limits.
    fn exclusion_selector(config: &HighlightConfig) -> String {
        let mut parts: Vec<String> = config.skip_tags.clone();
        parts.push("[hidden]".to_string());
        parts.push(format!("[{}=\"true\"]", config.container_attribute));
        parts.join(",")
    }

    fn create_marker(&self, text: &str, config: &HighlightConfig) -> HighlightResult<Element> {
        let mark = self.document.create_element("mark").map_err(js_err)?;
        mark.set_class_name(&config.marker_class);
        mark.set_text_content(Some(text));
        Ok(mark)
    }
}

fn js_err(value: JsValue) -> HighlightError {
    HighlightError::Dom(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

impl TextTree for WebTree {
    type Node = Node;
    type Container = Element;
    type Marker = Element;

    fn text_nodes(&self, config: &HighlightConfig) -> HighlightResult<Vec<TextNode<Node>>> {
        let body = self
            .document
            .body()
            .ok_or_else(|| HighlightError::dom("document has no body"))?;
        let walker = self
            .document
            .create_tree_walker_with_what_to_show(&body, SHOW_TEXT)
            .map_err(js_err)?;
        let selector = Self::exclusion_selector(config);

        let mut found = Vec::new();
        while let Some(node) = walker.next_node().map_err(js_err)? {
            let text = node.node_value().unwrap_or_default();
            if text.trim().is_empty() {
                continue;
            }
            let excluded = match node.parent_element() {
                Some(parent) => parent.closest(&selector).map_err(js_err)?.is_some(),
                None => true,
            };
            if !excluded {
                found.push(TextNode { node, text });
            }
        }
        Ok(found)
    }

    fn apply_container(
        &mut self,
        node: &Node,
        plan: &ContainerPlan,
        config: &HighlightConfig,
    ) -> HighlightResult<(Element, Vec<Element>)> {
        let parent = node.parent_node().ok_or(HighlightError::DetachedNode)?;

        let container = self.document.create_element("span").map_err(js_err)?;
        container.set_attribute(&config.container_attribute, "true").map_err(js_err)?;
        container.set_attribute("style", "display: contents").map_err(js_err)?;

        let mut markers = Vec::with_capacity(plan.marker_count());
        for segment in &plan.segments {
            match segment {
                Segment::Text(text) => {
                    let fragment = self.document.create_text_node(text);
                    container.append_child(&fragment).map_err(js_err)?;
                }
                Segment::Mark(text) => {
                    let mark = self.create_marker(text, config)?;
                    container.append_child(&mark).map_err(js_err)?;
                    markers.push(mark);
                }
            }
        }

        parent.replace_child(&container, node).map_err(js_err)?;
        Ok((container, markers))
    }

    fn restore_container(&mut self, container: &Element) -> HighlightResult<Option<Node>> {
        let Some(parent) = container.parent_node() else {
            return Ok(None);
        };
        let text = container.text_content().unwrap_or_default();
        let original = self.document.create_text_node(&text);
        parent.replace_child(&original, container).map_err(js_err)?;
        Ok(Some(parent))
    }

    fn normalize(&mut self, node: &Node) -> HighlightResult<()> {
        node.normalize();
        Ok(())
    }

    fn set_marker_active(
        &mut self,
        marker: &Element,
        active: bool,
        config: &HighlightConfig,
    ) -> HighlightResult<()> {
        let classes = marker.class_list();
        if active {
            classes.add_1(&config.active_class).map_err(js_err)
        } else {
            classes.remove_1(&config.active_class).map_err(js_err)
        }
    }

    fn scroll_into_view(&mut self, marker: &Element, smooth: bool) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(if smooth { ScrollBehavior::Smooth } else { ScrollBehavior::Auto });
        options.set_block(ScrollLogicalPosition::Center);
        marker.scroll_into_view_with_scroll_into_view_options(&options);
    }
}
