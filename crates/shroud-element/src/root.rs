//! Isolated render roots (the shadow root of a custom element).

use std::cell::RefCell;
use std::rc::Rc;

/// A child node of a render root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    /// `<style>` with inline CSS
    Style(String),
    /// `<link rel="stylesheet" href="...">`
    Stylesheet(String),
    /// `<div class="...">` holding rendered markup
    Container { class: String, html: String },
}

/// Open render root attached to a custom element at construction.
///
/// Cloning yields another handle to the same root.
#[derive(Debug, Clone, Default)]
pub struct RenderRoot {
    nodes: Rc<RefCell<Vec<RenderNode>>>,
}

impl RenderRoot {
    /// Create an empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node after the existing ones.
    pub fn append(&self, node: RenderNode) {
        self.nodes.borrow_mut().push(node);
    }

    /// Append an empty container and return a handle to render into it.
    pub fn mount(&self, class: &str) -> MountPoint {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(RenderNode::Container {
            class: class.to_string(),
            html: String::new(),
        });
        MountPoint {
            root: self.clone(),
            index: nodes.len() - 1,
        }
    }

    /// Snapshot of the child nodes, in order.
    pub fn children(&self) -> Vec<RenderNode> {
        self.nodes.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Whether both handles point to the same root.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.nodes, &other.nodes)
    }

    /// Serialize the root content as HTML.
    pub fn to_html(&self) -> String {
        self.nodes
            .borrow()
            .iter()
            .map(|node| match node {
                RenderNode::Style(css) => format!("<style>{css}</style>"),
                RenderNode::Stylesheet(href) => {
                    format!(r#"<link rel="stylesheet" href="{}">"#, escape_attr(href))
                }
                RenderNode::Container { class, html } => {
                    format!(r#"<div class="{}">{html}</div>"#, escape_attr(class))
                }
            })
            .collect()
    }
}

/// The container a component instance renders into.
#[derive(Debug, Clone)]
pub struct MountPoint {
    root: RenderRoot,
    index: usize,
}

impl MountPoint {
    /// Replace the rendered markup.
    pub fn set_html(&self, markup: impl Into<String>) {
        if let Some(RenderNode::Container { html, .. }) =
            self.root.nodes.borrow_mut().get_mut(self.index)
        {
            *html = markup.into();
        }
    }

    /// Current rendered markup.
    pub fn html(&self) -> String {
        match self.root.nodes.borrow().get(self.index) {
            Some(RenderNode::Container { html, .. }) => html.clone(),
            _ => String::new(),
        }
    }

    /// The root this mount point lives in.
    pub fn root(&self) -> &RenderRoot {
        &self.root
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
