//! Opaque render output.
//!
//! Scopes describe what should be on screen as a tree of tagged nodes; the
//! host owns layout and styling.

use std::collections::BTreeMap;

use serde::Serialize;

/// A node of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub tag: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<View>,
}

impl View {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Rendered before a scope has any state.
    pub fn placeholder() -> Self {
        Self::new("top-bar-stub")
    }

    #[must_use]
    pub fn prop(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.props.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn child(mut self, child: View) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = View>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get_prop(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    /// Depth-first search for the first node with `tag`.
    pub fn find(&self, tag: &str) -> Option<&View> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(tag))
    }
}

/// Floating action button configuration of a tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fab {
    pub visible: bool,
    pub actions: Vec<&'static str>,
}

impl Fab {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn to_view(&self) -> View {
        View::new("fab")
            .prop("visible", self.visible)
            .prop("actions", self.actions.join(","))
    }
}
