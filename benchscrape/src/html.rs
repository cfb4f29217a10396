use kuchiki::{traits::TendrilSink, NodeRef};

/// A subtree of a parsed page that selectors are evaluated against.
pub struct Scope {
    node: NodeRef,
}

impl From<NodeRef> for Scope {
    fn from(node: NodeRef) -> Self {
        Self { node }
    }
}

impl Scope {
    /// Parse a whole document.
    pub fn parse(html: &str) -> Self {
        Self::from(kuchiki::parse_html().one(html))
    }

    /// Every element below this scope matching the CSS `selector`, in document order.
    /// An invalid selector matches nothing.
    pub fn select_all(&self, selector: &str) -> Vec<Self> {
        match self.node.select(selector) {
            Ok(matches) => matches.map(|m| Self::from(m.as_node().clone())).collect(),
            Err(()) => Vec::new(),
        }
    }

    pub fn select(&self, selector: &str) -> Option<Self> {
        self.node
            .select_first(selector)
            .ok()
            .map(|m| Self::from(m.as_node().clone()))
    }

    pub fn exists(&self, selector: &str) -> bool {
        self.select(selector).is_some()
    }

    /// Visible text of the scope, trimmed, with line breaks folded into spaces.
    pub fn text(&self) -> String {
        clean_text(&self.node.text_contents())
    }

    /// [`Scope::text`] of every match of `selector`.
    pub fn texts(&self, selector: &str) -> Vec<String> {
        self.select_all(selector).iter().map(Self::text).collect()
    }
}

pub(crate) fn clean_text(s: &str) -> String {
    s.trim().replace('\n', " ")
}
