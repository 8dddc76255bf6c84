//! Description of the element under the pointer, used for hover hit testing

use atelier_core::Rect;
use serde::{Deserialize, Serialize};

/// A page element as seen by the hit test: tag, role, the `data-cursor`
/// opt-in, computed cursor style, bounds and parent chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetInfo {
    pub tag: String,
    pub role: Option<String>,
    pub data_cursor: bool,
    pub computed_cursor: Option<String>,
    pub bounds: Option<Rect>,
    pub parent: Option<Box<TargetInfo>>,
}

impl TargetInfo {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_data_cursor(mut self) -> Self {
        self.data_cursor = true;
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.computed_cursor = Some(cursor.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_parent(mut self, parent: TargetInfo) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// This element followed by its ancestors, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &TargetInfo> {
        std::iter::successors(Some(self), |t| t.parent.as_deref())
    }

    fn is_clickable_tag(&self) -> bool {
        self.tag.eq_ignore_ascii_case("a") || self.tag.eq_ignore_ascii_case("button")
    }

    /// Matches `a, button, [role="button"], [data-cursor]`
    fn matches_interactive_selector(&self) -> bool {
        self.is_clickable_tag() || self.role.as_deref() == Some("button") || self.data_cursor
    }

    /// Whether hovering this element should put the cursor in hover mode
    pub fn is_interactive(&self) -> bool {
        self.is_clickable_tag()
            || self.ancestors().any(TargetInfo::matches_interactive_selector)
            || self.computed_cursor.as_deref() == Some("pointer")
    }

    /// Nearest `a` or `button`, starting with this element
    pub fn closest_clickable(&self) -> Option<&TargetInfo> {
        self.ancestors().find(|t| t.is_clickable_tag())
    }
}
