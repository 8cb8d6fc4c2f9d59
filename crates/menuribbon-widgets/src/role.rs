//! Menu item roles.

use serde::{Deserialize, Serialize};

/// Role of a popup item, derived from its position and whether it has children.
///
/// | top-level | has children | role |
/// |---|---|---|
/// | yes | yes | [`MenuItemRole::TopLevelHeader`] |
/// | yes | no | [`MenuItemRole::TopLevelItem`] |
/// | no | yes | [`MenuItemRole::SubmenuHeader`] |
/// | no | no | [`MenuItemRole::SubmenuItem`] |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MenuItemRole {
    /// Top-level item that opens a drop-down
    TopLevelHeader,
    /// Top-level item that invokes an action
    TopLevelItem,
    /// Nested item that opens a submenu
    SubmenuHeader,
    /// Nested item that invokes an action
    #[default]
    SubmenuItem,
}

impl MenuItemRole {
    /// Classify an item.
    #[must_use]
    pub const fn classify(is_top_level: bool, has_children: bool) -> Self {
        match (is_top_level, has_children) {
            (true, true) => Self::TopLevelHeader,
            (true, false) => Self::TopLevelItem,
            (false, true) => Self::SubmenuHeader,
            (false, false) => Self::SubmenuItem,
        }
    }

    /// Check if this role invokes an action rather than opening children.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::TopLevelItem | Self::SubmenuItem)
    }

    /// Check if this role opens children.
    #[must_use]
    pub const fn is_header(self) -> bool {
        !self.is_leaf()
    }

    /// Check if this role sits directly under the popup root.
    #[must_use]
    pub const fn is_top_level(self) -> bool {
        matches!(self, Self::TopLevelHeader | Self::TopLevelItem)
    }
}
