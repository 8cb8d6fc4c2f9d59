//! Input events delivered to menu elements.

use serde::{Deserialize, Serialize};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary (usually left) button
    Left,
    /// Secondary (usually right) button
    Right,
    /// Middle button (wheel click)
    Middle,
    /// Extra button 4 (back)
    Button4,
    /// Extra button 5 (forward)
    Button5,
}

/// Keys the menu engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Space bar
    Space,
    /// Tab
    Tab,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
}

impl Key {
    /// Check if this key activates the focused item.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Input observed on an item's header template part.
///
/// These are the four streams a template exposes. The engine queues them and
/// applies them when the host drains its input queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemInput {
    /// Pointer entered (`true`) or left (`false`) the header
    Hovering(bool),
    /// A mouse button went down over the header
    MouseDown(MouseButton),
    /// The header was clicked
    Click,
    /// The header's pressed state changed
    Pressed(bool),
}
