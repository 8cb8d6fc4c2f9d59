//! Separator elements.

use crate::style::Style;
use menuribbon_core::ElementId;

/// A separator between menu entries. Hosted as its own container.
#[derive(Debug, Clone, PartialEq)]
pub struct Separator {
    id: ElementId,
    style: Option<Style>,
}

impl Separator {
    /// Create an unstyled separator for element `id`.
    #[must_use]
    pub const fn new(id: ElementId) -> Self {
        Self { id, style: None }
    }

    /// Element id.
    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.id
    }

    /// Assigned style.
    #[must_use]
    pub const fn style(&self) -> Option<&Style> {
        self.style.as_ref()
    }

    /// Check if no style has been assigned yet.
    #[must_use]
    pub const fn has_default_style(&self) -> bool {
        self.style.is_none()
    }

    pub(crate) fn set_style(&mut self, style: Option<Style>) {
        self.style = style;
    }
}
