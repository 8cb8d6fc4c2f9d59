//! Containers generated for items that cannot host themselves.

use crate::command::{self, Command};
use crate::template::{ContainerContent, DataTemplate, TemplateSelector};
use menuribbon_core::ElementId;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Wrapper the materializer creates around a raw data item.
///
/// A generated container never opens a submenu. It can be highlighted and may
/// carry a command when its data item is one.
pub struct GeneratedContainer {
    id: ElementId,
    content: ContainerContent,
    is_highlighted: bool,
    command: Option<Rc<dyn Command>>,
}

impl GeneratedContainer {
    /// Create an empty container for element `id`.
    #[must_use]
    pub const fn new(id: ElementId) -> Self {
        Self {
            id,
            content: ContainerContent::Empty,
            is_highlighted: false,
            command: None,
        }
    }

    /// Element id.
    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.id
    }

    /// Current content.
    #[must_use]
    pub const fn content(&self) -> &ContainerContent {
        &self.content
    }

    /// Always `false`: generated containers have no submenu.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        false
    }

    /// Highlight flag.
    #[must_use]
    pub const fn is_highlighted(&self) -> bool {
        self.is_highlighted
    }

    /// Bound command.
    #[must_use]
    pub fn command(&self) -> Option<&Rc<dyn Command>> {
        self.command.as_ref()
    }

    /// Show `item`, choosing a template the same way for every container.
    ///
    /// A selector result wins; otherwise the plain template is used; with
    /// neither, the item is shown raw.
    pub fn set_content(
        &mut self,
        item: &Value,
        template: Option<&DataTemplate>,
        selector: Option<&dyn TemplateSelector>,
    ) {
        let selected = selector.and_then(|s| s.select_template(item, self.id));
        self.content = match selected.as_ref().or(template) {
            Some(template) => {
                let mut visual = template.load_content();
                visual.data_context = Some(item.clone());
                ContainerContent::Visual(visual)
            }
            None => ContainerContent::Raw(item.clone()),
        };
    }

    /// Host an element directly.
    pub fn set_element(&mut self, element: ElementId) {
        self.content = ContainerContent::Element(element);
    }

    /// Release the content so the container can be discarded or reused.
    pub fn clear(&mut self) {
        self.content = ContainerContent::Empty;
        self.is_highlighted = false;
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) -> bool {
        let changed = self.is_highlighted != highlighted;
        self.is_highlighted = highlighted;
        changed
    }

    pub(crate) fn set_command(&mut self, command: Option<Rc<dyn Command>>) {
        self.command = command;
    }

    /// Run the bound command, if any and allowed. Returns whether it ran.
    pub(crate) fn invoke(&self) -> bool {
        self.command.as_deref().is_some_and(command::invoke)
    }
}

impl fmt::Debug for GeneratedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedContainer")
            .field("id", &self.id)
            .field("content", &self.content)
            .field("is_highlighted", &self.is_highlighted)
            .field("has_command", &self.command.is_some())
            .finish()
    }
}
