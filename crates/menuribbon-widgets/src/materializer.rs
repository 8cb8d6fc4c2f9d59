//! Turning a popup item's child entries into containers.
//!
//! Entries that are already popup items, separators or previously generated
//! containers are reused directly. Everything else gets a [`GeneratedContainer`]
//! whose content comes from the owner's template or template selector.

use crate::command::Command;
use crate::container::GeneratedContainer;
use crate::error::EngineError;
use crate::separator::Separator;
use crate::style::ResourceDictionary;
use crate::template::{ContainerContent, DataTemplate, TemplateSelector};
use menuribbon_core::{ElementId, ElementKind, ElementTree, TreeError};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// One entry of a popup item's child collection.
#[derive(Clone)]
pub enum MenuEntry {
    /// An element (popup item, separator, container or any visual)
    Element(ElementId),
    /// A plain data item
    Data(Value),
    /// A data item that is also a command
    Command {
        /// Data shown in the container
        data: Value,
        /// Command bound to the container's click
        command: Rc<dyn Command>,
    },
}

impl MenuEntry {
    /// Plain data entry.
    pub fn data(value: impl Into<Value>) -> Self {
        Self::Data(value.into())
    }

    /// Command entry.
    pub fn command(data: impl Into<Value>, command: impl Command + 'static) -> Self {
        Self::Command {
            data: data.into(),
            command: Rc::new(command),
        }
    }

    /// Element id, for element entries.
    #[must_use]
    pub const fn element(&self) -> Option<ElementId> {
        match self {
            Self::Element(id) => Some(*id),
            Self::Data(_) | Self::Command { .. } => None,
        }
    }

    /// Data item, for data and command entries.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Data(data) | Self::Command { data, .. } => Some(data),
            Self::Element(_) => None,
        }
    }

    /// Command carried by the entry.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Rc<dyn Command>> {
        match self {
            Self::Command { command, .. } => Some(command),
            Self::Element(_) | Self::Data(_) => None,
        }
    }
}

impl From<ElementId> for MenuEntry {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

impl From<Value> for MenuEntry {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<&str> for MenuEntry {
    fn from(value: &str) -> Self {
        Self::data(value)
    }
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(id) => f.debug_tuple("Element").field(id).finish(),
            Self::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Self::Command { data, .. } => f
                .debug_struct("Command")
                .field("data", data)
                .finish_non_exhaustive(),
        }
    }
}

/// Check if an element of `kind` can be placed in a menu without a wrapper.
#[must_use]
pub const fn is_item_its_own_container(kind: ElementKind) -> bool {
    kind.is_own_container()
}

/// Borrowed view of the engine state the materializer touches.
pub(crate) struct Materializer<'a> {
    pub(crate) tree: &'a mut ElementTree,
    pub(crate) containers: &'a mut HashMap<ElementId, GeneratedContainer>,
    pub(crate) separators: &'a mut HashMap<ElementId, Separator>,
    pub(crate) resources: &'a ResourceDictionary,
    pub(crate) separator_style_key: &'a str,
}

impl Materializer<'_> {
    /// Produce the container for `entry` under `owner` and prepare it.
    pub(crate) fn realize(
        &mut self,
        owner: ElementId,
        entry: &MenuEntry,
        template: Option<&DataTemplate>,
        selector: Option<&dyn TemplateSelector>,
    ) -> Result<ElementId, EngineError> {
        let hosted = match entry {
            MenuEntry::Element(id) => {
                let kind = self.tree.kind(*id).ok_or(TreeError::UnknownElement(*id))?;
                (!is_item_its_own_container(kind)).then_some(*id)
            }
            MenuEntry::Data(_) | MenuEntry::Command { .. } => None,
        };

        let (container, generated) = match (entry, hosted) {
            (MenuEntry::Element(id), None) => (*id, false),
            _ => {
                let id = self.tree.create(ElementKind::GeneratedContainer);
                self.containers.insert(id, GeneratedContainer::new(id));
                tracing::trace!(owner = %owner, container = %id, "container generated");
                (id, true)
            }
        };

        if let Err(e) = self.link(owner, container, hosted) {
            if generated {
                self.discard(container);
            }
            return Err(e.into());
        }
        self.prepare(container, entry, template, selector);
        Ok(container)
    }

    fn link(
        &mut self,
        owner: ElementId,
        container: ElementId,
        hosted: Option<ElementId>,
    ) -> Result<(), TreeError> {
        self.tree.set_logical_parent(container, Some(owner))?;
        self.tree.set_visual_parent(container, Some(owner))?;
        if let Some(element) = hosted {
            self.tree.set_visual_parent(element, Some(container))?;
        }
        Ok(())
    }

    /// Drop a generated container that never made it into the collection.
    fn discard(&mut self, container: ElementId) {
        self.containers.remove(&container);
        if let Err(e) = self.tree.remove(container) {
            tracing::warn!(container = %container, error = %e, "failed to discard container");
        }
    }

    /// Bind `entry` to `container`.
    pub(crate) fn prepare(
        &mut self,
        container: ElementId,
        entry: &MenuEntry,
        template: Option<&DataTemplate>,
        selector: Option<&dyn TemplateSelector>,
    ) {
        match self.tree.kind(container) {
            Some(ElementKind::GeneratedContainer) => {
                let generated = self
                    .containers
                    .entry(container)
                    .or_insert_with(|| GeneratedContainer::new(container));
                match entry {
                    MenuEntry::Data(data) | MenuEntry::Command { data, .. } => {
                        generated.set_content(data, template, selector);
                    }
                    MenuEntry::Element(id) if *id != container => generated.set_element(*id),
                    MenuEntry::Element(_) => {}
                }
                if let Some(command) = entry.as_command() {
                    generated.set_command(Some(Rc::clone(command)));
                }
            }
            Some(ElementKind::Separator) => {
                let separator = self
                    .separators
                    .entry(container)
                    .or_insert_with(|| Separator::new(container));
                if separator.has_default_style() {
                    if let Some(style) = self.resources.find(self.separator_style_key) {
                        separator.set_style(Some(style.clone()));
                    }
                }
            }
            _ => {}
        }
    }

    /// Undo [`Self::realize`]. Generated containers are released and destroyed;
    /// reused elements are only unlinked from `owner`.
    pub(crate) fn clear(
        &mut self,
        owner: ElementId,
        container: ElementId,
        entry: &MenuEntry,
    ) -> Result<(), EngineError> {
        if entry.element() == Some(container) {
            if self.tree.logical_parent(container) == Some(owner) {
                self.tree.set_logical_parent(container, None)?;
            }
            if self.tree.visual_parent(container) == Some(owner) {
                self.tree.set_visual_parent(container, None)?;
            }
            return Ok(());
        }

        if let Some(mut generated) = self.containers.remove(&container) {
            if let ContainerContent::Element(element) = generated.content() {
                let element = *element;
                if self.tree.visual_parent(element) == Some(container) {
                    self.tree.set_visual_parent(element, None)?;
                }
            }
            generated.clear();
        }
        if self.tree.exists(container) {
            self.tree.remove(container)?;
        }
        tracing::trace!(owner = %owner, container = %container, "container destroyed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RelayCommand;
    use crate::style::Style;
    use crate::template::VisualContent;
    use menuribbon_core::DEFAULT_SEPARATOR_STYLE_KEY;

    struct Fixture {
        tree: ElementTree,
        containers: HashMap<ElementId, GeneratedContainer>,
        separators: HashMap<ElementId, Separator>,
        resources: ResourceDictionary,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tree: ElementTree::new(),
                containers: HashMap::new(),
                separators: HashMap::new(),
                resources: ResourceDictionary::new()
                    .with_style(DEFAULT_SEPARATOR_STYLE_KEY, Style::new("line")),
            }
        }

        fn materializer(&mut self) -> Materializer<'_> {
            Materializer {
                tree: &mut self.tree,
                containers: &mut self.containers,
                separators: &mut self.separators,
                resources: &self.resources,
                separator_style_key: DEFAULT_SEPARATOR_STYLE_KEY,
            }
        }
    }

    fn text() -> DataTemplate {
        DataTemplate::new("text", || VisualContent::new("TextBlock"))
    }

    #[test]
    fn test_own_container_kinds() {
        assert!(is_item_its_own_container(ElementKind::PopupItem));
        assert!(is_item_its_own_container(ElementKind::Separator));
        assert!(is_item_its_own_container(ElementKind::GeneratedContainer));
        assert!(!is_item_its_own_container(ElementKind::Visual));
        assert!(!is_item_its_own_container(ElementKind::PopupRoot));
    }

    #[test]
    fn test_heterogeneous_entries() {
        let mut fx = Fixture::new();
        let owner = fx.tree.create(ElementKind::PopupItem);
        let sub = fx.tree.create(ElementKind::PopupItem);
        let sep = fx.tree.create(ElementKind::Separator);
        let entries = [
            MenuEntry::Element(sub),
            MenuEntry::data("raw string"),
            MenuEntry::Element(sep),
        ];

        let template = text();
        let mut m = fx.materializer();
        let containers: Vec<_> = entries
            .iter()
            .map(|e| m.realize(owner, e, Some(&template), None).unwrap())
            .collect();

        assert_eq!(containers.len(), 3);
        assert_eq!(containers[0], sub);
        assert_eq!(containers[2], sep);
        assert_eq!(fx.tree.kind(containers[1]), Some(ElementKind::GeneratedContainer));
        assert_eq!(
            fx.containers[&containers[1]].content().data_context(),
            Some(&Value::from("raw string"))
        );
        assert_eq!(fx.tree.logical_parent(sub), Some(owner));
        assert_eq!(fx.tree.visual_parent(sep), Some(owner));
    }

    #[test]
    fn test_separator_gets_default_style_once() {
        let mut fx = Fixture::new();
        let owner = fx.tree.create(ElementKind::PopupItem);
        let sep = fx.tree.create(ElementKind::Separator);
        let entry = MenuEntry::Element(sep);

        fx.materializer().realize(owner, &entry, None, None).unwrap();
        assert_eq!(fx.separators[&sep].style().map(|s| s.name.as_str()), Some("line"));

        fx.resources.insert(DEFAULT_SEPARATOR_STYLE_KEY, Style::new("thick"));
        fx.materializer().prepare(sep, &entry, None, None);
        assert_eq!(fx.separators[&sep].style().map(|s| s.name.as_str()), Some("line"));
    }

    #[test]
    fn test_separator_keeps_explicit_style() {
        let mut fx = Fixture::new();
        let owner = fx.tree.create(ElementKind::PopupItem);
        let sep = fx.tree.create(ElementKind::Separator);
        let mut explicit = Separator::new(sep);
        explicit.set_style(Some(Style::new("custom")));
        fx.separators.insert(sep, explicit);

        fx.materializer()
            .realize(owner, &MenuEntry::Element(sep), None, None)
            .unwrap();
        assert_eq!(fx.separators[&sep].style().map(|s| s.name.as_str()), Some("custom"));
    }

    #[test]
    fn test_command_entry_binds_command() {
        let mut fx = Fixture::new();
        let owner = fx.tree.create(ElementKind::PopupItem);
        let entry = MenuEntry::command("Save", RelayCommand::new(|| {}));

        let container = fx.materializer().realize(owner, &entry, None, None).unwrap();
        assert!(fx.containers[&container].command().is_some());
        assert_eq!(
            fx.containers[&container].content(),
            &ContainerContent::Raw(Value::from("Save"))
        );
    }

    #[test]
    fn test_hosted_visual_is_wrapped() {
        let mut fx = Fixture::new();
        let owner = fx.tree.create(ElementKind::PopupItem);
        let icon = fx.tree.create(ElementKind::Visual);
        let entry = MenuEntry::Element(icon);

        let container = fx.materializer().realize(owner, &entry, None, None).unwrap();
        assert_ne!(container, icon);
        assert_eq!(fx.tree.visual_parent(icon), Some(container));
        assert_eq!(
            fx.containers[&container].content(),
            &ContainerContent::Element(icon)
        );

        fx.materializer().clear(owner, container, &entry).unwrap();
        assert!(!fx.tree.exists(container));
        assert!(fx.tree.exists(icon));
        assert_eq!(fx.tree.visual_parent(icon), None);
    }

    #[test]
    fn test_clear_destroys_generated_container() {
        let mut fx = Fixture::new();
        let owner = fx.tree.create(ElementKind::PopupItem);
        let entry = MenuEntry::data(42);

        let container = fx.materializer().realize(owner, &entry, None, None).unwrap();
        fx.materializer().clear(owner, container, &entry).unwrap();

        assert!(!fx.tree.exists(container));
        assert!(!fx.containers.contains_key(&container));
        assert!(fx.tree.logical_children(owner).is_empty());
    }

    #[test]
    fn test_clear_unlinks_reused_item() {
        let mut fx = Fixture::new();
        let owner = fx.tree.create(ElementKind::PopupItem);
        let sub = fx.tree.create(ElementKind::PopupItem);
        let entry = MenuEntry::Element(sub);

        fx.materializer().realize(owner, &entry, None, None).unwrap();
        fx.materializer().clear(owner, sub, &entry).unwrap();

        assert!(fx.tree.exists(sub));
        assert_eq!(fx.tree.logical_parent(sub), None);
        assert_eq!(fx.tree.visual_parent(sub), None);
    }

    #[test]
    fn test_realize_rejects_cycle() {
        let mut fx = Fixture::new();
        let owner = fx.tree.create(ElementKind::PopupItem);
        let child = fx.tree.create(ElementKind::PopupItem);
        fx.tree.set_visual_parent(child, Some(owner)).unwrap();

        let err = fx
            .materializer()
            .realize(child, &MenuEntry::Element(owner), None, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Tree(TreeError::Cycle { .. })));
    }

    #[test]
    fn test_failed_wrap_discards_container() {
        let mut fx = Fixture::new();
        let panel = fx.tree.create(ElementKind::Visual);
        let owner = fx.tree.create(ElementKind::PopupItem);
        fx.tree.set_visual_parent(owner, Some(panel)).unwrap();
        let len = fx.tree.len();

        let err = fx
            .materializer()
            .realize(owner, &MenuEntry::Element(panel), None, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Tree(TreeError::Cycle { .. })));
        assert_eq!(fx.tree.len(), len);
        assert!(fx.tree.logical_children(owner).is_empty());
        assert!(fx.tree.visual_children(owner).is_empty());
        assert!(fx.containers.is_empty());
    }

    #[test]
    fn test_unknown_element_entry() {
        let mut fx = Fixture::new();
        let owner = fx.tree.create(ElementKind::PopupItem);
        let err = fx
            .materializer()
            .realize(owner, &MenuEntry::Element(ElementId::new(999)), None, None)
            .unwrap_err();
        assert_eq!(err, EngineError::Tree(TreeError::UnknownElement(ElementId::new(999))));
    }
}
