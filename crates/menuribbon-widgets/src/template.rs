//! Data templates, template selectors and header template parts.

use menuribbon_core::{ElementId, EventSource, MouseButton};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Visual content produced by a [`DataTemplate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualContent {
    /// Visual kind (e.g. "TextBlock")
    pub kind: String,
    /// Template-defined properties
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    /// Data item the content is bound to
    #[serde(default)]
    pub data_context: Option<Value>,
}

impl VisualContent {
    /// Create content of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Set a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Recipe producing fresh [`VisualContent`] for a data item.
#[derive(Clone)]
pub struct DataTemplate {
    name: String,
    factory: Rc<dyn Fn() -> VisualContent>,
}

impl DataTemplate {
    /// Create a template from a content factory.
    pub fn new(name: impl Into<String>, factory: impl Fn() -> VisualContent + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Rc::new(factory),
        }
    }

    /// Template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instantiate the template. Every call yields a new instance.
    #[must_use]
    pub fn load_content(&self) -> VisualContent {
        (self.factory)()
    }
}

impl fmt::Debug for DataTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTemplate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Chooses a template per data item.
pub trait TemplateSelector {
    /// Template for `item` hosted in `container`, or `None` to fall back.
    fn select_template(&self, item: &Value, container: ElementId) -> Option<DataTemplate>;
}

impl<F> TemplateSelector for F
where
    F: Fn(&Value, ElementId) -> Option<DataTemplate>,
{
    fn select_template(&self, item: &Value, container: ElementId) -> Option<DataTemplate> {
        (self)(item, container)
    }
}

/// What a generated container currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ContainerContent {
    /// Nothing (fresh or cleared)
    #[default]
    Empty,
    /// The data item itself, shown without a template
    Raw(Value),
    /// Template output bound to the data item
    Visual(VisualContent),
    /// An element hosted as-is
    Element(ElementId),
}

impl ContainerContent {
    /// Check if the container shows nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Data item bound to the content.
    #[must_use]
    pub const fn data_context(&self) -> Option<&Value> {
        match self {
            Self::Raw(value) => Some(value),
            Self::Visual(visual) => visual.data_context.as_ref(),
            Self::Empty | Self::Element(_) => None,
        }
    }
}

/// Header part of an item template, exposing its input streams.
///
/// Each stream is optional; items subscribe to the ones present.
pub trait HeaderPart {
    /// Pointer-over changes.
    fn hovering(&self) -> Option<&EventSource<bool>> {
        None
    }

    /// Mouse button presses.
    fn mouse_down(&self) -> Option<&EventSource<MouseButton>> {
        None
    }

    /// Clicks.
    fn clicks(&self) -> Option<&EventSource<()>> {
        None
    }

    /// Pressed-state changes.
    fn pressed(&self) -> Option<&EventSource<bool>> {
        None
    }
}

/// Header part exposing all four streams.
///
/// The rendering layer feeds it; items subscribe through [`HeaderPart`].
#[derive(Debug, Clone, Default)]
pub struct HeaderSource {
    /// Pointer-over changes
    pub hovering: EventSource<bool>,
    /// Mouse button presses
    pub mouse_down: EventSource<MouseButton>,
    /// Clicks
    pub clicks: EventSource<()>,
    /// Pressed-state changes
    pub pressed: EventSource<bool>,
}

impl HeaderSource {
    /// Create a header part with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total subscribers across all four streams.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.hovering.subscriber_count()
            + self.mouse_down.subscriber_count()
            + self.clicks.subscriber_count()
            + self.pressed.subscriber_count()
    }
}

impl HeaderPart for HeaderSource {
    fn hovering(&self) -> Option<&EventSource<bool>> {
        Some(&self.hovering)
    }

    fn mouse_down(&self) -> Option<&EventSource<MouseButton>> {
        Some(&self.mouse_down)
    }

    fn clicks(&self) -> Option<&EventSource<()>> {
        Some(&self.clicks)
    }

    fn pressed(&self) -> Option<&EventSource<bool>> {
        Some(&self.pressed)
    }
}
