#![allow(clippy::struct_excessive_bools)]
//! Popup menu interaction engine for MenuRibbon.
//!
//! # Building a menu
//!
//! ```
//! use menuribbon_widgets::{shared, MenuEngine, MenuItemRole, PopupManager};
//! use menuribbon_core::ElementId;
//!
//! #[derive(Default)]
//! struct Coordinator {
//!     responsive: bool,
//! }
//!
//! impl PopupManager for Coordinator {
//!     fn enter(&mut self, _item: ElementId, _immediate: bool) {}
//!     fn exit(&mut self, _item: ElementId) {}
//!     fn is_responsive(&self) -> bool {
//!         self.responsive
//!     }
//!     fn set_responsive(&mut self, responsive: bool) {
//!         self.responsive = responsive;
//!     }
//!     fn set_opened_item(&mut self, _item: Option<ElementId>) {}
//!     fn set_highlighted_item(&mut self, _item: Option<ElementId>) {}
//!     fn set_tracking(&mut self, _tracking: bool) {}
//! }
//!
//! let mut engine = MenuEngine::new();
//! let root = engine.create_root(shared(Coordinator::default()));
//! let file = engine.create_item();
//! let open = engine.create_item();
//! engine.attach(file, root).unwrap();
//! engine.add_entry(file, open).unwrap();
//! engine.add_entry(file, "Recent files").unwrap();
//!
//! assert_eq!(engine.item_state(file).unwrap().role, MenuItemRole::TopLevelHeader);
//! assert_eq!(engine.item_state(open).unwrap().role, MenuItemRole::SubmenuItem);
//! ```

mod command;
mod container;
mod engine;
mod error;
mod manager;
mod materializer;
mod popup_item;
mod role;
mod separator;
mod style;
mod template;

#[cfg(test)]
mod testing;

pub use command::{Command, RelayCommand};
pub use container::GeneratedContainer;
pub use engine::MenuEngine;
pub use error::EngineError;
pub use manager::{shared, PopupManager, PopupRootRef, SharedManager};
pub use materializer::{is_item_its_own_container, MenuEntry};
pub use popup_item::{ItemProperty, PopupItem, PopupItemState, PropertyChanged};
pub use role::MenuItemRole;
pub use separator::Separator;
pub use style::{ResourceDictionary, ResourceKey, Style};
pub use template::{
    ContainerContent, DataTemplate, HeaderPart, HeaderSource, TemplateSelector, VisualContent,
};
