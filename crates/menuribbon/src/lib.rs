//! MenuRibbon: popup menu and ribbon interaction engine.
//!
//! Re-exports the element tree and navigation primitives of
//! `menuribbon-core` at the top level and the menu engine under [`widgets`].
//! Most applications only need the [`prelude`].
//!
//! ```
//! use menuribbon::prelude::*;
//!
//! # struct Coordinator;
//! # impl PopupManager for Coordinator {
//! #     fn enter(&mut self, _: ElementId, _: bool) {}
//! #     fn exit(&mut self, _: ElementId) {}
//! #     fn is_responsive(&self) -> bool { false }
//! #     fn set_responsive(&mut self, _: bool) {}
//! #     fn set_opened_item(&mut self, _: Option<ElementId>) {}
//! #     fn set_highlighted_item(&mut self, _: Option<ElementId>) {}
//! #     fn set_tracking(&mut self, _: bool) {}
//! # }
//! let mut engine = MenuEngine::with_config(MenuConfig::load_default());
//! let root = engine.create_root(shared(Coordinator));
//! let edit = engine.create_named_item("Edit");
//! engine.attach(edit, root).unwrap();
//!
//! let undo = engine.add_entry(edit, MenuEntry::command("Undo", RelayCommand::new(|| {}))).unwrap();
//! assert!(engine.container(undo).is_some());
//! assert_eq!(engine.item_state(edit).unwrap().role, MenuItemRole::TopLevelHeader);
//! ```

pub use menuribbon_core::*;
pub use menuribbon_widgets as widgets;

/// Common imports for building and driving menus.
pub mod prelude {
    pub use menuribbon_core::{
        ElementId, ElementKind, Key, MenuConfig, MouseButton, NavigationConfig,
    };
    pub use menuribbon_widgets::{
        shared, Command, DataTemplate, EngineError, HeaderPart, HeaderSource, MenuEngine,
        MenuEntry, MenuItemRole, PopupItemState, PopupManager, RelayCommand, ResourceDictionary,
        SharedManager, Style, TemplateSelector, VisualContent,
    };
    pub use serde_json::{json, Value};
}
