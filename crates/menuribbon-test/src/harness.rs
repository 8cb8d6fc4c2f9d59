//! Test harness for MenuRibbon menus.
//!
//! A [`Harness`] owns an engine with one popup root, a recording coordinator
//! and a header part per item. Items are addressed by name; input is
//! simulated by emitting on the header part and draining the engine's input
//! queue, the same path the rendering layer uses.

use crate::recorder::{call_log, CallLog, RecordedCall, RecordingCommand, RecordingPopupManager};
use menuribbon_core::{ElementId, Key, MenuConfig, MouseButton};
use menuribbon_widgets::{
    DataTemplate, HeaderSource, MenuEngine, MenuEntry, MenuItemRole, PopupItemState,
    ResourceDictionary, SharedManager,
};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Test harness for interacting with a menu.
pub struct Harness {
    engine: MenuEngine,
    log: CallLog,
    manager: Rc<RefCell<RecordingPopupManager>>,
    root: ElementId,
    parts: HashMap<ElementId, HeaderSource>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create a harness with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_engine(MenuEngine::new())
    }

    /// Create a harness with `config`.
    #[must_use]
    pub fn with_config(config: MenuConfig) -> Self {
        Self::with_engine(MenuEngine::with_config(config))
    }

    /// Create a harness around an existing engine.
    #[must_use]
    pub fn with_engine(mut engine: MenuEngine) -> Self {
        let log = call_log();
        let manager = Rc::new(RefCell::new(RecordingPopupManager::new(Rc::clone(&log))));
        let shared: SharedManager = manager.clone();
        let root = engine.create_root(shared);
        Self {
            engine,
            log,
            manager,
            root,
            parts: HashMap::new(),
        }
    }

    /// Replace the engine's resources.
    #[must_use]
    pub fn resources(mut self, resources: ResourceDictionary) -> Self {
        *self.engine.resources_mut() = resources;
        self
    }

    // === Access ===

    /// The engine.
    #[must_use]
    pub const fn engine(&self) -> &MenuEngine {
        &self.engine
    }

    /// The engine, mutably.
    pub fn engine_mut(&mut self) -> &mut MenuEngine {
        &mut self.engine
    }

    /// Popup root id.
    #[must_use]
    pub const fn root(&self) -> ElementId {
        self.root
    }

    /// Shared call log.
    #[must_use]
    pub fn log(&self) -> CallLog {
        Rc::clone(&self.log)
    }

    /// Recorded calls so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log.borrow().clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&mut self) -> &mut Self {
        self.log.borrow_mut().clear();
        self
    }

    /// Preset the coordinator's responsive flag without recording a call.
    pub fn set_responsive(&mut self, responsive: bool) -> &mut Self {
        self.manager.borrow_mut().responsive = responsive;
        self
    }

    /// Coordinator's responsive flag.
    #[must_use]
    pub fn is_responsive(&self) -> bool {
        self.manager.borrow().responsive
    }

    /// Element id for `name`.
    ///
    /// # Panics
    ///
    /// Panics if no element has that name.
    #[must_use]
    pub fn id(&self, name: &str) -> ElementId {
        self.engine
            .find(name)
            .unwrap_or_else(|| panic!("no element named '{name}'"))
    }

    /// State snapshot for the item called `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a popup item.
    #[must_use]
    pub fn state(&self, name: &str) -> PopupItemState {
        let id = self.id(name);
        self.engine
            .item_state(id)
            .unwrap_or_else(|| panic!("'{name}' is not a popup item"))
    }

    // === Building ===

    /// Add a top-level item under the root.
    pub fn top_level(&mut self, name: &str) -> ElementId {
        let id = self.new_item(name);
        self.engine
            .attach(id, self.root)
            .unwrap_or_else(|e| panic!("attach '{name}': {e}"));
        id
    }

    /// Add a named item as the last entry of `parent`.
    pub fn item(&mut self, parent: &str, name: &str) -> ElementId {
        let id = self.new_item(name);
        self.add(parent, id);
        id
    }

    /// Add a data entry to `parent`. Returns its container.
    pub fn data(&mut self, parent: &str, value: impl Into<Value>) -> ElementId {
        self.add(parent, MenuEntry::data(value))
    }

    /// Add a separator to `parent`.
    pub fn separator(&mut self, parent: &str) -> ElementId {
        let id = self.engine.create_separator();
        self.add(parent, id)
    }

    /// Add a command entry to `parent`. Returns its container and the command.
    pub fn command(&mut self, parent: &str, name: &str) -> (ElementId, RecordingCommand) {
        let command = RecordingCommand::new(name, self.log());
        let container = self.add(parent, MenuEntry::command(name, command.clone()));
        (container, command)
    }

    /// Bind a recording command to the item called `name`.
    pub fn bind(&mut self, name: &str) -> RecordingCommand {
        let command = RecordingCommand::new(name, self.log());
        let id = self.id(name);
        self.engine
            .set_command(id, Some(Rc::new(command.clone())))
            .unwrap_or_else(|e| panic!("bind '{name}': {e}"));
        command
    }

    /// Set the item template of `name`.
    pub fn template(&mut self, name: &str, template: DataTemplate) -> &mut Self {
        let id = self.id(name);
        self.engine
            .set_item_template(id, Some(template))
            .unwrap_or_else(|e| panic!("template '{name}': {e}"));
        self
    }

    fn new_item(&mut self, name: &str) -> ElementId {
        let id = self.engine.create_named_item(name);
        let part = HeaderSource::new();
        self.engine.apply_template(id, Some(&part));
        self.parts.insert(id, part);
        id
    }

    fn add(&mut self, parent: &str, entry: impl Into<MenuEntry>) -> ElementId {
        let parent_id = self.id(parent);
        self.engine
            .add_entry(parent_id, entry)
            .unwrap_or_else(|e| panic!("add entry to '{parent}': {e}"))
    }

    fn part(&self, name: &str) -> &HeaderSource {
        let id = self.id(name);
        self.parts
            .get(&id)
            .unwrap_or_else(|| panic!("'{name}' has no header part"))
    }

    // === Input Simulation ===

    /// Pointer enters the header of `name`.
    pub fn hover(&mut self, name: &str) -> &mut Self {
        self.part(name).hovering.emit(&true);
        self.engine.process_input();
        self
    }

    /// Pointer leaves the header of `name`.
    pub fn unhover(&mut self, name: &str) -> &mut Self {
        self.part(name).hovering.emit(&false);
        self.engine.process_input();
        self
    }

    /// Left button down on `name`.
    pub fn mouse_down(&mut self, name: &str) -> &mut Self {
        self.mouse_down_with(name, MouseButton::Left)
    }

    /// Button down on `name`.
    pub fn mouse_down_with(&mut self, name: &str, button: MouseButton) -> &mut Self {
        self.part(name).mouse_down.emit(&button);
        self.engine.process_input();
        self
    }

    /// Full click on `name`: pressed, released, clicked.
    pub fn click(&mut self, name: &str) -> &mut Self {
        let part = self.part(name);
        part.pressed.emit(&true);
        part.pressed.emit(&false);
        part.clicks.emit(&());
        self.engine.process_input();
        self
    }

    /// Key press on `name`.
    pub fn press_key(&mut self, name: &str, key: Key) -> &mut Self {
        let id = self.id(name);
        self.engine.key_down(id, key);
        self
    }

    /// Move input focus to `name`.
    pub fn focus(&mut self, name: &str) -> &mut Self {
        let id = self.id(name);
        self.engine.focus(id);
        self
    }

    /// Coordinator highlights `name`.
    pub fn highlight(&mut self, name: &str) -> &mut Self {
        let id = self.id(name);
        self.engine.set_highlighted(id, true);
        self
    }

    /// Coordinator opens or closes `name`.
    pub fn open(&mut self, name: &str, open: bool) -> &mut Self {
        let id = self.id(name);
        self.engine.set_open(id, open);
        self
    }

    // === Assertions ===

    /// Assert the role of `name`.
    ///
    /// # Panics
    ///
    /// Panics if the role does not match.
    pub fn assert_role(&self, name: &str, expected: MenuItemRole) -> &Self {
        let actual = self.state(name).role;
        assert_eq!(
            actual, expected,
            "Expected '{name}' to be {expected:?} but it is {actual:?}"
        );
        self
    }

    /// Assert the open flag of `name`.
    ///
    /// # Panics
    ///
    /// Panics if the flag does not match.
    pub fn assert_open(&self, name: &str, expected: bool) -> &Self {
        let actual = self.state(name).is_open;
        assert_eq!(actual, expected, "Expected '{name}' is_open == {expected}");
        self
    }

    /// Assert the top-level item of `name`.
    ///
    /// # Panics
    ///
    /// Panics if the top item does not match.
    pub fn assert_top(&self, name: &str, top: &str) -> &Self {
        let actual = self.state(name).top;
        let expected = self.id(top);
        assert_eq!(actual, expected, "Expected top of '{name}' to be '{top}'");
        self
    }

    /// Assert the recorded calls, in order.
    ///
    /// # Panics
    ///
    /// Panics if the log differs.
    pub fn assert_calls(&self, expected: &[RecordedCall]) -> &Self {
        let actual = self.calls();
        assert_eq!(actual, expected, "Unexpected coordinator calls");
        self
    }

    /// Assert that nothing was recorded.
    ///
    /// # Panics
    ///
    /// Panics if the log is not empty.
    pub fn assert_no_calls(&self) -> &Self {
        self.assert_calls(&[])
    }
}
