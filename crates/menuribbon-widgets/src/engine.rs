//! The menu engine: element tree, per-item state and the rules tying them together.
//!
//! [`MenuEngine`] owns every piece of mutable menu state. Structural edits
//! (attach, detach, entries) re-run the hierarchy locator for the affected
//! subtree and re-derive roles. Interaction (hover, click, focus, keys) is
//! applied through the popup item transition rules, which talk to the popup
//! root's coordinator.
//!
//! Template input never calls into the engine directly. Header part handlers
//! push onto an input queue that the host drains with
//! [`MenuEngine::process_input`].

use crate::command::Command;
use crate::container::GeneratedContainer;
use crate::error::EngineError;
use crate::manager::{PopupRootRef, SharedManager};
use crate::materializer::{Materializer, MenuEntry};
use crate::popup_item::{PopupItem, PopupItemState, PropertyChanged};
use crate::separator::Separator;
use crate::style::{ResourceDictionary, Style};
use crate::template::{ContainerContent, DataTemplate, HeaderPart, TemplateSelector};
use menuribbon_core::hierarchy::{self, Location};
use menuribbon_core::{
    next_enabled_item, ElementId, ElementKind, ElementTree, EventSource, ItemInput, ItemsHost, Key,
    MenuConfig, MouseButton, Subscription, TreeError,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// Subscription keys for header part streams.
const HOVER_KEY: &str = "hover";
const LEFT_DOWN_KEY: &str = "left-down";
const CLICK_KEY: &str = "click";
const PRESSED_KEY: &str = "pressed";

/// Inputs queued by header part handlers.
#[derive(Clone, Default)]
struct InputQueue(Rc<RefCell<VecDeque<(ElementId, ItemInput)>>>);

impl InputQueue {
    fn push(&self, item: ElementId, input: ItemInput) {
        self.0.borrow_mut().push_back((item, input));
    }

    fn pop(&self) -> Option<(ElementId, ItemInput)> {
        self.0.borrow_mut().pop_front()
    }

    fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Sibling containers of one item, for keyboard navigation.
struct Siblings<'a> {
    tree: &'a ElementTree,
    containers: Vec<ElementId>,
}

impl ItemsHost for Siblings<'_> {
    type Item = ElementId;

    fn items(&self) -> &[ElementId] {
        &self.containers
    }

    fn index_from_container(&self, item_or_container: &ElementId) -> Option<usize> {
        self.containers.iter().position(|c| c == item_or_container)
    }

    fn is_enabled_container(&self, item: &ElementId) -> bool {
        self.tree.is_enabled(*item)
    }
}

/// Popup menu engine.
pub struct MenuEngine {
    tree: ElementTree,
    config: MenuConfig,
    resources: ResourceDictionary,
    managers: HashMap<ElementId, SharedManager>,
    items: HashMap<ElementId, PopupItem>,
    containers: HashMap<ElementId, GeneratedContainer>,
    separators: HashMap<ElementId, Separator>,
    focused: Option<ElementId>,
    input: InputQueue,
    changes: EventSource<PropertyChanged>,
}

impl Default for MenuEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuEngine {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MenuConfig::default())
    }

    /// Create an engine with `config`.
    #[must_use]
    pub fn with_config(config: MenuConfig) -> Self {
        Self {
            tree: ElementTree::new(),
            config,
            resources: ResourceDictionary::new(),
            managers: HashMap::new(),
            items: HashMap::new(),
            containers: HashMap::new(),
            separators: HashMap::new(),
            focused: None,
            input: InputQueue::default(),
            changes: EventSource::new(),
        }
    }

    /// Set the resources used for default styles.
    #[must_use]
    pub fn with_resources(mut self, resources: ResourceDictionary) -> Self {
        self.resources = resources;
        self
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Resources.
    #[must_use]
    pub const fn resources(&self) -> &ResourceDictionary {
        &self.resources
    }

    /// Mutable resources. Changes apply to containers prepared afterwards.
    pub fn resources_mut(&mut self) -> &mut ResourceDictionary {
        &mut self.resources
    }

    /// Element tree (read-only).
    #[must_use]
    pub const fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Subscribe to property change notifications.
    pub fn subscribe(&self, handler: impl Fn(&PropertyChanged) + 'static) -> Subscription {
        self.changes.subscribe(handler)
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Create a popup root owning `manager`.
    pub fn create_root(&mut self, manager: SharedManager) -> ElementId {
        let id = self.tree.create(ElementKind::PopupRoot);
        self.managers.insert(id, manager);
        tracing::debug!(root = %id, "popup root created");
        id
    }

    /// Create a detached popup item.
    pub fn create_item(&mut self) -> ElementId {
        let id = self.tree.create(ElementKind::PopupItem);
        self.register_item(id)
    }

    /// Create a detached, named popup item.
    pub fn create_named_item(&mut self, name: impl Into<String>) -> ElementId {
        let id = self.tree.create_named(ElementKind::PopupItem, name);
        self.register_item(id)
    }

    /// Create a separator.
    pub fn create_separator(&mut self) -> ElementId {
        let id = self.tree.create(ElementKind::Separator);
        self.separators.insert(id, Separator::new(id));
        id
    }

    /// Create an empty generated container that can be reused as an entry.
    pub fn create_container(&mut self) -> ElementId {
        let id = self.tree.create(ElementKind::GeneratedContainer);
        self.containers.insert(id, GeneratedContainer::new(id));
        id
    }

    /// Create a plain visual element (panel, decorator, content).
    pub fn create_visual(&mut self) -> ElementId {
        self.tree.create(ElementKind::Visual)
    }

    /// Look up an element by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.tree.find_by_name(name)
    }

    fn register_item(&mut self, id: ElementId) -> ElementId {
        self.items.insert(id, PopupItem::new(id));
        self.relocate(id);
        id
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Attach `child` under `parent` in the rendering tree.
    pub fn attach(&mut self, child: ElementId, parent: ElementId) -> Result<(), EngineError> {
        self.tree.set_visual_parent(child, Some(parent))?;
        self.refresh_subtree(child);
        Ok(())
    }

    /// Detach `child` from its rendering parent.
    pub fn detach(&mut self, child: ElementId) -> Result<(), EngineError> {
        self.tree.set_visual_parent(child, None)?;
        self.refresh_subtree(child);
        Ok(())
    }

    /// Set or clear the logical parent of `child`.
    pub fn set_logical_parent(
        &mut self,
        child: ElementId,
        parent: Option<ElementId>,
    ) -> Result<(), EngineError> {
        self.tree.set_logical_parent(child, parent)?;
        self.refresh_subtree(child);
        Ok(())
    }

    /// Enable or disable an element.
    pub fn set_enabled(&mut self, id: ElementId, enabled: bool) -> Result<(), EngineError> {
        self.tree.set_enabled(id, enabled)?;
        if !enabled && self.focused == Some(id) {
            self.focused = None;
        }
        Ok(())
    }

    /// Remove an element and release everything it owns.
    ///
    /// The element leaves its owner's entries, a popup item's own entries are
    /// cleared, and its template subscriptions are disposed. Children stay
    /// alive but are detached.
    pub fn remove(&mut self, id: ElementId) -> Result<(), EngineError> {
        let kind = self.tree.kind(id).ok_or(TreeError::UnknownElement(id))?;

        if let Some(owner) = self.owner_of(id) {
            let index = self.items.get(&owner).and_then(|o| o.containers.iter().position(|c| *c == id));
            if let Some(index) = index {
                self.remove_entry(owner, index)?;
            }
            if !self.tree.exists(id) {
                return Ok(());
            }
        }
        if kind.is_popup_item() {
            self.clear_entries(id)?;
        }

        let mut orphans: Vec<ElementId> = self.tree.visual_children(id).to_vec();
        orphans.extend(self.tree.logical_children(id));

        if let Some(mut item) = self.items.remove(&id) {
            item.events.clear();
        }
        if let Some(mut container) = self.containers.remove(&id) {
            container.clear();
        }
        self.separators.remove(&id);
        self.managers.remove(&id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.tree.remove(id)?;
        tracing::debug!(element = %id, ?kind, "element removed");

        let mut seen = HashSet::new();
        for orphan in orphans {
            if seen.insert(orphan) {
                self.refresh_subtree(orphan);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Append an entry to `item`. Returns its container.
    pub fn add_entry(
        &mut self,
        item: ElementId,
        entry: impl Into<MenuEntry>,
    ) -> Result<ElementId, EngineError> {
        let len = self.item_ref(item)?.entries.len();
        self.insert_entry(item, len, entry)
    }

    /// Insert an entry into `item` at `index`. Returns its container.
    pub fn insert_entry(
        &mut self,
        item: ElementId,
        index: usize,
        entry: impl Into<MenuEntry>,
    ) -> Result<ElementId, EngineError> {
        let entry = entry.into();
        let len = self.item_ref(item)?.entries.len();
        if index > len {
            return Err(EngineError::IndexOutOfRange { item, index, len });
        }
        if let Some(element) = entry.element() {
            if let Some(owner) = self.owner_of(element) {
                return Err(EngineError::AlreadyOwned { element, owner });
            }
        }

        let container = self.realize(item, &entry)?;
        if let Some(owner) = self.items.get_mut(&item) {
            owner.entries.insert(index, entry);
            owner.containers.insert(index, container);
        }
        tracing::trace!(item = %item, index, container = %container, "entry inserted");
        self.refresh_subtree(container);
        self.update_role(item);
        Ok(container)
    }

    /// Remove the entry at `index` from `item`.
    pub fn remove_entry(&mut self, item: ElementId, index: usize) -> Result<MenuEntry, EngineError> {
        let owner = self
            .items
            .get_mut(&item)
            .ok_or(EngineError::NotAnItem(item))?;
        let len = owner.entries.len();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { item, index, len });
        }
        let entry = owner.entries.remove(index);
        let container = owner.containers.remove(index);

        let released = self.release(item, container, &entry);
        self.update_role(item);
        released.map(|()| entry)
    }

    /// Remove every entry from `item`.
    pub fn clear_entries(&mut self, item: ElementId) -> Result<(), EngineError> {
        let owner = self
            .items
            .get_mut(&item)
            .ok_or(EngineError::NotAnItem(item))?;
        let entries = std::mem::take(&mut owner.entries);
        let containers = std::mem::take(&mut owner.containers);

        let mut failure = None;
        for (entry, container) in entries.iter().zip(containers) {
            if let Err(e) = self.release(item, container, entry) {
                tracing::warn!(item = %item, container = %container, error = %e, "failed to release container");
                failure.get_or_insert(e);
            }
        }
        self.update_role(item);
        failure.map_or(Ok(()), Err)
    }

    /// Replace the entries of `item`.
    pub fn set_entries(
        &mut self,
        item: ElementId,
        entries: impl IntoIterator<Item = MenuEntry>,
    ) -> Result<(), EngineError> {
        self.clear_entries(item)?;
        for entry in entries {
            self.add_entry(item, entry)?;
        }
        Ok(())
    }

    /// Entries of `item` (empty for non-items).
    #[must_use]
    pub fn entries(&self, item: ElementId) -> &[MenuEntry] {
        self.items.get(&item).map(PopupItem::entries).unwrap_or_default()
    }

    /// Containers of `item`, index-aligned with its entries.
    #[must_use]
    pub fn containers(&self, item: ElementId) -> &[ElementId] {
        self.items.get(&item).map(PopupItem::containers).unwrap_or_default()
    }

    /// Set the template used for data entries of `item`.
    pub fn set_item_template(
        &mut self,
        item: ElementId,
        template: Option<DataTemplate>,
    ) -> Result<(), EngineError> {
        self.item_mut(item)?.item_template = template;
        self.report_template_conflict(item);
        self.reprepare(item);
        Ok(())
    }

    /// Set the template selector used for data entries of `item`.
    pub fn set_item_template_selector(
        &mut self,
        item: ElementId,
        selector: Option<Rc<dyn TemplateSelector>>,
    ) -> Result<(), EngineError> {
        self.item_mut(item)?.item_template_selector = selector;
        self.report_template_conflict(item);
        self.reprepare(item);
        Ok(())
    }

    /// Bind a command to `item`'s primary action.
    pub fn set_command(
        &mut self,
        item: ElementId,
        command: Option<Rc<dyn Command>>,
    ) -> Result<(), EngineError> {
        self.item_mut(item)?.command = command;
        Ok(())
    }

    /// Assign an explicit separator style (or clear it).
    pub fn set_separator_style(
        &mut self,
        separator: ElementId,
        style: Option<Style>,
    ) -> Result<(), EngineError> {
        self.separators
            .get_mut(&separator)
            .ok_or(TreeError::UnknownElement(separator))?
            .set_style(style);
        Ok(())
    }

    fn realize(&mut self, owner: ElementId, entry: &MenuEntry) -> Result<ElementId, EngineError> {
        let item = self.item_ref(owner)?;
        let template = item.item_template.clone();
        let selector = item.item_template_selector.clone();
        self.materializer()
            .realize(owner, entry, template.as_ref(), selector.as_deref())
    }

    fn release(
        &mut self,
        owner: ElementId,
        container: ElementId,
        entry: &MenuEntry,
    ) -> Result<(), EngineError> {
        let hosted = self.containers.get(&container).and_then(|c| match c.content() {
            ContainerContent::Element(element) => Some(*element),
            _ => None,
        });
        self.materializer().clear(owner, container, entry)?;
        for id in std::iter::once(container).chain(hosted) {
            if self.tree.exists(id) {
                self.refresh_subtree(id);
            }
        }
        Ok(())
    }

    fn reprepare(&mut self, item: ElementId) {
        let Some(owner) = self.items.get(&item) else {
            return;
        };
        let template = owner.item_template.clone();
        let selector = owner.item_template_selector.clone();
        let bound: Vec<(ElementId, MenuEntry)> = owner
            .containers
            .iter()
            .copied()
            .zip(owner.entries.iter().cloned())
            .filter(|(container, entry)| entry.element() != Some(*container))
            .collect();

        let mut materializer = self.materializer();
        for (container, entry) in &bound {
            materializer.prepare(*container, entry, template.as_ref(), selector.as_deref());
        }
    }

    fn report_template_conflict(&self, item: ElementId) {
        if let Some(owner) = self.items.get(&item) {
            if owner.item_template.is_some() && owner.item_template_selector.is_some() {
                tracing::debug!(
                    item = %item,
                    "both item template and template selector set; the selector is consulted first"
                );
            }
        }
    }

    fn materializer(&mut self) -> Materializer<'_> {
        Materializer {
            tree: &mut self.tree,
            containers: &mut self.containers,
            separators: &mut self.separators,
            resources: &self.resources,
            separator_style_key: &self.config.separator_style_key,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Snapshot of a popup item.
    #[must_use]
    pub fn item_state(&self, item: ElementId) -> Option<PopupItemState> {
        self.items.get(&item).map(PopupItem::state)
    }

    /// Popup item state.
    #[must_use]
    pub fn item(&self, item: ElementId) -> Option<&PopupItem> {
        self.items.get(&item)
    }

    /// Generated container state.
    #[must_use]
    pub fn container(&self, container: ElementId) -> Option<&GeneratedContainer> {
        self.containers.get(&container)
    }

    /// Separator state.
    #[must_use]
    pub fn separator(&self, separator: ElementId) -> Option<&Separator> {
        self.separators.get(&separator)
    }

    /// Element holding input focus.
    #[must_use]
    pub const fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Number of queued template inputs.
    #[must_use]
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Check if `target` lies within `id`'s rendering or logical subtree.
    #[must_use]
    pub fn contains(&self, id: ElementId, target: ElementId) -> bool {
        hierarchy::contains(&self.tree, id, target)
    }

    /// Nearest popup item above `id`.
    ///
    /// Generated containers look through the logical tree; everything else
    /// through the rendering tree.
    #[must_use]
    pub fn parent_item(&self, id: ElementId) -> Option<ElementId> {
        if self.tree.kind(id) == Some(ElementKind::GeneratedContainer) {
            return hierarchy::logical_hierarchy(&self.tree, id)
                .skip(1)
                .find(|a| self.items.contains_key(a));
        }
        hierarchy::parent_item(&self.tree, id)
    }

    /// Popup root `id` belongs to.
    #[must_use]
    pub fn popup_root(&self, id: ElementId) -> Option<ElementId> {
        match self.items.get(&id) {
            Some(item) => item.root().map(PopupRootRef::id),
            None => hierarchy::logical_root(&self.tree, id),
        }
    }

    /// Locate `id` in the hierarchy right now.
    #[must_use]
    pub fn locate(&self, id: ElementId) -> Location {
        hierarchy::locate(&self.tree, id)
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Request the open state. Leaf items stay closed.
    pub fn set_open(&mut self, id: ElementId, open: bool) {
        self.mutate_item(id, |item| item.set_open(open));
    }

    /// Set the pressed state.
    pub fn set_pressed(&mut self, id: ElementId, pressed: bool) {
        self.mutate_item(id, |item| item.set_pressed(pressed));
    }

    /// Set the hovering state and report it to the coordinator.
    pub fn set_hovering(&mut self, id: ElementId, hovering: bool) {
        if self.items.contains_key(&id) {
            self.mutate_item(id, |item| item.set_hovering(hovering));
        } else if self.containers.contains_key(&id) {
            let Some(root) = self.logical_root_ref(id) else {
                return;
            };
            root.with(|m| {
                if hovering {
                    m.enter(id, false);
                } else {
                    m.exit(id);
                }
            });
        }
    }

    /// Set the highlight. Gaining it moves input focus to the item.
    pub fn set_highlighted(&mut self, id: ElementId, highlighted: bool) {
        if let Some(changed) = self.mutate_item(id, |item| item.set_highlighted(highlighted)) {
            if changed && highlighted {
                self.focus(id);
            }
        } else if let Some(container) = self.containers.get_mut(&id) {
            container.set_highlighted(highlighted);
        }
    }

    /// Move input focus to `id`. Returns `false` if focus did not move.
    ///
    /// Arms coordinator tracking, then asks the coordinator to highlight the
    /// item unless it already is.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if self.focused == Some(id) {
            return false;
        }
        let focusable = self.tree.kind(id).is_some_and(ElementKind::is_focusable);
        if !focusable || !self.tree.is_enabled(id) {
            return false;
        }
        self.focused = Some(id);
        tracing::trace!(item = %id, "focus moved");
        if let Some(item) = self.items.get(&id) {
            item.on_preview_got_focus();
            item.on_got_focus();
        }
        true
    }

    /// Drop input focus, returning the element that had it.
    pub fn blur(&mut self) -> Option<ElementId> {
        self.focused.take()
    }

    /// Invoke the primary action of an item or generated container.
    ///
    /// Returns whether a bound command executed.
    pub fn action(&mut self, id: ElementId) -> bool {
        let executed = match self.items.get(&id) {
            Some(item) => item.on_click(),
            None => self
                .containers
                .get(&id)
                .is_some_and(GeneratedContainer::invoke),
        };
        tracing::debug!(element = %id, executed, "action");
        executed
    }

    /// Pointer button pressed over an item's header.
    pub fn pointer_down(&mut self, id: ElementId, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        if let Some(item) = self.items.get(&id) {
            item.on_left_mouse_down();
        }
    }

    /// Keyboard input on an item. Returns whether the key was handled.
    ///
    /// Up/Down move the highlight inside a submenu and Left/Right between
    /// top-level items; Enter/Space invoke a leaf or open a header.
    pub fn key_down(&mut self, id: ElementId, key: Key) -> bool {
        let Some(item) = self.items.get(&id) else {
            return false;
        };
        let Some(root) = item.root().cloned() else {
            return false;
        };
        let role = item.role();
        let cycle_submenu = self.config.navigation.cycle_submenu;
        let cycle_top_level = self.config.navigation.cycle_top_level;

        match key {
            Key::Up | Key::Down if !role.is_top_level() => {
                self.move_highlight(&root, id, key == Key::Down, cycle_submenu)
            }
            Key::Left | Key::Right if role.is_top_level() => {
                self.move_highlight(&root, id, key == Key::Right, cycle_top_level)
            }
            key if key.is_activation() => {
                if role.is_leaf() {
                    self.action(id);
                } else {
                    root.with(|m| m.set_opened_item(Some(id)));
                }
                true
            }
            _ => false,
        }
    }

    fn move_highlight(&self, root: &PopupRootRef, id: ElementId, forward: bool, cycle: bool) -> bool {
        let siblings = Siblings {
            tree: &self.tree,
            containers: self.siblings_of(id),
        };
        let not_separator = |e: &ElementId| self.tree.kind(*e) != Some(ElementKind::Separator);
        let next = next_enabled_item(&siblings, Some(&id), forward, cycle, Some(&not_separator)).copied();

        match next {
            Some(next) if next != id => {
                root.with(|m| m.set_highlighted_item(Some(next)));
                true
            }
            _ => false,
        }
    }

    fn siblings_of(&self, id: ElementId) -> Vec<ElementId> {
        if let Some(owner) = self.owner_of(id).and_then(|o| self.items.get(&o)) {
            return owner.containers.clone();
        }
        self.tree
            .visual_parent(id)
            .map(|parent| {
                self.tree
                    .visual_children(parent)
                    .iter()
                    .copied()
                    .filter(|c| self.tree.kind(*c).is_some_and(ElementKind::is_own_container))
                    .collect()
            })
            .unwrap_or_default()
    }

    // =========================================================================
    // Templates and input
    // =========================================================================

    /// (Re)associate `id` with its header template part.
    ///
    /// Previous subscriptions are disposed first. Each stream present on `part`
    /// is subscribed; its events are queued for [`Self::process_input`].
    pub fn apply_template(&mut self, id: ElementId, part: Option<&dyn HeaderPart>) {
        let queue = self.input.clone();
        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        item.events.clear();
        let Some(part) = part else {
            return;
        };

        if let Some(source) = part.hovering() {
            let queue = queue.clone();
            let sub = source.subscribe(move |hovering| queue.push(id, ItemInput::Hovering(*hovering)));
            item.events.insert(HOVER_KEY, sub);
        }
        if let Some(source) = part.mouse_down() {
            let queue = queue.clone();
            let sub = source.subscribe(move |button| {
                if *button == MouseButton::Left {
                    queue.push(id, ItemInput::MouseDown(*button));
                }
            });
            item.events.insert(LEFT_DOWN_KEY, sub);
        }
        if let Some(source) = part.clicks() {
            let queue = queue.clone();
            let sub = source.subscribe(move |_| queue.push(id, ItemInput::Click));
            item.events.insert(CLICK_KEY, sub);
        }
        if let Some(source) = part.pressed() {
            let sub = source.subscribe(move |pressed| queue.push(id, ItemInput::Pressed(*pressed)));
            item.events.insert(PRESSED_KEY, sub);
        }
        tracing::debug!(item = %id, streams = item.events.len(), "template applied");
    }

    /// Apply every queued template input in arrival order. Returns how many ran.
    pub fn process_input(&mut self) -> usize {
        let mut handled = 0;
        while let Some((id, input)) = self.input.pop() {
            self.handle_input(id, input);
            handled += 1;
        }
        handled
    }

    /// Apply one input to `id`.
    pub fn handle_input(&mut self, id: ElementId, input: ItemInput) {
        match input {
            ItemInput::Hovering(hovering) => self.set_hovering(id, hovering),
            ItemInput::MouseDown(button) => self.pointer_down(id, button),
            ItemInput::Click => {
                self.action(id);
            }
            ItemInput::Pressed(pressed) => self.set_pressed(id, pressed),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn item_ref(&self, item: ElementId) -> Result<&PopupItem, EngineError> {
        self.items.get(&item).ok_or(EngineError::NotAnItem(item))
    }

    fn item_mut(&mut self, item: ElementId) -> Result<&mut PopupItem, EngineError> {
        self.items.get_mut(&item).ok_or(EngineError::NotAnItem(item))
    }

    /// Item whose entries list `id`.
    fn owner_of(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.tree.logical_parent(id)?;
        self.items
            .get(&parent)
            .filter(|owner| owner.containers.contains(&id))
            .map(|_| parent)
    }

    fn root_ref(&self, root: Option<ElementId>) -> Option<PopupRootRef> {
        let root = root?;
        self.managers
            .get(&root)
            .map(|manager| PopupRootRef::new(root, manager))
    }

    fn logical_root_ref(&self, id: ElementId) -> Option<PopupRootRef> {
        self.root_ref(hierarchy::logical_root(&self.tree, id))
    }

    /// Run `f` on an item and publish whatever it changed.
    fn mutate_item<R>(&mut self, id: ElementId, f: impl FnOnce(&mut PopupItem) -> R) -> Option<R> {
        let item = self.items.get_mut(&id)?;
        let before = item.state();
        let result = f(item);
        let after = item.state();
        for property in before.diff(&after) {
            self.changes.emit(&PropertyChanged { item: id, property });
        }
        Some(result)
    }

    fn relocate(&mut self, id: ElementId) {
        let location = hierarchy::locate(&self.tree, id);
        let root = self.root_ref(location.root);
        self.mutate_item(id, |item| item.set_location(location, root));
    }

    fn update_role(&mut self, id: ElementId) {
        self.mutate_item(id, PopupItem::update_role);
    }

    /// Re-locate every popup item in the rendering and logical subtree of `start`.
    fn refresh_subtree(&mut self, start: ElementId) {
        let mut stack = vec![start];
        let mut seen = HashSet::new();
        let mut affected = Vec::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if self.items.contains_key(&id) {
                affected.push(id);
            }
            stack.extend(self.tree.visual_children(id));
            stack.extend(self.tree.logical_children(id));
        }
        for id in affected {
            self.relocate(id);
        }
    }
}

impl std::fmt::Debug for MenuEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuEngine")
            .field("elements", &self.tree.len())
            .field("items", &self.items.len())
            .field("containers", &self.containers.len())
            .field("focused", &self.focused)
            .field("pending_input", &self.input.len())
            .finish_non_exhaustive()
    }
}
