//! Popup item state and its transition rules.
//!
//! A [`PopupItem`] holds the four interaction flags (open, pressed, hovering,
//! highlighted) plus the derived position fields (role, top, root). Only the
//! engine mutates it; everyone else reads a [`PopupItemState`] snapshot.

use crate::command::{self, Command};
use crate::manager::PopupRootRef;
use crate::materializer::MenuEntry;
use crate::role::MenuItemRole;
use crate::template::{DataTemplate, TemplateSelector};
use menuribbon_core::{DisposableBag, ElementId, Location};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Read-only snapshot of a popup item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupItemState {
    /// Derived role
    pub role: MenuItemRole,
    /// `top == self`
    pub is_top_level: bool,
    /// Nearest enclosing popup root
    pub root: Option<ElementId>,
    /// Outermost popup item ancestor (or self)
    pub top: ElementId,
    /// Submenu open (always `false` for leaf roles)
    pub is_open: bool,
    /// Header pressed
    pub is_pressed: bool,
    /// Pointer over the header
    pub is_hovering: bool,
    /// Highlighted by the coordinator
    pub is_highlighted: bool,
    /// Has at least one child entry
    pub has_items: bool,
}

/// Observable item property, carrying its new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemProperty {
    /// Role changed
    Role(MenuItemRole),
    /// Top-level flag changed
    IsTopLevel(bool),
    /// Root changed
    Root(Option<ElementId>),
    /// Top changed
    Top(ElementId),
    /// Open flag changed
    IsOpen(bool),
    /// Pressed flag changed
    IsPressed(bool),
    /// Hovering flag changed
    IsHovering(bool),
    /// Highlight flag changed
    IsHighlighted(bool),
}

/// Notification published for every genuine property change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyChanged {
    /// Item whose property changed
    pub item: ElementId,
    /// Property and new value
    pub property: ItemProperty,
}

impl PopupItemState {
    /// Properties that differ between `self` and `next`, with `next`'s values.
    #[must_use]
    pub fn diff(&self, next: &Self) -> Vec<ItemProperty> {
        let mut changes = Vec::new();
        if self.role != next.role {
            changes.push(ItemProperty::Role(next.role));
        }
        if self.is_top_level != next.is_top_level {
            changes.push(ItemProperty::IsTopLevel(next.is_top_level));
        }
        if self.root != next.root {
            changes.push(ItemProperty::Root(next.root));
        }
        if self.top != next.top {
            changes.push(ItemProperty::Top(next.top));
        }
        if self.is_open != next.is_open {
            changes.push(ItemProperty::IsOpen(next.is_open));
        }
        if self.is_pressed != next.is_pressed {
            changes.push(ItemProperty::IsPressed(next.is_pressed));
        }
        if self.is_hovering != next.is_hovering {
            changes.push(ItemProperty::IsHovering(next.is_hovering));
        }
        if self.is_highlighted != next.is_highlighted {
            changes.push(ItemProperty::IsHighlighted(next.is_highlighted));
        }
        changes
    }
}

/// Interaction state of one popup item.
pub struct PopupItem {
    id: ElementId,
    role: MenuItemRole,
    top: ElementId,
    is_top_level: bool,
    root: Option<PopupRootRef>,
    is_open: bool,
    is_pressed: bool,
    is_hovering: bool,
    is_highlighted: bool,
    pub(crate) entries: Vec<MenuEntry>,
    pub(crate) containers: Vec<ElementId>,
    pub(crate) item_template: Option<DataTemplate>,
    pub(crate) item_template_selector: Option<Rc<dyn TemplateSelector>>,
    pub(crate) command: Option<Rc<dyn Command>>,
    pub(crate) events: DisposableBag,
}

impl PopupItem {
    /// Create a detached item: top-level, no root, default role.
    #[must_use]
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            role: MenuItemRole::default(),
            top: id,
            is_top_level: true,
            root: None,
            is_open: false,
            is_pressed: false,
            is_hovering: false,
            is_highlighted: false,
            entries: Vec::new(),
            containers: Vec::new(),
            item_template: None,
            item_template_selector: None,
            command: None,
            events: DisposableBag::new(),
        }
    }

    /// Element id.
    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.id
    }

    /// Current role.
    #[must_use]
    pub const fn role(&self) -> MenuItemRole {
        self.role
    }

    /// Root reference, if attached under a popup root.
    #[must_use]
    pub const fn root(&self) -> Option<&PopupRootRef> {
        self.root.as_ref()
    }

    /// Child entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Containers realized for the entries, index-aligned.
    #[must_use]
    pub fn containers(&self) -> &[ElementId] {
        &self.containers
    }

    /// Snapshot of the observable state.
    #[must_use]
    pub fn state(&self) -> PopupItemState {
        PopupItemState {
            role: self.role,
            is_top_level: self.is_top_level,
            root: self.root.as_ref().map(PopupRootRef::id),
            top: self.top,
            is_open: self.is_open,
            is_pressed: self.is_pressed,
            is_hovering: self.is_hovering,
            is_highlighted: self.is_highlighted,
            has_items: !self.entries.is_empty(),
        }
    }

    // === Derived fields ===

    pub(crate) fn set_location(&mut self, location: Location, root: Option<PopupRootRef>) {
        self.top = location.top;
        self.is_top_level = location.is_top_level;
        self.root = root;
        self.update_role();
    }

    /// Re-derive the role. A leaf role closes the item.
    pub(crate) fn update_role(&mut self) {
        let role = MenuItemRole::classify(self.is_top_level, !self.entries.is_empty());
        if role != self.role {
            tracing::debug!(item = %self.id, from = ?self.role, to = ?role, "role changed");
            self.role = role;
        }
        if role.is_leaf() {
            self.is_open = false;
        }
    }

    // === Interaction flags ===

    pub(crate) fn set_open(&mut self, open: bool) {
        self.is_open = open && self.role.is_header();
    }

    pub(crate) fn set_pressed(&mut self, pressed: bool) {
        self.is_pressed = pressed;
    }

    pub(crate) fn set_hovering(&mut self, hovering: bool) {
        self.is_hovering = hovering;
        let id = self.id;
        if let Some(root) = &self.root {
            root.with(|m| {
                if hovering {
                    m.enter(id, false);
                } else {
                    m.exit(id);
                }
            });
        }
    }

    /// Returns `true` when the flag actually changed.
    pub(crate) fn set_highlighted(&mut self, highlighted: bool) -> bool {
        let changed = self.is_highlighted != highlighted;
        self.is_highlighted = highlighted;
        changed
    }

    /// Preview phase of focus: arm highlight tracking.
    pub(crate) fn on_preview_got_focus(&self) {
        if let Some(root) = &self.root {
            root.with(|m| m.set_tracking(true));
        }
    }

    /// Focus gained: pull the coordinator's highlight onto this item.
    pub(crate) fn on_got_focus(&self) {
        if self.is_highlighted {
            return;
        }
        let id = self.id;
        if let Some(root) = &self.root {
            root.with(|m| m.set_highlighted_item(Some(id)));
        }
    }

    /// Primary action. Leaf items quiesce the coordinator before the command runs.
    ///
    /// Returns whether a bound command executed.
    pub(crate) fn on_click(&self) -> bool {
        if self.role.is_leaf() {
            if let Some(root) = &self.root {
                root.with(|m| m.set_responsive(false));
            }
        }
        self.command.as_deref().is_some_and(command::invoke)
    }

    pub(crate) fn on_left_mouse_down(&self) {
        let Some(root) = &self.root else {
            return;
        };
        let id = self.id;
        match self.role {
            MenuItemRole::TopLevelHeader => {
                if root.is_responsive() {
                    root.with(|m| m.set_responsive(false));
                } else {
                    root.with(|m| m.enter(id, true));
                }
            }
            MenuItemRole::TopLevelItem | MenuItemRole::SubmenuItem => {}
            MenuItemRole::SubmenuHeader => {
                root.with(|m| m.set_opened_item(Some(id)));
            }
        }
    }
}

impl fmt::Debug for PopupItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupItem")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("containers", &self.containers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{call_log, Call, CallLog};
    use std::cell::RefCell;

    const ROOT: ElementId = ElementId::new(1);
    const ITEM: ElementId = ElementId::new(2);

    fn rooted(is_top_level: bool, children: usize) -> (PopupItem, Rc<RefCell<CallLog>>) {
        let (log, manager) = call_log();
        let mut item = PopupItem::new(ITEM);
        item.entries = (0..children)
            .map(|i| MenuEntry::Data(serde_json::Value::from(i)))
            .collect();
        let location = Location {
            root: Some(ROOT),
            top: if is_top_level { ITEM } else { ElementId::new(9) },
            is_top_level,
        };
        item.set_location(location, Some(PopupRootRef::new(ROOT, &manager)));
        (item, log)
    }

    // =========================================================================
    // Role Tests
    // =========================================================================

    #[test]
    fn test_new_item_defaults() {
        let item = PopupItem::new(ITEM);
        let state = item.state();
        assert_eq!(state.role, MenuItemRole::SubmenuItem);
        assert!(state.is_top_level);
        assert_eq!(state.top, ITEM);
        assert_eq!(state.root, None);
    }

    #[test]
    fn test_role_follows_location_and_children() {
        assert_eq!(rooted(true, 1).0.role(), MenuItemRole::TopLevelHeader);
        assert_eq!(rooted(true, 0).0.role(), MenuItemRole::TopLevelItem);
        assert_eq!(rooted(false, 2).0.role(), MenuItemRole::SubmenuHeader);
        assert_eq!(rooted(false, 0).0.role(), MenuItemRole::SubmenuItem);
    }

    #[test]
    fn test_becoming_leaf_closes() {
        let (mut item, _) = rooted(false, 1);
        item.set_open(true);
        assert!(item.state().is_open);

        item.entries.clear();
        item.update_role();
        assert!(!item.state().is_open);
    }

    // =========================================================================
    // Open Coercion Tests
    // =========================================================================

    #[test]
    fn test_leaf_open_coerced() {
        let (mut item, _) = rooted(true, 0);
        item.set_open(true);
        assert!(!item.state().is_open);
    }

    #[test]
    fn test_header_open_accepted() {
        let (mut item, _) = rooted(true, 3);
        item.set_open(true);
        assert!(item.state().is_open);
        item.set_open(false);
        assert!(!item.state().is_open);
    }

    // =========================================================================
    // Coordinator Tests
    // =========================================================================

    #[test]
    fn test_hover_enter_and_exit() {
        let (mut item, log) = rooted(false, 0);
        item.set_hovering(true);
        item.set_hovering(false);
        assert_eq!(
            log.borrow().calls,
            vec![Call::Enter(ITEM, false), Call::Exit(ITEM)]
        );
    }

    #[test]
    fn test_rootless_item_is_silent() {
        let mut item = PopupItem::new(ITEM);
        item.set_hovering(true);
        item.on_left_mouse_down();
        item.on_preview_got_focus();
        item.on_got_focus();
        assert!(!item.on_click());
        assert!(item.state().is_hovering);
    }

    #[test]
    fn test_submenu_header_mouse_down_opens() {
        let (item, log) = rooted(false, 1);
        item.on_left_mouse_down();
        assert_eq!(log.borrow().calls, vec![Call::Opened(Some(ITEM))]);
        assert!(!log.borrow().responsive);
    }

    #[test]
    fn test_top_level_header_mouse_down() {
        let (item, log) = rooted(true, 1);
        log.borrow_mut().responsive = true;
        item.on_left_mouse_down();
        assert_eq!(log.borrow().calls, vec![Call::Responsive(false)]);

        log.borrow_mut().calls.clear();
        item.on_left_mouse_down();
        assert_eq!(log.borrow().calls, vec![Call::Enter(ITEM, true)]);
        assert!(!log.borrow().responsive);
    }

    #[test]
    fn test_leaf_mouse_down_is_noop() {
        for top in [true, false] {
            let (item, log) = rooted(top, 0);
            item.on_left_mouse_down();
            assert!(log.borrow().calls.is_empty());
        }
    }

    #[test]
    fn test_leaf_click_quiesces_before_command() {
        let (mut item, log) = rooted(true, 0);
        let seen = Rc::clone(&log);
        item.command = Some(Rc::new(crate::command::RelayCommand::new(move || {
            seen.borrow_mut().calls.push(Call::Command("save"));
        })));

        assert!(item.on_click());
        assert_eq!(
            log.borrow().calls,
            vec![Call::Responsive(false), Call::Command("save")]
        );
    }

    #[test]
    fn test_header_click_keeps_responsive() {
        let (item, log) = rooted(true, 1);
        assert!(!item.on_click());
        assert!(log.borrow().calls.is_empty());
    }

    #[test]
    fn test_focus_requests_highlight_once() {
        let (mut item, log) = rooted(false, 0);
        item.on_preview_got_focus();
        item.on_got_focus();
        item.set_highlighted(true);
        item.on_got_focus();
        assert_eq!(
            log.borrow().calls,
            vec![Call::Tracking(true), Call::Highlighted(Some(ITEM))]
        );
    }

    #[test]
    fn test_set_highlighted_reports_change() {
        let mut item = PopupItem::new(ITEM);
        assert!(item.set_highlighted(true));
        assert!(!item.set_highlighted(true));
        assert!(item.set_highlighted(false));
    }

    // =========================================================================
    // Snapshot Tests
    // =========================================================================

    #[test]
    fn test_state_diff() {
        let before = PopupItem::new(ITEM).state();
        let (mut item, _) = rooted(false, 1);
        item.set_open(true);
        let after = item.state();

        let changes = before.diff(&after);
        assert!(changes.contains(&ItemProperty::Role(MenuItemRole::SubmenuHeader)));
        assert!(changes.contains(&ItemProperty::IsTopLevel(false)));
        assert!(changes.contains(&ItemProperty::Root(Some(ROOT))));
        assert!(changes.contains(&ItemProperty::IsOpen(true)));
        assert!(before.diff(&before).is_empty());
    }
}
