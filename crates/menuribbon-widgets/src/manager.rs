//! Popup coordinator contract.
//!
//! The coordinator decides which branch of the menu is open, highlighted and
//! responsive. It is owned by a popup root and implemented outside this crate;
//! items only talk to it through [`PopupManager`].

use menuribbon_core::ElementId;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Coordinator shared by every item under one popup root.
pub trait PopupManager {
    /// Register hover interest for `item`. `immediate` bypasses any hover delay.
    fn enter(&mut self, item: ElementId, immediate: bool);

    /// Unregister hover interest for `item`.
    fn exit(&mut self, item: ElementId);

    /// Whether the menu currently reacts to hover (a drop-down is engaged).
    fn is_responsive(&self) -> bool;

    /// Engage or collapse the menu.
    fn set_responsive(&mut self, responsive: bool);

    /// Request that `item`'s submenu become the open branch.
    fn set_opened_item(&mut self, item: Option<ElementId>);

    /// Request that the highlight move to `item`.
    fn set_highlighted_item(&mut self, item: Option<ElementId>);

    /// Arm or disarm keyboard-driven highlight tracking.
    fn set_tracking(&mut self, tracking: bool);
}

/// Shared handle to a coordinator.
pub type SharedManager = Rc<RefCell<dyn PopupManager>>;

/// Wrap a coordinator in a [`SharedManager`].
pub fn shared(manager: impl PopupManager + 'static) -> SharedManager {
    Rc::new(RefCell::new(manager))
}

/// Non-owning reference from an item to its popup root.
///
/// The engine owns the coordinator; once the root is gone every call through
/// a stale reference is dropped.
#[derive(Clone)]
pub struct PopupRootRef {
    id: ElementId,
    manager: Weak<RefCell<dyn PopupManager>>,
}

impl PopupRootRef {
    /// Create a reference to root `id` and its coordinator.
    #[must_use]
    pub fn new(id: ElementId, manager: &SharedManager) -> Self {
        Self {
            id,
            manager: Rc::downgrade(manager),
        }
    }

    /// Root element id.
    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.id
    }

    /// Run `f` against the coordinator.
    ///
    /// Returns `None` (and logs) if the coordinator is gone or already
    /// borrowed, which only happens when a coordinator call re-enters the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn PopupManager) -> R) -> Option<R> {
        let Some(manager) = self.manager.upgrade() else {
            tracing::debug!(root = %self.id, "popup manager dropped, ignoring request");
            return None;
        };
        let result = match manager.try_borrow_mut() {
            Ok(mut manager) => Some(f(&mut *manager)),
            Err(_) => {
                tracing::warn!(root = %self.id, "popup manager busy, dropping request");
                None
            }
        };
        result
    }

    /// Read the coordinator's responsive flag (`false` if unavailable).
    #[must_use]
    pub fn is_responsive(&self) -> bool {
        self.manager.upgrade().is_some_and(|manager| {
            manager
                .try_borrow()
                .map(|m| m.is_responsive())
                .unwrap_or(false)
        })
    }

    /// Check if the coordinator is still alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.manager.strong_count() > 0
    }

    /// Check if two references point at the same coordinator.
    #[must_use]
    pub fn same_manager(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.manager, &other.manager)
    }
}

impl fmt::Debug for PopupRootRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupRootRef").field("id", &self.id).finish_non_exhaustive()
    }
}
