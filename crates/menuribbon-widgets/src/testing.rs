//! Coordinator double for unit tests.

use crate::manager::{PopupManager, SharedManager};
use menuribbon_core::ElementId;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Enter(ElementId, bool),
    Exit(ElementId),
    Responsive(bool),
    Opened(Option<ElementId>),
    Highlighted(Option<ElementId>),
    Tracking(bool),
    Command(&'static str),
}

#[derive(Debug, Default)]
pub(crate) struct CallLog {
    pub(crate) responsive: bool,
    pub(crate) calls: Vec<Call>,
}

impl PopupManager for CallLog {
    fn enter(&mut self, item: ElementId, immediate: bool) {
        self.calls.push(Call::Enter(item, immediate));
    }

    fn exit(&mut self, item: ElementId) {
        self.calls.push(Call::Exit(item));
    }

    fn is_responsive(&self) -> bool {
        self.responsive
    }

    fn set_responsive(&mut self, responsive: bool) {
        self.responsive = responsive;
        self.calls.push(Call::Responsive(responsive));
    }

    fn set_opened_item(&mut self, item: Option<ElementId>) {
        self.calls.push(Call::Opened(item));
    }

    fn set_highlighted_item(&mut self, item: Option<ElementId>) {
        self.calls.push(Call::Highlighted(item));
    }

    fn set_tracking(&mut self, tracking: bool) {
        self.calls.push(Call::Tracking(tracking));
    }
}

/// A fresh log and the same log as a [`SharedManager`].
pub(crate) fn call_log() -> (Rc<RefCell<CallLog>>, SharedManager) {
    let log = Rc::new(RefCell::new(CallLog::default()));
    let manager: SharedManager = log.clone();
    (log, manager)
}
