//! Recording doubles for the popup coordinator and commands.
//!
//! Both write into one shared [`CallLog`], so tests can assert the relative
//! order of coordinator calls and command executions.

use menuribbon_core::ElementId;
use menuribbon_widgets::{Command, PopupManager};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One observed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordedCall {
    /// `enter(item, immediate)`
    Enter {
        /// Item registering hover
        item: ElementId,
        /// Hover delay bypassed
        immediate: bool,
    },
    /// `exit(item)`
    Exit(ElementId),
    /// `is_responsive := value`
    SetResponsive(bool),
    /// `opened_item := value`
    SetOpenedItem(Option<ElementId>),
    /// `highlighted_item := value`
    SetHighlightedItem(Option<ElementId>),
    /// `tracking := value`
    SetTracking(bool),
    /// A recording command ran
    Executed(String),
}

/// Shared, ordered call log.
pub type CallLog = Rc<RefCell<Vec<RecordedCall>>>;

/// Create an empty log.
#[must_use]
pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Coordinator that records every call and keeps the last written values.
#[derive(Debug)]
pub struct RecordingPopupManager {
    log: CallLog,
    /// Responsive flag, as last set
    pub responsive: bool,
    /// Last requested open branch
    pub opened_item: Option<ElementId>,
    /// Last requested highlight
    pub highlighted_item: Option<ElementId>,
    /// Tracking flag, as last set
    pub tracking: bool,
}

impl RecordingPopupManager {
    /// Create a coordinator writing into `log`.
    #[must_use]
    pub const fn new(log: CallLog) -> Self {
        Self {
            log,
            responsive: false,
            opened_item: None,
            highlighted_item: None,
            tracking: false,
        }
    }

    /// Start out responsive (a drop-down already engaged).
    #[must_use]
    pub const fn with_responsive(mut self, responsive: bool) -> Self {
        self.responsive = responsive;
        self
    }

    /// The shared log.
    #[must_use]
    pub fn log(&self) -> CallLog {
        Rc::clone(&self.log)
    }

    fn record(&self, call: RecordedCall) {
        self.log.borrow_mut().push(call);
    }
}

impl PopupManager for RecordingPopupManager {
    fn enter(&mut self, item: ElementId, immediate: bool) {
        self.record(RecordedCall::Enter { item, immediate });
    }

    fn exit(&mut self, item: ElementId) {
        self.record(RecordedCall::Exit(item));
    }

    fn is_responsive(&self) -> bool {
        self.responsive
    }

    fn set_responsive(&mut self, responsive: bool) {
        self.responsive = responsive;
        self.record(RecordedCall::SetResponsive(responsive));
    }

    fn set_opened_item(&mut self, item: Option<ElementId>) {
        self.opened_item = item;
        self.record(RecordedCall::SetOpenedItem(item));
    }

    fn set_highlighted_item(&mut self, item: Option<ElementId>) {
        self.highlighted_item = item;
        self.record(RecordedCall::SetHighlightedItem(item));
    }

    fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
        self.record(RecordedCall::SetTracking(tracking));
    }
}

/// Command that records its executions.
#[derive(Debug, Clone)]
pub struct RecordingCommand {
    name: String,
    log: CallLog,
    enabled: Rc<Cell<bool>>,
}

impl RecordingCommand {
    /// Create an enabled command writing into `log`.
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            log,
            enabled: Rc::new(Cell::new(true)),
        }
    }

    /// Command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enable or disable the command. Clones share the flag.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Number of recorded executions of this command.
    #[must_use]
    pub fn executions(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Executed(n) if *n == self.name))
            .count()
    }
}

impl Command for RecordingCommand {
    fn execute(&self) {
        self.log
            .borrow_mut()
            .push(RecordedCall::Executed(self.name.clone()));
    }

    fn can_execute(&self) -> bool {
        self.enabled.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_records_in_order() {
        let log = call_log();
        let mut manager = RecordingPopupManager::new(Rc::clone(&log));
        manager.enter(ElementId::new(1), false);
        manager.set_responsive(true);
        manager.set_opened_item(Some(ElementId::new(2)));

        assert_eq!(
            *log.borrow(),
            vec![
                RecordedCall::Enter {
                    item: ElementId::new(1),
                    immediate: false
                },
                RecordedCall::SetResponsive(true),
                RecordedCall::SetOpenedItem(Some(ElementId::new(2))),
            ]
        );
        assert!(manager.is_responsive());
        assert_eq!(manager.opened_item, Some(ElementId::new(2)));
    }

    #[test]
    fn test_preset_responsive_is_not_logged() {
        let log = call_log();
        let manager = RecordingPopupManager::new(Rc::clone(&log)).with_responsive(true);
        assert!(manager.is_responsive());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_command_shares_log() {
        let log = call_log();
        let save = RecordingCommand::new("save", Rc::clone(&log));
        let mut manager = RecordingPopupManager::new(Rc::clone(&log));

        manager.set_responsive(false);
        save.execute();

        assert_eq!(
            *log.borrow(),
            vec![
                RecordedCall::SetResponsive(false),
                RecordedCall::Executed("save".to_string()),
            ]
        );
        assert_eq!(save.executions(), 1);
    }

    #[test]
    fn test_command_enabled_flag_is_shared() {
        let save = RecordingCommand::new("save", call_log());
        let clone = save.clone();
        clone.set_enabled(false);
        assert!(!save.can_execute());
    }

    #[test]
    fn test_recorded_call_json() {
        let call = RecordedCall::SetHighlightedItem(Some(ElementId::new(3)));
        let json = serde_json::to_string(&call).unwrap();
        let back: RecordedCall = serde_json::from_str(&json).unwrap();
        assert_eq!(back, call);
    }
}
