//! Invokable commands bound to menu items.

use std::fmt;

/// Something a menu item can invoke.
pub trait Command {
    /// Run the command.
    fn execute(&self);

    /// Check if the command may run right now.
    fn can_execute(&self) -> bool {
        true
    }
}

/// Command backed by closures.
pub struct RelayCommand {
    execute: Box<dyn Fn()>,
    can_execute: Option<Box<dyn Fn() -> bool>>,
}

impl RelayCommand {
    /// Create a command that always runs `execute`.
    pub fn new(execute: impl Fn() + 'static) -> Self {
        Self {
            execute: Box::new(execute),
            can_execute: None,
        }
    }

    /// Gate the command on `can_execute`.
    #[must_use]
    pub fn with_can_execute(mut self, can_execute: impl Fn() -> bool + 'static) -> Self {
        self.can_execute = Some(Box::new(can_execute));
        self
    }
}

impl Command for RelayCommand {
    fn execute(&self) {
        (self.execute)();
    }

    fn can_execute(&self) -> bool {
        self.can_execute.as_ref().map_or(true, |f| f())
    }
}

impl fmt::Debug for RelayCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayCommand")
            .field("gated", &self.can_execute.is_some())
            .finish_non_exhaustive()
    }
}

/// Run `command` if it allows it. Returns whether it ran.
pub(crate) fn invoke(command: &dyn Command) -> bool {
    if command.can_execute() {
        command.execute();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_relay_command_executes() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let command = RelayCommand::new(move || c.set(c.get() + 1));

        assert!(invoke(&command));
        assert!(invoke(&command));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_relay_command_gated() {
        let count = Rc::new(Cell::new(0));
        let enabled = Rc::new(Cell::new(false));
        let c = Rc::clone(&count);
        let e = Rc::clone(&enabled);
        let command = RelayCommand::new(move || c.set(c.get() + 1)).with_can_execute(move || e.get());

        assert!(!invoke(&command));
        assert_eq!(count.get(), 0);

        enabled.set(true);
        assert!(invoke(&command));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_relay_command_debug() {
        let command = RelayCommand::new(|| {});
        assert!(format!("{command:?}").contains("gated: false"));
    }
}
