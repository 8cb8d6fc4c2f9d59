#![allow(clippy::missing_panics_doc)]
//! Testing harness for MenuRibbon menus.
//!
//! - [`RecordingPopupManager`]: coordinator double logging every call
//! - [`RecordingCommand`]: command double logging into the same log
//! - [`Harness`]: builds a menu by name and simulates input
//!
//! ```
//! use menuribbon_test::{Harness, RecordedCall};
//! use menuribbon_widgets::MenuItemRole;
//!
//! let mut h = Harness::new();
//! h.top_level("File");
//! h.item("File", "Open");
//! h.assert_role("File", MenuItemRole::TopLevelHeader);
//!
//! let file = h.id("File");
//! h.mouse_down("File");
//! h.assert_calls(&[RecordedCall::Enter { item: file, immediate: true }]);
//! ```

mod harness;
mod recorder;

pub use harness::Harness;
pub use recorder::{call_log, CallLog, RecordedCall, RecordingCommand, RecordingPopupManager};
