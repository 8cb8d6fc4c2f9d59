//! Core types for the MenuRibbon popup menu engine.
//!
//! This crate provides the toolkit-independent building blocks:
//! - Element arena with visual and logical parents: [`ElementTree`], [`ElementId`]
//! - Popup hierarchy lookup: [`hierarchy::locate`], [`hierarchy::contains`]
//! - Keyboard navigation: [`navigation::next_item`], [`navigation::next_enabled_item`]
//! - Subscription lifetime: [`Subscription`], [`DisposableBag`], [`EventSource`]
//! - Input events and configuration: [`ItemInput`], [`Key`], [`MenuConfig`]

mod config;
mod disposable;
mod error;
mod event;
pub mod hierarchy;
pub mod navigation;
mod source;
mod tree;

pub use config::{MenuConfig, NavigationConfig, DEFAULT_SEPARATOR_STYLE_KEY};
pub use disposable::{DisposableBag, Subscription};
pub use error::{ConfigError, TreeError};
pub use event::{ItemInput, Key, MouseButton};
pub use hierarchy::{Location, ParentOf};
pub use navigation::{ItemsHost, next_enabled_item, next_item};
pub use source::EventSource;
pub use tree::{ElementId, ElementKind, ElementTree};
