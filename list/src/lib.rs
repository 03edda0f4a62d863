//! # imesetting-list
//!
//! Keyboard list screen built on imesetting-core: shows every installed
//! input method, lets the user turn them on and off, and links to the
//! default keyboard selector and the active keyboard's settings.

pub mod screen;

pub use imesetting_core::*;

pub use screen::{ConfirmDialog, ListScreen};
