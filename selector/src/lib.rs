//! # imesetting-selector
//!
//! Keyboard selector popup built on imesetting-core: lists the enabled input
//! methods with a radio button each and makes the chosen one active.

pub mod popup;

pub use imesetting_core::*;

pub use popup::SelectorScreen;
