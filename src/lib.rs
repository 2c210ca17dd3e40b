//! Bookshelf application library
//!
//! The catalog list view and its dialogs, driven by any front end through
//! strongly typed state and the kernel's notification and confirmation ports.

pub mod modules;
pub mod utils;

#[cfg(test)]
mod test_support;

/// Re-export commonly used types
pub use modules::books::*;
