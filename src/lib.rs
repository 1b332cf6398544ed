//! toasthost: a concurrent host for toast/snackbar notifications.
//!
//! The [`toast`] module is the library proper. The remaining modules make up
//! the `toasthost` demo binary: configuration, logging, the CLI and a
//! console presentation adapter.

pub mod app;
pub mod cli;
pub mod config;
pub mod display;
pub mod logging;
pub mod toast;
