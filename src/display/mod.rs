//! Display module for console rendering of toasts
//!
//! Colour handling plus a presentation adapter that follows a toast host
//! through its event and snapshot channels.

pub mod colours;
pub mod console;

pub use colours::{colours_wanted, ColourManager};
pub use console::ConsoleAdapter;
