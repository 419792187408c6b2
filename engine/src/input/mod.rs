//! Input Module
//!
//! Key bindings and pointer state for the studio, decoupled from any specific
//! windowing system. The app translates winit events into these types.
//!
//! # Example
//!
//! ```rust,ignore
//! use tee_studio_engine::input::{KeyBindings, KeyCode, StudioAction};
//!
//! let bindings = KeyBindings::default();
//! if let Some(StudioAction::ExportSnapshot) = bindings.action(KeyCode::P) {
//!     // export
//! }
//! ```

pub mod bindings;
pub mod mouse;

pub use bindings::{KeyBindings, KeyCode, StudioAction, drop_target};
pub use mouse::{PointerState, ScrollDelta};
