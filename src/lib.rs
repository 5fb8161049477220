//! Mosaic Editor - region pixelation with undo/redo
//!
//! The editing core behind a browser image editor: select a region of an
//! image (rectangle, freehand outline or the whole image), replace pixel
//! blocks inside it with their average color, step through the edit
//! history and export the result.
//!
//! Flow: pointer events → [`coords`] → [`selection::SelectionModel`] →
//! [`processing::rasterize`] → [`processing::apply_mosaic`] →
//! [`history::HistoryStack`], all orchestrated by [`EditSession`].

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod config;
pub mod constants;
pub mod coords;
pub mod data;
mod error;
pub mod format;
pub mod history;
pub mod model;
pub mod processing;
pub mod selection;
mod session;

pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use model::Raster;
pub use session::{EditSession, SessionConfig};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
