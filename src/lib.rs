//! # Labelkit - Label Layout Engine
//!
//! Labelkit lays out shipping labels on a percentage-based canvas and stores
//! the resulting templates behind a small HTTP service. It provides:
//!
//! - **Layout**: grid snapping, edge alignment, collision-free placement and
//!   corner resizing with revert-on-overlap
//! - **Templates**: the portable payload format, typed component data and a
//!   local cache slot
//! - **Storage service**: an axum API that stores templates one row per
//!   component
//! - **Preview**: PNG rendering of a template with QR codes and barcodes
//!
//! ## Quick Start
//!
//! ```
//! use labelkit::layout::{Canvas, Corner, Rect};
//!
//! let mut canvas = Canvas::new();
//! let qr = canvas.add_widget("QR", None);
//! let placed = canvas.move_widget(&qr.id, 34.0, 34.0)?;
//! assert!(placed.is_accepted());
//!
//! // Resizing keeps the opposite corner fixed
//! let rect = canvas.widget(&qr.id).unwrap().rect;
//! let grown = Corner::Se.drag(rect, 5.0, 5.0);
//! canvas.resize_widget(&qr.id, Corner::Se, grown)?;
//!
//! # Ok::<(), labelkit::error::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`layout`] | Geometry, alignment, collision and the canvas model |
//! | [`template`] | Payload format, conversion, cache, sample label |
//! | [`editor`] | Editing session with persistence and background save |
//! | [`store`] | Component datastore backends |
//! | [`server`] | HTTP template service |
//! | [`client`] | HTTP client for the service |
//! | [`preview`] | PNG rendering |
//! | [`error`] | Error types |

pub mod client;
pub mod editor;
pub mod error;
pub mod layout;
pub mod preview;
pub mod server;
pub mod store;
pub mod template;

// Re-exports for convenience
pub use client::TemplateClient;
pub use editor::{Editor, SaveStatus};
pub use error::LabelError;
pub use layout::{Canvas, Rect};
pub use template::TemplatePayload;
