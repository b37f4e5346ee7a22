//! # Layout Engine
//!
//! The geometric model of a label: widgets placed on a percentage-space
//! canvas, kept free of overlaps.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`geometry`] | Rectangles, overlap test, clamp, grid snap, pixel conversion |
//! | [`align`] | Edge alignment and guide lines |
//! | [`collision`] | Overlap checks and free-cell search |
//! | [`widget`] | Widget types and default sizes |
//! | [`canvas`] | The canvas model and its mutation operations |
//! | [`gesture`] | Drag/resize gesture state machine |
//!
//! ## Example
//!
//! ```
//! use labelkit::layout::{Canvas, Corner, Rect};
//!
//! let mut canvas = Canvas::new();
//! let qr = canvas.add_widget("QR", None);
//! assert_eq!(qr.rect, Rect::new(34.0, 34.0, 25.0, 25.0));
//!
//! // A second drop on the same spot is moved to the first free cell
//! let other = canvas.add_widget("QR", None);
//! assert_eq!((other.rect.x, other.rect.y), (0.0, 0.0));
//!
//! let start = canvas.widget(&qr.id).unwrap().rect;
//! canvas
//!     .resize_widget(&qr.id, Corner::Se, Corner::Se.drag(start, 4.0, 4.0))
//!     .unwrap();
//! assert!(canvas.overlapping_pairs().is_empty());
//! ```

pub mod align;
pub mod canvas;
pub mod collision;
pub mod geometry;
pub mod gesture;
pub mod widget;

pub use align::Guides;
pub use canvas::{Canvas, Corner, LayoutSettings, Placement};
pub use geometry::{Rect, Viewport};
pub use gesture::{Gesture, GestureEnd, GestureKind, GestureTracker};
pub use widget::{Widget, WidgetKind};
