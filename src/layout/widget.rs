//! Widget types and their default sizes.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Size given to widget types without a registered default.
pub const FALLBACK_SIZE: (f64, f64) = (30.0, 25.0);

/// Known widget types.
///
/// The first six appear in the builder palette; `Tracking` and `Weight` are
/// only produced by data-driven labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Logo,
    ShipTo,
    Qr,
    BarcodeSmall,
    BarcodeLarge,
    Text,
    Tracking,
    Weight,
}

impl WidgetKind {
    /// Widgets offered for drag-and-drop, in palette order.
    pub const PALETTE: [WidgetKind; 6] = [
        WidgetKind::Logo,
        WidgetKind::ShipTo,
        WidgetKind::Qr,
        WidgetKind::BarcodeSmall,
        WidgetKind::BarcodeLarge,
        WidgetKind::Text,
    ];

    /// Wire name (the `name` field of a component record).
    pub fn name(self) -> &'static str {
        match self {
            WidgetKind::Logo => "Logo",
            WidgetKind::ShipTo => "ShipTo",
            WidgetKind::Qr => "QR",
            WidgetKind::BarcodeSmall => "BarcodeSmall",
            WidgetKind::BarcodeLarge => "BarcodeLarge",
            WidgetKind::Text => "Text",
            WidgetKind::Tracking => "Tracking",
            WidgetKind::Weight => "Weight",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Logo" => Some(WidgetKind::Logo),
            "ShipTo" => Some(WidgetKind::ShipTo),
            "QR" => Some(WidgetKind::Qr),
            "BarcodeSmall" => Some(WidgetKind::BarcodeSmall),
            "BarcodeLarge" => Some(WidgetKind::BarcodeLarge),
            "Text" => Some(WidgetKind::Text),
            "Tracking" => Some(WidgetKind::Tracking),
            "Weight" => Some(WidgetKind::Weight),
            _ => None,
        }
    }

    /// Default `(w, h)` in percentage units.
    pub fn default_size(self) -> (f64, f64) {
        match self {
            WidgetKind::Logo => (30.0, 12.0),
            WidgetKind::ShipTo => (60.0, 20.0),
            WidgetKind::Qr => (25.0, 25.0),
            WidgetKind::BarcodeSmall => (65.0, 20.0),
            WidgetKind::BarcodeLarge => (100.0, 25.0),
            WidgetKind::Text => (40.0, 10.0),
            WidgetKind::Tracking | WidgetKind::Weight => FALLBACK_SIZE,
        }
    }
}

/// Default `(w, h)` for any widget name, known or not.
pub fn default_size(name: &str) -> (f64, f64) {
    WidgetKind::from_name(name)
        .map(WidgetKind::default_size)
        .unwrap_or(FALLBACK_SIZE)
}

/// A placed widget.
///
/// Only [`super::Canvas`] hands these out, and only by shared reference or by
/// value, so the canvas stays the sole writer of widget geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Unique within the canvas.
    pub id: String,
    /// Widget type name, e.g. "QR".
    pub name: String,
    pub rect: Rect,
}

impl Widget {
    pub fn kind(&self) -> Option<WidgetKind> {
        WidgetKind::from_name(&self.name)
    }
}
