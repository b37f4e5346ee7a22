//! Typed per-component payloads.
//!
//! On the wire `data` is a plain JSON object whose shape depends on the
//! component's `name`. [`ComponentData`] gives each widget type its own
//! variant; unknown widget types carry their JSON untouched.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LabelError;
use crate::layout::WidgetKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueData {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipToData {
    pub title: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingData {
    pub line1: String,
    pub line2: String,
    pub line3: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightData {
    pub label: String,
}

/// Payload of one component, keyed by widget type.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentData {
    Logo(TextData),
    ShipTo(ShipToData),
    Qr(ValueData),
    BarcodeSmall(ValueData),
    BarcodeLarge(ValueData),
    Text(TextData),
    Tracking(TrackingData),
    Weight(WeightData),
    /// Widget type without a registered shape.
    Custom(Value),
}

fn text(s: &str) -> TextData {
    TextData { text: s.to_string() }
}

fn value(s: &str) -> ValueData {
    ValueData {
        value: s.to_string(),
    }
}

fn parse<T: DeserializeOwned>(name: &str, data: Value) -> Result<T, LabelError> {
    serde_json::from_value(data).map_err(|e| LabelError::InvalidData {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

impl ComponentData {
    /// Placeholder data for a freshly dropped widget.
    pub fn default_for(name: &str) -> Self {
        match WidgetKind::from_name(name) {
            Some(WidgetKind::Logo) => ComponentData::Logo(text("amazon.com")),
            Some(WidgetKind::ShipTo) => ComponentData::ShipTo(ShipToData {
                title: "SHIP TO:".to_string(),
                address: "(shipping address)".to_string(),
            }),
            Some(WidgetKind::Qr) => ComponentData::Qr(value("QR123")),
            Some(WidgetKind::BarcodeSmall) => ComponentData::BarcodeSmall(value("123654789")),
            Some(WidgetKind::BarcodeLarge) => {
                ComponentData::BarcodeLarge(value("6009785922537712345678"))
            }
            Some(WidgetKind::Text) => ComponentData::Text(text("Sample Text")),
            Some(WidgetKind::Tracking) => ComponentData::Tracking(TrackingData {
                line1: "(Tracking Information)".to_string(),
                line2: "Carrier Name".to_string(),
                line3: "Tracking #".to_string(),
            }),
            Some(WidgetKind::Weight) => ComponentData::Weight(WeightData {
                label: "Weight:".to_string(),
            }),
            None => ComponentData::Custom(Value::Object(Map::new())),
        }
    }

    /// Parse wire data for a component named `name`.
    ///
    /// Known widget types must carry their required fields; `null` yields the
    /// type's default.
    pub fn from_value(name: &str, data: Value) -> Result<Self, LabelError> {
        if data.is_null() {
            return Ok(Self::default_for(name));
        }
        let Some(kind) = WidgetKind::from_name(name) else {
            return Ok(ComponentData::Custom(data));
        };
        Ok(match kind {
            WidgetKind::Logo => ComponentData::Logo(parse(name, data)?),
            WidgetKind::ShipTo => ComponentData::ShipTo(parse(name, data)?),
            WidgetKind::Qr => ComponentData::Qr(parse(name, data)?),
            WidgetKind::BarcodeSmall => ComponentData::BarcodeSmall(parse(name, data)?),
            WidgetKind::BarcodeLarge => ComponentData::BarcodeLarge(parse(name, data)?),
            WidgetKind::Text => ComponentData::Text(parse(name, data)?),
            WidgetKind::Tracking => ComponentData::Tracking(parse(name, data)?),
            WidgetKind::Weight => ComponentData::Weight(parse(name, data)?),
        })
    }

    /// Wire form.
    pub fn to_value(&self) -> Value {
        let result = match self {
            ComponentData::Logo(d) | ComponentData::Text(d) => serde_json::to_value(d),
            ComponentData::ShipTo(d) => serde_json::to_value(d),
            ComponentData::Qr(d) | ComponentData::BarcodeSmall(d) | ComponentData::BarcodeLarge(d) => {
                serde_json::to_value(d)
            }
            ComponentData::Tracking(d) => serde_json::to_value(d),
            ComponentData::Weight(d) => serde_json::to_value(d),
            ComponentData::Custom(v) => return v.clone(),
        };
        // Plain string structs always serialize
        result.unwrap_or(Value::Null)
    }

    /// True if this variant belongs to widget type `name`.
    pub fn matches(&self, name: &str) -> bool {
        let kind = WidgetKind::from_name(name);
        match self {
            ComponentData::Logo(_) => kind == Some(WidgetKind::Logo),
            ComponentData::ShipTo(_) => kind == Some(WidgetKind::ShipTo),
            ComponentData::Qr(_) => kind == Some(WidgetKind::Qr),
            ComponentData::BarcodeSmall(_) => kind == Some(WidgetKind::BarcodeSmall),
            ComponentData::BarcodeLarge(_) => kind == Some(WidgetKind::BarcodeLarge),
            ComponentData::Text(_) => kind == Some(WidgetKind::Text),
            ComponentData::Tracking(_) => kind == Some(WidgetKind::Tracking),
            ComponentData::Weight(_) => kind == Some(WidgetKind::Weight),
            ComponentData::Custom(_) => kind.is_none(),
        }
    }

    /// Lines of human-readable text, top to bottom.
    pub fn text_lines(&self) -> Vec<String> {
        match self {
            ComponentData::Logo(d) | ComponentData::Text(d) => d.text.lines().map(String::from).collect(),
            ComponentData::ShipTo(d) => std::iter::once(d.title.clone())
                .chain(d.address.lines().map(String::from))
                .collect(),
            ComponentData::Tracking(d) => vec![d.line1.clone(), d.line2.clone(), d.line3.clone()],
            ComponentData::Weight(d) => vec![d.label.clone()],
            ComponentData::Qr(_)
            | ComponentData::BarcodeSmall(_)
            | ComponentData::BarcodeLarge(_)
            | ComponentData::Custom(_) => Vec::new(),
        }
    }

    /// Encoded value of a QR code or barcode.
    pub fn code_value(&self) -> Option<&str> {
        match self {
            ComponentData::Qr(d) | ComponentData::BarcodeSmall(d) | ComponentData::BarcodeLarge(d) => {
                Some(&d.value)
            }
            _ => None,
        }
    }
}
