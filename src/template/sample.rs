//! Data-driven shipping label.
//!
//! Builds a complete label from a shipment record instead of by hand:
//!
//! ```text
//! ┌────────────┬───────────────────────────────┐  0
//! │ Logo       │ ShipTo                        │
//! ├──────────┬─┴───────────────────────────────┤ 20
//! │ QR       │ BarcodeSmall                    │
//! ├──────────┴─────────────────────────────────┤ 45
//! │ Tracking                                   │
//! ├────────────────────────────────────────────┤ 60
//! │ BarcodeLarge                               │
//! ├────────────────────────────────────────────┤ 85
//! │ Weight                                     │
//! └────────────────────────────────────────────┘ 100
//! ```

use serde::{Deserialize, Serialize};

use super::data::{ComponentData, ShipToData, TextData, TrackingData, ValueData, WeightData};
use super::schema::{ComponentRecord, Corners, TemplatePayload, TemplateRecord};
use crate::layout::{Rect, Viewport};

/// Shipment details printed on the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    pub recipient_address: String,
    pub carrier_name: String,
    pub tracking_number: String,
    pub weight: String,
    pub barcode_value: String,
    pub qr_value: String,
}

impl Shipment {
    /// Example order used by the `sample` command.
    pub fn example() -> Self {
        Self {
            id: "ORDER-987654".to_string(),
            recipient_address: "John Doe\n123 Market St\nSan Francisco, CA 94103".to_string(),
            carrier_name: "Carrier Name".to_string(),
            tracking_number: "1Z999AA10123456784".to_string(),
            weight: "2.5 kg".to_string(),
            barcode_value: "6009785922537712345678".to_string(),
            qr_value: "https://tracking.example.com/1Z999AA10123456784".to_string(),
        }
    }
}

/// Template name of generated labels.
pub const SHIPPING_LABEL_NAME: &str = "Data-driven Label";

/// Shipping label for `shipment` under `template_id`.
pub fn shipping_label(shipment: &Shipment, template_id: &str) -> TemplatePayload {
    let layout = [
        ("C-LOGO", "Logo", Rect::from_edges(0.0, 0.0, 35.0, 12.0), ComponentData::Logo(TextData {
            text: "amazon.com".to_string(),
        })),
        ("C-SHIPTO", "ShipTo", Rect::from_edges(35.0, 0.0, 100.0, 20.0), ComponentData::ShipTo(ShipToData {
            title: "SHIP TO:".to_string(),
            address: shipment.recipient_address.clone(),
        })),
        ("C-QR", "QR", Rect::from_edges(0.0, 20.0, 30.0, 45.0), ComponentData::Qr(ValueData {
            value: shipment.qr_value.clone(),
        })),
        ("C-CODE-TOP", "BarcodeSmall", Rect::from_edges(30.0, 20.0, 100.0, 45.0), ComponentData::BarcodeSmall(ValueData {
            value: shipment.tracking_number.clone(),
        })),
        ("C-TRACK", "Tracking", Rect::from_edges(0.0, 45.0, 100.0, 60.0), ComponentData::Tracking(TrackingData {
            line1: "(Tracking Information)".to_string(),
            line2: shipment.carrier_name.clone(),
            line3: shipment.tracking_number.clone(),
        })),
        ("C-BARCODE", "BarcodeLarge", Rect::from_edges(0.0, 60.0, 100.0, 85.0), ComponentData::BarcodeLarge(ValueData {
            value: shipment.barcode_value.clone(),
        })),
        ("C-WEIGHT", "Weight", Rect::from_edges(0.0, 85.0, 100.0, 100.0), ComponentData::Weight(WeightData {
            label: format!("Weight: {}", shipment.weight),
        })),
    ];

    TemplatePayload {
        template: TemplateRecord {
            id: template_id.to_string(),
            name: SHIPPING_LABEL_NAME.to_string(),
        },
        width: Some(Viewport::BUILDER.width),
        height: Some(Viewport::BUILDER.height),
        components: layout
            .into_iter()
            .map(|(component_id, name, rect, data)| ComponentRecord {
                template_id: template_id.to_string(),
                component_id: component_id.to_string(),
                name: name.to_string(),
                corners: Corners::from_rect(&rect),
                data: Some(data.to_value()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutSettings;
    use crate::template::from_payload;

    #[test]
    fn test_label_is_overlap_free() {
        let payload = shipping_label(&Shipment::example(), "T-42");
        assert_eq!(payload.components.len(), 7);
        let loaded = from_payload(&payload, LayoutSettings::default()).unwrap();
        assert!(loaded.canvas.overlapping_pairs().is_empty());
    }

    #[test]
    fn test_label_carries_shipment() {
        let payload = shipping_label(&Shipment::example(), "T-42");
        let weight = payload.components.iter().find(|c| c.name == "Weight").unwrap();
        assert_eq!(weight.data.as_ref().unwrap()["label"], "Weight: 2.5 kg");
        assert!(payload.components.iter().all(|c| c.template_id == "T-42"));
    }
}
