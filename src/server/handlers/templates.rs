//! Template API handlers.
//!
//! Components are stored one row each with their `data` flattened to a JSON
//! string. The service does not check what that data contains.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use crate::error::LabelError;
use crate::preview::{PreviewError, render_png};
use crate::store::{LIST_LIMIT, NewComponent, StoredComponent};
use crate::template::{ComponentRecord, SaveResponse, TemplatePayload, TemplateRecord};

use super::super::error::ApiError;
use super::super::state::AppState;

/// Body of a save request. Both fields are optional here so that a missing
/// `components` list gets a 400 instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub template: Option<TemplateRecord>,
    #[serde(default)]
    pub components: Option<Vec<ComponentRecord>>,
}

/// Storage rows for `components`. A component without a template id takes
/// `fallback_template_id`.
pub fn to_rows(components: Vec<ComponentRecord>, fallback_template_id: &str) -> Vec<NewComponent> {
    components
        .into_iter()
        .map(|c| NewComponent {
            template_id: if c.template_id.is_empty() {
                fallback_template_id.to_string()
            } else {
                c.template_id
            },
            component_id: c.component_id,
            name: c.name,
            corners: c.corners,
            data_json: c.data.map(|d| d.to_string()),
        })
        .collect()
}

/// Handle POST /api/templates - store every component of a template.
pub async fn save(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(format!("Invalid payload: {}", e.body_text())))?;
    let Some(components) = req.components else {
        return Err(ApiError::BadRequest("Invalid payload".to_string()));
    };

    let template_id = req.template.map(|t| t.id).unwrap_or_default();
    let rows = to_rows(components, &template_id);
    let count = state.store.insert_all(rows).await?;
    info!(template = %template_id, count, "saved template");

    Ok(Json(SaveResponse {
        message: "Saved".to_string(),
        count,
    }))
}

/// Handle GET /api/templates - most recent component rows, newest first.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StoredComponent>>, ApiError> {
    Ok(Json(state.store.recent(LIST_LIMIT).await?))
}

/// Handle POST /api/templates/preview - render a payload as PNG.
pub async fn preview(
    body: Result<Json<TemplatePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = body.map_err(|e| ApiError::BadRequest(format!("Invalid payload: {}", e.body_text())))?;

    let png_bytes = render_png(&payload).map_err(|e| match e {
        LabelError::InvalidData { .. }
        | LabelError::Preview(PreviewError::Symbol(_) | PreviewError::Size { .. }) => {
            ApiError::BadRequest(e.to_string())
        }
        other => ApiError::Internal(format!("Preview render failed: {}", other)),
    })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use crate::template::Corners;
    use serde_json::json;

    #[test]
    fn test_to_rows_flattens_data() {
        let components = vec![
            ComponentRecord {
                template_id: String::new(),
                component_id: "QR-1".into(),
                name: "QR".into(),
                corners: Corners::from_rect(&Rect::new(0.0, 0.0, 25.0, 25.0)),
                data: Some(json!({ "value": "QR123" })),
            },
            ComponentRecord {
                template_id: "T-OTHER".into(),
                component_id: "Text-2".into(),
                name: "Text".into(),
                corners: Corners::from_rect(&Rect::new(30.0, 0.0, 40.0, 10.0)),
                data: None,
            },
        ];
        let rows = to_rows(components, "T-1");
        assert_eq!(rows[0].template_id, "T-1");
        assert_eq!(rows[0].data_json.as_deref(), Some(r#"{"value":"QR123"}"#));
        assert_eq!(rows[1].template_id, "T-OTHER");
        assert_eq!(rows[1].data_json, None);
    }

    #[test]
    fn test_save_request_without_components() {
        let req: SaveRequest = serde_json::from_value(json!({
            "template": { "id": "T-1", "name": "x" }
        }))
        .unwrap();
        assert!(req.components.is_none());
    }
}
