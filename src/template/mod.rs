//! # Templates
//!
//! The portable form of a label layout and the conversions around it.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`schema`] | Wire types (`TemplatePayload`, `ComponentRecord`, corners) |
//! | [`data`] | Typed per-component data |
//! | [`convert`] | Canvas ↔ payload |
//! | [`cache`] | Local single-slot payload cache |
//! | [`library`] | Templates rebuilt from stored rows |
//! | [`sample`] | Data-driven shipping label |

pub mod cache;
pub mod convert;
pub mod data;
pub mod library;
pub mod sample;
pub mod schema;

pub use cache::LocalCache;
pub use convert::{DEFAULT_TEMPLATE_NAME, LoadedTemplate, from_payload, to_payload};
pub use data::ComponentData;
pub use library::{TemplateGroup, group_rows};
pub use schema::{ComponentRecord, Corners, SaveResponse, TemplatePayload, TemplateRecord};
