//! # TerraDiff Cloud
//!
//! Remote collaborators behind the core contracts: an async client for
//! the imagery engine's scene service (with blocking wrappers for native
//! callers) and the HTTP export sink.

pub mod client;
pub mod error;
pub mod export;
pub mod models;
pub mod sync_api;

pub use client::{EngineClient, EngineOptions};
pub use error::{CloudError, Result};
pub use export::HttpExport;
pub use models::{SceneDto, SceneRequest, SceneResponse};
pub use sync_api::RemoteImagery;
