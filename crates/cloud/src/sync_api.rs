//! Blocking API for native callers
//!
//! Wraps the async [`EngineClient`] with an internal current-thread Tokio
//! runtime and implements the core [`ImageryService`] contract, so the
//! detector never manages an async runtime itself.

use terradiff_core::service::{ImageryService, Scene, SceneQuery};
use terradiff_core::Error as CoreError;

use crate::client::{EngineClient, EngineOptions};
use crate::error::{CloudError, Result};
use crate::models::SceneRequest;

/// Blocking imagery service backed by a remote engine
pub struct RemoteImagery {
    rt: tokio::runtime::Runtime,
    inner: EngineClient,
}

impl RemoteImagery {
    pub fn connect(base_url: impl Into<String>, options: EngineOptions) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CloudError::Protocol(format!("failed to start runtime: {e}")))?;

        let inner = EngineClient::new(base_url, options)?;
        Ok(Self { rt, inner })
    }
}

/// Surface a cloud failure with the offending request's parameters
fn service_error(err: CloudError, request: &SceneRequest) -> CoreError {
    CoreError::Service(format!(
        "{err} (collection {}, datetime {}, bbox {:?})",
        request.collection, request.datetime, request.bbox
    ))
}

impl ImageryService for RemoteImagery {
    fn scenes(&self, query: &SceneQuery) -> terradiff_core::Result<Vec<Scene>> {
        let request = SceneRequest::from_query(query);
        self.rt
            .block_on(self.inner.scenes(&request))
            .map_err(|e| service_error(e, &request))
    }

    fn scene_pair(
        &self,
        before: &SceneQuery,
        after: &SceneQuery,
    ) -> terradiff_core::Result<(Vec<Scene>, Vec<Scene>)> {
        let before_req = SceneRequest::from_query(before);
        let after_req = SceneRequest::from_query(after);

        // The two windows are independent; overlap the requests
        let (before, after) = self.rt.block_on(async {
            tokio::join!(
                self.inner.scenes(&before_req),
                self.inner.scenes(&after_req)
            )
        });

        Ok((
            before.map_err(|e| service_error(e, &before_req))?,
            after.map_err(|e| service_error(e, &after_req))?,
        ))
    }
}
