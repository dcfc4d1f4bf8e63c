//! HTTP export sink
//!
//! Ships a GeoJSON FeatureCollection to a storage destination with a
//! single PUT. Fire-and-forget: transport failures surface to the caller,
//! delivery is never confirmed.

use std::time::Duration;

use terradiff_core::io::to_geojson;
use terradiff_core::service::{ExportFormat, ExportSink};
use terradiff_core::vector::FeatureCollection;
use terradiff_core::Error as CoreError;

use crate::error::{CloudError, Result};

/// Export sink that PUTs documents under a storage base URL as
/// `<base>/<destination>/<description>.geojson`.
pub struct HttpExport {
    rt: tokio::runtime::Runtime,
    client: reqwest::Client,
    base_url: String,
}

impl HttpExport {
    pub fn connect(base_url: impl Into<String>) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CloudError::Protocol(format!("failed to start runtime: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(CloudError::Http)?;

        Ok(Self {
            rt,
            client,
            base_url: base_url.into(),
        })
    }

    fn object_url(&self, destination: &str, description: &str) -> String {
        format!(
            "{}/{}/{}.geojson",
            self.base_url.trim_end_matches('/'),
            destination.trim_matches('/'),
            description
        )
    }
}

impl ExportSink for HttpExport {
    fn export_table(
        &self,
        table: &FeatureCollection,
        destination: &str,
        description: &str,
        format: ExportFormat,
    ) -> terradiff_core::Result<()> {
        match format {
            ExportFormat::GeoJson => {}
        }

        let doc = to_geojson(table)?;
        let url = self.object_url(destination, description);

        let sent: Result<()> = self.rt.block_on(async {
            let resp = self.client.put(&url).json(&doc).send().await?;
            if !resp.status().is_success() {
                let code = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                return Err(CloudError::Status {
                    code,
                    body: body.chars().take(300).collect(),
                });
            }
            Ok(())
        });

        sent.map_err(|e| {
            CoreError::Export(format!(
                "{e} (destination {destination}, description {description})"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_layout() {
        let sink = HttpExport::connect("https://storage.example.com/buckets/").unwrap();
        assert_eq!(
            sink.object_url("drive", "fire_post"),
            "https://storage.example.com/buckets/drive/fire_post.geojson"
        );
        assert_eq!(
            sink.object_url("/drive/", "flood_post"),
            "https://storage.example.com/buckets/drive/flood_post.geojson"
        );
    }
}
