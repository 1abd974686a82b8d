//! Images and networks of the configured workspace.

use super::PowerVsClient;
use crate::config::PowerVsDefaults;
use crate::models::upstream::{ImageCollection, NetworkCollection, RawImage};
use crate::models::{ImageDetails, ImageList, ImageSummary, NetworkList, NetworkSummary};
use crate::network::path_segment;
use crate::Result;

impl PowerVsClient {
    /// Boot images available in the configured workspace.
    pub async fn list_images(&self) -> Result<ImageList> {
        let target = self.require_configured("list images in a specific workspace")?;
        let url = target.instance_url("/images");
        let collection: ImageCollection = self
            .get_in(&target, &url, PowerVsDefaults::REQUEST_TIMEOUT)
            .await?;

        let images: Vec<ImageSummary> = collection
            .images
            .unwrap_or_default()
            .into_iter()
            .map(ImageSummary::from)
            .collect();
        Ok(ImageList {
            total_images: images.len(),
            images,
        })
    }

    /// Full detail of one image.
    pub async fn image_details(&self, image_id: &str) -> Result<ImageDetails> {
        let target = self.require_configured("get image details")?;
        let url = target.instance_url(&format!("/images/{}", path_segment(image_id)));
        let raw: RawImage = self
            .get_in(&target, &url, PowerVsDefaults::REQUEST_TIMEOUT)
            .await?;
        Ok(ImageDetails::from(raw))
    }

    /// Networks of the configured workspace with their IP usage.
    pub async fn list_networks(&self) -> Result<NetworkList> {
        let target = self.require_configured("list networks in a specific workspace")?;
        let url = target.instance_url("/networks");
        let collection: NetworkCollection = self
            .get_in(&target, &url, PowerVsDefaults::REQUEST_TIMEOUT)
            .await?;

        let networks: Vec<NetworkSummary> = collection
            .networks
            .unwrap_or_default()
            .into_iter()
            .map(NetworkSummary::from)
            .collect();
        Ok(NetworkList {
            total_networks: networks.len(),
            networks,
        })
    }
}
