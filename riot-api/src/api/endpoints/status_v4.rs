use serde::Deserialize;

use crate::api::client::RiotClient;
use crate::api::request::{PipelineRequest, resources};
use crate::types::RiotApiResponse;

pub const PLATFORM_DATA: &str = "/lol/status/v4/platform-data";

#[derive(Debug)]
pub struct StatusV4Api<'a>(pub(super) &'a RiotClient);

impl StatusV4Api<'_> {
    pub async fn get_platform_data(&self) -> RiotApiResponse<PlatformDataDto> {
        tracing::trace!("[RIOT::CLIENT] get_platform_data in {}", self.0.platform());

        self.0
            .execute(PipelineRequest::get(
                resources::STATUS_V4,
                PLATFORM_DATA,
                PLATFORM_DATA,
            ))
            .await
    }
}

/// Representation of the platform status response. Incidents and
/// maintenances are kept as raw JSON.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDataDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub locales: Vec<String>,
    #[serde(default)]
    pub maintenances: Vec<serde_json::Value>,
    #[serde(default)]
    pub incidents: Vec<serde_json::Value>,
}

impl PlatformDataDto {
    pub fn is_healthy(&self) -> bool {
        self.maintenances.is_empty() && self.incidents.is_empty()
    }
}
