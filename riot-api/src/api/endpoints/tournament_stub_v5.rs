use riftcall_shared::Region;
use serde::Serialize;

use crate::api::client::RiotClient;
use crate::api::request::{ApiKeyKind, PipelineRequest, resources};
use crate::types::RiotApiResponse;

pub const PROVIDERS: &str = "/lol/tournament-stub/v5/providers";
pub const TOURNAMENTS: &str = "/lol/tournament-stub/v5/tournaments";

/// Tournament stub calls always go to the americas cluster with the
/// tournament key, whatever the client platform.
#[derive(Debug)]
pub struct TournamentStubV5Api<'a>(pub(super) &'a RiotClient);

impl TournamentStubV5Api<'_> {
    pub async fn register_provider(
        &self,
        params: &ProviderRegistrationParameters,
    ) -> RiotApiResponse<i64> {
        tracing::trace!("[RIOT::CLIENT] register_provider {}", params.url);

        let request = PipelineRequest::post(resources::TOURNAMENT_STUB_V5, PROVIDERS, PROVIDERS)
            .route_override(Region::Americas)
            .key(ApiKeyKind::Tournament)
            .json_body(params)?;

        self.0.execute(request).await
    }

    pub async fn register_tournament(
        &self,
        params: &TournamentRegistrationParameters,
    ) -> RiotApiResponse<i64> {
        tracing::trace!("[RIOT::CLIENT] register_tournament {}", params.name);

        let request =
            PipelineRequest::post(resources::TOURNAMENT_STUB_V5, TOURNAMENTS, TOURNAMENTS)
                .route_override(Region::Americas)
                .key(ApiKeyKind::Tournament)
                .json_body(params)?;

        self.0.execute(request).await
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRegistrationParameters {
    /// Platform the tournament is played on, e.g. `EUW`.
    pub region: String,
    /// Callback receiving game results.
    pub url: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRegistrationParameters {
    pub name: String,
    pub provider_id: i64,
}
