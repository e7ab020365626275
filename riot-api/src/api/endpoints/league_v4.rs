use serde::Deserialize;

use crate::api::client::RiotClient;
use crate::api::request::{PipelineRequest, resources};
use crate::types::RiotApiResponse;

pub const ENTRIES_BY_PUUID: &str = "/lol/league/v4/entries/by-puuid/{encryptedPUUID}";

#[derive(Debug)]
pub struct LeagueV4Api<'a>(pub(super) &'a RiotClient);

impl LeagueV4Api<'_> {
    pub async fn get_entries_by_puuid(&self, puuid: &str) -> RiotApiResponse<Vec<LeagueEntryDto>> {
        tracing::trace!(
            "[RIOT::CLIENT] get_league {} in {}",
            puuid,
            self.0.platform()
        );

        let path = format!("/lol/league/v4/entries/by-puuid/{}", puuid);

        self.0
            .execute(PipelineRequest::get(resources::LEAGUE_V4, ENTRIES_BY_PUUID, path))
            .await
    }
}

/// Representation of the league entry response.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: u16,
    pub wins: u32,
    pub losses: u32,
}

impl LeagueEntryDto {
    pub fn is_ranked_solo_duo(&self) -> bool {
        self.queue_type.eq("RANKED_SOLO_5x5")
    }
}
