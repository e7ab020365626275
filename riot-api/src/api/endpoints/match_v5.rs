use serde::Deserialize;

use crate::api::client::RiotClient;
use crate::api::request::{PipelineRequest, Routing, resources};
use crate::types::RiotApiResponse;

pub const IDS_BY_PUUID: &str = "/lol/match/v5/matches/by-puuid/{puuid}/ids";
pub const MATCH: &str = "/lol/match/v5/matches/{matchId}";

#[derive(Debug)]
pub struct MatchV5Api<'a>(pub(super) &'a RiotClient);

impl MatchV5Api<'_> {
    /// Most recent match ids first.
    pub async fn get_match_ids(
        &self,
        puuid: &str,
        start: u32,
        count: u32,
    ) -> RiotApiResponse<Vec<String>> {
        tracing::trace!("[RIOT::CLIENT] get_match_ids {} ({}+{})", puuid, start, count);

        let path = format!("/lol/match/v5/matches/by-puuid/{}/ids", puuid);
        let request = PipelineRequest::get(resources::MATCH_V5, IDS_BY_PUUID, path)
            .routing(Routing::Regional)
            .query("start", start)
            .query("count", count);

        self.0.execute(request).await
    }

    pub async fn get_last_match_id(&self, puuid: &str) -> RiotApiResponse<Option<String>> {
        Ok(self.get_match_ids(puuid, 0, 1).await?.into_iter().next())
    }

    pub async fn get_match(&self, match_id: &str) -> RiotApiResponse<MatchDto> {
        tracing::trace!("[RIOT::CLIENT] get_match {}", match_id);

        let path = format!("/lol/match/v5/matches/{}", match_id);
        let request =
            PipelineRequest::get(resources::MATCH_V5, MATCH, path).routing(Routing::Regional);

        self.0.execute(request).await
    }
}

/// Representation of the match data response.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub info: InfoDto,
}

/// Representation of the match info data response.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InfoDto {
    pub participants: Vec<ParticipantDto>,
    pub queue_id: u16,
    pub game_duration: u64,
    pub game_creation: u64,
}

/// Representation of the participant data response.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub champion_name: String,
    pub team_position: String,
    pub win: bool,
    pub kills: u16,
    pub deaths: u16,
    pub assists: u16,
}

impl MatchDto {
    pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }
}
