use serde::Deserialize;
use urlencoding::encode;

use crate::api::client::RiotClient;
use crate::api::request::{PipelineRequest, Routing, resources};
use crate::types::RiotApiResponse;

pub const BY_RIOT_ID: &str = "/riot/account/v1/accounts/by-riot-id/{gameName}/{tagLine}";
pub const BY_PUUID: &str = "/riot/account/v1/accounts/by-puuid/{puuid}";

#[derive(Debug)]
pub struct AccountV1Api<'a>(pub(super) &'a RiotClient);

impl AccountV1Api<'_> {
    pub async fn get_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> RiotApiResponse<AccountDto> {
        tracing::trace!(
            "[RIOT::CLIENT] get_account_by_riot_id {}#{}",
            game_name,
            tag_line
        );

        let path = format!(
            "/riot/account/v1/accounts/by-riot-id/{}/{}",
            encode(game_name),
            encode(tag_line)
        );
        let request =
            PipelineRequest::get(resources::ACCOUNT_V1, BY_RIOT_ID, path).routing(Routing::Regional);

        self.0.execute(request).await
    }

    pub async fn get_by_puuid(&self, puuid: &str) -> RiotApiResponse<AccountDto> {
        tracing::trace!("[RIOT::CLIENT] get_account_by_puuid {}", puuid);

        let path = format!("/riot/account/v1/accounts/by-puuid/{}", puuid);
        let request =
            PipelineRequest::get(resources::ACCOUNT_V1, BY_PUUID, path).routing(Routing::Regional);

        self.0.execute(request).await
    }
}

/// Representation of the account response.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}
