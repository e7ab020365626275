//! Typed wrappers over the Riot endpoints used by the client. Each one only
//! builds a [`PipelineRequest`](super::request::PipelineRequest) and decodes
//! the answer, everything else is the pipeline's business.

pub mod account_v1;
pub mod league_v4;
pub mod match_v5;
pub mod status_v4;
pub mod tournament_stub_v5;

use super::client::RiotClient;

pub use account_v1::{AccountDto, AccountV1Api};
pub use league_v4::{LeagueEntryDto, LeagueV4Api};
pub use match_v5::{InfoDto, MatchDto, MatchV5Api, ParticipantDto};
pub use status_v4::{PlatformDataDto, StatusV4Api};
pub use tournament_stub_v5::{
    ProviderRegistrationParameters, TournamentRegistrationParameters, TournamentStubV5Api,
};

impl RiotClient {
    pub fn account_v1(&self) -> AccountV1Api<'_> {
        AccountV1Api(self)
    }

    pub fn league_v4(&self) -> LeagueV4Api<'_> {
        LeagueV4Api(self)
    }

    pub fn match_v5(&self) -> MatchV5Api<'_> {
        MatchV5Api(self)
    }

    pub fn status_v4(&self) -> StatusV4Api<'_> {
        StatusV4Api(self)
    }

    pub fn tournament_stub_v5(&self) -> TournamentStubV5Api<'_> {
        TournamentStubV5Api(self)
    }
}
