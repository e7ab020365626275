use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dotenv::dotenv;
use httpmock::prelude::*;
use riftcall_riot_api::api::endpoints::{AccountDto, PlatformDataDto, ProviderRegistrationParameters};
use riftcall_riot_api::api::replay::ReplayFixtures;
use riftcall_riot_api::{
    ApiKeyKind, KeyIncludeMode, ManualClock, MemoryStore, PipelineRequest, ResponseSource,
    RiotApiError, RiotClient, RiotClientBuilder, resources,
};
use riftcall_shared::{Platform, Region, Route};
use serde_json::json;

const KEY: &str = "RGAPI-00000000-test";
const STATUS_PATH: &str = "/lol/status/v4/platform-data";
const MATCH_PATH: &str = "/lol/match/v5/matches/EUW1_42";

fn builder(server: &MockServer, clock: &Arc<ManualClock>) -> RiotClientBuilder {
    RiotClient::builder(KEY)
        .base_url(server.base_url())
        .clock(clock.clone())
}

fn status_body() -> serde_json::Value {
    json!({"id": "EUW1", "name": "EU West", "locales": ["en_GB"], "maintenances": [], "incidents": []})
}

fn match_body() -> serde_json::Value {
    json!({"info": {"participants": [], "queueId": 420, "gameDuration": 1800, "gameCreation": 1700000000000u64}})
}

fn status_endpoint() -> String {
    format!("{}:{}", resources::STATUS_V4, STATUS_PATH)
}

mod rate_limits {
    use super::*;

    #[tokio::test]
    async fn exhausted_window_rejects_until_it_resets() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH).header("X-Riot-Token", KEY);
                then.status(200)
                    .header("X-App-Rate-Limit", "20:1,100:120")
                    .header("X-App-Rate-Limit-Count", "20:1,20:120")
                    .json_body(status_body());
            })
            .await;
        let clock = Arc::new(ManualClock::new(1_000_000));
        let store = Arc::new(MemoryStore::new(clock.clone()));
        let client = builder(&server, &clock)
            .store(store)
            .cache_rate_limits(true)
            .build()
            .await
            .unwrap();

        let status: PlatformDataDto = client.status_v4().get_platform_data().await.unwrap();
        assert_eq!(status.id, "EUW1");

        let limits = client
            .current_limits(ApiKeyKind::Standard, Route::Platform(Platform::EUW1), &status_endpoint())
            .unwrap();
        assert_eq!(limits.application[&1].allowed, 20);
        assert_eq!(limits.application[&1].used, 20);
        assert_eq!(limits.application[&120].allowed, 100);

        clock.advance(Duration::from_millis(10));
        let err = client.status_v4().get_platform_data().await.unwrap_err();
        assert!(matches!(err, RiotApiError::ClientRateLimitExceeded { .. }));
        assert!(err.is_rate_limited());
        assert_eq!(mock.hits_async().await, 1);
        assert_eq!(client.metrics().snapshot().rejected, 1);

        clock.advance(Duration::from_millis(1_000));
        client.status_v4().get_platform_data().await.unwrap();
        assert_eq!(mock.hits_async().await, 2);
    }

    #[tokio::test]
    async fn fresh_key_is_allowed_and_partial_usage_keeps_it_allowed() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(200)
                    .header("X-App-Rate-Limit", "20:1,100:120")
                    .header("X-App-Rate-Limit-Count", "1:1,1:120")
                    .header("X-Method-Rate-Limit", "50:10")
                    .header("X-Method-Rate-Limit-Count", "1:10")
                    .json_body(status_body());
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).build().await.unwrap();

        client.status_v4().get_platform_data().await.unwrap();
        client.status_v4().get_platform_data().await.unwrap();

        assert_eq!(mock.hits_async().await, 2);
        let limits = client
            .current_limits(ApiKeyKind::Standard, Route::Platform(Platform::EUW1), &status_endpoint())
            .unwrap();
        assert_eq!(limits.method[&10].allowed, 50);
        assert_eq!(limits.method[&10].used, 1);
    }

    #[tokio::test]
    async fn server_rejection_corrects_local_state() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(429)
                    .header("X-App-Rate-Limit", "20:1")
                    .header("X-App-Rate-Limit-Count", "20:1")
                    .header("X-Rate-Limit-Type", "application")
                    .header("Retry-After", "1");
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).build().await.unwrap();

        let err = client.status_v4().get_platform_data().await.unwrap_err();
        match err {
            RiotApiError::ServerRateLimitExceeded {
                limit_type,
                retry_after,
                ..
            } => {
                assert_eq!(limit_type, "application");
                assert_eq!(retry_after, Some(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = client.status_v4().get_platform_data().await.unwrap_err();
        assert!(matches!(err, RiotApiError::ClientRateLimitExceeded { .. }));
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn limits_survive_a_new_client_sharing_the_store() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(200)
                    .header("X-App-Rate-Limit", "5:10")
                    .header("X-App-Rate-Limit-Count", "5:10")
                    .json_body(status_body());
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let store = Arc::new(MemoryStore::new(clock.clone()));

        let first = builder(&server, &clock)
            .store(store.clone())
            .cache_rate_limits(true)
            .build()
            .await
            .unwrap();
        first.status_v4().get_platform_data().await.unwrap();
        drop(first);

        let second = builder(&server, &clock)
            .store(store)
            .cache_rate_limits(true)
            .build()
            .await
            .unwrap();
        let err = second.status_v4().get_platform_data().await.unwrap_err();
        assert!(matches!(err, RiotApiError::ClientRateLimitExceeded { .. }));
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn clearing_forgets_limits_and_persisted_state() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(200)
                    .header("X-App-Rate-Limit", "1:10")
                    .header("X-App-Rate-Limit-Count", "1:10")
                    .json_body(status_body());
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let store = Arc::new(MemoryStore::new(clock.clone()));
        let client = builder(&server, &clock)
            .store(store.clone())
            .cache_rate_limits(true)
            .build()
            .await
            .unwrap();

        client.status_v4().get_platform_data().await.unwrap();
        client.clear_cache().await.unwrap();
        client.status_v4().get_platform_data().await.unwrap();

        assert_eq!(mock.hits_async().await, 2);
    }
}

mod call_cache {
    use super::*;

    #[tokio::test]
    async fn cached_calls_expire_with_their_resource_ttl() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(MATCH_PATH);
                then.status(200).json_body(match_body());
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock)
            .cache_calls(true)
            .resource_cache_ttl(resources::MATCH_V5, Duration::from_secs(2))
            .build()
            .await
            .unwrap();

        let first = client.match_v5().get_match("EUW1_42").await.unwrap();
        assert_eq!(mock.hits_async().await, 1);

        clock.advance(Duration::from_millis(1_500));
        let second = client.match_v5().get_match("EUW1_42").await.unwrap();
        assert_eq!(mock.hits_async().await, 1);
        assert_eq!(first.info.queue_id, second.info.queue_id);

        clock.advance(Duration::from_millis(600));
        client.match_v5().get_match("EUW1_42").await.unwrap();
        assert_eq!(mock.hits_async().await, 2);

        let snapshot = client.metrics().snapshot();
        assert_eq!(snapshot.network, 2);
        assert_eq!(snapshot.cache_hits, 1);
    }

    #[tokio::test]
    async fn disabled_cache_always_hits_the_network() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(MATCH_PATH);
                then.status(200).json_body(match_body());
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).build().await.unwrap();

        client.match_v5().get_match("EUW1_42").await.unwrap();
        client.match_v5().get_match("EUW1_42").await.unwrap();

        assert_eq!(mock.hits_async().await, 2);
    }

    #[tokio::test]
    async fn error_responses_are_not_cached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(MATCH_PATH);
                then.status(404)
                    .json_body(json!({"status": {"message": "Data not found", "status_code": 404}}));
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).cache_calls(true).build().await.unwrap();

        for _ in 0..2 {
            let err = client.match_v5().get_match("EUW1_42").await.unwrap_err();
            match err {
                RiotApiError::DataNotFound { message } => assert_eq!(message, "Data not found"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(mock.hits_async().await, 2);
    }

    #[tokio::test]
    async fn cached_calls_are_shared_through_the_store() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(MATCH_PATH);
                then.status(200).json_body(match_body());
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let store = Arc::new(MemoryStore::new(clock.clone()));

        let first = builder(&server, &clock)
            .store(store.clone())
            .cache_calls(true)
            .build()
            .await
            .unwrap();
        first.match_v5().get_match("EUW1_42").await.unwrap();

        let second = builder(&server, &clock)
            .store(store)
            .cache_calls(true)
            .build()
            .await
            .unwrap();
        let outcome = second
            .execute_raw(
                PipelineRequest::get(resources::MATCH_V5, "/lol/match/v5/matches/{matchId}", MATCH_PATH)
                    .routing(riftcall_riot_api::Routing::Regional),
            )
            .await
            .unwrap();

        assert_eq!(outcome.source, ResponseSource::Cache);
        assert_eq!(mock.hits_async().await, 1);
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn statuses_map_to_typed_errors() {
        let server = MockServer::start_async().await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).build().await.unwrap();

        let cases: [(u16, fn(&RiotApiError) -> bool); 9] = [
            (400, |e| matches!(e, RiotApiError::BadRequest { .. })),
            (401, |e| matches!(e, RiotApiError::Unauthorized { .. })),
            (403, |e| matches!(e, RiotApiError::Forbidden { .. })),
            (404, |e| matches!(e, RiotApiError::DataNotFound { .. })),
            (415, |e| matches!(e, RiotApiError::UnsupportedMediaType { .. })),
            (418, |e| matches!(e, RiotApiError::Request { status: 418, .. })),
            (500, |e| matches!(e, RiotApiError::InternalServerError { .. })),
            (503, |e| matches!(e, RiotApiError::ServiceUnavailable { .. })),
            (502, |e| matches!(e, RiotApiError::Server { status: 502, .. })),
        ];

        for (status, is_expected) in cases {
            let puuid = format!("p{}", status);
            server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(format!("/lol/league/v4/entries/by-puuid/{}", puuid));
                    then.status(status);
                })
                .await;

            let err = client
                .league_v4()
                .get_entries_by_puuid(&puuid)
                .await
                .unwrap_err();
            assert!(is_expected(&err), "{status} gave {err:?}");
            assert_eq!(err.status_code(), Some(status));
            assert_eq!(err.is_server_error(), status >= 500);
            assert_eq!(err.is_request_error(), status < 500);
        }
    }

    #[tokio::test]
    async fn error_responses_still_register_limits() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(503)
                    .header("X-App-Rate-Limit", "20:1")
                    .header("X-App-Rate-Limit-Count", "3:1");
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).build().await.unwrap();

        let err = client.status_v4().get_platform_data().await.unwrap_err();
        assert!(matches!(err, RiotApiError::ServiceUnavailable { .. }));

        let limits = client
            .current_limits(ApiKeyKind::Standard, Route::Platform(Platform::EUW1), &status_endpoint())
            .unwrap();
        assert_eq!(limits.application[&1].used, 3);
    }

    #[tokio::test]
    async fn slow_responses_time_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(status_body());
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock)
            .timeout(Duration::from_millis(50))
            .build()
            .await
            .unwrap();

        let err = client.status_v4().get_platform_data().await.unwrap_err();
        assert!(matches!(err, RiotApiError::Transport(_)));
        assert_eq!(err.status_code(), None);
    }

    #[tokio::test]
    async fn undecodable_bodies_are_serde_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(200).body("not json");
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).build().await.unwrap();

        let err = client.status_v4().get_platform_data().await.unwrap_err();
        assert!(matches!(err, RiotApiError::Serde(_)));
    }
}

mod routing {
    use super::*;

    #[tokio::test]
    async fn key_can_be_sent_as_query_parameter() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path_contains("/riot/account/v1/accounts/by-riot-id/")
                    .path_contains("/3012")
                    .query_param("api_key", KEY);
                then.status(200).json_body(json!({
                    "puuid": "puuid-1",
                    "gameName": "Le Conservateur",
                    "tagLine": "3012"
                }));
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock)
            .key_include_mode(KeyIncludeMode::Query)
            .build()
            .await
            .unwrap();

        let account: AccountDto = client
            .account_v1()
            .get_by_riot_id("Le Conservateur", "3012")
            .await
            .unwrap();

        assert_eq!(account.puuid, "puuid-1");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn region_override_does_not_leak_into_the_client() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/lol/tournament-stub/v5/providers")
                    .header("X-Riot-Token", "RGAPI-tournament")
                    .json_body(json!({"region": "EUW", "url": "https://example.org/callback"}));
                then.status(500)
                    .header("X-App-Rate-Limit", "10:10")
                    .header("X-App-Rate-Limit-Count", "1:10");
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock)
            .key(ApiKeyKind::Tournament, "RGAPI-tournament")
            .build()
            .await
            .unwrap();

        let err = client
            .tournament_stub_v5()
            .register_provider(&ProviderRegistrationParameters {
                region: "EUW".into(),
                url: "https://example.org/callback".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RiotApiError::InternalServerError { .. }));
        assert_eq!(client.platform(), Platform::EUW1);

        let endpoint = "tournament-stub-v5:/lol/tournament-stub/v5/providers";
        let overridden = client
            .current_limits(ApiKeyKind::Tournament, Route::Regional(Region::Americas), endpoint)
            .unwrap();
        assert_eq!(overridden.application[&10].used, 1);
        let platform = client
            .current_limits(ApiKeyKind::Tournament, Route::Platform(Platform::EUW1), endpoint)
            .unwrap();
        assert!(platform.application.is_empty());
    }

    #[tokio::test]
    async fn missing_key_kind_is_a_configuration_error() {
        let server = MockServer::start_async().await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).build().await.unwrap();

        let err = client
            .tournament_stub_v5()
            .register_provider(&ProviderRegistrationParameters {
                region: "EUW".into(),
                url: "https://example.org/callback".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RiotApiError::Configuration(_)));
    }
}

mod batches {
    use super::*;

    #[tokio::test]
    async fn committing_a_batch_leaves_others_untouched() {
        let server = MockServer::start_async().await;
        let status = server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(200).json_body(status_body());
            })
            .await;
        let missing = server
            .mock_async(|when, then| {
                when.method(GET).path(MATCH_PATH);
                then.status(404);
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).build().await.unwrap();

        let successes = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));
        let enqueue_status = |batch: &str| {
            let successes = successes.clone();
            let failures = failures.clone();
            client.enqueue(
                batch,
                PipelineRequest::get(resources::STATUS_V4, STATUS_PATH, STATUS_PATH),
                move |status: PlatformDataDto| {
                    assert_eq!(status.id, "EUW1");
                    successes.fetch_add(1, Ordering::SeqCst);
                },
                move |_| {
                    failures.fetch_add(1, Ordering::SeqCst);
                },
            )
        };
        let first = enqueue_status("a");
        let second = enqueue_status("a");
        enqueue_status("b");
        assert_ne!(first.id(), second.id());
        assert_eq!(first.batch(), "a");

        let failures_of_a = failures.clone();
        client.enqueue(
            "a",
            PipelineRequest::get(resources::MATCH_V5, "/lol/match/v5/matches/{matchId}", MATCH_PATH),
            |_: serde_json::Value| panic!("missing match must fail"),
            move |err| {
                assert!(matches!(err, RiotApiError::DataNotFound { .. }));
                failures_of_a.fetch_add(1, Ordering::SeqCst);
            },
        );
        assert_eq!(client.pending("a"), 3);
        assert_eq!(status.hits_async().await, 0);

        let summary = client.commit("a").await;
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(successes.load(Ordering::SeqCst), 2);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert_eq!(status.hits_async().await, 2);
        assert_eq!(missing.hits_async().await, 1);
        assert_eq!(client.pending("a"), 0);
        assert_eq!(client.pending("b"), 1);

        let summary = client.commit("a").await;
        assert_eq!(summary.settled(), 0);

        let summary = client.commit("b").await;
        assert_eq!(summary.succeeded, 1);
        assert_eq!(status.hits_async().await, 3);
    }

    #[tokio::test]
    async fn deferred_calls_use_the_platform_at_dispatch_time() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(200)
                    .header("X-App-Rate-Limit", "20:1")
                    .header("X-App-Rate-Limit-Count", "1:1")
                    .json_body(status_body());
            })
            .await;
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock).build().await.unwrap();

        client.enqueue(
            "later",
            PipelineRequest::get(resources::STATUS_V4, STATUS_PATH, STATUS_PATH),
            |_: PlatformDataDto| {},
            |err| panic!("{err}"),
        );
        client.set_platform(Platform::KR);
        client.commit("later").await;

        let kr = client
            .current_limits(ApiKeyKind::Standard, Route::Platform(Platform::KR), &status_endpoint())
            .unwrap();
        assert_eq!(kr.application[&1].used, 1);
    }
}

mod replay {
    use super::*;

    #[tokio::test]
    async fn missing_fixture_fails_without_network() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(200).json_body(status_body());
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let client = builder(&server, &clock)
            .replay_dir(dir.path())
            .build()
            .await
            .unwrap();

        let err = client.status_v4().get_platform_data().await.unwrap_err();
        assert!(matches!(err, RiotApiError::ReplayDataMissing { .. }));
        assert!(err.is_request_error());
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn recorded_fixtures_are_replayed() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(STATUS_PATH);
                then.status(200).json_body(status_body());
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(0));

        let recorder = builder(&server, &clock)
            .replay_dir(dir.path())
            .save_replay(true)
            .build()
            .await
            .unwrap();
        recorder.status_v4().get_platform_data().await.unwrap();
        assert_eq!(mock.hits_async().await, 1);

        let fixtures = ReplayFixtures::new(dir.path());
        let path = fixtures.path_for(&riftcall_riot_api::Method::GET, STATUS_PATH, None);
        assert!(fixtures.exists(&path).await);

        let replayer = builder(&server, &clock)
            .replay_dir(dir.path())
            .build()
            .await
            .unwrap();
        let outcome = replayer
            .execute_raw(PipelineRequest::get(resources::STATUS_V4, STATUS_PATH, STATUS_PATH))
            .await
            .unwrap();
        assert_eq!(outcome.source, ResponseSource::Replay);
        assert_eq!(outcome.decode::<PlatformDataDto>().unwrap().name, "EU West");
        assert_eq!(mock.hits_async().await, 1);
    }
}

mod live {
    use super::*;

    fn live_client_builder() -> RiotClientBuilder {
        dotenv().ok();
        let key = env::var("RIOT_API_KEY").expect("RIOT_API_KEY not set");
        RiotClient::builder(key).platform(Platform::EUW1)
    }

    #[tokio::test]
    #[ignore = "API Key required"]
    async fn get_account_by_riot_id_returns_expected_account() {
        let client = live_client_builder().build().await.unwrap();

        let account = client
            .account_v1()
            .get_by_riot_id("Le Conservateur", "3012")
            .await
            .unwrap();

        assert_eq!(account.game_name.as_deref(), Some("Le Conservateur"));
        assert_eq!(account.tag_line.as_deref(), Some("3012"));
    }

    #[tokio::test]
    #[ignore = "API Key required"]
    async fn get_last_match_id_and_match_works() {
        let client = live_client_builder().cache_calls(true).build().await.unwrap();

        let account = client
            .account_v1()
            .get_by_riot_id("Le Conservateur", "3012")
            .await
            .unwrap();
        let last_id = client
            .match_v5()
            .get_last_match_id(&account.puuid)
            .await
            .unwrap()
            .expect("should return a match id");

        let match_data = client.match_v5().get_match(&last_id).await.unwrap();
        assert!(match_data.participant(&account.puuid).is_some());
    }

    #[tokio::test]
    #[ignore = "API Key required"]
    async fn get_leagues_does_not_error() {
        let client = live_client_builder().build().await.unwrap();

        let account = client
            .account_v1()
            .get_by_riot_id("Le Conservateur", "3012")
            .await
            .unwrap();
        let leagues = client
            .league_v4()
            .get_entries_by_puuid(&account.puuid)
            .await
            .unwrap();

        for league in &leagues {
            assert!(!league.queue_type.is_empty());
        }
    }
}
