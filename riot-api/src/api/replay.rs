//! Recorded responses served instead of live calls, for deterministic runs.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::request::{Method, short_digest};
use super::transport::ResponseHeaders;
use crate::types::RiotApiResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: ResponseHeaders,
    pub body: String,
}

impl RecordedResponse {
    pub fn body_bytes(&self) -> Bytes {
        Bytes::from(self.body.clone())
    }
}

/// Directory of JSON fixtures, one file per method, path, query and body.
#[derive(Debug, Clone)]
pub struct ReplayFixtures {
    dir: PathBuf,
}

impl ReplayFixtures {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `GET_lol_match_v5_matches_EUW1_1_q1a2b3c.json`
    pub fn path_for(&self, method: &Method, path_and_query: &str, body: Option<&[u8]>) -> PathBuf {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };

        let mut name = format!("{}_{}", method.as_str(), sanitize(path));
        if let Some(query) = query {
            name.push_str("_q");
            name.push_str(&short_digest(query.as_bytes()));
        }
        if let Some(body) = body {
            name.push_str("_b");
            name.push_str(&short_digest(body));
        }
        name.push_str(".json");

        self.dir.join(name)
    }

    pub async fn load(&self, path: &Path) -> RiotApiResponse<Option<RecordedResponse>> {
        match tokio::fs::read(path).await {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    pub async fn save(&self, path: &Path, response: &RecordedResponse) -> RiotApiResponse<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let raw = serde_json::to_vec_pretty(response)?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }
}

fn sanitize(path: &str) -> String {
    path.trim_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
