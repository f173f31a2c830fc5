//! Thin client for the game backend. Reads return typed snapshots; actions
//! return the backend's plain-text reply untouched, because business
//! rejections are opaque strings the user sees verbatim.

use anyhow::Context;
use railside_protocol::{TeamSnapshot, UnknownUsersPayload};
use reqwest::{Client, Url};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone)]
pub struct GameClient {
    http: Client,
    base: Url,
}

impl GameClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("parse backend url: {base_url}"))?;
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Fresh team snapshot; non-2xx is an error (the caller swaps the region
    /// label for its fixed error text).
    pub async fn team(&self, team: &str) -> anyhow::Result<TeamSnapshot> {
        let url = self.endpoint(&["team", team])?;
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("fetch {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("team fetch http={}", status.as_u16());
        }
        resp.json::<TeamSnapshot>()
            .await
            .context("decode team snapshot")
    }

    pub async fn unknown_users(&self) -> anyhow::Result<Vec<String>> {
        let url = self.endpoint(&["users"])?;
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("fetch {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("users fetch http={}", status.as_u16());
        }
        let payload = resp
            .json::<UnknownUsersPayload>()
            .await
            .context("decode unknown-user list")?;
        Ok(payload.into_names())
    }

    pub async fn join_team(&self, team: &str, player: &str) -> anyhow::Result<String> {
        self.action_text(&["join_team", team, player]).await
    }

    pub async fn leave_team(&self, player: &str) -> anyhow::Result<String> {
        self.action_text(&["leave_team", player]).await
    }

    pub async fn add_point(&self, team: &str, points: i64) -> anyhow::Result<String> {
        self.action_text(&["add_point", team, &points.to_string()])
            .await
    }

    pub async fn set_station(&self, team: &str, station: &str) -> anyhow::Result<String> {
        self.action_text(&["set_station", team, station]).await
    }

    pub async fn finish_mission(&self, team: &str) -> anyhow::Result<String> {
        self.action_text(&["finish_mission", team]).await
    }

    pub async fn skip_mission(&self, team: &str) -> anyhow::Result<String> {
        self.action_text(&["skip_mission", team]).await
    }

    pub async fn arrive_target(&self, team: &str) -> anyhow::Result<String> {
        self.action_text(&["arrive_target", team]).await
    }

    /// One action call, one trimmed reply. The status code is ignored on
    /// purpose: the backend phrases rejections in the body.
    async fn action_text(&self, segments: &[&str]) -> anyhow::Result<String> {
        let url = self.endpoint(segments)?;
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("call {url}"))?;
        let text = resp.text().await.context("read action reply")?;
        Ok(text.trim().to_string())
    }

    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("backend url cannot be a base"))?;
            parts.pop_if_empty().push("api");
            for segment in segments {
                parts.push(&sanitize_segment(segment)?);
            }
        }
        Ok(url)
    }
}

/// User-supplied names end up as path segments on the backend, where a path
/// separator would change which endpoint gets hit. Separators are replaced
/// here; everything else is percent-encoded by the URL builder.
pub fn sanitize_segment(raw: &str) -> anyhow::Result<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        anyhow::bail!("empty path segment");
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests;
