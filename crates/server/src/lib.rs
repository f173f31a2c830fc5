use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse},
    routing::get,
    routing::post,
    Json, Router,
};
use railside_client::GameClient;
use railside_protocol::{ActionKind, UiUpdate};
use railside_view as view;
use serde::Deserialize;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

mod page;


pub struct AppState {
    pub client: GameClient,
    pub team: String,
    pub poll_secs: u64,
    seq: AtomicU64,
}

impl AppState {
    pub fn new(client: GameClient, team: impl Into<String>, poll_secs: u64) -> Self {
        Self {
            client,
            team: team.into(),
            poll_secs,
            seq: AtomicU64::new(0),
        }
    }

    /// Stamp an update with the next process-monotonic sequence number. The
    /// page drops anything older than the newest applied per event, which
    /// closes the slow-response-overwrites-fresh-render race.
    fn stamp(&self, event: &str) -> UiUpdate {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        UiUpdate::new(event, seq, now_rfc3339())
    }
}

pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .route("/api/ui/team/{team}", get(ui_team))
        .route("/api/ui/users", get(ui_users))
        .route("/api/ui/dice/{team}", get(ui_dice))
        .route("/api/action", post(api_action))
        .with_state(state)
}

pub fn build_router(state: AppState) -> Router {
    api_router(Arc::new(state))
        // Local security: allow only loopback + Tailscale by default.
        .layer(middleware::from_fn(ip_allowlist))
        // The gateway can issue game actions for its team; a wildcard origin
        // would let any website in the operator's browser do the same.
        .layer(local_only_cors())
}

async fn health() -> &'static str {
    "ok"
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render(
        &state.team,
        state.client.base_url().as_str(),
        state.poll_secs,
    ))
}

async fn ui_team(
    State(state): State<Arc<AppState>>,
    Path(team): Path<String>,
) -> Result<Json<UiUpdate>, (StatusCode, String)> {
    let snapshot = state.client.team(&team).await.map_err(|e| {
        warn!(team = %team, error = %e, "team snapshot fetch failed");
        (StatusCode::BAD_GATEWAY, "team lookup failed".to_string())
    })?;
    Ok(Json(
        state
            .stamp("ui.team")
            .with_patches(view::render_team(&snapshot)),
    ))
}

async fn ui_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UiUpdate>, (StatusCode, String)> {
    let names = state.client.unknown_users().await.map_err(|e| {
        warn!(error = %e, "unknown-user fetch failed");
        (StatusCode::BAD_GATEWAY, "user lookup failed".to_string())
    })?;
    Ok(Json(
        state
            .stamp("ui.users")
            .with_patches(view::render_unknown_users(&names)),
    ))
}

async fn ui_dice(
    State(state): State<Arc<AppState>>,
    Path(team): Path<String>,
) -> Result<Json<UiUpdate>, (StatusCode, String)> {
    let snapshot = state.client.team(&team).await.map_err(|e| {
        warn!(team = %team, error = %e, "dice gate fetch failed");
        (StatusCode::BAD_GATEWAY, "team lookup failed".to_string())
    })?;
    Ok(Json(
        state
            .stamp("ui.dice")
            .with_notice(view::dice_gate(&snapshot)),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ActionInput {
    pub action: ActionKind,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
}

enum DispatchError {
    BadRequest(String),
    Backend(anyhow::Error),
}

/// The single action path: one gesture, one backend call, one dialog.
/// Backend trouble still answers 200 — the dialog is the error surface for
/// actions, region labels are the error surface for polls.
async fn api_action(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ActionInput>,
) -> Result<Json<UiUpdate>, (StatusCode, String)> {
    let update = state.stamp("ui.action");
    match dispatch(&state.client, &input).await {
        Ok(reply) => {
            info!(action = ?input.action, "action dispatched");
            Ok(Json(
                update.with_notice(view::interpret_reply(input.action, &reply)),
            ))
        }
        Err(DispatchError::BadRequest(msg)) => Err((StatusCode::BAD_REQUEST, msg)),
        Err(DispatchError::Backend(e)) => {
            warn!(action = ?input.action, error = %e, "action dispatch failed");
            Ok(Json(update.with_notice(view::dispatch_failed())))
        }
    }
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, DispatchError> {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DispatchError::BadRequest(format!("missing {field}")))
}

async fn dispatch(client: &GameClient, input: &ActionInput) -> Result<String, DispatchError> {
    let reply = match input.action {
        ActionKind::JoinTeam => {
            client
                .join_team(
                    required("team", &input.team)?,
                    required("player", &input.player)?,
                )
                .await
        }
        ActionKind::LeaveTeam => client.leave_team(required("player", &input.player)?).await,
        ActionKind::AddPoint => {
            let points = input
                .points
                .ok_or_else(|| DispatchError::BadRequest("missing points".to_string()))?;
            client
                .add_point(required("team", &input.team)?, view::clamp_points(points))
                .await
        }
        ActionKind::SetStation => {
            client
                .set_station(
                    required("team", &input.team)?,
                    required("station", &input.station)?,
                )
                .await
        }
        ActionKind::FinishMission => client.finish_mission(required("team", &input.team)?).await,
        ActionKind::SkipMission => client.skip_mission(required("team", &input.team)?).await,
        ActionKind::ArriveTarget => client.arrive_target(required("team", &input.team)?).await,
    };
    reply.map_err(DispatchError::Backend)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub listen: SocketAddr,
    pub backend_url: String,
    pub team: String,
    pub poll_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 39441)),
            backend_url: "http://127.0.0.1:5000".to_string(),
            team: "North Line".to_string(),
            poll_secs: 10,
        }
    }
}

/// Load the gateway config. An explicit path must parse; the default
/// location (`~/.railside/config.yaml`) may simply be absent.
pub fn load_config(explicit: Option<&FsPath>) -> anyhow::Result<GatewayConfig> {
    let (path, must_exist) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => {
            let Some(home) = dirs::home_dir() else {
                return Ok(GatewayConfig::default());
            };
            (home.join(".railside").join("config.yaml"), false)
        }
    };
    match std::fs::read_to_string(&path) {
        Ok(text) => serde_yaml::from_str(&text)
            .with_context(|| format!("parse config file: {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !must_exist => {
            Ok(GatewayConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("read config file: {}", path.display())),
    }
}

pub async fn serve(cfg: GatewayConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(cfg.listen).await?;
    serve_listener(listener, cfg, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;
    Ok(())
}

pub async fn serve_listener(
    listener: tokio::net::TcpListener,
    cfg: GatewayConfig,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<SocketAddr> {
    let client = GameClient::new(&cfg.backend_url)?;
    let state = AppState::new(client, cfg.team, cfg.poll_secs);
    let app = build_router(state);
    let addr = listener.local_addr()?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    Ok(addr)
}

async fn ip_allowlist(
    axum::extract::ConnectInfo(peer): axum::extract::ConnectInfo<SocketAddr>,
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    if is_local_peer(peer.ip()) {
        return next.run(req).await;
    }
    (StatusCode::FORBIDDEN, "forbidden").into_response()
}

/// Loopback plus the Tailscale CGNAT block (100.64.0.0/10).
fn is_local_peer(ip: IpAddr) -> bool {
    if ip.is_loopback() {
        return true;
    }
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            a == 100 && (64..=127).contains(&b)
        }
        IpAddr::V6(_) => false,
    }
}

fn local_only_cors() -> CorsLayer {
    use axum::http::header;
    use axum::http::Method;

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::predicate(|origin, _req| is_local_origin(origin)))
}

fn is_local_origin(origin: &axum::http::HeaderValue) -> bool {
    let Ok(s) = origin.to_str() else {
        return false;
    };
    ["http://", "https://"].iter().any(|scheme| {
        s.strip_prefix(scheme).is_some_and(|rest| {
            ["localhost", "127.0.0.1"].iter().any(|host| {
                rest.strip_prefix(host)
                    .is_some_and(|after| after.is_empty() || after.starts_with(':'))
            })
        })
    })
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
