use super::*;
use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;

async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> GameClient {
    GameClient::new(&format!("http://{addr}")).unwrap()
}

#[test]
fn sanitize_replaces_path_separators() {
    assert_eq!(sanitize_segment("north/east\\crew").unwrap(), "north_east_crew");
    assert_eq!(sanitize_segment("  plain name ").unwrap(), "plain name");
    assert!(sanitize_segment("   ").is_err());
}

#[test]
fn endpoint_percent_encodes_user_segments() {
    let client = GameClient::new("http://127.0.0.1:9/").unwrap();
    let url = client.endpoint(&["team", "mad hatter/7"]).unwrap();
    assert_eq!(url.path(), "/api/team/mad%20hatter_7");
}

#[tokio::test]
async fn team_read_decodes_snapshot() {
    let router = Router::new().route(
        "/api/team/{team}",
        get(|Path(team): Path<String>| async move {
            Json(serde_json::json!({
                "admins": ["A"],
                "players": ["B", "C"],
                "location": "Central",
                "target_location": "Harbor",
                "current_mission_finished": true,
                "is_imprisoned": false,
                "start_location_defined": true,
                "point": 42,
                "name": team,
            }))
        }),
    );
    let addr = spawn_stub(router).await;

    let snap = client_for(addr).team("North").await.unwrap();
    assert_eq!(snap.admins, vec!["A"]);
    assert_eq!(snap.players.len(), 2);
    assert!(snap.current_mission_finished);
    assert_eq!(snap.target_location, "Harbor");
}

#[tokio::test]
async fn users_read_accepts_wrapped_payload() {
    let router = Router::new().route(
        "/api/users",
        get(|| async { Json(serde_json::json!({ "unknown_users": ["drifter"] })) }),
    );
    let addr = spawn_stub(router).await;

    let names = client_for(addr).unknown_users().await.unwrap();
    assert_eq!(names, vec!["drifter"]);
}

#[tokio::test]
async fn action_reply_is_trimmed_and_segments_decoded() {
    let router = Router::new().route(
        "/api/join_team/{team}/{player}",
        get(|Path((team, player)): Path<(String, String)>| async move {
            format!("  joined {player} to {team}\n")
        }),
    );
    let addr = spawn_stub(router).await;

    let reply = client_for(addr)
        .join_team("North", "mad hatter")
        .await
        .unwrap();
    assert_eq!(reply, "joined mad hatter to North");
}

#[tokio::test]
async fn non_success_status_fails_reads_but_not_actions() {
    let router = Router::new()
        .route(
            "/api/team/{team}",
            get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/api/finish_mission/{team}",
            get(|| async { (axum::http::StatusCode::CONFLICT, "mission already done") }),
        );
    let addr = spawn_stub(router).await;
    let client = client_for(addr);

    assert!(client.team("North").await.is_err());
    // Business rejections arrive as body text regardless of status.
    let reply = client.finish_mission("North").await.unwrap();
    assert_eq!(reply, "mission already done");
}
