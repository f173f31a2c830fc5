use super::*;

#[test]
fn snapshot_tolerates_missing_and_extra_fields() {
    let snap: TeamSnapshot = serde_json::from_str(
        r#"{"admins":["A"],"location":"Central","point":10,"owned_stations":[]}"#,
    )
    .unwrap();
    assert_eq!(snap.admins, vec!["A"]);
    assert!(snap.players.is_empty());
    assert_eq!(snap.location, "Central");
    assert!(!snap.current_mission_finished);
    assert!(!snap.start_location_defined);
}

#[test]
fn users_payload_accepts_both_shapes() {
    let wrapped: UnknownUsersPayload =
        serde_json::from_str(r#"{"unknown_users":["drift","wanderer"]}"#).unwrap();
    assert_eq!(wrapped.into_names(), vec!["drift", "wanderer"]);

    let bare: UnknownUsersPayload = serde_json::from_str(r#"["solo"]"#).unwrap();
    assert_eq!(bare.into_names(), vec!["solo"]);
}

#[test]
fn swap_defaults_to_replace_and_serializes_lowercase() {
    let patch: Patch = serde_json::from_str(r#"{"target":"roster.admins"}"#).unwrap();
    assert_eq!(patch.swap, Swap::Replace);
    assert!(patch.html.is_none());

    let json = serde_json::to_string(&Patch::visibility(targets::STATION_SETUP, false)).unwrap();
    assert!(json.contains(r#""swap":"hide""#));
    assert!(!json.contains("html"));
}

#[test]
fn notice_builder_round_trips() {
    let notice = Notice::new(NoticeKind::Info, "Card time")
        .with_text("Draw a card before moving on.")
        .with_route("/card")
        .with_refresh();
    let json = serde_json::to_string(&notice).unwrap();
    let back: Notice = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind, NoticeKind::Info);
    assert_eq!(back.route.as_deref(), Some("/card"));
    assert!(back.refresh);
}

#[test]
fn ui_update_omits_empty_notice() {
    let update = UiUpdate::new("team", 3, "2024-01-01T00:00:00Z")
        .with_patches(vec![Patch::replace(targets::ROSTER_LABEL, "Teammates")]);
    let json = serde_json::to_string(&update).unwrap();
    assert!(!json.contains("notice"));
    assert!(json.contains(r#""seq":3"#));
}
