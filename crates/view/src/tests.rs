use super::*;
use railside_protocol::Swap;

fn snapshot(finished: bool, location: &str, target: &str, imprisoned: bool) -> TeamSnapshot {
    TeamSnapshot {
        current_mission_finished: finished,
        location: location.to_string(),
        target_location: target.to_string(),
        is_imprisoned: imprisoned,
        ..TeamSnapshot::default()
    }
}

fn patch_html<'a>(patches: &'a [Patch], target: &str) -> &'a str {
    patches
        .iter()
        .find(|p| p.target == target)
        .and_then(|p| p.html.as_deref())
        .unwrap_or_else(|| panic!("no html patch for {target}"))
}

fn row_count(html: &str) -> usize {
    html.matches("<li").count()
}

#[test]
fn empty_rosters_render_placeholders_and_no_rows() {
    let patches = render_team(&TeamSnapshot::default());
    let admins = patch_html(&patches, targets::ROSTER_ADMINS);
    let players = patch_html(&patches, targets::ROSTER_PLAYERS);
    assert_eq!(admins, "<p>No admins found.</p>");
    assert_eq!(players, "<p>No players found.</p>");
    assert_eq!(row_count(admins), 0);
    assert_eq!(row_count(players), 0);
}

#[test]
fn rosters_render_one_row_per_entry() {
    let snap = TeamSnapshot {
        admins: vec!["A".into(), "B".into()],
        players: vec!["C".into()],
        ..TeamSnapshot::default()
    };
    let patches = render_team(&snap);
    assert_eq!(row_count(patch_html(&patches, targets::ROSTER_ADMINS)), 2);
    assert_eq!(row_count(patch_html(&patches, targets::ROSTER_PLAYERS)), 1);
}

#[test]
fn roster_names_are_escaped() {
    let snap = TeamSnapshot {
        admins: vec!["<script>x</script>".into()],
        ..TeamSnapshot::default()
    };
    let patches = render_team(&snap);
    let admins = patch_html(&patches, targets::ROSTER_ADMINS);
    assert!(!admins.contains("<script>"));
    assert!(admins.contains("&lt;script&gt;"));
}

#[test]
fn mission_phase_covers_every_input_combination() {
    // (finished, at_target, imprisoned) -> phase, with the label precedence
    // unfinished > off-target > imprisoned.
    let cases = [
        (false, false, false, MissionPhase::InProgress),
        (false, false, true, MissionPhase::InProgress),
        (false, true, false, MissionPhase::InProgress),
        (false, true, true, MissionPhase::InProgress),
        (true, false, false, MissionPhase::Moving),
        (true, false, true, MissionPhase::Moving),
        (true, true, true, MissionPhase::Imprisoned),
        (true, true, false, MissionPhase::Idle),
    ];
    for (finished, at_target, imprisoned, expected) in cases {
        let target = if at_target { "Central" } else { "Harbor" };
        let snap = snapshot(finished, "Central", target, imprisoned);
        assert_eq!(
            MissionPhase::of(&snap),
            expected,
            "finished={finished} at_target={at_target} imprisoned={imprisoned}"
        );
    }
}

#[test]
fn mission_labels_are_distinct() {
    let labels = [
        MissionPhase::InProgress.label(),
        MissionPhase::Moving.label(),
        MissionPhase::Imprisoned.label(),
        MissionPhase::Idle.label(),
    ];
    for (i, a) in labels.iter().enumerate() {
        for b in labels.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn position_label_shows_current_location() {
    let patches = render_team(&snapshot(true, "North Gate", "North Gate", false));
    assert_eq!(
        patch_html(&patches, targets::POSITION_LABEL),
        "Position: North Gate"
    );
}

#[test]
fn station_setup_visibility_follows_start_location_flag() {
    let mut snap = TeamSnapshot::default();
    let patches = render_team(&snap);
    let setup = patches
        .iter()
        .find(|p| p.target == targets::STATION_SETUP)
        .unwrap();
    assert_eq!(setup.swap, Swap::Show);

    snap.start_location_defined = true;
    let patches = render_team(&snap);
    let setup = patches
        .iter()
        .find(|p| p.target == targets::STATION_SETUP)
        .unwrap();
    assert_eq!(setup.swap, Swap::Hide);
}

#[test]
fn unknown_users_render_copy_rows() {
    let names = vec!["drifter".to_string(), "wanderer".to_string()];
    let patches = render_unknown_users(&names);
    let list = patch_html(&patches, targets::USERS_LIST);
    assert_eq!(row_count(list), 2);
    assert!(list.contains(r#"data-name="drifter""#));
    assert_eq!(patch_html(&patches, targets::USERS_LABEL), "Unknown users:");
    // Input is untouched.
    assert_eq!(names, vec!["drifter".to_string(), "wanderer".to_string()]);
}

#[test]
fn unknown_users_placeholder_when_empty() {
    let patches = render_unknown_users(&[]);
    assert_eq!(
        patch_html(&patches, targets::USERS_LABEL),
        "No drifting players found."
    );
    assert_eq!(patch_html(&patches, targets::USERS_LIST), "");
}

#[test]
fn unknown_user_names_are_attribute_escaped() {
    let names = vec![r#"a"b<c"#.to_string()];
    let patches = render_unknown_users(&names);
    let list = patch_html(&patches, targets::USERS_LIST);
    assert!(!list.contains(r#"data-name="a"b"#));
    assert!(list.contains("&quot;") || list.contains("&#34;"));
}

#[test]
fn success_tokens_yield_success_notices() {
    for token in SUCCESS_TOKENS {
        let notice = interpret_reply(ActionKind::FinishMission, token);
        assert_eq!(notice.kind, NoticeKind::Success);
        assert!(notice.refresh);
    }
}

#[test]
fn mission_actions_refresh_but_roster_actions_do_not() {
    assert!(interpret_reply(ActionKind::SkipMission, "Success").refresh);
    assert!(interpret_reply(ActionKind::ArriveTarget, "成功").refresh);
    assert!(!interpret_reply(ActionKind::JoinTeam, "Success").refresh);
    assert!(!interpret_reply(ActionKind::AddPoint, "Success").refresh);
}

#[test]
fn card_reply_opens_card_branch() {
    let notice = interpret_reply(ActionKind::FinishMission, "you drew a card!");
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.route.as_deref(), Some("/card"));
    assert!(!notice.navigate);
}

#[test]
fn other_replies_are_shown_verbatim_as_warnings() {
    let notice = interpret_reply(ActionKind::AddPoint, "Not enough points");
    assert_eq!(notice.kind, NoticeKind::Warning);
    assert_eq!(notice.title, "Not enough points");
    assert!(notice.route.is_none());
}

#[test]
fn dice_gate_routes_only_when_mission_finished() {
    let open = dice_gate(&snapshot(true, "A", "A", false));
    assert_eq!(open.route.as_deref(), Some("/dice"));
    assert!(open.navigate);

    let blocked = dice_gate(&snapshot(false, "A", "A", false));
    assert_eq!(blocked.kind, NoticeKind::Warning);
    assert!(blocked.route.is_none());
}

#[test]
fn points_clamp_to_declared_range() {
    assert_eq!(clamp_points(5), 5);
    assert_eq!(clamp_points(1_000), POINTS_MAX);
    assert_eq!(clamp_points(-1_000), POINTS_MIN);
}
