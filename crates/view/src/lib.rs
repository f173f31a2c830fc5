//! Everything the dashboard decides is decided here, as pure functions over
//! a [`TeamSnapshot`]: region content, the mission label, how an action
//! reply turns into a dialog. The page applies the resulting patches and
//! nothing else, so all of this is testable without a browser.

use railside_protocol::{targets, ActionKind, Notice, NoticeKind, Patch, TeamSnapshot};

/// Bounds of the points slider; the gateway clamps with the same values the
/// page controls declare.
pub const POINTS_MIN: i64 = -100;
pub const POINTS_MAX: i64 = 100;

/// Exact-match tokens the backend uses for a successful action reply.
pub const SUCCESS_TOKENS: [&str; 2] = ["Success", "成功"];

const CARD_MARKER: &str = "card";

const NO_ADMINS: &str = "No admins found.";
const NO_PLAYERS: &str = "No players found.";
const NO_UNKNOWN_USERS: &str = "No drifting players found.";

/// Render a full team snapshot into region patches. Total over empty
/// collections, and every region is replaced wholesale.
pub fn render_team(snapshot: &TeamSnapshot) -> Vec<Patch> {
    vec![
        Patch::replace(targets::ROSTER_LABEL, "Teammates"),
        Patch::replace(
            targets::ROSTER_ADMINS,
            roster_list("Admins", &snapshot.admins, NO_ADMINS),
        ),
        Patch::replace(
            targets::ROSTER_PLAYERS,
            roster_list("Players", &snapshot.players, NO_PLAYERS),
        ),
        Patch::replace(
            targets::MISSION_LABEL,
            format!("Status: {}", MissionPhase::of(snapshot).label()),
        ),
        Patch::replace(
            targets::POSITION_LABEL,
            format!(
                "Position: {}",
                html_escape::encode_text(&snapshot.location)
            ),
        ),
        // The setup control disappears once a starting station exists.
        Patch::visibility(targets::STATION_SETUP, !snapshot.start_location_defined),
    ]
}

fn roster_list(heading: &str, names: &[String], placeholder: &str) -> String {
    if names.is_empty() {
        return format!("<p>{placeholder}</p>");
    }
    let mut out = format!("<h3>{heading}</h3><ul>");
    for name in names {
        out.push_str("<li>");
        out.push_str(&html_escape::encode_text(name));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

/// Render the not-yet-assigned player list. Rows carry the raw name in a
/// `data-name` attribute so the page can copy it to the clipboard.
pub fn render_unknown_users(names: &[String]) -> Vec<Patch> {
    if names.is_empty() {
        return vec![
            Patch::replace(targets::USERS_LABEL, NO_UNKNOWN_USERS),
            Patch::replace(targets::USERS_LIST, ""),
        ];
    }
    let mut rows = String::from("<ul>");
    for name in names {
        rows.push_str(&format!(
            "<li class=\"copy\" data-name=\"{}\">{}</li>",
            html_escape::encode_double_quoted_attribute(name),
            html_escape::encode_text(name),
        ));
    }
    rows.push_str("</ul>");
    vec![
        Patch::replace(targets::USERS_LABEL, "Unknown users:"),
        Patch::replace(targets::USERS_LIST, rows),
    ]
}

/// The four mutually exclusive states the mission label can show. Derived
/// from scratch on every poll; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionPhase {
    InProgress,
    Moving,
    Imprisoned,
    Idle,
}

impl MissionPhase {
    /// Precedence: an unfinished mission dominates, then being off-target,
    /// then imprisonment.
    pub fn of(snapshot: &TeamSnapshot) -> Self {
        if !snapshot.current_mission_finished {
            Self::InProgress
        } else if snapshot.location != snapshot.target_location {
            Self::Moving
        } else if snapshot.is_imprisoned {
            Self::Imprisoned
        } else {
            Self::Idle
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "mission in progress, finish it before moving on",
            Self::Moving => "moving, head to the target station and confirm arrival",
            Self::Imprisoned => "imprisoned, wait out the countdown and roll the dice",
            Self::Idle => "no active mission, roll the dice",
        }
    }
}

/// Turn a backend action reply into the dialog to show. Success is an exact
/// token match, a reply mentioning a card opens the card-time branch, and
/// anything else is shown verbatim as a warning.
pub fn interpret_reply(action: ActionKind, reply: &str) -> Notice {
    let reply = reply.trim();
    if SUCCESS_TOKENS.contains(&reply) {
        let notice = Notice::new(NoticeKind::Success, success_title(action));
        if refreshes_mission(action) {
            return notice.with_refresh();
        }
        return notice;
    }
    if reply.contains(CARD_MARKER) {
        return Notice::new(NoticeKind::Info, "Card time")
            .with_text("Draw a card before moving on.")
            .with_route("/card")
            .with_refresh();
    }
    Notice::new(NoticeKind::Warning, reply)
}

/// The dialog for a failed dispatch (network error, backend down). The
/// reply never arrived, so there is nothing to show verbatim.
pub fn dispatch_failed() -> Notice {
    Notice::new(NoticeKind::Error, "Request failed")
        .with_text("Could not reach the game server. Try again shortly.")
}

/// Gate in front of the dice page: only an idle team may roll.
pub fn dice_gate(snapshot: &TeamSnapshot) -> Notice {
    if snapshot.current_mission_finished {
        Notice::new(NoticeKind::Info, "Dice time")
            .with_route("/dice")
            .with_navigate()
    } else {
        Notice::new(NoticeKind::Warning, "Finish the mission first")
            .with_text("The dice unlock once the current mission is done.")
    }
}

pub fn clamp_points(points: i64) -> i64 {
    points.clamp(POINTS_MIN, POINTS_MAX)
}

fn success_title(action: ActionKind) -> &'static str {
    match action {
        ActionKind::JoinTeam => "Joined the team",
        ActionKind::LeaveTeam => "Left the team",
        ActionKind::AddPoint => "Points recorded",
        ActionKind::SetStation => "Starting station set",
        ActionKind::FinishMission => "Mission finished",
        ActionKind::SkipMission => "Mission skipped",
        ActionKind::ArriveTarget => "Arrival confirmed",
    }
}

/// Actions whose outcome changes the mission label right away; the page
/// re-polls once their dialog closes instead of waiting for the next tick.
fn refreshes_mission(action: ActionKind) -> bool {
    matches!(
        action,
        ActionKind::FinishMission | ActionKind::SkipMission | ActionKind::ArriveTarget
    )
}

#[cfg(test)]
mod tests;
