use serde::{Deserialize, Serialize};

/// Per-team state as the game backend reports it. Fetched fresh on every
/// poll cycle; fields the dashboard does not render (points, logs, owned
/// stations) are ignored on deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamSnapshot {
    #[serde(default)]
    pub admins: Vec<String>,
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub target_location: String,
    #[serde(default)]
    pub current_mission_finished: bool,
    #[serde(default)]
    pub is_imprisoned: bool,
    #[serde(default)]
    pub start_location_defined: bool,
}

/// The `/api/users` payload exists in two shapes in the wild: a bare array
/// of names, and an object wrapping it. Accept both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UnknownUsersPayload {
    Wrapped { unknown_users: Vec<String> },
    Bare(Vec<String>),
}

impl UnknownUsersPayload {
    pub fn into_names(self) -> Vec<String> {
        match self {
            Self::Wrapped { unknown_users } => unknown_users,
            Self::Bare(names) => names,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Swap {
    Replace,
    Show,
    Hide,
}

impl Default for Swap {
    fn default() -> Self {
        Self::Replace
    }
}

/// One instruction for the page's patch applier: set a region's content, or
/// toggle its visibility. `Replace` always carries the region's entire new
/// content, so stale rows cannot survive an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patch {
    pub target: String,
    #[serde(default)]
    pub swap: Swap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Patch {
    pub fn replace(target: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            swap: Swap::Replace,
            html: Some(html.into()),
        }
    }

    pub fn visibility(target: impl Into<String>, visible: bool) -> Self {
        Self {
            target: target.into(),
            swap: if visible { Swap::Show } else { Swap::Hide },
            html: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

/// A one-shot acknowledgment dialog. `route` offers a page navigation (the
/// "card time" flow); `refresh` asks the page to re-poll team state once the
/// dialog is dismissed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Navigate to `route` immediately instead of offering it in the dialog.
    #[serde(default)]
    pub navigate: bool,
    #[serde(default)]
    pub refresh: bool,
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            text: None,
            route: None,
            navigate: false,
            refresh: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_navigate(mut self) -> Self {
        self.navigate = true;
        self
    }

    pub fn with_refresh(mut self) -> Self {
        self.refresh = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiUpdate {
    pub event: String,
    /// Process-monotonic stamp. The page keeps the newest applied `seq` per
    /// event and drops anything older, so a slow response cannot overwrite a
    /// newer one.
    pub seq: u64,
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    #[serde(default)]
    pub patches: Vec<Patch>,
}

impl UiUpdate {
    pub fn new(event: impl Into<String>, seq: u64, generated_at: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            seq,
            generated_at: generated_at.into(),
            notice: None,
            patches: Vec::new(),
        }
    }

    pub fn with_patches(mut self, patches: Vec<Patch>) -> Self {
        self.patches = patches;
        self
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

/// The user gestures the dispatcher accepts. Each maps to exactly one
/// backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    JoinTeam,
    LeaveTeam,
    AddPoint,
    SetStation,
    FinishMission,
    SkipMission,
    ArriveTarget,
}

/// Region ids shared by the view layer and the embedded dashboard page.
pub mod targets {
    pub const ROSTER_LABEL: &str = "roster.label";
    pub const ROSTER_ADMINS: &str = "roster.admins";
    pub const ROSTER_PLAYERS: &str = "roster.players";
    pub const USERS_LABEL: &str = "users.label";
    pub const USERS_LIST: &str = "users.list";
    pub const MISSION_LABEL: &str = "mission.label";
    pub const POSITION_LABEL: &str = "position.label";
    pub const STATION_SETUP: &str = "station.setup";
}

#[cfg(test)]
mod tests;
