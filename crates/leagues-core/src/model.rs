//! Goals, logs and the active-session marker, plus the time and leagues
//! formatting shared by every front end.
//!
//! Stored time is always whole seconds. Leagues are a display unit only:
//! one league is one hour of accumulated time.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seconds in one league.
pub const SECS_PER_LEAGUE: u64 = 3600;

/// League milestones, in leagues.
pub const TIERS: [u64; 4] = [20, 100, 1_000, 10_000];

/// Name given to the goal created when the store is empty.
pub const STARTER_GOAL_NAME: &str = "My First Goal";

/// One completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Event time, epoch milliseconds.
    pub timestamp: i64,
    pub duration_sec: u64,
    #[serde(default)]
    pub note: String,
}

/// A named accumulation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    /// Accumulated seconds; always the sum of `logs[*].duration_sec`.
    #[serde(default)]
    pub total_time: u64,
    #[serde(default)]
    pub logs: Vec<Log>,
    #[serde(default)]
    pub created: i64,
}

impl Goal {
    pub fn new(name: impl Into<String>, created: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            total_time: 0,
            logs: Vec::new(),
            created,
        }
    }

    pub fn leagues(&self) -> f64 {
        leagues(self.total_time)
    }

    pub fn progress(&self) -> LeagueProgress {
        LeagueProgress::for_secs(self.total_time)
    }
}

/// Persisted record of an in-progress session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSessionMarker {
    pub goal_id: String,
    /// Epoch milliseconds. Shifted forward when a pause ends.
    pub start_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<i64>,
}

/// What a backend persists: the goal list and the current pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub current_goal_id: Option<String>,
}

/// Position on the tier ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeagueProgress {
    pub leagues: f64,
    pub previous_tier: u64,
    pub next_tier: u64,
    /// 0.0 ..= 100.0 between `previous_tier` and `next_tier`.
    pub percent: f64,
}

impl LeagueProgress {
    pub fn for_secs(total_secs: u64) -> Self {
        let leagues = leagues(total_secs);
        let top = TIERS[TIERS.len() - 1];
        let next_tier = TIERS
            .iter()
            .copied()
            .find(|&t| t as f64 > leagues)
            .unwrap_or(top);
        let previous_tier = TIERS
            .iter()
            .rev()
            .copied()
            .find(|&t| t as f64 <= leagues)
            .unwrap_or(0);

        let percent = if next_tier == previous_tier {
            100.0
        } else {
            let span = (next_tier - previous_tier) as f64;
            ((leagues - previous_tier as f64) / span * 100.0).clamp(0.0, 100.0)
        };

        Self {
            leagues,
            previous_tier,
            next_tier,
            percent,
        }
    }
}

pub fn leagues(secs: u64) -> f64 {
    secs as f64 / SECS_PER_LEAGUE as f64
}

/// Leagues rounded to one decimal, e.g. `"2.5"`.
pub fn format_leagues(secs: u64) -> String {
    format!("{:.1}", leagues(secs))
}

/// Zero-padded `HH:MM:SS`. Hours are not capped at 99.
pub fn format_hms(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Zero-padded `MM:SS`, used for the pomodoro countdown.
pub fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whole seconds between two epoch-ms instants, floored, never negative.
pub fn whole_secs_between(start_ms: i64, end_ms: i64) -> u64 {
    (end_ms.saturating_sub(start_ms).max(0) / 1000) as u64
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_is_zero_padded() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(125), "00:02:05");
        assert_eq!(format_hms(3600 * 101 + 61), "101:01:01");
    }

    #[test]
    fn mmss_for_pomodoro() {
        assert_eq!(format_mmss(1500), "25:00");
        assert_eq!(format_mmss(59), "00:59");
    }

    #[test]
    fn leagues_round_to_one_decimal() {
        assert_eq!(format_leagues(0), "0.0");
        assert_eq!(format_leagues(5400), "1.5");
        assert_eq!(format_leagues(125), "0.0");
        assert_eq!(format_leagues(3600 * 20), "20.0");
    }

    #[test]
    fn elapsed_floors_and_clamps() {
        assert_eq!(whole_secs_between(0, 1999), 1);
        assert_eq!(whole_secs_between(0, 30_000), 30);
        assert_eq!(whole_secs_between(5_000, 1_000), 0);
    }

    #[test]
    fn progress_below_first_tier() {
        let p = LeagueProgress::for_secs(10 * 3600);
        assert_eq!(p.previous_tier, 0);
        assert_eq!(p.next_tier, 20);
        assert!((p.percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn progress_on_a_tier_boundary() {
        let p = LeagueProgress::for_secs(20 * 3600);
        assert_eq!(p.previous_tier, 20);
        assert_eq!(p.next_tier, 100);
        assert_eq!(p.percent, 0.0);
    }

    #[test]
    fn progress_past_the_top_tier() {
        let p = LeagueProgress::for_secs(20_000 * 3600);
        assert_eq!(p.next_tier, 10_000);
        assert_eq!(p.previous_tier, 10_000);
        assert_eq!(p.percent, 100.0);
    }

    #[test]
    fn goal_json_uses_camel_case() {
        let mut goal = Goal::new("Reading", 1);
        goal.id = "g1".into();
        goal.total_time = 125;
        goal.logs.push(Log {
            timestamp: 2,
            duration_sec: 125,
            note: "Chapter 3".into(),
        });
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["totalTime"], 125);
        assert_eq!(json["logs"][0]["durationSec"], 125);
        assert_eq!(json["created"], 1);
    }

    #[test]
    fn marker_without_pause_field_loads() {
        let marker: ActiveSessionMarker =
            serde_json::from_str(r#"{"goalId":"g1","startTime":1000}"#).unwrap();
        assert_eq!(marker.goal_id, "g1");
        assert_eq!(marker.paused_at, None);
        let back = serde_json::to_string(&marker).unwrap();
        assert!(!back.contains("pausedAt"));
    }
}
