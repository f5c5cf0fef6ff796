//! Log feed: a goal's logs, newest first, ready for display.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use crate::model::{format_hms, format_leagues, Goal};
use crate::storage::DurationStyle;

pub const EMPTY_FEED: &str = "No logs yet. Start walking!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    pub timestamp: DateTime<Utc>,
    pub duration_secs: u64,
    /// `HH:MM:SS` or one-decimal leagues, per the requested style.
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FeedEntry {
    /// One line of text, e.g. `2026-10-18 09:30 – Walked 0.5 Leagues – Chapter 3`.
    pub fn render_line(&self, style: DurationStyle) -> String {
        let when = self.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let what = match style {
            DurationStyle::Clock => format!("Worked {}", self.duration),
            DurationStyle::Leagues => format!("Walked {} Leagues", self.duration),
        };
        match &self.note {
            Some(note) => format!("{when} – {what} – {note}"),
            None => format!("{when} – {what}"),
        }
    }
}

pub struct LogFeed;

impl LogFeed {
    pub fn entries(goal: &Goal, style: DurationStyle) -> Vec<FeedEntry> {
        let mut logs: Vec<_> = goal.logs.iter().collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        logs.into_iter()
            .map(|log| FeedEntry {
                timestamp: Utc
                    .timestamp_millis_opt(log.timestamp)
                    .single()
                    .unwrap_or_default(),
                duration_secs: log.duration_sec,
                duration: match style {
                    DurationStyle::Clock => format_hms(log.duration_sec),
                    DurationStyle::Leagues => format_leagues(log.duration_sec),
                },
                note: (!log.note.is_empty()).then(|| log.note.clone()),
            })
            .collect()
    }

    pub fn render(goal: &Goal, style: DurationStyle) -> Vec<String> {
        let entries = Self::entries(goal, style);
        if entries.is_empty() {
            return vec![EMPTY_FEED.to_string()];
        }
        entries.iter().map(|e| e.render_line(style)).collect()
    }
}
