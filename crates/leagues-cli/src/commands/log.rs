use clap::ValueEnum;
use leagues_core::feed::EMPTY_FEED;
use leagues_core::storage::DurationStyle;
use leagues_core::LogFeed;

use crate::context::Context;

#[derive(Clone, Copy, ValueEnum)]
pub enum Style {
    /// HH:MM:SS
    Clock,
    /// One-decimal leagues
    Leagues,
}

impl From<Style> for DurationStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Clock => DurationStyle::Clock,
            Style::Leagues => DurationStyle::Leagues,
        }
    }
}

pub fn run(style: Option<DurationStyle>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open()?;
    let style = style.unwrap_or(ctx.app.config().display.duration_style);
    let Some(goal) = ctx.app.goals().current() else {
        println!("{EMPTY_FEED}");
        return Ok(());
    };

    if json {
        let entries = LogFeed::entries(goal, style);
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for line in LogFeed::render(goal, style) {
            println!("{line}");
        }
    }
    Ok(())
}
