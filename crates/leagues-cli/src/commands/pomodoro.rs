//! Interactive pomodoro loop.
//!
//! Commands are read from stdin without blocking the one-second ticker.
//! Ticks missed while the process was stalled are delivered in a burst so
//! the countdown catches up.

use std::io::Write;
use std::time::Duration;

use leagues_core::model::{format_mmss, now_ms};
use leagues_core::{App, Config, Event, PomodoroPhase};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::context::Context;

const HELP: &str = "[f] focus  [b] break  [w] back to work  [s] stop  [q] quit";

pub fn run(
    focus_minutes: Option<u32>,
    break_minutes: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if let Some(m) = focus_minutes {
        config.pomodoro.focus_minutes = m;
    }
    if let Some(m) = break_minutes {
        config.pomodoro.break_minutes = m;
    }
    let mut ctx = Context::open_with(config, None)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(drive(&mut ctx.app))
}

async fn drive(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    // The first tick completes immediately.
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let durations = app.pomodoro().durations();
    eprintln!(
        "focus {}, break {}\n{HELP}",
        format_mmss(durations.focus_secs),
        format_mmss(durations.break_secs)
    );
    report(&app.start_focus(now_ms())?);
    render(app);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                report(&app.tick(now_ms())?);
                render(app);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let events = match line.trim() {
                    "f" => app.start_focus(now_ms())?,
                    "b" => app.take_break(now_ms())?,
                    "w" => app.back_to_work(now_ms())?,
                    "s" => app.stop_pomodoro(now_ms())?,
                    "q" => break,
                    "" => Vec::new(),
                    other => {
                        eprintln!("\nunknown command: {other}\n{HELP}");
                        Vec::new()
                    }
                };
                report(&events);
                render(app);
            }
            _ = &mut ctrl_c => break,
        }
    }

    report(&app.stop_pomodoro(now_ms())?);
    println!();
    Ok(())
}

fn render(app: &App) {
    let label = match app.pomodoro().phase() {
        PomodoroPhase::Idle => "Idle ",
        PomodoroPhase::Focus => "Focus",
        PomodoroPhase::Break => "Break",
    };
    print!("\r{label} {} ", format_mmss(app.pomodoro().seconds_remaining()));
    let _ = std::io::stdout().flush();
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::PomodoroChanged { to, automatic, .. } => {
                let how = if *automatic { "time's up" } else { "ok" };
                println!("\n{how}: {to:?}");
            }
            Event::SessionPaused { elapsed_secs, .. } => {
                println!("session paused at {}s", elapsed_secs);
            }
            Event::SessionUnpaused { elapsed_secs, .. } => {
                println!("session resumed at {}s", elapsed_secs);
            }
            _ => {}
        }
    }
}
