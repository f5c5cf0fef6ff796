use leagues_core::model::now_ms;
use leagues_core::SessionState;

use crate::context::Context;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open()?;
    let status = ctx.app.status(now_ms());

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    match &status.user_id {
        Some(user) => println!("Signed in as {user}"),
        None => println!("Not signed in (goals are stored on this machine)"),
    }
    let name = status.goal_name.as_deref().unwrap_or("-");
    println!("Goal:     {name}");
    println!("Total:    {}", status.live_total);
    println!(
        "Leagues:  {} ({:.0}% from {} to {})",
        status.leagues,
        status.progress.percent,
        status.progress.previous_tier,
        status.progress.next_tier
    );
    match status.session {
        SessionState::Idle => println!("Session:  idle"),
        SessionState::Running => println!("Session:  running {}", status.elapsed),
        SessionState::Paused => println!("Session:  paused at {}", status.elapsed),
    }
    Ok(())
}
