pub mod auth;
pub mod config;
pub mod goal;
pub mod log;
pub mod pomodoro;
pub mod reset;
pub mod session;
pub mod status;

use leagues_core::Event;

/// Print an event as one line of JSON.
pub fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
