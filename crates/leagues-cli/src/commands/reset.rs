use super::print_event;
use crate::context::Context;
use crate::prompt::TerminalPrompter;

pub fn run(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::open()?;
    let mut prompter = TerminalPrompter::new().assume_yes(yes);
    match ctx.app.reset_everything(&mut prompter)? {
        Some(event) => print_event(&event)?,
        None => eprintln!("cancelled"),
    }
    Ok(())
}
