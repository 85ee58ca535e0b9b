use crate::command::{CommandCandidate, CommandContext};
use anyhow::Result;

pub const HELP_BANNER: &[&str] = &[
    "------------------------",
    "Welcome to the console!",
    "------------------------",
    "",
    "Commands are plain functions listed in a command table with a command marker.",
    "A command takes the remaining words of the input line as its arguments.",
    "",
    "To view a list of all commands, enter 'commands'",
];

pub fn help(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<()> {
    for line in HELP_BANNER {
        ctx.print(*line);
    }
    Ok(())
}

pub fn commands(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<()> {
    ctx.print("Commands:");
    let names = ctx.registry().list_commands();
    for name in names {
        ctx.print(name);
    }
    Ok(())
}

pub fn default_commands() -> Vec<CommandCandidate> {
    vec![crate::command!(DefaultCommands, help, "help"), crate::command!(DefaultCommands, commands, "commands")]
}
