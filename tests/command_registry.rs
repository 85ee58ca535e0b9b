use anyhow::Result;
use kestrel_console::builtin::default_commands;
use kestrel_console::command::{ParamType, Receiver};
use kestrel_console::{command, CommandCandidate, CommandContext, CommandError, CommandMarker, CommandRegistry};

fn show_logs(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
    ctx.print(format!("logs {}", args.len()));
    Ok(())
}

fn show_errors(ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<()> {
    ctx.print("errors");
    Ok(())
}

fn spawn(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
    ctx.print(args.join(","));
    Ok(())
}

fn table() -> Vec<CommandCandidate> {
    let mut table = default_commands();
    table.push(command!(DebugCommands, show_logs, "show", "logs"));
    table.push(command!(DebugCommands, show_errors, "Show", "Errors"));
    table.push(command!(DebugCommands, spawn, "spawn"));
    table
}

#[test]
fn every_key_resolves_with_trailing_args() {
    let registry = CommandRegistry::from_candidates(&table()).expect("build registry");
    for name in registry.list_commands() {
        let resolution = registry.resolve(&format!("{name} x y")).expect("resolve listed command");
        assert_eq!(resolution.display_name(), name);
        assert_eq!(resolution.args, vec!["x".to_string(), "y".to_string()], "args for '{name}'");
    }
}

#[test]
fn show_subcommands_resolve_but_bare_show_does_not() {
    let registry = CommandRegistry::from_candidates(&table()).expect("build registry");
    let logs = registry.resolve("show logs").expect("show logs");
    assert_eq!(logs.key, "show%logs");
    assert!(logs.args.is_empty());
    assert_eq!(registry.resolve("SHOW ERRORS").expect("show errors").key, "show%errors");
    assert!(matches!(registry.resolve("show"), Err(CommandError::NotFound { .. })));
}

#[test]
fn resolved_handler_receives_lowercased_args() {
    let registry = CommandRegistry::from_candidates(&table()).expect("build registry");
    let resolution = registry.resolve("Spawn Crate AT 3").expect("resolve spawn");
    let mut ctx = CommandContext::new(&registry);
    registry.invoke(&resolution, &mut ctx).expect("invoke spawn");
    assert_eq!(ctx.into_output(), vec![("crate,at,3".to_string(), String::new())]);
}

#[test]
fn commands_builtin_lists_display_names() {
    let registry = CommandRegistry::from_candidates(&table()).expect("build registry");
    let resolution = registry.resolve("commands").expect("resolve commands");
    let mut ctx = CommandContext::new(&registry);
    registry.invoke(&resolution, &mut ctx).expect("invoke commands");
    let lines: Vec<String> = ctx.into_output().into_iter().map(|(message, _)| message).collect();
    assert_eq!(lines, vec!["Commands:", "commands", "help", "show errors", "show logs", "spawn"]);
}

#[test]
fn colliding_table_rows_fail_discovery() {
    let mut table = table();
    table.push(command!(OtherCommands, spawn, "SPAWN"));
    let err = CommandRegistry::from_candidates(&table).unwrap_err();
    assert!(matches!(err, CommandError::DuplicateCommand { ref key } if key == "spawn"), "{err}");
}

#[test]
fn misshaped_rows_are_skipped_without_breaking_the_rest() {
    let mut table = table();
    let mut instance = CommandCandidate::new("Player", "teleport", CommandMarker::new("teleport"), spawn);
    instance.signature.receiver = Receiver::Instance;
    let mut typed = CommandCandidate::new("Player", "heal", CommandMarker::new("heal"), spawn);
    typed.signature.params = vec![ParamType::Integer];
    table.push(instance);
    table.push(typed);

    let mut registry = CommandRegistry::new();
    let report = registry.discover(&table).expect("discover");
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.registered.len(), 5);
    assert!(registry.resolve("teleport").is_err());
    assert!(registry.resolve("heal 10").is_err());
    assert!(registry.resolve("spawn").is_ok());
}
