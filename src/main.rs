use anyhow::{anyhow, bail, Context, Result};
use kestrel_console::builtin::default_commands;
use kestrel_console::cli::CliOverrides;
use kestrel_console::config::DEFAULT_CONFIG_PATH;
use kestrel_console::display::timestamp_label;
use kestrel_console::log_bridge::{console_layer, BuildPhase};
use kestrel_console::{
    command, prefs, CommandCandidate, CommandContext, Console, ConsoleConfig, EntryCategories, FeedEvent,
    FilterState, TextSize, TimestampMode,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    if let Err(err) = run() {
        eprintln!("[kestrel-console] error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliOverrides::parse_from_env()?;
    let config_path = cli.config_path().cloned().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let (mut config, config_err) = match ConsoleConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (ConsoleConfig::default(), Some(err)),
    };
    config.apply_overrides(&cli.into_config_overrides());

    let build_phase = BuildPhase::new();
    let (layer, receiver) = console_layer(build_phase.clone());
    let stderr_layer = config
        .echo_stderr
        .then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false));
    tracing_subscriber::registry().with(layer).with(stderr_layer).try_init().context("installing log subscriber")?;
    if let Some(err) = config_err {
        tracing::warn!("[console] {err:#}. Using the default console config.");
    }

    let mut table = default_commands();
    table.extend(demo_commands());
    let mut console = Console::new(&config, prefs::load_or_default(&config.prefs_path), &table)?;
    console.attach_log_source(receiver);
    println!("[kestrel-console] {} commands loaded. Type 'help', ':quit' to leave.", console.registry().len());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut frame = 0u64;
    loop {
        console.pump_logs();
        print_feed_changes(&mut console);
        print!("> ");
        io::stdout().flush().context("flushing prompt")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("reading console input")?;
        frame += 1;
        console.set_frame(frame);

        if let Some(directive) = line.trim().strip_prefix(':') {
            match apply_directive(&mut console, &build_phase, directive) {
                Ok(Directive::Quit) => break,
                Ok(Directive::FilterChanged) => {
                    prefs::save(&config.prefs_path, &console.feed().filter())?;
                }
                Ok(Directive::Handled) => {}
                Err(err) => eprintln!("[kestrel-console] {err}"),
            }
            continue;
        }
        if let Err(err) = console.submit(&line) {
            console.pump_logs();
            print_feed_changes(&mut console);
            eprintln!("[kestrel-console] {err:?}");
        }
    }

    console.pump_logs();
    print_feed_changes(&mut console);
    console.detach_log_source();
    Ok(())
}

fn print_feed_changes(console: &mut Console) {
    let events = console.feed_mut().drain_events();
    let feed = console.feed();
    let filter = feed.filter();
    for event in events {
        match event {
            FeedEvent::Appended { index } => {
                if let Some(entry) = feed.filtered_get(index) {
                    println!("{}", format_entry(entry, filter));
                }
            }
            FeedEvent::Rebuilt => {
                println!("---- {} of {} entries ----", feed.filtered_len(), feed.len());
                for entry in feed.filtered() {
                    println!("{}", format_entry(entry, filter));
                }
            }
        }
    }
}

fn format_entry(entry: &kestrel_console::LogEntry, filter: FilterState) -> String {
    match timestamp_label(entry, filter.timestamp_mode) {
        Some(label) => format!("{} {entry}", label.text()),
        None => entry.to_string(),
    }
}

enum Directive {
    Quit,
    FilterChanged,
    Handled,
}

// Host-side controls standing in for the editor's right-click menu.
fn apply_directive(console: &mut Console, build_phase: &BuildPhase, directive: &str) -> Result<Directive> {
    let words: Vec<String> = directive.split_whitespace().map(str::to_ascii_lowercase).collect();
    let words: Vec<&str> = words.iter().map(String::as_str).collect();
    let mut filter = console.feed().filter();
    match words.as_slice() {
        ["quit"] | ["exit"] => return Ok(Directive::Quit),
        ["clear"] => {
            console.clear(true);
            return Ok(Directive::Handled);
        }
        ["build", state] => {
            build_phase.set(parse_on_off(state)?);
            return Ok(Directive::Handled);
        }
        ["show", category, state] => {
            let category = match *category {
                "logs" | "info" => EntryCategories::INFO,
                "warnings" => EntryCategories::WARNING,
                "errors" => EntryCategories::ERROR,
                "commands" => EntryCategories::COMMANDS,
                other => bail!("Unknown category '{other}'. Use logs, warnings, errors or commands."),
            };
            filter.set_shown(category, parse_on_off(state)?);
        }
        ["timestamp", mode] => {
            filter.timestamp_mode = TimestampMode::ALL
                .into_iter()
                .find(|candidate| candidate.label().eq_ignore_ascii_case(mode))
                .ok_or_else(|| anyhow!("Unknown timestamp mode '{mode}'. Use none, time or frame."))?;
        }
        ["text", size] => {
            filter.text_size = TextSize::ALL
                .into_iter()
                .find(|candidate| candidate.label().replace(' ', "").eq_ignore_ascii_case(size))
                .ok_or_else(|| anyhow!("Unknown text size '{size}'. Use small, medium, large or extralarge."))?;
        }
        _ => bail!(
            "Unknown directive ':{directive}'. Try :quit, :clear, :build on|off, :show <category> on|off, :timestamp <mode>, :text <size>."
        ),
    }
    console.set_filter(filter);
    Ok(Directive::FilterChanged)
}

fn parse_on_off(value: &str) -> Result<bool> {
    match value {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => bail!("Expected on or off, got '{other}'"),
    }
}

fn echo(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
    ctx.print(args.join(" "));
    Ok(())
}

fn log_info(_ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
    tracing::info!("{}", args.join(" "));
    Ok(())
}

fn log_warn(_ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
    tracing::warn!("{}", args.join(" "));
    Ok(())
}

fn log_error(_ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
    tracing::error!("{}", args.join(" "));
    Ok(())
}

fn fail(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
    ctx.print("about to fail");
    bail!("requested failure ({} args)", args.len())
}

fn demo_commands() -> Vec<CommandCandidate> {
    vec![
        command!(DemoCommands, echo, "echo"),
        command!(DemoCommands, log_info, "log", "info"),
        command!(DemoCommands, log_warn, "log", "warn"),
        command!(DemoCommands, log_error, "log", "error"),
        command!(DemoCommands, fail, "fail"),
    ]
}
