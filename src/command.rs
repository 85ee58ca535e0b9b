use crate::error::CommandError;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;

/// Separator between a command and its subcommand inside a registry key.
pub const SUBCOMMAND_SEPARATOR: char = '%';

/// Human readable name of the single parameter every handler takes.
pub const HANDLER_PARAM_NAME: &str = "&[String]";

pub type CommandFn = fn(&mut CommandContext<'_>, &[String]) -> Result<()>;

/// Declarative tag that marks a table row as a console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMarker {
    pub command: String,
    pub sub_command: Option<String>,
}

impl CommandMarker {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), sub_command: None }
    }

    pub fn with_sub(command: impl Into<String>, sub_command: impl Into<String>) -> Self {
        Self { command: command.into(), sub_command: Some(sub_command.into()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Static,
    Instance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    StringSlice,
    Str,
    Integer,
    Float,
    Bool,
}

impl ParamType {
    pub fn name(self) -> &'static str {
        match self {
            ParamType::StringSlice => HANDLER_PARAM_NAME,
            ParamType::Str => "&str",
            ParamType::Integer => "i64",
            ParamType::Float => "f64",
            ParamType::Bool => "bool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub receiver: Receiver,
    pub params: Vec<ParamType>,
}

impl Signature {
    /// The only shape the registry accepts: static, one `&[String]` parameter.
    pub fn string_args() -> Self {
        Self { receiver: Receiver::Static, params: vec![ParamType::StringSlice] }
    }
}

/// One row of an application's command table.
#[derive(Clone)]
pub struct CommandCandidate {
    pub group: &'static str,
    pub method: &'static str,
    pub marker: Option<CommandMarker>,
    pub signature: Signature,
    pub handler: Option<CommandFn>,
}

impl CommandCandidate {
    pub fn new(group: &'static str, method: &'static str, marker: CommandMarker, handler: CommandFn) -> Self {
        Self { group, method, marker: Some(marker), signature: Signature::string_args(), handler: Some(handler) }
    }

    fn shape_error(&self) -> Option<&'static str> {
        if self.signature.receiver != Receiver::Static {
            return Some("handler is not static");
        }
        if self.signature.params.len() != 1 {
            return Some("handler does not take exactly one parameter");
        }
        if self.signature.params[0] != ParamType::StringSlice {
            return Some("handler parameter is not a sequence of strings");
        }
        if self.handler.is_none() {
            return Some("handler has no callable entry point");
        }
        None
    }
}

impl fmt::Debug for CommandCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandCandidate")
            .field("group", &self.group)
            .field("method", &self.method)
            .field("marker", &self.marker)
            .field("signature", &self.signature)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Builds a well-formed [`CommandCandidate`] from a handler path.
///
/// ```ignore
/// command!(DebugCommands, spawn, "spawn");
/// command!(DebugCommands, show_logs, "show", "logs");
/// ```
#[macro_export]
macro_rules! command {
    ($group:ident, $method:ident, $name:expr) => {
        $crate::command::CommandCandidate::new(
            stringify!($group),
            stringify!($method),
            $crate::command::CommandMarker::new($name),
            $method,
        )
    };
    ($group:ident, $method:ident, $name:expr, $sub:expr) => {
        $crate::command::CommandCandidate::new(
            stringify!($group),
            stringify!($method),
            $crate::command::CommandMarker::with_sub($name, $sub),
            $method,
        )
    };
}

#[derive(Clone)]
pub struct CommandDescriptor {
    pub name: String,
    pub sub_name: Option<String>,
    pub group: String,
    pub method: String,
    pub handler: CommandFn,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, handler: CommandFn) -> Self {
        let name = name.into();
        Self { method: name.clone(), name, sub_name: None, group: String::from("Console"), handler }
    }

    pub fn with_sub(mut self, sub_name: impl Into<String>) -> Self {
        self.sub_name = Some(sub_name.into());
        self
    }

    pub fn with_origin(mut self, group: impl Into<String>, method: impl Into<String>) -> Self {
        self.group = group.into();
        self.method = method.into();
        self
    }

    pub fn key(&self) -> String {
        command_key(&self.name, self.sub_name.as_deref())
    }

    /// Text shown next to the echo of an invocation.
    pub fn describe(&self) -> String {
        format!("{}\n{}\nParameters: {}\n", self.group, self.method, HANDLER_PARAM_NAME)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("sub_name", &self.sub_name)
            .field("group", &self.group)
            .field("method", &self.method)
            .finish()
    }
}

pub fn command_key(name: &str, sub_name: Option<&str>) -> String {
    match sub_name {
        Some(sub) => format!("{}{SUBCOMMAND_SEPARATOR}{}", name.to_lowercase(), sub.to_lowercase()),
        None => name.to_lowercase(),
    }
}

fn display_name(key: &str) -> String {
    key.replace(SUBCOMMAND_SEPARATOR, " ")
}

/// A resolved input line: the registry key that matched and the leftover tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub key: String,
    pub args: Vec<String>,
}

impl Resolution {
    pub fn display_name(&self) -> String {
        display_name(&self.key)
    }
}

/// What a handler sees while it runs.
pub struct CommandContext<'a> {
    registry: &'a CommandRegistry,
    output: Vec<(String, String)>,
}

impl<'a> CommandContext<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self { registry, output: Vec::new() }
    }

    pub fn registry(&self) -> &CommandRegistry {
        self.registry
    }

    pub fn print(&mut self, message: impl Into<String>) {
        self.output.push((message.into(), String::new()));
    }

    pub fn print_with_detail(&mut self, message: impl Into<String>, detail: impl Into<String>) {
        self.output.push((message.into(), detail.into()));
    }

    pub fn into_output(self) -> Vec<(String, String)> {
        self.output
    }
}

#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub registered: Vec<String>,
    pub skipped: Vec<CommandError>,
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: HashMap::new() }
    }

    /// Builds a registry from a command table, failing on the first key collision.
    pub fn from_candidates<'a>(candidates: impl IntoIterator<Item = &'a CommandCandidate>) -> Result<Self, CommandError> {
        let mut registry = Self::new();
        registry.discover(candidates)?;
        Ok(registry)
    }

    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), CommandError> {
        let key = descriptor.key();
        if self.commands.contains_key(&key) {
            return Err(CommandError::DuplicateCommand { key });
        }
        self.commands.insert(key, descriptor);
        Ok(())
    }

    pub fn discover<'a>(
        &mut self,
        candidates: impl IntoIterator<Item = &'a CommandCandidate>,
    ) -> Result<DiscoveryReport, CommandError> {
        let mut report = DiscoveryReport::default();
        for candidate in candidates {
            let Some(marker) = candidate.marker.as_ref() else {
                continue;
            };
            let handler = match (candidate.shape_error(), candidate.handler) {
                (None, Some(handler)) => handler,
                (reason, _) => {
                    let err = CommandError::InvalidHandlerShape {
                        group: candidate.group.to_string(),
                        method: candidate.method.to_string(),
                        reason: reason.unwrap_or("handler has no callable entry point").to_string(),
                    };
                    tracing::warn!("{err}");
                    report.skipped.push(err);
                    continue;
                }
            };
            let mut descriptor = CommandDescriptor::new(marker.command.to_lowercase(), handler)
                .with_origin(candidate.group, candidate.method);
            if let Some(sub) = &marker.sub_command {
                descriptor = descriptor.with_sub(sub.to_lowercase());
            }
            let key = descriptor.key();
            self.register(descriptor)?;
            report.registered.push(key);
        }
        Ok(report)
    }

    pub fn resolve(&self, input: &str) -> Result<Resolution, CommandError> {
        let lowered = input.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        let not_found = || CommandError::NotFound { input: input.to_string() };
        let first = tokens.first().ok_or_else(not_found)?;
        if let Some(second) = tokens.get(1) {
            let key = command_key(first, Some(second));
            if self.commands.contains_key(&key) {
                return Ok(Resolution { key, args: to_owned_args(&tokens[2..]) });
            }
        }
        if self.commands.contains_key(*first) {
            return Ok(Resolution { key: (*first).to_string(), args: to_owned_args(&tokens[1..]) });
        }
        Err(not_found())
    }

    pub fn descriptor(&self, key: &str) -> Option<&CommandDescriptor> {
        self.commands.get(key)
    }

    /// Runs the handler behind `resolution`. Handler errors come back as `HandlerFault`.
    pub fn invoke(&self, resolution: &Resolution, ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        let descriptor = self
            .commands
            .get(&resolution.key)
            .ok_or_else(|| CommandError::NotFound { input: resolution.display_name() })?;
        (descriptor.handler)(ctx, &resolution.args)
            .map_err(|source| CommandError::HandlerFault { command: resolution.display_name(), source })
    }

    pub fn list_commands(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().map(|key| display_name(key)).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn to_owned_args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|token| token.to_string()).collect()
}
