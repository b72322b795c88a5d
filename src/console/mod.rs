//! Developer console commands
//!
//! Commands take a fixed list of named float parameters. A line is split on
//! whitespace: the first token names the command, the rest are its arguments.

use std::collections::BTreeMap;

use crate::ecs::EcsWorld;
use crate::error::{EngineError, EngineResult};

pub type CommandHandler = Box<dyn FnMut(&mut EcsWorld, &[f32]) -> EngineResult<String>>;

pub struct ConsoleCommand {
    pub name: String,
    pub short_description: String,
    pub params: Vec<&'static str>,
    handler: CommandHandler,
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, ConsoleCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any existing one with the same name
    pub fn register(
        &mut self,
        name: &str,
        short_description: &str,
        params: Vec<&'static str>,
        handler: CommandHandler,
    ) {
        if self.commands.contains_key(name) {
            log::warn!("[Console] Replacing command '{}'", name);
        }
        self.commands.insert(
            name.to_string(),
            ConsoleCommand {
                name: name.to_string(),
                short_description: short_description.to_string(),
                params,
                handler,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Name and description of every command, sorted by name
    pub fn help(&self) -> Vec<(&str, &str)> {
        self.commands
            .values()
            .map(|command| (command.name.as_str(), command.short_description.as_str()))
            .collect()
    }

    /// Parse and run a console line
    pub fn execute(&mut self, world: &mut EcsWorld, line: &str) -> EngineResult<String> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let command = self
            .commands
            .get_mut(name)
            .ok_or_else(|| EngineError::UnknownCommand { name: name.to_string() })?;

        let raw: Vec<&str> = tokens.collect();
        if raw.len() != command.params.len() {
            return Err(EngineError::ArgumentCount {
                command: command.name.clone(),
                expected: command.params.len(),
                found: raw.len(),
            });
        }

        let args = raw
            .iter()
            .zip(&command.params)
            .map(|(value, &param)| {
                value
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| EngineError::InvalidArgument {
                        command: command.name.clone(),
                        param,
                        value: value.to_string(),
                    })
            })
            .collect::<EngineResult<Vec<f32>>>()?;

        log::info!("[Console] {} {:?}", command.name, args);
        (command.handler)(world, &args)
    }
}
