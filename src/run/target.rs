//! Execution targets and the commands they run

use crate::error::Error;
use crate::run::params::RunParams;
use crate::run::schedule::DispatchUnit;
use std::fmt;
use std::process::Command as StdCommand;
use std::str::FromStr;

/// Where test scripts are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Interpreter on a connected device, reached through the bridge command
    Shell,
    /// Local interpreter binary
    Desktop,
    /// Browser harness driven by a helper script
    Browser,
}

impl Target {
    pub fn name(&self) -> &'static str {
        match self {
            Target::Shell => "shell",
            Target::Desktop => "desktop",
            Target::Browser => "browser",
        }
    }

    /// Build the invocation that runs `unit` on this target
    pub fn invocation(&self, unit: &DispatchUnit, params: &RunParams) -> Invocation {
        let paths = unit.paths.iter().map(|p| p.to_string_lossy().into_owned());

        match self {
            Target::Desktop => Invocation {
                program: params.interpreter.clone(),
                args: paths.collect(),
            },
            Target::Shell => match params.bridge.split_first() {
                Some((program, bridge_args)) => {
                    let mut args = bridge_args.to_vec();
                    args.push(params.remote_interpreter());
                    args.extend(paths);
                    Invocation {
                        program: program.clone(),
                        args,
                    }
                }
                None => Invocation {
                    program: params.remote_interpreter(),
                    args: paths.collect(),
                },
            },
            // The helper takes the whole unit as one argument
            Target::Browser => Invocation {
                program: params.browser_shell.clone(),
                args: vec![
                    params.browser_helper.to_string_lossy().into_owned(),
                    unit.joined(),
                ],
            },
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shell" => Ok(Target::Shell),
            "desktop" => Ok(Target::Desktop),
            "browser" => Ok(Target::Browser),
            other => Err(Error::InvalidTarget {
                target: other.to_string(),
            }),
        }
    }
}

/// A program plus its argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Convert into a process command; arguments are passed as-is, never through a shell
    pub fn to_command(&self) -> StdCommand {
        let mut command = StdCommand::new(&self.program);
        command.args(&self.args);
        command
    }
}

/// Shows the command line; arguments that would split or vanish are double-quoted
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(arg: &str) -> std::borrow::Cow<'_, str> {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '"') {
        return arg.into();
    }
    format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\"")).into()
}
