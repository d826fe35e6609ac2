//! Turning a server-described [`Runnable`] into a concrete invocation.

use std::collections::HashMap;

use crate::lsp_ext::{CargoRunnableArgs, Runnable, RunnableArgs, ShellRunnableArgs};

/// A fully resolved command line for one runnable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: String,
    pub environment: HashMap<String, String>,
}

impl Invocation {
    /// One-line rendering for labels and logs.
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Resolve a runnable into the command line the user would run.
pub fn invocation(runnable: &Runnable) -> Invocation {
    match &runnable.args {
        RunnableArgs::Cargo(args) => cargo_invocation(args),
        RunnableArgs::Shell(args) => shell_invocation(args),
    }
}

/// Cargo runnables expand to `cargo <cargoArgs> -- <executableArgs>`; an
/// `overrideCargo` from user config replaces the program.
fn cargo_invocation(args: &CargoRunnableArgs) -> Invocation {
    let program = args
        .override_cargo
        .clone()
        .unwrap_or_else(|| "cargo".to_string());

    let mut argv = args.cargo_args.clone();
    if !args.executable_args.is_empty() {
        argv.push("--".to_string());
        argv.extend(args.executable_args.iter().cloned());
    }

    Invocation {
        program,
        args: argv,
        cwd: args.common.cwd.clone(),
        environment: args.common.environment.clone().unwrap_or_default(),
    }
}

fn shell_invocation(args: &ShellRunnableArgs) -> Invocation {
    Invocation {
        program: args.program.clone(),
        args: args.args.clone(),
        cwd: args.common.cwd.clone(),
        environment: args.common.environment.clone().unwrap_or_default(),
    }
}
