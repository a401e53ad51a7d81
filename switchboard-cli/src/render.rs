//! Terminal renderer: colored usage, refusal and help output.

use colored::Colorize;

use switchboard_core::{Invocation, Invoker, Renderer, UsageError};

pub struct TermRenderer;

impl TermRenderer {
    pub fn new() -> Self {
        TermRenderer
    }
}

impl Default for TermRenderer {
    fn default() -> Self {
        TermRenderer::new()
    }
}

impl Renderer for TermRenderer {
    fn usage(&self, error: Option<UsageError>, ctx: &Invocation<'_>) {
        if let Some(error) = error {
            let notice = match error {
                UsageError::NotEnoughArguments => "Not enough arguments.",
                UsageError::TooManyArguments => "Too many arguments.",
                UsageError::MismatchArguments => "An argument did not match its expected type.",
            };
            println!("{}", notice.red());
        }

        let node = ctx.node();
        let mut line = format!("Usage: {}", ctx.set().full_path(ctx.node_id()));
        let templates = node.arg_templates();
        if !templates.is_empty() {
            line.push(' ');
            line.push_str(&templates);
        }
        println!("{}", line.yellow());

        if !node.usage().is_empty() {
            println!("{}", node.usage().yellow());
        }
        if !node.description().is_empty() {
            println!("  {}", node.description().dimmed());
        }
    }

    fn permission_refused(&self, _invoker: &Invoker, _key: &str, template: Option<String>) {
        match template {
            Some(message) => {
                for line in message.lines() {
                    println!("{}", line.red());
                }
            }
            None => println!("{}", "You don't have permission to do that.".red()),
        }
    }

    fn lines(&self, _invoker: &Invoker, lines: &[String]) {
        for line in lines {
            if line.starts_with("----") {
                println!("{}", line.cyan());
            } else if line.starts_with('»') {
                println!("{}", line.green());
            } else {
                println!("{line}");
            }
        }
    }
}
