//! The demonstration command trees registered with the console.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;

use switchboard_core::{
    attach_help, attach_reload, ArgSpec, CommandNode, CommandSet, CommandTable, Dispatcher,
    FloatArg, Host, IntegerArg, Invocation, LookupArg, NamedLookup, Renderer, WordListArg,
};

use crate::config::ConsoleConfig;
use crate::host::ConsoleHost;

const OWNER: &str = "switchboard-cli";

/// Fixed color palette backing the `color` command's lookup argument.
struct Palette;

const PALETTE: &[(&str, &str)] = &[
    ("red", "#ff0000"),
    ("green", "#00ff00"),
    ("blue", "#0000ff"),
    ("white", "#ffffff"),
    ("black", "#000000"),
];

impl NamedLookup for Palette {
    fn resolve(&self, name: &str) -> anyhow::Result<Option<String>> {
        Ok(PALETTE
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, hex)| hex.to_string()))
    }

    fn names(&self) -> anyhow::Result<Vec<String>> {
        Ok(PALETTE.iter().map(|(n, _)| n.to_string()).collect())
    }
}

pub fn register_all(
    table: &mut CommandTable,
    config: &ConsoleConfig,
    config_path: Option<&Path>,
    host: Arc<ConsoleHost>,
    renderer: Arc<dyn Renderer>,
) -> anyhow::Result<()> {
    let style = config.help_style();
    let shared: Arc<dyn Host> = host.clone();
    table.register(Arc::new(
        echo_command(shared.clone(), renderer.clone())?.with_style(style),
    ));
    table.register(Arc::new(
        calc_command(shared.clone(), renderer.clone())?.with_style(style),
    ));
    table.register(Arc::new(
        color_command(shared, renderer.clone())?.with_style(style),
    ));
    table.register(Arc::new(
        config_command(config_path.map(Path::to_path_buf), host, renderer)?.with_style(style),
    ));
    Ok(())
}

/// `echo <message...>` prints the collected words back.
fn echo_command(host: Arc<dyn Host>, renderer: Arc<dyn Renderer>) -> anyhow::Result<Dispatcher> {
    let root = CommandNode::new("echo")
        .with_aliases(["say"])
        .with_description("Print a message back to the console")
        .with_handler(|ctx: &Invocation<'_>| {
            if let Some(message) = ctx.arg("message") {
                println!("{message}");
            }
            Ok(true)
        })
        .with_arg(
            ArgSpec::required("message", WordListArg).with_description("The words to print"),
        )?;

    Ok(Dispatcher::new(CommandSet::new(root), OWNER, host, renderer))
}

/// `calc add|div <a> <b>`, with `div` behind a permission key and a
/// `calc help` page.
fn calc_command(host: Arc<dyn Host>, renderer: Arc<dyn Renderer>) -> anyhow::Result<Dispatcher> {
    let root = CommandNode::new("calc")
        .with_description("Small arithmetic playground")
        .with_handler(|ctx: &Invocation<'_>| {
            ctx.renderer().lines(
                ctx.invoker(),
                &["Try 'calc help' for the available operations.".to_string()],
            );
            Ok(true)
        });
    let mut set = CommandSet::new(root);
    let main = set.root();

    let add = CommandNode::new("add")
        .with_aliases(["plus"])
        .with_description("Add two integers")
        .with_handler(|ctx: &Invocation<'_>| {
            let a: i64 = ctx.arg("a").unwrap_or("0").parse()?;
            let b: i64 = ctx.arg("b").unwrap_or("0").parse()?;
            println!("{}", a + b);
            Ok(true)
        })
        .with_arg(ArgSpec::required("a", IntegerArg).with_description("First addend"))?
        .with_arg(ArgSpec::required("b", IntegerArg).with_description("Second addend"))?;
    set.add_child(main, add)?;

    let div = CommandNode::new("div")
        .with_description("Divide two numbers")
        .with_permission("console.calc.div")
        .with_handler(|ctx: &Invocation<'_>| {
            let a: f64 = ctx.arg("a").unwrap_or("0").parse()?;
            let b: f64 = ctx.arg("b").unwrap_or("0").parse()?;
            if b == 0.0 {
                bail!("division by zero");
            }
            println!("{}", a / b);
            Ok(true)
        })
        .with_arg(ArgSpec::required("a", FloatArg).with_description("Dividend"))?
        .with_arg(ArgSpec::required("b", FloatArg).with_description("Divisor"))?;
    set.add_child(main, div)?;

    attach_help(&mut set, main)?;

    Ok(Dispatcher::new(set, OWNER, host, renderer))
}

/// `config reload` re-reads the config file (or falls back to defaults)
/// and swaps the host's granted permission keys.
fn config_command(
    path: Option<PathBuf>,
    host: Arc<ConsoleHost>,
    renderer: Arc<dyn Renderer>,
) -> anyhow::Result<Dispatcher> {
    let root = CommandNode::new("config")
        .with_description("Inspect and reload the console configuration")
        .with_handler(|ctx: &Invocation<'_>| {
            ctx.renderer().lines(
                ctx.invoker(),
                &["Try 'config help' for the available operations.".to_string()],
            );
            Ok(true)
        });
    let mut set = CommandSet::new(root);
    let main = set.root();

    let reload_host = host.clone();
    attach_reload(&mut set, main, "console.reload", move || {
        let config = match &path {
            Some(path) => ConsoleConfig::load(path)?,
            None => ConsoleConfig::default(),
        };
        reload_host.replace_grants(config.permissions);
        Ok(())
    })?;
    attach_help(&mut set, main)?;

    Ok(Dispatcher::new(set, OWNER, host, renderer))
}

/// `color [name]` resolves a palette color, with tab completion over the
/// palette names.
fn color_command(host: Arc<dyn Host>, renderer: Arc<dyn Renderer>) -> anyhow::Result<Dispatcher> {
    let palette: Arc<dyn NamedLookup> = Arc::new(Palette);
    let root = CommandNode::new("color")
        .with_aliases(["colour"])
        .with_description("Resolve a palette color to its hex value")
        .with_handler(|ctx: &Invocation<'_>| {
            match ctx.arg("name") {
                Some(name) => println!("{name}"),
                None => println!("Pick a color; try completing the argument."),
            }
            Ok(true)
        })
        .with_arg(
            ArgSpec::optional("name", LookupArg::new(palette))
                .with_description("A color from the built-in palette"),
        )?;

    Ok(Dispatcher::new(CommandSet::new(root), OWNER, host, renderer))
}
