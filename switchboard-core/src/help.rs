//! Help rendering: per-command entries packed into fixed-height pages.

use crate::arg::ArgSpec;
use crate::context::{Invocation, Invoker};
use crate::error::TreeError;
use crate::host::{CommandHandler, Host};
use crate::node::{CommandNode, CommandSet, NodeId};
use crate::types::IntegerArg;

/// Layout settings for help output.
#[derive(Debug, Clone, Copy)]
pub struct HelpStyle {
    /// Maximum entry lines per page
    pub page_height: usize,

    /// Display width used to word-wrap entries for interactive invokers
    pub wrap_width: usize,
}

impl Default for HelpStyle {
    fn default() -> Self {
        HelpStyle { page_height: 9, wrap_width: 55 }
    }
}

/// One command's rendered help text plus its computed height.
#[derive(Debug, Clone)]
pub struct HelpEntry {
    /// Rendered lines: the usage line, then the first description line
    pub lines: Vec<String>,

    /// Line count at the invoker's display width
    pub height: usize,

    /// Page assigned by [`paginate`]; zero until then
    pub page: usize,
}

/// Greedy word wrap at `width` columns. Words wider than the display are
/// hard-broken.
pub fn word_wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if word_len > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(width) {
                if chunk.len() == width {
                    lines.push(chunk.iter().collect());
                } else {
                    current = chunk.iter().collect();
                    current_len = chunk.len();
                }
            }
        } else {
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn entry_for(set: &CommandSet, id: NodeId, invoker: &Invoker, style: &HelpStyle) -> HelpEntry {
    let node = set.node(id);

    let mut head = format!("» {}", set.full_path(id));
    let templates = node.arg_templates();
    if !templates.is_empty() {
        head.push(' ');
        head.push_str(&templates);
    }

    let mut lines = vec![head];
    if let Some(first) = node.description().lines().next() {
        if !first.is_empty() {
            lines.push(format!("  {}", first));
        }
    }

    // Interactive displays wrap long lines; a console shows them as-is.
    let height = if invoker.is_interactive() {
        lines
            .iter()
            .map(|line| word_wrap(line, style.wrap_width).len())
            .sum()
    } else {
        lines.len()
    };

    HelpEntry { lines, height, page: 0 }
}

fn eligible(node: &CommandNode, invoker: &Invoker, host: &dyn Host) -> bool {
    match node.permission() {
        None | Some("") => true,
        Some(key) => host.has_permission(invoker, key),
    }
}

/// Build help entries for `main` and each of its permitted children.
///
/// `main` itself contributes an entry only when it accepts arguments of its
/// own.
pub fn collect_entries(
    set: &CommandSet,
    main: NodeId,
    invoker: &Invoker,
    host: &dyn Host,
    style: &HelpStyle,
) -> Vec<HelpEntry> {
    let mut entries = Vec::new();
    let node = set.node(main);

    if node.max_args() != Some(0) && eligible(node, invoker, host) {
        entries.push(entry_for(set, main, invoker, style));
    }

    for &child in node.children() {
        if eligible(set.node(child), invoker, host) {
            entries.push(entry_for(set, child, invoker, style));
        }
    }

    entries
}

/// Assign a page to every entry and return the total page count.
///
/// Packing is greedy and never splits an entry: a new page starts once the
/// current one has reached its height, so a single oversized entry occupies
/// exactly one page by itself.
pub fn paginate(entries: &mut [HelpEntry], page_height: usize) -> usize {
    let page_height = page_height.max(1);
    let mut page = 1;
    let mut filled = 0;

    for entry in entries.iter_mut() {
        if filled >= page_height {
            page += 1;
            filled = 0;
        }
        entry.page = page;
        filled += entry.height;
    }

    page
}

/// Clamp a requested page number into `[1, total]`.
pub fn clamp_page(requested: i64, total: usize) -> usize {
    if requested < 1 {
        1
    } else if requested as usize > total {
        total.max(1)
    } else {
        requested as usize
    }
}

/// Render one help page: a title line, then every entry assigned to `page`.
///
/// Previous/index/next affordances appear only when there is more than one
/// page.
pub fn render_page(name: &str, entries: &[HelpEntry], page: usize, total: usize) -> Vec<String> {
    let mut parts = Vec::new();
    if total > 1 && page > 1 {
        parts.push("[<]".to_string());
    }
    parts.push(format!("Help for \"{}\"", name));
    if total > 1 {
        parts.push(format!("({}/{})", page, total));
    }
    if total > 1 && page < total {
        parts.push("[>]".to_string());
    }

    let mut out = vec![format!("---- {} ----", parts.join(" "))];
    for entry in entries.iter().filter(|e| e.page == page) {
        out.extend(entry.lines.iter().cloned());
    }
    out
}

struct HelpHandler;

impl CommandHandler for HelpHandler {
    fn run(&self, ctx: &Invocation<'_>) -> anyhow::Result<bool> {
        let set = ctx.set();
        let node = ctx.node();

        // Invoked as the help child: paginate over the parent command.
        let main = if node.name().eq_ignore_ascii_case("help") {
            node.parent().unwrap_or(ctx.node_id())
        } else {
            ctx.node_id()
        };

        let style = ctx.style();
        let mut entries = collect_entries(set, main, ctx.invoker(), ctx.host(), style);
        let total = paginate(&mut entries, style.page_height);

        let requested = ctx
            .arg("page")
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(1);
        let page = clamp_page(requested, total);

        let lines = render_page(set.node(main).name(), &entries, page, total);
        ctx.renderer().lines(ctx.invoker(), &lines);
        Ok(true)
    }
}

/// Install a `help` subcommand (aliases `h`, `?`) under `parent`, with an
/// optional page-number argument defaulting to 1.
pub fn attach_help(set: &mut CommandSet, parent: NodeId) -> Result<NodeId, TreeError> {
    let node = CommandNode::new("help")
        .with_aliases(["h", "?"])
        .with_description("Show paginated help for this command")
        .with_handler(HelpHandler)
        .with_arg(
            ArgSpec::required("page", IntegerArg)
                .with_default("1")
                .with_description("Help page number"),
        )?;
    set.add_child(parent, node)
}
