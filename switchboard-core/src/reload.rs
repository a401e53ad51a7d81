//! Predefined configuration-reload subcommand.

use std::sync::Arc;

use crate::context::Invocation;
use crate::error::TreeError;
use crate::host::CommandHandler;
use crate::node::{CommandNode, CommandSet, NodeId};

struct ReloadHandler {
    action: Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>,
}

impl CommandHandler for ReloadHandler {
    fn run(&self, ctx: &Invocation<'_>) -> anyhow::Result<bool> {
        (self.action)()?;
        ctx.renderer()
            .lines(ctx.invoker(), &["Configuration reloaded.".to_string()]);
        Ok(true)
    }
}

/// Install a `reload` subcommand (alias `rl`) under `parent`, gated by
/// `permission`.
///
/// The action re-reads whatever configuration the host owns; a failing
/// action propagates out of the dispatch as an execution error.
pub fn attach_reload<F>(
    set: &mut CommandSet,
    parent: NodeId,
    permission: impl Into<String>,
    action: F,
) -> Result<NodeId, TreeError>
where
    F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
{
    let node = CommandNode::new("reload")
        .with_aliases(["rl"])
        .with_description("Reload the configuration")
        .with_permission(permission)
        .with_handler(ReloadHandler { action: Arc::new(action) });
    set.add_child(parent, node)
}
