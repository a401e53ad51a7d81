//! Invoker identity and the per-call execution context.

use serde::{Deserialize, Serialize};

use crate::help::HelpStyle;
use crate::host::{Host, Renderer};
use crate::node::{CommandNode, CommandSet, NodeId};

/// How a command was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvokerKind {
    /// A live display is attached; help output is word-wrapped
    Interactive,

    /// Console-like invoker with an unconstrained display
    Console,
}

/// The entity issuing a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoker {
    /// Display name of the invoker
    pub name: String,

    /// Interactive or console
    pub kind: InvokerKind,
}

impl Invoker {
    pub fn interactive(name: impl Into<String>) -> Self {
        Invoker { name: name.into(), kind: InvokerKind::Interactive }
    }

    pub fn console(name: impl Into<String>) -> Self {
        Invoker { name: name.into(), kind: InvokerKind::Console }
    }

    pub fn is_interactive(&self) -> bool {
        self.kind == InvokerKind::Interactive
    }
}

/// One bound command invocation, handed to a [`CommandHandler`].
///
/// Created fresh per dispatch attempt and discarded after the handler
/// returns. The named-argument map preserves declaration order.
///
/// [`CommandHandler`]: crate::host::CommandHandler
pub struct Invocation<'a> {
    invoker: &'a Invoker,
    set: &'a CommandSet,
    node: NodeId,
    label: String,
    tokens: Vec<String>,
    named: Vec<(String, String)>,
    host: &'a dyn Host,
    renderer: &'a dyn Renderer,
    style: &'a HelpStyle,
}

impl<'a> Invocation<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        invoker: &'a Invoker,
        set: &'a CommandSet,
        node: NodeId,
        label: impl Into<String>,
        tokens: Vec<String>,
        named: Vec<(String, String)>,
        host: &'a dyn Host,
        renderer: &'a dyn Renderer,
        style: &'a HelpStyle,
    ) -> Self {
        Invocation {
            invoker,
            set,
            node,
            label: label.into(),
            tokens,
            named,
            host,
            renderer,
            style,
        }
    }

    /// The invoker this call came from.
    pub fn invoker(&self) -> &Invoker {
        self.invoker
    }

    /// The command tree this invocation resolved against.
    pub fn set(&self) -> &CommandSet {
        self.set
    }

    /// Id of the resolved command node.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// The resolved command node.
    pub fn node(&self) -> &CommandNode {
        self.set.node(self.node)
    }

    /// The label actually typed; may be an alias of the node's name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Remaining raw tokens after routing.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn num_tokens(&self) -> usize {
        self.tokens.len()
    }

    pub fn first_token(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn last_token(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Bound value of a named argument, in its canonical string form.
    ///
    /// Optional arguments whose token and default both failed validation are
    /// absent; handlers are expected to tolerate a missing optional binding.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_arg(&self, name: &str) -> bool {
        self.arg(name).is_some()
    }

    /// Bound arguments in declaration order.
    pub fn args(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// The host this dispatch is running under.
    pub fn host(&self) -> &dyn Host {
        self.host
    }

    /// The renderer help output goes to.
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer
    }

    /// Help layout settings of the owning dispatcher.
    pub fn style(&self) -> &HelpStyle {
        self.style
    }
}
