//! The command tree: nodes, aliases and parent/child links.
//!
//! Nodes live in an arena owned by [`CommandSet`] and reference each other by
//! [`NodeId`]; the parent link is a plain id, never an owning reference, and
//! is used only to reconstruct the full command path. The tree is built once
//! at wiring time and read-only during dispatch; callers that need to mutate
//! it concurrently must add their own synchronization.

use std::fmt;
use std::sync::Arc;

use crate::arg::ArgSpec;
use crate::context::Invoker;
use crate::error::TreeError;
use crate::host::CommandHandler;

/// Index of a node inside its [`CommandSet`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// One named, dispatchable unit in the command tree.
pub struct CommandNode {
    name: String,
    aliases: Vec<String>,
    description: String,
    usage: String,
    permission: Option<String>,
    args: Vec<ArgSpec>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    handler: Option<Arc<dyn CommandHandler>>,
}

impl CommandNode {
    pub fn new(name: impl Into<String>) -> Self {
        CommandNode {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            usage: String::new(),
            permission: None,
            args: Vec::new(),
            children: Vec::new(),
            parent: None,
            handler: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_permission(mut self, key: impl Into<String>) -> Self {
        self.permission = Some(key.into());
        self
    }

    pub fn with_handler(mut self, handler: impl CommandHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Append an argument spec, enforcing the construction-order invariants.
    pub fn with_arg(mut self, spec: ArgSpec) -> Result<Self, TreeError> {
        self.push_arg(spec)?;
        Ok(self)
    }

    fn push_arg(&mut self, spec: ArgSpec) -> Result<(), TreeError> {
        if let Some(last) = self.args.last() {
            if last.is_collection() {
                return Err(TreeError::ArgAfterCollector);
            }
            if spec.is_mandatory_flagged() && !spec.has_default() && last.is_fully_optional() {
                return Err(TreeError::MandatoryAfterOptional);
            }
        }
        self.args.push(spec);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Opaque permission key; its meaning is owned by the host.
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn handler(&self) -> Option<&Arc<dyn CommandHandler>> {
        self.handler.as_ref()
    }

    /// Whether the label matches this node's name or one of its aliases,
    /// ignoring ASCII case.
    pub fn answers_to(&self, label: &str) -> bool {
        self.name.eq_ignore_ascii_case(label)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(label))
    }

    /// Count of arguments that must be bound for this invoker. A spec with a
    /// default never counts.
    pub fn min_args(&self, invoker: &Invoker) -> usize {
        self.args
            .iter()
            .filter(|a| a.is_mandatory_for(invoker))
            .count()
    }

    /// Bounded argument capacity, or `None` when the last spec is a
    /// collector.
    pub fn max_args(&self) -> Option<usize> {
        if self.has_collection() {
            None
        } else {
            Some(self.args.len())
        }
    }

    /// Whether the final argument is a variadic collector.
    pub fn has_collection(&self) -> bool {
        self.args.last().is_some_and(|a| a.is_collection())
    }

    /// One-line argument summary: `<from> <to> [message]`.
    pub fn arg_templates(&self) -> String {
        self.args
            .iter()
            .map(ArgSpec::template)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// handler is a trait object without Debug
impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("args", &self.args.len())
            .field("children", &self.children)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Arena owning every node of one command tree.
///
/// The first node is the root; children are kept in insertion order.
pub struct CommandSet {
    nodes: Vec<CommandNode>,
}

impl CommandSet {
    pub fn new(root: CommandNode) -> Self {
        CommandSet { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CommandNode {
        &mut self.nodes[id.0]
    }

    /// Insert a subcommand under `parent`. Sibling names must be unique.
    pub fn add_child(&mut self, parent: NodeId, mut node: CommandNode) -> Result<NodeId, TreeError> {
        let clash = self.nodes[parent.0]
            .children
            .iter()
            .any(|&c| self.nodes[c.0].name.eq_ignore_ascii_case(&node.name));
        if clash {
            return Err(TreeError::DuplicateChild(node.name));
        }

        node.parent = Some(parent);
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Append an argument spec to an already-inserted node.
    pub fn add_arg(&mut self, id: NodeId, spec: ArgSpec) -> Result<(), TreeError> {
        self.nodes[id.0].push_arg(spec)
    }

    /// Remove an argument spec by name, ignoring ASCII case.
    pub fn remove_arg(&mut self, id: NodeId, name: &str) {
        self.nodes[id.0]
            .args
            .retain(|a| !a.name().eq_ignore_ascii_case(name));
    }

    /// Resolve a token against `parent`'s children: names first, then every
    /// child's alias set, ignoring ASCII case.
    pub fn child_matching(&self, parent: NodeId, token: &str) -> Option<NodeId> {
        let children = &self.nodes[parent.0].children;
        children
            .iter()
            .find(|&&c| self.nodes[c.0].name.eq_ignore_ascii_case(token))
            .or_else(|| {
                children.iter().find(|&&c| {
                    self.nodes[c.0]
                        .aliases
                        .iter()
                        .any(|a| a.eq_ignore_ascii_case(token))
                })
            })
            .copied()
    }

    /// Names of every node from the root down to `id`, joined with spaces.
    pub fn full_path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            names.push(self.nodes[current.0].name.as_str());
            cursor = self.nodes[current.0].parent;
        }
        names.reverse();
        names.join(" ")
    }
}
