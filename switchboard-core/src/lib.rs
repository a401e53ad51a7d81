//! Core types and functionality for the Switchboard command system.
//!
//! This crate provides a hierarchical command-dispatch and argument-binding
//! engine: commands form a tree of named nodes, each node declares typed
//! positional arguments, and a raw token line is routed through the tree,
//! validated, converted and delivered to a handler as a fully-bound
//! invocation. The same tree drives tab completion and paginated help.

mod arg;
mod context;
mod dispatch;
mod error;
mod help;
mod host;
mod node;
mod reload;
mod table;
mod token;
mod types;
mod value;

// Re-export core types
pub use arg::{ArgSpec, ArgType, CompletionContext};
pub use context::{Invocation, Invoker, InvokerKind};
pub use dispatch::Dispatcher;
pub use error::{DispatchError, Result, TreeError, UsageError};
pub use help::{
    attach_help, clamp_page, collect_entries, paginate, render_page, word_wrap, HelpEntry,
    HelpStyle,
};
pub use host::{CommandHandler, Host, Renderer};
pub use node::{CommandNode, CommandSet, NodeId};
pub use reload::attach_reload;
pub use table::CommandTable;
pub use token::merge_quoted;
pub use types::{
    BoolArg, FloatArg, IntegerArg, LongArg, LookupArg, NamedLookup, PitchArg, WordListArg,
};
pub use value::ArgValue;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
