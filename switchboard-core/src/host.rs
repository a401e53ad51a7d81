//! Interfaces the dispatcher consumes from its host environment.

use crate::context::{Invocation, Invoker};
use crate::error::UsageError;

/// The body of a command.
///
/// Handlers receive a fully-bound [`Invocation`] and report success with a
/// boolean. A returned error is wrapped with the command label and the
/// owning component's identity, then propagated to the caller of the
/// dispatcher; it is never retried or suppressed.
pub trait CommandHandler: Send + Sync {
    fn run(&self, ctx: &Invocation<'_>) -> anyhow::Result<bool>;
}

impl<F> CommandHandler for F
where
    F: Fn(&Invocation<'_>) -> anyhow::Result<bool> + Send + Sync,
{
    fn run(&self, ctx: &Invocation<'_>) -> anyhow::Result<bool> {
        self(ctx)
    }
}

/// Host-environment callbacks: liveness and permission evaluation.
pub trait Host: Send + Sync {
    /// Whether the component owning the command tree is still live.
    ///
    /// A disabled host makes every dispatch fail silently, so commands never
    /// run against a torn-down owner.
    fn enabled(&self) -> bool {
        true
    }

    /// Permission predicate. Only consulted for a non-empty key; a command
    /// without a permission key is always permitted.
    fn has_permission(&self, invoker: &Invoker, key: &str) -> bool;

    /// Custom permission-refusal template. Any `<permission>` placeholder is
    /// substituted with the required key; `None` selects the renderer's
    /// default warning.
    fn permission_message(&self) -> Option<&str> {
        None
    }
}

/// Delivery of help, error and refusal output to an invoker.
pub trait Renderer: Send + Sync {
    /// Render the help block for a command, optionally headed by an error
    /// classification.
    fn usage(&self, error: Option<UsageError>, ctx: &Invocation<'_>);

    /// Render a permission-refused notice. `template` is the host's custom
    /// message with `<permission>` already substituted, if one is configured.
    fn permission_refused(&self, invoker: &Invoker, key: &str, template: Option<String>);

    /// Deliver pre-rendered lines, e.g. a help page.
    fn lines(&self, invoker: &Invoker, lines: &[String]);
}
