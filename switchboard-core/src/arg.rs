//! Argument specifications and the typed-value conversion contract.

use std::sync::Arc;

use crate::context::{Invoker, InvokerKind};
use crate::value::ArgValue;

/// Context handed to [`ArgType::complete`].
///
/// Carries the invoker and the tokens typed so far for the node whose
/// argument is being completed.
pub struct CompletionContext<'a> {
    invoker: &'a Invoker,
    tokens: &'a [String],
}

impl<'a> CompletionContext<'a> {
    pub(crate) fn new(invoker: &'a Invoker, tokens: &'a [String]) -> Self {
        CompletionContext { invoker, tokens }
    }

    pub fn invoker(&self) -> &Invoker {
        self.invoker
    }

    pub fn tokens(&self) -> &[String] {
        self.tokens
    }

    pub fn num_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// The partial token being completed, if any has been typed.
    pub fn last_token(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }
}

/// Value-conversion capability of one kind of argument.
///
/// Implementations are stateless and shared across every [`ArgSpec`] of the
/// same kind. Domain-specific lookups (resolving a name against a live
/// registry) implement this trait too; the dispatcher only ever talks to
/// arguments through it.
pub trait ArgType: Send + Sync {
    /// Whether the token converts to a value of this type.
    fn validate(&self, token: &str) -> bool {
        self.convert(token).is_some()
    }

    /// Convert a token into a typed value, or `None` if it does not parse.
    fn convert(&self, token: &str) -> Option<ArgValue>;

    /// Produce completion candidates, or `Ok(None)` to offer none.
    ///
    /// A returned error means completion crashed; the dispatcher wraps it
    /// with the attempted line and propagates it, distinct from "no
    /// candidates".
    fn complete(&self, _ctx: &CompletionContext<'_>) -> anyhow::Result<Option<Vec<String>>> {
        Ok(None)
    }

    /// Whether this type is a variadic collector consuming the rest of the
    /// line as one joined value.
    fn is_collection(&self) -> bool {
        false
    }
}

/// Declarative description of one positional argument slot.
#[derive(Clone)]
pub struct ArgSpec {
    name: String,
    ty: Arc<dyn ArgType>,
    default: Option<String>,
    mandatory: bool,
    mandatory_for_console: bool,
    description: Option<String>,
}

impl ArgSpec {
    /// A mandatory argument for every invoker kind.
    pub fn required(name: impl Into<String>, ty: impl ArgType + 'static) -> Self {
        ArgSpec {
            name: name.into(),
            ty: Arc::new(ty),
            default: None,
            mandatory: true,
            mandatory_for_console: true,
            description: None,
        }
    }

    /// An optional argument for every invoker kind.
    pub fn optional(name: impl Into<String>, ty: impl ArgType + 'static) -> Self {
        ArgSpec {
            name: name.into(),
            ty: Arc::new(ty),
            default: None,
            mandatory: false,
            mandatory_for_console: false,
            description: None,
        }
    }

    /// Default value in canonical string form. A present default always
    /// demotes the argument to optional, whatever its mandatory flags say.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the mandatory flag for console invokers only.
    pub fn console_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory_for_console = mandatory;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg_type(&self) -> &dyn ArgType {
        self.ty.as_ref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether this slot must be filled for the given invoker.
    pub fn is_mandatory_for(&self, invoker: &Invoker) -> bool {
        if self.default.is_some() {
            return false;
        }
        match invoker.kind {
            InvokerKind::Console => self.mandatory_for_console,
            InvokerKind::Interactive => self.mandatory,
        }
    }

    pub fn is_optional_for(&self, invoker: &Invoker) -> bool {
        !self.is_mandatory_for(invoker)
    }

    /// Optional for every invoker kind, used by the construction-order check.
    pub(crate) fn is_fully_optional(&self) -> bool {
        self.default.is_some() || (!self.mandatory && !self.mandatory_for_console)
    }

    pub(crate) fn is_mandatory_flagged(&self) -> bool {
        self.mandatory || self.mandatory_for_console
    }

    pub fn is_collection(&self) -> bool {
        self.ty.is_collection()
    }

    /// `<name>` for mandatory slots, `[name]` for optional ones.
    pub fn template(&self) -> String {
        if self.default.is_none() && self.mandatory {
            format!("<{}>", self.name)
        } else {
            format!("[{}]", self.name)
        }
    }
}
