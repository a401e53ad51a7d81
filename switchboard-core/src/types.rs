//! Built-in argument types.
//!
//! Each type is a stateless unit struct implementing [`ArgType`]; one
//! instance serves every argument spec of that kind. Domain-entity arguments
//! (a player, a world, a registered object of any sort) are covered by
//! [`LookupArg`] over a host-supplied [`NamedLookup`] resolver.

use std::sync::Arc;

use crate::arg::{ArgType, CompletionContext};
use crate::value::ArgValue;

pub(crate) fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    candidate
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// 32-bit integer argument.
pub struct IntegerArg;

impl ArgType for IntegerArg {
    fn convert(&self, token: &str) -> Option<ArgValue> {
        token.parse::<i32>().ok().map(ArgValue::Int)
    }
}

/// 64-bit integer argument.
pub struct LongArg;

impl ArgType for LongArg {
    fn convert(&self, token: &str) -> Option<ArgValue> {
        token.parse::<i64>().ok().map(ArgValue::Long)
    }
}

/// Floating point argument.
pub struct FloatArg;

impl ArgType for FloatArg {
    fn convert(&self, token: &str) -> Option<ArgValue> {
        token.parse::<f64>().ok().map(ArgValue::Float)
    }
}

const TRUE_WORDS: &[&str] = &["1", "true", "t", "yes", "y"];
const FALSE_WORDS: &[&str] = &["0", "false", "f", "no", "n"];

/// Boolean argument accepting the usual spellings of true and false.
pub struct BoolArg;

impl ArgType for BoolArg {
    fn convert(&self, token: &str) -> Option<ArgValue> {
        let token = token.to_ascii_lowercase();
        if TRUE_WORDS.contains(&token.as_str()) {
            Some(ArgValue::Bool(true))
        } else if FALSE_WORDS.contains(&token.as_str()) {
            Some(ArgValue::Bool(false))
        } else {
            None
        }
    }

    fn complete(&self, ctx: &CompletionContext<'_>) -> anyhow::Result<Option<Vec<String>>> {
        let candidates = match ctx.last_token() {
            None => vec!["true".to_string(), "false".to_string()],
            Some(last) => TRUE_WORDS
                .iter()
                .chain(FALSE_WORDS.iter())
                .filter(|word| starts_with_ignore_case(word, last))
                .map(|word| word.to_string())
                .collect(),
        };
        Ok(Some(candidates))
    }
}

/// Pitch argument: a float bounded to `0.0..=2.0`.
pub struct PitchArg;

impl ArgType for PitchArg {
    fn convert(&self, token: &str) -> Option<ArgValue> {
        let value = token.parse::<f64>().ok()?;
        (0.0..=2.0).contains(&value).then_some(ArgValue::Float(value))
    }
}

/// Variadic collector: consumes the remainder of the line as a word list.
pub struct WordListArg;

impl ArgType for WordListArg {
    fn convert(&self, token: &str) -> Option<ArgValue> {
        Some(ArgValue::Words(
            token.split_whitespace().map(str::to_string).collect(),
        ))
    }

    fn is_collection(&self) -> bool {
        true
    }
}

/// Resolution of names against a live, host-owned registry.
///
/// The core never sees the registry itself; it validates and completes
/// purely through this interface.
pub trait NamedLookup: Send + Sync {
    /// Resolve a name to its canonical form, or `None` if unknown.
    fn resolve(&self, name: &str) -> anyhow::Result<Option<String>>;

    /// Every currently-known name, for completion.
    fn names(&self) -> anyhow::Result<Vec<String>>;
}

/// Argument resolved through a [`NamedLookup`].
pub struct LookupArg {
    source: Arc<dyn NamedLookup>,
}

impl LookupArg {
    pub fn new(source: Arc<dyn NamedLookup>) -> Self {
        LookupArg { source }
    }
}

impl ArgType for LookupArg {
    fn convert(&self, token: &str) -> Option<ArgValue> {
        self.source
            .resolve(token)
            .ok()
            .flatten()
            .map(ArgValue::Str)
    }

    fn complete(&self, ctx: &CompletionContext<'_>) -> anyhow::Result<Option<Vec<String>>> {
        let prefix = ctx.last_token().unwrap_or("");
        let matches = self
            .source
            .names()?
            .into_iter()
            .filter(|name| starts_with_ignore_case(name, prefix))
            .collect();
        Ok(Some(matches))
    }
}
