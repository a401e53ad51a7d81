//! Recursive routing, validation and binding of command invocations.
//!
//! A [`Dispatcher`] owns one command tree together with the host callbacks
//! it consults while routing. Dispatch is synchronous and re-entrant by
//! recursion: one call walks the tree on the calling thread, with no
//! suspension point and no deadline.

use std::sync::Arc;

use crate::arg::CompletionContext;
use crate::context::{Invocation, Invoker};
use crate::error::{DispatchError, Result, UsageError};
use crate::help::HelpStyle;
use crate::host::{Host, Renderer};
use crate::node::{CommandSet, NodeId};
use crate::token::merge_quoted;
use crate::types::starts_with_ignore_case;

/// Routes token lines through a command tree and invokes handlers.
pub struct Dispatcher {
    set: CommandSet,
    owner: String,
    host: Arc<dyn Host>,
    renderer: Arc<dyn Renderer>,
    style: HelpStyle,
}

impl Dispatcher {
    pub fn new(
        set: CommandSet,
        owner: impl Into<String>,
        host: Arc<dyn Host>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Dispatcher {
            set,
            owner: owner.into(),
            host,
            renderer,
            style: HelpStyle::default(),
        }
    }

    pub fn with_style(mut self, style: HelpStyle) -> Self {
        self.style = style;
        self
    }

    /// The component this command tree is registered on behalf of.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Primary name of the root command.
    pub fn name(&self) -> &str {
        self.set.node(self.set.root()).name()
    }

    /// Aliases of the root command.
    pub fn aliases(&self) -> &[String] {
        self.set.node(self.set.root()).aliases()
    }

    pub fn set(&self) -> &CommandSet {
        &self.set
    }

    /// Setup-time mutation access. The tree must not be mutated while other
    /// threads dispatch against it.
    pub fn set_mut(&mut self) -> &mut CommandSet {
        &mut self.set
    }

    /// Execute a tokenized line against the root command.
    ///
    /// Returns the handler's success boolean, or `false` after a locally
    /// recovered usage or permission error. Handler failures propagate as
    /// [`DispatchError::Execution`].
    pub fn execute(&self, invoker: &Invoker, label: &str, tokens: &[String]) -> Result<bool> {
        self.execute_node(self.set.root(), invoker, label, tokens)
    }

    /// Produce completion candidates for a partially typed line.
    ///
    /// `Ok(None)` defers to the host's default completion; an error means a
    /// completion provider crashed.
    pub fn complete(
        &self,
        invoker: &Invoker,
        label: &str,
        tokens: &[String],
    ) -> Result<Option<Vec<String>>> {
        self.complete_node(self.set.root(), invoker, label, tokens)
    }

    fn execute_node(
        &self,
        id: NodeId,
        invoker: &Invoker,
        label: &str,
        tokens: &[String],
    ) -> Result<bool> {
        let tokens = merge_quoted(tokens);

        // Never run a command against a torn-down owner.
        if !self.host.enabled() {
            return Ok(false);
        }

        // Artifact of upstream splitting
        let tokens = strip_leading_empty(&tokens);

        let node = self.set.node(id);
        let min_args = node.min_args(invoker);

        if tokens.is_empty() {
            if !self.permitted(id, invoker) {
                self.refuse(id, invoker);
                return Ok(false);
            }

            if min_args > 0 {
                self.usage(Some(UsageError::NotEnoughArguments), id, invoker, label, tokens);
                return Ok(false);
            }

            // Pre-populate defaults of mandatory-flagged arguments.
            let named = node
                .args()
                .iter()
                .filter(|a| a.is_mandatory_flagged())
                .filter_map(|a| {
                    a.default_value()
                        .map(|d| (a.name().to_string(), d.to_string()))
                })
                .collect();

            return self.invoke(id, invoker, label, tokens, named);
        }

        // Subcommand routing wins over binding the token as an argument.
        let first = &tokens[0];
        if let Some(child) = self.set.child_matching(id, first) {
            return self.execute_node(child, invoker, first, &tokens[1..]);
        }

        if !self.permitted(id, invoker) {
            self.refuse(id, invoker);
            return Ok(false);
        }

        if tokens.len() < min_args {
            self.usage(Some(UsageError::NotEnoughArguments), id, invoker, label, tokens);
            return Ok(false);
        }
        if let Some(max_args) = node.max_args() {
            if tokens.len() > max_args {
                self.usage(Some(UsageError::TooManyArguments), id, invoker, label, tokens);
                return Ok(false);
            }
        }

        // Bind arguments left to right.
        let mut named: Vec<(String, String)> = Vec::with_capacity(node.args().len());
        let mut index = 0;

        for spec in node.args() {
            let value: Option<String> = if spec.is_collection() {
                (index < tokens.len()).then(|| tokens[index..].join(" "))
            } else {
                tokens.get(index).cloned()
            };

            if spec.is_mandatory_for(invoker) {
                match value.as_deref().and_then(|v| spec.arg_type().convert(v)) {
                    Some(converted) => {
                        named.push((spec.name().to_string(), converted.to_string()));
                        index += 1;
                    }
                    None => {
                        self.usage(Some(UsageError::MismatchArguments), id, invoker, label, tokens);
                        return Ok(false);
                    }
                }
            } else {
                if let Some(v) = value.as_deref() {
                    if spec.arg_type().validate(v) {
                        named.push((spec.name().to_string(), v.to_string()));
                        index += 1;
                        continue;
                    }
                }
                // A validating default binds without consuming the token;
                // otherwise the slot stays unbound.
                if let Some(default) = spec.default_value() {
                    if spec.arg_type().validate(default) {
                        named.push((spec.name().to_string(), default.to_string()));
                    }
                }
            }
        }

        if index < tokens.len() && !node.has_collection() {
            self.usage(Some(UsageError::MismatchArguments), id, invoker, label, tokens);
            return Ok(false);
        }

        self.invoke(id, invoker, label, tokens, named)
    }

    fn complete_node(
        &self,
        id: NodeId,
        invoker: &Invoker,
        label: &str,
        tokens: &[String],
    ) -> Result<Option<Vec<String>>> {
        let tokens = strip_leading_empty(tokens);

        // Recurse into a matching child only while tokens would remain for
        // it; a bare child name falls through to this node's candidates.
        if let Some(first) = tokens.first() {
            if tokens.len() > 1 {
                if let Some(child) = self.set.child_matching(id, first) {
                    let path = format!("{} {}", label, first);
                    return self.complete_node(child, invoker, &path, &tokens[1..]);
                }
            }
        }

        let node = self.set.node(id);
        let mut candidates: Vec<String> = Vec::new();

        let filled: anyhow::Result<()> = (|| {
            if tokens.is_empty() {
                for &child in node.children() {
                    candidates.push(self.set.node(child).name().to_string());
                }
                if let Some(first_arg) = node.args().first() {
                    let ctx = CompletionContext::new(invoker, &tokens);
                    if let Some(more) = first_arg.arg_type().complete(&ctx)? {
                        candidates.extend(more);
                    }
                }
            } else {
                let last = tokens.last().map(String::as_str).unwrap_or("");
                for &child in node.children() {
                    let name = self.set.node(child).name();
                    if starts_with_ignore_case(name, last) {
                        candidates.push(name.to_string());
                    }
                }
                // The slot being completed is the one the last token fills.
                if let Some(spec) = node.args().get(tokens.len() - 1) {
                    let ctx = CompletionContext::new(invoker, &tokens);
                    if let Some(more) = spec.arg_type().complete(&ctx)? {
                        candidates.extend(more);
                    }
                }
            }
            Ok(())
        })();

        filled.map_err(|source| DispatchError::Completion {
            line: attempted_line(label, &tokens),
            owner: self.owner.clone(),
            source,
        })?;

        if candidates.is_empty() {
            return Ok(None);
        }
        candidates.sort_by(|a, b| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()));
        Ok(Some(candidates))
    }

    fn invoke(
        &self,
        id: NodeId,
        invoker: &Invoker,
        label: &str,
        tokens: Vec<String>,
        named: Vec<(String, String)>,
    ) -> Result<bool> {
        let ctx = Invocation::new(
            invoker,
            &self.set,
            id,
            label,
            tokens,
            named,
            self.host.as_ref(),
            self.renderer.as_ref(),
            &self.style,
        );

        match self.set.node(id).handler() {
            Some(handler) => handler.run(&ctx).map_err(|source| DispatchError::Execution {
                label: label.to_string(),
                owner: self.owner.clone(),
                source,
            }),
            None => Ok(false),
        }
    }

    fn permitted(&self, id: NodeId, invoker: &Invoker) -> bool {
        match self.set.node(id).permission() {
            None | Some("") => true,
            Some(key) => self.host.has_permission(invoker, key),
        }
    }

    fn refuse(&self, id: NodeId, invoker: &Invoker) {
        let key = self.set.node(id).permission().unwrap_or("");
        let template = self
            .host
            .permission_message()
            .map(|t| t.replace("<permission>", key));
        self.renderer.permission_refused(invoker, key, template);
    }

    fn usage(
        &self,
        error: Option<UsageError>,
        id: NodeId,
        invoker: &Invoker,
        label: &str,
        tokens: Vec<String>,
    ) {
        let ctx = Invocation::new(
            invoker,
            &self.set,
            id,
            label,
            tokens,
            Vec::new(),
            self.host.as_ref(),
            self.renderer.as_ref(),
            &self.style,
        );
        self.renderer.usage(error, &ctx);
    }
}

fn strip_leading_empty(tokens: &[String]) -> Vec<String> {
    match tokens.first() {
        Some(first) if first.is_empty() => tokens[1..].to_vec(),
        _ => tokens.to_vec(),
    }
}

fn attempted_line(label: &str, tokens: &[String]) -> String {
    if tokens.is_empty() {
        label.to_string()
    } else {
        format!("{} {}", label, tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::ArgSpec;
    use crate::help::attach_help;
    use crate::node::CommandNode;
    use crate::types::{BoolArg, IntegerArg, WordListArg};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Usage(Option<UsageError>, String),
        Refused(String, Option<String>),
        Lines(Vec<String>),
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Event>>);

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Renderer for Recorder {
        fn usage(&self, error: Option<UsageError>, ctx: &Invocation<'_>) {
            self.0
                .lock()
                .unwrap()
                .push(Event::Usage(error, ctx.node().name().to_string()));
        }

        fn permission_refused(&self, _invoker: &Invoker, key: &str, template: Option<String>) {
            self.0
                .lock()
                .unwrap()
                .push(Event::Refused(key.to_string(), template));
        }

        fn lines(&self, _invoker: &Invoker, lines: &[String]) {
            self.0.lock().unwrap().push(Event::Lines(lines.to_vec()));
        }
    }

    struct TestHost {
        enabled: AtomicBool,
        granted: Vec<String>,
        message: Option<String>,
    }

    impl Default for TestHost {
        fn default() -> Self {
            TestHost {
                enabled: AtomicBool::new(true),
                granted: Vec::new(),
                message: None,
            }
        }
    }

    impl Host for TestHost {
        fn enabled(&self) -> bool {
            self.enabled.load(Ordering::Relaxed)
        }

        fn has_permission(&self, _invoker: &Invoker, key: &str) -> bool {
            self.granted.iter().any(|k| k == key)
        }

        fn permission_message(&self) -> Option<&str> {
            self.message.as_deref()
        }
    }

    #[derive(Default)]
    struct Captured(Mutex<Vec<(Option<String>, usize)>>);

    fn toks(line: &str) -> Vec<String> {
        if line.is_empty() {
            Vec::new()
        } else {
            line.split(' ').map(str::to_string).collect()
        }
    }

    fn interactive() -> Invoker {
        Invoker::interactive("operator")
    }

    /// `pay <amount:int> [note:bool default=true]`, child `sub` with its own
    /// `echo` grandchild.
    fn dispatcher_with(
        host: TestHost,
        captured: Arc<Captured>,
    ) -> (Dispatcher, Arc<Recorder>) {
        let cap = Arc::clone(&captured);
        let mut set = CommandSet::new(
            CommandNode::new("pay")
                .with_description("Send an amount")
                .with_handler(move |ctx: &Invocation<'_>| {
                    cap.0.lock().unwrap().push((
                        ctx.arg("amount").map(str::to_string),
                        ctx.num_tokens(),
                    ));
                    Ok(true)
                })
                .with_arg(ArgSpec::required("amount", IntegerArg))
                .unwrap()
                .with_arg(ArgSpec::optional("note", BoolArg).with_default("true"))
                .unwrap(),
        );
        let root = set.root();
        let sub = set
            .add_child(
                root,
                CommandNode::new("sub")
                    .with_aliases(["s"])
                    .with_handler(|_: &Invocation<'_>| Ok(true)),
            )
            .unwrap();
        set.add_child(
            sub,
            CommandNode::new("echo").with_handler(|_: &Invocation<'_>| Ok(true)),
        )
        .unwrap();

        let renderer = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::new(set, "testsuite", Arc::new(host), renderer.clone());
        (dispatcher, renderer)
    }

    #[test]
    fn routes_subcommands_before_own_arguments() {
        let captured = Arc::new(Captured::default());
        let (dispatcher, _renderer) = dispatcher_with(TestHost::default(), captured.clone());

        // "sub" resolves to the child even though "pay" takes arguments.
        assert!(dispatcher
            .execute(&interactive(), "pay", &toks("sub"))
            .unwrap());
        assert!(captured.0.lock().unwrap().is_empty());

        // Aliases and case both route.
        assert!(dispatcher
            .execute(&interactive(), "pay", &toks("S echo"))
            .unwrap());
    }

    #[test]
    fn not_enough_arguments() {
        let captured = Arc::new(Captured::default());
        let (dispatcher, renderer) = dispatcher_with(TestHost::default(), captured);

        let ok = dispatcher.execute(&interactive(), "pay", &[]).unwrap();
        assert!(!ok);
        assert_eq!(
            renderer.events(),
            vec![Event::Usage(
                Some(UsageError::NotEnoughArguments),
                "pay".to_string()
            )]
        );
    }

    #[test]
    fn too_many_arguments() {
        let captured = Arc::new(Captured::default());
        let (dispatcher, renderer) = dispatcher_with(TestHost::default(), captured);

        let ok = dispatcher
            .execute(&interactive(), "pay", &toks("1 true extra"))
            .unwrap();
        assert!(!ok);
        assert_eq!(
            renderer.events(),
            vec![Event::Usage(
                Some(UsageError::TooManyArguments),
                "pay".to_string()
            )]
        );
    }

    #[test]
    fn mismatched_mandatory_argument() {
        let captured = Arc::new(Captured::default());
        let (dispatcher, renderer) = dispatcher_with(TestHost::default(), captured);

        let ok = dispatcher
            .execute(&interactive(), "pay", &toks("ten"))
            .unwrap();
        assert!(!ok);
        assert_eq!(
            renderer.events(),
            vec![Event::Usage(
                Some(UsageError::MismatchArguments),
                "pay".to_string()
            )]
        );
    }

    #[test]
    fn binds_converted_mandatory_and_raw_optional() {
        let captured = Arc::new(Captured::default());
        let (dispatcher, _renderer) = dispatcher_with(TestHost::default(), captured.clone());

        assert!(dispatcher
            .execute(&interactive(), "pay", &toks("0042 yes"))
            .unwrap());

        // Mandatory slots store the converted canonical form, optional slots
        // the raw token.
        let calls = captured.0.lock().unwrap();
        assert_eq!(calls[0].0.as_deref(), Some("42"));
        assert_eq!(calls[0].1, 2);
    }

    #[test]
    fn optional_default_binds_without_consuming() {
        let cap = Arc::new(Mutex::new(Vec::<(Option<String>, Option<String>)>::new()));
        let cap2 = Arc::clone(&cap);
        let set = CommandSet::new(
            CommandNode::new("mix")
                .with_handler(move |ctx: &Invocation<'_>| {
                    cap2.lock().unwrap().push((
                        ctx.arg("flag").map(str::to_string),
                        ctx.arg("rest").map(str::to_string),
                    ));
                    Ok(true)
                })
                .with_arg(ArgSpec::optional("flag", BoolArg).with_default("false"))
                .unwrap()
                .with_arg(ArgSpec::optional("rest", WordListArg))
                .unwrap(),
        );
        let renderer = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::new(
            set,
            "testsuite",
            Arc::new(TestHost::default()),
            renderer.clone(),
        );

        // "hello there" fails BoolArg, so the default binds and the tokens
        // fall through to the collector slot.
        assert!(dispatcher
            .execute(&interactive(), "mix", &toks("hello there"))
            .unwrap());
        let calls = cap.lock().unwrap();
        assert_eq!(calls[0].0.as_deref(), Some("false"));
        assert_eq!(calls[0].1.as_deref(), Some("hello there"));
    }

    #[test]
    fn leftover_tokens_without_collector_mismatch() {
        let set = CommandSet::new(
            CommandNode::new("one")
                .with_handler(|_: &Invocation<'_>| Ok(true))
                .with_arg(ArgSpec::optional("flag", BoolArg))
                .unwrap(),
        );
        let renderer = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::new(
            set,
            "testsuite",
            Arc::new(TestHost::default()),
            renderer.clone(),
        );

        let ok = dispatcher
            .execute(&interactive(), "one", &toks("nonsense"))
            .unwrap();
        assert!(!ok);
        assert_eq!(
            renderer.events(),
            vec![Event::Usage(
                Some(UsageError::MismatchArguments),
                "one".to_string()
            )]
        );
    }

    #[test]
    fn empty_call_prepopulates_mandatory_defaults() {
        let cap = Arc::new(Mutex::new(Vec::<Option<String>>::new()));
        let cap2 = Arc::clone(&cap);
        let set = CommandSet::new(
            CommandNode::new("page")
                .with_handler(move |ctx: &Invocation<'_>| {
                    cap2.lock().unwrap().push(ctx.arg("page").map(str::to_string));
                    Ok(true)
                })
                .with_arg(ArgSpec::required("page", IntegerArg).with_default("1"))
                .unwrap(),
        );
        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);

        assert!(dispatcher.execute(&interactive(), "page", &[]).unwrap());
        assert_eq!(cap.lock().unwrap()[0].as_deref(), Some("1"));
    }

    #[test]
    fn quoted_tokens_are_remerged_before_binding() {
        let cap = Arc::new(Mutex::new(Vec::<usize>::new()));
        let cap2 = Arc::clone(&cap);
        let set = CommandSet::new(
            CommandNode::new("say")
                .with_handler(move |ctx: &Invocation<'_>| {
                    cap2.lock().unwrap().push(ctx.num_tokens());
                    Ok(true)
                })
                .with_arg(ArgSpec::required("message", WordListArg))
                .unwrap(),
        );
        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);

        assert!(dispatcher
            .execute(&interactive(), "say", &toks("\"a b\" c"))
            .unwrap());
        assert_eq!(cap.lock().unwrap()[0], 2);
    }

    #[test]
    fn disabled_host_fails_silently() {
        let captured = Arc::new(Captured::default());
        let host = TestHost {
            enabled: AtomicBool::new(false),
            ..TestHost::default()
        };
        let (dispatcher, renderer) = dispatcher_with(host, captured);

        let ok = dispatcher
            .execute(&interactive(), "pay", &toks("1"))
            .unwrap();
        assert!(!ok);
        assert!(renderer.events().is_empty());
    }

    #[test]
    fn permission_refusal_with_template() {
        let set = CommandSet::new(
            CommandNode::new("admin")
                .with_permission("ops.admin")
                .with_handler(|_: &Invocation<'_>| Ok(true)),
        );
        let renderer = Arc::new(Recorder::default());
        let host = TestHost {
            message: Some("you need <permission> for that".to_string()),
            ..TestHost::default()
        };
        let dispatcher = Dispatcher::new(set, "testsuite", Arc::new(host), renderer.clone());

        let ok = dispatcher.execute(&interactive(), "admin", &[]).unwrap();
        assert!(!ok);
        assert_eq!(
            renderer.events(),
            vec![Event::Refused(
                "ops.admin".to_string(),
                Some("you need ops.admin for that".to_string())
            )]
        );
    }

    #[test]
    fn empty_permission_key_is_always_permitted() {
        let set = CommandSet::new(
            CommandNode::new("open")
                .with_permission("")
                .with_handler(|_: &Invocation<'_>| Ok(true)),
        );
        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);
        assert!(dispatcher.execute(&interactive(), "open", &[]).unwrap());
    }

    #[test]
    fn handler_failure_is_wrapped_with_label_and_owner() {
        let set = CommandSet::new(
            CommandNode::new("boom")
                .with_handler(|_: &Invocation<'_>| -> anyhow::Result<bool> {
                    anyhow::bail!("kaput")
                }),
        );
        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);

        let err = dispatcher.execute(&interactive(), "boom", &[]).unwrap_err();
        match err {
            DispatchError::Execution { label, owner, .. } => {
                assert_eq!(label, "boom");
                assert_eq!(owner, "testsuite");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nodes_without_handlers_report_failure() {
        let set = CommandSet::new(CommandNode::new("stub"));
        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);
        assert!(!dispatcher.execute(&interactive(), "stub", &[]).unwrap());
    }

    #[test]
    fn completion_lists_children_and_first_argument() {
        let mut set = CommandSet::new(
            CommandNode::new("root")
                .with_arg(ArgSpec::optional("flag", BoolArg))
                .unwrap(),
        );
        let root = set.root();
        set.add_child(root, CommandNode::new("beta")).unwrap();
        set.add_child(root, CommandNode::new("alpha")).unwrap();

        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);

        let candidates = dispatcher
            .complete(&interactive(), "root", &[])
            .unwrap()
            .unwrap();
        assert_eq!(candidates, vec!["alpha", "beta", "false", "true"]);
    }

    #[test]
    fn completion_filters_children_by_last_token() {
        let mut set = CommandSet::new(CommandNode::new("root"));
        let root = set.root();
        set.add_child(root, CommandNode::new("start")).unwrap();
        set.add_child(root, CommandNode::new("stop")).unwrap();
        set.add_child(root, CommandNode::new("reset")).unwrap();

        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);

        let candidates = dispatcher
            .complete(&interactive(), "root", &toks("st"))
            .unwrap()
            .unwrap();
        assert_eq!(candidates, vec!["start", "stop"]);

        // A fully typed child name with no further tokens still completes at
        // this node, not inside the child.
        let candidates = dispatcher
            .complete(&interactive(), "root", &toks("start"))
            .unwrap()
            .unwrap();
        assert_eq!(candidates, vec!["start"]);
    }

    #[test]
    fn completion_recurses_into_children_with_remaining_tokens() {
        let mut set = CommandSet::new(CommandNode::new("root"));
        let root = set.root();
        let sub = set.add_child(root, CommandNode::new("sub")).unwrap();
        set.add_child(sub, CommandNode::new("inner")).unwrap();

        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);

        let candidates = dispatcher
            .complete(&interactive(), "root", &toks("sub in"))
            .unwrap()
            .unwrap();
        assert_eq!(candidates, vec!["inner"]);
    }

    #[test]
    fn completion_defers_when_empty() {
        let set = CommandSet::new(CommandNode::new("leaf"));
        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);
        assert!(dispatcher
            .complete(&interactive(), "leaf", &toks("x"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn completion_failure_carries_the_attempted_line() {
        struct Crashing;
        impl crate::arg::ArgType for Crashing {
            fn convert(&self, _token: &str) -> Option<crate::ArgValue> {
                None
            }
            fn complete(
                &self,
                _ctx: &CompletionContext<'_>,
            ) -> anyhow::Result<Option<Vec<String>>> {
                anyhow::bail!("registry offline")
            }
        }

        let set = CommandSet::new(
            CommandNode::new("find")
                .with_arg(ArgSpec::required("target", Crashing))
                .unwrap(),
        );
        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);

        let err = dispatcher
            .complete(&interactive(), "find", &toks("someth"))
            .unwrap_err();
        match err {
            DispatchError::Completion { line, owner, .. } => {
                assert_eq!(line, "find someth");
                assert_eq!(owner, "testsuite");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn completion_failure_reports_the_full_line_through_subcommands() {
        struct Crashing;
        impl crate::arg::ArgType for Crashing {
            fn convert(&self, _token: &str) -> Option<crate::ArgValue> {
                None
            }
            fn complete(
                &self,
                _ctx: &CompletionContext<'_>,
            ) -> anyhow::Result<Option<Vec<String>>> {
                anyhow::bail!("registry offline")
            }
        }

        let mut set = CommandSet::new(CommandNode::new("root"));
        let root = set.root();
        set.add_child(
            root,
            CommandNode::new("find")
                .with_arg(ArgSpec::required("target", Crashing))
                .unwrap(),
        )
        .unwrap();

        let renderer = Arc::new(Recorder::default());
        let dispatcher =
            Dispatcher::new(set, "testsuite", Arc::new(TestHost::default()), renderer);

        let err = dispatcher
            .complete(&interactive(), "root", &toks("find someth"))
            .unwrap_err();
        match err {
            DispatchError::Completion { line, .. } => {
                assert_eq!(line, "root find someth");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn help_subcommand_renders_pages() {
        let mut set = CommandSet::new(
            CommandNode::new("tool")
                .with_description("The demo tool")
                .with_arg(ArgSpec::optional("flag", BoolArg))
                .unwrap(),
        );
        let root = set.root();
        set.add_child(
            root,
            CommandNode::new("run").with_description("Run the thing"),
        )
        .unwrap();
        attach_help(&mut set, root).unwrap();

        let renderer = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::new(
            set,
            "testsuite",
            Arc::new(TestHost::default()),
            renderer.clone(),
        );

        assert!(dispatcher
            .execute(&interactive(), "tool", &toks("help"))
            .unwrap());

        let events = renderer.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::Lines(lines) => {
                assert!(lines[0].contains("Help for \"tool\""));
                assert!(lines.iter().any(|l| l.contains("tool run")));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
