//! Command schemas and translation rules.
//!
//! A schema is declared once per endpoint at registration time. Every
//! accepted command lists its parameters together with the rule that turns
//! them into v1 parameters; nothing is derived from the request itself.

/// Legacy parameter carrying the operation identifier.
pub const ACTION_PARAM: &str = "action";

/// How a single v2 parameter becomes v1 parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationRule {
    /// Copy the scalar value under `target`.
    Identity { target: String },
    /// Join a list of scalars with `,` under `target`.
    ///
    /// Elements are not escaped; a comma inside an element is
    /// indistinguishable from a separator.
    JoinCsv { target: String },
    /// Emit every entry of a nested map as `prefix + key`.
    FlattenWithPrefix { prefix: String },
    /// Emit a fixed value under `target`, ignoring any input.
    ///
    /// Command constants (the action token among them) are rules of this
    /// kind that run before any parameter.
    InjectConstant { target: String, value: String },
}

impl TranslationRule {
    /// Shape accepted by the rule, for error messages.
    pub fn expected_shape(&self) -> &'static str {
        match self {
            TranslationRule::Identity { .. } => "a scalar",
            TranslationRule::JoinCsv { .. } => "a scalar or a list of scalars",
            TranslationRule::FlattenWithPrefix { .. } => "an object",
            TranslationRule::InjectConstant { .. } => "any value",
        }
    }
}

/// Declared parameters and constants of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    name: String,
    /// Only ever holds `InjectConstant` rules.
    constants: Vec<TranslationRule>,
    params: Vec<(String, TranslationRule)>,
    open: bool,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constants: Vec::new(),
            params: Vec::new(),
            open: false,
        }
    }

    /// Set the action token this command always produces.
    pub fn action(self, token: impl Into<String>) -> Self {
        self.constant(ACTION_PARAM, token)
    }

    /// Inject a fixed v1 parameter on every invocation.
    pub fn constant(mut self, target: impl Into<String>, value: impl Into<String>) -> Self {
        let target = target.into();
        self.constants.retain(|rule| {
            !matches!(rule, TranslationRule::InjectConstant { target: t, .. } if *t == target)
        });
        self.constants.push(TranslationRule::InjectConstant {
            target,
            value: value.into(),
        });
        self
    }

    /// Declare a parameter passed through under its own name.
    pub fn param(self, name: &str) -> Self {
        self.rename(name, name)
    }

    /// Declare several pass-through parameters.
    pub fn params(self, names: &[&str]) -> Self {
        names.iter().fold(self, |spec, name| spec.param(name))
    }

    pub fn rename(self, source: &str, target: &str) -> Self {
        self.rule(
            source,
            TranslationRule::Identity {
                target: target.to_string(),
            },
        )
    }

    pub fn csv(self, source: &str, target: &str) -> Self {
        self.rule(
            source,
            TranslationRule::JoinCsv {
                target: target.to_string(),
            },
        )
    }

    pub fn flatten(self, source: &str, prefix: &str) -> Self {
        self.rule(
            source,
            TranslationRule::FlattenWithPrefix {
                prefix: prefix.to_string(),
            },
        )
    }

    /// Declare `source` with an explicit rule, replacing any earlier rule.
    pub fn rule(mut self, source: &str, rule: TranslationRule) -> Self {
        match self.params.iter_mut().find(|(s, _)| s == source) {
            Some(entry) => entry.1 = rule,
            None => self.params.push((source.to_string(), rule)),
        }
        self
    }

    /// Accept undeclared parameters and pass them through by shape.
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn rule_for(&self, source: &str) -> Option<&TranslationRule> {
        self.params
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, rule)| rule)
    }

    pub fn declared_params(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(s, _)| s.as_str())
    }

    /// Input-independent rules, in declaration order.
    pub fn constants(&self) -> &[TranslationRule] {
        &self.constants
    }

    /// The action token, if the command declares one.
    pub fn action_token(&self) -> Option<&str> {
        self.constants.iter().find_map(|rule| match rule {
            TranslationRule::InjectConstant { target, value } if target == ACTION_PARAM => {
                Some(value.as_str())
            }
            _ => None,
        })
    }
}

/// The commands accepted by one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSchema {
    commands: Vec<CommandSpec>,
}

impl CommandSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. A later command with the same name replaces the earlier one.
    pub fn command(mut self, spec: CommandSpec) -> Self {
        self.commands.retain(|c| c.name != spec.name);
        self.commands.push(spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
