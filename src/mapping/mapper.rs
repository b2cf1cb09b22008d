//! Applies translation rules to a validated command.

use crate::command::parser::ParsedCommand;
use crate::command::schema::{CommandSpec, TranslationRule};
use crate::command::value::ParamValue;
use crate::mapping::params::FlatParamSet;

/// The v1 parameters produced by one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedCommand {
    pub action: Option<String>,
    pub params: FlatParamSet,
}

/// Translate `command` using `spec`.
///
/// The command must already have been validated against `spec`; values with
/// an unexpected shape are skipped rather than reported here.
pub fn map_command(command: &ParsedCommand, spec: &CommandSpec) -> MappedCommand {
    let mut params = FlatParamSet::new();

    for rule in spec.constants() {
        apply_rule(&mut params, rule, &ParamValue::Null);
    }

    for (source, value) in &command.params {
        match spec.rule_for(source) {
            Some(rule) => apply_rule(&mut params, rule, value),
            None => pass_through(&mut params, source, value),
        }
    }

    MappedCommand {
        action: spec.action_token().map(str::to_string),
        params,
    }
}

fn apply_rule(params: &mut FlatParamSet, rule: &TranslationRule, value: &ParamValue) {
    match rule {
        TranslationRule::InjectConstant { target, value: constant } => {
            params.set(target, constant.as_str())
        }
        _ if value.is_null() => {}
        TranslationRule::Identity { target } => {
            if let Some(s) = value.scalar_string() {
                params.set(target, s);
            }
        }
        TranslationRule::JoinCsv { target } => {
            if let Some(s) = join_csv(value) {
                params.set(target, s);
            }
        }
        TranslationRule::FlattenWithPrefix { prefix } => {
            if let ParamValue::Map(entries) = value {
                flatten_into(params, prefix, entries);
            }
        }
    }
}

/// Undeclared parameters of open commands, translated by shape.
fn pass_through(params: &mut FlatParamSet, name: &str, value: &ParamValue) {
    match value {
        ParamValue::Null => {}
        ParamValue::Map(entries) => flatten_into(params, &format!("{}.", name), entries),
        other => {
            if let Some(s) = join_csv(other) {
                params.set(name, s);
            }
        }
    }
}

/// Scalars stringify; lists join with `,`.
///
/// Validated csv parameters only hold scalar elements. Elements of other
/// shapes (inside flattened bags or open commands) are kept as JSON text.
fn join_csv(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::List(items) => Some(
            items
                .iter()
                .map(|item| {
                    item.scalar_string()
                        .unwrap_or_else(|| item.to_json_string())
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => other.scalar_string(),
    }
}

fn flatten_into(params: &mut FlatParamSet, prefix: &str, entries: &[(String, ParamValue)]) {
    for (key, value) in entries {
        let name = format!("{}{}", prefix, key);
        match value {
            ParamValue::Null => {}
            ParamValue::Map(inner) => flatten_into(params, &format!("{}.", name), inner),
            other => {
                if let Some(s) = join_csv(other) {
                    params.set(&name, s);
                }
            }
        }
    }
}
