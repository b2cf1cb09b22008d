//! Structural validation of parsed commands against a schema.
//!
//! Only names and shapes are checked. Values are never inspected, and the
//! inner keys of nested maps are opaque.

use crate::command::parser::ParsedCommand;
use crate::command::schema::{CommandSchema, CommandSpec, TranslationRule};
use crate::command::value::ParamValue;
use crate::error::{GatewayError, GatewayResult};

/// Validate a command, returning the spec it resolved to.
///
/// `schema` is `None` for endpoints that accept no body; any command sent
/// to them is unknown.
pub fn validate_command<'s>(
    command: &ParsedCommand,
    schema: Option<&'s CommandSchema>,
) -> GatewayResult<&'s CommandSpec> {
    let spec = schema
        .and_then(|s| s.get(&command.name))
        .ok_or_else(|| GatewayError::UnknownCommand {
            command: command.name.clone(),
        })?;

    for (name, value) in &command.params {
        match spec.rule_for(name) {
            Some(rule) => {
                if !shape_fits(rule, value) {
                    return Err(GatewayError::InvalidParameterShape {
                        command: command.name.clone(),
                        parameter: name.clone(),
                        expected: rule.expected_shape(),
                    });
                }
            }
            None if spec.is_open() => {}
            None => {
                return Err(GatewayError::UnknownParameter {
                    command: command.name.clone(),
                    parameter: name.clone(),
                })
            }
        }
    }

    Ok(spec)
}

fn shape_fits(rule: &TranslationRule, value: &ParamValue) -> bool {
    if value.is_null() {
        return true;
    }
    match rule {
        TranslationRule::Identity { .. } => value.is_scalar(),
        TranslationRule::JoinCsv { .. } => match value {
            ParamValue::List(items) => items.iter().all(ParamValue::is_scalar),
            other => other.is_scalar(),
        },
        TranslationRule::FlattenWithPrefix { .. } => matches!(value, ParamValue::Map(_)),
        TranslationRule::InjectConstant { .. } => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> CommandSchema {
        CommandSchema::new()
            .command(
                CommandSpec::new("create")
                    .action("createshard")
                    .param("shard")
                    .csv("nodeSet", "createNodeSet")
                    .flatten("coreProperties", "property."),
            )
            .command(CommandSpec::new("anything").open())
    }

    fn cmd(name: &str, params: serde_json::Value) -> ParsedCommand {
        match ParamValue::from(params) {
            ParamValue::Map(params) => ParsedCommand {
                name: name.to_string(),
                params,
            },
            other => panic!("params must be an object, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_declared_params() {
        let schema = schema();
        let command = cmd(
            "create",
            json!({
                "shard": "shard1",
                "nodeSet": ["foo", "bar"],
                "coreProperties": {"anything": {"goes": [1, 2]}}
            }),
        );
        let spec = validate_command(&command, Some(&schema)).unwrap();
        assert_eq!(spec.name(), "create");
    }

    #[test]
    fn test_unknown_command() {
        let schema = schema();
        let err = validate_command(&cmd("delete", json!({})), Some(&schema)).unwrap_err();
        assert_eq!(
            err,
            GatewayError::UnknownCommand {
                command: "delete".into()
            }
        );

        // No schema at all: every command is unknown.
        let err = validate_command(&cmd("create", json!({})), None).unwrap_err();
        assert!(matches!(err, GatewayError::UnknownCommand { .. }));
    }

    #[test]
    fn test_unknown_parameter() {
        let schema = schema();
        let err =
            validate_command(&cmd("create", json!({"bogusField": "x"})), Some(&schema)).unwrap_err();
        assert_eq!(
            err,
            GatewayError::UnknownParameter {
                command: "create".into(),
                parameter: "bogusField".into(),
            }
        );
    }

    #[test]
    fn test_open_command_accepts_anything() {
        let schema = schema();
        let command = cmd("anything", json!({"x": 1, "y": [1, 2], "z": {"a": "b"}}));
        assert!(validate_command(&command, Some(&schema)).is_ok());
    }

    #[test]
    fn test_shape_mismatch() {
        let schema = schema();
        let cases = [
            json!({"shard": ["a", "b"]}),
            json!({"shard": {"a": "b"}}),
            json!({"nodeSet": [["nested"]]}),
            json!({"nodeSet": {"a": "b"}}),
            json!({"coreProperties": "flat"}),
        ];
        for params in cases {
            let err = validate_command(&cmd("create", params.clone()), Some(&schema)).unwrap_err();
            assert!(
                matches!(err, GatewayError::InvalidParameterShape { .. }),
                "{} should be rejected, got {:?}",
                params,
                err
            );
        }

        // Constants ignore their input, whatever its shape.
        let constant_schema = CommandSchema::new().command(CommandSpec::new("c").rule(
            "legacyMode",
            TranslationRule::InjectConstant {
                target: "compat".into(),
                value: "1".into(),
            },
        ));
        for value in [json!("x"), json!([{"a": 1}]), json!({"b": null})] {
            let command = cmd("c", json!({ "legacyMode": value }));
            assert!(validate_command(&command, Some(&constant_schema)).is_ok());
        }

        // Scalars are accepted where a list is, and null everywhere.
        let command = cmd(
            "create",
            json!({"nodeSet": "a,b", "shard": null, "coreProperties": null}),
        );
        assert!(validate_command(&command, Some(&schema)).is_ok());
    }
}
