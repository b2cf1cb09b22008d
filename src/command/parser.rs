//! Parsing of v2 command bodies.
//!
//! A body is a single JSON object with exactly one key, the command name.
//! Its value is either an object of named parameters or an array of such
//! objects, each element being an independent invocation.

use serde_json::Value;

use crate::command::value::ParamValue;
use crate::error::{GatewayError, GatewayResult};

/// One command invocation parsed from a request body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub name: String,
    pub params: Vec<(String, ParamValue)>,
}

impl ParsedCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// Parse a request body into command invocations.
///
/// An empty (or whitespace-only) body yields no commands.
pub fn parse_commands(body: &[u8]) -> GatewayResult<Vec<ParsedCommand>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| GatewayError::MalformedBody(format!("invalid JSON: {}", e)))?;

    let root = match value {
        Value::Object(map) => map,
        other => {
            return Err(GatewayError::MalformedBody(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    if root.len() != 1 {
        return Err(GatewayError::MalformedBody(format!(
            "expected exactly one command, found {}",
            root.len()
        )));
    }

    let Some((name, payload)) = root.into_iter().next() else {
        return Ok(Vec::new());
    };

    match payload {
        Value::Null => Ok(vec![ParsedCommand::new(name)]),
        Value::Object(params) => Ok(vec![ParsedCommand {
            name,
            params: ParamValue::map_from_json(params),
        }]),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(GatewayError::MalformedBody(format!(
                    "command '{}' has an empty batch",
                    name
                )));
            }
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(params) => Ok(ParsedCommand {
                        name: name.clone(),
                        params: ParamValue::map_from_json(params),
                    }),
                    other => Err(GatewayError::MalformedBody(format!(
                        "batch entries of command '{}' must be objects, got {}",
                        name,
                        json_kind(&other)
                    ))),
                })
                .collect()
        }
        other => Err(GatewayError::MalformedBody(format!(
            "command '{}' must be an object or an array of objects, got {}",
            name,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> GatewayResult<Vec<ParsedCommand>> {
        parse_commands(body.as_bytes())
    }

    #[test]
    fn test_empty_body_yields_no_commands() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  \n\t").unwrap().is_empty());
    }

    #[test]
    fn test_single_command() {
        let cmds = parse(r#"{"split": {"shard": "shard1", "numSubShards": 123}}"#).unwrap();
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].name, "split");
        assert_eq!(cmds[0].get("shard"), Some(&ParamValue::from("shard1")));
        assert_eq!(
            cmds[0].get("numSubShards").and_then(|v| v.scalar_string()),
            Some("123".to_string())
        );
    }

    #[test]
    fn test_empty_and_null_params() {
        let cmds = parse(r#"{"force-leader": {}}"#).unwrap();
        assert_eq!(cmds, vec![ParsedCommand::new("force-leader")]);

        let cmds = parse(r#"{"sync-shard": null}"#).unwrap();
        assert_eq!(cmds, vec![ParsedCommand::new("sync-shard")]);
    }

    #[test]
    fn test_batch_keeps_order() {
        let cmds = parse(r#"{"create": [{"shard": "a"}, {"shard": "b"}, {"shard": "c"}]}"#).unwrap();
        let shards: Vec<_> = cmds
            .iter()
            .map(|c| {
                assert_eq!(c.name, "create");
                c.get("shard").and_then(|v| v.scalar_string()).unwrap()
            })
            .collect();
        assert_eq!(shards, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_malformed_bodies() {
        let bad = [
            "{not json",
            "[]",
            "\"create\"",
            "{}",
            r#"{"create": {}, "split": {}}"#,
            r#"{"create": "shard1"}"#,
            r#"{"create": []}"#,
            r#"{"create": [{"shard": "a"}, 5]}"#,
        ];
        for body in bad {
            match parse(body) {
                Err(GatewayError::MalformedBody(_)) => {}
                other => panic!("body {:?} should be malformed, got {:?}", body, other),
            }
        }
    }
}
