//! Path template matching.
//!
//! # Responsibilities
//! - Parse templates like `/collections/{collection}/shards/{shard}`
//! - Match a concrete path segment-by-segment, capturing variables
//! - Decide whether two templates can match the same path
//!
//! # Design Decisions
//! - Leading/trailing slashes are ignored on both sides
//! - Matching is case-sensitive
//! - A variable is a whole segment; it never captures an empty segment
//! - Captured values are percent-decoded after splitting, so `%2F` stays inside its segment
//! - No regex to guarantee O(n) matching

use std::fmt;

use percent_encoding::percent_decode_str;

use crate::error::RegistrationError;

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Variable(String),
}

/// Variables captured from a concrete path, in template order.
pub type PathVars = Vec<(String, String)>;

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.trim_matches('/');
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}

impl PathTemplate {
    /// Parse a template string.
    pub fn parse(template: &str) -> Result<Self, RegistrationError> {
        let invalid = |reason: String| RegistrationError::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        for part in split_path(template) {
            if part.is_empty() {
                return Err(invalid("empty path segment".into()));
            }
            let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(name) => {
                    if name.is_empty() || name.contains(['{', '}']) {
                        return Err(invalid(format!("bad variable segment '{}'", part)));
                    }
                    let seen = segments
                        .iter()
                        .any(|s| matches!(s, Segment::Variable(v) if v == name));
                    if seen {
                        return Err(invalid(format!("variable '{}' declared twice", name)));
                    }
                    Segment::Variable(name.to_string())
                }
                None => {
                    if part.contains(['{', '}']) {
                        return Err(invalid(format!("partial variable in segment '{}'", part)));
                    }
                    Segment::Literal(part.to_string())
                }
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: format!("/{}", template.trim_matches('/')),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the variables in template order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a concrete path, returning the captured variables.
    pub fn matches(&self, path: &str) -> Option<PathVars> {
        let mut vars = PathVars::new();
        let mut parts = split_path(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Variable(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    vars.push((name.clone(), decode_segment(part)));
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(vars)
    }

    /// True if some concrete path would match both templates.
    pub fn overlaps(&self, other: &PathTemplate) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    _ => true,
                })
    }
}

fn decode_segment(part: &str) -> String {
    percent_decode_str(part).decode_utf8_lossy().into_owned()
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        let t = PathTemplate::parse("collections/{collection}/shards/{shard}/").unwrap();
        assert_eq!(t.as_str(), "/collections/{collection}/shards/{shard}");
        assert_eq!(
            t.segments(),
            &[
                Segment::Literal("collections".into()),
                Segment::Variable("collection".into()),
                Segment::Literal("shards".into()),
                Segment::Variable("shard".into()),
            ]
        );
        assert_eq!(t.variables().collect::<Vec<_>>(), vec!["collection", "shard"]);

        let root = PathTemplate::parse("/").unwrap();
        assert!(root.segments().is_empty());
        assert_eq!(root.matches("/"), Some(vec![]));
    }

    #[test]
    fn test_parse_rejects_bad_templates() {
        assert!(PathTemplate::parse("/a/{}").is_err());
        assert!(PathTemplate::parse("/a/x{y}").is_err());
        assert!(PathTemplate::parse("/a//b").is_err());
        assert!(PathTemplate::parse("/{a}/{a}").is_err());
    }

    #[test]
    fn test_matches_captures_variables() {
        let t = PathTemplate::parse("/collections/{collection}/shards/{shard}").unwrap();

        let vars = t.matches("/collections/collName/shards/shardName").unwrap();
        assert_eq!(
            vars,
            vec![
                ("collection".to_string(), "collName".to_string()),
                ("shard".to_string(), "shardName".to_string()),
            ]
        );

        assert!(t.matches("/collections/collName/shards").is_none());
        assert!(t.matches("/collections/collName/shards/s1/extra").is_none());
        assert!(t.matches("/Collections/collName/shards/s1").is_none()); // Case sensitive
        assert!(t.matches("/collections//shards/s1").is_none());
    }

    #[test]
    fn test_matches_decodes_variables() {
        let t = PathTemplate::parse("/collections/{collection}/shards/{shard}").unwrap();

        let vars = t.matches("/collections/my%20coll/shards/s%2F1").unwrap();
        assert_eq!(
            vars,
            vec![
                ("collection".to_string(), "my coll".to_string()),
                ("shard".to_string(), "s/1".to_string()),
            ]
        );
    }

    #[test]
    fn test_overlaps() {
        let a = PathTemplate::parse("/c/{collection}/shards").unwrap();
        let b = PathTemplate::parse("/c/{name}/shards").unwrap();
        let c = PathTemplate::parse("/c/foo/shards").unwrap();
        let d = PathTemplate::parse("/c/{collection}/shards/{shard}").unwrap();
        let e = PathTemplate::parse("/collections/{collection}/shards").unwrap();

        assert!(a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(!a.overlaps(&d));
        assert!(!a.overlaps(&e));
    }
}
