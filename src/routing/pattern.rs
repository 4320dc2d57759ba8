//! Path patterns: `/contracts/create/{propertyId?}`.
//!
//! A pattern is a `/`-separated list of literal segments, required named
//! segments (`{name}`) and at most one optional named segment (`{name?}`),
//! which must come last. Empty segments are ignored on both sides, so
//! trailing and doubled slashes do not affect matching.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    MissingLeadingSlash(String),
    EmptyParamName(String),
    UnbalancedBrace(String),
    DuplicateParam { pattern: String, name: String },
    OptionalNotLast(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::MissingLeadingSlash(p) => write!(f, "pattern {p:?} must start with '/'"),
            PatternError::EmptyParamName(p) => write!(f, "pattern {p:?} has an unnamed parameter"),
            PatternError::UnbalancedBrace(p) => write!(f, "pattern {p:?} has an unbalanced brace"),
            PatternError::DuplicateParam { pattern, name } => {
                write!(f, "pattern {pattern:?} binds {name:?} more than once")
            }
            PatternError::OptionalNotLast(p) => {
                write!(f, "pattern {p:?} has an optional parameter before the last segment")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// A required parameter was not supplied when building a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParam(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Optional(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Splits a concrete path into its non-empty segments, dropping any query
/// string or fragment.
pub fn split_path(path: &str) -> Vec<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].split('/').filter(|s| !s.is_empty()).collect()
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(raw.to_string()));
        }

        let parts: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());
        let mut seen: Vec<&str> = Vec::new();

        for (i, part) in parts.iter().enumerate() {
            let segment = match (part.strip_prefix('{'), part.ends_with('}')) {
                (Some(inner), true) => {
                    let inner = &inner[..inner.len() - 1];
                    let (name, optional) = match inner.strip_suffix('?') {
                        Some(name) => (name, true),
                        None => (inner, false),
                    };
                    if name.is_empty() {
                        return Err(PatternError::EmptyParamName(raw.to_string()));
                    }
                    if name.contains(['{', '}', '?']) {
                        return Err(PatternError::UnbalancedBrace(raw.to_string()));
                    }
                    if seen.contains(&name) {
                        return Err(PatternError::DuplicateParam {
                            pattern: raw.to_string(),
                            name: name.to_string(),
                        });
                    }
                    seen.push(name);
                    if optional {
                        if i + 1 != parts.len() {
                            return Err(PatternError::OptionalNotLast(raw.to_string()));
                        }
                        Segment::Optional(name.to_string())
                    } else {
                        Segment::Param(name.to_string())
                    }
                }
                _ if part.contains(['{', '}']) => {
                    return Err(PatternError::UnbalancedBrace(raw.to_string()));
                }
                _ => Segment::Literal((*part).to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(n) | Segment::Optional(n) => Some(n.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Tests `path` against the pattern, returning the bound parameters.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        self.match_segments(&split_path(path))
    }

    pub(crate) fn match_segments(&self, parts: &[&str]) -> Option<HashMap<String, String>> {
        if parts.len() > self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match (segment, parts.get(i)) {
                (Segment::Literal(lit), Some(part)) if lit == part => {}
                (Segment::Param(name) | Segment::Optional(name), Some(part)) => {
                    params.insert(name.clone(), (*part).to_string());
                }
                (Segment::Optional(_), None) => {}
                _ => return None,
            }
        }
        Some(params)
    }

    /// Builds a concrete path. Optional parameters may be left out.
    pub fn build(&self, params: &HashMap<String, String>) -> Result<String, MissingParam> {
        let mut out = String::new();
        for segment in &self.segments {
            let value: &str = match segment {
                Segment::Literal(lit) => lit.as_str(),
                Segment::Param(name) => params
                    .get(name)
                    .map(String::as_str)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| MissingParam(name.clone()))?,
                Segment::Optional(name) => match params.get(name).map(String::as_str).filter(|v| !v.is_empty()) {
                    Some(v) => v,
                    None => continue,
                },
            };
            out.push('/');
            out.push_str(value);
        }
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_literal_pattern_matches_exactly() {
        let p = PathPattern::parse("/dashboard").unwrap();
        assert_eq!(p.matches("/dashboard"), Some(HashMap::new()));
        assert_eq!(p.matches("/dashboard/"), Some(HashMap::new()));
        assert_eq!(p.matches("/dashboard/extra"), None);
        assert_eq!(p.matches("/dash"), None);
        assert_eq!(p.matches("/"), None);
    }

    #[test]
    fn test_root_pattern() {
        let p = PathPattern::parse("/").unwrap();
        assert!(p.matches("/").is_some());
        assert!(p.matches("").is_some());
        assert!(p.matches("/login").is_none());
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        let p = PathPattern::parse("/properties").unwrap();
        assert!(p.matches("/properties?page=2").is_some());
        assert!(p.matches("/properties#top").is_some());
    }

    #[test]
    fn test_named_segment_binds() {
        let p = PathPattern::parse("/properties/{id}").unwrap();
        assert_eq!(p.matches("/properties/42"), Some(params(&[("id", "42")])));
        assert_eq!(p.matches("/properties"), None);
        assert_eq!(p.matches("/properties/42/edit"), None);
    }

    #[test]
    fn test_optional_trailing_segment() {
        let p = PathPattern::parse("/contracts/create/{propertyId?}").unwrap();
        assert_eq!(p.matches("/contracts/create"), Some(HashMap::new()));
        assert_eq!(
            p.matches("/contracts/create/7"),
            Some(params(&[("propertyId", "7")]))
        );
        assert_eq!(p.matches("/contracts/create/7/8"), None);
        assert_eq!(p.matches("/contracts"), None);
    }

    #[test]
    fn test_parse_rejects_invalid_patterns() {
        assert_eq!(
            PathPattern::parse("login"),
            Err(PatternError::MissingLeadingSlash("login".to_string()))
        );
        assert!(matches!(PathPattern::parse("/a/{}"), Err(PatternError::EmptyParamName(_))));
        assert!(matches!(PathPattern::parse("/a/{?}"), Err(PatternError::EmptyParamName(_))));
        assert!(matches!(PathPattern::parse("/a/{id"), Err(PatternError::UnbalancedBrace(_))));
        assert!(matches!(PathPattern::parse("/a/id}"), Err(PatternError::UnbalancedBrace(_))));
        assert!(matches!(
            PathPattern::parse("/a/{id}/{id}"),
            Err(PatternError::DuplicateParam { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/a/{id?}/b"),
            Err(PatternError::OptionalNotLast(_))
        ));
    }

    #[test]
    fn test_param_names_in_order() {
        let p = PathPattern::parse("/u/{user}/p/{post?}").unwrap();
        assert_eq!(p.param_names(), vec!["user", "post"]);
    }

    #[test]
    fn test_build_fills_params() {
        let p = PathPattern::parse("/contracts/create/{propertyId?}").unwrap();
        assert_eq!(p.build(&HashMap::new()).unwrap(), "/contracts/create");
        assert_eq!(
            p.build(&params(&[("propertyId", "9")])).unwrap(),
            "/contracts/create/9"
        );

        let p = PathPattern::parse("/properties/{id}").unwrap();
        assert_eq!(p.build(&HashMap::new()), Err(MissingParam("id".to_string())));

        let root = PathPattern::parse("/").unwrap();
        assert_eq!(root.build(&HashMap::new()).unwrap(), "/");
    }
}
