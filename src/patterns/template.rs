//! Path templates with an optional wildcard segment.

use crate::error::{RasscopeError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One `/`-separated piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Name matched exactly.
    Literal(String),
    /// Stands for any direct child name (`*`).
    Wildcard,
}

/// Parsed candidate path such as `/Geometry/2D Flow Areas/*/Terrain`.
///
/// Only a segment that is exactly `*` is a wildcard; a `*` inside a longer
/// name stays literal. At most one wildcard is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse template text.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| RasscopeError::InvalidTemplate {
            template: text.to_string(),
            reason: reason.to_string(),
        };

        let segments: Vec<Segment> = text
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => Segment::Wildcard,
                name => Segment::Literal(name.to_string()),
            })
            .collect();

        if segments.is_empty() {
            return Err(invalid("template names no node"));
        }
        if segments.iter().filter(|s| **s == Segment::Wildcard).count() > 1 {
            return Err(invalid("more than one wildcard segment"));
        }
        Ok(Self { segments })
    }

    /// Parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the template contains the wildcard segment.
    pub fn has_wildcard(&self) -> bool {
        self.wildcard_index().is_some()
    }

    fn wildcard_index(&self) -> Option<usize> {
        self.segments.iter().position(|s| *s == Segment::Wildcard)
    }

    /// Path of the group whose children the wildcard ranges over.
    pub fn base_path(&self) -> Option<String> {
        self.wildcard_index()
            .map(|idx| render(self.segments[..idx].iter(), ""))
    }

    /// Concrete path with the wildcard replaced by `child`.
    ///
    /// For a literal template this is the template path itself.
    pub fn substitute(&self, child: &str) -> String {
        render(self.segments.iter(), child)
    }
}

fn render<'a>(segments: impl Iterator<Item = &'a Segment>, child: &str) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        match segment {
            Segment::Literal(name) => path.push_str(name),
            Segment::Wildcard => path.push_str(child),
        }
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.substitute("*"))
    }
}

impl FromStr for PathTemplate {
    type Err = RasscopeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for PathTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_template() {
        let t = PathTemplate::parse("/Geometry/2D Flow Areas/*/Terrain").unwrap();
        assert!(t.has_wildcard());
        assert_eq!(t.base_path().as_deref(), Some("/Geometry/2D Flow Areas"));
        assert_eq!(t.substitute("Area1"), "/Geometry/2D Flow Areas/Area1/Terrain");
        assert_eq!(t.to_string(), "/Geometry/2D Flow Areas/*/Terrain");
    }

    #[test]
    fn star_inside_a_name_is_literal() {
        let t = PathTemplate::parse("/Results/Max*WSE").unwrap();
        assert!(!t.has_wildcard());
        assert_eq!(t.segments(), &[
            Segment::Literal("Results".into()),
            Segment::Literal("Max*WSE".into()),
        ]);
        assert_eq!(t.substitute("ignored"), "/Results/Max*WSE");
    }

    #[test]
    fn leading_wildcard_ranges_over_root() {
        let t = PathTemplate::parse("/*/Nodes").unwrap();
        assert_eq!(t.base_path().as_deref(), Some("/"));
    }

    #[test]
    fn rejects_two_wildcards_and_empty() {
        assert!(matches!(
            PathTemplate::parse("/a/*/b/*"),
            Err(RasscopeError::InvalidTemplate { .. })
        ));
        assert!(matches!(
            PathTemplate::parse("/"),
            Err(RasscopeError::InvalidTemplate { .. })
        ));
    }
}
