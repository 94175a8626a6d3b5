//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile configured url rules once
//! - Search every rule's pattern in the request path, in order
//! - Bind capture groups to names by position
//!
//! # Design Decisions
//! - Every matching rule applies, not just the first
//! - Later rules overwrite earlier ones for the same name
//! - Unanchored search, greedy quantifiers (regex crate semantics)
//! - Capture count must equal the number of names

use regex::Regex;

use crate::config::schema::UrlRule;
use crate::parameters::types::{namespace, ParameterError, ParameterMap};

/// A url rule with its pattern compiled.
#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    names: Vec<String>,
}

/// Ordered set of compiled url rules.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    rules: Vec<CompiledRule>,
}

impl PatternMatcher {
    /// Compile all rules, failing on the first invalid one.
    pub fn new(rules: &[UrlRule]) -> Result<Self, ParameterError> {
        let rules = rules
            .iter()
            .map(compile_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Write `param:<name>` for every capture of every matching rule.
    pub fn extract(&self, path: &str, params: &mut ParameterMap) {
        for rule in &self.rules {
            let Some(captures) = rule.regex.captures(path) else {
                continue;
            };

            // Group 0 is the whole match.
            for (name, group) in rule.names.iter().zip(captures.iter().skip(1)) {
                if let Some(group) = group {
                    params.insert(namespace::PARAM, name, group.as_str());
                }
            }
        }
    }
}

/// Compile a single rule, checking its capture count against its names.
fn compile_rule(rule: &UrlRule) -> Result<CompiledRule, ParameterError> {
    let regex = Regex::new(&rule.pattern).map_err(|source| ParameterError::InvalidPattern {
        pattern: rule.pattern.clone(),
        source,
    })?;

    let captures = regex.captures_len() - 1;
    if captures != rule.names.len() {
        return Err(ParameterError::CaptureCountMismatch {
            pattern: rule.pattern.clone(),
            captures,
            names: rule.names.len(),
        });
    }

    Ok(CompiledRule {
        regex,
        names: rule.names.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/teaching-resource/Queen-Elizabeth-II-Diamond-jubilee-2012-6206420";
    const BLURB: &str = "Queen-Elizabeth-II-Diamond-jubilee-2012";

    fn extract(rules: &[UrlRule], path: &str) -> ParameterMap {
        let matcher = PatternMatcher::new(rules).unwrap();
        let mut params = ParameterMap::new();
        matcher.extract(path, &mut params);
        params
    }

    #[test]
    fn test_greedy_split() {
        let params = extract(
            &[UrlRule::new(r"/teaching-resource/(.*)-(\d+)", ["blurb", "resourceId"])],
            PATH,
        );
        assert_eq!(params.get_str("param:blurb"), Some(BLURB));
        assert_eq!(params.get_str("param:resourceId"), Some("6206420"));
    }

    #[test]
    fn test_all_matching_rules_apply() {
        let params = extract(
            &[
                UrlRule::new(r"/teaching-resource/.*-(\d+)", ["resourceId"]),
                UrlRule::new(r"/teaching-resource/(.*)-\d+", ["blurb"]),
            ],
            PATH,
        );
        assert_eq!(params.get_str("param:resourceId"), Some("6206420"));
        assert_eq!(params.get_str("param:blurb"), Some(BLURB));
    }

    #[test]
    fn test_last_rule_wins() {
        let broad = UrlRule::new(r"/teaching-resource/(.*)", ["blurb"]);
        let narrow = UrlRule::new(r"/teaching-resource/(.*)-\d+", ["blurb"]);

        let params = extract(&[broad.clone(), narrow.clone()], PATH);
        assert_eq!(params.get_str("param:blurb"), Some(BLURB));

        // Reversed order flips the winner.
        let params = extract(&[narrow, broad], PATH);
        assert_eq!(
            params.get_str("param:blurb"),
            Some("Queen-Elizabeth-II-Diamond-jubilee-2012-6206420")
        );
    }

    #[test]
    fn test_non_matching_rule_contributes_nothing() {
        let params = extract(&[UrlRule::new(r"/lesson/(\d+)", ["lessonId"])], PATH);
        assert!(params.is_empty());
    }

    #[test]
    fn test_pattern_without_groups() {
        let params = extract(&[UrlRule::new("/teaching-resource/", Vec::<String>::new())], PATH);
        assert!(params.is_empty());
    }

    #[test]
    fn test_unmatched_optional_group_binds_nothing() {
        let params = extract(
            &[UrlRule::new(r"/teaching-resource/([A-Z]+)(_draft)?", ["initial", "draft"])],
            PATH,
        );
        assert_eq!(params.get_str("param:initial"), Some("Q"));
        assert!(!params.contains_key("param:draft"));
    }

    #[test]
    fn test_capture_count_mismatch_rejected() {
        let err = PatternMatcher::new(&[UrlRule::new(r"/a/(\d+)", ["id", "extra"])]).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::CaptureCountMismatch { captures: 1, names: 2, .. }
        ));

        let err = PatternMatcher::new(&[UrlRule::new(r"/a/(\d+)/(\w+)", ["id"])]).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::CaptureCountMismatch { captures: 2, names: 1, .. }
        ));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = PatternMatcher::new(&[UrlRule::new(r"/a/(\d+", ["id"])]).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidPattern { .. }));
    }
}
