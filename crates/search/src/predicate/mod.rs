//! Search predicates
//!
//! A [`Predicate`] is a boolean condition over a [`SearchRecord`], kept as a
//! small typed tree so it can be logged, compared and handed to any index
//! implementation. [`builder`] folds field filters into one predicate.

pub mod builder;

pub use builder::{build, field_predicate};

use crate::record::{ItemId, SearchRecord};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every record; identity of AND
    True,
    /// Matches nothing; identity of OR
    False,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// Record lies under the given item
    AncestorIs(ItemId),
    /// Record language equals the tag exactly
    LanguageIs(String),
    /// Record is the latest version in its language
    LatestVersion,
    /// Some value of `field` contains `value` (case-sensitive substring)
    FieldContains { field: String, value: String },
}

impl Predicate {
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::FieldContains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Conjunction, folding identities and flattening nested ANDs
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::False, _) | (_, Predicate::False) => Predicate::False,
            (Predicate::And(mut left), Predicate::And(right)) => {
                left.extend(right);
                Predicate::And(left)
            }
            (Predicate::And(mut left), p) => {
                left.push(p);
                Predicate::And(left)
            }
            (p, Predicate::And(right)) => {
                let mut parts = Vec::with_capacity(right.len() + 1);
                parts.push(p);
                parts.extend(right);
                Predicate::And(parts)
            }
            (left, right) => Predicate::And(vec![left, right]),
        }
    }

    /// Disjunction, folding identities and flattening nested ORs
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::False, p) | (p, Predicate::False) => p,
            (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
            (Predicate::Or(mut left), Predicate::Or(right)) => {
                left.extend(right);
                Predicate::Or(left)
            }
            (Predicate::Or(mut left), p) => {
                left.push(p);
                Predicate::Or(left)
            }
            (p, Predicate::Or(right)) => {
                let mut parts = Vec::with_capacity(right.len() + 1);
                parts.push(p);
                parts.extend(right);
                Predicate::Or(parts)
            }
            (left, right) => Predicate::Or(vec![left, right]),
        }
    }

    pub fn evaluate(&self, record: &SearchRecord) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::And(parts) => parts.iter().all(|p| p.evaluate(record)),
            Predicate::Or(parts) => parts.iter().any(|p| p.evaluate(record)),
            Predicate::AncestorIs(id) => record.has_ancestor(id),
            Predicate::LanguageIs(tag) => record.language == *tag,
            Predicate::LatestVersion => record.is_latest_version,
            Predicate::FieldContains { field, value } => record
                .field_values(field)
                .iter()
                .any(|stored| stored.contains(value.as_str())),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => f.write_str("true"),
            Predicate::False => f.write_str("false"),
            Predicate::And(parts) => write_joined(f, parts, " AND "),
            Predicate::Or(parts) => write_joined(f, parts, " OR "),
            Predicate::AncestorIs(id) => write!(f, "_path:{}", id),
            Predicate::LanguageIs(tag) => write!(f, "_language:{}", tag),
            Predicate::LatestVersion => f.write_str("_latestversion:true"),
            Predicate::FieldContains { field, value } => write!(f, "{}:*{:?}*", field, value),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Predicate], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", part)?;
    }
    f.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(language: &str, latest: bool, title: &[&str]) -> SearchRecord {
        let mut fields = BTreeMap::new();
        fields.insert(
            "title".to_string(),
            title.iter().map(|t| t.to_string()).collect(),
        );
        SearchRecord {
            item_id: ItemId::new(uuid::Uuid::new_v4()),
            name: "item".to_string(),
            path: "/sitecore/content/item".to_string(),
            template_name: None,
            language: language.to_string(),
            version: 1,
            is_latest_version: latest,
            ancestor_ids: Vec::new(),
            fields,
        }
    }

    #[test]
    fn test_identities() {
        let p = Predicate::LatestVersion;
        assert_eq!(Predicate::True.and(p.clone()), p);
        assert_eq!(p.clone().and(Predicate::True), p);
        assert_eq!(Predicate::False.or(p.clone()), p);
        assert_eq!(p.clone().and(Predicate::False), Predicate::False);
        assert_eq!(p.clone().or(Predicate::True), Predicate::True);
    }

    #[test]
    fn test_and_is_associative_in_shape() {
        let a = Predicate::contains("title", "a");
        let b = Predicate::contains("title", "b");
        let c = Predicate::LatestVersion;

        let left = a.clone().and(b.clone()).and(c.clone());
        let right = a.and(b.and(c));
        assert_eq!(left, right);
    }

    #[test]
    fn test_field_contains_is_case_sensitive_substring() {
        let r = record("en", true, &["Acme Corporation"]);
        assert!(Predicate::contains("title", "Acme").evaluate(&r));
        assert!(Predicate::contains("title", "Corp").evaluate(&r));
        assert!(!Predicate::contains("title", "acme").evaluate(&r));
        assert!(!Predicate::contains("summary", "Acme").evaluate(&r));
    }

    #[test]
    fn test_scope_predicates() {
        let r = record("da-DK", false, &[]);
        assert!(Predicate::LanguageIs("da-DK".into()).evaluate(&r));
        assert!(!Predicate::LanguageIs("da".into()).evaluate(&r));
        assert!(!Predicate::LatestVersion.evaluate(&r));
    }

    #[test]
    fn test_display() {
        let p = Predicate::LatestVersion
            .and(Predicate::contains("title", "a").or(Predicate::contains("title", "b")));
        assert_eq!(
            p.to_string(),
            "(_latestversion:true AND (title:*\"a\"* OR title:*\"b\"*))"
        );
    }
}
