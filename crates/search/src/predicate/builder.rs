//! Field filter folding
//!
//! Each filter becomes one sub-predicate: an AND filter is seeded with
//! `True` and requires every value, an OR filter is seeded with `False` and
//! requires any value. Sub-predicates of different filters are always ANDed.

use super::Predicate;
use crate::filter::{FieldFilter, FilterOperator};

/// Fold a filter list into a single predicate
pub fn build(filters: &[FieldFilter]) -> Predicate {
    filters
        .iter()
        .map(field_predicate)
        .fold(Predicate::True, Predicate::and)
}

/// Predicate for one field filter
///
/// An empty value list yields the seed unchanged: `True` for AND, `False`
/// for OR. Decoded request filters never reach this with no values.
pub fn field_predicate(filter: &FieldFilter) -> Predicate {
    let terms = filter
        .values
        .iter()
        .map(|value| Predicate::contains(&filter.name, value));

    match filter.operator {
        FilterOperator::And => terms.fold(Predicate::True, Predicate::and),
        FilterOperator::Or => terms.fold(Predicate::False, Predicate::or),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ItemId, SearchRecord};
    use std::collections::BTreeMap;

    fn filter(name: &str, values: &[&str], operator: FilterOperator) -> FieldFilter {
        FieldFilter {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
            operator,
        }
    }

    /// Build a record from (field, value) pairs; repeated names collect values
    fn record(pairs: &[(&str, &str)]) -> SearchRecord {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in pairs {
            fields.entry(name.to_string()).or_default().push(value.to_string());
        }
        SearchRecord {
            item_id: ItemId::new(uuid::Uuid::new_v4()),
            name: "item".to_string(),
            path: "/sitecore/content/item".to_string(),
            template_name: None,
            language: "en".to_string(),
            version: 1,
            is_latest_version: true,
            ancestor_ids: Vec::new(),
            fields,
        }
    }

    #[test]
    fn test_and_requires_every_value() {
        let p = build(&[filter("tags", &["a", "b"], FilterOperator::And)]);

        assert!(p.evaluate(&record(&[("tags", "a"), ("tags", "b")])));
        assert!(p.evaluate(&record(&[("tags", "ab")])));
        assert!(!p.evaluate(&record(&[("tags", "a")])));
        assert!(!p.evaluate(&record(&[])));
    }

    #[test]
    fn test_or_requires_any_value() {
        let p = build(&[filter("tags", &["a", "b"], FilterOperator::Or)]);

        assert!(p.evaluate(&record(&[("tags", "a")])));
        assert!(p.evaluate(&record(&[("tags", "xbx")])));
        assert!(!p.evaluate(&record(&[("tags", "c")])));
        assert!(!p.evaluate(&record(&[])));
    }

    #[test]
    fn test_fields_are_always_anded() {
        let filters = [
            filter("title", &["Acme", "Globex"], FilterOperator::Or),
            filter("category", &["news"], FilterOperator::Or),
        ];
        let p = build(&filters);

        assert!(p.evaluate(&record(&[("title", "Acme"), ("category", "news")])));
        assert!(!p.evaluate(&record(&[("title", "Acme"), ("category", "blog")])));
        assert!(!p.evaluate(&record(&[("category", "news")])));
    }

    #[test]
    fn test_disjoint_fields_equal_conjunction_of_parts() {
        let title = filter("title", &["x", "y"], FilterOperator::And);
        let category = filter("category", &["news", "blog"], FilterOperator::Or);
        let author = filter("author", &["kim"], FilterOperator::And);

        let combined = build(&[title.clone(), category.clone(), author.clone()]);
        let conjunction = build(&[title])
            .and(build(&[category]))
            .and(build(&[author]));

        assert_eq!(combined, conjunction);
    }

    #[test]
    fn test_filter_order_does_not_change_matches() {
        let a = filter("title", &["Acme"], FilterOperator::Or);
        let b = filter("category", &["news", "blog"], FilterOperator::Or);
        let forward = build(&[a.clone(), b.clone()]);
        let backward = build(&[b, a]);

        let records = [
            record(&[("title", "Acme"), ("category", "news")]),
            record(&[("title", "Acme"), ("category", "misc")]),
            record(&[("title", "Other"), ("category", "blog")]),
        ];
        for r in &records {
            assert_eq!(forward.evaluate(r), backward.evaluate(r));
        }
    }

    #[test]
    fn test_empty_values_keep_seed() {
        assert_eq!(field_predicate(&filter("title", &[], FilterOperator::And)), Predicate::True);
        assert_eq!(field_predicate(&filter("title", &[], FilterOperator::Or)), Predicate::False);
    }

    #[test]
    fn test_no_filters_match_everything() {
        assert_eq!(build(&[]), Predicate::True);
    }
}
