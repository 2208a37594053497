#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Derives labels and component schema names from entity slugs.
//!
//! `orders` -> singular `Order`, plural `Orders`; explicit labels win.

use crate::entity::{EntityDefinition, EntityKind};
use heck::{ToTitleCase, ToUpperCamelCase};

/// Human readable singular label of an entity.
pub fn singular(entity: &EntityDefinition) -> String {
    if let Some(label) = entity.labels.as_ref().and_then(|l| l.singular.as_ref()) {
        return label.clone();
    }
    let words = entity.slug.to_title_case();
    match entity.kind {
        EntityKind::Collection => singularize(&words),
        EntityKind::Global => words,
    }
}

/// Human readable plural label of an entity.
pub fn plural(entity: &EntityDefinition) -> String {
    entity
        .labels
        .as_ref()
        .and_then(|l| l.plural.clone())
        .unwrap_or_else(|| entity.slug.to_title_case())
}

/// Component schema name of a single document, e.g. `Order`.
pub fn singular_schema_name(entity: &EntityDefinition) -> String {
    singular(entity).to_upper_camel_case()
}

/// Component schema name of a page of documents, e.g. `Orders`.
///
/// Falls back to a `List` suffix when the plural would clash with the singular.
pub fn plural_schema_name(entity: &EntityDefinition) -> String {
    let name = plural(entity).to_upper_camel_case();
    if name == singular_schema_name(entity) {
        format!("{}List", name)
    } else {
        name
    }
}

/// Description injected into the primary schema.
pub fn description(entity: &EntityDefinition) -> Option<String> {
    entity.description.clone().filter(|d| !d.trim().is_empty())
}

/// Singularizes the last word of `words` with common English suffix rules.
///
/// Irregular plurals (`people`, `canoes`) need explicit labels.
fn singularize(words: &str) -> String {
    let (head, last) = match words.rfind(' ') {
        Some(idx) => (&words[..=idx], &words[idx + 1..]),
        None => ("", words),
    };
    let lower = last.to_lowercase();
    let singular_last = if lower.len() > 3 && lower.ends_with("ies") {
        format!("{}y", &last[..last.len() - 3])
    } else if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        last[..last.len() - 2].to_string()
    } else if es_after_consonant(&lower, "uses", 5) || es_after_consonant(&lower, "oes", 6) {
        last[..last.len() - 2].to_string()
    } else if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 1 {
        last[..last.len() - 1].to_string()
    } else {
        last.to_string()
    };
    format!("{}{}", head, singular_last)
}

/// `statuses` -> `status`, `heroes` -> `hero`; `houses` and `shoes` are left
/// to the plain `s` rule.
fn es_after_consonant(lower: &str, suffix: &str, min_len: usize) -> bool {
    lower.len() >= min_len
        && lower
            .strip_suffix(suffix)
            .and_then(|stem| stem.chars().last())
            .is_some_and(|c| !"aeiou".contains(c))
}
