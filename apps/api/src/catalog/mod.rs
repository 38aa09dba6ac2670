//! Two-tier catalog: the primary store (Postgres) merged over a compiled-in seed tier.
//!
//! Precedence: every primary entry is kept, in primary order. A seed entry is appended,
//! in fixture order, only when no primary entry shares its slug.

pub mod handlers;
pub mod seed;

use std::collections::HashSet;

use serde::Serialize;

use crate::models::catalog::{CourseRow, EventRow};

pub trait CatalogItem {
    fn slug(&self) -> &str;
}

impl CatalogItem for CourseRow {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl CatalogItem for EventRow {
    fn slug(&self) -> &str {
        &self.slug
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Primary,
    Seed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sourced<T> {
    #[serde(flatten)]
    pub item: T,
    pub source: Tier,
}

pub fn merge_tiers<T: CatalogItem>(primary: Vec<T>, seed: Vec<T>) -> Vec<Sourced<T>> {
    let taken: HashSet<String> = primary.iter().map(|p| p.slug().to_string()).collect();

    let mut merged: Vec<Sourced<T>> = primary
        .into_iter()
        .map(|item| Sourced {
            item,
            source: Tier::Primary,
        })
        .collect();

    let mut seen_seed = HashSet::new();
    merged.extend(
        seed.into_iter()
            .filter(|s| !taken.contains(s.slug()) && seen_seed.insert(s.slug().to_string()))
            .map(|item| Sourced {
                item,
                source: Tier::Seed,
            }),
    );
    merged
}

/// Seed tier, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct SeedCatalog {
    pub courses: Vec<CourseRow>,
    pub events: Vec<EventRow>,
}

impl SeedCatalog {
    pub fn load() -> Self {
        Self {
            courses: seed::courses(),
            events: seed::events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item(&'static str, u8);

    impl CatalogItem for Item {
        fn slug(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_primary_wins_on_slug_collision() {
        let merged = merge_tiers(
            vec![Item("rust-101", 1)],
            vec![Item("rust-101", 2), Item("sql-basics", 2)],
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].item.1, 1);
        assert_eq!(merged[0].source, Tier::Primary);
        assert_eq!(merged[1].item.0, "sql-basics");
        assert_eq!(merged[1].source, Tier::Seed);
    }

    #[test]
    fn test_primary_order_kept_then_seed_order() {
        let merged = merge_tiers(
            vec![Item("c", 1), Item("a", 1)],
            vec![Item("z", 2), Item("b", 2)],
        );
        let slugs: Vec<&str> = merged.iter().map(|m| m.item.0).collect();
        assert_eq!(slugs, vec!["c", "a", "z", "b"]);
    }

    #[test]
    fn test_seed_duplicates_collapse() {
        let merged = merge_tiers(vec![], vec![Item("x", 1), Item("x", 2)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].item.1, 1);
    }

    #[test]
    fn test_empty_seed_returns_primary() {
        let merged = merge_tiers(vec![Item("only", 1)], vec![]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, Tier::Primary);
    }

    #[test]
    fn test_seed_catalog_slugs_are_unique() {
        let seed = SeedCatalog::load();
        let course_slugs: HashSet<&str> = seed.courses.iter().map(|c| c.slug()).collect();
        let event_slugs: HashSet<&str> = seed.events.iter().map(|e| e.slug()).collect();
        assert_eq!(course_slugs.len(), seed.courses.len());
        assert_eq!(event_slugs.len(), seed.events.len());
        assert!(!seed.courses.is_empty());
    }
}
