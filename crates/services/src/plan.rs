use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashSet;

use reps_core::model::{Item, ItemError, ItemRecord};

/// Seed content pools, one per item type, loaded from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedCatalog {
    #[serde(default)]
    pub flashcards: Vec<ItemRecord>,
    #[serde(default)]
    pub tradeoffs: Vec<ItemRecord>,
    #[serde(default)]
    pub whiteboard: Vec<ItemRecord>,
    #[serde(default)]
    pub behavioral: Vec<ItemRecord>,
}

impl SeedCatalog {
    /// Parse a catalog from seed JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
            && self.tradeoffs.is_empty()
            && self.whiteboard.is_empty()
            && self.behavioral.is_empty()
    }
}

/// Builds a day's mixed plan by sampling the seed pools.
///
/// Default composition is 5 flash + 3 tradeoff + 1 whiteboard + 1 behavioral.
/// Short pools recycle items; recycled clones get a deterministic `#n` id
/// suffix so every plan keeps unique, reproducible item identities.
pub struct PlanBuilder<'a> {
    catalog: &'a SeedCatalog,
    flash: usize,
    tradeoffs: usize,
    whiteboard: usize,
    behavioral: usize,
}

impl<'a> PlanBuilder<'a> {
    #[must_use]
    pub fn new(catalog: &'a SeedCatalog) -> Self {
        Self {
            catalog,
            flash: 5,
            tradeoffs: 3,
            whiteboard: 1,
            behavioral: 1,
        }
    }

    /// Override the per-type composition.
    #[must_use]
    pub fn with_counts(
        mut self,
        flash: usize,
        tradeoffs: usize,
        whiteboard: usize,
        behavioral: usize,
    ) -> Self {
        self.flash = flash;
        self.tradeoffs = tradeoffs;
        self.whiteboard = whiteboard;
        self.behavioral = behavioral;
        self
    }

    #[must_use]
    pub fn target_len(&self) -> usize {
        self.flash + self.tradeoffs + self.whiteboard + self.behavioral
    }

    /// Sample a plan from the catalog.
    ///
    /// Empty pools borrow from the rest of the selection to keep the plan at
    /// its target length; an entirely empty catalog yields a placeholder
    /// flash-only plan.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` if a sampled seed record is malformed.
    pub fn build(&self) -> Result<Vec<Item>, ItemError> {
        let mut rng = rng();
        let mut used = HashSet::new();
        let mut picked: Vec<ItemRecord> = Vec::new();

        take(&mut picked, &mut used, &mut rng, &self.catalog.flashcards, self.flash, "flash");
        take(&mut picked, &mut used, &mut rng, &self.catalog.tradeoffs, self.tradeoffs, "tradeoff");
        take(&mut picked, &mut used, &mut rng, &self.catalog.whiteboard, self.whiteboard, "whiteboard");
        take(&mut picked, &mut used, &mut rng, &self.catalog.behavioral, self.behavioral, "behavioral");

        let target = self.target_len();
        if picked.is_empty() {
            let placeholder = placeholder_record();
            for _ in 0..target {
                let clone = clone_record(&placeholder, "flash", &mut used);
                picked.push(clone);
            }
        } else {
            while picked.len() < target {
                let source = picked[rng.random_range(0..picked.len())].clone();
                let label = source.kind.clone().unwrap_or_else(|| "flash".to_owned());
                picked.push(clone_record(&source, &label, &mut used));
            }
        }

        picked
            .into_iter()
            .enumerate()
            .map(|(position, record)| Item::from_record(record, position))
            .collect()
    }
}

fn take(
    out: &mut Vec<ItemRecord>,
    used: &mut HashSet<String>,
    rng: &mut impl Rng,
    pool: &[ItemRecord],
    count: usize,
    label: &str,
) {
    if pool.is_empty() || count == 0 {
        return;
    }
    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.shuffle(rng);
    for n in 0..count {
        let source = &pool[order[n % order.len()]];
        out.push(clone_record(source, label, used));
    }
}

fn clone_record(source: &ItemRecord, label: &str, used: &mut HashSet<String>) -> ItemRecord {
    let mut record = source.clone();
    record.kind = Some(label.to_owned());

    let base = record
        .id
        .as_deref()
        .map(|id| id.split('#').next().unwrap_or(id).to_owned())
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("{label}-item"));

    let mut candidate = base.clone();
    let mut n = 1_usize;
    while used.contains(&candidate) {
        n += 1;
        candidate = format!("{base}#{n}");
    }
    used.insert(candidate.clone());
    record.id = Some(candidate);
    record
}

fn placeholder_record() -> ItemRecord {
    ItemRecord {
        id: Some("fallback".to_owned()),
        front: Some("Review an architecture you know cold and explain it aloud.".to_owned()),
        back: Some("Outline the goal, core services, data flow, scaling, and failure handling."
            .to_owned()),
        ..ItemRecord::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reps_core::model::ItemKind;

    fn flash(id: &str) -> ItemRecord {
        ItemRecord {
            id: Some(id.to_owned()),
            front: Some("Q".to_owned()),
            back: Some("A".to_owned()),
            ..ItemRecord::default()
        }
    }

    fn tradeoff(id: &str) -> ItemRecord {
        ItemRecord {
            id: Some(id.to_owned()),
            question: Some("Q".to_owned()),
            options: Some(vec!["a".to_owned(), "b".to_owned()]),
            answer: Some(0),
            ..ItemRecord::default()
        }
    }

    fn prompt(id: &str) -> ItemRecord {
        ItemRecord {
            id: Some(id.to_owned()),
            prompt: Some("P".to_owned()),
            ..ItemRecord::default()
        }
    }

    fn full_catalog() -> SeedCatalog {
        SeedCatalog {
            flashcards: (0..8).map(|i| flash(&format!("f{i}"))).collect(),
            tradeoffs: (0..5).map(|i| tradeoff(&format!("t{i}"))).collect(),
            whiteboard: (0..2).map(|i| prompt(&format!("w{i}"))).collect(),
            behavioral: (0..2).map(|i| prompt(&format!("b{i}"))).collect(),
        }
    }

    fn count_kind(items: &[Item], want: &str) -> usize {
        items.iter().filter(|i| i.kind().tag() == want).count()
    }

    #[test]
    fn default_composition_is_5_3_1_1() {
        let catalog = full_catalog();
        let items = PlanBuilder::new(&catalog).build().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(count_kind(&items, "flash"), 5);
        assert_eq!(count_kind(&items, "tradeoff"), 3);
        assert_eq!(count_kind(&items, "whiteboard"), 1);
        assert_eq!(count_kind(&items, "behavioral"), 1);
    }

    #[test]
    fn plan_ids_are_unique() {
        let catalog = full_catalog();
        let items = PlanBuilder::new(&catalog).build().unwrap();
        let mut ids: Vec<_> = items.iter().map(|i| i.id().as_str().to_owned()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn short_pools_recycle_with_suffixed_ids() {
        let catalog = SeedCatalog {
            flashcards: vec![flash("f0")],
            ..SeedCatalog::default()
        };
        let items = PlanBuilder::new(&catalog)
            .with_counts(3, 0, 0, 0)
            .build()
            .unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, vec!["f0", "f0#2", "f0#3"]);
        assert!(items.iter().all(|i| matches!(i.kind(), ItemKind::Flash { .. })));
    }

    #[test]
    fn missing_pools_are_backfilled_from_the_selection() {
        let catalog = SeedCatalog {
            flashcards: (0..8).map(|i| flash(&format!("f{i}"))).collect(),
            ..SeedCatalog::default()
        };
        let builder = PlanBuilder::new(&catalog);
        let items = builder.build().unwrap();
        assert_eq!(items.len(), builder.target_len());
        assert_eq!(count_kind(&items, "flash"), 10);
    }

    #[test]
    fn empty_catalog_yields_placeholder_plan() {
        let catalog = SeedCatalog::default();
        let items = PlanBuilder::new(&catalog).build().unwrap();
        assert_eq!(items.len(), 10);
        assert!(items.iter().all(|i| matches!(i.kind(), ItemKind::Flash { .. })));
        assert_eq!(items[0].id().as_str(), "fallback");
        assert_eq!(items[1].id().as_str(), "fallback#2");
    }

    #[test]
    fn catalog_parses_from_seed_json() {
        let raw = r#"{
            "flashcards": [{"id": "f1", "front": "Q", "back": "A"}],
            "tradeoffs": [{"id": "t1", "question": "Q", "options": ["a", "b"], "answer": 1}]
        }"#;
        let catalog = SeedCatalog::from_json(raw).unwrap();
        assert_eq!(catalog.flashcards.len(), 1);
        assert_eq!(catalog.tradeoffs.len(), 1);
        assert!(catalog.whiteboard.is_empty());
        assert!(!catalog.is_empty());
    }
}
