//! Species handbook recording first discoveries.

use std::collections::HashMap;
use std::rc::Rc;

use chrono::NaiveDate;
use common::{GardenError, GardenResult};
use serde::{Deserialize, Serialize};
use store::{keys, KeyValueStore};

/// Stored details for one discovered species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRecord {
    pub name: String,
    /// Calendar date of the first sighting, `YYYY-MM-DD`.
    pub discovered_date: String,
}

/// Persistent map from species id to [`DiscoveryRecord`].
///
/// Its cardinality is what the species-collector badge is gated on.
pub struct Handbook {
    store: Rc<dyn KeyValueStore>,
}

impl Handbook {
    /// Creates a handbook over `store`.
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> HashMap<String, DiscoveryRecord> {
        let Some(raw) = self.store.read(keys::DISCOVERED_SPECIES_DATA) else {
            return HashMap::new();
        };
        // unreadable saved data degrades to an empty handbook
        serde_json::from_str(&raw).unwrap_or_default()
    }

    fn save(&self, records: &HashMap<String, DiscoveryRecord>) -> GardenResult<()> {
        let raw =
            serde_json::to_string(records).map_err(|e| GardenError::Parse(e.to_string()))?;
        self.store.write(keys::DISCOVERED_SPECIES_DATA, &raw)
    }

    /// Records the first sighting of `species_id` on `date`.
    ///
    /// Returns `false` without touching the stored map when the species is
    /// already recorded.
    pub fn record_discovery(
        &self,
        species_id: &str,
        name: &str,
        date: NaiveDate,
    ) -> GardenResult<bool> {
        let mut records = self.load();
        if records.contains_key(species_id) {
            return Ok(false);
        }
        records.insert(
            species_id.to_string(),
            DiscoveryRecord {
                name: name.to_string(),
                discovered_date: date.format("%Y-%m-%d").to_string(),
            },
        );
        self.save(&records)?;
        Ok(true)
    }

    /// Whether `species_id` has been recorded.
    pub fn is_discovered(&self, species_id: &str) -> bool {
        self.load().contains_key(species_id)
    }

    /// Number of distinct species recorded.
    pub fn discovered_count(&self) -> usize {
        self.load().len()
    }

    /// All records ordered by species id.
    pub fn discoveries(&self) -> Vec<(String, DiscoveryRecord)> {
        let mut all: Vec<_> = self.load().into_iter().collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn handbook() -> Handbook {
        Handbook::new(Rc::new(MemoryStore::new()))
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn first_discovery_is_new() {
        let book = handbook();
        assert!(book.record_discovery("ladybug", "Seven-spot Ladybird", day()).unwrap());
        assert!(book.is_discovered("ladybug"));
        assert_eq!(book.discovered_count(), 1);
    }

    #[test]
    fn repeat_discovery_is_ignored() {
        let book = handbook();
        book.record_discovery("snail", "Garden Snail", day()).unwrap();
        assert!(!book.record_discovery("snail", "Garden Snail", day()).unwrap());
        assert_eq!(book.discovered_count(), 1);
    }

    #[test]
    fn discoveries_sorted_by_id() {
        let book = handbook();
        book.record_discovery("snail", "Garden Snail", day()).unwrap();
        book.record_discovery("bumblebee", "Buff-tailed Bumblebee", day()).unwrap();
        let all = book.discoveries();
        assert_eq!(all[0].0, "bumblebee");
        assert_eq!(all[1].0, "snail");
        assert_eq!(all[1].1.discovered_date, "2024-03-01");
    }

    #[test]
    fn garbage_data_degrades_to_empty() {
        let store = Rc::new(MemoryStore::new());
        store.write(keys::DISCOVERED_SPECIES_DATA, "{broken").unwrap();
        let book = Handbook::new(store);
        assert_eq!(book.discovered_count(), 0);
        // the next write repairs the stored map
        assert!(book.record_discovery("sparrow", "Tree Sparrow", day()).unwrap());
        assert_eq!(book.discovered_count(), 1);
    }
}
