use crate::types::climate_index::ClimateIndex;
use crate::types::index_table::IndexTable;
use std::collections::{hash_map::Entry, HashMap};
use std::future::Future;
use tokio::sync::Mutex;

/// Per-client memo of decoded tables, keyed by index.
///
/// Only successful loads are remembered; a load that yields no table is tried
/// again next time.
#[derive(Default)]
pub struct TableMemo {
    tables: Mutex<HashMap<ClimateIndex, IndexTable>>,
}

impl TableMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoised table for `index`, or runs `load` and remembers
    /// its result.
    pub async fn get_or_load<F, Fut, E>(&self, index: ClimateIndex, load: F) -> Result<Option<IndexTable>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<IndexTable>, E>>,
    {
        {
            let tables = self.tables.lock().await;
            if let Some(table) = tables.get(&index) {
                return Ok(Some(table.clone()));
            }
        }

        // Loading happens without holding the lock.
        let Some(loaded) = load().await? else {
            return Ok(None);
        };

        let mut tables = self.tables.lock().await;
        match tables.entry(index) {
            // Another caller finished first, keep theirs.
            Entry::Occupied(entry) => Ok(Some(entry.get().clone())),
            Entry::Vacant(entry) => {
                entry.insert(loaded.clone());
                Ok(Some(loaded))
            }
        }
    }

    pub async fn contains(&self, index: ClimateIndex) -> bool {
        self.tables.lock().await.contains_key(&index)
    }

    pub async fn clear(&self) {
        self.tables.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::index_table::Observation;
    use crate::types::month::Month;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ao() -> IndexTable {
        IndexTable::from_observations(
            "AO",
            vec![Observation::new(1950, Month::Jan, Some(-0.06)).unwrap()],
        )
    }

    #[tokio::test]
    async fn second_call_is_served_from_memory() {
        let memo = TableMemo::new();
        let loads = AtomicUsize::new(0);
        let load = || {
            let loads = &loads;
            async move {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(Some(ao()))
            }
        };

        let first = memo.get_or_load(ClimateIndex::Ao, load).await.unwrap();
        let second = memo.get_or_load(ClimateIndex::Ao, load).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_loads_are_not_remembered() {
        let memo = TableMemo::new();
        let missing = memo
            .get_or_load(ClimateIndex::Nao, || async { Ok::<_, Infallible>(None) })
            .await
            .unwrap();

        assert!(missing.is_none());
        assert!(!memo.contains(ClimateIndex::Nao).await);
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let memo = TableMemo::new();
        let result = memo
            .get_or_load(ClimateIndex::Soi, || async { Err::<Option<IndexTable>, _>("boom") })
            .await;
        assert_eq!(result.unwrap_err(), "boom");
        memo.clear().await;
    }
}
