//! Static level catalog.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{Level, LevelId, StakeRequirement};
use crate::error::{Result, WorkflowError};
use crate::port::RequirementSource;

/// Levels known up front, from configuration or a backend fetch.
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: BTreeMap<LevelId, Level>,
}

impl LevelCatalog {
    pub fn new(levels: impl IntoIterator<Item = Level>) -> Self {
        Self {
            levels: levels.into_iter().map(|l| (l.id, l)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(&id)
    }

    /// Levels ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[async_trait]
impl RequirementSource for LevelCatalog {
    async fn requirement(&self, level: LevelId) -> Result<StakeRequirement> {
        let found = self.get(level).ok_or(WorkflowError::UnknownLevel(level))?;
        Ok(found
            .stake_requirement()
            .ok_or(WorkflowError::NotStakeable(level))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testkit::domain::{hold_level, open_level, stake_level};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn catalog() -> LevelCatalog {
        LevelCatalog::new([
            open_level(1),
            hold_level(2, dec!(10)),
            stake_level(3, dec!(250), 86_400_000),
        ])
    }

    #[tokio::test]
    async fn stake_level_resolves() {
        let requirement = catalog().requirement(LevelId::new(3)).await.unwrap();
        assert_eq!(requirement.amount, dec!(250));
        assert_eq!(requirement.timelock, Duration::from_secs(86_400));
    }

    #[tokio::test]
    async fn non_stake_levels_are_rejected() {
        let err = catalog().requirement(LevelId::new(2)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Workflow(WorkflowError::NotStakeable(id)) if id == LevelId::new(2)
        ));
    }

    #[tokio::test]
    async fn unknown_level_is_rejected() {
        let err = catalog().requirement(LevelId::new(9)).await.unwrap_err();
        assert!(matches!(err, Error::Workflow(WorkflowError::UnknownLevel(_))));
    }

    #[test]
    fn iterates_in_id_order() {
        let ids: Vec<u64> = catalog().iter().map(|l| l.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
