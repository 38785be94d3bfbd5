//! Analysis record repository trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::models::{AnalysisId, AnalysisRecord, PersonId};

/// Selection of stored analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFilter {
    pub person_id: Option<PersonId>,
    pub analysis_type: Option<String>,
}

impl AnalysisFilter {
    pub fn matches(&self, record: &AnalysisRecord) -> bool {
        self.person_id.map_or(true, |id| record.person_id == id)
            && self
                .analysis_type
                .as_deref()
                .map_or(true, |kind| record.analysis_type == kind)
    }
}

/// Repository trait for frozen analysis records.
///
/// Records are immutable once stored; re-running an analysis stores a new one.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    /// Store a record and return it with its assigned id.
    ///
    /// # Returns
    /// * `Ok(AnalysisRecord)` - The record with `id` set
    /// * `Err(RepositoryError::NotFound)` - Unknown person
    /// * `Err(RepositoryError::ValidationError)` - Record already has an id, or `start_date > end_date`
    async fn store_analysis(&self, record: &AnalysisRecord) -> RepositoryResult<AnalysisRecord>;

    async fn get_analysis(&self, analysis_id: AnalysisId) -> RepositoryResult<AnalysisRecord>;

    /// List records matching `filter`, newest `analysis_date` first.
    async fn list_analyses(&self, filter: &AnalysisFilter) -> RepositoryResult<Vec<AnalysisRecord>>;

    async fn delete_analysis(&self, analysis_id: AnalysisId) -> RepositoryResult<()>;
}
