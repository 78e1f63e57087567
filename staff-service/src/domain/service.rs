use std::sync::Arc;

use shared::types::StaffRecord;

use crate::domain::report::{RenderedReport, ReportFormat, ReportRenderer};
use crate::domain::search::SearchCriteria;
use crate::domain::staff::StaffRepository;
use crate::error::StaffServiceError;

/// Entry point for every staff operation exposed over HTTP.
///
/// Reads and writes go straight to the repository; identifier uniqueness is
/// enforced by the store, not checked here first. Reports are rendered on the
/// blocking pool since both renderers are synchronous and CPU bound.
pub struct StaffDirectoryService {
    staff_repo: Arc<dyn StaffRepository>,
    spreadsheet: Arc<dyn ReportRenderer>,
    document: Arc<dyn ReportRenderer>,
}

impl StaffDirectoryService {
    pub fn new(
        staff_repo: Arc<dyn StaffRepository>,
        spreadsheet: Arc<dyn ReportRenderer>,
        document: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            staff_repo,
            spreadsheet,
            document,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<StaffRecord>, StaffServiceError> {
        self.staff_repo.find_all().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, staff_id: &str) -> Result<Option<StaffRecord>, StaffServiceError> {
        self.staff_repo.find_by_id(staff_id).await
    }

    #[tracing::instrument(skip(self), fields(staff_id = %staff.staff_id))]
    pub async fn add(&self, staff: StaffRecord) -> Result<StaffRecord, StaffServiceError> {
        let created = self.staff_repo.insert(staff).await?;
        tracing::info!(staff_id = %created.staff_id, "Staff created");

        Ok(created)
    }

    #[tracing::instrument(skip(self, staff))]
    pub async fn update(
        &self,
        staff_id: &str,
        staff: StaffRecord,
    ) -> Result<StaffRecord, StaffServiceError> {
        let updated = self.staff_repo.update(staff_id, staff).await?;
        tracing::info!(%staff_id, "Staff updated");

        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, staff_id: &str) -> Result<bool, StaffServiceError> {
        let deleted = self.staff_repo.delete(staff_id).await?;
        if deleted {
            tracing::info!(%staff_id, "Staff deleted");
        }

        Ok(deleted)
    }

    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<StaffRecord>, StaffServiceError> {
        if criteria.is_empty() {
            return self.staff_repo.find_all().await;
        }
        self.staff_repo.search(criteria).await
    }

    /// Runs [`Self::search`] and renders the hits in the requested format.
    #[tracing::instrument(skip(self))]
    pub async fn export_report(
        &self,
        criteria: &SearchCriteria,
        format: ReportFormat,
    ) -> Result<RenderedReport, StaffServiceError> {
        let staff = self.search(criteria).await?;
        let renderer = Arc::clone(self.renderer(format));
        let rows = staff.len();

        let bytes = tokio::task::spawn_blocking(move || renderer.render(&staff))
            .await
            .map_err(|e| StaffServiceError::Internal(format!("Report task failed: {e}")))??;

        tracing::info!(?format, rows, size = bytes.len(), "Report rendered");

        Ok(RenderedReport { format, bytes })
    }

    fn renderer(&self, format: ReportFormat) -> &Arc<dyn ReportRenderer> {
        match format {
            ReportFormat::Spreadsheet => &self.spreadsheet,
            ReportFormat::Document => &self.document,
        }
    }
}
