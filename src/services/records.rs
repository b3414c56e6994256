use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{RecordFilter, RecordStore};
use crate::errors::AppResult;
use crate::models::time_record::{DateRange, TimeRecord};
use crate::services::access::Identity;
use crate::utils::clock::Clock;

/// Listing parameters accepted from the boundary layer.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    pub date_range: Option<DateRange>,
    pub project: Option<String>,
    pub user_id: Option<Uuid>,
}

/// Historical listings. Running timers never appear here.
pub struct RecordService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn filter_for(&self, identity: &Identity, query: RecordQuery) -> AppResult<RecordFilter> {
        let mut filter = RecordFilter::closed()
            .in_range(query.date_range.unwrap_or_default(), self.clock.today())
            .with_project(query.project);
        if let Some(user_id) = query.user_id {
            filter = filter.for_user(user_id);
        }
        identity.scope(filter)
    }

    pub async fn list(&self, identity: &Identity, query: RecordQuery) -> AppResult<Vec<TimeRecord>> {
        let filter = self.filter_for(identity, query)?;
        self.store.query_records(&filter).await
    }

    /// Every record in the store, for admins only.
    pub async fn list_all(&self, identity: &Identity, query: RecordQuery) -> AppResult<Vec<TimeRecord>> {
        identity.require_admin()?;
        self.list(identity, query).await
    }

    pub async fn projects(&self, identity: &Identity) -> AppResult<Vec<String>> {
        let scope = if identity.is_admin() { None } else { Some(identity.user_id) };
        self.store.list_projects(scope).await
    }
}
