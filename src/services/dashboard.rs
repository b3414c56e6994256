use std::collections::HashSet;
use std::sync::Arc;

use crate::db::{RecordFilter, RecordStore};
use crate::errors::AppResult;
use crate::models::stats::{AdminDashboardStats, EmployeeDashboardStats};
use crate::models::time_record::DateRange;
use crate::models::user::Role;
use crate::services::access::Identity;
use crate::services::aggregation::{admin_stats, employee_stats};
use crate::utils::clock::Clock;

/// Loads the current week's records and feeds them to the aggregation functions.
pub struct DashboardService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn admin(&self, identity: &Identity) -> AppResult<AdminDashboardStats> {
        identity.require_admin()?;
        let today = self.clock.today();

        let week = RecordFilter::default().in_range(DateRange::ThisWeek, today);
        let mut records = self.store.query_records(&week).await?;
        // timers started before this week are still running now
        let seen: HashSet<_> = records.iter().map(|r| r.id).collect();
        let older_active: Vec<_> = self
            .store
            .find_active_records()
            .await?
            .into_iter()
            .filter(|r| !seen.contains(&r.id))
            .collect();
        records.extend(older_active);

        let team_members = self.store.count_users(Role::Employee).await?;
        Ok(admin_stats(&records, today, team_members))
    }

    pub async fn employee(&self, identity: &Identity) -> AppResult<EmployeeDashboardStats> {
        identity.require_employee()?;
        let today = self.clock.today();

        let week = identity.scope(RecordFilter::default().in_range(DateRange::ThisWeek, today))?;
        let records = self.store.query_records(&week).await?;
        let active = self.store.find_active_record(identity.user_id).await?;
        Ok(employee_stats(&records, active.as_ref(), today))
    }
}
