use std::sync::Arc;

use crate::db::RecordStore;
use crate::services::auth::AuthService;
use crate::services::dashboard::DashboardService;
use crate::services::employee::EmployeeService;
use crate::services::records::RecordService;
use crate::services::timer::TimerService;
use crate::utils::clock::Clock;
use crate::utils::jwt::TokenService;
use crate::utils::password::CredentialVerifier;

/// Services shared by every worker of the HTTP server.
pub struct AppState {
    pub auth: AuthService,
    pub timers: TimerService,
    pub records: RecordService,
    pub dashboard: DashboardService,
    pub employees: EmployeeService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        tokens: Arc<dyn TokenService>,
        credentials: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            auth: AuthService::new(store.clone(), tokens, credentials.clone()),
            timers: TimerService::new(store.clone(), clock.clone()),
            records: RecordService::new(store.clone(), clock.clone()),
            dashboard: DashboardService::new(store.clone(), clock),
            employees: EmployeeService::new(store, credentials),
        }
    }
}
