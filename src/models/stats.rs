use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardStats {
    pub total_hours_today: f64,
    pub weekly_total: f64,
    pub active_timers: usize,
    pub active_users_today: usize,
    pub total_team_members: i64,
    pub days_this_week: usize,
    pub avg_hours_per_day: f64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    #[serde(rename = "Working")]
    Working,
    #[serde(rename = "Paused")]
    Paused,
    #[serde(rename = "Not Working")]
    NotWorking,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboardStats {
    pub today_hours: f64,
    pub weekly_hours: f64,
    pub days_this_week: usize,
    pub avg_hours_per_day: f64,
    pub productivity_score: u32,
    pub current_status: WorkStatus,
    pub status_detail: String,
}
