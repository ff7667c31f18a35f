/// Thresholds used by the dashboard summary
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// A contact with no interaction for this many days is stale
    pub stale_after_days: i64,
    /// Window for the recent activity counter
    pub activity_window_days: i64,
    /// Number of recent interactions listed
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            stale_after_days: 90,
            activity_window_days: 30,
            recent_limit: 10,
        }
    }
}
