//! Security anomaly notifications
//!
//! Anomalies are detective only: rotation proceeds after notifying.

/// Client address changed between issuance and rotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpChangeEvent {
    pub user_id: String,
    pub token_id: String,
    pub previous_ip: String,
    pub current_ip: String,
}

/// Hook invoked when rotation observes an anomaly
pub trait AnomalyNotifier: Send + Sync {
    fn ip_changed(&self, event: &IpChangeEvent);
}

/// Default notifier: a structured warning in the service log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnomalyNotifier;

impl AnomalyNotifier for LogAnomalyNotifier {
    fn ip_changed(&self, event: &IpChangeEvent) {
        tracing::warn!(
            user_id = %event.user_id,
            token_id = %event.token_id,
            previous_ip = %event.previous_ip,
            current_ip = %event.current_ip,
            "Client IP changed during token refresh"
        );
    }
}
