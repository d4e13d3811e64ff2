use crate::models::BillingResponseCode;

/// Lifecycle of the billing client connection.
///
/// The service can drop the connection at any time; recovery is manual, by
/// calling `start_connection` again. Operations are only forwarded while
/// the tracker reports `Connected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ConnectionState {
    /// No client has been created yet, or the connection was ended.
    #[default]
    Idle,
    /// `start_connection` was issued, setup has not finished.
    Connecting,
    Connected,
    /// Setup failed or the service dropped the connection.
    Disconnected,
}

#[derive(Debug, Default)]
pub(crate) struct ConnectionTracker {
    state: ConnectionState,
}

impl ConnectionTracker {
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Records a connection attempt. Returns `false` without changing state
    /// when the client is already connected.
    pub fn begin_connection(&mut self) -> bool {
        if self.is_ready() {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    pub fn on_setup_finished(&mut self, response_code: BillingResponseCode) -> ConnectionState {
        self.state = if response_code.is_ok() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
        self.state
    }

    pub fn on_service_disconnected(&mut self) {
        self.state = ConnectionState::Disconnected;
    }

    pub fn reset(&mut self) {
        self.state = ConnectionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_not_ready() {
        let tracker = ConnectionTracker::default();
        assert_eq!(tracker.state(), ConnectionState::Idle);
        assert!(!tracker.is_ready());
    }

    #[test]
    fn successful_setup_reaches_connected() {
        let mut tracker = ConnectionTracker::default();
        assert!(tracker.begin_connection());
        assert_eq!(tracker.state(), ConnectionState::Connecting);
        assert!(!tracker.is_ready());

        tracker.on_setup_finished(BillingResponseCode::Ok);
        assert!(tracker.is_ready());
    }

    #[test]
    fn failed_setup_ends_disconnected() {
        let mut tracker = ConnectionTracker::default();
        tracker.begin_connection();
        tracker.on_setup_finished(BillingResponseCode::BillingUnavailable);
        assert_eq!(tracker.state(), ConnectionState::Disconnected);
        assert!(!tracker.is_ready());
    }

    #[test]
    fn begin_connection_is_a_no_op_while_connected() {
        let mut tracker = ConnectionTracker::default();
        tracker.begin_connection();
        tracker.on_setup_finished(BillingResponseCode::Ok);

        assert!(!tracker.begin_connection());
        assert!(tracker.is_ready());
    }

    #[test]
    fn service_drop_allows_reconnection() {
        let mut tracker = ConnectionTracker::default();
        tracker.begin_connection();
        tracker.on_setup_finished(BillingResponseCode::Ok);

        tracker.on_service_disconnected();
        assert!(!tracker.is_ready());

        assert!(tracker.begin_connection());
        tracker.on_setup_finished(BillingResponseCode::Ok);
        assert!(tracker.is_ready());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut tracker = ConnectionTracker::default();
        tracker.begin_connection();
        tracker.on_setup_finished(BillingResponseCode::Ok);
        tracker.reset();
        assert_eq!(tracker.state(), ConnectionState::Idle);
    }
}
