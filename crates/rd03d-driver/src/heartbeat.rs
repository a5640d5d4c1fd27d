//! Connection Monitor - derives radar liveness from the last decoded frame
//!
//! **Purpose**: Detect if the radar is still streaming (powered on, UART wired).
//!
//! The monitor holds no timestamp of its own: the last-frame time is owned by
//! the dispatcher statistics, and liveness is a pure function of it.

use rd03d_protocol::DEFAULT_CONNECTION_WINDOW_MS;

/// Connection health monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionMonitor {
    window_ms: u64,
}

impl ConnectionMonitor {
    /// Create a new connection monitor
    ///
    /// # Parameters
    /// - `window_ms`: Maximum time without a decoded frame before considering the radar gone
    ///
    /// # Example
    /// ```
    /// # use rd03d_driver::ConnectionMonitor;
    /// let monitor = ConnectionMonitor::new(1000);
    /// assert!(monitor.is_connected(0, 999));
    /// assert!(!monitor.is_connected(0, 1000));
    /// ```
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms }
    }

    /// Check if the radar is still alive
    ///
    /// Returns true if the last frame was decoded strictly less than `window_ms` ago
    pub fn is_connected(&self, last_frame_ms: u64, now_ms: u64) -> bool {
        self.time_since_last_frame(last_frame_ms, now_ms) < self.window_ms
    }

    /// Get time since last frame (saturating, never negative)
    pub fn time_since_last_frame(&self, last_frame_ms: u64, now_ms: u64) -> u64 {
        now_ms.saturating_sub(last_frame_ms)
    }

    /// Liveness window in milliseconds
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTION_WINDOW_MS)
    }
}
