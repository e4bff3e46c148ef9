//! Debounced re-validation scheduling.
//!
//! Editors trigger validation on every change. The scheduler collapses
//! bursts of changes into one pass, keeps at most one pass in flight and
//! queues a single trailing pass for changes made while one is running.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, ValidateError};

/// Timing policy for [`ValidationScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Whether change-triggered validation runs at all.
    pub enabled: bool,

    /// Quiet period after the latest change before a pass starts.
    pub debounce_ms: u64,

    /// Longest a pending request waits while changes keep arriving.
    pub max_delay_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl SchedulerConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Check whether a pending request is due, given the time since the
    /// latest and the earliest request.
    pub fn should_run(&self, since_last_ms: u64, since_first_ms: u64) -> bool {
        self.enabled && (since_last_ms >= self.debounce_ms || since_first_ms >= self.max_delay_ms)
    }
}

/// Busy flag plus pending-request bookkeeping for validation passes.
pub struct ValidationScheduler {
    config: SchedulerConfig,
    clock: Arc<dyn Clock>,

    /// When the most recent request arrived.
    last_request: Option<Instant>,

    /// When the oldest unserved request arrived.
    first_request: Option<Instant>,

    /// Requests coalesced into the next pass.
    pending: u32,

    in_flight: bool,
}

impl std::fmt::Debug for ValidationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationScheduler")
            .field("config", &self.config)
            .field("pending", &self.pending)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl ValidationScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: SchedulerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            last_request: None,
            first_request: None,
            pending: 0,
            in_flight: false,
        }
    }

    /// Record that the mission changed and needs re-validation.
    pub fn request(&mut self) {
        let now = self.clock.now();
        self.last_request = Some(now);
        if self.first_request.is_none() {
            self.first_request = Some(now);
        }
        self.pending = self.pending.saturating_add(1);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending > 0
    }

    #[inline]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Requests that the next pass will serve.
    pub fn pending_requests(&self) -> u32 {
        self.pending
    }

    fn ms_since(&self, at: Option<Instant>) -> Option<u64> {
        let now = self.clock.now();
        at.map(|t| u64::try_from(now.saturating_duration_since(t).as_millis()).unwrap_or(u64::MAX))
    }

    /// Check whether the caller should start a pass now.
    pub fn should_run(&self) -> bool {
        if !self.is_pending() || self.in_flight {
            return false;
        }
        match (
            self.ms_since(self.last_request),
            self.ms_since(self.first_request),
        ) {
            (Some(since_last), Some(since_first)) => self.config.should_run(since_last, since_first),
            _ => false,
        }
    }

    /// Mark a pass as started, consuming every pending request.
    ///
    /// Fails with [`ValidateError::Busy`] while another pass is in flight;
    /// the caller's request stays queued for the trailing pass.
    pub fn begin(&mut self) -> Result<()> {
        if self.in_flight {
            return Err(ValidateError::Busy);
        }
        if self.pending > 1 {
            tracing::debug!(coalesced = self.pending, "coalesced validation requests");
        }
        self.in_flight = true;
        self.pending = 0;
        self.first_request = None;
        Ok(())
    }

    /// Mark the running pass as finished.
    ///
    /// Returns whether requests arrived meanwhile, in which case one trailing
    /// pass is due once [`should_run`](Self::should_run) agrees.
    pub fn finish(&mut self) -> bool {
        self.in_flight = false;
        self.is_pending()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
