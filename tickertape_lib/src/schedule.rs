//! Cancellable fixed-interval tasks on the tokio timer.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::error::DriverError;

/// Starts repeating tasks. See [`Schedule::start`].
pub struct Schedule;

impl Schedule {
    /// Runs `task` every `period`, first one full period after start.
    ///
    /// Each run is awaited before the next tick is considered; a run that
    /// overshoots delays later ticks instead of bursting to catch up. Tasks
    /// that must not hold up the schedule should spawn their work.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(
        name: &str,
        period: Duration,
        mut task: F,
    ) -> Result<ScheduleHandle, DriverError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if period.is_zero() {
            return Err(DriverError::InvalidPeriod(name.to_string()));
        }

        let label = name.to_string();
        let first = Instant::now() + period;
        let join = tokio::spawn(async move {
            let mut ticker = interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tracing::debug!("Schedule '{}' tick", label);
                task().await;
            }
        });

        tracing::debug!("Schedule '{}' started every {:?}", name, period);
        Ok(ScheduleHandle {
            name: name.to_string(),
            period,
            join: Some(join),
        })
    }
}

/// Owns a running schedule. Stopping or dropping the handle cancels it.
pub struct ScheduleHandle {
    name: String,
    period: Duration,
    join: Option<JoinHandle<()>>,
}

impl ScheduleHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Cancels the schedule. A run in progress is aborted at its next
    /// `.await`; work it spawned is not.
    pub fn stop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
            tracing::debug!("Schedule '{}' stopped", self.name);
        }
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
