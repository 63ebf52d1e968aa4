//! Recurring unattended jobs. The timer lives here, outside the core logic;
//! each job body takes an injected clock so it can be fired directly in tests.

pub mod daily_report;
pub mod forced_checkout;

use std::future::Future;

use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::policy::PolicyHandle;

/// Aggregate result of one batch run. Per-item failures are logged and
/// counted, never propagated.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct JobSummary {
    pub scanned: usize,
    pub applied: usize,
    pub failed: usize,
}

fn resolve_local(tz: Tz, naive: chrono::NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            Some(dt.with_timezone(&Utc))
        }
        LocalResult::None => match tz.from_local_datetime(&(naive + Duration::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                Some(dt.with_timezone(&Utc))
            }
            LocalResult::None => None,
        },
    }
}

/// Next instant strictly after `now` at which the local wall clock reads `at`.
pub fn next_fire(now: DateTime<Utc>, at: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let mut date = now.with_timezone(&tz).date_naive();
    // Bounded walk; a fire time resolves within a few days even across DST.
    for _ in 0..4 {
        if let Some(candidate) = resolve_local(tz, date.and_time(at)) {
            if candidate > now {
                return candidate;
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    now + Duration::days(1)
}

/// Sleeps until the next daily fire time and runs the job, forever. Spawned
/// from `main`; aborting between iterations is safe because every item a job
/// touches is persisted independently.
pub async fn run_daily<F, Fut>(name: &'static str, at: NaiveTime, policy: PolicyHandle, job: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = JobSummary>,
{
    loop {
        let tz = policy.current().tz;
        let now = Utc::now();
        let next = next_fire(now, at, tz);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(job = name, fire_at = %next, "scheduled next run");
        actix_web::rt::time::sleep(wait).await;

        let summary = job().await;
        info!(
            job = name,
            scanned = summary.scanned,
            applied = summary.applied,
            failed = summary.failed,
            "run finished"
        );
    }
}
