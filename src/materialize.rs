//! Recurring-instance materializer.
//!
//! Runs per user before the date-scoped dashboard query: for every
//! recurring task, generates the concrete instances that fall due between
//! the task's last_generated_date and the lookahead horizon. A task whose
//! anchor was just moved has a cleared floor, so the whole window
//! regenerates from the new anchor.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use sparkclean_core::error::SparkError;
use sparkclean_core::recurrence;
use sparkclean_core::traits::TaskStore;
use tracing::debug;
use uuid::Uuid;

/// What a materialization pass did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MaterializeSummary {
    pub tasks_touched: usize,
    pub instances_created: usize,
}

/// Generate missing instances for one user's recurring tasks.
pub async fn run_for_user(
    store: &dyn TaskStore,
    user_id: Uuid,
    today: NaiveDate,
    lookahead_days: u32,
) -> Result<MaterializeSummary, SparkError> {
    let horizon = today
        .checked_add_days(Days::new(u64::from(lookahead_days)))
        .unwrap_or(today);

    let mut summary = MaterializeSummary::default();

    for task in store.list_recurring(user_id).await? {
        let Some(anchor) = task.recurrence_start_date else {
            continue;
        };

        let due = recurrence::occurrences_between(
            anchor,
            task.frequency,
            task.last_generated_date,
            horizon,
        );
        let Some(&newest) = due.last() else {
            continue;
        };

        // An instance may already exist for a date even when the floor was
        // cleared by a reschedule; never create a second one.
        let existing: HashSet<NaiveDate> =
            store.instance_dates(user_id, task.id).await?.into_iter().collect();
        let missing: Vec<NaiveDate> =
            due.into_iter().filter(|d| !existing.contains(d)).collect();

        if !missing.is_empty() {
            store.insert_instances(user_id, task.id, &missing).await?;
            summary.instances_created += missing.len();
            debug!(
                "materialize: task {} generated {} instance(s) through {newest}",
                task.id,
                missing.len()
            );
        }

        // Advance the floor even when every date already had an instance,
        // so the next pass skips the covered window.
        store.set_last_generated(user_id, task.id, newest).await?;
        summary.tasks_touched += 1;
    }

    Ok(summary)
}
