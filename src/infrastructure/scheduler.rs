use crate::application::notification::NotificationDispatcher;
use crate::domain::mail::MailSender;
use crate::domain::repository::{LikeRepository, UserRepository};
use anyhow::Result;
use chrono::FixedOffset;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Registers the daily like-notification job and starts the scheduler.
///
/// `schedule` is a six-field cron expression (seconds first), evaluated in
/// `offset`. Jobs run on the Tokio runtime, apart from the HTTP workers.
pub async fn start_notification_job<R, M>(
    dispatcher: Arc<NotificationDispatcher<R, M>>,
    schedule: &str,
    offset: FixedOffset,
) -> Result<JobScheduler>
where
    R: LikeRepository + UserRepository + 'static,
    M: MailSender + ?Sized + 'static,
{
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async_tz(schedule, offset, move |_, _| {
        let dispatcher = dispatcher.clone();
        Box::pin(async move {
            info!("Like notification job fired");
            match dispatcher.run().await {
                Ok(summary) => info!(
                    date = %summary.date,
                    sent = summary.sent.len(),
                    failed = summary.failed.len(),
                    "Like notification job completed"
                ),
                Err(e) => error!(error = %e, "Like notification job failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!(schedule = schedule, offset = %offset, "Started like notification scheduler");
    Ok(scheduler)
}
