use crate::domain::error::DomainError;
use crate::domain::mail::{MailMessage, MailSender};
use crate::domain::models::Recipe;
use crate::domain::repository::{LikeRepository, UserRepository};
use anyhow::{Result, anyhow};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

pub const NOTIFICATION_SUBJECT: &str = "Recipe Like Notification";

#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    /// Zone in which "today" is computed.
    pub offset: FixedOffset,
    pub from: String,
    pub send_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DispatchSummary {
    pub date: NaiveDate,
    pub selected: usize,
    pub sent: Vec<Uuid>,
    pub failed: Vec<Uuid>,
}

/// Emails each author whose recipe was liked on the current local day.
///
/// A day is the half-open window `[00:00, next 00:00)` in the configured
/// offset. A run only ever looks at the day it runs in, so likes landing
/// after the last run of a day are not reported on the following day.
pub struct NotificationDispatcher<R, M>
where
    R: LikeRepository + UserRepository,
    M: MailSender + ?Sized,
{
    repository: Arc<R>,
    mailer: Arc<M>,
    settings: DispatcherSettings,
}

impl<R, M> NotificationDispatcher<R, M>
where
    R: LikeRepository + UserRepository,
    M: MailSender + ?Sized,
{
    pub fn new(repository: Arc<R>, mailer: Arc<M>, settings: DispatcherSettings) -> Self {
        Self {
            repository,
            mailer,
            settings,
        }
    }

    pub async fn run(&self) -> Result<DispatchSummary> {
        self.run_at(Utc::now()).await
    }

    /// One failed recipe never stops the others; only a failed selection
    /// query fails the run.
    #[instrument(skip(self))]
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<DispatchSummary> {
        let date = now.with_timezone(&self.settings.offset).date_naive();
        let (from, to) = day_window(date, self.settings.offset)?;
        info!(%date, %from, %to, "Notification scan started");

        let recipes = self.repository.recipes_liked_between(from, to).await?;
        let mut summary = DispatchSummary {
            date,
            selected: recipes.len(),
            sent: Vec::new(),
            failed: Vec::new(),
        };

        for recipe in &recipes {
            match self.notify_author(recipe).await {
                Ok(()) => {
                    info!(recipe_id = %recipe.id, "Email notification sent");
                    summary.sent.push(recipe.id);
                }
                Err(e) => {
                    error!(recipe_id = %recipe.id, error = %e, "Failed to send email notification");
                    summary.failed.push(recipe.id);
                }
            }
        }

        info!(
            %date,
            selected = summary.selected,
            sent = summary.sent.len(),
            failed = summary.failed.len(),
            "Notification scan finished"
        );
        Ok(summary)
    }

    async fn notify_author(&self, recipe: &Recipe) -> Result<()> {
        let author = self
            .repository
            .find_user_by_id(recipe.author_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Author not found: {}", recipe.author_id)))?;

        let message = compose_message(recipe, &author.email, &self.settings.from);
        debug!(to = %author.email, "Sending like notification");

        match tokio::time::timeout(self.settings.send_timeout, self.mailer.send(&message)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(DomainError::Delivery(e.to_string()).into()),
            Err(_) => Err(DomainError::Delivery(format!(
                "timed out after {}ms",
                self.settings.send_timeout.as_millis()
            ))
            .into()),
        }
    }
}

pub fn compose_message(recipe: &Recipe, to: &str, from: &str) -> MailMessage {
    MailMessage {
        subject: NOTIFICATION_SUBJECT.to_string(),
        body: format!(
            "Your recipe \"{}\" has received new likes today!",
            recipe.title
        ),
        from: from.to_string(),
        to: vec![to.to_string()],
    }
}

/// UTC bounds of the local calendar day `date`.
pub fn day_window(date: NaiveDate, offset: FixedOffset) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("invalid midnight for {}", date))?;
    let start = midnight
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| anyhow!("ambiguous local midnight for {}", date))?
        .with_timezone(&Utc);
    Ok((start, start + TimeDelta::days(1)))
}
