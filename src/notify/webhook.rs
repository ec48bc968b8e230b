//! Reminder delivery over HTTP.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, error, warn};
use url::Url;

use super::{BirthdayEvent, BirthdayObserver};
use crate::models::ReminderNotification;

/// Event name sent with every reminder payload.
pub const REMINDER_EVENT: &str = "birthday_tracker_reminder";

/// Body POSTed to the webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub event: &'static str,
    pub data: &'a ReminderNotification,
}

/// POSTs each reminder as JSON to a configured URL.
///
/// Delivery runs on a spawned task; failures are logged and not retried.
#[derive(Debug, Clone)]
pub struct WebhookObserver {
    client: Client,
    url: Url,
}

impl WebhookObserver {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl BirthdayObserver for WebhookObserver {
    fn on_event(&self, event: &BirthdayEvent) {
        let BirthdayEvent::Reminder(reminder) = event else {
            return;
        };

        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime, dropping webhook for {}", reminder.id);
            return;
        };

        let client = self.client.clone();
        let url = self.url.clone();
        let reminder = reminder.clone();
        runtime.spawn(async move {
            let payload = WebhookPayload {
                event: REMINDER_EVENT,
                data: &reminder,
            };
            match client.post(url.clone()).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!("Delivered reminder {} to {}", reminder.id, url);
                }
                Ok(resp) => {
                    warn!(
                        "Webhook {} rejected reminder {}: {}",
                        url,
                        reminder.id,
                        resp.status()
                    );
                }
                Err(e) => {
                    error!("Webhook delivery to {} failed: {}", url, e);
                }
            }
        });
    }
}
