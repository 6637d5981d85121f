//! HTTP delivery sink with transactional consume semantics.
//!
//! Each [`HttpSink::process`] call wraps one dequeue-and-send attempt in one
//! queue transaction and maps the HTTP outcome onto a commit/rollback
//! decision:
//!
//! | condition                  | transaction | outcome |
//! |----------------------------|-------------|---------|
//! | 200                        | commit      | Ready   |
//! | 503                        | rollback    | Backoff |
//! | other 4xx                  | commit      | Ready   |
//! | unreadable response        | rollback    | Backoff |
//! | any other status           | commit      | Ready   |
//! | transport failure          | rollback    | Backoff |
//!
//! Redirects are never followed; a 3xx lands in the "any other status" row.

use std::{sync::Arc, time::Duration};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, error};
use url::Url;

use courier_core::{Event, EventQueue};

use crate::{
    config::DeliveryConfig,
    error::{DeliveryError, Result},
};

/// What the scheduler should do after a `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Progress was made (or the event was deliberately consumed); call
    /// again immediately.
    Ready,
    /// Nothing was delivered; pause before calling again. The reason is in
    /// the logs, not the outcome.
    Backoff,
}

/// Classified result of one POST attempt.
enum Disposition {
    /// The server returned a readable status line.
    Status(u16),
    /// The connection produced no valid status.
    Unreadable,
    /// Connect, write, or timeout failure before a response arrived.
    Transport(reqwest::Error),
}

/// Forwards queued events to a remote HTTP endpoint, one per invocation.
///
/// The sink owns no scheduling: an external loop calls [`process`] repeatedly
/// and honors the returned [`DeliveryOutcome`]. Multiple sinks may run
/// against the same queue from independent tasks; isolation comes from the
/// queue's own transactions.
///
/// [`process`]: HttpSink::process
pub struct HttpSink {
    queue: Arc<dyn EventQueue>,
    client: reqwest::Client,
    endpoint: Url,
    config: DeliveryConfig,
}

impl HttpSink {
    /// Creates a sink for the given queue and configuration.
    ///
    /// The endpoint URL and HTTP client settings are validated here, once;
    /// nothing about the configuration can fail per event afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Configuration`] for an invalid endpoint URL
    /// or an unbuildable HTTP client.
    pub fn new(queue: Arc<dyn EventQueue>, config: DeliveryConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                DeliveryError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { queue, client, endpoint, config })
    }

    /// Performs one delivery attempt.
    ///
    /// Opens a transaction, takes at most one event, POSTs its body, and
    /// settles the transaction according to the response. Delivery failures
    /// never escape as errors; they become a [`DeliveryOutcome`] plus a log
    /// line.
    ///
    /// # Errors
    ///
    /// Only queue infrastructure faults propagate: failure to open the
    /// transaction, or failure of the commit/rollback itself.
    pub async fn process(&self) -> Result<DeliveryOutcome> {
        let mut txn = self.queue.begin().await?;

        let event = match txn.take().await {
            Ok(event) => event,
            Err(err) => {
                error!(error = %err, "failed to take event from queue, retrying");
                txn.rollback().await?;
                return Ok(DeliveryOutcome::Backoff);
            },
        };

        // Absence of data is not failure: settle the no-op transaction and
        // let the scheduler pause.
        let Some(event) = event.filter(|event| !event.is_empty()) else {
            txn.commit().await?;
            debug!("processed empty event");
            return Ok(DeliveryOutcome::Backoff);
        };

        match self.post(&event).await {
            Disposition::Status(200) => {
                txn.commit().await?;
                debug!("successful write, event consumed");
                Ok(DeliveryOutcome::Ready)
            },
            Disposition::Status(503) => {
                txn.rollback().await?;
                debug!("service unavailable (503), retrying");
                Ok(DeliveryOutcome::Backoff)
            },
            Disposition::Status(status @ 400..=499) => {
                // The endpoint judged the event itself unprocessable; it can
                // never succeed, so consume it rather than retry forever.
                txn.commit().await?;
                error!(status, "bad request, event consumed");
                Ok(DeliveryOutcome::Ready)
            },
            Disposition::Status(status) => {
                txn.commit().await?;
                error!(status, "unexpected status code returned for event, event consumed");
                Ok(DeliveryOutcome::Ready)
            },
            Disposition::Unreadable => {
                txn.rollback().await?;
                debug!("malformed response returned from server, retrying");
                Ok(DeliveryOutcome::Backoff)
            },
            Disposition::Transport(err) => {
                txn.rollback().await?;
                error!(error = %err, "error sending HTTP request, retrying");
                Ok(DeliveryOutcome::Backoff)
            },
        }
    }

    /// Issues the POST and classifies the result.
    ///
    /// The connection is managed by the client; every path releases it when
    /// the response (or error) is dropped.
    async fn post(&self, event: &Event) -> Disposition {
        debug!(bytes = event.body().len(), "sending request");

        let result = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, &self.config.content_type)
            .header(ACCEPT, &self.config.accept)
            .body(event.body().clone())
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(status, "got status code");
                Disposition::Status(status)
            },
            Err(err) if err.is_timeout() || err.is_connect() => Disposition::Transport(err),
            Err(_) => Disposition::Unreadable,
        }
    }
}
