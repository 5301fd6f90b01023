//! Event bus abstraction for the asynchronous audit trail.
//!
//! This module provides the [`EventBus`] trait used by all three services to
//! publish domain events (`login.attempted`, `risk.scored`, `mfa.completed`)
//! after a decision is made, and by any downstream consumer to subscribe to
//! them. Publication is fire-and-forget and must never block or fail the
//! synchronous request path (§4.5, §9).
//!
//! # Key Principles
//!
//! - **Non-blocking publish**: a broker outage degrades to "no audit events",
//!   never to "no logins".
//! - **At-least-once delivery**: events may be delivered multiple times.
//! - **Idempotency**: subscribers must handle duplicate events by `event_id`.
//!
//! # Topic Naming Convention
//!
//! Topic exchanges follow `{domain}_events`:
//! - `auth_events` — routing key `login.attempted`
//! - `risk_events` — routing key `risk.scored`
//! - `mfa_events` — routing key `mfa.completed`
//!
//! # Implementations
//!
//! - [`InMemoryEventBus`](../../amfa_testing/struct.InMemoryEventBus.html) — for testing (fast, synchronous)
//! - [`RedpandaEventBus`](../../amfa_redpanda/struct.RedpandaEventBus.html) — for production (Kafka-compatible)
//!
//! # Example
//!
//! ```rust,ignore
//! use amfa_core::event_bus::{EventBus, EventStream};
//! use amfa_core::event::SerializedEvent;
//!
//! async fn example(event_bus: impl EventBus) {
//!     let event = SerializedEvent::new("login.attempted".to_string(), vec![1, 2, 3], None);
//!     event_bus.publish("auth_events", &event).await?;
//!
//!     let mut stream = event_bus.subscribe(&["auth_events", "risk_events"]).await?;
//!     while let Some(result) = stream.next().await {
//!         match result {
//!             Ok(event) => println!("Received: {:?}", event.event_type),
//!             Err(e) => eprintln!("Error: {}", e),
//!         }
//!     }
//! }
//! ```

use crate::event::SerializedEvent;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during event bus operations.
#[derive(Error, Debug, Clone)]
pub enum EventBusError {
    /// Failed to connect to the event bus
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Failed to publish an event to a topic
    #[error("Publish failed for topic '{topic}': {reason}")]
    PublishFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },

    /// Failed to subscribe to topics
    #[error("Subscription failed for topics {topics:?}: {reason}")]
    SubscriptionFailed {
        /// The topics that failed to subscribe
        topics: Vec<String>,
        /// The reason for failure
        reason: String,
    },

    /// Failed to deserialize an event
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Topic not found or invalid
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    /// Consumer group error
    #[error("Consumer group error: {0}")]
    ConsumerGroupError(String),

    /// Network or transport error
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Generic error for other failures
    #[error("Event bus error: {0}")]
    Other(String),
}

/// Stream of events from subscriptions.
///
/// This type represents an asynchronous stream of [`SerializedEvent`] values,
/// where each item is a `Result` that may contain an event or an error.
///
/// # Examples
///
/// ```rust,ignore
/// use futures::StreamExt;
///
/// let mut stream = event_bus.subscribe(&["auth_events"]).await?;
/// while let Some(result) = stream.next().await {
///     match result {
///         Ok(event) => process_event(event),
///         Err(e) => log::error!("Event stream error: {}", e),
///     }
/// }
/// ```
pub type EventStream = Pin<Box<dyn Stream<Item = Result<SerializedEvent, EventBusError>> + Send>>;

/// Trait for event bus implementations.
///
/// The [`EventBus`] trait provides publish/subscribe capabilities for the
/// audit trail. Events are published to topic exchanges and delivered to all
/// subscribers of those topics with at-least-once delivery semantics.
///
/// # Design Principles
///
/// - **Async-first**: All operations are async for non-blocking I/O
/// - **At-least-once**: Subscribers may receive duplicate events
/// - **Idempotency**: Subscribers must handle duplicates by `event_id`
/// - **Non-blocking**: publish never stalls the synchronous request path
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to support concurrent access
/// from multiple reducers and effect executors.
///
/// # Examples
///
/// ## Publishing Events
///
/// ```rust,ignore
/// use amfa_core::event::SerializedEvent;
///
/// let event = SerializedEvent::new(
///     "login.attempted".to_string(),
///     serde_json::to_vec(&login_attempted_event)?,
///     Some(serde_json::json!({ "correlation_id": event_id })),
/// );
///
/// event_bus.publish("auth_events", &event).await?;
/// ```
///
/// ## Subscribing to Events
///
/// ```rust,ignore
/// use futures::StreamExt;
///
/// let mut stream = event_bus.subscribe(&[
///     "auth_events",
///     "risk_events",
/// ]).await?;
///
/// while let Some(result) = stream.next().await {
///     match result {
///         Ok(event) => {
///             // Process event (idempotent!)
///             process_event(&event)?;
///         }
///         Err(e) => {
///             tracing::error!("Event stream error: {}", e);
///         }
///     }
/// }
/// ```
///
/// ## Idempotency Pattern
///
/// ```rust,ignore
/// fn process_event(event: &SerializedEvent) -> Result<(), Error> {
///     // Check the correlation id (event_id) to detect duplicates
///     if let Some(metadata) = &event.metadata {
///         if let Some(event_id) = metadata.get("correlation_id") {
///             if already_processed(event_id)? {
///                 tracing::debug!("Skipping duplicate event: {}", event_id);
///                 return Ok(());
///             }
///         }
///     }
///
///     handle_event(event)?;
///     mark_processed(event_id)?;
///     Ok(())
/// }
/// ```
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// to enable trait object usage (`Arc<dyn EventBus>`). This is required for
/// the effect system where reducers create effects that capture the event bus.
pub trait EventBus: Send + Sync {
    /// Publish an event to a topic.
    ///
    /// Events are published with at-least-once semantics. The event may be
    /// delivered to subscribers multiple times, so subscribers must be idempotent.
    ///
    /// # Arguments
    ///
    /// - `topic`: The topic to publish to (e.g., `"auth_events"`)
    /// - `event`: The serialized event to publish
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::PublishFailed`] if the publish operation fails.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let event = SerializedEvent::new(
    ///     "risk.scored".to_string(),
    ///     serde_json::to_vec(&event_data)?,
    ///     Some(serde_json::json!({ "correlation_id": event_id })),
    /// );
    ///
    /// event_bus.publish("risk_events", &event).await?;
    /// ```
    fn publish(
        &self,
        topic: &str,
        event: &SerializedEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>>;

    /// Subscribe to one or more topics and receive a stream of events.
    ///
    /// Returns an [`EventStream`] that yields events from all subscribed topics.
    /// The stream will deliver events with at-least-once semantics.
    ///
    /// # Arguments
    ///
    /// - `topics`: Array of topic names to subscribe to
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::SubscriptionFailed`] if subscription fails.
    ///
    /// # Consumer Groups
    ///
    /// Implementations typically use consumer groups to enable multiple instances
    /// of the same subscriber to share the workload. Each consumer group receives
    /// its own copy of every event.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use futures::StreamExt;
    ///
    /// let mut stream = event_bus.subscribe(&["auth_events", "mfa_events"]).await?;
    ///
    /// while let Some(result) = stream.next().await {
    ///     match result {
    ///         Ok(event) => {
    ///             match event.event_type.as_str() {
    ///                 "login.attempted" => handle_login_attempted(&event)?,
    ///                 "mfa.completed" => handle_mfa_completed(&event)?,
    ///                 _ => {}
    ///             }
    ///         }
    ///         Err(e) => tracing::error!("Stream error: {}", e),
    ///     }
    /// }
    /// ```
    fn subscribe(
        &self,
        topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<EventStream, EventBusError>> + Send + '_>>;
}
