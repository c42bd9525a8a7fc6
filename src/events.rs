//! Domain events, published to NATS when a client is configured.
//! Publishing is best-effort: a failed publish never fails the request.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::order::OrderStatus;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    OrderCreated { order_id: Uuid, user_id: Uuid },
    OrderStatusChanged { order_id: Uuid, status: OrderStatus },
}

impl DomainEvent {
    fn subject(&self) -> &'static str {
        match self {
            DomainEvent::OrderCreated { .. } => "orders.created",
            DomainEvent::OrderStatusChanged { .. } => "orders.status_changed",
        }
    }
}

pub async fn publish(client: &Option<async_nats::Client>, event: DomainEvent) {
    let Some(client) = client else { return };
    match serde_json::to_vec(&event) {
        Ok(payload) => {
            if let Err(err) = client.publish(event.subject(), payload.into()).await {
                tracing::warn!(%err, "failed to publish domain event");
            }
        }
        Err(err) => tracing::warn!(%err, "failed to encode domain event"),
    }
}
