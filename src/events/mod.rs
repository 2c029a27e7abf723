use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Events emitted by stock-affecting operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ProductCreated(Uuid),
    ProductDeleted(Uuid),
    StockReceived {
        product_id: Uuid,
        quantity_added: Decimal,
        new_quantity: Decimal,
    },
    StockIssued {
        product_id: Uuid,
        quantity_removed: Decimal,
        new_quantity: Decimal,
        gate_pass_id: String,
    },
    LowStock {
        product_id: Uuid,
        stock_quantity: Decimal,
    },
    GatePassIssued {
        gate_pass_id: String,
        line_count: usize,
        issued_to: String,
    },
}

/// Consumes events from the channel until all senders are dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::LowStock {
                product_id,
                stock_quantity,
            } => {
                warn!(
                    product_id = %product_id,
                    stock = %stock_quantity,
                    "Product is running low on stock"
                );
            }
            Event::GatePassIssued {
                gate_pass_id,
                line_count,
                issued_to,
            } => {
                info!(
                    gate_pass_id = %gate_pass_id,
                    lines = line_count,
                    issued_to = %issued_to,
                    "Gate pass issued"
                );
            }
            other => {
                info!("Received event: {:?}", other);
            }
        }
    }

    info!("Event processing loop terminated");
}
