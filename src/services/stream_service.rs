//! services/stream_service.rs
//! Difusión en vivo de eventos de envío. Registro compartido de
//! suscriptores con fan-out best-effort, at-most-once y sin replay.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::event_model::{DeliveryEvent, StreamMessage};

/// Capacidad del canal de cada suscriptor. Un canal lleno se trata igual
/// que una conexión rota: no hay backpressure para consumidores lentos.
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 64;

struct Subscriber {
    id: String,
    tx: mpsc::Sender<StreamMessage>,
}

#[derive(Clone)]
pub struct DeliveryStreamService {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    retry_ms: u64,
}

impl DeliveryStreamService {
    pub fn new(retry_ms: u64) -> Self {
        DeliveryStreamService {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            retry_ms,
        }
    }

    /// Registra un suscriptor nuevo. El ack "connected" (con el hint de
    /// reconexión) queda encolado antes que cualquier evento real; un
    /// suscriptor tardío no ve eventos anteriores.
    pub fn subscribe(&self) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        let id = Uuid::new_v4().to_string();

        let _ = tx.try_send(StreamMessage::Connected {
            retry_ms: self.retry_ms,
        });

        self.subscribers.lock().unwrap().push(Subscriber {
            id: id.clone(),
            tx,
        });
        log::info!("(subscribe) Suscriptor {} registrado", id);
        rx
    }

    /// Un único try_send por suscriptor por evento. El que falla se
    /// descarta del registro en silencio; los demás no se ven afectados
    /// y el publicador nunca recibe el error.
    pub fn publish(&self, event: DeliveryEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|subscriber| {
            match subscriber.tx.try_send(StreamMessage::Delivery(event.clone())) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!(
                        "(publish) Suscriptor {} descartado del registro: {}",
                        subscriber.id,
                        e
                    );
                    false
                }
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}
