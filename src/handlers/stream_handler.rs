//! handlers/stream_handler.rs
//! Conexión push de larga vida (Server-Sent Events) sobre el broadcaster.

use actix_web::{web, HttpResponse};
use bytes::Bytes;
use futures_util::stream;

use crate::models::event_model::StreamMessage;
use crate::services::stream_service::DeliveryStreamService;

/// GET /api/deliveries/stream
/// Suscribe la conexión al broadcaster y la convierte en un stream SSE.
/// Al cortarse la conexión se suelta el receiver; el siguiente publish
/// descarta al suscriptor del registro.
pub async fn stream_deliveries_endpoint(
    stream_service: web::Data<DeliveryStreamService>,
) -> HttpResponse {
    let rx = stream_service.subscribe();
    log::info!(
        "(stream_deliveries_endpoint) conexiones activas: {}",
        stream_service.subscriber_count()
    );

    let body = stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|msg| (Ok::<Bytes, std::convert::Infallible>(render_sse_frame(&msg)), rx))
    });

    HttpResponse::Ok()
        .append_header(("Content-Type", "text/event-stream"))
        .append_header(("Cache-Control", "no-cache"))
        .append_header(("Connection", "keep-alive"))
        .streaming(body)
}

fn render_sse_frame(msg: &StreamMessage) -> Bytes {
    let frame = match msg {
        StreamMessage::Connected { retry_ms } => {
            format!("event: connected\nretry: {}\ndata: OK\n\n", retry_ms)
        }
        StreamMessage::Delivery(event) => {
            let payload = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
            format!("event: delivery\ndata: {}\n\n", payload)
        }
    };
    Bytes::from(frame)
}
