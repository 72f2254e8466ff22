//! tests/stream_tests.rs
//! Pruebas del broadcaster de eventos en vivo.

#[cfg(test)]
mod tests {
    use crate::models::event_model::{DeliveryEvent, DeliveryEventType, StreamMessage};
    use crate::services::stream_service::DeliveryStreamService;
    use crate::tests::helpers::make_attempt;

    #[test]
    fn test_suscriptor_recibe_primero_el_ack_de_conexion() {
        let service = DeliveryStreamService::new(3000);

        let mut rx = service.subscribe();

        match rx.try_recv().unwrap() {
            StreamMessage::Connected { retry_ms } => assert_eq!(retry_ms, 3000),
            other => panic!("se esperaba el ack de conexión, llegó {:?}", other),
        }
        assert!(rx.try_recv().is_err(), "no debería haber más mensajes");
    }

    #[test]
    fn test_un_publish_entrega_exactamente_un_evento() {
        let service = DeliveryStreamService::new(3000);
        let mut rx = service.subscribe();
        let _ack = rx.try_recv().unwrap();

        let attempt = make_attempt("campania-1", "cliente-1");
        service.publish(DeliveryEvent::created(&attempt));

        match rx.try_recv().unwrap() {
            StreamMessage::Delivery(event) => {
                assert_eq!(event.event_type, DeliveryEventType::DeliveryCreated);
                assert_eq!(event.attempt_id, attempt.id);
                assert_eq!(event.campaign_id, "campania-1");
                assert_eq!(event.customer_id, "cliente-1");
            }
            other => panic!("se esperaba un evento de envío, llegó {:?}", other),
        }
        assert!(rx.try_recv().is_err(), "un publish, un solo evento");
    }

    #[test]
    fn test_suscriptor_tardio_no_ve_eventos_anteriores() {
        let service = DeliveryStreamService::new(3000);

        let attempt = make_attempt("campania-1", "cliente-1");
        service.publish(DeliveryEvent::created(&attempt));

        // se conecta después del publish: solo recibe el ack
        let mut late = service.subscribe();
        match late.try_recv().unwrap() {
            StreamMessage::Connected { .. } => {}
            other => panic!("se esperaba el ack de conexión, llegó {:?}", other),
        }
        assert!(late.try_recv().is_err(), "sin replay para tardíos");
    }

    #[test]
    fn test_conexion_rota_se_descarta_sin_afectar_al_resto() {
        let service = DeliveryStreamService::new(3000);

        let mut rx1 = service.subscribe();
        let rx2 = service.subscribe();
        let mut rx3 = service.subscribe();
        assert_eq!(service.subscriber_count(), 3);

        // una conexión se corta antes del publish
        drop(rx2);

        let attempt = make_attempt("campania-1", "cliente-1");
        service.publish(DeliveryEvent::created(&attempt));

        // el roto se fue del registro, los otros dos recibieron el evento
        assert_eq!(service.subscriber_count(), 2);

        let _ack1 = rx1.try_recv().unwrap();
        match rx1.try_recv().unwrap() {
            StreamMessage::Delivery(event) => assert_eq!(event.attempt_id, attempt.id),
            other => panic!("se esperaba un evento de envío, llegó {:?}", other),
        }

        let _ack3 = rx3.try_recv().unwrap();
        match rx3.try_recv().unwrap() {
            StreamMessage::Delivery(event) => assert_eq!(event.attempt_id, attempt.id),
            other => panic!("se esperaba un evento de envío, llegó {:?}", other),
        }
    }

    #[test]
    fn test_evento_de_actualizacion_viaja_con_su_tipo() {
        let service = DeliveryStreamService::new(3000);
        let mut rx = service.subscribe();
        let _ack = rx.try_recv().unwrap();

        let attempt = make_attempt("campania-1", "cliente-1");
        service.publish(DeliveryEvent::updated(&attempt));

        match rx.try_recv().unwrap() {
            StreamMessage::Delivery(event) => {
                assert_eq!(event.event_type, DeliveryEventType::DeliveryUpdated);
            }
            other => panic!("se esperaba un evento de envío, llegó {:?}", other),
        }
    }
}
