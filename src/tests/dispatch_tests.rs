//! tests/dispatch_tests.rs
//! Pruebas del coordinador de despacho concurrente.

#[cfg(test)]
mod tests {
    use actix_rt::test;

    use crate::models::campaign_model::CampaignStatus;
    use crate::models::delivery_model::DeliveryStatus;
    use crate::services::dispatch_service::DispatchError;
    use crate::tests::helpers::{
        create_campaign, create_campaign_with_target, create_customer_at, setup_context,
    };

    #[test]
    async fn test_campania_inexistente_es_not_found() {
        let ctx = setup_context(true).await;

        let err = ctx
            .dispatch_service
            .dispatch_campaign("no-existe")
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::CampaignNotFound(_)));
    }

    #[test]
    async fn test_campania_sin_target_queda_intacta() {
        let ctx = setup_context(true).await;
        let campaign = create_campaign(&ctx, None).await;

        let err = ctx
            .dispatch_service
            .dispatch_campaign(&campaign.id)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::MissingTargetLocation(_)));

        // no se tocó el estado: sigue en DRAFT
        let reloaded = ctx
            .campaign_service
            .get_campaign(&campaign.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, CampaignStatus::Draft);
    }

    #[test]
    async fn test_sin_audiencia_completa_con_resultado_cero() {
        let ctx = setup_context(true).await;
        let campaign = create_campaign_with_target(&ctx, 37.5, 127.0, 1000).await;

        let result = ctx
            .dispatch_service
            .dispatch_campaign(&campaign.id)
            .await
            .unwrap();

        assert_eq!(result.total_deliveries, 0);
        assert_eq!(result.sent_count, 0);
        assert_eq!(result.failed_count, 0);
        assert_eq!(result.success_rate, 0.0);
        assert!(!result.message.is_empty());

        let reloaded = ctx
            .campaign_service
            .get_campaign(&campaign.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, CampaignStatus::Completed);
    }

    #[test]
    async fn test_diez_destinatarios_con_exito_total() {
        let ctx = setup_context(true).await;
        let campaign = create_campaign_with_target(&ctx, 37.5, 127.0, 1000).await;
        for i in 0..10 {
            create_customer_at(&ctx, 37.5 + 0.0001 * i as f64, 127.0, None).await;
        }

        let result = ctx
            .dispatch_service
            .dispatch_campaign(&campaign.id)
            .await
            .unwrap();

        assert_eq!(result.total_deliveries, 10);
        assert_eq!(result.sent_count, 10);
        assert_eq!(result.failed_count, 0);
        assert_eq!(result.pending_count, 0);
        assert_eq!(result.success_rate, 100.0);

        let reloaded = ctx
            .campaign_service
            .get_campaign(&campaign.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, CampaignStatus::Completed);

        // ningún intento queda PENDING después del batch
        let attempts = ctx
            .delivery_service
            .list_by_campaign(&campaign.id)
            .await
            .unwrap();
        assert_eq!(attempts.len(), 10);
        assert!(attempts
            .iter()
            .all(|a| a.status != DeliveryStatus::Pending));
    }

    #[test]
    async fn test_todo_fallido_marca_la_campania_failed() {
        let ctx = setup_context(false).await;
        let campaign = create_campaign_with_target(&ctx, 37.5, 127.0, 1000).await;
        for _ in 0..3 {
            create_customer_at(&ctx, 37.5002, 127.0, None).await;
        }

        let result = ctx
            .dispatch_service
            .dispatch_campaign(&campaign.id)
            .await
            .unwrap();

        assert_eq!(result.total_deliveries, 3);
        assert_eq!(result.failed_count, 3);
        assert_eq!(result.sent_count, 0);
        assert_eq!(result.success_rate, 0.0);

        let reloaded = ctx
            .campaign_service
            .get_campaign(&campaign.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, CampaignStatus::Failed);
    }

    #[test]
    async fn test_solo_se_despacha_a_la_audiencia_del_radio() {
        let ctx = setup_context(true).await;
        let campaign = create_campaign_with_target(&ctx, 37.5, 127.0, 1000).await;

        // dos adentro (~500 m), uno afuera (~1500 m)
        create_customer_at(&ctx, 37.5045, 127.0, None).await;
        create_customer_at(&ctx, 37.4955, 127.0, None).await;
        create_customer_at(&ctx, 37.5135, 127.0, None).await;

        let result = ctx
            .dispatch_service
            .dispatch_campaign(&campaign.id)
            .await
            .unwrap();

        assert_eq!(result.total_deliveries, 2);
        assert_eq!(result.sent_count, 2);
    }

    #[test]
    async fn test_la_suma_de_estados_cierra_con_el_total() {
        let ctx = setup_context(false).await;
        let campaign = create_campaign_with_target(&ctx, 37.5, 127.0, 1000).await;
        for _ in 0..4 {
            create_customer_at(&ctx, 37.5001, 127.0, None).await;
        }

        let result = ctx
            .dispatch_service
            .dispatch_campaign(&campaign.id)
            .await
            .unwrap();

        assert_eq!(
            result.sent_count + result.failed_count + result.pending_count,
            result.total_deliveries
        );
    }
}
