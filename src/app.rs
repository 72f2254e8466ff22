//! app.rs
use crate::handlers::{
    campaign_handler, customer_handler, delivery_handler, stream_handler,
    target_location_handler, targeting_handler,
};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/deliveries")
                    .route(
                        "/simulate/{campaign_id}",
                        web::post().to(delivery_handler::simulate_campaign_endpoint),
                    )
                    .route(
                        "/stream",
                        web::get().to(stream_handler::stream_deliveries_endpoint),
                    )
                    .route(
                        "/stats/summary",
                        web::get().to(delivery_handler::delivery_summary_endpoint),
                    )
                    .route(
                        "/stats/realtime",
                        web::get().to(delivery_handler::realtime_stats_endpoint),
                    )
                    .route(
                        "/stats/hourly",
                        web::get().to(delivery_handler::hourly_stats_endpoint),
                    )
                    .route(
                        "/stats/regions",
                        web::get().to(delivery_handler::region_stats_endpoint),
                    )
                    .route(
                        "/stats/campaign/{campaign_id}",
                        web::get().to(delivery_handler::campaign_stats_endpoint),
                    )
                    .route(
                        "/stats/target/{target_id}",
                        web::get().to(delivery_handler::target_stats_endpoint),
                    )
                    .route(
                        "/campaign/{campaign_id}",
                        web::get().to(delivery_handler::deliveries_by_campaign_endpoint),
                    )
                    .route(
                        "/status/{status}",
                        web::get().to(delivery_handler::deliveries_by_status_endpoint),
                    ),
            )
            .service(
                web::scope("/campaigns")
                    .route("", web::post().to(campaign_handler::create_campaign_endpoint))
                    .route("", web::get().to(campaign_handler::list_campaigns_endpoint))
                    .route(
                        "/{id}",
                        web::get().to(campaign_handler::get_campaign_endpoint),
                    ),
            )
            .service(
                web::scope("/customers")
                    .route("", web::post().to(customer_handler::create_customer_endpoint))
                    .route("", web::get().to(customer_handler::list_customers_endpoint))
                    .route(
                        "/{id}",
                        web::get().to(customer_handler::get_customer_endpoint),
                    ),
            )
            .service(
                web::scope("/targeting-locations")
                    .route(
                        "",
                        web::post().to(target_location_handler::create_target_location_endpoint),
                    )
                    .route(
                        "",
                        web::get().to(target_location_handler::list_target_locations_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::get().to(target_location_handler::get_target_location_endpoint),
                    ),
            )
            .service(web::scope("/targeting").route(
                "/preview/{campaign_id}",
                web::get().to(targeting_handler::preview_targeting_endpoint),
            )),
    );
}
