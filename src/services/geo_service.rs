//! services/geo_service.rs
//! Resolución de audiencia por radio: distancia haversine sobre una esfera
//! de 6.371.000 m, orden ascendente por distancia.

use serde::Serialize;
use thiserror::Error;

use crate::models::customer_model::CustomerRecord;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("El radio debe ser mayor a 0 metros (recibido: {0})")]
    InvalidRadius(i64),
}

/// Un cliente dentro del radio, con su distancia al centro en metros.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRecipient {
    pub customer: CustomerRecord,
    pub distance_m: f64,
}

/// Distancia de círculo máximo entre dos puntos lat/lng (grados).
/// El argumento de acos se recorta a [-1, 1]: dos puntos idénticos pueden
/// quedar apenas fuera del dominio por redondeo de punto flotante.
pub fn haversine_distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lng1 = lng1.to_radians();
    let lat2 = lat2.to_radians();
    let lng2 = lng2.to_radians();

    let arg = lat1.cos() * lat2.cos() * (lng2 - lng1).cos() + lat1.sin() * lat2.sin();
    EARTH_RADIUS_M * arg.clamp(-1.0, 1.0).acos()
}

/// Devuelve los clientes con distancia <= radius_m, ascendente por
/// distancia. Empates conservan el orden de entrada (orden estable).
/// Un radio <= 0 es un error, nunca un resultado vacío silencioso;
/// cero coincidencias sí es un vector vacío.
pub fn resolve_recipients(
    center_lat: f64,
    center_lng: f64,
    radius_m: i64,
    customers: &[CustomerRecord],
) -> Result<Vec<ResolvedRecipient>, GeoError> {
    if radius_m <= 0 {
        return Err(GeoError::InvalidRadius(radius_m));
    }

    let mut resolved: Vec<ResolvedRecipient> = customers
        .iter()
        .map(|customer| ResolvedRecipient {
            distance_m: haversine_distance_m(center_lat, center_lng, customer.lat, customer.lng),
            customer: customer.clone(),
        })
        .filter(|r| r.distance_m <= radius_m as f64)
        .collect();

    resolved.sort_by(|a, b| {
        a.distance_m
            .partial_cmp(&b.distance_m)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(resolved)
}
