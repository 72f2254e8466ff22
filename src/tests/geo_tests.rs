//! tests/geo_tests.rs
//! Pruebas del resolver por radio (haversine).

#[cfg(test)]
mod tests {
    use crate::services::geo_service::{haversine_distance_m, resolve_recipients, GeoError};
    use crate::tests::helpers::make_customer;

    #[test]
    fn test_distancia_punto_identico_es_cero() {
        let d = haversine_distance_m(37.5, 127.0, 37.5, 127.0);
        // el clamp del acos evita NaN; queda 0 salvo ruido de redondeo
        assert!(d.is_finite());
        assert!(d < 1.0, "distancia inesperada: {}", d);
    }

    #[test]
    fn test_distancia_conocida() {
        // 0.0045 grados de latitud ≈ 500 m sobre el meridiano
        let d = haversine_distance_m(37.5, 127.0, 37.5045, 127.0);
        assert!((495.0..=505.0).contains(&d), "distancia fuera de rango: {}", d);
    }

    #[test]
    fn test_solo_entra_el_cliente_dentro_del_radio() {
        // centro (37.5000, 127.0000), radio 1000 m:
        // un cliente a ~500 m y otro a ~1500 m
        let customers = vec![
            make_customer("cerca", 37.5045, 127.0),
            make_customer("lejos", 37.5135, 127.0),
        ];

        let resolved = resolve_recipients(37.5, 127.0, 1000, &customers).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].customer.id, "cerca");
        assert!(resolved[0].distance_m <= 1000.0);
    }

    #[test]
    fn test_orden_ascendente_por_distancia() {
        let customers = vec![
            make_customer("lejos", 37.52, 127.0),
            make_customer("cerca", 37.501, 127.0),
            make_customer("medio", 37.51, 127.0),
        ];

        let resolved = resolve_recipients(37.5, 127.0, 10_000, &customers).unwrap();
        let ids: Vec<&str> = resolved.iter().map(|r| r.customer.id.as_str()).collect();
        assert_eq!(ids, vec!["cerca", "medio", "lejos"]);

        for pair in resolved.windows(2) {
            assert!(pair[0].distance_m <= pair[1].distance_m);
        }
    }

    #[test]
    fn test_empates_conservan_orden_de_entrada() {
        let customers = vec![
            make_customer("primero", 37.505, 127.0),
            make_customer("segundo", 37.505, 127.0),
        ];

        let resolved = resolve_recipients(37.5, 127.0, 5_000, &customers).unwrap();
        let ids: Vec<&str> = resolved.iter().map(|r| r.customer.id.as_str()).collect();
        assert_eq!(ids, vec!["primero", "segundo"]);
    }

    #[test]
    fn test_radio_invalido_es_error() {
        let customers = vec![make_customer("a", 37.5, 127.0)];

        let err = resolve_recipients(37.5, 127.0, 0, &customers).unwrap_err();
        assert!(matches!(err, GeoError::InvalidRadius(0)));

        let err = resolve_recipients(37.5, 127.0, -50, &customers).unwrap_err();
        assert!(matches!(err, GeoError::InvalidRadius(-50)));
    }

    #[test]
    fn test_sin_coincidencias_devuelve_vacio() {
        let customers = vec![make_customer("lejos", 38.5, 128.0)];

        let resolved = resolve_recipients(37.5, 127.0, 1000, &customers).unwrap();
        assert!(resolved.is_empty());
    }
}
