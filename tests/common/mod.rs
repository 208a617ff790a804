#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

use insurance_commands::config::EnvironmentConfig;
use insurance_commands::models::{InsuranceDuration, PowerRange, Tariff, Vehicle};
use insurance_commands::repositories::MemoryStore;
use insurance_commands::routes::create_app;
use insurance_commands::state::AppState;
use insurance_commands::utils::jwt::{generate_token, JwtConfig};

pub const JWT_SECRET: &str = "test-secret";
pub const OWNER_ID: i64 = 7;

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let store = seeded_store();
        let config = EnvironmentConfig::for_tests(JWT_SECRET);
        let token = generate_token(OWNER_ID, &JwtConfig::from(&config)).expect("token");
        let router = create_app(AppState::new(Arc::new(store.clone()), config));
        Self { router, store, token }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).expect("serialize body"))
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("route executes");
        read_json(response).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn bucket(
    id: i64,
    usage_id: i64,
    puissance_id: Option<i64>,
    passengers: (Option<i32>, Option<i32>),
    plateau: Option<i32>,
) -> PowerRange {
    PowerRange {
        id,
        usage_id,
        puissance_id,
        min_passager: passengers.0,
        max_passager: passengers.1,
        nbre_sur_plateau: plateau,
    }
}

fn tariff(id: i64, range_id: i64, pn: Decimal, frais: Decimal) -> Tariff {
    Tariff {
        id,
        puissance_range_id: range_id,
        pn,
        frais,
    }
}

fn duration(id: i64, name: &str, months: i32, coefficient: Decimal, is_active: bool) -> InsuranceDuration {
    InsuranceDuration {
        id,
        name: name.to_string(),
        months,
        coefficient,
        is_active,
    }
}

/// Catálogo de prueba
///
/// - usage 1, sin pasajeros: PN 1000 + frais 50
/// - usage 2, potencia 5, 1..=9 pasajeros: PN 2000 + frais 0
/// - usage 3, sin tarif asociado
/// - usage 4, plateau 2: PN 3000 ; plateau 3: PN 4000
/// - vehículos: 1 (usage 1), 2 (usage 2, 4 pasajeros), 3 (usage 3), 4 (usage 9, sin tramo),
///   5 (usage 4, plateau 3)
/// - duraciones: 1 = 12 meses, 2 = 3 meses, 3 = 6 meses, 4 = 1 mes, 5 inactiva
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();

    store.add_power_range(bucket(1, 1, None, (None, None), None)).unwrap();
    store.add_power_range(bucket(2, 2, Some(5), (Some(1), Some(9)), None)).unwrap();
    store.add_power_range(bucket(3, 3, None, (Some(0), Some(0)), None)).unwrap();
    store.add_power_range(bucket(4, 4, None, (None, None), Some(2))).unwrap();
    store.add_power_range(bucket(5, 4, None, (None, None), Some(3))).unwrap();

    store.add_tariff(tariff(1, 1, dec!(1000), dec!(50))).unwrap();
    store.add_tariff(tariff(2, 2, dec!(2000), dec!(0))).unwrap();
    store.add_tariff(tariff(3, 4, dec!(3000), dec!(0))).unwrap();
    store.add_tariff(tariff(4, 5, dec!(4000), dec!(0))).unwrap();

    for (id, usage_id, puissance_id, passagers, nombre_sur_plateau) in [
        (1, 1, None, None, None),
        (2, 2, Some(5), Some(4), None),
        (3, 3, None, None, None),
        (4, 9, None, None, None),
        (5, 4, None, None, Some(3)),
    ] {
        store
            .add_vehicle(Vehicle {
                id,
                usage_id,
                puissance_id,
                passagers,
                nombre_sur_plateau,
                created_by: OWNER_ID,
            })
            .unwrap();
    }

    store.add_duration(duration(1, "12 mois", 12, dec!(1.0), true)).unwrap();
    store.add_duration(duration(2, "3 mois", 3, dec!(1.2), true)).unwrap();
    store.add_duration(duration(3, "6 mois", 6, dec!(1.1), true)).unwrap();
    store.add_duration(duration(4, "1 mois", 1, dec!(0.15), true)).unwrap();
    store.add_duration(duration(5, "24 mois", 24, dec!(1.9), false)).unwrap();

    store
}
