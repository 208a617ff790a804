use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Request para crear un pedido; los campos se validan en orden en el servicio
#[derive(Debug, Default, Deserialize)]
pub struct CreateCommandRequest {
    pub company_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub duration_id: Option<i64>,
    /// Fecha o fecha/hora ISO 8601
    pub start_date: Option<String>,
}

// Request de vista previa de precio
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CalculatePriceRequest {
    #[validate(required)]
    pub usage_id: Option<i64>,

    #[validate(required)]
    pub duration_id: Option<i64>,

    pub puissance_id: Option<i64>,

    #[validate(range(min = 0))]
    pub passenger_count: Option<i32>,

    #[validate(range(min = 0))]
    pub nombre_sur_plateau: Option<i32>,
}

// Query de /user-commands/
#[derive(Debug, Default, Deserialize)]
pub struct UserCommandsQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TarifDetails {
    #[serde(rename = "PN", with = "rust_decimal::serde::float")]
    pub pn: Decimal,
}

// Response de vista previa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePreview {
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    /// Nombre de la duración
    pub duration: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub coefficient: Decimal,
    /// TVA truncada
    pub tva: i64,
    pub total_price: i64,
    pub tarif_details: TarifDetails,
}
