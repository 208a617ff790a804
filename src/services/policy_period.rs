//! Periodo de póliza
//!
//! La fecha de inicio llega como texto ISO 8601. Los valores sin zona se
//! interpretan en la zona horaria de referencia del servicio; el fin es el
//! inicio más `months` meses de calendario (31 ene + 1 mes = último día de febrero).
//!
//! Una hora local inexistente (salto de horario de verano) se interpreta con el
//! desfase anterior al salto, y una hora ambigua con la primera ocurrencia.

use chrono::{DateTime, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Interpretar una fecha/hora ISO en la zona de referencia
pub fn parse_start_date(value: &str, zone: Tz) -> Option<DateTime<Tz>> {
    let value = value.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.with_timezone(&zone));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    localize(zone, naive)
}

/// Sumar meses de calendario sobre la hora local, ajustando al último día válido del mes
pub fn policy_end_date(start: DateTime<Tz>, months: i32) -> Option<DateTime<Tz>> {
    let months = u32::try_from(months).ok()?;
    let end = start.naive_local().checked_add_months(Months::new(months))?;
    localize(start.timezone(), end)
}

fn localize(zone: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => Some(local),
        LocalResult::None => {
            // 02:30 en un salto de 02:00 a 03:00 queda en 03:30
            let before = naive.checked_sub_signed(Duration::days(1))?;
            let offset = zone.from_local_datetime(&before).earliest()?.offset().fix();
            let utc = naive.checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
            Some(zone.from_utc_datetime(&utc))
        }
    }
}
