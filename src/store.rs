//! PostgreSQL implementation of [`QueryExecutor`] over a shared `PgPool`.

use crate::config::GatewayConfig;
use crate::decode::{ColumnDescriptor, RowCursor, ScanError};
use crate::error::{BoxDynError, EntityError};
use crate::executor::QueryExecutor;
use crate::record::{EntityMeta, FieldValue};
use crate::sql::QueryBuf;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow, PgValueFormat, PgValueRef};
use sqlx::{Column, PgPool, Row, TypeInfo, ValueRef};
use std::str::FromStr;

/// Open the connection pool described by `config`.
pub async fn connect_pool(config: &GatewayConfig) -> Result<PgPool, sqlx::Error> {
    let mut opts = PgConnectOptions::from_str(&config.database_url)?;
    if let Some(timeout) = config.statement_timeout {
        opts = opts.options([("statement_timeout", format!("{}ms", timeout.as_millis()))]);
    }
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(opts)
        .await
}

#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        PgExecutor { pool }
    }

    fn prepare<'q>(q: &'q QueryBuf) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(*p);
        }
        query
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    type Row = PgRow;

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<PgRow>, EntityError> {
        Ok(Self::prepare(q).fetch_optional(&self.pool).await?)
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<PgRow>, EntityError> {
        Ok(Self::prepare(q).fetch_all(&self.pool).await?)
    }

    async fn fetch_entity_meta(&self, sql: &str) -> Result<Vec<EntityMeta>, EntityError> {
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, EntityMeta>(sql).fetch_all(&self.pool).await?)
    }

    async fn ping(&self) -> Result<(), EntityError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

impl RowCursor for PgRow {
    fn column_descriptors(&self) -> Vec<ColumnDescriptor> {
        Row::columns(self)
            .iter()
            .map(|c| ColumnDescriptor {
                name: c.name().to_string(),
                ordinal: c.ordinal(),
            })
            .collect()
    }

    fn scan_values(&self) -> Result<Vec<FieldValue>, ScanError> {
        (0..Row::len(self))
            .map(|i| cell_to_value(self, i).map_err(|source| ScanError { ordinal: i, source }))
            .collect()
    }
}

/// Decode one cell by its Postgres type name. Unknown types keep their wire bytes.
fn cell_to_value(row: &PgRow, idx: usize) -> Result<FieldValue, BoxDynError> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(FieldValue::Null);
    }
    let type_name = raw.type_info().name().to_string();
    Ok(match type_name.as_str() {
        "BOOL" => FieldValue::Bool(row.try_get::<bool, _>(idx)?),
        "INT2" => FieldValue::Int(row.try_get::<i16, _>(idx)?.into()),
        "INT4" => FieldValue::Int(row.try_get::<i32, _>(idx)?.into()),
        "INT8" => FieldValue::Int(row.try_get::<i64, _>(idx)?),
        "FLOAT4" => FieldValue::Float(row.try_get::<f32, _>(idx)?.into()),
        "FLOAT8" => FieldValue::Float(row.try_get::<f64, _>(idx)?),
        "NUMERIC" => numeric_value(row, idx, &raw)?,
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => FieldValue::Text(row.try_get::<String, _>(idx)?),
        "CITEXT" => FieldValue::Text(raw.as_str()?.to_string()),
        "UUID" => FieldValue::Text(row.try_get::<uuid::Uuid, _>(idx)?.to_string()),
        "TIMESTAMPTZ" | "TIMESTAMP" => match raw.format() {
            PgValueFormat::Binary => timestamp_from_micros(i64::from_be_bytes(fixed_bytes(&raw)?))?,
            PgValueFormat::Text => FieldValue::Text(raw.as_str()?.to_string()),
        },
        "DATE" => match raw.format() {
            PgValueFormat::Binary => date_from_days(i32::from_be_bytes(fixed_bytes(&raw)?))?,
            PgValueFormat::Text => FieldValue::Text(raw.as_str()?.to_string()),
        },
        "JSON" | "JSONB" => FieldValue::Json(row.try_get::<serde_json::Value, _>(idx)?),
        "BYTEA" => FieldValue::Bytes(row.try_get::<Vec<u8>, _>(idx)?),
        _ => FieldValue::Bytes(raw.as_bytes()?.to_vec()),
    })
}

/// Sign word of the binary numeric header.
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_POS_INF: u16 = 0xD000;
const NUMERIC_NEG_INF: u16 = 0xF000;

/// NUMERIC as its exact decimal text. NaN and the infinities have no `Decimal` form.
fn numeric_value(row: &PgRow, idx: usize, raw: &PgValueRef<'_>) -> Result<FieldValue, BoxDynError> {
    if matches!(raw.format(), PgValueFormat::Text) {
        return Ok(FieldValue::Text(raw.as_str()?.to_string()));
    }
    let bytes = raw.as_bytes()?;
    let sign = bytes.get(4..6).map(|b| u16::from_be_bytes([b[0], b[1]]));
    Ok(match sign {
        Some(NUMERIC_NAN) => FieldValue::Text("NaN".into()),
        Some(NUMERIC_POS_INF) => FieldValue::Text("Infinity".into()),
        Some(NUMERIC_NEG_INF) => FieldValue::Text("-Infinity".into()),
        _ => FieldValue::Text(row.try_get::<Decimal, _>(idx)?.to_string()),
    })
}

fn fixed_bytes<const N: usize>(raw: &PgValueRef<'_>) -> Result<[u8; N], BoxDynError> {
    let bytes = raw.as_bytes()?;
    bytes
        .try_into()
        .map_err(|_| format!("expected {} bytes, got {}", N, bytes.len()).into())
}

fn pg_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("2000-01-01 is a valid date")
}

/// Binary timestamps are microseconds since 2000-01-01; `i64::MAX`/`MIN` encode +/-infinity.
fn timestamp_from_micros(micros: i64) -> Result<FieldValue, BoxDynError> {
    match micros {
        i64::MAX => Ok(FieldValue::Text("infinity".into())),
        i64::MIN => Ok(FieldValue::Text("-infinity".into())),
        _ => pg_epoch()
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc())
            .and_then(|epoch: DateTime<Utc>| epoch.checked_add_signed(Duration::microseconds(micros)))
            .map(FieldValue::Timestamp)
            .ok_or_else(|| format!("timestamp {}us from 2000-01-01 is out of range", micros).into()),
    }
}

/// Binary dates are days since 2000-01-01; `i32::MAX`/`MIN` encode +/-infinity.
fn date_from_days(days: i32) -> Result<FieldValue, BoxDynError> {
    match days {
        i32::MAX => Ok(FieldValue::Text("infinity".into())),
        i32::MIN => Ok(FieldValue::Text("-infinity".into())),
        _ => pg_epoch()
            .checked_add_signed(Duration::days(days.into()))
            .map(|d| FieldValue::Text(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| format!("date {} days from 2000-01-01 is out of range", days).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn infinite_timestamps_become_text() {
        assert_eq!(timestamp_from_micros(i64::MAX).unwrap(), FieldValue::Text("infinity".into()));
        assert_eq!(timestamp_from_micros(i64::MIN).unwrap(), FieldValue::Text("-infinity".into()));
        assert_eq!(date_from_days(i32::MAX).unwrap(), FieldValue::Text("infinity".into()));
        assert_eq!(date_from_days(i32::MIN).unwrap(), FieldValue::Text("-infinity".into()));
    }

    #[test]
    fn timestamps_count_from_2000() {
        assert_eq!(
            timestamp_from_micros(0).unwrap(),
            FieldValue::Timestamp(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
        );
        // 2024-01-01T00:00:00Z
        assert_eq!(
            timestamp_from_micros(757_382_400_000_000).unwrap(),
            FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            timestamp_from_micros(-1_000_000).unwrap(),
            FieldValue::Timestamp(Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap())
        );
    }

    #[test]
    fn out_of_range_timestamp_is_an_error() {
        assert!(timestamp_from_micros(i64::MAX - 1).is_err());
        assert!(timestamp_from_micros(i64::MIN + 1).is_err());
    }

    #[test]
    fn dates_count_from_2000() {
        assert_eq!(date_from_days(0).unwrap(), FieldValue::Text("2000-01-01".into()));
        assert_eq!(date_from_days(-1).unwrap(), FieldValue::Text("1999-12-31".into()));
        assert_eq!(date_from_days(366).unwrap(), FieldValue::Text("2001-01-01".into()));
        assert!(date_from_days(i32::MAX - 1).is_err());
    }
}
