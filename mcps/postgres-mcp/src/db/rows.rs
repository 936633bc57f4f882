//! Result rows as JSON
//!
//! Every row becomes an object keyed by column name, in select-list order.
//! Values are decoded by PostgreSQL type name; types without a mapping come
//! back as a placeholder string instead of failing the whole query.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgColumn, PgRow};
use sqlx::types::{Decimal, Uuid};
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Column name and PostgreSQL type of one result column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

/// Complete result of one query
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResult {
    /// Result columns, present even when no rows came back
    pub columns: Vec<ColumnInfo>,
    /// Rows as objects keyed by column name
    pub rows: Vec<Map<String, Value>>,
    /// Number of rows returned
    pub row_count: usize,
}

/// Convert fetched rows into a [`QueryResult`]
pub fn collect(rows: &[PgRow]) -> Result<QueryResult, sqlx::Error> {
    let columns = rows
        .first()
        .map(|row| describe_columns(row.columns()))
        .unwrap_or_default();
    let rows = rows.iter().map(to_object).collect::<Result<Vec<_>, _>>()?;

    Ok(QueryResult {
        row_count: rows.len(),
        columns,
        rows,
    })
}

/// Column metadata from a row or from a statement description
pub fn describe_columns(columns: &[PgColumn]) -> Vec<ColumnInfo> {
    columns
        .iter()
        .map(|c| ColumnInfo {
            name: c.name().to_string(),
            data_type: c.type_info().name().to_string(),
        })
        .collect()
}

fn to_object(row: &PgRow) -> Result<Map<String, Value>, sqlx::Error> {
    let mut object = Map::with_capacity(row.len());
    for column in row.columns() {
        let value = decode(row, column.ordinal(), column.type_info().name())?;
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

fn decode(row: &PgRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOL" => Value::Bool(row.try_get(idx)?),
        "INT2" => Value::from(row.try_get::<i16, _>(idx)?),
        "INT4" => Value::from(row.try_get::<i32, _>(idx)?),
        "INT8" => Value::from(row.try_get::<i64, _>(idx)?),
        "OID" => Value::from(row.try_get::<Oid, _>(idx)?.0),
        "FLOAT4" => float(f64::from(row.try_get::<f32, _>(idx)?)),
        "FLOAT8" => float(row.try_get::<f64, _>(idx)?),
        // Exact digits as text; NaN and out-of-range values have no Decimal form.
        "NUMERIC" => match row.try_get::<Decimal, _>(idx) {
            Ok(d) => Value::String(d.to_string()),
            Err(_) => unsupported(type_name),
        },
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "UNKNOWN" => {
            Value::String(row.try_get::<String, _>(idx)?)
        }
        "JSON" | "JSONB" => row.try_get::<Value, _>(idx)?,
        "UUID" => Value::String(row.try_get::<Uuid, _>(idx)?.to_string()),
        "TIMESTAMPTZ" => Value::String(row.try_get::<DateTime<Utc>, _>(idx)?.to_rfc3339()),
        "TIMESTAMP" => Value::String(
            row.try_get::<NaiveDateTime, _>(idx)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        "DATE" => Value::String(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        "TIME" => Value::String(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        "BYTEA" => Value::String(bytea_hex(&row.try_get::<Vec<u8>, _>(idx)?)),
        "TEXT[]" | "VARCHAR[]" | "NAME[]" => json!(row.try_get::<Vec<Option<String>>, _>(idx)?),
        "INT2[]" => json!(row.try_get::<Vec<Option<i16>>, _>(idx)?),
        "INT4[]" => json!(row.try_get::<Vec<Option<i32>>, _>(idx)?),
        "INT8[]" => json!(row.try_get::<Vec<Option<i64>>, _>(idx)?),
        "FLOAT8[]" => json!(row.try_get::<Vec<Option<f64>>, _>(idx)?),
        "BOOL[]" => json!(row.try_get::<Vec<Option<bool>>, _>(idx)?),
        other => unsupported(other),
    };

    Ok(value)
}

/// JSON has no NaN or infinity
fn float(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn unsupported(type_name: &str) -> Value {
    Value::String(format!("<unsupported type {}>", type_name))
}

/// PostgreSQL's own text form for bytea
fn bytea_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytea_hex() {
        assert_eq!(bytea_hex(&[]), "\\x");
        assert_eq!(bytea_hex(&[0xde, 0xad, 0x01]), "\\xdead01");
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        assert_eq!(float(f64::NAN), Value::Null);
        assert_eq!(float(f64::INFINITY), Value::Null);
        assert_eq!(float(1.5), json!(1.5));
    }

    #[test]
    fn test_empty_result() {
        let result = collect(&[]).unwrap();
        assert!(result.columns.is_empty());
        assert!(result.rows.is_empty());
        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn test_column_type_serializes_as_type() {
        let column = ColumnInfo {
            name: "id".into(),
            data_type: "INT4".into(),
        };
        assert_eq!(
            serde_json::to_value(&column).unwrap(),
            json!({ "name": "id", "type": "INT4" })
        );
    }
}
