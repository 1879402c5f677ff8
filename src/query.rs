use crate::credentials::Credentials;
use crate::error::HousingError;
use crate::{HousingTable, HousingType, DATABASE, PERIOD_END, PROCEDURE};
use chrono::prelude::*;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Connection, MySqlConnection, Row, TypeInfo};
use tracing::{debug, info};

/// Statement calling the stored procedure, metric name and zip code are bound in this order.
pub fn call_statement() -> String {
    format!("CALL {}(?, ?)", PROCEDURE)
}

/// Open the single connection used for the whole run.
pub async fn connect(credentials: &Credentials) -> Result<MySqlConnection, HousingError> {
    info!(
        hostname = %credentials.hostname,
        database = DATABASE,
        "connecting to the housing database"
    );
    let conn = MySqlConnection::connect(&credentials.connection_string()).await?;
    Ok(conn)
}

/// Call the stored procedure for a metric and a zip code
/// and collect the whole result set in a HousingTable.
pub async fn fetch_zip_code(
    conn: &mut MySqlConnection,
    metric_name: &str,
    zip_code: &str,
) -> Result<HousingTable, HousingError> {
    let statement = call_statement();
    let rows: Vec<MySqlRow> = sqlx::query(&statement)
        .bind(metric_name)
        .bind(zip_code)
        .fetch_all(&mut *conn)
        .await?;
    info!(zip_code, metric_name, rows = rows.len(), "fetched housing data");
    table_from_rows(&rows)
}

fn table_from_rows(rows: &[MySqlRow]) -> Result<HousingTable, HousingError> {
    let mut table = HousingTable::new(rows.len());
    for row in rows {
        let period_end = period_end(row)?;
        let mut values = [f64::NAN; 4];
        for (v, housing_type) in values.iter_mut().zip(HousingType::ALL) {
            *v = numeric_cell(row, housing_type.column_name())?;
        }
        table.push(period_end, values);
    }
    Ok(table)
}

/// How a cell is read, chosen from the column type reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Date,
    DateTime,
    Double,
    Float,
    Decimal,
    Unsigned,
    Signed,
}

impl CellKind {
    pub fn of_date(type_name: &str) -> CellKind {
        match type_name {
            "DATETIME" | "TIMESTAMP" => CellKind::DateTime,
            _ => CellKind::Date,
        }
    }

    pub fn of_number(type_name: &str) -> CellKind {
        match type_name {
            "DOUBLE" => CellKind::Double,
            "FLOAT" => CellKind::Float,
            "DECIMAL" => CellKind::Decimal,
            t if t.ends_with("UNSIGNED") => CellKind::Unsigned,
            _ => CellKind::Signed,
        }
    }
}

fn period_end(row: &MySqlRow) -> Result<NaiveDate, HousingError> {
    let column = row.try_column(PERIOD_END)?;
    let date = match CellKind::of_date(column.type_info().name()) {
        CellKind::DateTime => row.try_get::<NaiveDateTime, _>(PERIOD_END)?.date(),
        _ => row.try_get::<NaiveDate, _>(PERIOD_END)?,
    };
    Ok(date)
}

// Decode a numeric cell according to the type reported by the server.
// DECIMAL is transferred as text also by the binary protocol,
// so it is read unchecked as a string and parsed.
// NULL is a missing value and becomes NAN.
fn numeric_cell(row: &MySqlRow, name: &str) -> Result<f64, HousingError> {
    let column = row.try_column(name)?;
    let type_name = column.type_info().name();
    let value = match CellKind::of_number(type_name) {
        CellKind::Double => row.try_get::<Option<f64>, _>(name)?,
        CellKind::Float => row.try_get::<Option<f32>, _>(name)?.map(f64::from),
        CellKind::Decimal => match row.try_get_unchecked::<Option<String>, _>(name)? {
            Some(text) => Some(parse_decimal(name, &text)?),
            None => None,
        },
        CellKind::Unsigned => row.try_get::<Option<u64>, _>(name)?.map(|v| v as f64),
        _ => row.try_get::<Option<i64>, _>(name)?.map(|v| v as f64),
    };
    if value.is_none() {
        debug!(column = name, type_name, "NULL value read as NAN");
    }
    Ok(value.unwrap_or(f64::NAN))
}

fn parse_decimal(column: &str, text: &str) -> Result<f64, HousingError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| HousingError::NumberParse {
            column: column.to_string(),
            value: text.to_string(),
        })
}
