use graphite_data::{Row, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// Decode every column of `row` into a [`Value`], keyed by column name.
pub(crate) fn decode_row(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    let mut out = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let index = column.ordinal();
        let value = if row.try_get_raw(index)?.is_null() {
            Value::Null
        } else {
            decode_column(row, index, column.type_info().name())?
        };
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            Value::Int(row.try_get_unchecked::<i64, _>(index)?)
        }
        name if name.ends_with("UNSIGNED") => Value::from(row.try_get_unchecked::<u64, _>(index)?),
        "BIT" => Value::from(bits_to_u64(&row.try_get_unchecked::<Vec<u8>, _>(index)?)),
        "FLOAT" => Value::Float(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => Value::Float(row.try_get::<f64, _>(index)?),
        "DATETIME" | "TIMESTAMP" => Value::Str(
            row.try_get::<chrono::NaiveDateTime, _>(index)?
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
        "DATE" => Value::Str(
            row.try_get::<chrono::NaiveDate, _>(index)?
                .format("%Y-%m-%d")
                .to_string(),
        ),
        "TIME" => Value::Str(
            row.try_get::<chrono::NaiveTime, _>(index)?
                .format("%H:%M:%S")
                .to_string(),
        ),
        "JSON" => Value::Json(row.try_get::<serde_json::Value, _>(index)?),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::Str(String::from_utf8_lossy(&bytes).into_owned())
        }
        // Text, DECIMAL, ENUM and SET all arrive as strings.
        _ => Value::Str(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

/// Big-endian BIT payload to its integer value.
fn bits_to_u64(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}
