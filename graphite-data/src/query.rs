use crate::order::{order_by_clause, OrderDirection};
use crate::record::Record;
use crate::schema::Schema;
use crate::value::{FieldType, Value};

/// What to fetch: field constraints, ordering and pagination.
///
/// # Example
///
/// ```ignore
/// let q = FetchQuery::new()
///     .filter("status", "active")
///     .filter("user_id", vec![1, 2, 3])
///     .order_by("name", true)
///     .limit(10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FetchQuery {
    pub params: Vec<(String, Value)>,
    pub orders: Vec<(String, OrderDirection)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Default for FetchQuery {
    fn default() -> Self {
        Self {
            params: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: Some(0),
        }
    }
}

impl FetchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `field` to `value`, or to any of the values of a list.
    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.params.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: impl Into<OrderDirection>) -> Self {
        self.orders.push((field.to_string(), direction.into()));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Drop the offset; together with no limit this fetches every match.
    pub fn without_offset(mut self) -> Self {
        self.offset = None;
        self
    }
}

/// Builder for the SELECT statement of one record type.
///
/// Conditions hold already-rendered literals, so only [`build_select`]
/// feeds it, after coercion and escaping through [`render_literal`].
#[derive(Debug, Clone)]
pub(crate) struct QueryBuilder {
    schema: &'static Schema,
    conditions: Vec<Condition>,
    order: Vec<(String, OrderDirection)>,
    limit_val: Option<u64>,
    offset_val: Option<u64>,
}

#[derive(Debug, Clone)]
enum Condition {
    Eq(&'static str, String),
    In(&'static str, Vec<String>),
    IsNull(&'static str),
}

impl QueryBuilder {
    pub(crate) fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            conditions: Vec::new(),
            order: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    pub(crate) fn where_eq(mut self, column: &'static str, literal: String) -> Self {
        self.conditions.push(Condition::Eq(column, literal));
        self
    }

    pub(crate) fn where_in(mut self, column: &'static str, literals: Vec<String>) -> Self {
        self.conditions.push(Condition::In(column, literals));
        self
    }

    pub(crate) fn where_null(mut self, column: &'static str) -> Self {
        self.conditions.push(Condition::IsNull(column));
        self
    }

    pub(crate) fn order_by(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order.push((column.to_string(), direction));
        self
    }

    pub(crate) fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit_val = limit;
        self
    }

    pub(crate) fn offset(mut self, offset: Option<u64>) -> Self {
        self.offset_val = offset;
        self
    }

    /// Build the SELECT statement.
    ///
    /// `GROUP BY` on the primary key is always emitted so that a raw base
    /// query with joins still yields one row per record.
    pub(crate) fn build_select(&self) -> String {
        let mut sql = match self.schema.raw_query {
            Some(raw) if !raw.is_empty() => raw.to_string(),
            _ => {
                let columns: Vec<String> = self
                    .schema
                    .fields
                    .iter()
                    .map(|spec| format!("t.`{}`", spec.name))
                    .collect();
                format!(
                    "SELECT {}\nFROM `{}` t",
                    columns.join(", "),
                    self.schema.table
                )
            }
        };
        self.append_where(&mut sql);
        sql.push_str(&format!("\nGROUP BY t.`{}`", self.schema.primary_key));
        sql.push_str(&order_by_clause(&self.order, &self.schema.field_names()));
        self.append_limit_offset(&mut sql);
        sql
    }

    fn append_where(&self, sql: &mut String) {
        if self.conditions.is_empty() {
            return;
        }
        let predicates: Vec<String> = self
            .conditions
            .iter()
            .map(|cond| match cond {
                Condition::Eq(col, literal) => format!("t.`{col}` = {literal}"),
                Condition::In(col, literals) if literals.is_empty() => {
                    format!("t.`{col}` IN (NULL)")
                }
                Condition::In(col, literals) => {
                    format!("t.`{col}` IN ({})", literals.join(", "))
                }
                Condition::IsNull(col) => format!("t.`{col}` IS NULL"),
            })
            .collect();
        sql.push_str("\nWHERE ");
        sql.push_str(&predicates.join("\n    AND "));
    }

    fn append_limit_offset(&self, sql: &mut String) {
        if let (Some(limit), Some(offset)) = (self.limit_val, self.offset_val) {
            sql.push_str(&format!("\nLIMIT {offset},{limit}"));
        }
    }
}

/// Render `value` as a SQL literal for a field of type `field_type`.
///
/// Every literal in generated statements goes through here: `NULL` for
/// null, bit literals (`b'1'` / `b'0'`) for booleans, and a single-quoted
/// escaped string for everything else.
pub fn render_literal(
    field_type: FieldType,
    value: &Value,
    escape: &impl Fn(&str) -> String,
) -> String {
    match (field_type, value) {
        (_, Value::Null) => "NULL".to_string(),
        (FieldType::Boolean, value) => {
            let truthy = matches!(FieldType::Boolean.coerce(value.clone()), Value::Bool(true));
            if truthy { "b'1'" } else { "b'0'" }.to_string()
        }
        (_, value) => format!("'{}'", escape(&value.to_text().unwrap_or_default())),
    }
}

/// Build the SELECT statement for record type `R`.
///
/// Constraints on undeclared fields are skipped. Each value is coerced by
/// assigning it to a scratch record and reading it back, so type rules
/// live in one place. A list on a non-opaque field expands to `IN (...)`.
pub fn build_select<R: Record>(query: &FetchQuery, escape: &impl Fn(&str) -> String) -> String {
    let schema = R::schema();
    let mut scratch = R::default();
    let mut builder = QueryBuilder::new(schema);

    for (key, value) in &query.params {
        let Some(spec) = schema.field(key) else {
            tracing::trace!(table = schema.table, field = %key, "skipping unknown constraint field");
            continue;
        };
        match value {
            Value::List(items) if !spec.field_type.is_opaque() => {
                let literals = items
                    .iter()
                    .map(|item| {
                        scratch.set(spec.name, item.clone());
                        render_literal(spec.field_type, scratch.get(spec.name), escape)
                    })
                    .collect();
                builder = builder.where_in(spec.name, literals);
            }
            value => {
                scratch.set(spec.name, value.clone());
                let coerced = scratch.get(spec.name);
                builder = if coerced.is_null() {
                    builder.where_null(spec.name)
                } else {
                    let literal = render_literal(spec.field_type, coerced, escape);
                    builder.where_eq(spec.name, literal)
                };
            }
        }
    }

    for (field, direction) in &query.orders {
        builder = builder.order_by(field, *direction);
    }
    builder.limit(query.limit).offset(query.offset).build_select()
}

fn render_columns(
    schema: &Schema,
    columns: &[(&'static str, Value)],
    escape: &impl Fn(&str) -> String,
) -> Vec<(&'static str, String)> {
    columns
        .iter()
        .map(|(name, value)| {
            let field_type = schema.field_type(name).unwrap_or(FieldType::String);
            (*name, render_literal(field_type, value, escape))
        })
        .collect()
}

fn assignments(rendered: &[(&'static str, String)]) -> String {
    rendered
        .iter()
        .map(|(name, literal)| format!("`{name}` = {literal}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// ``INSERT INTO `t` (`a`, `b`)\nVALUES ('1', b'1')``
pub fn build_insert(
    schema: &Schema,
    columns: &[(&'static str, Value)],
    escape: &impl Fn(&str) -> String,
) -> String {
    let rendered = render_columns(schema, columns, escape);
    let names: Vec<&str> = rendered.iter().map(|(name, _)| *name).collect();
    let literals: Vec<&str> = rendered.iter().map(|(_, literal)| literal.as_str()).collect();
    format!(
        "INSERT INTO `{}` (`{}`)\nVALUES ({})",
        schema.table,
        names.join("`, `"),
        literals.join(", ")
    )
}

/// INSERT that updates the same columns when the row already exists
/// (`ON DUPLICATE KEY UPDATE`).
pub fn build_upsert(
    schema: &Schema,
    columns: &[(&'static str, Value)],
    escape: &impl Fn(&str) -> String,
) -> String {
    let insert = build_insert(schema, columns, escape);
    let rendered = render_columns(schema, columns, escape);
    format!("{insert}\nON DUPLICATE KEY UPDATE {}", assignments(&rendered))
}

/// ``UPDATE `t` SET `a` = '1'\nWHERE `pk` = '5'``
pub fn build_update(
    schema: &Schema,
    columns: &[(&'static str, Value)],
    pkey: &Value,
    escape: &impl Fn(&str) -> String,
) -> String {
    let rendered = render_columns(schema, columns, escape);
    format!(
        "UPDATE `{}` SET {}\nWHERE `{}` = {}",
        schema.table,
        assignments(&rendered),
        schema.primary_key,
        render_literal(schema.primary_key_type(), pkey, escape)
    )
}

/// ``DELETE FROM `t` \nWHERE `pk` = '5'``
pub fn build_delete(schema: &Schema, pkey: &Value, escape: &impl Fn(&str) -> String) -> String {
    format!(
        "DELETE FROM `{}` \nWHERE `{}` = {}",
        schema.table,
        schema.primary_key,
        render_literal(schema.primary_key_type(), pkey, escape)
    )
}
