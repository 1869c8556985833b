use crate::value::FieldType;

/// One declared column of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FieldSpec {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type }
    }
}

/// Static table metadata of a record type.
///
/// Usually declared as a `static` by the [`record!`](crate::record) macro:
///
/// ```ignore
/// static USERS: Schema = Schema::new("users", "user_id", &[
///     FieldSpec::new("user_id", FieldType::Integer),
///     FieldSpec::new("name", FieldType::String),
/// ]);
/// ```
#[derive(Debug)]
pub struct Schema {
    pub table: &'static str,
    pub primary_key: &'static str,
    /// Declared fields, in column order.
    pub fields: &'static [FieldSpec],
    /// Base query used verbatim instead of the generated `SELECT ... FROM`.
    pub raw_query: Option<&'static str>,
    /// Named read source used for fetches of this record type.
    pub source: Option<&'static str>,
}

impl Schema {
    pub const fn new(
        table: &'static str,
        primary_key: &'static str,
        fields: &'static [FieldSpec],
    ) -> Self {
        Self {
            table,
            primary_key,
            fields,
            raw_query: None,
            source: None,
        }
    }

    pub const fn with_raw_query(mut self, query: &'static str) -> Self {
        self.raw_query = Some(query);
        self
    }

    pub const fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.field(name).map(|spec| spec.field_type)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|spec| spec.name).collect()
    }

    /// Type of the primary-key field.
    ///
    /// Falls back to `String` for a schema that fails [`Schema::validate`].
    pub fn primary_key_type(&self) -> FieldType {
        self.field_type(self.primary_key)
            .unwrap_or(FieldType::String)
    }

    /// Check the schema invariants: plain identifiers only, no duplicate
    /// fields, and a primary key that is one of the fields.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if !is_valid_identifier(self.table) {
            return Err(SchemaError::InvalidIdentifier {
                kind: "table",
                ident: self.table.to_string(),
            });
        }
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields {
                table: self.table.to_string(),
            });
        }
        for (idx, spec) in self.fields.iter().enumerate() {
            if !is_valid_identifier(spec.name) {
                return Err(SchemaError::InvalidIdentifier {
                    kind: "column",
                    ident: spec.name.to_string(),
                });
            }
            if self.fields[..idx].iter().any(|other| other.name == spec.name) {
                return Err(SchemaError::DuplicateField {
                    table: self.table.to_string(),
                    field: spec.name.to_string(),
                });
            }
        }
        if !self.has_field(self.primary_key) {
            return Err(SchemaError::MissingPrimaryKey {
                table: self.table.to_string(),
                primary_key: self.primary_key.to_string(),
            });
        }
        Ok(())
    }

    /// Abort the call path when the schema is invalid.
    ///
    /// An invalid schema is a programming mistake in a record declaration,
    /// not a runtime condition, so it is not reported through `DataError`.
    pub fn assert_valid(&self) {
        if let Err(err) = self.validate() {
            panic!("invalid record schema: {err}");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    InvalidIdentifier { kind: &'static str, ident: String },
    NoFields { table: String },
    DuplicateField { table: String, field: String },
    MissingPrimaryKey { table: String, primary_key: String },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
            SchemaError::NoFields { table } => write!(f, "Table `{table}` declares no fields"),
            SchemaError::DuplicateField { table, field } => {
                write!(f, "Table `{table}` declares field `{field}` twice")
            }
            SchemaError::MissingPrimaryKey { table, primary_key } => {
                write!(f, "Primary key `{primary_key}` is not a field of `{table}`")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// A plain SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    static USERS: Schema = Schema::new(
        "users",
        "user_id",
        &[
            FieldSpec::new("user_id", FieldType::Integer),
            FieldSpec::new("name", FieldType::String),
        ],
    );

    #[test]
    fn test_valid_schema() {
        assert!(USERS.validate().is_ok());
        assert_eq!(USERS.primary_key_type(), FieldType::Integer);
        assert_eq!(USERS.field_names(), vec!["user_id", "name"]);
    }

    #[test]
    fn test_missing_primary_key() {
        static BROKEN: Schema = Schema::new(
            "users",
            "id",
            &[FieldSpec::new("user_id", FieldType::Integer)],
        );
        assert!(matches!(
            BROKEN.validate(),
            Err(SchemaError::MissingPrimaryKey { .. })
        ));
    }

    #[test]
    fn test_invalid_identifier() {
        static BROKEN: Schema = Schema::new(
            "users;drop",
            "id",
            &[FieldSpec::new("id", FieldType::Integer)],
        );
        assert!(matches!(
            BROKEN.validate(),
            Err(SchemaError::InvalidIdentifier { kind: "table", .. })
        ));
    }

    #[test]
    fn test_duplicate_field() {
        static BROKEN: Schema = Schema::new(
            "users",
            "id",
            &[
                FieldSpec::new("id", FieldType::Integer),
                FieldSpec::new("id", FieldType::String),
            ],
        );
        assert!(matches!(
            BROKEN.validate(),
            Err(SchemaError::DuplicateField { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "invalid record schema")]
    fn test_assert_valid_panics() {
        static BROKEN: Schema = Schema::new("users", "id", &[]);
        BROKEN.assert_valid();
    }
}
