/// Declare a record type backed by a static [`Schema`](crate::Schema).
///
/// Generates the struct (deriving `Debug`, `Clone`, `Default`, `PartialEq`)
/// and its [`Record`](crate::Record) impl. Field types are
/// [`FieldType`](crate::FieldType) variant names. `raw_query` and `source`
/// are optional and must appear in that order.
///
/// ```ignore
/// graphite_data::record! {
///     /// A registered user.
///     pub struct User {
///         table: "users",
///         primary_key: "user_id",
///         fields: {
///             user_id: Integer,
///             name: String,
///             active: Boolean,
///         }
///     }
/// }
/// ```
///
/// Records that need lifecycle hooks implement `Record` by hand instead.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            table: $table:expr,
            primary_key: $pkey:expr,
            $(raw_query: $raw_query:expr,)?
            $(source: $source:expr,)?
            fields: {
                $( $field:ident : $ty:ident ),+ $(,)?
            } $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            data: $crate::RecordData,
        }

        impl $crate::Record for $name {
            fn schema() -> &'static $crate::Schema {
                static SCHEMA: $crate::Schema = $crate::Schema {
                    table: $table,
                    primary_key: $pkey,
                    fields: &[
                        $( $crate::FieldSpec::new(stringify!($field), $crate::FieldType::$ty), )+
                    ],
                    raw_query: $crate::__record_option!($($raw_query)?),
                    source: $crate::__record_option!($($source)?),
                };
                &SCHEMA
            }

            fn data(&self) -> &$crate::RecordData {
                &self.data
            }

            fn data_mut(&mut self) -> &mut $crate::RecordData {
                &mut self.data
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_option {
    () => {
        None
    };
    ($value:expr) => {
        Some($value)
    };
}

#[cfg(test)]
mod tests {
    use crate::{FieldType, Record, Value};

    crate::record! {
        pub struct Widget {
            table: "widgets",
            primary_key: "widget_id",
            source: "replica",
            fields: {
                widget_id: Integer,
                label: String,
                enabled: Boolean,
            }
        }
    }

    crate::record! {
        struct Report {
            table: "reports",
            primary_key: "id",
            raw_query: "SELECT t.`id`, t.`total` FROM `reports` t JOIN `lines` l ON l.`report_id` = t.`id`",
            fields: { id: Integer, total: Float }
        }
    }

    #[test]
    fn test_generated_schema() {
        let schema = Widget::schema();
        assert_eq!(schema.table, "widgets");
        assert_eq!(schema.primary_key, "widget_id");
        assert_eq!(schema.source, Some("replica"));
        assert_eq!(schema.raw_query, None);
        assert_eq!(schema.field_type("enabled"), Some(FieldType::Boolean));
        assert!(schema.validate().is_ok());

        assert!(Report::schema().raw_query.is_some());
        assert_eq!(Report::schema().source, None);
    }

    #[test]
    fn test_generated_record_tracks_changes() {
        let mut widget = Widget::with_pkey("12");
        assert_eq!(widget.pkey(), &Value::Int(12));
        assert!(widget.set("enabled", "yes"));
        assert!(!widget.set("missing", 1));
        assert_eq!(
            widget.diff(),
            vec![("widget_id", Value::Int(12)), ("enabled", Value::Bool(true))]
        );

        widget.commit_diff();
        assert!(!widget.is_dirty());
    }
}
