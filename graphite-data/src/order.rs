/// Ordering token that requests random order; passes field validation.
pub const RANDOM_ORDER: &str = "rand()";

/// Sort direction requested for one ORDER BY field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
    /// No direction token; the store's default applies.
    Unspecified,
}

impl OrderDirection {
    fn token(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
            OrderDirection::Unspecified => "",
        }
    }
}

/// `true` is ascending, `false` descending.
impl From<bool> for OrderDirection {
    fn from(ascending: bool) -> Self {
        if ascending {
            OrderDirection::Asc
        } else {
            OrderDirection::Desc
        }
    }
}

/// `"asc"` / `"desc"` in any case; anything else is unspecified.
impl From<&str> for OrderDirection {
    fn from(direction: &str) -> Self {
        match direction.to_lowercase().as_str() {
            "asc" => OrderDirection::Asc,
            "desc" => OrderDirection::Desc,
            _ => OrderDirection::Unspecified,
        }
    }
}

impl From<String> for OrderDirection {
    fn from(direction: String) -> Self {
        OrderDirection::from(direction.as_str())
    }
}

/// Build the ORDER BY clause for `orders`, keeping only fields listed in
/// `valid_fields` plus the [`RANDOM_ORDER`] token.
///
/// Returns an empty string when either input is empty or when no field
/// survives the filter. Otherwise the clause starts on a new line:
/// ``"\nORDER BY `name` ASC,RAND() "``.
pub fn order_by_clause(orders: &[(String, OrderDirection)], valid_fields: &[&str]) -> String {
    if orders.is_empty() || valid_fields.is_empty() {
        return String::new();
    }

    let tokens: Vec<String> = orders
        .iter()
        .filter_map(|(field, direction)| {
            if field == RANDOM_ORDER {
                Some(format!("RAND() {}", direction.token()))
            } else if valid_fields.contains(&field.as_str()) {
                Some(format!("`{field}` {}", direction.token()))
            } else {
                tracing::trace!(field = %field, "dropping unknown ORDER BY field");
                None
            }
        })
        .collect();

    if tokens.is_empty() {
        return String::new();
    }
    format!("\nORDER BY {}", tokens.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(pairs: &[(&str, OrderDirection)]) -> Vec<(String, OrderDirection)> {
        pairs.iter().map(|(f, d)| (f.to_string(), *d)).collect()
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(order_by_clause(&[], &["name"]), "");
        assert_eq!(
            order_by_clause(&orders(&[("name", OrderDirection::Asc)]), &[]),
            ""
        );
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let clause = order_by_clause(
            &orders(&[
                ("unknownColumn", true.into()),
                ("name", "asc".into()),
            ]),
            &["name"],
        );
        assert_eq!(clause, "\nORDER BY `name` ASC");
        assert!(!clause.contains("unknownColumn"));
    }

    #[test]
    fn test_directions() {
        let clause = order_by_clause(
            &orders(&[
                ("a", "DESC".into()),
                ("b", false.into()),
                ("c", "sideways".into()),
            ]),
            &["a", "b", "c"],
        );
        assert_eq!(clause, "\nORDER BY `a` DESC,`b` DESC,`c` ");
    }

    #[test]
    fn test_random_order_passes_through() {
        let clause = order_by_clause(
            &orders(&[(RANDOM_ORDER, OrderDirection::Unspecified)]),
            &["name"],
        );
        assert_eq!(clause, "\nORDER BY RAND() ");
    }

    #[test]
    fn test_nothing_valid() {
        let clause = order_by_clause(
            &orders(&[("id; DROP TABLE users", OrderDirection::Asc)]),
            &["name"],
        );
        assert_eq!(clause, "");
    }
}
