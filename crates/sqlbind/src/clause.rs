//! WHERE / SET / VALUES clause builders.
//!
//! Field lists are ordered `(name, value)` sequences; the order given is the
//! order of the rendered SQL and of the parameters. Names are spliced in as
//! raw text and are never parameterized.

use indexmap::IndexMap;

use crate::error::{SqlBindError, SqlBindResult};
use crate::fragment::{Fragment, join, prefix_join, text};
use crate::value::{Arg, IntoArg};

/// `field IS NULL` for null, `field = <value>` otherwise, `None` if undefined.
fn equality<K: AsRef<str>>(field: K, value: Arg) -> Option<Fragment> {
    if value.is_undefined() {
        return None;
    }
    let field = field.as_ref();
    if value.is_null() {
        return Some(text(format!("{field} IS NULL")));
    }
    Some(Fragment::concat([
        text(format!("{field} = ")),
        value.into_fragment(),
    ]))
}

fn assignment<K: AsRef<str>>(field: K, value: Arg) -> Option<Fragment> {
    if value.is_undefined() {
        return None;
    }
    Some(Fragment::concat([
        text(format!("{} = ", field.as_ref())),
        value.into_fragment(),
    ]))
}

/// Build a WHERE clause.
///
/// Positional `conditions` come first, then one equality per field. Fields
/// bound to null render `field IS NULL`; [`Arg::Undefined`] fields (and
/// fields holding an empty fragment) are skipped. Everything is joined with ` AND ` and prefixed with `WHERE `; if
/// nothing is left the result is `Empty` and no keyword is emitted.
///
/// # Example
/// ```ignore
/// let w = where_([in_range("date", start, end)], fields!["aid" => omit_if_absent(aid)]);
/// ```
pub fn where_<K, V>(
    conditions: impl IntoIterator<Item = Fragment>,
    fields: impl IntoIterator<Item = (K, V)>,
) -> Fragment
where
    K: AsRef<str>,
    V: IntoArg,
{
    let eqs = fields
        .into_iter()
        .filter_map(|(field, value)| equality(field, value.into_arg()));
    prefix_join("WHERE ", " AND ", conditions.into_iter().chain(eqs))
}

/// Comma-joined `field = <value>` list without the `SET` keyword.
///
/// Handy for `ON CONFLICT (...) DO UPDATE SET` tails.
pub fn assign<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Fragment
where
    K: AsRef<str>,
    V: IntoArg,
{
    join(
        ", ",
        fields
            .into_iter()
            .filter_map(|(field, value)| assignment(field, value.into_arg())),
    )
}

/// Build a SET clause; `Empty` when every field is undefined.
pub fn set<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Fragment
where
    K: AsRef<str>,
    V: IntoArg,
{
    let assigned = assign(fields);
    if assigned.is_empty() {
        return Fragment::Empty;
    }
    Fragment::concat([text("SET "), assigned])
}

/// Build `(f1, f2, ...) VALUES (?, ?, ...), (?, ?, ...)`.
///
/// The first row fixes the field order; later rows are looked up by name and
/// may list their fields in any order.
///
/// # Errors
/// - [`SqlBindError::EmptyValues`] if there are no rows,
/// - [`SqlBindError::MissingField`] if a later row lacks a field,
/// - [`SqlBindError::UndefinedValue`] if a value is [`Arg::Undefined`].
pub fn values<R, K, V>(rows: impl IntoIterator<Item = R>) -> SqlBindResult<Fragment>
where
    R: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: IntoArg,
{
    let mut rows = rows.into_iter();
    let first: IndexMap<String, Arg> = rows
        .next()
        .ok_or(SqlBindError::EmptyValues)?
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.into_arg()))
        .collect();

    let names: Vec<String> = first.keys().cloned().collect();
    let mut parts = vec![text(format!("({}) VALUES ", names.join(", ")))];
    parts.push(row_tuple(&names, first, 0)?);

    for (i, row) in rows.enumerate() {
        let row: IndexMap<String, Arg> = row
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.into_arg()))
            .collect();
        parts.push(text(", "));
        parts.push(row_tuple(&names, row, i + 1)?);
    }

    Ok(Fragment::concat(parts))
}

/// Single-row shortcut for [`values`].
pub fn values_row<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> SqlBindResult<Fragment>
where
    K: AsRef<str>,
    V: IntoArg,
{
    values([fields])
}

fn row_tuple(names: &[String], mut row: IndexMap<String, Arg>, index: usize) -> SqlBindResult<Fragment> {
    let mut cells = Vec::with_capacity(names.len());
    for name in names {
        match row.swap_remove(name) {
            Some(arg) if arg.is_undefined() => {
                return Err(SqlBindError::UndefinedValue {
                    field: name.clone(),
                });
            }
            Some(arg) => cells.push(arg.into_fragment()),
            None => return Err(SqlBindError::missing_field(index, name.as_str())),
        }
    }
    Ok(Fragment::concat([text("("), join(", ", cells), text(")")]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::QMark;
    use crate::fields;
    use crate::value::{Value, omit_if_absent};

    fn qmark(f: &Fragment) -> (String, Vec<Value>) {
        f.render(&QMark).into_parts()
    }

    #[test]
    fn where_mixes_null_undefined_and_values() {
        let sql = where_(
            [],
            fields![
                "some" => omit_if_absent(Some(10)),
                "null" => None::<i32>,
                "empty" => omit_if_absent(None::<i32>),
            ],
        );
        assert_eq!(
            qmark(&sql),
            ("WHERE some = ? AND null IS NULL".to_string(), vec![Value::from(10)])
        );
    }

    #[test]
    fn where_null_has_no_params() {
        let sql = where_([], fields!["x" => Value::Null]);
        assert_eq!(qmark(&sql), ("WHERE x IS NULL".to_string(), vec![]));
    }

    #[test]
    fn where_of_nothing_is_empty() {
        assert!(where_([Fragment::Empty], fields![]).is_empty());
        assert!(where_([], fields!["x" => omit_if_absent(None::<&str>)]).is_empty());
        assert_eq!(qmark(&where_([], fields![])), (String::new(), vec![]));
    }

    #[test]
    fn where_positional_before_fields() {
        let sql = where_(
            [text("deleted = 0")],
            [("aid", "a1"), ("kind", "expense")],
        );
        assert_eq!(
            qmark(&sql),
            (
                "WHERE deleted = 0 AND aid = ? AND kind = ?".to_string(),
                vec![Value::from("a1"), Value::from("expense")]
            )
        );
    }

    #[test]
    fn where_accepts_index_map() {
        let mut filters: IndexMap<String, Value> = IndexMap::new();
        filters.insert("z".into(), Value::from(1));
        filters.insert("a".into(), Value::from(2));
        assert_eq!(qmark(&where_([], filters)).0, "WHERE z = ? AND a = ?");
    }

    #[test]
    fn set_binds_null_and_skips_undefined() {
        let sql = set(fields![
            "boo" => 10,
            "foo" => None::<i32>,
            "bar" => omit_if_absent(None::<i32>),
        ]);
        assert_eq!(
            qmark(&sql),
            ("SET boo = ?, foo = ?".to_string(), vec![Value::from(10), Value::Null])
        );
    }

    #[test]
    fn empty_fragment_value_is_skipped() {
        let sql = where_([], fields!["a" => Fragment::Empty, "b" => 1]);
        assert_eq!(qmark(&sql), ("WHERE b = ?".to_string(), vec![Value::from(1)]));

        let sql = set(fields!["a" => crate::fragment::and([]), "b" => 2]);
        assert_eq!(qmark(&sql).0, "SET b = ?");

        let err = values_row(fields!["a" => Fragment::Empty]).unwrap_err();
        assert!(err.is_values_shape());
    }

    #[test]
    fn where_keeps_non_finite_floats() {
        let (sql, params) = qmark(&where_([], fields!["rate" => f64::NAN]));
        assert_eq!(sql, "WHERE rate = ?");
        assert!(matches!(params.as_slice(), [Value::Float(x)] if x.is_nan()));

        let (sql, params) = qmark(&set(fields!["rate" => f64::INFINITY]));
        assert_eq!(sql, "SET rate = ?");
        assert_eq!(params, vec![Value::Float(f64::INFINITY)]);
    }

    #[test]
    fn set_of_nothing_is_empty() {
        assert!(set(fields!["bar" => omit_if_absent(None::<i32>)]).is_empty());
    }

    #[test]
    fn set_value_can_be_fragment() {
        let sql = set(fields!["updated" => text("CURRENT_TIMESTAMP"), "n" => 1]);
        assert_eq!(
            qmark(&sql),
            ("SET updated = CURRENT_TIMESTAMP, n = ?".to_string(), vec![Value::from(1)])
        );
    }

    #[test]
    fn values_single_row() {
        let sql = values_row(fields!["boo" => 10, "foo" => None::<i32>]).unwrap();
        assert_eq!(
            qmark(&sql),
            (
                "(boo, foo) VALUES (?, ?)".to_string(),
                vec![Value::from(10), Value::Null]
            )
        );
    }

    #[test]
    fn values_rows_follow_first_row_order() {
        let sql = values([
            fields!["a" => 1, "b" => "x"],
            fields!["b" => "y", "a" => 2],
        ])
        .unwrap();
        assert_eq!(
            qmark(&sql),
            (
                "(a, b) VALUES (?, ?), (?, ?)".to_string(),
                vec![Value::from(1), Value::from("x"), Value::from(2), Value::from("y")]
            )
        );
    }

    #[test]
    fn values_errors() {
        let none: Vec<Vec<(&str, i32)>> = vec![];
        assert_eq!(values(none), Err(SqlBindError::EmptyValues));

        let err = values([fields!["a" => 1, "b" => 2], fields!["a" => 3]]).unwrap_err();
        assert_eq!(err, SqlBindError::missing_field(1, "b"));

        let err = values_row(fields!["a" => omit_if_absent(None::<i32>)]).unwrap_err();
        assert_eq!(
            err,
            SqlBindError::UndefinedValue {
                field: "a".to_string()
            }
        );
    }
}
