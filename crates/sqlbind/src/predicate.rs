//! Range, IN-list and column predicates.

use std::borrow::Cow;

use crate::error::SqlBindResult;
use crate::escape::escape_list;
use crate::fragment::{Fragment, and, join, text};
use crate::value::{Arg, IntoArg, Value};

/// Lists longer than this are inlined as escaped literals instead of being
/// bound, to stay under the placeholder limits of embedded databases.
pub const IN_LIST_ESCAPE_THRESHOLD: usize = 50;

/// `field op <value>`, or `Empty` when the bound is absent (null or undefined).
fn bound(field: &str, op: &str, value: Arg) -> Fragment {
    if value.is_undefined() || value.is_null() {
        return Fragment::Empty;
    }
    Fragment::concat([text(format!("{field} {op} ")), value.into_fragment()])
}

fn range(field: &str, left: Arg, right_op: &str, right: Arg) -> Fragment {
    and([bound(field, ">=", left), bound(field, right_op, right)])
}

/// Half-open range: `field >= left AND field < right`.
///
/// An absent bound (`None` or undefined) drops its comparison; both absent
/// gives `Empty`, one gives the bare comparison.
pub fn in_range(field: impl AsRef<str>, left: impl IntoArg, right: impl IntoArg) -> Fragment {
    range(field.as_ref(), left.into_arg(), "<", right.into_arg())
}

/// Closed range: `field >= left AND field <= right`.
pub fn in_crange(field: impl AsRef<str>, left: impl IntoArg, right: impl IntoArg) -> Fragment {
    range(field.as_ref(), left.into_arg(), "<=", right.into_arg())
}

/// `field IN (...)`.
///
/// - no values: `Empty` ("no predicate", not "match nothing"),
/// - `escape` or more than [`IN_LIST_ESCAPE_THRESHOLD`] values: literal list,
///   zero bound parameters,
/// - otherwise one placeholder per value.
///
/// # Errors
/// [`SqlBindError::UnsupportedEscape`](crate::SqlBindError::UnsupportedEscape)
/// if the literal list is used and a value is not a string, number or null.
pub fn in_list<V: Into<Value>>(
    field: impl AsRef<str>,
    values: impl IntoIterator<Item = V>,
    escape: bool,
) -> SqlBindResult<Fragment> {
    membership(field.as_ref(), "IN", values, escape)
}

/// [`in_list`] for an optional list: `None` omits the predicate, like an
/// [`omit_if_absent`](crate::omit_if_absent) field.
///
/// ```ignore
/// let w = where_([in_list_if_present("aid", account_ids, false)?], fields![]);
/// ```
pub fn in_list_if_present<I, V>(
    field: impl AsRef<str>,
    values: Option<I>,
    escape: bool,
) -> SqlBindResult<Fragment>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    match values {
        Some(values) => in_list(field, values, escape),
        None => Ok(Fragment::Empty),
    }
}

/// `field NOT IN (...)`, with the same rules as [`in_list`].
pub fn not_in_list<V: Into<Value>>(
    field: impl AsRef<str>,
    values: impl IntoIterator<Item = V>,
    escape: bool,
) -> SqlBindResult<Fragment> {
    membership(field.as_ref(), "NOT IN", values, escape)
}

fn membership<V: Into<Value>>(
    field: &str,
    op: &str,
    values: impl IntoIterator<Item = V>,
    escape: bool,
) -> SqlBindResult<Fragment> {
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Ok(Fragment::Empty);
    }

    if escape || values.len() > IN_LIST_ESCAPE_THRESHOLD {
        #[cfg(feature = "tracing")]
        if !escape {
            tracing::trace!(
                target: "sqlbind.in_list",
                field,
                count = values.len(),
                threshold = IN_LIST_ESCAPE_THRESHOLD,
                "inlining IN list as literals"
            );
        }
        let literals = escape_list(&values)?;
        return Ok(text(format!("{field} {op} ({literals})")));
    }

    Ok(Fragment::concat([
        text(format!("{field} {op} (")),
        join(", ", values.into_iter().map(Fragment::value)),
        text(")"),
    ]))
}

/// A column (or any SQL expression used as the left-hand side) to build
/// predicates from.
///
/// ```ignore
/// let cond = and([col("t.date").ge(start), col("aid").in_list(aids, false)?]);
/// ```
#[derive(Debug, Clone)]
pub struct Column(Cow<'static, str>);

/// Start a predicate on `name`.
pub fn col(name: impl Into<Cow<'static, str>>) -> Column {
    Column(name.into())
}

impl Column {
    pub fn name(&self) -> &str {
        &self.0
    }

    /// `col = value`; null renders `IS NULL`, undefined renders nothing.
    pub fn eq(&self, value: impl IntoArg) -> Fragment {
        self.null_aware("=", "IS NULL", value.into_arg())
    }

    /// `col != value`; null renders `IS NOT NULL`, undefined renders nothing.
    pub fn ne(&self, value: impl IntoArg) -> Fragment {
        self.null_aware("!=", "IS NOT NULL", value.into_arg())
    }

    /// `col < value`; null or undefined renders nothing.
    pub fn lt(&self, value: impl IntoArg) -> Fragment {
        bound(&self.0, "<", value.into_arg())
    }

    /// `col <= value`; null or undefined renders nothing.
    pub fn le(&self, value: impl IntoArg) -> Fragment {
        bound(&self.0, "<=", value.into_arg())
    }

    /// `col > value`; null or undefined renders nothing.
    pub fn gt(&self, value: impl IntoArg) -> Fragment {
        bound(&self.0, ">", value.into_arg())
    }

    /// `col >= value`; null or undefined renders nothing.
    pub fn ge(&self, value: impl IntoArg) -> Fragment {
        bound(&self.0, ">=", value.into_arg())
    }

    pub fn is_null(&self) -> Fragment {
        text(format!("{} IS NULL", self.0))
    }

    pub fn is_not_null(&self) -> Fragment {
        text(format!("{} IS NOT NULL", self.0))
    }

    /// See [`in_list`].
    pub fn in_list<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
        escape: bool,
    ) -> SqlBindResult<Fragment> {
        in_list(&self.0, values, escape)
    }

    /// See [`in_list_if_present`].
    pub fn in_list_if_present<I, V>(&self, values: Option<I>, escape: bool) -> SqlBindResult<Fragment>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        in_list_if_present(&self.0, values, escape)
    }

    /// See [`not_in_list`].
    pub fn not_in_list<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
        escape: bool,
    ) -> SqlBindResult<Fragment> {
        not_in_list(&self.0, values, escape)
    }

    /// See [`in_range`].
    pub fn in_range(&self, left: impl IntoArg, right: impl IntoArg) -> Fragment {
        in_range(&self.0, left, right)
    }

    /// See [`in_crange`].
    pub fn in_crange(&self, left: impl IntoArg, right: impl IntoArg) -> Fragment {
        in_crange(&self.0, left, right)
    }

    fn null_aware(&self, op: &str, null_form: &str, value: Arg) -> Fragment {
        match value {
            v if v.is_undefined() => Fragment::Empty,
            v if v.is_null() => text(format!("{} {null_form}", self.0)),
            v => Fragment::concat([text(format!("{} {op} ", self.0)), v.into_fragment()]),
        }
    }
}

impl From<Column> for Fragment {
    fn from(column: Column) -> Self {
        Fragment::Text(column.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::QMark;
    use crate::error::SqlBindError;
    use crate::fragment::or;
    use crate::value::omit_if_absent;
    use serde_json::json;

    fn qmark(f: &Fragment) -> (String, Vec<Value>) {
        f.render(&QMark).into_parts()
    }

    #[test]
    fn range_law() {
        assert_eq!(in_range("col", None::<i32>, None::<i32>), Fragment::Empty);
        assert_eq!(
            qmark(&in_range("col", 10, 20)),
            ("(col >= ? AND col < ?)".to_string(), vec![Value::from(10), Value::from(20)])
        );
        assert_eq!(
            qmark(&in_range("col", 10, None::<i32>)),
            ("col >= ?".to_string(), vec![Value::from(10)])
        );
        assert_eq!(
            qmark(&in_range("col", None::<i32>, 20)),
            ("col < ?".to_string(), vec![Value::from(20)])
        );
    }

    #[test]
    fn closed_range_uses_le() {
        assert_eq!(
            qmark(&in_crange("col", 1, 2)),
            ("(col >= ? AND col <= ?)".to_string(), vec![Value::from(1), Value::from(2)])
        );
        assert_eq!(qmark(&in_crange("col", None::<i32>, 2)).0, "col <= ?");
    }

    #[test]
    fn undefined_bounds_are_absent_too() {
        assert!(in_range("col", omit_if_absent(None::<i32>), Arg::Undefined).is_empty());
    }

    fn mixed() -> Vec<Value> {
        vec![Value::from(10), Value::from(10.5), Value::from("boo"), Value::from("b'b"), Value::from("b\"b")]
    }

    #[test]
    fn in_list_escaped_has_no_params() {
        let f = in_list("f", mixed(), true).unwrap();
        assert_eq!(
            qmark(&f),
            (
                r#"f IN (10, 10.5, 'boo', 'b''b', 'b"b')"#.to_string(),
                vec![]
            )
        );
    }

    #[test]
    fn in_list_binds_each_value() {
        let f = in_list("f", mixed(), false).unwrap();
        assert_eq!(qmark(&f), ("f IN (?, ?, ?, ?, ?)".to_string(), mixed()));
    }

    #[test]
    fn in_list_of_nothing_is_no_predicate() {
        assert_eq!(in_list("f", Vec::<i32>::new(), false), Ok(Fragment::Empty));
        assert_eq!(in_list("f", Vec::<i32>::new(), true), Ok(Fragment::Empty));
    }

    #[test]
    fn in_list_rejects_unescapable_values() {
        assert_eq!(
            in_list("f", [json!([])], true),
            Err(SqlBindError::UnsupportedEscape { kind: "array" })
        );
        // Bound parameters are not inspected.
        assert!(in_list("f", [json!([])], false).is_ok());
    }

    #[test]
    fn long_lists_fall_back_to_literals() {
        let at_limit = in_list("id", 0..IN_LIST_ESCAPE_THRESHOLD as i64, false).unwrap();
        assert_eq!(qmark(&at_limit).1.len(), IN_LIST_ESCAPE_THRESHOLD);

        let over = in_list("id", 0..=IN_LIST_ESCAPE_THRESHOLD as i64, false).unwrap();
        let (sql, params) = qmark(&over);
        assert!(params.is_empty());
        assert!(sql.starts_with("id IN (0, 1, 2"));
        assert!(sql.ends_with(", 50)"));
    }

    #[test]
    fn absent_list_omits_predicate() {
        assert_eq!(
            in_list_if_present("aid", None::<Vec<&str>>, false),
            Ok(Fragment::Empty)
        );
        assert_eq!(
            qmark(&col("aid").in_list_if_present(Some(["a", "b"]), false).unwrap()),
            (
                "aid IN (?, ?)".to_string(),
                vec![Value::from("a"), Value::from("b")]
            )
        );
        assert!(
            col("aid")
                .in_list_if_present(Some(Vec::<i32>::new()), true)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn non_finite_bounds_are_kept() {
        let (sql, params) = qmark(&in_range("rate", f64::INFINITY, None::<f64>));
        assert_eq!(sql, "rate >= ?");
        assert_eq!(params, vec![Value::Float(f64::INFINITY)]);

        let (sql, params) = qmark(&in_crange("rate", f64::NEG_INFINITY, f64::NAN));
        assert_eq!(sql, "(rate >= ? AND rate <= ?)");
        assert_eq!(params.len(), 2);

        assert_eq!(qmark(&col("rate").lt(f64::NAN)).0, "rate < ?");
        assert_eq!(qmark(&col("rate").eq(f64::NAN)).0, "rate = ?");
    }

    #[test]
    fn non_finite_floats_cannot_be_inlined() {
        assert_eq!(
            in_list("rate", [1.0, f64::NAN], true),
            Err(SqlBindError::UnsupportedEscape {
                kind: "non-finite float"
            })
        );
        let f = in_list("rate", [1.0, f64::NAN], false).unwrap();
        assert_eq!(qmark(&f).0, "rate IN (?, ?)");
        assert_eq!(qmark(&in_list("rate", [1.0, 2.5], true).unwrap()).0, "rate IN (1.0, 2.5)");
    }

    #[test]
    fn empty_fragment_bound_is_absent() {
        assert!(in_range("col", Fragment::Empty, Fragment::Empty).is_empty());
        assert_eq!(
            qmark(&in_range("col", text("now()"), Fragment::Empty)).0,
            "col >= now()"
        );
        assert!(col("col").eq(Fragment::Empty).is_empty());
    }

    #[test]
    fn not_in_list_mirrors_in_list() {
        assert_eq!(
            qmark(&not_in_list("kind", ["a", "b"], false).unwrap()),
            (
                "kind NOT IN (?, ?)".to_string(),
                vec![Value::from("a"), Value::from("b")]
            )
        );
        assert_eq!(
            qmark(&not_in_list("kind", ["a"], true).unwrap()).0,
            "kind NOT IN ('a')"
        );
    }

    #[test]
    fn column_predicates() {
        let date = col("t.date");
        assert_eq!(qmark(&date.eq(5)).0, "t.date = ?");
        assert_eq!(qmark(&date.eq(None::<i32>)).0, "t.date IS NULL");
        assert_eq!(qmark(&date.ne(None::<i32>)).0, "t.date IS NOT NULL");
        assert!(date.eq(omit_if_absent(None::<i32>)).is_empty());
        assert!(date.lt(None::<i32>).is_empty());
        assert_eq!(qmark(&date.ge(1)).0, "t.date >= ?");
        assert_eq!(qmark(&date.in_range(1, 2)).0, "(t.date >= ? AND t.date < ?)");
    }

    #[test]
    fn column_predicates_compose() {
        let f = or([col("a").gt(1), col("b").is_null(), col("c").le(None::<i32>)]);
        assert_eq!(qmark(&f), ("(a > ? OR b IS NULL)".to_string(), vec![Value::from(1)]));
        assert_eq!(Fragment::from(col("x")), text("x"));
    }
}
