//! The composable expression tree.
//!
//! A [`Fragment`] is an immutable node:
//! - literal SQL text (never parameterized, never escaped),
//! - a value cell rendered as a placeholder,
//! - a compound of ordered children joined by a separator,
//! - or [`Fragment::Empty`], the identity element of AND/OR.
//!
//! Children are `Arc`-shared, so cloning a fragment to reuse it in several
//! queries is cheap and never copies bound values.

use std::borrow::Cow;
use std::sync::Arc;

use crate::dialect::Dialect;
use crate::escape::escape;
use crate::render::{Rendered, render, walk};
use crate::value::{Interpolation, Value};

/// Expression node for building SQL statements.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Fragment {
    /// No SQL at all. Dropped by AND/OR, absorbs NOT and clause prefixes.
    #[default]
    Empty,

    /// Raw SQL text.
    Text(Cow<'static, str>),

    /// A value cell: one placeholder, or a nested fragment rendered in place.
    Value(Arc<Interpolation>),

    /// Ordered children joined by a separator, optionally wrapped.
    Compound(Arc<Compound>),
}

/// Children of a [`Fragment::Compound`].
#[derive(Debug, PartialEq)]
pub struct Compound {
    children: Vec<Fragment>,
    separator: Cow<'static, str>,
    wrap: Option<(&'static str, &'static str)>,
}

impl Compound {
    pub fn children(&self) -> &[Fragment] {
        &self.children
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn wrap(&self) -> Option<(&'static str, &'static str)> {
        self.wrap
    }
}

impl Fragment {
    /// Create a raw SQL fragment.
    pub fn text(sql: impl Into<Cow<'static, str>>) -> Self {
        Fragment::Text(sql.into())
    }

    /// Create a placeholder bound to `value`.
    pub fn value(value: impl Into<Value>) -> Self {
        Fragment::Value(Arc::new(Interpolation::Param(value.into())))
    }

    /// Embed `fragment` as a value cell. Renders exactly like `fragment`.
    pub fn nested(fragment: Fragment) -> Self {
        Fragment::Value(Arc::new(Interpolation::Nested(fragment)))
    }

    pub(crate) fn from_cell(cell: Interpolation) -> Self {
        Fragment::Value(Arc::new(cell))
    }

    /// Concatenate fragments with no separator.
    ///
    /// Empty parts are dropped; a single remaining part is returned as is.
    pub fn concat(parts: impl IntoIterator<Item = Fragment>) -> Self {
        join_fragments("", parts, None)
    }

    /// Check if this fragment renders to nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Fragment::Empty)
    }

    /// Render with the given dialect.
    pub fn render<D: Dialect + ?Sized>(&self, dialect: &D) -> Rendered {
        render(self, dialect)
    }

    /// Render with every parameter inlined as a literal.
    ///
    /// Values the escaping fallback rejects are shown in their display form.
    /// Useful for debugging, never for execution.
    pub fn preview(&self) -> String {
        let mut out = String::new();
        walk(self, &mut out, &mut |out: &mut String, v: &Value| match escape(v) {
            Ok(literal) => out.push_str(&literal),
            Err(_) => out.push_str(&v.to_string()),
        });
        out
    }
}

/// Join fragments with `separator`, dropping empty ones.
///
/// Zero survivors give `Empty`, one is returned unchanged, two or more make a
/// compound wrapped in `wrap`.
pub(crate) fn join_fragments(
    separator: impl Into<Cow<'static, str>>,
    fragments: impl IntoIterator<Item = Fragment>,
    wrap: Option<(&'static str, &'static str)>,
) -> Fragment {
    let mut children: Vec<Fragment> = fragments.into_iter().filter(|f| !f.is_empty()).collect();
    match children.len() {
        0 => Fragment::Empty,
        1 => children.pop().unwrap_or_default(),
        _ => Fragment::Compound(Arc::new(Compound {
            children,
            separator: separator.into(),
            wrap,
        })),
    }
}

/// Wrap a raw literal string, e.g. a table or column name.
pub fn text(sql: impl Into<Cow<'static, str>>) -> Fragment {
    Fragment::text(sql)
}

/// AND group: `(a AND b ...)`, the bare operand if only one, `Empty` if none.
pub fn and(fragments: impl IntoIterator<Item = Fragment>) -> Fragment {
    join_fragments(" AND ", fragments, Some(("(", ")")))
}

/// OR group: `(a OR b ...)`, the bare operand if only one, `Empty` if none.
pub fn or(fragments: impl IntoIterator<Item = Fragment>) -> Fragment {
    join_fragments(" OR ", fragments, Some(("(", ")")))
}

/// Negate a fragment. Negating `Empty` ("no condition") stays `Empty`.
pub fn not(fragment: Fragment) -> Fragment {
    if fragment.is_empty() {
        return Fragment::Empty;
    }
    Fragment::concat([text("NOT "), fragment])
}

/// Join with a separator and no wrapping.
pub fn join(
    separator: impl Into<Cow<'static, str>>,
    fragments: impl IntoIterator<Item = Fragment>,
) -> Fragment {
    join_fragments(separator, fragments, None)
}

/// Join with a separator and put `prefix` in front, unless nothing is left.
pub fn prefix_join(
    prefix: impl Into<Cow<'static, str>>,
    separator: impl Into<Cow<'static, str>>,
    fragments: impl IntoIterator<Item = Fragment>,
) -> Fragment {
    let joined = join(separator, fragments);
    if joined.is_empty() {
        return Fragment::Empty;
    }
    Fragment::concat([text(prefix), joined])
}
