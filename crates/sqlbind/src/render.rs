//! Turning a fragment tree into `(sql, params)`.
//!
//! The walk is depth-first and left-to-right, so parameter order always
//! matches the order in which value cells appear in the tree. Nested fragments
//! held in value cells are rendered in place and consume no placeholder.

use indexmap::IndexMap;

use crate::dialect::Dialect;
use crate::fragment::Fragment;
use crate::value::{Interpolation, Value};

/// Final SQL text plus its ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    sql: String,
    params: Vec<Value>,
    names: Option<Vec<String>>,
}

impl Rendered {
    /// The SQL text with dialect placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// True if the dialect addresses parameters by name.
    pub fn is_named(&self) -> bool {
        self.names.is_some()
    }

    /// Parameters keyed by their generated names, in placeholder order.
    ///
    /// `None` for positional dialects.
    pub fn named_params(&self) -> Option<IndexMap<String, Value>> {
        let names = self.names.as_ref()?;
        Some(
            names
                .iter()
                .cloned()
                .zip(self.params.iter().cloned())
                .collect(),
        )
    }

    /// Split into SQL text and positional parameters.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

/// Render a fragment tree for `dialect`.
///
/// Rendering is total and deterministic: the same tree and dialect always give
/// byte-identical output.
pub fn render<D: Dialect + ?Sized>(fragment: &Fragment, dialect: &D) -> Rendered {
    let mut sql = String::new();
    let mut params: Vec<Value> = Vec::new();

    walk(fragment, &mut sql, &mut |out: &mut String, value: &Value| {
        dialect.write_mark(out, params.len());
        params.push(value.clone());
    });

    let names = dialect
        .param_name(0)
        .map(|_| (0..params.len()).filter_map(|i| dialect.param_name(i)).collect());

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "sqlbind.render",
        dialect = dialect.name(),
        params = params.len(),
        sql = %truncate_sql_bytes(&sql, MAX_LOGGED_SQL),
        "rendered fragment"
    );

    Rendered { sql, params, names }
}

/// Walk the tree, writing text verbatim and calling `bind` for each parameter.
pub(crate) fn walk<F>(fragment: &Fragment, out: &mut String, bind: &mut F)
where
    F: FnMut(&mut String, &Value),
{
    match fragment {
        Fragment::Empty => {}
        Fragment::Text(sql) => out.push_str(sql),
        Fragment::Value(cell) => match cell.as_ref() {
            Interpolation::Param(value) => bind(out, value),
            Interpolation::Nested(inner) => walk(inner, out, bind),
        },
        Fragment::Compound(compound) => {
            let wrap = compound.wrap();
            if let Some((open, _)) = wrap {
                out.push_str(open);
            }
            for (i, child) in compound.children().iter().enumerate() {
                if i > 0 {
                    out.push_str(compound.separator());
                }
                walk(child, out, bind);
            }
            if let Some((_, close)) = wrap {
                out.push_str(close);
            }
        }
    }
}

#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

#[cfg(feature = "tracing")]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
