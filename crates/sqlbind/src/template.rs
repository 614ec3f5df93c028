//! Push-style builder for whole statements.
//!
//! `Template` is the explicit replacement for interpolated SQL strings: text is
//! pushed as text, values are pushed as values, and nothing is ever parsed out
//! of a string.
//!
//! # Example
//!
//! ```ignore
//! use sqlbind::{Template, text, where_, fields, omit_if_absent, QMark};
//!
//! let mut q = Template::new("SELECT * FROM ");
//! q.push_fragment(text(table))
//!     .push(" ")
//!     .push_fragment(where_([], fields!["aid" => omit_if_absent(aid)]));
//!
//! let (sql, params) = q.build().render(&QMark).into_parts();
//! ```

use crate::fragment::{Fragment, text};
use crate::value::Value;

/// A statement under construction.
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct Template {
    parts: Vec<Fragment>,
}

/// Start building a statement from an initial SQL text.
pub fn template(initial_sql: impl Into<String>) -> Template {
    Template::new(initial_sql)
}

impl Template {
    /// Create a new builder with an initial SQL text.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let mut t = Self::empty();
        t.push(&initial_sql.into());
        t
    }

    /// Create an empty builder.
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(Fragment::Text(last)) => last.to_mut().push_str(sql),
            _ => self.parts.push(text(sql.to_string())),
        }
        self
    }

    /// Append a placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.parts.push(Fragment::value(value));
        self
    }

    /// Append a comma-separated list of placeholders, one per value.
    ///
    /// Nothing is appended for an empty list.
    pub fn push_bind_list<T: Into<Value>>(&mut self, values: impl IntoIterator<Item = T>) -> &mut Self {
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_bind(v);
        }
        self
    }

    /// Append an already-built fragment; it renders in place.
    pub fn push_fragment(&mut self, fragment: Fragment) -> &mut Self {
        if !fragment.is_empty() {
            self.parts.push(Fragment::nested(fragment));
        }
        self
    }

    /// Append another template, consuming it.
    pub fn push_template(&mut self, other: Template) -> &mut Self {
        for part in other.parts {
            match part {
                Fragment::Text(sql) => {
                    self.push(&sql);
                }
                other => self.parts.push(other),
            }
        }
        self
    }

    /// Check if nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Finish the statement.
    pub fn build(self) -> Fragment {
        Fragment::concat(self.parts)
    }
}

impl From<Template> for Fragment {
    fn from(template: Template) -> Self {
        template.build()
    }
}
