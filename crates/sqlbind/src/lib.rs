//! # sqlbind
//!
//! Composable SQL fragments with strictly separated bound parameters.
//!
//! ## Features
//!
//! - **Text and values never mix**: SQL text is pushed as text, values become placeholders
//! - **Optional filters vanish**: `omit_if_absent(None)` drops a field, `and([])` drops a group
//! - **Null-aware**: `WHERE x = null` renders `x IS NULL`, SET/VALUES bind null
//! - **Any placeholder style**: `?`, `$n`, `%s` or named, chosen at render time
//! - **Literal fallback**: very long IN lists are inlined with SQL-standard escaping
//!
//! ## Example
//!
//! ```ignore
//! use sqlbind::{Template, fields, in_range, omit_if_absent, where_, Numbered};
//!
//! let mut q = Template::new("SELECT * FROM op ");
//! q.push_fragment(where_(
//!     [in_range("date", start, end)],
//!     fields!["aid" => omit_if_absent(aid)],
//! ));
//!
//! let r = q.build().render(&Numbered);
//! // r.sql()    == "SELECT * FROM op WHERE (date >= $1 AND date < $2) AND aid = $3"
//! // r.params() == [start, end, aid]
//! ```

pub mod clause;
pub mod dialect;
pub mod error;
pub mod escape;
pub mod fragment;
#[cfg(feature = "postgres")]
pub mod pg;
pub mod predicate;
pub mod render;
pub mod template;
pub mod value;

pub use clause::{assign, set, values, values_row, where_};
pub use dialect::{Dialect, DialectKind, Format, Named, Numbered, QMark, UnknownDialect};
pub use error::{SqlBindError, SqlBindResult};
pub use escape::{escape, escape_list};
pub use fragment::{Compound, Fragment, and, join, not, or, prefix_join, text};
#[cfg(feature = "postgres")]
pub use pg::PgParam;
pub use predicate::{
    Column, IN_LIST_ESCAPE_THRESHOLD, col, in_crange, in_list, in_list_if_present, in_range,
    not_in_list,
};
pub use render::{Rendered, render};
pub use template::{Template, template};
pub use value::{Arg, IntoArg, Interpolation, Value, arg, omit_if_absent};
