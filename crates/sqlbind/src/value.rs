//! Bound values and the omission sentinel.
//!
//! [`Value`] is the parameter type carried by every value cell. Scalars keep
//! their native representation (a NaN stays a float, it never collapses into
//! null); structured data travels as [`serde_json::Value`] in [`Value::Json`].
//! Fields passed to WHERE/SET/VALUES go through [`IntoArg`], which additionally
//! admits nested fragments and [`Arg::Undefined`].

use std::fmt;

use crate::fragment::Fragment;

/// A single bindable parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integers above `i64::MAX`.
    UInt(u64),
    /// Any `f64`, non-finite values included.
    Float(f64),
    Text(String),
    /// Arrays and objects, bound as JSON.
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        // isize is at most 64 bits on every supported target.
        Value::Int(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::UInt(v),
        }
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::from(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

/// JSON scalars become their native variants; arrays and objects stay JSON.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64()
                        .map(Value::Float)
                        .unwrap_or(Value::Json(serde_json::Value::Number(n)))
                }
            }
            other => Value::Json(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Text(s) => f.write_str(s),
            Value::Json(j) => write!(f, "{j}"),
        }
    }
}

/// The value cell held by a [`Fragment::Value`] node.
#[derive(Clone, Debug, PartialEq)]
pub enum Interpolation {
    /// A scalar that renders as one placeholder and one parameter.
    Param(Value),
    /// An already-built fragment; rendered in place, no placeholder of its own.
    Nested(Fragment),
}

impl Interpolation {
    /// The bound value, if this cell is not a nested fragment.
    pub fn param(&self) -> Option<&Value> {
        match self {
            Interpolation::Param(v) => Some(v),
            Interpolation::Nested(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Interpolation::Param(Value::Null))
    }

    /// True for a nested fragment that renders to nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Interpolation::Nested(f) if f.is_empty())
    }
}

/// A field argument: either something to bind, or "leave this field out".
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// Omit the field from the clause entirely.
    Undefined,
    /// Bind this value (null included).
    Bound(Interpolation),
}

impl Arg {
    /// True for [`Arg::Undefined`] and for a nested empty fragment, which
    /// would otherwise leave a dangling `field = `.
    pub fn is_undefined(&self) -> bool {
        match self {
            Arg::Undefined => true,
            Arg::Bound(cell) => cell.is_empty(),
        }
    }

    /// True for a bound null (which still renders, e.g. as `IS NULL`).
    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Bound(cell) if cell.is_null())
    }

    /// Turn the argument into a placeholder fragment; `Undefined` becomes `Empty`.
    pub fn into_fragment(self) -> Fragment {
        match self {
            Arg::Undefined => Fragment::Empty,
            Arg::Bound(cell) if cell.is_empty() => Fragment::Empty,
            Arg::Bound(cell) => Fragment::from_cell(cell),
        }
    }
}

/// Conversion into a field argument.
///
/// Implemented for every type with a [`Value`] conversion, `Option<T>`
/// (`None` binds null), [`Fragment`] (nested in place, `Empty` omits the
/// field) and [`Arg`] itself.
pub trait IntoArg {
    fn into_arg(self) -> Arg;
}

macro_rules! impl_into_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoArg for $ty {
                fn into_arg(self) -> Arg {
                    Arg::Bound(Interpolation::Param(Value::from(self)))
                }
            }
        )*
    };
}

impl_into_arg!(
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &str,
    &String,
    serde_json::Value,
);

impl IntoArg for Value {
    fn into_arg(self) -> Arg {
        Arg::Bound(Interpolation::Param(self))
    }
}

impl<T: IntoArg> IntoArg for Option<T> {
    fn into_arg(self) -> Arg {
        match self {
            Some(v) => v.into_arg(),
            None => Arg::Bound(Interpolation::Param(Value::Null)),
        }
    }
}

impl IntoArg for Fragment {
    fn into_arg(self) -> Arg {
        if self.is_empty() {
            return Arg::Undefined;
        }
        Arg::Bound(Interpolation::Nested(self))
    }
}

impl IntoArg for Interpolation {
    fn into_arg(self) -> Arg {
        Arg::Bound(self)
    }
}

impl IntoArg for Arg {
    fn into_arg(self) -> Arg {
        self
    }
}

/// Convert anything bindable into an [`Arg`].
///
/// Useful for building heterogeneous field lists by hand.
pub fn arg(value: impl IntoArg) -> Arg {
    value.into_arg()
}

/// Pass the value through, or mark the field as omitted when it is `None`.
///
/// This is what makes optional filters vanish from a query:
///
/// ```ignore
/// let w = where_([], fields!["aid" => omit_if_absent(account_id)]);
/// ```
pub fn omit_if_absent<T: IntoArg>(value: Option<T>) -> Arg {
    match value {
        Some(v) => v.into_arg(),
        None => Arg::Undefined,
    }
}

/// Build an ordered field list for [`where_`](crate::where_),
/// [`set`](crate::set) and [`values_row`](crate::values_row).
///
/// ```ignore
/// let w = where_([], fields!["name" => "alice", "deleted_at" => None::<i64>]);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        ::std::vec::Vec::<(&'static str, $crate::Arg)>::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$( ($name, $crate::IntoArg::into_arg($value)) ),+]
    };
}
