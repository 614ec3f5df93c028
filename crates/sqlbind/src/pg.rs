//! tokio-postgres binding for rendered parameters.
//!
//! Parameters are held as [`Value`]s, so the wire encoding is picked from the
//! type PostgreSQL reports for each placeholder.
//!
//! ```ignore
//! let r = stmt.render(&Numbered);
//! let params = r.pg_params();
//! let rows = client.query(r.sql(), &Rendered::pg_refs(&params)).await?;
//! ```

use std::error::Error;

use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type};

use crate::render::Rendered;
use crate::value::Value;

type BoxError = Box<dyn Error + Sync + Send>;

/// A borrowed parameter that encodes itself for the target column type.
#[derive(Debug, Clone, Copy)]
pub struct PgParam<'a>(pub &'a Value);

impl ToSql for PgParam<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Json(j) => j.to_sql_checked(ty, out),
            Value::Bool(b) => b.to_sql_checked(ty, out),
            Value::Int(i) => integer_to_sql(*i, ty, out),
            Value::UInt(u) => match i64::try_from(*u) {
                Ok(i) => integer_to_sql(i, ty, out),
                Err(_) if <String as ToSql>::accepts(ty) => u.to_string().to_sql(ty, out),
                Err(_) => Err(format!("{u} does not fit a {ty} parameter").into()),
            },
            Value::Float(x) => float_to_sql(*x, ty, out),
            Value::Text(s) => s.to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

fn integer_to_sql(i: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(i)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(i)?.to_sql(ty, out),
        Type::INT8 => i.to_sql(ty, out),
        Type::OID => u32::try_from(i)?.to_sql(ty, out),
        Type::FLOAT4 => (i as f32).to_sql(ty, out),
        Type::FLOAT8 => (i as f64).to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::Value::from(i).to_sql(ty, out),
        _ if <String as ToSql>::accepts(ty) => i.to_string().to_sql(ty, out),
        _ => Err(format!("cannot bind integer {i} to a {ty} parameter").into()),
    }
}

fn float_to_sql(x: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => (x as f32).to_sql(ty, out),
        Type::FLOAT8 => x.to_sql(ty, out),
        Type::JSON | Type::JSONB => match serde_json::Number::from_f64(x) {
            Some(n) => serde_json::Value::Number(n).to_sql(ty, out),
            None => Err(format!("{x} has no JSON representation").into()),
        },
        _ if <String as ToSql>::accepts(ty) => format!("{x:?}").to_sql(ty, out),
        _ => Err(format!("cannot bind float {x} to a {ty} parameter").into()),
    }
}

impl Rendered {
    /// Parameters wrapped for tokio-postgres, in placeholder order.
    pub fn pg_params(&self) -> Vec<PgParam<'_>> {
        self.params().iter().map(PgParam).collect()
    }

    /// Borrow wrapped parameters as the slice type `Client::query` expects.
    pub fn pg_refs<'a>(params: &'a [PgParam<'a>]) -> Vec<&'a (dyn ToSql + Sync)> {
        params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }
}
