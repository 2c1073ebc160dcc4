use super::{Flavor, Formatter, ToSql};

use quill_core::stmt::Value;

/// Destination for values encountered while rendering.
///
/// Returning a [`Placeholder`] binds the value as a parameter; returning
/// `None` asks the serializer to write a dialect-correct literal instead.
pub trait Params {
    fn push(&mut self, param: &Value) -> Option<Placeholder>;
}

pub struct Placeholder(pub usize);

/// Bind every value as a positional parameter.
///
/// The rendered SQL is then a reusable template: the same statement shape
/// serializes to the same string regardless of the bound values.
impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Option<Placeholder> {
        self.push(value.clone());
        Some(Placeholder(self.len()))
    }
}

/// Write every value inline as a SQL literal.
pub struct Inline;

impl Params for Inline {
    fn push(&mut self, _value: &Value) -> Option<Placeholder> {
        None
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use std::fmt::Write;

        match f.serializer.flavor() {
            Flavor::Mysql => write!(&mut f.dst, "?").unwrap(),
            Flavor::Postgresql => write!(&mut f.dst, "${}", self.0).unwrap(),
            Flavor::Sqlite => write!(&mut f.dst, "?{}", self.0).unwrap(),
        }
    }
}
