#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
pub use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Inline, Params, Placeholder};

// Fragment serializers
mod expr;
mod statement;
mod value;

use quill_core::{
    driver::Capability,
    stmt::{Expr, Statement},
    Error, Result,
};

/// Serialize a statement to a SQL string for one dialect.
///
/// Rendering is a pure function of the statement tree and the
/// [`Capability`] descriptor; no I/O happens here.
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Dialect capabilities: quoting, escaping, precision, feature flags.
    capability: &'a Capability,

    /// The database flavor handles the syntax differences between SQL
    /// dialects.
    flavor: Flavor,

    /// When `false`, raw SQL fragments are rejected at render time.
    allow_raw: bool,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,

    /// Auto-generated aliases handed to anonymous derived tables, counting
    /// up: `t1`, `t2`, ...
    aliases: usize,

    /// First error hit while rendering; fragments keep writing but the
    /// result is discarded.
    error: Option<Error>,
}

impl<T> Formatter<'_, T> {
    /// Records the first rendering error.
    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn next_alias(&mut self) -> usize {
        self.aliases += 1;
        self.aliases
    }
}

impl<'a> Serializer<'a> {
    /// Serialize a statement to a SQL string.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> Result<String> {
        self.render(|f| stmt.to_sql(f), params)
    }

    /// Serialize a single expression. Useful for fragments and literals.
    pub fn serialize_expr(&self, expr: &Expr, params: &mut impl Params) -> Result<String> {
        self.render(|f| expr.to_sql(f), params)
    }

    /// Render an expression with all values inlined as SQL literals.
    pub fn literal(&self, expr: &Expr) -> Result<String> {
        self.serialize_expr(expr, &mut Inline)
    }

    fn render<T: Params>(
        &self,
        emit: impl FnOnce(&mut Formatter<'_, T>),
        params: &mut T,
    ) -> Result<String> {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            aliases: 0,
            error: None,
        };

        emit(&mut fmt);

        match fmt.error.take() {
            Some(err) => Err(err),
            None => Ok(ret),
        }
    }

    pub fn capability(&self) -> &Capability {
        self.capability
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }
}
