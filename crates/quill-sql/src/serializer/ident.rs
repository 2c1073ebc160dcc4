use super::{Flavor, Formatter, Params, ToSql};

/// An identifier, quoted per the dialect when the capability asks for it.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let name = self.0.as_ref();

        if !f.serializer.capability().quote_identifiers {
            f.dst.push_str(name);
            return;
        }

        let quote = match f.serializer.flavor() {
            Flavor::Mysql => '`',
            Flavor::Postgresql | Flavor::Sqlite => '"',
        };

        f.dst.push(quote);
        for ch in name.chars() {
            f.dst.push(ch);
            // An embedded quote char is doubled
            if ch == quote {
                f.dst.push(quote);
            }
        }
        f.dst.push(quote);
    }
}
