use super::{Row, RowStream};

/// The result of executing one statement.
#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, as a stream of rows
    Values(RowStream),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn rows(rows: impl Into<RowStream>) -> Self {
        Self {
            rows: Rows::Values(rows.into()),
        }
    }

    pub fn empty() -> Self {
        Self {
            rows: Rows::Values(RowStream::default()),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    /// The affected-row count, treating a row stream as its length.
    pub async fn into_count(self) -> crate::Result<u64> {
        match self {
            Self::Count(count) => Ok(count),
            Self::Values(rows) => Ok(rows.collect().await?.len() as u64),
        }
    }

    #[track_caller]
    pub fn into_values(self) -> RowStream {
        match self {
            Self::Values(rows) => rows,
            Self::Count(count) => panic!("expected rows, got count={count}"),
        }
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        Self::Values(rows.into())
    }
}
