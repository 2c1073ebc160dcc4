/// `LIMIT` and `OFFSET` for a query.
///
/// Either part may stand alone; the serializer handles dialects (MySQL)
/// that cannot spell a bare `OFFSET`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Limit {
    pub count: Option<u64>,
    pub offset: Option<u64>,
}

impl Limit {
    pub fn count(count: u64) -> Self {
        Self {
            count: Some(count),
            offset: None,
        }
    }

    pub fn offset(offset: u64) -> Self {
        Self {
            count: None,
            offset: Some(offset),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_none() && self.offset.is_none()
    }
}
