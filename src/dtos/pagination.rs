use serde::Deserialize;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl PageQuery {
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0) * self.limit.max(0)
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(9, 5), 2);
    }

    #[test]
    fn total_pages_with_zero_limit_is_zero() {
        assert_eq!(total_pages(42, 0), 0);
    }

    #[test]
    fn offset_from_page() {
        let q = PageQuery { page: 1, limit: 10 };
        assert_eq!(q.offset(), 0);
        let q = PageQuery { page: 3, limit: 5 };
        assert_eq!(q.offset(), 10);
        // Page 0 or negative is clamped rather than producing a negative offset.
        let q = PageQuery { page: 0, limit: 10 };
        assert_eq!(q.offset(), 0);
    }
}
