use std::str::FromStr;

use serde::Serialize;

/// 1-indexed page of `limit` jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

/// The `(skip, limit)` slice of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn window(&self) -> Window {
        Window {
            skip: (self.page.max(1) as u64 - 1) * self.limit as u64,
            limit: self.limit as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// `salaryMax` descending, missing counts as 0.
    SalaryHigh,
    /// `salaryMin` ascending, missing counts as 0.
    SalaryLow,
    /// Search rank, falls back to newest without a search.
    Relevance,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "salary-high" => Ok(SortOrder::SalaryHigh),
            "salary-low" => Ok(SortOrder::SalaryLow),
            "relevance" => Ok(SortOrder::Relevance),
            _ => Err(
                "Sort must be one of newest, oldest, salary-high, salary-low, relevance".into(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_jobs: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total_jobs: u64) -> Self {
        let limit = request.limit.max(1) as u64;
        Pagination {
            current_page: request.page,
            total_pages: total_jobs.div_ceil(limit),
            total_jobs,
            has_next: (request.page as u64) * limit < total_jobs,
            has_prev: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_skips_previous_pages() {
        assert_eq!(
            PageRequest { page: 1, limit: 12 }.window(),
            Window { skip: 0, limit: 12 }
        );
        assert_eq!(
            PageRequest { page: 4, limit: 10 }.window(),
            Window { skip: 30, limit: 10 }
        );
    }

    #[test]
    fn pagination_rounds_pages_up() {
        let p = Pagination::new(PageRequest { page: 1, limit: 12 }, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);

        let last = Pagination::new(PageRequest { page: 3, limit: 12 }, 25);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn pagination_past_the_end() {
        let p = Pagination::new(PageRequest { page: 9, limit: 10 }, 25);
        assert_eq!(p.current_page, 9);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn pagination_empty() {
        let p = Pagination::new(PageRequest { page: 1, limit: 12 }, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let p = Pagination::new(PageRequest { page: 2, limit: 5 }, 11);
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "currentPage": 2,
                "totalPages": 3,
                "totalJobs": 11,
                "hasNext": true,
                "hasPrev": true
            })
        );
    }

    #[test]
    fn sort_order_parses_frontend_values() {
        assert_eq!("salary-high".parse::<SortOrder>(), Ok(SortOrder::SalaryHigh));
        assert_eq!("oldest".parse::<SortOrder>(), Ok(SortOrder::Oldest));
        assert!("cheapest".parse::<SortOrder>().is_err());
    }
}
