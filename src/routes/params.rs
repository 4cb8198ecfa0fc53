use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::models::OrderStatus;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Pages past this are clamped; the offset stays far below `i64::MAX`.
pub const MAX_PAGE: i64 = 100_000;

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MedicineSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

/// Catalog filters; page fields sit next to the filters because
/// `serde(flatten)` breaks numeric query parsing.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct MedicineQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-insensitive match over name, generic name, company and category.
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<MedicineSort>,
}

impl MedicineQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
}

impl PaymentListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct SalesReportQuery {
    pub status: Option<OrderStatus>,
    /// Inclusive lower bound on the order date (RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the order date (RFC 3339).
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct CartPatchQuery {
    /// `?decrement` or `?decrement=true` lowers the quantity by one.
    pub decrement: Option<String>,
}

impl CartPatchQuery {
    pub fn delta(&self) -> i32 {
        match self.decrement.as_deref() {
            None | Some("false") | Some("0") => 1,
            Some(_) => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_page_and_size() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(p.normalize(), (3, 10, 20));

        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
    }

    #[test]
    fn huge_page_is_clamped_instead_of_overflowing() {
        let p = Pagination {
            page: Some(i64::MAX),
            per_page: Some(20),
        };
        let (page, per_page, offset) = p.normalize();
        assert_eq!(page, MAX_PAGE);
        assert_eq!(per_page, 20);
        assert_eq!(offset, (MAX_PAGE - 1) * 20);

        let p = Pagination {
            page: Some(i64::MIN),
            per_page: Some(i64::MAX),
        };
        assert_eq!(p.normalize(), (1, 100, 0));
    }

    #[test]
    fn decrement_flag_variants() {
        let q = |v: Option<&str>| CartPatchQuery {
            decrement: v.map(str::to_string),
        };
        assert_eq!(q(None).delta(), 1);
        assert_eq!(q(Some("false")).delta(), 1);
        assert_eq!(q(Some("")).delta(), -1);
        assert_eq!(q(Some("true")).delta(), -1);
    }

    #[test]
    fn blank_search_and_category_are_ignored() {
        let q = MedicineQuery {
            search: Some("   ".into()),
            category: Some(" Tablet ".into()),
            ..Default::default()
        };
        assert_eq!(q.search_term(), None);
        assert_eq!(q.category_name(), Some("Tablet"));
    }
}
