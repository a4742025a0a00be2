//! List and search parameters.
//!
//! Each type renders itself as query pairs; adapters translate names where
//! their backend differs.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// Sort options for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
    Newest,
    Position,
}

impl SortOption {
    /// Wire value, `field` or `-field` for descending.
    pub fn as_query(&self) -> &'static str {
        match self {
            SortOption::Relevance => "relevance",
            SortOption::PriceAsc => "price",
            SortOption::PriceDesc => "-price",
            SortOption::NameAsc => "name",
            SortOption::Newest => "-created_at",
            SortOption::Position => "position",
        }
    }
}

/// Generic paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    pub page: i64,
    pub per_page: i64,
}

impl ListParams {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ]
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self::new(1, 24)
    }
}

/// Product listing filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductListParams {
    pub paging: ListParams,
    pub category_id: Option<CategoryId>,
    pub tags: Vec<String>,
    /// Minimum price in minor units.
    pub min_price: Option<i64>,
    /// Maximum price in minor units.
    pub max_price: Option<i64>,
    pub in_stock_only: bool,
    pub sort: SortOption,
}

impl ProductListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_pagination(mut self, page: i64, per_page: i64) -> Self {
        self.paging = ListParams::new(page, per_page);
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_price_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn in_stock(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = self.paging.to_query();
        if let Some(category) = &self.category_id {
            query.push(("category_id".to_string(), category.to_string()));
        }
        if !self.tags.is_empty() {
            query.push(("tags".to_string(), self.tags.join(",")));
        }
        if let Some(min) = self.min_price {
            query.push(("min_price".to_string(), min.to_string()));
        }
        if let Some(max) = self.max_price {
            query.push(("max_price".to_string(), max.to_string()));
        }
        if self.in_stock_only {
            query.push(("in_stock".to_string(), "1".to_string()));
        }
        if self.sort != SortOption::Relevance {
            query.push(("sort".to_string(), self.sort.as_query().to_string()));
        }
        query
    }
}

/// Free-text product search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchParams {
    pub query: String,
    pub filters: ProductListParams,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: ProductListParams::default(),
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("q".to_string(), self.query.clone())];
        query.extend(self.filters.to_query());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
        query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_list_params_clamp() {
        let params = ListParams::new(0, 500);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn test_product_list_query() {
        let params = ProductListParams::new()
            .with_category("rings")
            .with_pagination(2, 12)
            .with_sort(SortOption::PriceDesc)
            .in_stock();
        let query = params.to_query();

        assert_eq!(value(&query, "page"), Some("2"));
        assert_eq!(value(&query, "per_page"), Some("12"));
        assert_eq!(value(&query, "category_id"), Some("rings"));
        assert_eq!(value(&query, "sort"), Some("-price"));
        assert_eq!(value(&query, "in_stock"), Some("1"));
        assert_eq!(value(&query, "min_price"), None);
    }

    #[test]
    fn test_search_query_leads_with_text() {
        let query = SearchParams::new("diamond").to_query();
        assert_eq!(query[0], ("q".to_string(), "diamond".to_string()));
        assert_eq!(value(&query, "sort"), None);
    }
}
