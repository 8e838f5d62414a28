//! Search filters and `searchAssetBeanObjects` parameter layout
//!
//! The server takes filters as six parallel columns (types, sub-types 1,
//! sub-types 2, values 1-3). Here a filter is one typed row; rows are turned
//! into columns only when the params are built.

use serde_json::{json, Value};

use crate::protocol::{category_type, notify_type, query_type, search_type, sort_order};

/// One search criterion
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    pub search_type: i32,
    pub sub_type_1: i32,
    pub sub_type_2: i32,
    pub value_1: Value,
    pub value_2: Value,
    pub value_3: Value,
}

impl SearchFilter {
    pub fn new(search_type: i32, sub_type_1: i32, value_1: impl Into<Value>) -> Self {
        Self {
            search_type,
            sub_type_1,
            sub_type_2: 0,
            value_1: value_1.into(),
            value_2: json!(""),
            value_3: json!(""),
        }
    }

    pub fn with_value_2(mut self, value: impl Into<Value>) -> Self {
        self.value_2 = value.into();
        self
    }

    /// Exclude assets whose metadata `field` equals `value`
    pub fn exclude_metadata(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(search_type::METADATA, query_type::NOT, field.into()).with_value_2(value.into())
    }
}

/// Ordered set of filters, combined by the query's match type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters(Vec<SearchFilter>);

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: SearchFilter) -> Self {
        self.0.push(filter);
        self
    }

    /// Keyword match plus thesaurus expansion of the same keyword
    pub fn keyword(keyword: &str) -> Self {
        Self::new()
            .with(SearchFilter::new(
                search_type::KEYWORDS,
                query_type::AND_FRAG,
                keyword,
            ))
            .with(SearchFilter::new(
                search_type::THESAURUS,
                query_type::OR,
                keyword,
            ))
    }

    /// Assets filed directly in the category at `path` (e.g. `Artworks/Artists M-Q`)
    pub fn category(path: &str) -> Self {
        Self::new().with(SearchFilter::new(
            search_type::CATEGORY,
            category_type::ONLY,
            path,
        ))
    }

    /// Assets in a cart
    pub fn cart(cart_id: impl Into<Value>) -> Self {
        Self::new().with(SearchFilter::new(
            search_type::CART,
            query_type::AND_FRAG,
            cart_id,
        ))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The six parallel columns, in protocol order
    pub fn columns(&self) -> [Value; 6] {
        [
            self.column(|f| json!(f.search_type)),
            self.column(|f| json!(f.sub_type_1)),
            self.column(|f| json!(f.sub_type_2)),
            self.column(|f| f.value_1.clone()),
            self.column(|f| f.value_2.clone()),
            self.column(|f| f.value_3.clone()),
        ]
    }

    fn column(&self, field: impl Fn(&SearchFilter) -> Value) -> Value {
        Value::Array(self.0.iter().map(field).collect())
    }
}

/// Index of the first result on `page` (1-based); pages below 1 count as 1
///
/// Saturates at `u32::MAX` instead of overflowing on huge page numbers.
///
/// ```text
/// page  start  (page_size = 10)
///    1      1
///    2     11
///    3     21
/// ```
pub fn start_index(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1)
        .saturating_mul(page_size)
        .saturating_add(1)
}

/// A paginated `searchAssetBeanObjects` call, sorted by name descending
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub sort_field: String,
    pub sort_order: i32,
    pub match_type: i32,
    pub filters: SearchFilters,
    pub start_index: u32,
    pub count: u32,
}

impl SearchQuery {
    pub fn new(filters: SearchFilters, page: u32, page_size: u32) -> Self {
        Self {
            sort_field: "name".to_string(),
            sort_order: sort_order::DESCENDING,
            match_type: query_type::AND,
            filters,
            start_index: start_index(page, page_size),
            count: page_size,
        }
    }

    /// Positional params
    ///
    /// `[sort field, sort order, match type, <6 filter columns>, saved search
    /// name, notify type, record stats, start index, count]`
    pub fn to_params(&self) -> Vec<Value> {
        let mut params = vec![
            json!(self.sort_field),
            json!(self.sort_order),
            json!(self.match_type),
        ];
        params.extend(self.filters.columns());
        params.extend([
            Value::Null,
            json!(notify_type::NONE),
            json!(0),
            json!(self.start_index),
            json!(self.count),
        ]);
        params
    }
}
