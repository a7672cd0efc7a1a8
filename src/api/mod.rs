mod factory;
#[cfg(test)]
pub(crate) mod mock;
mod proxy;
mod spoonacular;
mod wire;

pub use factory::ApiFactory;
pub use proxy::ProxyClient;
pub use spoonacular::SpoonacularClient;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::RecipeError;
use crate::model::{RecipeDetail, RecipeId, ResultPage};

/// Search filters understood by the recipe service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterName {
    Diet,
    Cuisine,
    Intolerances,
    MealType,
}

impl FilterName {
    /// Query parameter name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterName::Diet => "diet",
            FilterName::Cuisine => "cuisine",
            FilterName::Intolerances => "intolerances",
            FilterName::MealType => "type",
        }
    }

    pub fn all() -> [FilterName; 4] {
        [
            FilterName::Diet,
            FilterName::Cuisine,
            FilterName::Intolerances,
            FilterName::MealType,
        ]
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterName {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterName::all()
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecipeError::ValidationError(format!("Unknown filter: {}", s)))
    }
}

/// Sort orders the controller asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most popular first
    Popularity,
}

/// A single search call, validated before it reaches a backend
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub filters: BTreeMap<FilterName, String>,
    pub number: u32,
    pub offset: u32,
    pub sort: Option<SortOrder>,
}

impl SearchRequest {
    /// Request for the popular listing shown when nothing has been searched yet
    pub fn popular(number: u32, offset: u32) -> Self {
        SearchRequest {
            number,
            offset,
            sort: Some(SortOrder::Popularity),
            ..Default::default()
        }
    }

    /// Parameters shared by every backend, in wire form
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            params.push(("query", query.to_string()));
        }
        for (name, value) in &self.filters {
            params.push((name.as_str(), value.clone()));
        }
        params.push(("number", self.number.to_string()));
        params.push(("offset", self.offset.to_string()));
        if let Some(SortOrder::Popularity) = self.sort {
            params.push(("sort", "popularity".to_string()));
            params.push(("sortDirection", "desc".to_string()));
        }
        params
    }
}

/// Unified trait for recipe service backends
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Get the backend name (e.g., "spoonacular", "proxy")
    fn backend_name(&self) -> &str;

    /// Search recipes by keyword and/or filters
    async fn search(&self, request: &SearchRequest) -> Result<ResultPage, RecipeError>;

    /// Most popular recipes, one page at a time
    async fn popular(&self, number: u32, offset: u32) -> Result<ResultPage, RecipeError> {
        self.search(&SearchRequest::popular(number, offset)).await
    }

    /// Full recipe record, including nutrition when the backend is configured for it
    async fn fetch_by_id(&self, id: RecipeId) -> Result<RecipeDetail, RecipeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_name_parse() {
        assert_eq!("diet".parse::<FilterName>().unwrap(), FilterName::Diet);
        assert_eq!("Type".parse::<FilterName>().unwrap(), FilterName::MealType);
        assert!("colour".parse::<FilterName>().is_err());
    }

    #[test]
    fn test_popular_request_params() {
        let params = SearchRequest::popular(9, 18).params();
        assert_eq!(
            params,
            vec![
                ("number", "9".to_string()),
                ("offset", "18".to_string()),
                ("sort", "popularity".to_string()),
                ("sortDirection", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_request_params_skip_empty_query() {
        let mut request = SearchRequest {
            query: Some(String::new()),
            number: 9,
            ..Default::default()
        };
        request
            .filters
            .insert(FilterName::Cuisine, "italian".to_string());

        let params = request.params();
        assert!(!params.iter().any(|(k, _)| *k == "query"));
        assert!(params.contains(&("cuisine", "italian".to_string())));
    }
}
