use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::{RecipeApi, SearchRequest};
use crate::error::RecipeError;
use crate::model::{RecipeDetail, RecipeId, RecipeSummary, ResultPage};

/// What a [`MockApi`] was asked for
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Search(SearchRequest),
    Popular { number: u32, offset: u32 },
    FetchById(RecipeId),
}

/// Scripted backend: answers calls from a queue and records every call
#[derive(Default)]
pub(crate) struct MockApi {
    pages: Mutex<VecDeque<Result<ResultPage, RecipeError>>>,
    details: Mutex<VecDeque<Result<RecipeDetail, RecipeError>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: Result<ResultPage, RecipeError>) {
        self.pages.lock().push_back(page);
    }

    pub fn push_detail(&self, detail: Result<RecipeDetail, RecipeError>) {
        self.details.lock().push_back(detail);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn next_page(&self) -> Result<ResultPage, RecipeError> {
        self.pages
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RecipeError::UpstreamError("no scripted page".to_string())))
    }
}

/// A page of `count` recipes with ids starting at `first_id`
pub(crate) fn page_of(first_id: u64, count: u64) -> ResultPage {
    ResultPage {
        total_results: 100,
        results: (first_id..first_id + count)
            .map(|n| {
                RecipeSummary::new(
                    RecipeId::new(n).unwrap(),
                    format!("Recipe {}", n),
                    format!("https://img.spoonacular.com/recipes/{}-312x231.jpg", n),
                )
            })
            .collect(),
    }
}

#[async_trait]
impl RecipeApi for MockApi {
    fn backend_name(&self) -> &str {
        "mock"
    }

    async fn search(&self, request: &SearchRequest) -> Result<ResultPage, RecipeError> {
        self.calls.lock().push(Call::Search(request.clone()));
        self.next_page()
    }

    async fn popular(&self, number: u32, offset: u32) -> Result<ResultPage, RecipeError> {
        self.calls.lock().push(Call::Popular { number, offset });
        self.next_page()
    }

    async fn fetch_by_id(&self, id: RecipeId) -> Result<RecipeDetail, RecipeError> {
        self.calls.lock().push(Call::FetchById(id));
        self.details
            .lock()
            .pop_front()
            .unwrap_or(Err(RecipeError::NotFoundError(id)))
    }
}
