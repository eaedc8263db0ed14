//! Search Suggestions Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::models::{Suggestion, SuggestionKind};

use crate::{extensions::*, state::State};

const DEFAULT_LIMIT: usize = 10;

/// A single search suggestion
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SuggestionResponse {
    /// The suggested text
    pub text: String,

    /// What the suggestion refers to: `product`, `brand` or `type`
    pub kind: String,

    /// How many products back this suggestion
    pub count: i64,
}

impl From<Suggestion> for SuggestionResponse {
    fn from(suggestion: Suggestion) -> Self {
        let kind = match suggestion.kind {
            SuggestionKind::Product => "product",
            SuggestionKind::Brand => "brand",
            SuggestionKind::Type => "type",
        };

        SuggestionResponse {
            text: suggestion.text,
            kind: kind.to_owned(),
            count: suggestion.count,
        }
    }
}

/// Suggestions response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SuggestionsResponse {
    pub suggestions: Vec<SuggestionResponse>,
}

/// Search Suggestions Handler
///
/// Returns product/brand/type suggestions for a query prefix. Queries
/// shorter than two characters yield an empty list.
#[endpoint(tags("search"), summary = "Search Suggestions")]
pub(crate) async fn handler(
    query: QueryParam<String, false>,
    limit: QueryParam<usize, false>,
    depot: &mut Depot,
) -> Result<Json<SuggestionsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let query = query.into_inner().unwrap_or_default();
    let limit = limit.into_inner().unwrap_or(DEFAULT_LIMIT);

    let suggestions = state
        .app
        .products
        .suggestions(&query, limit)
        .await
        .or_500("failed to fetch suggestions")?;

    Ok(Json(SuggestionsResponse {
        suggestions: suggestions.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::products::MockProductsService;

    use crate::test_helpers::products_service;

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("search/suggestions").get(handler))
    }

    #[tokio::test]
    async fn test_suggestions_are_returned_with_kinds() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_suggestions()
            .once()
            .withf(|query, limit| query == "nik" && *limit == 10)
            .return_once(|_, _| {
                Ok(vec![
                    Suggestion {
                        text: "Nike".to_owned(),
                        kind: SuggestionKind::Brand,
                        count: 3,
                    },
                    Suggestion {
                        text: "Nike Cap".to_owned(),
                        kind: SuggestionKind::Product,
                        count: 1,
                    },
                ])
            });

        let response: SuggestionsResponse =
            TestClient::get("http://example.com/search/suggestions?query=nik")
                .send(&make_service(repo))
                .await
                .take_json()
                .await?;

        assert_eq!(response.suggestions.len(), 2);
        assert_eq!(
            response.suggestions.first().map(|s| s.kind.as_str()),
            Some("brand")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_limit_is_forwarded() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_suggestions()
            .once()
            .withf(|_, limit| *limit == 5)
            .return_once(|_, _| Ok(vec![]));

        let res = TestClient::get("http://example.com/search/suggestions?query=nike&limit=5")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
