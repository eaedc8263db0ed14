//! Product Types Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Distinct product types
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TypesResponse {
    /// The list of types, ordered
    pub types: Vec<String>,
}

/// Product Types Handler
#[endpoint(tags("products"), summary = "List Types")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<TypesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let types = state
        .app
        .products
        .types()
        .await
        .or_500("failed to fetch types")?;

    Ok(Json(TypesResponse { types }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::products::MockProductsService;

    use crate::test_helpers::products_service;

    use super::*;

    #[tokio::test]
    async fn test_types_returns_ordered_list() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_types()
            .once()
            .return_once(|| Ok(vec!["Accessories".to_owned(), "Footwear".to_owned()]));

        let response: TypesResponse = TestClient::get("http://example.com/products/types")
            .send(&products_service(
                repo,
                Router::with_path("products/types").get(handler),
            ))
            .await
            .take_json()
            .await?;

        assert_eq!(response.types, vec!["Accessories", "Footwear"]);

        Ok(())
    }
}
