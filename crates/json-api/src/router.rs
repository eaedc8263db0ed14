//! App Router

use salvo::Router;

use crate::{carts, products, search};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::handlers::index::handler)
                .post(products::handlers::create::handler)
                .push(Router::with_path("brands").get(products::handlers::brands::handler))
                .push(Router::with_path("types").get(products::handlers::types::handler))
                .push(Router::with_path("filters").get(products::handlers::filters::handler))
                .push(
                    Router::with_path("{product}")
                        .get(products::handlers::get::handler)
                        .put(products::handlers::update::handler)
                        .delete(products::handlers::delete::handler),
                ),
        )
        .push(
            Router::with_path("search")
                .push(Router::with_path("products").get(search::handlers::products::handler))
                .push(
                    Router::with_path("suggestions").get(search::handlers::suggestions::handler),
                )
                .push(
                    Router::with_path("price-ranges").get(search::handlers::price_ranges::handler),
                ),
        )
        .push(
            Router::with_path("carts").push(
                Router::with_path("{cart}")
                    .get(carts::handlers::get::handler)
                    .post(carts::handlers::replace::handler)
                    .delete(carts::handlers::delete::handler)
                    .push(
                        Router::with_path("items")
                            .post(carts::handlers::add_item::handler)
                            .push(
                                Router::with_path("{product}")
                                    .put(carts::handlers::update_item::handler)
                                    .delete(carts::handlers::remove_item::handler),
                            ),
                    )
                    .push(Router::with_path("discount").post(carts::handlers::discount::handler)),
            ),
        )
}
