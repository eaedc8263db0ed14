//! Test helpers.

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};

use storefront_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{CartItem, ShoppingCart},
        },
        discounts::{
            MockDiscountService,
            models::{AppliedDiscount, DiscountType},
        },
        products::{
            MockProductsService,
            models::Product,
            search::{Page, SearchSpec},
        },
    },
};

use crate::state::State;

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_search_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();
    products.expect_brands().never();
    products.expect_types().never();
    products.expect_filter_summary().never();
    products.expect_suggestions().never();
    products.expect_price_ranges().never();

    products
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_replace_cart().never();
    carts.expect_delete_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item_quantity().never();
    carts.expect_remove_item().never();
    carts.expect_apply_discount().never();

    carts
}

fn strict_discounts_mock() -> MockDiscountService {
    let mut discounts = MockDiscountService::new();

    discounts.expect_find_code().never();
    discounts.expect_price_discount().never();
    discounts.expect_redeem().never();

    discounts
}

pub(crate) fn state_with_products(products: MockProductsService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        products: Arc::new(products),
        carts: Arc::new(strict_carts_mock()),
        discounts: Arc::new(strict_discounts_mock()),
    }))
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        products: Arc::new(strict_products_mock()),
        carts: Arc::new(carts),
        discounts: Arc::new(strict_discounts_mock()),
    }))
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_products(products)))
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .push(route),
    )
}

pub(crate) fn make_product(id: i64) -> Product {
    Product {
        id,
        name: "Air Max 90".to_owned(),
        description: "Classic running shoe".to_owned(),
        price: Decimal::new(12_000, 2),
        picture_url: "/images/air-max-90.png".to_owned(),
        product_type: "Footwear".to_owned(),
        brand: "Nike".to_owned(),
        quantity_in_stock: 10,
    }
}

pub(crate) fn page_of(items: Vec<Product>, spec: &SearchSpec) -> Page<Product> {
    Page {
        total: items.len() as i64,
        items,
        page_index: spec.page_index,
        page_size: spec.page_size,
    }
}

/// A cart with subtotal 100 across two lines and three units.
pub(crate) fn make_cart(id: &str) -> ShoppingCart {
    let mut cart = ShoppingCart::new(id);

    cart.merge_item(CartItem {
        product_id: 1,
        product_name: "Air Max 90".to_owned(),
        price: Decimal::from(40),
        quantity: 2,
        picture_url: "/images/air-max-90.png".to_owned(),
        brand: "Nike".to_owned(),
        product_type: "Footwear".to_owned(),
    });

    cart.merge_item(CartItem {
        product_id: 2,
        product_name: "Nike Cap".to_owned(),
        price: Decimal::from(20),
        quantity: 1,
        picture_url: "/images/nike-cap.png".to_owned(),
        brand: "Nike".to_owned(),
        product_type: "Accessories".to_owned(),
    });

    cart
}

/// [`make_cart`] with WELCOME10 applied for 10.00 off.
pub(crate) fn make_cart_with_discount(id: &str) -> ShoppingCart {
    let mut cart = make_cart(id);

    cart.discount = Some(AppliedDiscount {
        code: "WELCOME10".to_owned(),
        name: "Welcome discount 10%".to_owned(),
        kind: DiscountType::Percentage,
        value: Decimal::from(10),
        amount: Decimal::new(1000, 2),
    });

    cart
}
