use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddCartItemRequest, UpdateCartItemRequest},
        menu::{CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
        options::{CreateOptionRequest, OptionList, UpdateOptionRequest},
        orders::{OrderList, UpdateOrderStatusRequest},
    },
    models::{Cart, CartLineItem, MenuItem, MenuOption, Order, OrderLineItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::{cart, health, menu, options, orders, params},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Food Truck API", description = "Menu, cart and order service"),
    paths(
        health::health_check,
        options::list_options,
        options::get_option,
        options::create_option,
        options::update_option,
        options::delete_option,
        menu::list_menu,
        menu::get_menu_item,
        menu::create_menu_item,
        menu::update_menu_item,
        menu::delete_menu_item,
        cart::get_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        cart::clear_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::get_order_by_number,
        orders::pay_order,
        orders::cancel_order,
        orders::update_order_status
    ),
    components(
        schemas(
            MenuOption,
            MenuItem,
            Cart,
            CartLineItem,
            Order,
            OrderLineItem,
            OrderStatus,
            CreateOptionRequest,
            UpdateOptionRequest,
            OptionList,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuList,
            AddCartItemRequest,
            UpdateCartItemRequest,
            UpdateOrderStatusRequest,
            OrderList,
            params::Pagination,
            params::SortOrder,
            params::MenuQuery,
            params::OrderListQuery,
            health::HealthData,
            Meta,
            ApiResponse<MenuOption>,
            ApiResponse<MenuItem>,
            ApiResponse<Cart>,
            ApiResponse<Order>,
            ApiResponse<OrderList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Options", description = "Option catalog endpoints"),
        (name = "Menu", description = "Menu endpoints"),
        (name = "Cart", description = "Cart endpoints, scoped by the x-cart-key header"),
        (name = "Orders", description = "Checkout and order lifecycle endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
