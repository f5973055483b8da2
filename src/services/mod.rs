pub mod cart_service;
pub mod catalog;
pub mod menu_service;
pub mod numbering;
pub mod option_service;
pub mod order_service;
pub mod order_state;
pub mod pricing;
