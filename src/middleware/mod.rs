pub mod cart_key;
