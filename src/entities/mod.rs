pub mod employee;
pub mod incoming_stock_log;
pub mod outgoing_stock_log;
pub mod product;
pub mod shop_profile;
pub mod unit;
pub mod user;
