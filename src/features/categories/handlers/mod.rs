pub mod admin_category_handler;
pub mod category_handler;
