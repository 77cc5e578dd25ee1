pub mod admin_service;
pub mod auth_service;
pub mod category_service;
pub mod coupon_service;
pub mod payment_service;
pub mod product_service;
pub mod review_service;
pub mod setting_service;
pub mod upload_service;
