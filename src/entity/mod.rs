pub mod audit_logs;
pub mod categories;
pub mod coupons;
pub mod product_images;
pub mod product_variants;
pub mod products;
pub mod reviews;
pub mod sea_orm_active_enums;
pub mod settings;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use coupons::Entity as Coupons;
pub use product_images::Entity as ProductImages;
pub use product_variants::Entity as ProductVariants;
pub use products::Entity as Products;
pub use reviews::Entity as Reviews;
pub use settings::Entity as Settings;
pub use users::Entity as Users;
