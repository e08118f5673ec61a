pub mod pagination;
pub mod product;
pub mod inventory;
pub mod sale;
pub mod stock_movement;
pub mod job_order;
pub mod quotation;
