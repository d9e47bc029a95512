pub mod category;
pub mod record;
pub mod sales;
