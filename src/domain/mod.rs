pub mod coupon;
pub mod product;
