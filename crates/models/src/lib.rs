pub mod errors;
pub mod db;
pub mod user;
pub mod salon;
pub mod stylist;
pub mod salon_service;
pub mod appointment;
pub mod appointment_service;
pub mod review;
pub mod blog;
pub mod promotion;
pub mod coupon;
pub mod notification;
pub mod static_page;
pub mod faq;

#[cfg(test)]
mod tests;
