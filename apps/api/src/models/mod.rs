pub mod review;
pub mod user;
