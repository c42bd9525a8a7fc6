//! Domain logic, kept free of HTTP and persistence concerns.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod recipe;
