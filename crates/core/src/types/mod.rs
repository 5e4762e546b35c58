//! Domain types matching the backend's JSON wire format.

mod id;
mod product;
mod store;

pub use id::{Ean, StoreId};
pub use product::{Category, Price, Product, Stock, Timing};
pub use store::{Address, Brand, PostalCode, Store};
