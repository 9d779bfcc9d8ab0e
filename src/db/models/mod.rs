//! Database Models

pub mod location;
pub mod product;
pub mod sale;
pub mod stock;
pub mod user;

pub use location::{Location, LocationCreate};
pub use product::{Category, CategoryAttrs, Product, ProductCreate};
pub use sale::{Sale, SaleItem, SaleLine, SaleStatus};
pub use stock::{Stock, StockLevel};
pub use user::{User, UserCreate};
