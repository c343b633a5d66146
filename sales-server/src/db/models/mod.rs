//! Database Models

// Auth
pub mod user;

// Catalog
pub mod product;

// Sales
pub mod client;
pub mod order;

pub use client::{Client, ClientCreate, ClientUpdate};
pub use order::{LineItem, Order, OrderCreate, OrderStatus, OrderUpdate};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use user::{User, UserInfo, UserLogin, UserRegister};
