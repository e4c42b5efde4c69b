//! Pure data structures shared by every component: catalog products, orders and the
//! session user. Everything here (de)serializes with the backend's camelCase wire format.

pub mod ids;
pub mod order;
pub mod product;
pub mod user;

pub use ids::*;
pub use order::*;
pub use product::*;
pub use user::*;
