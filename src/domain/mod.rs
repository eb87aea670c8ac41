//! Domain layer - Core business entities and logic
//!
//! Marketplace concepts independent of storage and transport: users and
//! their role profiles, the catalog, orders with cart pricing, and reviews.

pub mod category;
pub mod identity;
pub mod money;
pub mod order;
pub mod password;
pub mod patch;
pub mod product;
pub mod profile;
pub mod review;
pub mod user;

pub use category::{Category, NewCategory};
pub use identity::{authorize, Identity};
pub use money::Money;
pub use order::{
    CartLine, NewOrder, Order, OrderChanges, OrderDetails, OrderItem, OrderPatch, OrderResponse,
    OrderStatus, OrderStatusHistory, PricedCart, PricedLine,
};
pub use password::Password;
pub use patch::Patch;
pub use product::{NewProduct, Product, ProductChanges, ProductFilter, ProductPatch, ProductResponse};
pub use profile::{
    CustomerProfile, CustomerProfileChanges, CustomerProfilePatch, FarmerProfile,
    FarmerProfileChanges, FarmerProfilePatch, Profile,
};
pub use review::{NewReview, Review};
pub use user::{RegisterUser, SetUserActive, User, UserChanges, UserPatch, UserResponse, UserRole};
