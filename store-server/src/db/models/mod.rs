//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod user;

// Catalog
pub mod product;

// Shopping
pub mod cart;
pub mod order;
pub mod review;
pub mod wishlist;

// Re-exports
pub use cart::{Cart, CartItem};
pub use order::{
    Order, OrderItem, OrderPaymentUpdate, OrderStatus, OrderStatusUpdate, PaymentStatus,
};
pub use product::{
    Product, ProductCreate, ProductImage, ProductInventory, ProductPrice, ProductUpdate,
    ReviewStats, compute_review_stats,
};
pub use review::{Review, ReviewCreate, ReviewStatus, ReviewStatusUpdate};
pub use user::{ROLE_ADMIN, ROLE_USER, User, UserCreate, UserResponse};
pub use wishlist::Wishlist;
