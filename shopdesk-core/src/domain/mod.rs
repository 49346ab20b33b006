//! Core domain entities
//!
//! Records mirrored from the remote shop API plus the local session.
//! Pure data structures with form validation; no I/O.

mod cart;
mod deletion;
mod product;
pub mod result;
mod session;
mod user;

pub use cart::{AddCartRequest, Cart, CartLine, CartProductItem, CartsResponse, UpdateCartRequest};
pub use deletion::DeleteResponse;
pub use product::{
    category_label, Dimensions, NewProduct, Product, ProductField, ProductForm, ProductPatch,
    ProductsResponse, Review, REQUIRED_FIELDS_MESSAGE,
};
pub use session::{AuthToken, Session};
pub use user::{LoginRequest, LoginResponse, TokenPair, User};
