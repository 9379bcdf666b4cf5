pub mod controller;
pub mod error;
pub mod model;
pub mod router;
pub mod service;

pub use error::AccessError;
pub use model::*;
pub use router::{
    init_permissions_router, init_roles_router, init_user_permissions_router,
    init_user_roles_router,
};
