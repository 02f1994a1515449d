pub mod access_jwt;
pub mod adapter;
pub mod authority;
pub mod factory;
pub mod token;

pub use access_jwt::AuthService;
pub use adapter::{AuthenticatedIdentity, TokenAdapter, adapt};
pub use authority::{AuthorityError, GrantedAuthority};
pub use factory::build_auth_service;
pub use token::DecodedToken;
