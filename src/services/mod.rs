pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{
    AuthError, AuthResult, AuthService, AuthUser, MeResult, RefreshResult, UserProfile,
};
pub use auth_service_impl::SeaOrmAuthService;
