pub mod error;
pub mod jwt;
pub mod password;
pub mod service;

pub use error::{AuthError, Result};
pub use jwt::{hash_token, Claims, JwtService, TokenType};
pub use password::PasswordHasher;
pub use service::{AuthResponse, IdentityService, SignInRequest};
