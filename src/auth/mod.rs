//! Authentication and Authorization
//!
//! - [`JwtService`]: signed access tokens
//! - [`SessionService`]: login / refresh-token rotation / logout
//! - [`Role`]: bitmask role dominance
//! - middleware: cookie authentication and role checks

pub mod jwt;
pub mod middleware;
pub mod roles;
pub mod session;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, require_auth, require_role};
pub use roles::Role;
pub use session::{AuthenticatedSession, SessionService};
