//! Session resolution
//!
//! Sign-in happens in an external credentials provider that issues signed
//! bearer tokens. This module only turns such a token into a stable user id.

mod extractor;
mod session;

pub use extractor::AuthUser;
pub use session::{SessionClaims, UserDirectory};
