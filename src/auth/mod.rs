// Caller identity supplied to handlers by the bearer-token middleware
pub use middleware::require_caller;
pub use token::TokenConfig;
pub use types::{Caller, CallerClaims, Role};

mod middleware;
mod token;
mod types;
