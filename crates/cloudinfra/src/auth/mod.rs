//! Bearer-token acquisition.

mod authenticator;
mod token;

pub use authenticator::Authenticator;
pub use token::Token;
