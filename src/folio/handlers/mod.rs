pub mod auth;
pub use self::auth::auth;

pub mod health;
pub use self::health::health;

pub mod pass;
pub use self::pass::{generate_pass, validate_pass};
