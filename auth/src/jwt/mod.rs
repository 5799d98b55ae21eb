pub mod claims;
pub mod clock;
pub mod errors;
pub mod handler;
pub mod service;

pub use claims::Claims;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use service::TokenClass;
pub use service::TokenService;
pub use service::TokenSettings;
