//! View components for the application.

pub mod dashboard;
pub mod navbar;
pub mod pairing;

pub use dashboard::Dashboard;
pub use navbar::Navbar;
pub use pairing::Pairing;
