pub mod balances;
pub mod common;
pub mod health;
pub mod profiles;
pub mod routes;

pub use balances::post_balances;
pub use health::health;
pub use profiles::get_profile;
pub use routes::post_routes;
