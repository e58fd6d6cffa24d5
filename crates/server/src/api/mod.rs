pub mod handlers;
pub mod interactions;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
