pub mod handlers;
pub mod path;
pub mod server;

pub use handlers::{Reply, RequestInfo, dispatch};
pub use server::{router, serve, serve_with_shutdown};
