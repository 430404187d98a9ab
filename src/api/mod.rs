pub mod handlers;
pub mod response;
mod routes;
#[cfg(test)]
mod tests;

pub use routes::create_router;
