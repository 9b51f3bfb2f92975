//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → CORS → Trace → Timeout → BodyLimit → Handler.
//! Rate limiting and IP reputation are deliberately absent from this
//! service's scope.

pub mod cors;

pub use cors::create_cors_layer;
