//! Middleware and extractors for the OASIS API gateway

mod avatar;
mod tracing;

pub use avatar::{AvatarId, AVATAR_ID_HEADER};
pub use tracing::{request_tracing, REQUEST_ID_HEADER};
