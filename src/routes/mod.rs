//! Route definitions for the OASIS API gateway

mod avatar;
mod clan;
mod settings;

pub use avatar::avatar_routes;
pub use clan::clan_routes;
pub use settings::settings_routes;
