pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::ownership;
pub use domain::principal;
pub use domain::resource;
pub use domain::session;
pub use outbound::repositories;
