pub mod ownership;
pub mod principal;
pub mod resource;
pub mod session;
