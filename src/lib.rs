// Question-selection and session engine. The terminal front-end lives in the
// binary (main.rs) and talks to this crate only through `session::Renderer`.

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod session;
pub mod store;
