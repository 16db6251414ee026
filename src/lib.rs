pub mod aggregate;
pub mod classify;
pub mod fetch;
pub mod ingest;
pub mod model;
pub mod output;
pub mod parser;
pub mod routes;
pub mod server;
pub mod store;
