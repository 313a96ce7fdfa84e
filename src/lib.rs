//! OASIS API Gateway Library
//!
//! HTTP controller layer of the OASIS platform API. Controllers delegate to
//! managers through a shared executor that wraps every result in a uniform
//! envelope and, when the operator allows it, answers with test data while
//! live data is unavailable.

pub mod app;
pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod handlers;
pub mod managers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;
