// Library for tests to access modules

pub mod config;
pub mod engine;
pub mod ingest;
pub mod maintenance_worker;
pub mod models;
pub mod poll;
pub mod report;
pub mod routes;
pub mod sample_repo;
