mod common;
mod export_tests;
mod host_tests;
mod schema_tests;
