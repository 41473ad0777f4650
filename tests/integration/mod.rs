//! Integration tests
//!
//! Everything except `postgres` runs over the memory store. The PostgreSQL
//! tests skip themselves unless `DATABASE_URL` is set.

mod api;
mod engine_scenarios;
mod realtime;
