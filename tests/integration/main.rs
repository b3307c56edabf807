//! Integration tests for Article Harvester
//!
//! These tests use wiremock to serve article pages and run the full
//! fetcher → queue → writer pipeline end-to-end against a temporary output
//! directory.

mod config_tests;
mod pipeline_tests;
