//! Integration tests for Linkhound
//!
//! These tests use wiremock to stand in for the remote APIs and exercise each
//! crawl end-to-end, reports included.

mod drive_tests;
mod fetcher_tests;
mod wiki_tests;
