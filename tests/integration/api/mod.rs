//! API integration tests
//!
//! Integration tests for all API endpoints

mod conversations_test;
mod messages_test;
