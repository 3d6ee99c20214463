//! Integration tests

mod health_check;
mod subscriptions;
