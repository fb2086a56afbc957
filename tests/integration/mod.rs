//! Integration tests for the relay endpoints

mod direct;
mod health;
