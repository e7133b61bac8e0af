//! HTTP surface over the orchestrator.
//!
//! Thin actix-web handlers: decode the request, call one orchestrator
//! operation, encode the response. All pipeline behavior lives in
//! `erpforge-agents`.

pub mod config;
pub mod handlers;
pub mod storage;

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub type DbConnection = Arc<Mutex<Connection>>;
