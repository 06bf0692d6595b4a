//! An in-memory data store speaking RESP.
//!
//! - Typed values per key: strings, lists, sets, sorted sets and hashes,
//!   with optional expiry
//! - MULTI/EXEC/DISCARD transactions applied as one uninterrupted batch
//! - Publish/subscribe over named channels
//! - Pipelined requests over TCP
//!
//! All command execution goes through one [`engine::Engine`], which gives
//! every command from every connection a single total order. The engine can
//! be driven over TCP ([`server::RedisServer`]) or in process
//! ([`client::Client`]).

pub mod broker;
pub mod client;
pub mod command_utils;
pub mod commands;
pub mod connection;
pub mod engine;
pub mod input;
pub mod key_value_store;
pub mod logging;
pub mod resp;
pub mod server;
pub mod services;
pub mod session;
