pub mod client;
pub mod proto;
pub mod server;

pub mod factorial;
pub mod storage;

pub mod api;
pub mod services;

pub mod cli;
