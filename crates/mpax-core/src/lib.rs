#![forbid(unsafe_code)]
#![deny(clippy::all)]

pub mod acceptor;
pub mod config;
pub mod effect;
pub mod id;
pub mod ins;
pub mod msg;
pub mod node;
pub mod proposer;
pub mod req;
pub mod state;
pub mod store;
pub mod window;
