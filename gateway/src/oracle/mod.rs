pub mod client;
pub mod models;

pub use client::{CoinInfoClient, EpochClient, HeadProbe, OracleClient, PeerSampler};
