use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentEpochResponse {
    pub epoch: i64,
    pub round: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleCurrentEpochResponse {
    pub peers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinInfoResponse {
    #[serde(rename = "latestStore")]
    pub latest_store: LatestStore,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestStore {
    pub metadata: StoreMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreMetadata {
    #[serde(rename = "rootHash")]
    pub root_hash: String,
}
