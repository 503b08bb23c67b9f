pub mod active_connections;
pub mod entry;
pub mod offline;
pub mod peer_info;
#[allow(clippy::module_inception)]
pub mod registry;

pub use active_connections::ActiveConnections;
pub use entry::PeerRegistryEntry;
pub use offline::OfflinePeersSet;
pub use peer_info::PeerInfo;
pub use registry::PeerRegistry;
