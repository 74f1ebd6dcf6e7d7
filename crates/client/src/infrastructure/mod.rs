//! Infrastructure: ports and their adapters.

pub mod cache;
pub mod clock;
pub mod http;
pub mod ports;
pub mod storage;

pub use cache::ExpiringSlot;
pub use clock::SystemClock;
pub use http::ReqwestTransport;
pub use ports::{
    storage_keys, ClockPort, HttpMethod, HttpPort, HttpRequest, HttpResponse, StorageError,
    StoragePort, TransportError,
};
pub use storage::{FileStorage, MemoryStorage};
