//! VASD daemon: radar datagrams in, display commands out.
//!
//! Each datagram a speed radar emits is parsed, recorded as a numbered
//! transaction, shown on the matching lane's roadside display, and
//! cleared again after a speed-dependent hold. The daemon is the runtime
//! half of the system: the rules live in `vasd-core`, the wire formats
//! in `vasd-proto`, and everything here is sockets, timers, files and
//! task plumbing.
//!
//! # Components
//!
//! - [`config`]: JSON configuration file, written with defaults on first run
//! - [`registry`]: immutable lane-to-display endpoint map
//! - [`ingest`]: UDP receive loop, one handler task per datagram
//! - [`pipeline`]: the parse → record → persist → dispatch chain
//! - [`timers`]: per-lane clear timers with cancel-and-replace semantics
//! - [`sender`]: best-effort, timeout-bounded display sends
//! - [`snapshot`]: the JSON artifact the presentation API reads
//! - [`store`]: redb-backed transaction store
//! - [`manual`]: interactive injection path sharing the network chain

pub mod config;
pub mod error;
pub mod ingest;
pub mod manual;
pub mod pipeline;
pub mod registry;
pub mod sender;
pub mod snapshot;
pub mod store;
pub mod timers;

pub use config::Config;
pub use error::ServerError;
pub use pipeline::Pipeline;
pub use registry::LaneRegistry;
pub use timers::LaneTimerTable;
