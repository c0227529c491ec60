//! Session stores for SkinLens clients
//!
//! This crate implements the `SessionStore` trait from `skinlens-core`:
//! - `MemorySessionStore`: process-local, for tests and embedding
//! - `FileSessionStore`: JSON file on disk, so a login survives restarts
//!
//! # Example
//! ```no_run
//! # use std::sync::Arc;
//! # use skinlens_core::Session;
//! # use skinlens_session::FileSessionStore;
//! # async fn example() -> skinlens_core::Result<()> {
//! let store = FileSessionStore::open("~/.skinlens/session.json").await?;
//! let session = Session::new(Arc::new(store));
//! let token = session.access_token().await?;
//! # Ok(())
//! # }
//! ```

mod file_store;
mod memory_store;

pub use file_store::FileSessionStore;
pub use memory_store::MemorySessionStore;
