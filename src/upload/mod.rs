//! Chunked upload reassembly
//!
//! Clients upload a document in ordered chunks, then signal completion; the
//! assembled file is what search reads.

mod store;

pub use store::{UploadError, UploadStore};
