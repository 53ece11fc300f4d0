//! Offload local files to Cloudinary.
//!
//! Uploads a file to a configured Cloudinary account and removes the local
//! copy afterwards, on both the success and failure paths, reporting the
//! outcome as a typed result.

pub mod cloudinary;
pub mod error;
pub mod models;
pub mod offload;

pub use error::{Error, Result};
