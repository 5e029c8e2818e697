//! Error Types
//!
//! This module defines the error type returned by every fallible import path.
//!
//! # Overview
//!
//! [`TendonError`] covers the failure modes of building a [`Model`](crate::Model):
//! - Unreadable or incomplete scene snapshots
//! - Texture decoding failures
//! - Skeleton and skinning inconsistencies (bone limit, influence overflow,
//!   animation channels without a target node)
//! - Render backend upload failures
//!
//! Per-frame pose evaluation never fails and has no error channel.
//!
//! ```rust,ignore
//! use tendon::errors::{TendonError, Result};
//!
//! fn load() -> Result<()> {
//!     // Import operations return Result
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for model import.
#[derive(Error, Debug)]
pub enum TendonError {
    // ========================================================================
    // Scene Snapshot Errors
    // ========================================================================
    /// The scene importer flagged the snapshot as incomplete.
    #[error("Scene is incomplete: {0}")]
    IncompleteScene(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// glTF parsing or buffer resolution error.
    #[error("glTF error: {0}")]
    Gltf(String),

    // ========================================================================
    // Texture Errors
    // ========================================================================
    /// Image decoding error.
    #[error("Could not decode texture {path}: {reason}")]
    TextureDecode {
        /// Texture location (file path or `<memory>`)
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// The decoded image has a channel layout the renderer cannot upload.
    #[error("Texture {path} has an unsupported channel count: {channels}")]
    UnsupportedChannelCount {
        /// Texture location (file path or `<memory>`)
        path: PathBuf,
        /// Number of channels reported by the decoder
        channels: u8,
    },

    // ========================================================================
    // Skeleton & Skinning Errors
    // ========================================================================
    /// More unique bones than the bone matrix array can hold.
    #[error("Bone limit exceeded: {count} bones (max {max})")]
    BoneLimitExceeded {
        /// Number of unique bones found so far
        count: usize,
        /// Configured ceiling
        max: usize,
    },

    /// A vertex received more bone weights than it has slots for.
    #[error("Vertex {vertex} of mesh '{mesh}' has more than {max} bone influences")]
    InfluenceOverflow {
        /// Mesh name
        mesh: String,
        /// Vertex index inside the mesh
        vertex: u32,
        /// Influence slots per vertex
        max: usize,
    },

    /// A bone weight or face refers to a vertex the mesh does not have.
    #[error("Mesh '{mesh}' references vertex {vertex} but has only {count} vertices")]
    VertexOutOfRange {
        /// Mesh name
        mesh: String,
        /// Offending vertex index
        vertex: u32,
        /// Vertex count of the mesh
        count: usize,
    },

    /// A mesh references a material slot the scene does not have.
    #[error("Mesh '{mesh}' uses material {index} but the scene has only {count} materials")]
    MaterialOutOfRange {
        /// Mesh name
        mesh: String,
        /// Material index requested by the mesh
        index: usize,
        /// Material count of the scene
        count: usize,
    },

    /// An animation channel targets a node that is not part of the skeleton.
    #[error("Animation channel targets unknown skeleton node '{node}'")]
    UnmatchedChannel {
        /// Node name carried by the channel
        node: String,
    },

    /// A keyframe track is malformed.
    #[error("Invalid {channel} track on node '{node}': {reason}")]
    InvalidTrack {
        /// Target node name
        node: String,
        /// Channel kind (position, rotation, scale)
        channel: &'static str,
        /// What is wrong with it
        reason: String,
    },

    // ========================================================================
    // Backend & Configuration Errors
    // ========================================================================
    /// The render backend refused an upload.
    #[error("Render backend error: {0}")]
    Backend(String),

    /// Import settings could not be parsed.
    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for TendonError {
    fn from(err: gltf::Error) -> Self {
        TendonError::Gltf(err.to_string())
    }
}

/// Alias for `Result<T, TendonError>`.
pub type Result<T> = std::result::Result<T, TendonError>;
