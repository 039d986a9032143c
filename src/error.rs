//! Startup errors
//!
//! The tick never fails. Everything here is raised while building a world or
//! loading its inputs, before the first tick runs.

use thiserror::Error;

use crate::assets::PrototypeId;

#[derive(Debug, Error)]
pub enum WorldError {
    /// The asset provider has no shape for a prototype the world instances.
    #[error("prototype {0:?} has not been loaded")]
    MissingPrototype(PrototypeId),

    /// A prototype was supplied with a zero or negative extent.
    #[error("prototype {0:?} has a degenerate extent")]
    DegeneratePrototype(PrototypeId),

    /// A tuning value is out of range.
    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),

    /// JSON manifest (assets, tuning, settings) failed to parse.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a config file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
