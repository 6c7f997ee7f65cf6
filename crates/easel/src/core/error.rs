use std::{fmt, io, result::Result as StdResult};

use thiserror::Error;

use crate::{NodeId, geom::Axis};

/// Result type for easel operations.
pub type Result<T> = StdResult<T, Error>;

/// A container could not fit its children on one axis.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct LayoutConstraint {
    /// Axis on which layout failed.
    pub axis: Axis,
    /// Name of the container node.
    pub container: String,
    /// Space available after margins and spacing.
    pub available: u32,
    /// Each child's name and minimum size along the axis.
    pub children: Vec<(String, u32)>,
}

impl fmt::Display for LayoutConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: u64 = self.children.iter().map(|(_, m)| u64::from(*m)).sum();
        write!(
            f,
            "{}: {} space {} < {} required by",
            self.container,
            self.axis.name(),
            self.available,
            total
        )?;
        for (i, (name, min)) in self.children.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{name}={min}")?;
        }
        Ok(())
    }
}

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("layout: {0}")]
    /// Children's combined minimum exceeds the available space.
    Layout(LayoutConstraint),
    #[error("config: {0}")]
    /// Unknown or malformed setting.
    Config(String),
    #[error("invariant violated: {0}")]
    /// Programming error: fixed-size resize, focus or viewport misuse.
    Invariant(String),
    #[error("node not found: {0:?}")]
    /// A node ID that is not in the arena.
    NodeNotFound(NodeId),
    #[error("widget already borrowed: {0:?}")]
    /// A widget was accessed while its slot was taken.
    ReentrantWidget(NodeId),
    #[error("unexpected widget type: {0}")]
    /// A typed widget access failed to downcast.
    WidgetType(String),
    #[error("backend: {0}")]
    /// Platform backend failure.
    Backend(String),
    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}
