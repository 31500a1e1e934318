//! Stable path identities for cells.
//!
//! A path is the list of child indices leading from the model root to a cell. Paths survive
//! handle renumbering and are totally ordered, which makes them usable both as map keys and as
//! sort keys ("model order").

use std::fmt;
use std::str::FromStr;

pub const PATH_SEPARATOR: char = '.';

/// Child-index path from the model root. The root itself has the empty path.
///
/// Ordering compares components numerically from the front; a proper prefix sorts first, so a
/// container always precedes its descendants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CellPath(Vec<usize>);

impl CellPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    pub fn is_prefix_of(&self, other: &CellPath) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for CellPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_SEPARATOR}")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cell path segment: {segment:?}")]
pub struct ParseCellPathError {
    pub segment: String,
}

impl FromStr for CellPath {
    type Err = ParseCellPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split(PATH_SEPARATOR)
            .map(|seg| {
                seg.parse::<usize>().map_err(|_| ParseCellPathError {
                    segment: seg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}
