//! Strided index ranges.

use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strided, possibly empty, range of indices `first, first+stride, ...`.
///
/// Subsetted axes keep one of these to remember which indices of the
/// original axis they were taken from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    name: Option<String>,
    first: usize,
    len: usize,
    stride: usize,
}

impl IndexRange {
    /// Range `first..=last` with stride 1.
    pub fn new(first: usize, last: usize) -> GridResult<Self> {
        Self::with_stride(first, last, 1)
    }

    /// Range `first..=last` stepping by `stride`. `last` is rounded down to
    /// the final index actually reached.
    pub fn with_stride(first: usize, last: usize, stride: usize) -> GridResult<Self> {
        if last < first {
            return Err(GridError::invalid_range(format!(
                "last ({}) must be >= first ({})",
                last, first
            )));
        }
        if stride == 0 {
            return Err(GridError::invalid_range("stride must be > 0"));
        }
        Ok(Self {
            name: None,
            first,
            len: (last - first) / stride + 1,
            stride,
        })
    }

    /// A single index.
    pub fn single(index: usize) -> Self {
        Self {
            name: None,
            first: index,
            len: 1,
            stride: 1,
        }
    }

    /// Identity range `0..n`; empty when `n == 0`.
    pub fn make(name: Option<&str>, n: usize) -> Self {
        Self {
            name: name.map(str::to_string),
            first: 0,
            len: n,
            stride: 1,
        }
    }

    /// The empty range.
    pub fn empty() -> Self {
        Self::make(None, 0)
    }

    /// Copy of this range carrying a different name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self.clone()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn first(&self) -> usize {
        self.first
    }

    /// Last index, or `None` for an empty range.
    pub fn last(&self) -> Option<usize> {
        if self.len == 0 {
            None
        } else {
            Some(self.first + (self.len - 1) * self.stride)
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `i`-th index of this range.
    pub fn element(&self, i: usize) -> GridResult<usize> {
        if i >= self.len {
            return Err(GridError::IndexOutOfRange {
                index: i,
                len: self.len,
            });
        }
        Ok(self.first + i * self.stride)
    }

    /// Check if `index` is one of the indices of this range.
    pub fn contains(&self, index: usize) -> bool {
        match self.last() {
            Some(last) => {
                index >= self.first && index <= last && (index - self.first) % self.stride == 0
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |i| self.first + i * self.stride)
    }

    /// Map `sub`, whose indices refer to positions within this range, back
    /// into the index space this range refers to.
    pub fn compose(&self, sub: &IndexRange) -> GridResult<IndexRange> {
        if sub.is_empty() {
            return Ok(IndexRange {
                name: self.name.clone(),
                ..IndexRange::empty()
            });
        }
        // last() is Some for a non-empty range
        let sub_last = sub.first + (sub.len - 1) * sub.stride;
        if sub_last >= self.len {
            return Err(GridError::invalid_range(format!(
                "subset range {} exceeds parent length {}",
                sub, self.len
            )));
        }
        Ok(IndexRange {
            name: self.name.clone().or_else(|| sub.name.clone()),
            first: self.first + sub.first * self.stride,
            len: sub.len,
            stride: self.stride * sub.stride,
        })
    }

    /// Check that every index is below `n`.
    pub fn check_within(&self, n: usize) -> GridResult<()> {
        match self.last() {
            Some(last) if last >= n => Err(GridError::invalid_range(format!(
                "range {} exceeds dimension length {}",
                self, n
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{}=", name)?;
        }
        match self.last() {
            None => write!(f, "EMPTY"),
            Some(last) if self.stride == 1 => write!(f, "{}:{}", self.first, last),
            Some(last) => write!(f, "{}:{}:{}", self.first, last, self.stride),
        }
    }
}

impl<'a> IntoIterator for &'a IndexRange {
    type Item = usize;
    type IntoIter = Box<dyn Iterator<Item = usize> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
