//! `SizeController`: cached size, capacity mode and assertion helpers.

use crate::config::{AssertMessages, SizingConfig};
use crate::error::{LinkError, Result};
use core::cell::Cell;
use core::fmt;

/// Maximum number of nodes a structure may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxSize {
    /// Fixed capacity.
    Bounded(usize),
    /// No limit (∞).
    Unbounded,
}

/// Capacity mode derived from [`MaxSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeMode {
    /// Finite `max_size`.
    Fixed,
    /// `max_size` is ∞.
    Dynamic,
}

impl MaxSize {
    /// The capacity mode this maximum implies.
    pub const fn mode(self) -> SizeMode {
        match self {
            Self::Bounded(_) => SizeMode::Fixed,
            Self::Unbounded => SizeMode::Dynamic,
        }
    }

    /// Returns `true` if `size` has reached this maximum.
    pub const fn is_reached_by(self, size: usize) -> bool {
        match self {
            Self::Bounded(max) => size >= max,
            Self::Unbounded => false,
        }
    }

    /// The maximum as `f64`, with `Unbounded` mapping to infinity.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Bounded(max) => max as f64,
            Self::Unbounded => f64::INFINITY,
        }
    }
}

impl From<usize> for MaxSize {
    fn from(max: usize) -> Self {
        Self::Bounded(max)
    }
}

impl From<Option<usize>> for MaxSize {
    fn from(max: Option<usize>) -> Self {
        max.map_or(Self::Unbounded, Self::Bounded)
    }
}

impl TryFrom<f64> for MaxSize {
    type Error = LinkError;

    /// `NaN` and negative values are rejected; `+∞` selects dynamic mode.
    fn try_from(value: f64) -> Result<Self> {
        if value.is_nan() {
            return Err(LinkError::Capacity("max size must be a number".into()));
        }
        if value < 0.0 {
            return Err(LinkError::Capacity(format!("max size must not be negative, got {value}")));
        }
        if value.is_infinite() {
            return Ok(Self::Unbounded);
        }
        Ok(Self::Bounded(value as usize))
    }
}

impl fmt::Display for MaxSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(max) => write!(f, "{max}"),
            Self::Unbounded => f.write_str("∞"),
        }
    }
}

/// Tracks the size of a structure and enforces its capacity.
///
/// The size itself is owned by the structure's id index; the controller only
/// caches it. Every mutation must call [`SizeController::invalidate`].
#[derive(Debug, Clone)]
pub struct SizeController {
    cached: Cell<Option<usize>>,
    max: MaxSize,
    messages: AssertMessages,
}

impl SizeController {
    /// Creates a controller from its configuration.
    pub fn new(config: &SizingConfig) -> Self {
        Self {
            cached: Cell::new(None),
            max: config.max_size.into(),
            messages: config.assert_messages.clone(),
        }
    }

    /// Returns the cached size, recomputing it when stale or when `force` is set.
    pub fn get(&self, force: bool, recompute: impl FnOnce() -> usize) -> usize {
        match self.cached.get() {
            Some(size) if !force => size,
            _ => {
                let size = recompute();
                self.cached.set(Some(size));
                size
            }
        }
    }

    /// Marks the cached size stale.
    #[inline]
    pub fn invalidate(&self) {
        self.cached.set(None);
    }

    /// Returns `true` if a size is currently cached.
    pub fn is_cached(&self) -> bool {
        self.cached.get().is_some()
    }

    /// The configured maximum.
    pub fn max_size(&self) -> MaxSize {
        self.max
    }

    /// The capacity mode.
    pub fn mode(&self) -> SizeMode {
        self.max.mode()
    }

    /// Changes the maximum.
    ///
    /// # Errors
    /// Returns [`LinkError::Capacity`] if `max` is below `current`.
    pub fn set_max_size(&mut self, max: MaxSize, current: usize) -> Result<()> {
        if let MaxSize::Bounded(n) = max {
            if n < current {
                return Err(LinkError::Capacity(format!(
                    "max size {n} is below the current size {current}"
                )));
            }
        }
        self.max = max;
        Ok(())
    }

    /// Remaining room, `Unbounded` in dynamic mode.
    pub fn capacity(&self, size: usize) -> MaxSize {
        match self.max {
            MaxSize::Bounded(max) => MaxSize::Bounded(max.saturating_sub(size)),
            MaxSize::Unbounded => MaxSize::Unbounded,
        }
    }

    /// Returns `true` if no further node fits.
    pub fn is_full(&self, size: usize) -> bool {
        self.max.is_reached_by(size)
    }

    /// Returns `true` if `size` is zero.
    pub fn is_empty(&self, size: usize) -> bool {
        size == 0
    }

    /// Returns `true` if `index` addresses an existing position.
    pub fn is_in_bounds(&self, index: usize, size: usize) -> bool {
        index < size
    }

    /// # Errors
    /// Returns [`LinkError::Capacity`] with the `overflow` message when full.
    pub fn assert_not_full(&self, size: usize) -> Result<()> {
        if self.is_full(size) {
            return Err(LinkError::Capacity(self.messages.overflow().to_owned()));
        }
        Ok(())
    }

    /// # Errors
    /// Returns [`LinkError::Empty`] with the `empty` message when empty.
    pub fn assert_not_empty(&self, size: usize) -> Result<()> {
        if self.is_empty(size) {
            return Err(LinkError::Empty(self.messages.empty().to_owned()));
        }
        Ok(())
    }

    /// Asserting guard for removal paths.
    ///
    /// # Errors
    /// Returns [`LinkError::Underflow`] with the `underflow` message when empty.
    pub fn assert_can_remove(&self, size: usize) -> Result<()> {
        if self.is_empty(size) {
            return Err(LinkError::Underflow(self.messages.underflow().to_owned()));
        }
        Ok(())
    }

    /// # Errors
    /// Returns [`LinkError::Bounds`] with the `in_bounds` message when `index >= size`.
    pub fn assert_in_bounds(&self, index: usize, size: usize) -> Result<()> {
        if !self.is_in_bounds(index, size) {
            return Err(LinkError::Bounds {
                index,
                size,
                message: self.messages.in_bounds().to_owned(),
            });
        }
        Ok(())
    }
}
