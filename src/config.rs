//! Construction-time configuration.
//!
//! All configuration types derive `serde` traits so a structure layout can be
//! declared in JSON and loaded with [`StructureConfig::from_json`].

use crate::error::{LinkError, Result};
use serde::{Deserialize, Serialize};

/// Anchor marking the first node.
pub const HEAD: &str = "head";
/// Anchor marking the last node.
pub const TAIL: &str = "tail";
/// Forward pointer.
pub const NEXT: &str = "next";
/// Backward pointer.
pub const PREV: &str = "prev";

/// The structure kind a node manager and structure are configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Singly linked, `tail.next` is absent.
    SinglyLinear,
    /// Singly linked, `tail.next` is `head`.
    SinglyCircular,
    /// Doubly linked, terminal pointers are absent.
    DoublyLinear,
    /// Doubly linked, `head.prev` is `tail` and `tail.next` is `head`.
    DoublyCircular,
    /// Double-ended queue over doubly linked nodes.
    DequeLinear,
    /// Double-ended queue with a wrap edge.
    DequeCircular,
}

impl StructureKind {
    /// Returns `true` if the terminal pointers wrap around.
    pub const fn is_circular(self) -> bool {
        matches!(self, Self::SinglyCircular | Self::DoublyCircular | Self::DequeCircular)
    }

    /// Returns `true` if nodes carry a `prev` pointer.
    pub const fn is_doubly(self) -> bool {
        !matches!(self, Self::SinglyLinear | Self::SinglyCircular)
    }

    /// Pointer keys nodes of this kind carry.
    pub fn pointer_keys(self) -> Vec<String> {
        if self.is_doubly() {
            vec![NEXT.to_owned(), PREV.to_owned()]
        } else {
            vec![NEXT.to_owned()]
        }
    }

    /// Short human-readable name used by `Display` impls.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SinglyLinear => "singly/linear",
            Self::SinglyCircular => "singly/circular",
            Self::DoublyLinear => "doubly/linear",
            Self::DoublyCircular => "doubly/circular",
            Self::DequeLinear => "deque/linear",
            Self::DequeCircular => "deque/circular",
        }
    }
}

/// Node manager configuration: which anchors and pointers exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeManagerConfig {
    /// Structure kind the nodes belong to.
    pub kind: StructureKind,
    /// Named anchor slots, e.g. `head` and `tail`.
    pub anchor_keys: Vec<String>,
    /// Named pointer slots on every node, e.g. `next` and `prev`.
    pub pointer_keys: Vec<String>,
    /// Primary anchor; defaults to the first anchor key.
    #[serde(default)]
    pub primary_anchor_key: Option<String>,
}

impl NodeManagerConfig {
    /// Canonical node manager configuration for `kind`.
    pub fn for_kind(kind: StructureKind) -> Self {
        Self {
            kind,
            anchor_keys: vec![HEAD.to_owned(), TAIL.to_owned()],
            pointer_keys: kind.pointer_keys(),
            primary_anchor_key: Some(HEAD.to_owned()),
        }
    }

    /// Checks key lists are non-empty and duplicate-free and the primary key exists.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] on any violation.
    pub fn validate(&self) -> Result<()> {
        validate_keys("anchor", &self.anchor_keys)?;
        validate_keys("pointer", &self.pointer_keys)?;
        if let Some(primary) = &self.primary_anchor_key {
            if !self.anchor_keys.iter().any(|k| k == primary) {
                return Err(LinkError::config(format!(
                    "primary anchor `{primary}` is not one of the anchor keys"
                )));
            }
        }
        Ok(())
    }
}

fn validate_keys(what: &str, keys: &[String]) -> Result<()> {
    if keys.is_empty() {
        return Err(LinkError::config(format!("{what} key list is empty")));
    }
    for (i, key) in keys.iter().enumerate() {
        if key.is_empty() {
            return Err(LinkError::config(format!("{what} key at position {i} is empty")));
        }
        if keys[..i].contains(key) {
            return Err(LinkError::config(format!("duplicate {what} key `{key}`")));
        }
    }
    Ok(())
}

/// Partial overrides for assertion failure messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertMessages {
    /// Raised when adding to a full structure.
    pub overflow: Option<String>,
    /// Raised when removing from an empty structure through an asserting path.
    pub underflow: Option<String>,
    /// Raised when an asserted index is out of range.
    pub in_bounds: Option<String>,
    /// Raised by `assert_not_empty`.
    pub empty: Option<String>,
}

impl AssertMessages {
    pub(crate) fn overflow(&self) -> &str {
        self.overflow.as_deref().unwrap_or("structure is full")
    }

    pub(crate) fn underflow(&self) -> &str {
        self.underflow.as_deref().unwrap_or("cannot remove from an empty structure")
    }

    pub(crate) fn in_bounds(&self) -> &str {
        self.in_bounds.as_deref().unwrap_or("index out of bounds")
    }

    pub(crate) fn empty(&self) -> &str {
        self.empty.as_deref().unwrap_or("structure is empty")
    }
}

/// Capacity configuration. `max_size: None` selects dynamic mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Fixed capacity, or `None` for unbounded.
    pub max_size: Option<usize>,
    /// Assertion message overrides.
    pub assert_messages: AssertMessages,
}

/// Full structure configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureConfig {
    /// Structure kind.
    pub kind: StructureKind,
    /// Node manager configuration.
    pub node_manager: NodeManagerConfig,
    /// Capacity configuration.
    #[serde(default)]
    pub sizing: SizingConfig,
}

impl StructureConfig {
    /// Canonical configuration for `kind` in dynamic mode.
    pub fn for_kind(kind: StructureKind) -> Self {
        Self {
            kind,
            node_manager: NodeManagerConfig::for_kind(kind),
            sizing: SizingConfig::default(),
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LinkError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets a fixed capacity.
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.sizing.max_size = Some(max_size);
        self
    }

    /// Replaces the assertion messages.
    #[must_use]
    pub fn with_messages(mut self, messages: AssertMessages) -> Self {
        self.sizing.assert_messages = messages;
        self
    }

    /// Validates the node manager configuration and kind agreement.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] on any violation.
    pub fn validate(&self) -> Result<()> {
        if self.node_manager.kind != self.kind {
            return Err(LinkError::config(format!(
                "node manager kind `{}` does not match structure kind `{}`",
                self.node_manager.kind.name(),
                self.kind.name()
            )));
        }
        self.node_manager.validate()
    }

    /// Validates and additionally requires the `head`/`tail` anchors and the
    /// pointer keys of `expected`. The primary anchor must be `head` or `tail`.
    pub(crate) fn validate_for(&self, expected: StructureKind) -> Result<()> {
        if self.kind != expected {
            return Err(LinkError::config(format!(
                "expected a `{}` configuration, found `{}`",
                expected.name(),
                self.kind.name()
            )));
        }
        self.validate()?;
        for anchor in [HEAD, TAIL] {
            if !self.node_manager.anchor_keys.iter().any(|k| k == anchor) {
                return Err(LinkError::config(format!("missing `{anchor}` anchor")));
            }
        }
        if let Some(primary) = &self.node_manager.primary_anchor_key {
            check_primary_anchor(primary)?;
        }
        for pointer in expected.pointer_keys() {
            if !self.node_manager.pointer_keys.contains(&pointer) {
                return Err(LinkError::config(format!("missing `{pointer}` pointer")));
            }
        }
        Ok(())
    }
}

/// Lists and deques only wire `head` and `tail`; any other primary anchor would
/// never be set.
pub(crate) fn check_primary_anchor(name: &str) -> Result<()> {
    if name == HEAD || name == TAIL {
        Ok(())
    } else {
        Err(LinkError::config(format!(
            "primary anchor `{name}` must be `{HEAD}` or `{TAIL}`"
        )))
    }
}
