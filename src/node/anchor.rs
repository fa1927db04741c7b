//! `AnchorManager`: named, non-owning references to nodes with a fixed role.

use super::NodeHandle;
use crate::config::{HEAD, TAIL};
use crate::error::{LinkError, Result};

/// A resolved anchor name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorKey(pub(crate) usize);

/// Tracks a fixed set of anchor slots (e.g. `head`, `tail`), one of them primary.
#[derive(Debug, Clone)]
pub struct AnchorManager {
    names: Box<[String]>,
    slots: Box<[Option<NodeHandle>]>,
    primary: usize,
}

impl AnchorManager {
    /// Creates the manager with every anchor absent.
    ///
    /// The primary anchor defaults to the first key.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `keys` is empty or `primary` is not among them.
    pub fn new(keys: &[String], primary: Option<&str>) -> Result<Self> {
        if keys.is_empty() {
            return Err(LinkError::config("anchor key list is empty"));
        }
        let primary = match primary {
            Some(name) => position(keys, name)?,
            None => 0,
        };
        Ok(Self {
            names: keys.into(),
            slots: vec![None; keys.len()].into_boxed_slice(),
            primary,
        })
    }

    /// `head` and `tail`, with `head` primary.
    pub(crate) fn canonical() -> Self {
        Self {
            names: vec![HEAD.to_owned(), TAIL.to_owned()].into_boxed_slice(),
            slots: vec![None; 2].into_boxed_slice(),
            primary: 0,
        }
    }

    /// Resolves an anchor name.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `name` is not a configured anchor.
    pub fn resolve(&self, name: &str) -> Result<AnchorKey> {
        position(&self.names, name).map(AnchorKey)
    }

    /// Sets the named anchor.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `name` is not a configured anchor.
    pub(crate) fn set(&mut self, name: &str, node: Option<NodeHandle>) -> Result<()> {
        let key = self.resolve(name)?;
        self.set_key(key, node);
        Ok(())
    }

    #[inline]
    pub(crate) fn set_key(&mut self, key: AnchorKey, node: Option<NodeHandle>) {
        self.slots[key.0] = node;
    }

    /// Reads the named anchor.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `name` is not a configured anchor.
    pub fn get(&self, name: &str) -> Result<Option<NodeHandle>> {
        self.resolve(name).map(|key| self.get_key(key))
    }

    /// Reads a resolved anchor.
    #[inline]
    pub fn get_key(&self, key: AnchorKey) -> Option<NodeHandle> {
        self.slots[key.0]
    }

    /// Sets every anchor to absent.
    pub(crate) fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Returns `true` if the named anchor currently references `node`.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `name` is not a configured anchor.
    pub fn is_anchor(&self, name: &str, node: NodeHandle) -> Result<bool> {
        Ok(self.get(name)? == Some(node))
    }

    /// Name of the primary anchor.
    pub fn primary_key(&self) -> &str {
        &self.names[self.primary]
    }

    /// The primary anchor as a resolved key.
    pub fn primary(&self) -> AnchorKey {
        AnchorKey(self.primary)
    }

    /// Changes the primary anchor.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `name` is not a configured anchor.
    pub fn set_primary_key(&mut self, name: &str) -> Result<()> {
        self.primary = position(&self.names, name)?;
        Ok(())
    }

    /// Iterates `(name, anchor)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<NodeHandle>)> {
        self.names.iter().map(String::as_str).zip(self.slots.iter().copied())
    }
}

fn position(keys: &[String], name: &str) -> Result<usize> {
    keys.iter()
        .position(|k| k == name)
        .ok_or_else(|| LinkError::config(format!("unknown anchor key `{name}`")))
}
