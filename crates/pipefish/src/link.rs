//! Links and the link registry.
//!
//! A link connects a source item to a destination item, possibly on another
//! block. Two links are duplicates iff both endpoints match exactly;
//! duplicates are rejected at creation and the registry is left unchanged.
//! Besides the stored links the registry carries at most one *temp link* (an
//! in-progress connection being dragged by the editor) which routes alongside
//! the committed ones but is never persisted.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::block::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LinkId(u32);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

/// One end of a link: a block plus the item offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Endpoint {
    pub block: BlockId,
    pub item: u8,
}

impl Endpoint {
    pub fn new(block: BlockId, item: u8) -> Self {
        Self { block, item }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub source: Endpoint,
    pub dest: Endpoint,
}

impl Link {
    pub fn new(source: Endpoint, dest: Endpoint) -> Self {
        Self { source, dest }
    }

    pub fn touches(&self, block: BlockId) -> bool {
        self.source.block == block || self.dest.block == block
    }
}

/// Key for a routed link: either a stored registry entry or the temp link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LinkRef {
    Stored(LinkId),
    Temp,
}

#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    links: IndexMap<LinkId, Link>,
    temp: Option<Link>,
    next_id: u32,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a link and returns its id, or `None` when an identical link
    /// (same endpoints) already exists.
    pub fn add(&mut self, link: Link) -> Option<LinkId> {
        if self.links.values().any(|existing| *existing == link) {
            return None;
        }
        let id = LinkId(self.next_id);
        self.next_id += 1;
        self.links.insert(id, link);
        Some(id)
    }

    pub fn remove(&mut self, id: LinkId) -> Option<Link> {
        self.links.shift_remove(&id)
    }

    /// Drops every link touching `block`, including a temp link.
    pub fn remove_links_for_block(&mut self, block: BlockId) {
        self.links.retain(|_, link| !link.touches(block));
        if self.temp.is_some_and(|link| link.touches(block)) {
            self.temp = None;
        }
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.temp = None;
    }

    /// Installs the in-progress link, unless an identical stored link exists.
    pub fn set_temp_link(&mut self, link: Link) -> bool {
        if self.links.values().any(|existing| *existing == link) {
            return false;
        }
        self.temp = Some(link);
        true
    }

    pub fn temp_link(&self) -> Option<&Link> {
        self.temp.as_ref()
    }

    pub fn clear_temp_link(&mut self) -> Option<Link> {
        self.temp.take()
    }

    pub fn get(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// Number of stored links (the temp link is not counted).
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Stored links in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkId, &Link)> {
        self.links.iter().map(|(&id, link)| (id, link))
    }

    /// Stored links in insertion order, then the temp link if present.
    pub fn iter_all(&self) -> impl Iterator<Item = (LinkRef, &Link)> {
        self.links
            .iter()
            .map(|(&id, link)| (LinkRef::Stored(id), link))
            .chain(self.temp.iter().map(|link| (LinkRef::Temp, link)))
    }
}
