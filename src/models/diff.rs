//! Value objects describing single mutations to an XML experiment definition,
//! plus the set/list containers they are batched in.
//!
//! `AttrChangeSet` is a mathematical set: application order does not matter
//! because each entry names a distinct `(path, attr)` target. `TagAddList` and
//! `TagRmList` are ordered: adding a child requires its parent to already
//! exist, and removal order can matter when targets overlap.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{BitOr, BitOrAssign};

/// Retarget one existing attribute of the element at `path` to `value`.
///
/// Values are always carried as strings; numeric payloads are formatted by the
/// producer. Two changes with equal `(path, attr, value)` are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttrChange {
    pub path: String,
    pub attr: String,
    pub value: String,
}

impl AttrChange {
    pub fn new(
        path: impl Into<String>,
        attr: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            attr: attr.into(),
            value: value.into(),
        }
    }
}

/// Unordered, deduplicated collection of [`AttrChange`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrChangeSet(BTreeSet<AttrChange>);

impl AttrChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, chg: AttrChange) {
        self.0.insert(chg);
    }

    pub fn contains(&self, chg: &AttrChange) -> bool {
        self.0.contains(chg)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrChange> {
        self.0.iter()
    }
}

impl BitOr for AttrChangeSet {
    type Output = AttrChangeSet;

    fn bitor(mut self, rhs: AttrChangeSet) -> AttrChangeSet {
        self |= rhs;
        self
    }
}

impl BitOrAssign for AttrChangeSet {
    fn bitor_assign(&mut self, rhs: AttrChangeSet) {
        self.0.extend(rhs.0);
    }
}

impl FromIterator<AttrChange> for AttrChangeSet {
    fn from_iter<I: IntoIterator<Item = AttrChange>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for AttrChangeSet {
    type Item = AttrChange;
    type IntoIter = <BTreeSet<AttrChange> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttrChangeSet {
    type Item = &'a AttrChange;
    type IntoIter = <&'a BTreeSet<AttrChange> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Remove the first child named `tag` under the element at `path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagRm {
    pub path: String,
    pub tag: String,
}

impl TagRm {
    pub fn new(path: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tag: tag.into(),
        }
    }
}

/// Ordered list of [`TagRm`]; removal order is preserved exactly as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRmList(Vec<TagRm>);

impl TagRmList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, rm: TagRm) {
        self.0.push(rm);
    }

    pub fn extend(&mut self, other: TagRmList) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagRm> {
        self.0.iter()
    }
}

impl FromIterator<TagRm> for TagRmList {
    fn from_iter<I: IntoIterator<Item = TagRm>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Add a new child named `tag` under the element at `path`.
///
/// A `path` of `None` means the added tag becomes the document root. With
/// `allow_duplicates == false` the add is idempotent: if a child with this tag
/// already exists under the parent, applying the add is a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAdd {
    pub path: Option<String>,
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub allow_duplicates: bool,
}

impl TagAdd {
    pub fn new(
        path: impl Into<String>,
        tag: impl Into<String>,
        attrs: BTreeMap<String, String>,
    ) -> Self {
        Self {
            path: Some(path.into()),
            tag: tag.into(),
            attrs,
            allow_duplicates: false,
        }
    }

    pub fn new_with_duplicates(
        path: impl Into<String>,
        tag: impl Into<String>,
        attrs: BTreeMap<String, String>,
    ) -> Self {
        Self {
            path: Some(path.into()),
            tag: tag.into(),
            attrs,
            allow_duplicates: true,
        }
    }

    /// The added tag becomes the document root.
    pub fn new_root(tag: impl Into<String>) -> Self {
        Self {
            path: None,
            tag: tag.into(),
            attrs: BTreeMap::new(),
            allow_duplicates: false,
        }
    }
}

/// Ordered list of [`TagAdd`]; dependency order (parents before children) must
/// be respected by the author and is preserved exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAddList(Vec<TagAdd>);

impl TagAddList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, add: TagAdd) {
        self.0.push(add);
    }

    /// Insert at the front, ahead of all previously queued adds. Used when an
    /// add must occur before the rest of the list, e.g. ensuring a root tag
    /// exists before children are queued against it elsewhere.
    pub fn prepend(&mut self, add: TagAdd) {
        self.0.insert(0, add);
    }

    pub fn extend(&mut self, other: TagAddList) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagAdd> {
        self.0.iter()
    }
}

impl FromIterator<TagAdd> for TagAddList {
    fn from_iter<I: IntoIterator<Item = TagAdd>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_change_set_dedup() {
        let mut set = AttrChangeSet::new();
        set.add(AttrChange::new(".//arena", "size", "10, 10, 2"));
        set.add(AttrChange::new(".//arena", "size", "10, 10, 2"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_attr_change_set_union() {
        let a: AttrChangeSet = [AttrChange::new(".//arena", "size", "10, 10, 2")]
            .into_iter()
            .collect();
        let b: AttrChangeSet = [
            AttrChange::new(".//arena", "size", "10, 10, 2"),
            AttrChange::new(".//entity", "quantity", "16"),
        ]
        .into_iter()
        .collect();

        let merged = a | b;
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_tag_add_list_prepend() {
        let mut list = TagAddList::new();
        list.append(TagAdd::new(".//params", "child", BTreeMap::new()));
        list.prepend(TagAdd::new_root("params"));

        let tags: Vec<&str> = list.iter().map(|a| a.tag.as_str()).collect();
        assert_eq!(tags, vec!["params", "child"]);
    }

    #[test]
    fn test_tag_rm_list_order() {
        let mut list = TagRmList::new();
        list.append(TagRm::new(".//a", "b"));
        list.append(TagRm::new(".//a", "c"));
        let mut other = TagRmList::new();
        other.append(TagRm::new(".//a", "d"));
        list.extend(other);

        let tags: Vec<&str> = list.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["b", "c", "d"]);
    }
}
