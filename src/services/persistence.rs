//! Incremental persistence of diff collections for cross-stage retrieval.
//!
//! Each write appends exactly one serialized collection to the file; readers
//! replay the whole file record by record until end of input. There is
//! deliberately no length prefix: later pipeline stages do not know in advance
//! how many collections a generation stage recorded.

use crate::models::{AttrChangeSet, BatchResult, TagAddList, TagRmList};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Append one serialized collection to `path`. With `delete == true` the file
/// is removed first, so the file accumulates exactly the writes made since.
pub fn pickle<T: Serialize>(path: &Path, value: &T, delete: bool) -> BatchResult<()> {
    if delete && path.exists() {
        std::fs::remove_file(path)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let record = serde_json::to_string(value)?;
    writeln!(file, "{record}")?;
    Ok(())
}

/// Replay every record in `path`, in append order, until end of input.
pub fn unpickle<T: DeserializeOwned>(path: &Path) -> BatchResult<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

/// Union of every attribute changeset recorded in `path`.
pub fn unpickle_attr_changes(path: &Path) -> BatchResult<AttrChangeSet> {
    let sets: Vec<AttrChangeSet> = unpickle(path)?;
    Ok(sets.into_iter().fold(AttrChangeSet::new(), |acc, s| acc | s))
}

/// Concatenation, in record order, of every tag add list recorded in `path`.
pub fn unpickle_tag_adds(path: &Path) -> BatchResult<TagAddList> {
    let lists: Vec<TagAddList> = unpickle(path)?;
    let mut merged = TagAddList::new();
    for list in lists {
        merged.extend(list);
    }
    Ok(merged)
}

/// Concatenation, in record order, of every tag removal list recorded in
/// `path`.
pub fn unpickle_tag_rms(path: &Path) -> BatchResult<TagRmList> {
    let lists: Vec<TagRmList> = unpickle(path)?;
    let mut merged = TagRmList::new();
    for list in lists {
        merged.extend(list);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttrChange, TagAdd, TagRm};
    use std::collections::BTreeMap;

    #[test]
    fn test_attr_change_roundtrip_across_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exp_def.pkl");

        let first: AttrChangeSet = [AttrChange::new(".//arena", "size", "10, 10, 2")]
            .into_iter()
            .collect();
        let second: AttrChangeSet = [
            AttrChange::new(".//arena/distribute/entity", "quantity", "16"),
            AttrChange::new(".//arena", "size", "10, 10, 2"),
        ]
        .into_iter()
        .collect();

        pickle(&path, &first, false).unwrap();
        pickle(&path, &second, false).unwrap();

        let merged = unpickle_attr_changes(&path).unwrap();
        let expected = first | second;
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_tag_add_roundtrip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exp_def.pkl");

        let mut first = TagAddList::new();
        first.append(TagAdd::new_root("params"));
        first.append(TagAdd::new(".//params", "a", BTreeMap::new()));
        let mut second = TagAddList::new();
        second.append(TagAdd::new(".//params", "b", BTreeMap::new()));

        pickle(&path, &first, false).unwrap();
        pickle(&path, &second, false).unwrap();

        let merged = unpickle_tag_adds(&path).unwrap();
        let tags: Vec<&str> = merged.iter().map(|a| a.tag.as_str()).collect();
        assert_eq!(tags, vec!["params", "a", "b"]);
    }

    #[test]
    fn test_tag_rm_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exp_def.pkl");

        let mut list = TagRmList::new();
        list.append(TagRm::new(".//arena", "distribute"));
        pickle(&path, &list, false).unwrap();

        let merged = unpickle_tag_rms(&path).unwrap();
        assert_eq!(merged, list);
    }

    #[test]
    fn test_delete_resets_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exp_def.pkl");

        let stale: AttrChangeSet = [AttrChange::new(".//old", "x", "1")].into_iter().collect();
        let fresh: AttrChangeSet = [AttrChange::new(".//new", "y", "2")].into_iter().collect();

        pickle(&path, &stale, false).unwrap();
        pickle(&path, &fresh, true).unwrap();

        let merged = unpickle_attr_changes(&path).unwrap();
        assert_eq!(merged, fresh);
    }
}
