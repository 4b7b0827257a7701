//! Splitting one logical experiment definition into N physical output files.
//!
//! Each [`WriteSpec`] selects a subtree of the working document, optionally
//! grafts it into a freshly built destination tree, and serializes the result
//! with consistent indentation. Missing source subtrees are soft failures: a
//! template is not expected to match every spec in the configuration.

use crate::models::{BatchError, BatchResult};
use crate::services::document::{Element, ExpDef};
use quick_xml::Writer as XmlWriter;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// A tag-creation spec for building a fresh destination tree. A `path` of
/// `None` makes the tag the root of that tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSpec {
    pub path: Option<String>,
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl TagSpec {
    pub fn root(tag: impl Into<String>) -> Self {
        Self {
            path: None,
            tag: tag.into(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn child(path: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            tag: tag.into(),
            attrs: BTreeMap::new(),
        }
    }
}

/// One physical output file derived from the working document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteSpec {
    /// Parent path of the source subtree in the working document.
    pub src_parent: String,
    /// Tag of the source subtree under `src_parent`.
    pub src_tag: String,
    /// Rename the copied subtree's root.
    #[serde(default)]
    pub rename_to: Option<String>,
    /// Path, within the freshly built tree, the source subtree is grafted
    /// under. `None` means the source subtree alone becomes the output root.
    #[serde(default)]
    pub dest_parent: Option<String>,
    /// Tag-creation specs forming the fresh destination tree (exactly one
    /// root). Only consulted when `dest_parent` is set.
    #[serde(default)]
    pub create_tags: Option<Vec<TagSpec>>,
    /// Paths, resolved in the *original* working document, of additional
    /// subtrees appended under the grafted source subtree.
    #[serde(default)]
    pub child_grafts: Option<Vec<String>>,
    /// Suffix appended to the base output path for this file.
    #[serde(default)]
    pub opath_leaf: Option<String>,
}

/// Ordered list of write specs; one logical document may be split across all
/// of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriterConfig {
    pub specs: Vec<WriteSpec>,
}

impl WriterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spec: WriteSpec) {
        self.specs.push(spec);
    }
}

pub struct Writer;

impl Writer {
    /// Write every spec in list order. Returns the paths actually written;
    /// specs whose source subtree is absent are skipped with a warning.
    pub fn write(
        expdef: &ExpDef,
        config: &WriterConfig,
        base_opath: &Path,
    ) -> BatchResult<Vec<std::path::PathBuf>> {
        let mut written = Vec::new();
        for spec in &config.specs {
            let src_path = format!("{}/{}", spec.src_parent, spec.src_tag);
            let Some(src) = expdef.root().find(&src_path) else {
                warn!(path = %src_path, "write: source subtree not in working document, skipping");
                continue;
            };

            let mut subtree = src.clone();
            if let Some(name) = &spec.rename_to {
                subtree.tag = name.clone();
            }
            let grafted_tag = subtree.tag.clone();

            let mut doc = match &spec.dest_parent {
                Some(dest) => {
                    let mut fresh = build_dest_tree(spec.create_tags.as_deref().unwrap_or(&[]))?;
                    let parent = fresh.find_mut(dest).ok_or_else(|| {
                        BatchError::WriteConfig(format!(
                            "dest parent '{dest}' not present in created tree"
                        ))
                    })?;
                    parent.children.push(subtree);
                    fresh
                }
                None => subtree,
            };

            if let Some(grafts) = &spec.child_grafts {
                let attach_path = match &spec.dest_parent {
                    Some(dest) => format!("{dest}/{grafted_tag}"),
                    None => ".".to_string(),
                };
                for graft in grafts {
                    let Some(extra) = expdef.root().find(graft) else {
                        warn!(path = %graft, "write: graft subtree not in working document, skipping");
                        continue;
                    };
                    let extra = extra.clone();
                    let attach = doc.find_mut(&attach_path).ok_or_else(|| {
                        BatchError::WriteConfig(format!(
                            "graft attach point '{attach_path}' not present in output tree"
                        ))
                    })?;
                    attach.children.push(extra);
                }
            }

            let opath = match &spec.opath_leaf {
                Some(leaf) => std::path::PathBuf::from(format!("{}{leaf}", base_opath.display())),
                None => base_opath.to_path_buf(),
            };
            std::fs::write(&opath, to_xml_string(&doc)?)?;
            written.push(opath);
        }
        Ok(written)
    }
}

/// Build the fresh destination tree from tag-creation specs: the first spec
/// must declare the single root, later specs resolve against what has been
/// built so far.
fn build_dest_tree(specs: &[TagSpec]) -> BatchResult<Element> {
    let mut iter = specs.iter();
    let root_spec = iter
        .next()
        .ok_or_else(|| BatchError::WriteConfig("dest parent set but no create tags".to_string()))?;
    if root_spec.path.is_some() {
        return Err(BatchError::WriteConfig(
            "first create tag must be the destination root".to_string(),
        ));
    }
    let mut root = Element::new(root_spec.tag.clone(), root_spec.attrs.clone());
    for spec in iter {
        let path = spec.path.as_deref().ok_or_else(|| {
            BatchError::WriteConfig("multiple roots in create tags".to_string())
        })?;
        let parent = root.find_mut(path).ok_or_else(|| {
            BatchError::WriteConfig(format!("create tag parent '{path}' not yet created"))
        })?;
        parent
            .children
            .push(Element::new(spec.tag.clone(), spec.attrs.clone()));
    }
    Ok(root)
}

/// Serialize a tree with 2-space indentation.
pub fn to_xml_string(root: &Element) -> BatchResult<String> {
    let mut writer = XmlWriter::new_with_indent(Vec::new(), b' ', 2);
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| BatchError::XmlParse(format!("non-utf8 output: {e}")))
}

fn write_element(writer: &mut XmlWriter<Vec<u8>>, element: &Element) -> BatchResult<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| BatchError::XmlParse(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| BatchError::XmlParse(e.to_string()))?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| BatchError::XmlParse(e.to_string()))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(|e| BatchError::XmlParse(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::document::parse_document;

    const TEMPLATE: &str = r#"
        <argos-configuration>
          <framework>
            <experiment length="100"/>
          </framework>
          <controllers>
            <params alpha="0.5"/>
          </controllers>
          <arena size="10, 10, 2"/>
        </argos-configuration>
    "#;

    #[test]
    fn test_roundtrip_serialization() {
        let root = parse_document(TEMPLATE).unwrap();
        let xml = to_xml_string(&root).unwrap();
        let reparsed = parse_document(&xml).unwrap();
        assert_eq!(root, reparsed);
    }

    #[test]
    fn test_split_write() {
        let def = ExpDef::from_str(TEMPLATE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("exp0_run0");

        let mut config = WriterConfig::new();
        config.add(WriteSpec {
            src_parent: ".//argos-configuration".to_string(),
            src_tag: "arena".to_string(),
            opath_leaf: Some("_arena.xml".to_string()),
            ..WriteSpec::default()
        });
        config.add(WriteSpec {
            src_parent: ".//controllers".to_string(),
            src_tag: "params".to_string(),
            dest_parent: Some("launch".to_string()),
            create_tags: Some(vec![TagSpec::root("launch")]),
            child_grafts: Some(vec![".//framework/experiment".to_string()]),
            opath_leaf: Some("_params.xml".to_string()),
            ..WriteSpec::default()
        });

        let written = Writer::write(&def, &config, &base).unwrap();
        assert_eq!(written.len(), 2);

        let arena = parse_document(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(arena.tag, "arena");

        let params = parse_document(&std::fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(params.tag, "launch");
        let grafted = params.find(".//launch/params").unwrap();
        assert!(grafted.has_child("experiment"));
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let def = ExpDef::from_str(TEMPLATE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("exp0_run0");

        let mut config = WriterConfig::new();
        config.add(WriteSpec {
            src_parent: ".//argos-configuration".to_string(),
            src_tag: "loop_functions".to_string(),
            opath_leaf: Some("_loops.xml".to_string()),
            ..WriteSpec::default()
        });

        let written = Writer::write(&def, &config, &base).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_rename_subtree_root() {
        let def = ExpDef::from_str(TEMPLATE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("out.xml");

        let mut config = WriterConfig::new();
        config.add(WriteSpec {
            src_parent: ".//controllers".to_string(),
            src_tag: "params".to_string(),
            rename_to: Some("parameters".to_string()),
            ..WriteSpec::default()
        });

        let written = Writer::write(&def, &config, &base).unwrap();
        let out = parse_document(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(out.tag, "parameters");
        assert_eq!(out.attrs.get("alpha").map(String::as_str), Some("0.5"));
    }
}
