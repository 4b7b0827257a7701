//! In-memory XML experiment definition and the diff application protocol.
//!
//! A template is parsed once into an owned [`Element`] tree; all mutation then
//! happens through [`ExpDef`] by applying diff value objects. Application is a
//! fixed three-phase protocol: removals, then additions, then attribute
//! changes. The phase order is a contract, not an implementation detail.

use crate::models::{
    AttrChange, AttrChangeSet, BatchError, BatchResult, TagAdd, TagAddList, TagRm, TagRmList,
};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// One element of the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>, attrs: BTreeMap<String, String>) -> Self {
        Self {
            tag: tag.into(),
            attrs,
            text: None,
            children: Vec::new(),
        }
    }

    /// Resolve a path to an element.
    ///
    /// Supported grammar (the subset the experiment generators issue):
    /// `.` or the empty string resolve to this element; a leading `.//` (or
    /// `//`) makes the first segment a depth-first search over the whole
    /// subtree; otherwise the first segment must match this element itself.
    /// Each later `/`-separated segment matches the first child with that tag.
    /// A segment may carry one `[@attr='value']` predicate.
    pub fn find(&self, path: &str) -> Option<&Element> {
        let idx = self.locate(path)?;
        let mut node = self;
        for i in idx {
            node = &node.children[i];
        }
        Some(node)
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut Element> {
        let idx = self.locate(path)?;
        let mut node = self;
        for i in idx {
            node = &mut node.children[i];
        }
        Some(node)
    }

    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn has_child(&self, tag: &str) -> bool {
        self.child(tag).is_some()
    }

    /// Index chain from `self` to the element at `path`.
    fn locate(&self, path: &str) -> Option<Vec<usize>> {
        let (descend, steps) = parse_path(path);
        if steps.is_empty() {
            return Some(Vec::new());
        }
        if descend {
            self.locate_anywhere(&steps)
        } else if steps[0].matches(self) {
            self.resolve_children(&steps[1..])
        } else {
            None
        }
    }

    /// Document-order search for an anchor matching `steps[0]` from which the
    /// remaining segments resolve as a strict child chain.
    fn locate_anywhere(&self, steps: &[PathStep]) -> Option<Vec<usize>> {
        if steps[0].matches(self) {
            if let Some(idx) = self.resolve_children(&steps[1..]) {
                return Some(idx);
            }
        }
        for (i, child) in self.children.iter().enumerate() {
            if let Some(mut sub) = child.locate_anywhere(steps) {
                let mut idx = vec![i];
                idx.append(&mut sub);
                return Some(idx);
            }
        }
        None
    }

    fn resolve_children(&self, steps: &[PathStep]) -> Option<Vec<usize>> {
        let mut node = self;
        let mut idx = Vec::with_capacity(steps.len());
        for step in steps {
            let pos = node.children.iter().position(|c| step.matches(c))?;
            idx.push(pos);
            node = &node.children[pos];
        }
        Some(idx)
    }
}

#[derive(Debug, Clone)]
struct PathStep {
    tag: String,
    pred: Option<(String, String)>,
}

impl PathStep {
    fn matches(&self, elt: &Element) -> bool {
        if elt.tag != self.tag {
            return false;
        }
        match &self.pred {
            Some((attr, value)) => elt.attrs.get(attr).is_some_and(|v| v == value),
            None => true,
        }
    }
}

fn parse_path(path: &str) -> (bool, Vec<PathStep>) {
    let mut p = path.trim();
    let mut descend = false;

    if let Some(rest) = p.strip_prefix(".//") {
        p = rest;
        descend = true;
    } else if let Some(rest) = p.strip_prefix("//") {
        p = rest;
        descend = true;
    } else if let Some(rest) = p.strip_prefix("./") {
        p = rest;
    } else if p == "." {
        p = "";
    }

    let steps = p
        .split('/')
        .filter(|s| !s.is_empty())
        .map(parse_step)
        .collect();
    (descend, steps)
}

fn parse_step(s: &str) -> PathStep {
    if let Some((tag, rest)) = s.split_once('[') {
        if let Some(pred) = rest.strip_suffix(']').and_then(|p| p.strip_prefix('@')) {
            if let Some((attr, value)) = pred.split_once('=') {
                let value = value.trim_matches('\'').trim_matches('"');
                return PathStep {
                    tag: tag.to_string(),
                    pred: Some((attr.to_string(), value.to_string())),
                };
            }
        }
    }
    PathStep {
        tag: s.to_string(),
        pred: None,
    }
}

/// Parse an XML document into an owned element tree.
pub fn parse_document(xml: &str) -> BatchResult<Element> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let element = element_from_start(e)?;
                stack.push(element);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| BatchError::XmlParse(e.to_string()))?;
                let text = text.trim();
                if !text.is_empty() {
                    if let Some(open) = stack.last_mut() {
                        open.text = Some(text.to_string());
                    }
                }
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| BatchError::XmlParse("unbalanced end tag".to_string()))?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(BatchError::XmlParse(e.to_string())),
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(BatchError::XmlParse("unclosed element".to_string()));
    }
    root.ok_or_else(|| BatchError::XmlParse("document has no root element".to_string()))
}

fn element_from_start(e: &quick_xml::events::BytesStart<'_>) -> BatchResult<Element> {
    let tag = String::from_utf8_lossy(e.name().into_inner()).to_string();
    let mut attrs = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| BatchError::XmlParse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.into_inner()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| BatchError::XmlParse(e.to_string()))?
            .to_string();
        attrs.insert(key, value);
    }
    Ok(Element::new(tag, attrs))
}

fn close_element(
    element: Element,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
) -> BatchResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_some() {
                return Err(BatchError::XmlParse(
                    "multiple root elements".to_string(),
                ));
            }
            *root = Some(element);
        }
    }
    Ok(())
}

/// One experiment's diff bundle, applied remove-then-add-then-change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpDiff {
    pub rms: TagRmList,
    pub adds: TagAddList,
    pub chgs: AttrChangeSet,
}

impl ExpDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chgs(chgs: AttrChangeSet) -> Self {
        Self {
            chgs,
            ..Self::default()
        }
    }
}

/// An experiment definition: the working tree plus an audit trail of the
/// diffs applied to it.
#[derive(Debug, Clone)]
pub struct ExpDef {
    root: Element,
    attr_chgs: AttrChangeSet,
    tag_adds: TagAddList,
}

impl ExpDef {
    pub fn from_str(xml: &str) -> BatchResult<Self> {
        Ok(Self {
            root: parse_document(xml)?,
            attr_chgs: AttrChangeSet::new(),
            tag_adds: TagAddList::new(),
        })
    }

    pub fn from_file(path: &Path) -> BatchResult<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::from_str(&xml)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Attribute changes applied so far (audit trail).
    pub fn applied_attr_changes(&self) -> &AttrChangeSet {
        &self.attr_chgs
    }

    /// Tag additions applied so far (audit trail).
    pub fn applied_tag_adds(&self) -> &TagAddList {
        &self.tag_adds
    }

    pub fn attr_get(&self, path: &str, attr: &str) -> Option<&str> {
        self.root
            .find(path)
            .and_then(|e| e.attrs.get(attr))
            .map(String::as_str)
    }

    pub fn has_tag(&self, path: &str) -> bool {
        self.root.find(path).is_some()
    }

    pub fn has_attr(&self, path: &str, attr: &str) -> bool {
        self.attr_get(path, attr).is_some()
    }

    /// Retarget an existing attribute. Missing element or missing attribute
    /// are soft failures: logged and skipped.
    pub fn attr_change(&mut self, chg: &AttrChange) -> bool {
        let Some(element) = self.root.find_mut(&chg.path) else {
            warn!(path = %chg.path, "attr change: element not found");
            return false;
        };
        let Some(value) = element.attrs.get_mut(&chg.attr) else {
            warn!(path = %chg.path, attr = %chg.attr, "attr change: no such attribute");
            return false;
        };
        *value = chg.value.clone();
        self.attr_chgs.add(chg.clone());
        true
    }

    /// Add a wholly new attribute. Silent on success; attempting to add an
    /// attribute that already exists is a logged no-op.
    pub fn attr_add(&mut self, chg: &AttrChange) -> bool {
        let Some(element) = self.root.find_mut(&chg.path) else {
            warn!(path = %chg.path, "attr add: element not found");
            return false;
        };
        if element.attrs.contains_key(&chg.attr) {
            warn!(path = %chg.path, attr = %chg.attr, "attr add: attribute already present");
            return false;
        }
        element.attrs.insert(chg.attr.clone(), chg.value.clone());
        self.attr_chgs.add(chg.clone());
        true
    }

    /// Remove the first child matching the tag under the parent path. Missing
    /// parent or missing child are soft failures: logged and skipped.
    pub fn tag_remove(&mut self, rm: &TagRm) -> bool {
        let Some(parent) = self.root.find_mut(&rm.path) else {
            warn!(path = %rm.path, "tag remove: parent not found");
            return false;
        };
        let Some(pos) = parent.children.iter().position(|c| c.tag == rm.tag) else {
            warn!(path = %rm.path, tag = %rm.tag, "tag remove: no such child");
            return false;
        };
        parent.children.remove(pos);
        true
    }

    /// Add a child tag. A missing parent path is the one hard failure in the
    /// application protocol. With `allow_duplicates == false` an existing
    /// matching child makes the add an idempotent no-op; otherwise each add
    /// appends a distinct sibling.
    pub fn tag_add(&mut self, add: &TagAdd) -> BatchResult<()> {
        match &add.path {
            None => {
                // The added tag becomes the document root; the previous root
                // is adopted as its child.
                if !add.allow_duplicates && self.root.tag == add.tag {
                    return Ok(());
                }
                let mut new_root = Element::new(add.tag.clone(), add.attrs.clone());
                let old = std::mem::replace(&mut self.root, Element::new("", BTreeMap::new()));
                new_root.children.push(old);
                self.root = new_root;
            }
            Some(path) => {
                let parent = self
                    .root
                    .find_mut(path)
                    .ok_or_else(|| BatchError::MissingParent(path.clone()))?;
                if !add.allow_duplicates && parent.has_child(&add.tag) {
                    return Ok(());
                }
                parent
                    .children
                    .push(Element::new(add.tag.clone(), add.attrs.clone()));
            }
        }
        self.tag_adds.append(add.clone());
        Ok(())
    }

    /// Apply a full diff bundle: removals, then additions, then attribute
    /// changes, each phase in list order. Soft failures are isolated per diff
    /// object; only a tag add with an unresolvable parent aborts.
    pub fn apply(&mut self, diff: &ExpDiff) -> BatchResult<()> {
        for rm in diff.rms.iter() {
            self.tag_remove(rm);
        }
        for add in diff.adds.iter() {
            self.tag_add(add)?;
        }
        for chg in diff.chgs.iter() {
            self.attr_change(chg);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttrChange, TagAdd, TagRm};

    const TEMPLATE: &str = r#"
        <argos-configuration>
          <framework>
            <experiment length="100" ticks_per_second="5"/>
          </framework>
          <arena size="10, 10, 2">
            <distribute>
              <entity quantity="8"/>
            </distribute>
          </arena>
        </argos-configuration>
    "#;

    #[test]
    fn test_parse_and_find() {
        let def = ExpDef::from_str(TEMPLATE).unwrap();
        assert_eq!(def.attr_get(".//arena", "size"), Some("10, 10, 2"));
        assert_eq!(
            def.attr_get(".//arena/distribute/entity", "quantity"),
            Some("8")
        );
        assert!(def.has_tag(".//framework/experiment"));
        assert!(!def.has_tag(".//no_such_tag"));
    }

    #[test]
    fn test_find_with_predicate() {
        let xml = r#"<root><engine id="a" x="1"/><engine id="b" x="2"/></root>"#;
        let def = ExpDef::from_str(xml).unwrap();
        assert_eq!(def.attr_get(".//engine[@id='b']", "x"), Some("2"));
    }

    #[test]
    fn test_attr_change_existing_only() {
        let mut def = ExpDef::from_str(TEMPLATE).unwrap();
        assert!(def.attr_change(&AttrChange::new(".//arena", "size", "20, 20, 2")));
        assert_eq!(def.attr_get(".//arena", "size"), Some("20, 20, 2"));

        // Changes only retarget existing attributes.
        assert!(!def.attr_change(&AttrChange::new(".//arena", "shape", "square")));
        assert!(!def.has_attr(".//arena", "shape"));
    }

    #[test]
    fn test_attr_add_new_only() {
        let mut def = ExpDef::from_str(TEMPLATE).unwrap();
        assert!(def.attr_add(&AttrChange::new(".//arena", "shape", "square")));
        assert_eq!(def.attr_get(".//arena", "shape"), Some("square"));
        assert!(!def.attr_add(&AttrChange::new(".//arena", "size", "1, 1, 1")));
        assert_eq!(def.attr_get(".//arena", "size"), Some("10, 10, 2"));
    }

    #[test]
    fn test_tag_add_idempotent() {
        let mut def = ExpDef::from_str(TEMPLATE).unwrap();
        let add = TagAdd::new(".//arena", "floor", BTreeMap::new());

        def.tag_add(&add).unwrap();
        def.tag_add(&add).unwrap();
        let arena = def.root().find(".//arena").unwrap();
        assert_eq!(arena.children.iter().filter(|c| c.tag == "floor").count(), 1);
    }

    #[test]
    fn test_tag_add_duplicates_allowed() {
        let mut def = ExpDef::from_str(TEMPLATE).unwrap();
        let add = TagAdd::new_with_duplicates(".//arena", "box", BTreeMap::new());

        def.tag_add(&add).unwrap();
        def.tag_add(&add).unwrap();
        let arena = def.root().find(".//arena").unwrap();
        assert_eq!(arena.children.iter().filter(|c| c.tag == "box").count(), 2);
    }

    #[test]
    fn test_tag_add_missing_parent_is_fatal() {
        let mut def = ExpDef::from_str(TEMPLATE).unwrap();
        let add = TagAdd::new(".//nonexistent", "child", BTreeMap::new());
        assert!(def.tag_add(&add).is_err());
    }

    #[test]
    fn test_tag_add_order_sensitivity() {
        // Parent before child succeeds; reversed, the child add fails.
        let mut def = ExpDef::from_str(TEMPLATE).unwrap();
        let parent = TagAdd::new(".//arena", "walls", BTreeMap::new());
        let child = TagAdd::new(".//arena/walls", "wall", BTreeMap::new());

        def.tag_add(&parent).unwrap();
        def.tag_add(&child).unwrap();

        let mut def2 = ExpDef::from_str(TEMPLATE).unwrap();
        assert!(def2.tag_add(&child).is_err());
    }

    #[test]
    fn test_tag_add_new_root() {
        let mut def = ExpDef::from_str("<params/>").unwrap();
        def.tag_add(&TagAdd::new_root("launch")).unwrap();
        assert_eq!(def.root().tag, "launch");
        assert!(def.has_tag(".//launch/params"));

        // Re-rooting under the same tag is idempotent.
        def.tag_add(&TagAdd::new_root("launch")).unwrap();
        assert_eq!(def.root().children.len(), 1);
    }

    #[test]
    fn test_tag_remove_soft_failures() {
        let mut def = ExpDef::from_str(TEMPLATE).unwrap();
        assert!(def.tag_remove(&TagRm::new(".//arena", "distribute")));
        assert!(!def.has_tag(".//arena/distribute"));

        assert!(!def.tag_remove(&TagRm::new(".//arena", "distribute")));
        assert!(!def.tag_remove(&TagRm::new(".//no_such_parent", "x")));
    }

    #[test]
    fn test_apply_protocol_order() {
        let mut def = ExpDef::from_str(TEMPLATE).unwrap();
        let mut diff = ExpDiff::new();
        diff.rms.append(TagRm::new(".//arena", "distribute"));
        diff.adds.append(TagAdd::new(".//arena", "distribute", BTreeMap::new()));
        diff.chgs.add(AttrChange::new(".//arena", "size", "36, 36, 2"));

        def.apply(&diff).unwrap();
        // Old distribute subtree replaced by a fresh empty one.
        let distribute = def.root().find(".//arena/distribute").unwrap();
        assert!(distribute.children.is_empty());
        assert_eq!(def.attr_get(".//arena", "size"), Some("36, 36, 2"));
    }

    #[test]
    fn test_audit_trail() {
        let mut def = ExpDef::from_str(TEMPLATE).unwrap();
        def.attr_change(&AttrChange::new(".//arena", "size", "20, 20, 2"));
        def.tag_add(&TagAdd::new(".//arena", "floor", BTreeMap::new()))
            .unwrap();
        assert_eq!(def.applied_attr_changes().len(), 1);
        assert_eq!(def.applied_tag_adds().len(), 1);
    }
}
