//! Render results: text plus the structured data extracted from a template.
//!
//! Values inside meta objects and anchor parameters are stored as strings.
//! The typed accessors coerce at read time and never fail: an integer that
//! does not parse is `None`, and a boolean is `true` only for `"true"`
//! (any case).

use std::collections::BTreeMap;

use serde::Serialize;

fn coerce_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

fn coerce_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// A payload annotated with parameters, located by its offset in the final text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchoredObject {
    text: String,
    position: usize,
    params: BTreeMap<String, String>,
}

impl AnchoredObject {
    pub fn new(text: impl Into<String>, position: usize, params: BTreeMap<String, String>) -> Self {
        Self {
            text: text.into(),
            position,
            params,
        }
    }

    /// The payload text, as it appears in the rendered output.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character offset of the payload in the rendered output.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn param_int(&self, key: &str) -> Option<i64> {
        coerce_int(self.param(key))
    }

    pub fn param_bool(&self, key: &str) -> bool {
        coerce_bool(self.param(key))
    }
}

/// Structured data declared in the code section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetaObject {
    Map(MetaMap),
    List(MetaList),
}

impl MetaObject {
    pub fn id(&self) -> &str {
        match self {
            MetaObject::Map(map) => map.id(),
            MetaObject::List(list) => list.id(),
        }
    }

    pub fn as_map(&self) -> Option<&MetaMap> {
        match self {
            MetaObject::Map(map) => Some(map),
            MetaObject::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&MetaList> {
        match self {
            MetaObject::List(list) => Some(list),
            MetaObject::Map(_) => None,
        }
    }
}

impl From<MetaMap> for MetaObject {
    fn from(map: MetaMap) -> Self {
        MetaObject::Map(map)
    }
}

impl From<MetaList> for MetaObject {
    fn from(list: MetaList) -> Self {
        MetaObject::List(list)
    }
}

/// `< m id key:value|key:value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaMap {
    id: String,
    data: BTreeMap<String, String>,
}

impl MetaMap {
    pub fn new(id: impl Into<String>, data: BTreeMap<String, String>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        coerce_int(self.get(key))
    }

    pub fn get_bool(&self, key: &str) -> bool {
        coerce_bool(self.get(key))
    }
}

/// `< l id value|value|value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaList {
    id: String,
    data: Vec<String>,
}

impl MetaList {
    pub fn new(id: impl Into<String>, data: Vec<String>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &[String] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.data.get(index).map(String::as_str)
    }

    pub fn get_int(&self, index: usize) -> Option<i64> {
        coerce_int(self.get(index))
    }

    pub fn get_bool(&self, index: usize) -> bool {
        coerce_bool(self.get(index))
    }
}

/// The outcome of a successful render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rendered {
    text: String,
    anchored_objects: Vec<AnchoredObject>,
    meta_objects: Vec<MetaObject>,
}

impl Rendered {
    pub fn new(
        text: String,
        anchored_objects: Vec<AnchoredObject>,
        meta_objects: Vec<MetaObject>,
    ) -> Self {
        Self {
            text,
            anchored_objects,
            meta_objects,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Anchored objects in order of appearance.
    pub fn anchored_objects(&self) -> &[AnchoredObject] {
        &self.anchored_objects
    }

    /// Meta objects in order of declaration.
    pub fn meta_objects(&self) -> &[MetaObject] {
        &self.meta_objects
    }

    /// First meta object declared with `id`.
    pub fn meta(&self, id: &str) -> Option<&MetaObject> {
        self.meta_objects.iter().find(|m| m.id() == id)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
