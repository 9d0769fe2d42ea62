//! Reads pre-extracted react-docgen JSON descriptors.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

use super::{ComponentAnalyzer, ComponentDescriptor, PropDescriptor};
use crate::error::{Error, Result};

/// Analyzer for `.json` files holding a single react-docgen component object.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocgenJsonAnalyzer;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocgenComponent {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    props: IndexMap<String, DocgenProp>,
}

#[derive(Debug, Deserialize)]
struct DocgenProp {
    #[serde(rename = "type")]
    prop_type: Option<DocgenType>,
    #[serde(default)]
    required: bool,
}

#[derive(Debug, Deserialize)]
struct DocgenType {
    name: String,
}

impl ComponentAnalyzer for DocgenJsonAnalyzer {
    fn analyze(&self, path: &Path, source: &str) -> Result<ComponentDescriptor> {
        let component: DocgenComponent =
            serde_json::from_str(source).map_err(|err| Error::parse(path, err.to_string()))?;

        let mut props = IndexMap::with_capacity(component.props.len());
        for (name, prop) in component.props {
            let Some(prop_type) = prop.prop_type else {
                return Err(Error::parse(
                    path,
                    format!("prop '{name}' has no PropTypes type"),
                ));
            };
            props.insert(
                name,
                PropDescriptor {
                    declared_type: prop_type.name,
                    required: prop.required,
                },
            );
        }

        Ok(ComponentDescriptor {
            display_name: component.display_name,
            props,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_props_in_document_order() {
        let json = r#"{
            "description": "",
            "displayName": "Slider",
            "methods": [],
            "props": {
                "value": {"type": {"name": "number"}, "required": true, "description": ""},
                "onChange": {"type": {"name": "func"}, "required": true},
                "label": {"type": {"name": "string"}, "required": false}
            }
        }"#;
        let descriptor = DocgenJsonAnalyzer
            .analyze(Path::new("Slider.json"), json)
            .unwrap();
        assert_eq!(descriptor.display_name.as_deref(), Some("Slider"));
        let names: Vec<_> = descriptor.props.keys().map(String::as_str).collect();
        assert_eq!(names, ["value", "onChange", "label"]);
        assert_eq!(descriptor.props["onChange"].declared_type, "func");
        assert!(!descriptor.props["label"].required);
    }

    #[test]
    fn test_structured_types_keep_their_name() {
        let json = r#"{
            "props": {"size": {"type": {"name": "enum", "value": []}, "required": false}}
        }"#;
        let descriptor = DocgenJsonAnalyzer
            .analyze(Path::new("Box.json"), json)
            .unwrap();
        assert!(descriptor.display_name.is_none());
        assert_eq!(descriptor.props["size"].declared_type, "enum");
    }

    #[test]
    fn test_missing_type_is_parse_error() {
        let json = r#"{"props": {"size": {"required": false}}}"#;
        let err = DocgenJsonAnalyzer
            .analyze(Path::new("Box.json"), json)
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = DocgenJsonAnalyzer
            .analyze(Path::new("Box.json"), "{not json")
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
