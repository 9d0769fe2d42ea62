//! Template-ready view of one component.
//!
//! The view model is built in two stages: first every prop is mapped and the
//! required ones collected in declaration order, then the constructor
//! parameter and argument lists are joined from that one sequence. Both lists
//! therefore always name the same props in the same order.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::{Path, PathBuf};
use vrgen_common::is_java_identifier;

use crate::analyzer::ComponentDescriptor;
use crate::error::{Error, Result};
use crate::mapping::{PropKind, PropType, UnsupportedTypeError, map_type};

/// A prop resolved against the type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedProp {
    pub name: String,
    /// `name` with its first character upper-cased, for accessor names
    pub upper_name: String,
    pub prop_type: PropType,
}

impl MappedProp {
    pub fn new(
        name: &str,
        declared_type: &str,
    ) -> std::result::Result<Self, UnsupportedTypeError> {
        Ok(Self {
            name: name.to_string(),
            upper_name: capitalize_first(name),
            prop_type: map_type(declared_type)?,
        })
    }

    pub fn target_type(&self) -> &'static str {
        self.prop_type.target_type()
    }

    pub fn kind(&self) -> PropKind {
        self.prop_type.kind()
    }
}

impl Serialize for MappedProp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let kind = self.kind();
        let mut state = serializer.serialize_struct("MappedProp", 6)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("upper_name", &self.upper_name)?;
        state.serialize_field("target_type", self.target_type())?;
        state.serialize_field("is_function", &(kind == PropKind::Function))?;
        state.serialize_field("is_symbol", &(kind == PropKind::Symbol))?;
        state.serialize_field("is_element", &(kind == PropKind::Element))?;
        state.end()
    }
}

/// Everything the templates need to emit one component's bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentViewModel {
    pub component_name: String,
    /// Every prop, in declaration order
    pub all_props: Vec<MappedProp>,
    /// The required subsequence of `all_props`
    pub required_props: Vec<MappedProp>,
    /// `"double value, JavaScriptFunction onChange"`
    pub constructor_param_list: String,
    /// `"value, onChange"`
    pub constructor_arg_list: String,
    pub target_package: String,
    /// Absolute path of the component source, with `/` separators
    pub source_file: String,
}

impl ComponentViewModel {
    /// Map every prop of `descriptor` and assemble the view model.
    ///
    /// Fails on the first prop whose declared type is outside the table; no
    /// partial view model is ever produced.
    pub fn build(
        descriptor: &ComponentDescriptor,
        source_path: &Path,
        package: &str,
    ) -> Result<Self> {
        let component_name = descriptor.component_name(source_path);
        check_identifier(source_path, "component", &component_name)?;

        let mut all_props = Vec::with_capacity(descriptor.props.len());
        let mut required_props = Vec::new();
        for (name, prop) in &descriptor.props {
            check_identifier(source_path, "prop", name)?;
            let mapped = MappedProp::new(name, &prop.declared_type).map_err(|source| {
                Error::UnsupportedType {
                    file: source_path.to_path_buf(),
                    component: component_name.clone(),
                    prop: name.clone(),
                    source,
                }
            })?;
            if prop.required {
                required_props.push(mapped.clone());
            }
            all_props.push(mapped);
        }

        Ok(Self {
            constructor_param_list: constructor_params(&required_props),
            constructor_arg_list: constructor_args(&required_props),
            component_name,
            all_props,
            required_props,
            target_package: package.to_string(),
            source_file: absolute_source_path(source_path)?,
        })
    }
}

/// Component and prop names end up in Java class names, accessors and output
/// paths verbatim.
fn check_identifier(source_path: &Path, role: &'static str, name: &str) -> Result<()> {
    if is_java_identifier(name) {
        return Ok(());
    }
    Err(Error::InvalidName {
        file: source_path.to_path_buf(),
        role,
        name: name.to_string(),
    })
}

/// `"<type> <name>"` for each prop, comma separated.
pub fn constructor_params(required: &[MappedProp]) -> String {
    required
        .iter()
        .map(|prop| format!("{} {}", prop.target_type(), prop.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The prop names, comma separated.
pub fn constructor_args(required: &[MappedProp]) -> String {
    required
        .iter()
        .map(|prop| prop.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Capitalize the first character of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn absolute_source_path(path: &Path) -> Result<String> {
    let absolute: PathBuf = std::path::absolute(path).map_err(|err| Error::filesystem(path, err))?;
    Ok(absolute.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::analyzer::PropDescriptor;
    use indexmap::IndexMap;

    fn descriptor(name: Option<&str>, props: &[(&str, &str, bool)]) -> ComponentDescriptor {
        ComponentDescriptor {
            display_name: name.map(str::to_string),
            props: props
                .iter()
                .map(|(prop, ty, required)| {
                    (
                        (*prop).to_string(),
                        PropDescriptor {
                            declared_type: (*ty).to_string(),
                            required: *required,
                        },
                    )
                })
                .collect::<IndexMap<_, _>>(),
        }
    }

    fn names(props: &[MappedProp]) -> Vec<&str> {
        props.iter().map(|prop| prop.name.as_str()).collect()
    }

    #[test]
    fn test_slider_view_model() {
        let slider = descriptor(
            Some("Slider"),
            &[
                ("value", "number", true),
                ("onChange", "func", true),
                ("label", "string", false),
            ],
        );
        let vm = ComponentViewModel::build(&slider, Path::new("/app/Slider.js"), "com.example")
            .unwrap();
        assert_eq!(vm.component_name, "Slider");
        assert_eq!(vm.all_props.len(), 3);
        assert_eq!(names(&vm.required_props), ["value", "onChange"]);
        assert_eq!(
            vm.constructor_param_list,
            "double value, JavaScriptFunction onChange"
        );
        assert_eq!(vm.constructor_arg_list, "value, onChange");
        assert_eq!(vm.target_package, "com.example");
        assert_eq!(vm.source_file, "/app/Slider.js");
    }

    #[test]
    fn test_required_props_are_an_ordered_subsequence() {
        let widget = descriptor(
            None,
            &[
                ("a", "string", false),
                ("b", "bool", true),
                ("c", "object", false),
                ("d", "array", true),
                ("e", "symbol", true),
            ],
        );
        let vm = ComponentViewModel::build(&widget, Path::new("/w/Widget.js"), "p").unwrap();
        assert_eq!(vm.component_name, "Widget");
        assert_eq!(names(&vm.all_props), ["a", "b", "c", "d", "e"]);
        assert_eq!(names(&vm.required_props), ["b", "d", "e"]);
        assert_eq!(vm.constructor_arg_list.split(", ").count(), 3);
        assert_eq!(
            vm.constructor_param_list,
            "boolean b, elemental.json.JsonArray d, String e"
        );
    }

    #[test]
    fn test_no_required_props_gives_empty_lists() {
        let widget = descriptor(Some("Plain"), &[("label", "string", false)]);
        let vm = ComponentViewModel::build(&widget, Path::new("/w/Plain.js"), "p").unwrap();
        assert!(vm.required_props.is_empty());
        assert_eq!(vm.constructor_param_list, "");
        assert_eq!(vm.constructor_arg_list, "");

        let empty = descriptor(Some("Empty"), &[]);
        let vm = ComponentViewModel::build(&empty, Path::new("/w/Empty.js"), "p").unwrap();
        assert!(vm.all_props.is_empty());
        assert_eq!(vm.constructor_param_list, "");
    }

    #[test]
    fn test_unsupported_type_names_prop_and_type() {
        let picker = descriptor(
            Some("Picker"),
            &[("label", "string", true), ("size", "enum", false)],
        );
        let err =
            ComponentViewModel::build(&picker, Path::new("/w/Picker.js"), "p").unwrap_err();
        let Error::UnsupportedType {
            component,
            prop,
            source,
            ..
        } = err
        else {
            panic!("expected an unsupported type error");
        };
        assert_eq!(component, "Picker");
        assert_eq!(prop, "size");
        assert_eq!(source, UnsupportedTypeError("enum".to_string()));
    }

    #[test]
    fn test_component_name_must_be_java_identifier() {
        for name in ["../../../escaped", "My Button", "class"] {
            let widget = descriptor(Some(name), &[("label", "string", false)]);
            let err =
                ComponentViewModel::build(&widget, Path::new("/w/Widget.js"), "p").unwrap_err();
            let Error::InvalidName { file, role, name: reported } = err else {
                panic!("expected an invalid name error for {name:?}");
            };
            assert_eq!(file, Path::new("/w/Widget.js"));
            assert_eq!(role, "component");
            assert_eq!(reported, name);
        }
    }

    #[test]
    fn test_prop_name_must_be_java_identifier() {
        let card = descriptor(
            Some("Card"),
            &[("title", "string", true), ("data-id", "string", false)],
        );
        let err = ComponentViewModel::build(&card, Path::new("/w/Card.js"), "p").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidName { role: "prop", ref name, .. } if name == "data-id"
        ));
        assert!(err.to_string().contains("/w/Card.js"));
    }

    #[test]
    fn test_mapped_prop_serializes_kind_flags() {
        let prop = MappedProp::new("onChange", "func").unwrap();
        let value = serde_json::to_value(&prop).unwrap();
        assert_eq!(value["upper_name"], "OnChange");
        assert_eq!(value["target_type"], "JavaScriptFunction");
        assert_eq!(value["is_function"], true);
        assert_eq!(value["is_symbol"], false);
        assert_eq!(value["is_element"], false);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("foo"), "Foo");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("a"), "A");
        assert_eq!(capitalize_first("onChange"), "OnChange");
    }
}
