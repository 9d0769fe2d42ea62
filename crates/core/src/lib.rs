//! Generates Vaadin server-side bindings and client connectors for React
//! components.
//!
//! The pipeline runs component files through [`locator`], [`analyzer`],
//! [`mapping`] and [`view_model`], then hands the result to [`emit`].
//! [`Generator`] drives a whole run.

pub mod analyzer;
pub mod emit;
pub mod error;
pub mod locator;
pub mod mapping;
pub mod pipeline;
pub mod view_model;

pub use analyzer::{ComponentAnalyzer, ComponentDescriptor, PropDescriptor};
pub use emit::bundler::{BundleStream, Bundler, CommandBundler, Passthrough, bundler_for};
pub use emit::layout::{OutputLayout, RUNTIME_PACKAGE};
pub use emit::{RenderedComponent, RenderedFile};
pub use error::{Error, Result};
pub use mapping::{PropKind, PropType, UnsupportedTypeError, map_type};
pub use pipeline::{GenerationPlan, GenerationReport, Generator, build_view_model};
pub use view_model::{ComponentViewModel, MappedProp};
