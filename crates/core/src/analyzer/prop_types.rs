//! `PropTypes` extraction from JavaScript component sources.
//!
//! Sources are parsed with deno_ast (SWC) as JSX. The analyzer recognises the
//! usual ways a React component declares its props:
//! - `class X extends React.Component { static propTypes = {...} }`
//! - `X.propTypes = {...}` for classes, functions and arrow components
//! - `createReactClass({ displayName, propTypes })`
//!
//! When a file holds several components the default export wins.

use deno_ast::swc::ast as swc_ast;
use deno_ast::{MediaType, ModuleSpecifier, ParseParams, ProgramRef};
use indexmap::IndexMap;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use super::{ComponentAnalyzer, ComponentDescriptor, PropDescriptor};
use crate::error::{Error, Result};

/// Validator names that `PropTypes.<name>` reports unchanged.
const SIMPLE_TYPES: [&str; 11] = [
    "array",
    "bool",
    "func",
    "number",
    "object",
    "string",
    "symbol",
    "node",
    "element",
    "elementType",
    "any",
];

/// Analyzer for `.js` / `.jsx` React component sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropTypesAnalyzer;

impl ComponentAnalyzer for PropTypesAnalyzer {
    fn analyze(&self, path: &Path, source: &str) -> Result<ComponentDescriptor> {
        let specifier = ModuleSpecifier::parse("file:///component.jsx")
            .map_err(|err| Error::parse(path, err.to_string()))?;
        let params = ParseParams {
            specifier,
            text: source.into(),
            media_type: MediaType::Jsx,
            capture_tokens: false,
            scope_analysis: false,
            maybe_syntax: None,
        };
        // swc can panic on some truncated inputs instead of returning a diagnostic
        let parsed = catch_unwind(AssertUnwindSafe(|| deno_ast::parse_module(params)))
            .map_err(|payload| Error::parse(path, panic_message(payload.as_ref())))?
            .map_err(|err| Error::parse(path, err.to_string()))?;

        let mut collector = Collector::default();
        match parsed.program_ref() {
            ProgramRef::Module(module) => {
                for item in &module.body {
                    collector.visit_module_item(item);
                }
            }
            ProgramRef::Script(script) => {
                for stmt in &script.body {
                    collector.visit_stmt(stmt);
                }
            }
        }

        let (name, candidate) = collector.select().map_err(|msg| Error::parse(path, msg))?;
        let props = match candidate.prop_types {
            Some(expr) => read_prop_types(expr).map_err(|msg| Error::parse(path, msg))?,
            None => IndexMap::new(),
        };

        Ok(ComponentDescriptor {
            display_name: candidate.display_name.or(name),
            props,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|msg| (*msg).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown parser failure".to_string());
    format!("parser aborted: {detail}")
}

/// A binding that may be the component definition.
#[derive(Debug, Default)]
struct Candidate<'a> {
    is_component: bool,
    is_default: bool,
    display_name: Option<String>,
    prop_types: Option<&'a swc_ast::Expr>,
}

impl<'a> Candidate<'a> {
    fn merge(&mut self, other: Candidate<'a>) {
        self.is_component |= other.is_component;
        self.is_default |= other.is_default;
        if other.display_name.is_some() {
            self.display_name = other.display_name;
        }
        if other.prop_types.is_some() {
            self.prop_types = other.prop_types;
        }
    }
}

#[derive(Debug, Default)]
struct Collector<'a> {
    named: IndexMap<String, Candidate<'a>>,
    anonymous: Vec<Candidate<'a>>,
    default_export: Option<String>,
}

impl<'a> Collector<'a> {
    fn record(&mut self, name: Option<String>, candidate: Candidate<'a>) {
        match name {
            Some(name) => self.named.entry(name).or_default().merge(candidate),
            None => self.anonymous.push(candidate),
        }
    }

    fn visit_module_item(&mut self, item: &'a swc_ast::ModuleItem) {
        match item {
            swc_ast::ModuleItem::ModuleDecl(decl) => match decl {
                swc_ast::ModuleDecl::ExportDecl(export) => self.visit_decl(&export.decl),
                swc_ast::ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                    swc_ast::DefaultDecl::Class(class) => {
                        let name = class.ident.as_ref().map(|ident| ident.sym.to_string());
                        self.visit_class(name, &class.class, true);
                    }
                    swc_ast::DefaultDecl::Fn(function) => {
                        if let Some(ident) = &function.ident {
                            self.default_export = Some(ident.sym.to_string());
                        }
                    }
                    swc_ast::DefaultDecl::TsInterfaceDecl(_) => {}
                },
                swc_ast::ModuleDecl::ExportDefaultExpr(export) => {
                    self.visit_default_expr(&export.expr);
                }
                _ => {}
            },
            swc_ast::ModuleItem::Stmt(stmt) => self.visit_stmt(stmt),
        }
    }

    fn visit_stmt(&mut self, stmt: &'a swc_ast::Stmt) {
        match stmt {
            swc_ast::Stmt::Decl(decl) => self.visit_decl(decl),
            swc_ast::Stmt::Expr(expr_stmt) => self.visit_assignment(&expr_stmt.expr),
            _ => {}
        }
    }

    fn visit_decl(&mut self, decl: &'a swc_ast::Decl) {
        match decl {
            swc_ast::Decl::Class(class) => {
                self.visit_class(Some(class.ident.sym.to_string()), &class.class, false);
            }
            swc_ast::Decl::Var(var) => {
                for declarator in &var.decls {
                    if let swc_ast::Pat::Ident(binding) = &declarator.name
                        && let Some(init) = &declarator.init
                    {
                        self.visit_binding(binding.id.sym.to_string(), init);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_binding(&mut self, name: String, init: &'a swc_ast::Expr) {
        match unparen(init) {
            swc_ast::Expr::Class(class) => self.visit_class(Some(name), &class.class, false),
            swc_ast::Expr::Call(call) if is_create_class(call) => {
                self.visit_create_class(Some(name), call, false);
            }
            _ => {}
        }
    }

    fn visit_default_expr(&mut self, expr: &'a swc_ast::Expr) {
        match unparen(expr) {
            swc_ast::Expr::Ident(ident) => self.default_export = Some(ident.sym.to_string()),
            swc_ast::Expr::Class(class) => {
                let name = class.ident.as_ref().map(|ident| ident.sym.to_string());
                self.visit_class(name, &class.class, true);
            }
            swc_ast::Expr::Call(call) if is_create_class(call) => {
                self.visit_create_class(None, call, true);
            }
            _ => {}
        }
    }

    fn visit_class(&mut self, name: Option<String>, class: &'a swc_ast::Class, is_default: bool) {
        let mut candidate = Candidate {
            is_component: class.super_class.is_some(),
            is_default,
            ..Candidate::default()
        };
        for member in &class.body {
            match member {
                swc_ast::ClassMember::ClassProp(prop) if prop.is_static => {
                    match prop_name(&prop.key).as_deref() {
                        Some("propTypes") => {
                            candidate.prop_types = prop.value.as_deref();
                            candidate.is_component = true;
                        }
                        Some("displayName") => {
                            candidate.display_name = prop.value.as_deref().and_then(string_lit);
                        }
                        _ => {}
                    }
                }
                swc_ast::ClassMember::Method(method)
                    if !method.is_static && prop_name(&method.key).as_deref() == Some("render") =>
                {
                    candidate.is_component = true;
                }
                _ => {}
            }
        }
        self.record(name, candidate);
    }

    fn visit_create_class(
        &mut self,
        name: Option<String>,
        call: &'a swc_ast::CallExpr,
        is_default: bool,
    ) {
        let mut candidate = Candidate {
            is_component: true,
            is_default,
            ..Candidate::default()
        };
        if let Some(swc_ast::Expr::Object(spec)) = call.args.first().map(|arg| unparen(&arg.expr))
        {
            for prop in &spec.props {
                let swc_ast::PropOrSpread::Prop(prop) = prop else {
                    continue;
                };
                let swc_ast::Prop::KeyValue(kv) = &**prop else {
                    continue;
                };
                match prop_name(&kv.key).as_deref() {
                    Some("propTypes") => candidate.prop_types = Some(&*kv.value),
                    Some("displayName") => candidate.display_name = string_lit(&kv.value),
                    _ => {}
                }
            }
        }
        self.record(name, candidate);
    }

    /// `X.propTypes = ...`, `X.displayName = ...` and `module.exports = X`.
    fn visit_assignment(&mut self, expr: &'a swc_ast::Expr) {
        let swc_ast::Expr::Assign(assign) = expr else {
            return;
        };
        if assign.op != swc_ast::AssignOp::Assign {
            return;
        }
        let swc_ast::AssignTarget::Simple(swc_ast::SimpleAssignTarget::Member(member)) =
            &assign.left
        else {
            return;
        };
        let swc_ast::Expr::Ident(object) = member.obj.as_ref() else {
            return;
        };
        let object = object.sym.to_string();

        match member_prop_name(member) {
            Some("propTypes") => self.record(
                Some(object),
                Candidate {
                    is_component: true,
                    prop_types: Some(&*assign.right),
                    ..Candidate::default()
                },
            ),
            Some("displayName") => self.record(
                Some(object),
                Candidate {
                    display_name: string_lit(&assign.right),
                    ..Candidate::default()
                },
            ),
            Some("exports") if object == "module" => {
                if let swc_ast::Expr::Ident(exported) = unparen(&assign.right) {
                    self.default_export = Some(exported.sym.to_string());
                }
            }
            _ => {}
        }
    }

    /// Pick the component this file defines.
    fn select(self) -> std::result::Result<(Option<String>, Candidate<'a>), String> {
        let default_export = self.default_export;
        let mut found: Vec<(Option<String>, Candidate<'a>)> = self
            .named
            .into_iter()
            .map(|(name, mut candidate)| {
                if default_export.as_deref() == Some(name.as_str()) {
                    candidate.is_default = true;
                }
                (Some(name), candidate)
            })
            .chain(self.anonymous.into_iter().map(|candidate| (None, candidate)))
            .filter(|(_, candidate)| candidate.is_component)
            .collect();

        match found.len() {
            0 => Err("No suitable component definition found".to_string()),
            1 => Ok(found.remove(0)),
            count => {
                let Some(index) = found.iter().position(|(_, candidate)| candidate.is_default)
                else {
                    return Err(format!(
                        "Found {count} component definitions and no default export to pick one"
                    ));
                };
                Ok(found.swap_remove(index))
            }
        }
    }
}

fn read_prop_types(
    expr: &swc_ast::Expr,
) -> std::result::Result<IndexMap<String, PropDescriptor>, String> {
    let swc_ast::Expr::Object(object) = unparen(expr) else {
        return Err("propTypes must be an object literal".to_string());
    };

    let mut props = IndexMap::with_capacity(object.props.len());
    for prop in &object.props {
        let swc_ast::PropOrSpread::Prop(prop) = prop else {
            return Err("Spread elements in propTypes are not supported".to_string());
        };
        let (name, descriptor) = match &**prop {
            swc_ast::Prop::KeyValue(kv) => {
                let name = prop_name(&kv.key)
                    .ok_or_else(|| "Computed keys in propTypes are not supported".to_string())?;
                (name, describe(&kv.value))
            }
            // `{ validator }` shorthand refers to a custom validator function
            swc_ast::Prop::Shorthand(ident) => (
                ident.sym.to_string(),
                PropDescriptor {
                    declared_type: "custom".to_string(),
                    required: false,
                },
            ),
            _ => {
                return Err("propTypes entries must be `name: validator` pairs".to_string());
            }
        };
        props.insert(name, descriptor);
    }
    Ok(props)
}

fn describe(expr: &swc_ast::Expr) -> PropDescriptor {
    let expr = unparen(expr);
    if let swc_ast::Expr::Member(member) = expr
        && member_prop_name(member) == Some("isRequired")
    {
        return PropDescriptor {
            declared_type: validator_name(&member.obj),
            required: true,
        };
    }
    PropDescriptor {
        declared_type: validator_name(expr),
        required: false,
    }
}

fn validator_name(expr: &swc_ast::Expr) -> String {
    let name = match unparen(expr) {
        swc_ast::Expr::Member(member) => match member_prop_name(member) {
            Some(name) if SIMPLE_TYPES.contains(&name) => name,
            _ => "custom",
        },
        swc_ast::Expr::Call(call) => match callee_name(call) {
            Some("oneOf") => "enum",
            Some("oneOfType") => "union",
            Some(name @ ("arrayOf" | "objectOf" | "instanceOf" | "shape" | "exact")) => name,
            _ => "custom",
        },
        _ => "custom",
    };
    name.to_string()
}

fn is_create_class(call: &swc_ast::CallExpr) -> bool {
    matches!(callee_name(call), Some("createReactClass" | "createClass"))
}

fn callee_name(call: &swc_ast::CallExpr) -> Option<&str> {
    let swc_ast::Callee::Expr(callee) = &call.callee else {
        return None;
    };
    match unparen(callee) {
        swc_ast::Expr::Ident(ident) => Some(&*ident.sym),
        swc_ast::Expr::Member(member) => member_prop_name(member),
        _ => None,
    }
}

fn member_prop_name(member: &swc_ast::MemberExpr) -> Option<&str> {
    match &member.prop {
        swc_ast::MemberProp::Ident(ident) => Some(&*ident.sym),
        _ => None,
    }
}

fn prop_name(key: &swc_ast::PropName) -> Option<String> {
    match key {
        swc_ast::PropName::Ident(ident) => Some(ident.sym.to_string()),
        swc_ast::PropName::Str(s) => Some(String::from_utf8_lossy(s.value.as_bytes()).into_owned()),
        _ => None,
    }
}

fn string_lit(expr: &swc_ast::Expr) -> Option<String> {
    match unparen(expr) {
        swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => {
            Some(String::from_utf8_lossy(s.value.as_bytes()).into_owned())
        }
        _ => None,
    }
}

fn unparen(expr: &swc_ast::Expr) -> &swc_ast::Expr {
    match expr {
        swc_ast::Expr::Paren(paren) => unparen(&paren.expr),
        _ => expr,
    }
}
