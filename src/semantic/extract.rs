// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Per-language declaration extraction over tree-sitter syntax trees.
//!
//! Only the root's direct children are declarations; nested items are
//! members of their container or ignored.

use crate::error::AnalysisError;
use std::collections::HashSet;
use tree_sitter::Node;

use super::symbols::{annotation, collapse_whitespace, Param, SourceFile, Symbol, SymbolKind};

/// Names of the members declared in a container body.
fn named_members(body: Option<Node>, source: &SourceFile) -> Vec<String> {
    let Some(body) = body else {
        return Vec::new();
    };
    body.named_children(&mut body.walk())
        .filter_map(|member| source.field(member, "name"))
        .map(str::to_string)
        .collect()
}

/// TypeScript and JavaScript.
pub(super) fn javascript(root: Node, source: &SourceFile) -> Result<Vec<Symbol>, AnalysisError> {
    let mut symbols = Vec::new();
    let mut exported_later: HashSet<String> = HashSet::new();

    for node in root.named_children(&mut root.walk()) {
        source.check_deadline()?;

        match node.kind() {
            "export_statement" => {
                if let Some(declaration) = node.child_by_field_name("declaration") {
                    js_declaration(declaration, source, true, &mut symbols);
                } else if let Some(value) = node.child_by_field_name("value") {
                    // export default name;
                    if value.kind() == "identifier" {
                        exported_later.insert(source.text(value).to_string());
                    }
                } else if node.child_by_field_name("source").is_none() {
                    exported_later.extend(export_clause_names(node, source));
                }
            }
            "expression_statement" => exported_later.extend(commonjs_exports(node, source)),
            _ => js_declaration(node, source, false, &mut symbols),
        }
    }

    for symbol in &mut symbols {
        if exported_later.contains(&symbol.name) {
            symbol.exported = true;
        }
    }
    Ok(symbols)
}

fn js_declaration(node: Node, source: &SourceFile, exported: bool, symbols: &mut Vec<Symbol>) {
    if node.kind() == "ambient_declaration" {
        for inner in node.named_children(&mut node.walk()) {
            js_declaration(inner, source, exported, symbols);
        }
        return;
    }
    if matches!(node.kind(), "lexical_declaration" | "variable_declaration") {
        js_bindings(node, source, exported, symbols);
        return;
    }

    let Some(name) = source.field(node, "name") else {
        return;
    };
    let body = node.child_by_field_name("body");
    let symbol = match node.kind() {
        "function_declaration" | "generator_function_declaration" | "function_signature" => {
            Symbol::new(name, SymbolKind::Function, exported).with_params(js_params(node, source))
        }
        "class_declaration" | "abstract_class_declaration" => {
            Symbol::new(name, SymbolKind::Class, exported).with_members(class_members(body, source))
        }
        "interface_declaration" => {
            Symbol::new(name, SymbolKind::Interface, exported).with_members(named_members(body, source))
        }
        "enum_declaration" => {
            Symbol::new(name, SymbolKind::Enum, exported).with_members(enum_members(body, source))
        }
        "type_alias_declaration" => Symbol::new(name, SymbolKind::Type, exported),
        "internal_module" | "module" => Symbol::new(name, SymbolKind::Module, exported),
        _ => return,
    };
    symbols.push(symbol);
}

/// `const`, `let` and `var` declarators. Function values are functions.
fn js_bindings(declaration: Node, source: &SourceFile, exported: bool, symbols: &mut Vec<Symbol>) {
    let constant = declaration
        .child(0)
        .is_some_and(|keyword| source.text(keyword) == "const");

    for declarator in declaration.named_children(&mut declaration.walk()) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        // Destructuring patterns declare no single name.
        let Some(name) = declarator
            .child_by_field_name("name")
            .filter(|name| name.kind() == "identifier")
            .map(|name| source.text(name))
        else {
            continue;
        };

        let symbol = match declarator.child_by_field_name("value") {
            Some(value) if is_js_function(value) => {
                Symbol::new(name, SymbolKind::Function, exported).with_params(js_params(value, source))
            }
            _ if constant => Symbol::new(name, SymbolKind::Constant, exported),
            _ => Symbol::new(name, SymbolKind::Variable, exported),
        };
        symbols.push(symbol);
    }
}

fn is_js_function(value: Node) -> bool {
    matches!(
        value.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

fn js_params(callable: Node, source: &SourceFile) -> Vec<Param> {
    // x => x
    if let Some(single) = callable.child_by_field_name("parameter") {
        return vec![Param {
            name: source.text(single).to_string(),
            ty: None,
        }];
    }
    let Some(list) = callable.child_by_field_name("parameters") else {
        return Vec::new();
    };
    list.named_children(&mut list.walk())
        .filter_map(|param| js_param(param, source))
        .collect()
}

fn js_param(node: Node, source: &SourceFile) -> Option<Param> {
    let (pattern, ty) = match node.kind() {
        "required_parameter" | "optional_parameter" => (
            node.child_by_field_name("pattern")?,
            source.field(node, "type").and_then(annotation),
        ),
        "assignment_pattern" => (node.child_by_field_name("left")?, None),
        "identifier" | "rest_pattern" | "object_pattern" | "array_pattern" => (node, None),
        _ => return None,
    };
    let name = collapse_whitespace(source.text(pattern).trim_start_matches("..."));
    (name != "this").then_some(Param { name, ty })
}

/// Public class members. Private, `#` and constructor members are internal.
fn class_members(body: Option<Node>, source: &SourceFile) -> Vec<String> {
    let Some(body) = body else {
        return Vec::new();
    };

    let mut members = Vec::new();
    for member in body.named_children(&mut body.walk()) {
        if !matches!(
            member.kind(),
            "method_definition"
                | "method_signature"
                | "abstract_method_signature"
                | "public_field_definition"
                | "field_definition"
        ) {
            continue;
        }
        let Some(name) = member
            .child_by_field_name("name")
            .or_else(|| member.child_by_field_name("property"))
            .map(|name| source.text(name))
        else {
            continue;
        };
        let private = member
            .children(&mut member.walk())
            .any(|child| child.kind() == "accessibility_modifier" && source.text(child) == "private");

        if !private && !name.starts_with('#') && name != "constructor" {
            members.push(name.to_string());
        }
    }
    members
}

fn enum_members(body: Option<Node>, source: &SourceFile) -> Vec<String> {
    let Some(body) = body else {
        return Vec::new();
    };
    body.named_children(&mut body.walk())
        .filter_map(|member| match member.kind() {
            "enum_assignment" => source.field(member, "name"),
            "property_identifier" | "string" => Some(source.text(member)),
            _ => None,
        })
        .map(str::to_string)
        .collect()
}

/// `export { a, b as c }` names the local bindings `a` and `b`.
fn export_clause_names(statement: Node, source: &SourceFile) -> Vec<String> {
    let mut names = Vec::new();
    for clause in statement.named_children(&mut statement.walk()) {
        if clause.kind() != "export_clause" {
            continue;
        }
        for specifier in clause.named_children(&mut clause.walk()) {
            if let Some(name) = source.field(specifier, "name") {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// `module.exports = { a }`, `module.exports = a` and `exports.a = ...`.
fn commonjs_exports(statement: Node, source: &SourceFile) -> Vec<String> {
    let Some(assignment) = statement
        .named_child(0)
        .filter(|node| node.kind() == "assignment_expression")
    else {
        return Vec::new();
    };
    let (Some(left), Some(right)) = (
        assignment.child_by_field_name("left"),
        assignment.child_by_field_name("right"),
    ) else {
        return Vec::new();
    };

    let target = source.text(left);
    let property = target
        .strip_prefix("module.exports.")
        .or_else(|| target.strip_prefix("exports."));
    if target != "module.exports" && property.is_none() {
        return Vec::new();
    }

    let mut names: Vec<String> = property.map(str::to_string).into_iter().collect();
    match right.kind() {
        "identifier" => names.push(source.text(right).to_string()),
        "object" if property.is_none() => {
            for entry in right.named_children(&mut right.walk()) {
                match entry.kind() {
                    "shorthand_property_identifier" => names.push(source.text(entry).to_string()),
                    "pair" => names.extend(source.field(entry, "value").map(str::to_string)),
                    _ => {}
                }
            }
        }
        _ => {}
    }
    names
}

/// Rust.
pub(super) fn rust(root: Node, source: &SourceFile) -> Result<Vec<Symbol>, AnalysisError> {
    let mut symbols = Vec::new();
    let mut impls = Vec::new();

    for node in root.named_children(&mut root.walk()) {
        source.check_deadline()?;

        if node.kind() == "impl_item" {
            impls.push(node);
            continue;
        }
        let Some(name) = source.field(node, "name") else {
            continue;
        };
        let exported = is_pub(node, source);
        let body = node.child_by_field_name("body");

        let symbol = match node.kind() {
            "function_item" | "function_signature_item" => {
                Symbol::new(name, SymbolKind::Function, exported).with_params(rust_params(node, source))
            }
            "struct_item" | "union_item" => {
                Symbol::new(name, SymbolKind::Struct, exported).with_members(rust_fields(body, source, exported))
            }
            "enum_item" => Symbol::new(name, SymbolKind::Enum, exported).with_members(named_members(body, source)),
            "trait_item" => Symbol::new(name, SymbolKind::Trait, exported).with_members(named_members(body, source)),
            "type_item" => Symbol::new(name, SymbolKind::Type, exported),
            "mod_item" => Symbol::new(name, SymbolKind::Module, exported),
            "const_item" | "static_item" => Symbol::new(name, SymbolKind::Constant, exported),
            _ => continue,
        };
        symbols.push(symbol);
    }

    let public_types: HashSet<String> = symbols
        .iter()
        .filter(|s| s.exported && s.kind != SymbolKind::Function)
        .map(|s| s.name.clone())
        .collect();
    let local_types: HashSet<String> = symbols.iter().map(|s| s.name.clone()).collect();

    for node in impls {
        source.check_deadline()?;
        let (Some(ty), Some(body)) = (node.child_by_field_name("type"), node.child_by_field_name("body")) else {
            continue;
        };
        let ty = rust_type_name(ty, source);
        let is_trait_impl = node.child_by_field_name("trait").is_some();

        for item in body.named_children(&mut body.walk()) {
            if item.kind() != "function_item" {
                continue;
            }
            let Some(method) = source.field(item, "name") else {
                continue;
            };
            // Methods of foreign types are public if the method is.
            let method_public = is_trait_impl || is_pub(item, source);
            let exported = method_public && (public_types.contains(&ty) || !local_types.contains(&ty));

            symbols.push(
                Symbol::new(format!("{}::{}", ty, method), SymbolKind::Method, exported)
                    .with_params(rust_params(item, source)),
            );
        }
    }

    Ok(symbols)
}

/// Plain `pub`; restricted visibility is not exported.
fn is_pub(item: Node, source: &SourceFile) -> bool {
    item.named_children(&mut item.walk())
        .any(|child| child.kind() == "visibility_modifier" && source.text(child) == "pub")
}

/// Last path segment without generics: `fmt::Display<T>` is `Display`.
fn rust_type_name(node: Node, source: &SourceFile) -> String {
    match node.kind() {
        "generic_type" | "reference_type" => node
            .child_by_field_name("type")
            .map(|inner| rust_type_name(inner, source))
            .unwrap_or_default(),
        "scoped_type_identifier" => source.field(node, "name").unwrap_or_default().to_string(),
        _ => source.text(node).to_string(),
    }
}

fn rust_params(function: Node, source: &SourceFile) -> Vec<Param> {
    let Some(list) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };
    list.named_children(&mut list.walk())
        .filter(|param| param.kind() == "parameter")
        .map(|param| Param {
            name: source
                .field(param, "pattern")
                .unwrap_or("_")
                .trim_start_matches("mut ")
                .to_string(),
            ty: source.field(param, "type").map(collapse_whitespace),
        })
        .collect()
}

/// Named fields; exported structs list only their `pub` fields.
fn rust_fields(body: Option<Node>, source: &SourceFile, exported: bool) -> Vec<String> {
    let Some(body) = body.filter(|body| body.kind() == "field_declaration_list") else {
        return Vec::new();
    };
    body.named_children(&mut body.walk())
        .filter(|field| field.kind() == "field_declaration")
        .filter(|field| !exported || is_pub(*field, source))
        .filter_map(|field| source.field(field, "name"))
        .map(str::to_string)
        .collect()
}

/// Python. Names without a leading underscore are public.
pub(super) fn python(root: Node, source: &SourceFile) -> Result<Vec<Symbol>, AnalysisError> {
    let mut symbols = Vec::new();

    for node in root.named_children(&mut root.walk()) {
        source.check_deadline()?;

        let node = undecorated(node);
        let symbol = match node.kind() {
            "function_definition" => source.field(node, "name").map(|name| {
                Symbol::new(name, SymbolKind::Function, is_python_public(name))
                    .with_params(python_params(node, source))
            }),
            "class_definition" => source.field(node, "name").map(|name| {
                Symbol::new(name, SymbolKind::Class, is_python_public(name))
                    .with_members(python_members(node, source))
            }),
            "expression_statement" => python_assigned_name(node, source).map(|name| {
                let constant = name
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
                let kind = if constant {
                    SymbolKind::Constant
                } else {
                    SymbolKind::Variable
                };
                Symbol::new(name, kind, is_python_public(name))
            }),
            _ => None,
        };
        symbols.extend(symbol);
    }

    Ok(symbols)
}

fn is_python_public(name: &str) -> bool {
    !name.starts_with('_')
}

fn undecorated(node: Node) -> Node {
    if node.kind() == "decorated_definition" {
        return node.child_by_field_name("definition").unwrap_or(node);
    }
    node
}

/// Target of `name = ...` or `name: T = ...`.
fn python_assigned_name<'a>(statement: Node, source: &SourceFile<'a>) -> Option<&'a str> {
    let assignment = statement
        .named_child(0)
        .filter(|node| node.kind() == "assignment")?;
    assignment
        .child_by_field_name("left")
        .filter(|left| left.kind() == "identifier")
        .map(|left| source.text(left))
}

fn python_params(function: Node, source: &SourceFile) -> Vec<Param> {
    let Some(list) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };
    list.named_children(&mut list.walk())
        .filter_map(|param| python_param(param, source))
        .filter(|param| !matches!(param.name.as_str(), "self" | "cls"))
        .collect()
}

fn python_param(node: Node, source: &SourceFile) -> Option<Param> {
    let (name, ty) = match node.kind() {
        "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => (source.text(node), None),
        "typed_parameter" => (
            node.named_children(&mut node.walk())
                .find(|child| child.kind() == "identifier" || child.kind().ends_with("splat_pattern"))
                .map(|child| source.text(child))?,
            source.field(node, "type"),
        ),
        "default_parameter" | "typed_default_parameter" => {
            (source.field(node, "name")?, source.field(node, "type"))
        }
        // `*` and `/` separators
        _ => return None,
    };
    Some(Param {
        name: name.to_string(),
        ty: ty.map(collapse_whitespace),
    })
}

fn python_members(class: Node, source: &SourceFile) -> Vec<String> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };
    body.named_children(&mut body.walk())
        .filter_map(|member| {
            let member = undecorated(member);
            match member.kind() {
                "function_definition" => source.field(member, "name"),
                "expression_statement" => python_assigned_name(member, source),
                _ => None,
            }
        })
        .filter(|name| is_python_public(name))
        .map(str::to_string)
        .collect()
}

/// Go. Capitalized names are exported.
pub(super) fn go(root: Node, source: &SourceFile) -> Result<Vec<Symbol>, AnalysisError> {
    let mut symbols = Vec::new();

    for node in root.named_children(&mut root.walk()) {
        source.check_deadline()?;

        match node.kind() {
            "function_declaration" => {
                if let Some(name) = source.field(node, "name") {
                    symbols.push(
                        Symbol::new(name, SymbolKind::Function, is_go_exported(name))
                            .with_params(go_params(node, source)),
                    );
                }
            }
            "method_declaration" => {
                let (Some(method), Some(receiver)) =
                    (source.field(node, "name"), node.child_by_field_name("receiver"))
                else {
                    continue;
                };
                let ty = receiver_type(receiver, source);
                let exported = is_go_exported(method) && is_go_exported(&ty);
                symbols.push(
                    Symbol::new(format!("{}.{}", ty, method), SymbolKind::Method, exported)
                        .with_params(go_params(node, source)),
                );
            }
            "type_declaration" => {
                for spec in node.named_children(&mut node.walk()) {
                    symbols.extend(go_type(spec, source));
                }
            }
            "const_declaration" | "var_declaration" => {
                let kind = if node.kind() == "const_declaration" {
                    SymbolKind::Constant
                } else {
                    SymbolKind::Variable
                };
                for name in go_value_names(node, source) {
                    symbols.push(Symbol::new(name, kind, is_go_exported(name)));
                }
            }
            _ => {}
        }
    }

    Ok(symbols)
}

/// Names declared by a `const` or `var` declaration, grouped or not.
fn go_value_names<'a>(declaration: Node, source: &SourceFile<'a>) -> Vec<&'a str> {
    let mut names = Vec::new();
    for spec in declaration.named_children(&mut declaration.walk()) {
        match spec.kind() {
            "const_spec" | "var_spec" => names.extend(
                spec.children_by_field_name("name", &mut spec.walk())
                    .map(|name| source.text(name)),
            ),
            "var_spec_list" => names.extend(go_value_names(spec, source)),
            _ => {}
        }
    }
    names
}

fn go_type(spec: Node, source: &SourceFile) -> Option<Symbol> {
    if !matches!(spec.kind(), "type_spec" | "type_alias") {
        return None;
    }
    let name = source.field(spec, "name")?;
    let exported = is_go_exported(name);

    let symbol = match spec.child_by_field_name("type") {
        Some(ty) if ty.kind() == "struct_type" => {
            let members = go_fields(ty, source)
                .into_iter()
                .filter(|field| !exported || is_go_exported(field))
                .collect();
            Symbol::new(name, SymbolKind::Struct, exported).with_members(members)
        }
        Some(ty) if ty.kind() == "interface_type" => {
            Symbol::new(name, SymbolKind::Interface, exported).with_members(named_members(Some(ty), source))
        }
        _ => Symbol::new(name, SymbolKind::Type, exported),
    };
    Some(symbol)
}

/// Field names; embedded fields are named by their type.
fn go_fields(struct_type: Node, source: &SourceFile) -> Vec<String> {
    let mut fields = Vec::new();
    for list in struct_type.named_children(&mut struct_type.walk()) {
        if list.kind() != "field_declaration_list" {
            continue;
        }
        for field in list.named_children(&mut list.walk()) {
            if field.kind() != "field_declaration" {
                continue;
            }
            let names: Vec<String> = field
                .children_by_field_name("name", &mut field.walk())
                .map(|name| source.text(name).to_string())
                .collect();
            if names.is_empty() {
                if let Some(embedded) = source.field(field, "type") {
                    fields.push(embedded.trim_start_matches('*').to_string());
                }
            }
            fields.extend(names);
        }
    }
    fields
}

/// Go groups names before a shared type: `a, b int`.
fn go_params(function: Node, source: &SourceFile) -> Vec<Param> {
    let Some(list) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut params = Vec::new();
    for declaration in list.named_children(&mut list.walk()) {
        let variadic = match declaration.kind() {
            "parameter_declaration" => false,
            "variadic_parameter_declaration" => true,
            _ => continue,
        };
        let ty = source
            .field(declaration, "type")
            .map(collapse_whitespace)
            .map(|ty| if variadic { format!("...{}", ty) } else { ty });

        let names: Vec<&str> = declaration
            .children_by_field_name("name", &mut declaration.walk())
            .map(|name| source.text(name))
            .collect();
        if names.is_empty() {
            params.push(Param {
                name: "_".to_string(),
                ty,
            });
            continue;
        }
        for name in names {
            params.push(Param {
                name: name.to_string(),
                ty: ty.clone(),
            });
        }
    }
    params
}

/// `(s *Server[T])` is `Server`.
fn receiver_type(receiver: Node, source: &SourceFile) -> String {
    let ty = receiver
        .named_children(&mut receiver.walk())
        .find(|child| child.kind() == "parameter_declaration")
        .and_then(|declaration| source.field(declaration, "type"))
        .unwrap_or_default()
        .trim_start_matches('*');
    ty.split('[').next().unwrap_or(ty).to_string()
}

fn is_go_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FileType;
    use crate::semantic::symbols::extract_symbols;
    use crate::semantic::Deadline;

    fn symbols(file_type: FileType, content: &str) -> Vec<Symbol> {
        extract_symbols("test", file_type, content, &Deadline::none()).unwrap()
    }

    fn symbols_in(path: &str, content: &str) -> Vec<Symbol> {
        extract_symbols(path, FileType::from_path(path), content, &Deadline::none()).unwrap()
    }

    fn find<'a>(symbols: &'a [Symbol], name: &str) -> &'a Symbol {
        symbols
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("missing symbol {}", name))
    }

    #[test]
    fn test_typescript_declarations() {
        let content = r#"
import { db } from './db';

export interface User {
  id: string;
  name?: string;
  greet(other: User): string;
}

export async function fetchUser(id: string, opts?: Options): Promise<User> {
  const url = `/users/${id}`;
  return db.get(url);
}

function helper(a: number) {
  if (a > 1) { return a; }
}

export const handler = async (event: Event, ctx: Context) => {
  return 1;
};

export const VERSION = "1.0";

export class Service extends Base {
  private cache: Map<string, User>;
  public name: string;
  static create(): Service { return new Service(); }
  constructor(readonly db: Db) { super(); }
}

export enum Color { Red, Green = 2 }
type Id = string;
const square = x => x * x;
"#;
        let syms = symbols(FileType::TypeScript, content);

        let user = find(&syms, "User");
        assert_eq!(user.kind, SymbolKind::Interface);
        assert!(user.exported);
        assert_eq!(user.members, vec!["id", "name", "greet"]);

        let fetch = find(&syms, "fetchUser");
        assert_eq!(fetch.kind, SymbolKind::Function);
        assert_eq!(fetch.signature(), "(id: string, opts: Options)");

        let helper = find(&syms, "helper");
        assert!(!helper.exported);

        let handler = find(&syms, "handler");
        assert_eq!(handler.kind, SymbolKind::Function);
        assert_eq!(handler.params.as_ref().map(Vec::len), Some(2));

        assert_eq!(find(&syms, "VERSION").kind, SymbolKind::Constant);

        let service = find(&syms, "Service");
        assert_eq!(service.kind, SymbolKind::Class);
        assert_eq!(service.members, vec!["name", "create"]);

        assert_eq!(find(&syms, "Color").members, vec!["Red", "Green"]);
        assert_eq!(find(&syms, "Id").kind, SymbolKind::Type);
        assert_eq!(find(&syms, "square").params.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_javascript_export_lists() {
        let content = "function a() {}\nfunction b() {}\nfunction c() {}\nexport { a, b as bee };\nexports.c = c;\n";
        let syms = symbols(FileType::JavaScript, content);
        assert!(find(&syms, "a").exported);
        assert!(find(&syms, "b").exported);
        assert!(find(&syms, "c").exported);

        let syms = symbols(FileType::JavaScript, "function a() {}\nfunction b() {}\nmodule.exports = { a };\n");
        assert!(find(&syms, "a").exported);
        assert!(!find(&syms, "b").exported);
    }

    #[test]
    fn test_rust_items() {
        let content = r#"
use std::fmt;

/// Docs { with braces
pub struct Config {
    pub name: String,
    #[serde(default)]
    pub depth: usize,
    cache: HashMap<String, Vec<u8>>,
}

struct Internal {
    a: u8,
}

pub enum Mode { Fast, Slow(u32), Custom { level: u8 } }

pub trait Render {
    fn render(&self) -> String;
    type Output;
}

pub(crate) fn crate_only() {}

pub fn parse<'a, T: Into<String>>(input: &'a str, mut limit: usize) -> Result<T, Error> {
    let c = '{';
    todo!()
}

impl Config {
    pub fn new(name: &str) -> Self { todo!() }
    fn private_helper(&self) {}
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { Ok(()) }
}

pub const LIMIT: usize = 10;
mod tests;
"#;
        let syms = symbols(FileType::Rust, content);

        let config = find(&syms, "Config");
        assert_eq!(config.kind, SymbolKind::Struct);
        assert_eq!(config.members, vec!["name", "depth"]);
        assert_eq!(find(&syms, "Internal").members, vec!["a"]);
        assert_eq!(find(&syms, "Mode").members, vec!["Fast", "Slow", "Custom"]);
        assert_eq!(find(&syms, "Render").members, vec!["render", "Output"]);
        assert!(!find(&syms, "crate_only").exported);

        let parse = find(&syms, "parse");
        assert!(parse.exported);
        assert_eq!(parse.signature(), "(input: &'a str, limit: usize)");

        assert!(find(&syms, "Config::new").exported);
        assert!(!find(&syms, "Config::private_helper").exported);
        assert_eq!(find(&syms, "Config::private_helper").params.as_ref().map(Vec::len), Some(0));
        assert!(find(&syms, "Config::fmt").exported);
        assert_eq!(find(&syms, "LIMIT").kind, SymbolKind::Constant);
        assert_eq!(find(&syms, "tests").kind, SymbolKind::Module);
    }

    #[test]
    fn test_python_definitions() {
        let content = r#"
import os

MAX_RETRIES = 3
_cache = {}

class Client(Base):
    timeout: int = 5

    def __init__(self, url):
        self.url = url

    def fetch(self, path: str, retries: int = MAX_RETRIES):
        return (
            path
        )

    def _internal(self):
        pass

def connect(url: str, *, verify=True):
    """Docstring with def fake(): inside."""
    return Client(url)

async def _private():
    pass
"#;
        let syms = symbols(FileType::Python, content);

        assert_eq!(find(&syms, "MAX_RETRIES").kind, SymbolKind::Constant);
        assert!(!find(&syms, "_cache").exported);

        let client = find(&syms, "Client");
        assert_eq!(client.members, vec!["timeout", "fetch"]);

        let connect = find(&syms, "connect");
        assert_eq!(connect.signature(), "(url: str, verify)");
        assert!(!find(&syms, "_private").exported);
        assert!(syms.iter().all(|s| s.name != "fake"));
    }

    #[test]
    fn test_go_declarations() {
        let content = r#"
package server

import "fmt"

const (
	DefaultPort = 8080
	maxConns    = 10
)

type Server struct {
	Addr string
	Port int
	conns int
}

type Handler interface {
	Serve(req *Request) error
}

type ID string

func New(addr string, port int) *Server {
	return &Server{Addr: addr}
}

func (s *Server) Start(a, b int, name string) error {
	fmt.Println("{")
	return nil
}

func helper() {}
"#;
        let syms = symbols(FileType::Go, content);

        assert!(find(&syms, "DefaultPort").exported);
        assert!(!find(&syms, "maxConns").exported);

        let server = find(&syms, "Server");
        assert_eq!(server.kind, SymbolKind::Struct);
        assert_eq!(server.members, vec!["Addr", "Port"]);

        assert_eq!(find(&syms, "Handler").members, vec!["Serve"]);
        assert_eq!(find(&syms, "ID").kind, SymbolKind::Type);

        let start = find(&syms, "Server.Start");
        assert_eq!(start.kind, SymbolKind::Method);
        assert!(start.exported);
        assert_eq!(start.signature(), "(a: int, b: int, name: string)");

        assert_eq!(find(&syms, "New").signature(), "(addr: string, port: int)");
        assert!(!find(&syms, "helper").exported);
    }

    #[test]
    fn test_generic_arrow_function() {
        let syms = symbols(FileType::TypeScript, "export const f = <T,>(x: T): T => x;\n");
        let f = find(&syms, "f");
        assert_eq!(f.kind, SymbolKind::Function);
        assert!(f.exported);
        assert_eq!(f.signature(), "(x: T)");
    }

    #[test]
    fn test_jsx_text_with_apostrophe() {
        let syms = symbols_in(
            "src/App.tsx",
            "export function App() {\n  return <p>Don't panic</p>;\n}\n\nexport const Footer = ({ year }: Props) => <p>It's {year}</p>;\n",
        );
        assert_eq!(find(&syms, "App").params.as_ref().map(Vec::len), Some(0));
        assert_eq!(find(&syms, "Footer").kind, SymbolKind::Function);

        let syms = symbols_in("src/view.jsx", "export default function View(props) {\n  return <p>Can't stop</p>;\n}\n");
        assert_eq!(find(&syms, "View").signature(), "(props)");
    }

    #[test]
    fn test_nested_declarations_are_not_top_level() {
        let syms = symbols(
            FileType::TypeScript,
            "export function outer() {\n  function inner(a: number) {}\n  const local = 1;\n}\n",
        );
        assert_eq!(syms.len(), 1);
        assert_eq!(syms[0].name, "outer");
    }
}
