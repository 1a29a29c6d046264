// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Static import extraction and candidate path resolution.

use lazy_static::lazy_static;
use regex::Regex;

use super::language::FileType;

lazy_static! {
    static ref JS_FROM: Regex =
        Regex::new(r#"(?:^|[\s;])(?:import|export)\s[^'"`;]*?\bfrom\s*['"]([^'"\n]+)['"]"#)
            .unwrap();
    static ref JS_SIDE_EFFECT: Regex =
        Regex::new(r#"(?m)^\s*import\s*['"]([^'"\n]+)['"]"#).unwrap();
    static ref JS_REQUIRE: Regex =
        Regex::new(r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).unwrap();
    static ref JS_DYNAMIC: Regex =
        Regex::new(r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).unwrap();
    static ref PY_FROM: Regex =
        Regex::new(r"(?m)^[ \t]*from[ \t]+(\.*)([\w.]*)[ \t]+import[ \t]+\(?([\w, \t*]+)")
            .unwrap();
    static ref PY_IMPORT: Regex =
        Regex::new(r"(?m)^[ \t]*import[ \t]+([\w.]+(?:[ \t]*,[ \t]*[\w.]+)*)")
            .unwrap();
    static ref RUST_MOD: Regex =
        Regex::new(r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?mod[ \t]+(\w+)[ \t]*;")
            .unwrap();
}

const JS_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Candidate paths for each import in `content`, in source order.
///
/// Each inner list is ordered by preference; the caller keeps the first
/// candidate that exists.
pub fn import_candidates(path: &str, file_type: FileType, content: &str) -> Vec<Vec<String>> {
    match file_type {
        FileType::TypeScript | FileType::JavaScript => js_candidates(path, content),
        FileType::Python => python_candidates(path, content),
        FileType::Rust => rust_candidates(path, content),
        _ => Vec::new(),
    }
}

fn js_candidates(path: &str, content: &str) -> Vec<Vec<String>> {
    let mut found: Vec<(usize, &str)> = Vec::new();
    for regex in [&*JS_FROM, &*JS_SIDE_EFFECT, &*JS_REQUIRE, &*JS_DYNAMIC] {
        for caps in regex.captures_iter(content) {
            if let Some(m) = caps.get(1) {
                found.push((m.start(), m.as_str()));
            }
        }
    }
    found.sort_by_key(|(start, _)| *start);
    found.dedup();

    let dir = parent_dir(path);
    found
        .into_iter()
        .filter(|(_, spec)| is_relative(spec))
        .filter_map(|(_, spec)| normalize(&join(dir, spec)))
        .map(|base| js_resolution_order(&base))
        .collect()
}

fn js_resolution_order(base: &str) -> Vec<String> {
    let mut candidates = vec![base.to_string()];

    // ESM sources import `./x.js` for a file that is `./x.ts` on disk.
    if let Some(stem) = base
        .strip_suffix(".js")
        .or_else(|| base.strip_suffix(".jsx"))
        .or_else(|| base.strip_suffix(".mjs"))
    {
        candidates.push(format!("{}.ts", stem));
        candidates.push(format!("{}.tsx", stem));
    }

    for ext in JS_EXTENSIONS {
        candidates.push(format!("{}.{}", base, ext));
    }
    for ext in JS_EXTENSIONS {
        candidates.push(join(base, &format!("index.{}", ext)));
    }
    candidates
}

fn python_candidates(path: &str, content: &str) -> Vec<Vec<String>> {
    let mut found: Vec<(usize, Vec<String>)> = Vec::new();
    let file_dir = parent_dir(path);

    for caps in PY_FROM.captures_iter(content) {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let dots = caps.get(1).map(|m| m.as_str().len()).unwrap_or(0);
        let module = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        if dots == 0 {
            if !module.is_empty() {
                found.push((start, absolute_module(file_dir, module)));
            }
            continue;
        }

        let Some(package) = ancestor(file_dir, dots - 1) else {
            continue;
        };

        if module.is_empty() {
            // `from . import a, b` imports sibling modules.
            let names = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            for name in imported_names(names) {
                found.push((start, module_files(&join(&package, &name))));
            }
        } else {
            found.push((start, module_files(&join(&package, &module.replace('.', "/")))));
        }
    }

    for caps in PY_IMPORT.captures_iter(content) {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        if let Some(list) = caps.get(1) {
            for module in list.as_str().split(',') {
                found.push((start, absolute_module(file_dir, module.trim())));
            }
        }
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, candidates)| candidates).collect()
}

fn imported_names(list: &str) -> Vec<String> {
    list.split(',')
        .filter_map(|item| item.split_whitespace().next())
        .filter(|name| *name != "*")
        .map(|name| name.to_string())
        .collect()
}

fn absolute_module(file_dir: &str, module: &str) -> Vec<String> {
    let relative = module.replace('.', "/");
    let mut candidates = module_files(&relative);
    if !file_dir.is_empty() {
        candidates.extend(module_files(&join(file_dir, &relative)));
    }
    candidates
}

fn module_files(base: &str) -> Vec<String> {
    vec![format!("{}.py", base), join(base, "__init__.py")]
}

fn rust_candidates(path: &str, content: &str) -> Vec<Vec<String>> {
    let dir = parent_dir(path);
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = file_name.strip_suffix(".rs").unwrap_or(file_name);

    let module_dir = if matches!(stem, "mod" | "lib" | "main") {
        dir.to_string()
    } else {
        join(dir, stem)
    };

    RUST_MOD
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|name| {
            vec![
                join(&module_dir, &format!("{}.rs", name.as_str())),
                join(&module_dir, &format!("{}/mod.rs", name.as_str())),
            ]
        })
        .collect()
}

fn is_relative(spec: &str) -> bool {
    spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../")
}

/// Directory part of a repository path (`""` at the root).
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn join(dir: &str, rest: &str) -> String {
    if dir.is_empty() {
        rest.to_string()
    } else {
        format!("{}/{}", dir, rest)
    }
}

fn ancestor(dir: &str, levels: usize) -> Option<String> {
    let mut current = dir.to_string();
    for _ in 0..levels {
        if current.is_empty() {
            return None;
        }
        current = parent_dir(&current).to_string();
    }
    Some(current)
}

/// Collapse `.` and `..` segments. `None` when the path escapes the root.
pub fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}
