// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Default configuration values.

/// Generate an example configuration file.
pub fn example_config() -> &'static str {
    r#"# commitlens configuration
# Author: Eshan Roy
# SPDX-License-Identifier: MIT

[analysis]
max_files_to_analyze = 500
file_analysis_timeout = 5000   # milliseconds per file
context_depth = 2              # import hops followed per file

[rules]
use_builtin_rules = true
# rules_file = "commitlens-rules.yaml"
breaking_change_patterns = []
non_versioning_patterns = ["vendor/**"]

# Custom rules run before the built-in ones; the first match wins.
[[rules.custom_rules]]
id = "api-signature"
matchPath = "src/api"
matchAst = "signature_changed exported"
type = "fix"
reason = "Public API signature changed"

[[rules.custom_rules]]
id = "api-surface"
matchPath = "src/api"
type = "refactor"
reason = "API module changed"
heuristics = [
    { if = "has_added_exported_symbol && !has_removed_exported_symbol", set = "feat" },
]

[scoring]
lines_of_code = 0.5
semantic_importance = 0.8
breaking_penalty_bonus = 1.0
dependency_fanout = 0.3
breaking_bonus = 3.0
non_versioning_weight_factor = 0.1

[advanced]
parallel_analysis = true
max_parallel_processes = 4
cache_results = false

[output]
format = "text"
max_body_items = 5
"#
}
