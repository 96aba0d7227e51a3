//! Output formatters for CLI commands.
//!
//! Provides consistent formatting across all CLI commands for JSON, text, and pretty output modes.

use anyhow::Result;
use colored::Colorize;
use playground_core::cli::OutputFormat;
use serde::Serialize;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use playground_cli::formatters::format_output;
/// use playground_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Imported {
///     project: String,
///     files: usize,
/// }
///
/// let data = Imported {
///     project: "demo".to_string(),
///     files: 12,
/// };
///
/// let output = format_output(&data, OutputFormat::Json)?;
/// assert!(output.contains("\"project\""));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format data as compact JSON.
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, json};

    /// Format data as compact JSON, for piping into other tools.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        json::format_compact(data)
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;

    /// Format data as colorized, human-readable output.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(format_value(&value, 0))
    }

    fn format_value(value: &Value, indent: usize) -> String {
        let indent_str = "  ".repeat(indent);
        let next_indent_str = "  ".repeat(indent + 1);

        match value {
            Value::Null => "null".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => format!("\"{}\"", s.green()),
            Value::Array(arr) => {
                if arr.is_empty() {
                    return "[]".to_string();
                }
                let items: Vec<String> = arr
                    .iter()
                    .map(|item| format!("{next_indent_str}{}", format_value(item, indent + 1)))
                    .collect();
                format!("[\n{}\n{indent_str}]", items.join(",\n"))
            }
            Value::Object(obj) => {
                if obj.is_empty() {
                    return "{}".to_string();
                }
                let entries: Vec<String> = obj
                    .iter()
                    .map(|(key, val)| {
                        format!(
                            "{next_indent_str}\"{}\": {}",
                            key.blue().bold(),
                            format_value(val, indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{indent_str}}}", entries.join(",\n"))
            }
        }
    }
}

/// Tree rendering for project listings.
pub mod tree {
    use super::Colorize;
    use playground_tree::{FolderNode, TreeNode};

    /// Renders a project tree with box-drawing guides; folders in blue.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_cli::formatters::tree::render;
    /// use playground_tree::{FileNode, FolderNode};
    ///
    /// colored::control::set_override(false);
    /// let mut root = FolderNode::new("app");
    /// root.items.push(FileNode::new("index", "ts", "").into());
    ///
    /// assert_eq!(render(&root), "app/\n└── index.ts");
    /// ```
    #[must_use]
    pub fn render(root: &FolderNode) -> String {
        let mut lines = vec![format!("{}/", root.folder_name).blue().bold().to_string()];
        render_items(&root.items, "", &mut lines);
        lines.join("\n")
    }

    fn render_items(items: &[TreeNode], prefix: &str, lines: &mut Vec<String>) {
        for (i, item) in items.iter().enumerate() {
            let last = i + 1 == items.len();
            let branch = if last { "└── " } else { "├── " };
            match item {
                TreeNode::Folder(folder) => {
                    let name = format!("{}/", folder.folder_name).blue().bold();
                    lines.push(format!("{prefix}{branch}{name}"));
                    let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
                    render_items(&folder.items, &child_prefix, lines);
                }
                TreeNode::File(file) => {
                    lines.push(format!("{prefix}{branch}{}", file.display_name()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_tree::{PathTreeBuilder, RepoTreeEntry};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        count: i32,
        enabled: bool,
    }

    fn data() -> TestData {
        TestData {
            name: "test".to_string(),
            count: 42,
            enabled: true,
        }
    }

    #[test]
    fn test_json_format() {
        let output = json::format(&data()).unwrap();
        assert!(output.contains("\"name\": \"test\""));
        assert!(output.contains("42"));
        assert!(output.contains("true"));
    }

    #[test]
    fn test_text_format_is_single_line() {
        let output = text::format(&data()).unwrap();
        assert!(!output.contains('\n'));
        assert!(output.contains("\"name\":\"test\""));
    }

    #[test]
    fn test_pretty_format() {
        colored::control::set_override(false);
        let output = pretty::format(&data()).unwrap();
        assert_eq!(
            output,
            "{\n  \"count\": 42,\n  \"enabled\": true,\n  \"name\": \"test\"\n}"
        );
    }

    #[test]
    fn test_pretty_format_nested() {
        colored::control::set_override(false);
        let value = serde_json::json!({"files": ["a.ts", "b.ts"], "empty": []});
        let output = pretty::format(&value).unwrap();
        assert!(output.contains("\"files\": [\n    \"a.ts\",\n    \"b.ts\"\n  ]"));
        assert!(output.contains("\"empty\": []"));
    }

    #[test]
    fn test_render_tree() {
        colored::control::set_override(false);
        let root = PathTreeBuilder::new("app")
            .add_entry(RepoTreeEntry::blob("src/lib/math.ts"))
            .add_entry(RepoTreeEntry::blob("src/main.ts"))
            .add_entry(RepoTreeEntry::blob("package.json"))
            .build()
            .unwrap();

        let expected = "\
app/
├── src/
│   ├── lib/
│   │   └── math.ts
│   └── main.ts
└── package.json";
        assert_eq!(tree::render(&root), expected);
    }

    #[test]
    fn test_format_output_dispatch() {
        let json = format_output(&data(), OutputFormat::Json).unwrap();
        let text = format_output(&data(), OutputFormat::Text).unwrap();
        assert!(json.contains('\n'));
        assert!(!text.contains('\n'));
    }
}
