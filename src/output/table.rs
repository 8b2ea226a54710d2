use comfy_table::{ContentArrangement, Table, presets};

use crate::config::OutputFormat;

const ELLIPSIS: &str = "…";
const DEFAULT_MAX_CELL_WIDTH: usize = 140;

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub max_cell_width: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            max_cell_width: DEFAULT_MAX_CELL_WIDTH,
        }
    }
}

pub fn render_key_value_table(
    title: &str,
    rows: &[(String, String)],
    format: OutputFormat,
    options: &TableOptions,
) -> String {
    let mut table = Table::new();
    match format {
        OutputFormat::Markdown => {
            table.load_preset(presets::ASCII_MARKDOWN);
        }
        _ => {
            table.load_preset(presets::UTF8_FULL);
        }
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![title.to_string(), "Value".to_string()]);

    for (key, value) in rows {
        let key = truncate_string(key, options.max_cell_width);
        let value = truncate_string(value, options.max_cell_width);
        table.add_row(vec![key, value]);
    }

    table.to_string()
}

fn truncate_string(input: &str, max_len: usize) -> String {
    let len = input.chars().count();
    if len <= max_len {
        return input.to_string();
    }
    if max_len <= 1 {
        return ELLIPSIS.to_string();
    }
    let truncated: String = input.chars().take(max_len - 1).collect();
    format!("{}{}", truncated, ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_values() {
        assert_eq!(truncate_string("abcdefghijklmnopqrstuvwxyz", 8), "abcdefg…");
        assert_eq!(truncate_string("short", 8), "short");
    }

    #[test]
    fn renders_markdown_rows() {
        let rows = vec![(
            "endpoint".to_string(),
            "https://biglake.googleapis.com/v1".to_string(),
        )];
        let out = render_key_value_table(
            "Config",
            &rows,
            OutputFormat::Markdown,
            &TableOptions::default(),
        );
        assert!(out.contains("| Config"));
        assert!(out.contains("https://biglake.googleapis.com/v1"));
    }
}
