//! Shared CLI utilities.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::Path;

/// Flatten repeated and comma-separated values, keeping first occurrences.
pub fn parse_csv_multi(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in values.iter().flat_map(|v| split_csv(v)) {
        if !out.contains(&part) {
            out.push(part);
        }
    }
    out
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|part| !part.is_empty()).map(str::to_string).collect()
}

pub fn stdout_is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

pub fn interactive_terminal() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Write to `path` when given, otherwise print to stdout.
pub fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_csv_multi_flattens_and_dedups() {
        let values = vec!["Design,Hold".to_string(), "Hold".to_string(), " Testing , ".to_string()];
        assert_eq!(parse_csv_multi(&values), vec!["Design", "Hold", "Testing"]);
    }
}
