use std::fs;
use std::path::Path;

/// Read a line-oriented list, skipping blank lines and `#` comments
pub fn read_entries<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(&path).map_err(|e| {
        anyhow::anyhow!("failed to read {}: {}", path.as_ref().display(), e)
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# custom payloads").unwrap();
        writeln!(file, "https://evil.example").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "   //evil.example  ").unwrap();

        let entries = read_entries(file.path()).unwrap();
        assert_eq!(entries, vec!["https://evil.example", "//evil.example"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_entries("/nonexistent/hopper/payloads.txt").is_err());
    }
}
