//! Line oriented CIDR files and the optional JSON summary.

use crate::processing::{AggregationResult, Summary};
use serde::Serialize;
use std::error::Error;
use std::path::Path;

/// Write one CIDR per line, each line ending in `\n`.
///
/// # Arguments
/// * `path` - Output file, created or truncated
/// * `cidrs` - Canonical CIDR strings in output order
///
/// # Returns
/// * `Ok(())` - File written; an empty list gives an empty file
pub fn write_cidr_file(path: &Path, cidrs: &[String]) -> Result<(), Box<dyn Error>> {
    let mut content = String::with_capacity(cidrs.iter().map(|c| c.len() + 1).sum());
    for cidr in cidrs {
        content.push_str(cidr);
        content.push('\n');
    }
    std::fs::write(path, content)
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    log::info!("{} CIDRs written to {}", cidrs.len(), path.display());
    Ok(())
}

/// Write the IPv4 and IPv6 lists to their own files.
pub fn write_result(
    result: &AggregationResult,
    ipv4_path: &Path,
    ipv6_path: &Path,
) -> Result<(), Box<dyn Error>> {
    write_cidr_file(ipv4_path, &result.ipv4)?;
    write_cidr_file(ipv6_path, &result.ipv6)?;
    Ok(())
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    generated_at: String,
    accepted: usize,
    ipv4: &'a [String],
    ipv6: &'a [String],
    skipped: Vec<String>,
}

/// Write the result, counts and skipped tokens as pretty printed JSON.
pub fn write_summary_json(path: &Path, summary: &Summary) -> Result<(), Box<dyn Error>> {
    let json = JsonSummary {
        generated_at: chrono::Utc::now().to_rfc3339(),
        accepted: summary.accepted,
        ipv4: &summary.result.ipv4,
        ipv6: &summary.result.ipv6,
        skipped: summary.skipped.iter().map(|e| e.to_string()).collect(),
    };
    let text = serde_json::to_string_pretty(&json)
        .map_err(|e| format!("Error serializing JSON: {e}"))?;
    std::fs::write(path, text).map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    log::info!("Summary written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::summarize;

    #[test]
    fn test_write_cidr_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("v4.txt");
        write_cidr_file(&path, &["10.0.0.0/24".to_string(), "10.0.2.0/24".to_string()])
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "10.0.0.0/24\n10.0.2.0/24\n"
        );
    }

    #[test]
    fn test_write_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("v6.txt");
        write_cidr_file(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_write_result_and_json() {
        let tmp = tempfile::tempdir().unwrap();
        let summary = summarize(["10.0.0.0/25", "10.0.0.128/25", "2001:db8::/32", "bad"]);
        let v4 = tmp.path().join("4.txt");
        let v6 = tmp.path().join("6.txt");
        write_result(&summary.result, &v4, &v6).unwrap();
        assert_eq!(std::fs::read_to_string(&v4).unwrap(), "10.0.0.0/24\n");
        assert_eq!(std::fs::read_to_string(&v6).unwrap(), "2001:db8::/32\n");

        let json_path = tmp.path().join("summary.json");
        write_summary_json(&json_path, &summary).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["accepted"], 3);
        assert_eq!(value["ipv4"][0], "10.0.0.0/24");
        assert_eq!(value["skipped"][0], "invalid CIDR 'bad': not a valid IPv4 address");
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("v4.txt");
        assert!(write_cidr_file(&path, &[]).is_err());
    }
}
