use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const MANIFEST_ENTRY: &str = "manifest.json";
const ROSTER_ENTRY: &str = "roster/students.json";
const CSV_ENTRY: &str = "roster/students.csv";
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
pub const BUNDLE_FORMAT_V1: &str = "rosterd-roster-v1";
/// A bare roster value, as the browser edition kept it in local storage.
pub const BUNDLE_FORMAT_JSON: &str = "roster-json";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
    pub sha256: String,
}

/// Roster value read back from a bundle. Not yet parsed or validated.
#[derive(Debug, Clone)]
pub struct RosterBundle {
    pub format_detected: String,
    pub roster_json: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Writes the persisted roster value plus a CSV copy for people who open the
/// zip by hand. Only the JSON entry is read back on restore.
pub fn export_roster_bundle(
    roster_json: &str,
    csv_text: &str,
    student_count: usize,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let digest = sha256_hex(roster_json.as_bytes());

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    let out_file = File::create(out_path)
        .with_context(|| format!("failed to create {}", out_path.to_string_lossy()))?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "bundleId": uuid::Uuid::new_v4().to_string(),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "studentCount": student_count,
        "rosterSha256": digest,
    });
    let entries = [
        (
            MANIFEST_ENTRY,
            serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?,
        ),
        (ROSTER_ENTRY, roster_json.to_string()),
        (CSV_ENTRY, csv_text.to_string()),
    ];
    for (name, body) in &entries {
        zip.start_file(*name, opts)
            .with_context(|| format!("failed to start {name}"))?;
        zip.write_all(body.as_bytes())
            .with_context(|| format!("failed to write {name}"))?;
    }
    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: entries.len(),
        sha256: digest,
    })
}

pub fn read_roster_bundle(in_path: &Path) -> anyhow::Result<RosterBundle> {
    let bytes = std::fs::read(in_path)
        .with_context(|| format!("failed to read {}", in_path.to_string_lossy()))?;

    if !bytes.starts_with(&ZIP_MAGIC) {
        let text = String::from_utf8(bytes).context("backup is neither a zip nor UTF-8 JSON")?;
        if !text.trim_start().starts_with('[') {
            return Err(anyhow!(
                "not a roster bundle or roster value: {}",
                in_path.to_string_lossy()
            ));
        }
        return Ok(RosterBundle {
            format_detected: BUNDLE_FORMAT_JSON.to_string(),
            roster_json: text,
        });
    }

    let mut archive =
        ZipArchive::new(std::io::Cursor::new(bytes)).context("invalid zip archive")?;
    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }

    let mut roster_json = String::new();
    archive
        .by_name(ROSTER_ENTRY)
        .with_context(|| format!("bundle missing {ROSTER_ENTRY}"))?
        .read_to_string(&mut roster_json)
        .with_context(|| format!("failed to read {ROSTER_ENTRY}"))?;
    let expected = manifest
        .get("rosterSha256")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("manifest has no rosterSha256"))?;
    let actual = sha256_hex(roster_json.as_bytes());
    if actual != expected {
        return Err(anyhow!(
            "roster checksum mismatch: manifest {} but entry {}",
            expected,
            actual
        ));
    }

    Ok(RosterBundle {
        format_detected: BUNDLE_FORMAT_V1.to_string(),
        roster_json,
    })
}
