//! Verify command implementation.

use gametable_stream::MemoryStream;
use gametable_tables::{AnyTable, TableKind};
use serde::Serialize;
use std::path::Path;

/// Verification result.
#[derive(Debug, Serialize)]
pub struct VerifyResult {
    /// Table type checked.
    pub table: String,
    /// Size of the input in bytes.
    pub input_bytes: u64,
    /// Size of the re-encoded table in bytes.
    pub encoded_bytes: usize,
    /// Whether decode, encode, decode produced an equal table.
    pub round_trip: bool,
    /// Whether the re-encoding is byte-identical to the input.
    pub canonical: bool,
    /// Content hash of the decoded table.
    pub content_hash: String,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.round_trip
    }
}

/// Runs the verify command.
pub fn run(path: &Path, kind: TableKind, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if format == "text" {
        println!("Verifying {} table at {:?}", kind, path);
        println!();
    }

    let (table, len) = super::load_table(path, kind)?;
    let input = std::fs::read(path)?;
    let result = verify_table(kind, &table, &input, len)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "text" => print_result(&result),
        other => return Err(format!("Unknown format '{}' (expected text or json)", other).into()),
    }

    if result.is_ok() {
        Ok(())
    } else {
        Err("Verification failed".into())
    }
}

/// Re-encodes `table`, decodes the encoding again and compares.
pub fn verify_table(
    kind: TableKind,
    table: &AnyTable,
    input: &[u8],
    input_len: u64,
) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let codec = super::cli_codec();
    let tree = kind.tree()?;

    let encoded = table.to_bytes(&codec, &tree)?;
    let mut stream = MemoryStream::with_data(encoded.clone());
    let decoded = AnyTable::read(&codec, kind, &tree, &mut stream)?;

    let round_trip = decoded == *table;
    let canonical = round_trip && input == encoded.as_slice();
    tracing::debug!(table = %kind, round_trip, canonical, "verified table");

    Ok(VerifyResult {
        table: kind.to_string(),
        input_bytes: input_len,
        encoded_bytes: encoded.len(),
        round_trip,
        canonical,
        content_hash: format!("{:016x}", table.content_hash()),
    })
}

fn print_result(result: &VerifyResult) {
    println!("  Input size:   {} bytes", result.input_bytes);
    println!("  Encoded size: {} bytes", result.encoded_bytes);
    println!("  Content hash: {}", result.content_hash);
    if result.canonical {
        println!("  Layout:       canonical");
    } else {
        println!("  Layout:       non-canonical (reencode to normalize)");
    }
    println!();
    if result.is_ok() {
        println!("✓ Table verification passed");
    } else {
        println!("✗ Table verification failed: re-decoded table differs");
    }
}
