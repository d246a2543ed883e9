//! Golden files and hex helpers for byte-exact layout checks.
//!
//! Golden files hold a hex dump, 16 bytes per line, so a layout change shows
//! up as a readable diff. Set `GAMETABLE_UPDATE_GOLDEN` to rewrite them from
//! the current output.

use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that switches golden checks into update mode.
pub const UPDATE_ENV: &str = "GAMETABLE_UPDATE_GOLDEN";

/// Bytes per line in a golden hex dump.
const DUMP_WIDTH: usize = 16;

/// A set of golden files sharing a name prefix and a directory.
pub struct GoldenTest {
    name: String,
    dir: PathBuf,
    update: bool,
}

impl GoldenTest {
    /// Golden files named `<name>[_<suffix>].hex` inside `dir`.
    pub fn new(name: impl Into<String>, dir: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            dir: dir.as_ref().to_path_buf(),
            update: std::env::var_os(UPDATE_ENV).is_some(),
        }
    }

    /// Path of the golden file for `suffix`.
    pub fn path(&self, suffix: &str) -> PathBuf {
        if suffix.is_empty() {
            self.dir.join(format!("{}.hex", self.name))
        } else {
            self.dir.join(format!("{}_{}.hex", self.name, suffix))
        }
    }

    /// Writes `bytes` as the golden dump for `suffix`.
    pub fn record(&self, suffix: &str, bytes: &[u8]) {
        let path = self.path(suffix);
        fs::create_dir_all(&self.dir).expect("Failed to create golden directory");
        fs::write(&path, hex_dump(bytes)).expect("Failed to write golden file");
    }

    /// Panics unless `actual` matches the golden dump for `suffix`.
    ///
    /// In update mode the dump is rewritten instead.
    pub fn assert_bytes(&self, suffix: &str, actual: &[u8]) {
        if self.update {
            self.record(suffix, actual);
            return;
        }

        let path = self.path(suffix);
        let Ok(text) = fs::read_to_string(&path) else {
            panic!(
                "missing golden file {}; rerun with {UPDATE_ENV}=1\nactual:\n{}",
                path.display(),
                hex_dump(actual)
            );
        };
        let expected = hex_decode(&text);
        if expected != actual {
            let at = first_difference(&expected, actual);
            panic!(
                "golden '{}' differs at byte {at} (expected {} bytes, got {})\n\
                 expected around {at}: {}\nactual around {at}:   {}",
                path.display(),
                expected.len(),
                actual.len(),
                hex_encode(window(&expected, at)),
                hex_encode(window(actual, at)),
            );
        }
    }
}

fn window(bytes: &[u8], at: usize) -> &[u8] {
    let start = at.saturating_sub(4).min(bytes.len());
    let end = (at + 8).min(bytes.len());
    &bytes[start..end]
}

/// Index of the first byte where `a` and `b` differ, or the shorter length.
pub fn first_difference(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()))
}

/// Lower-case hex with no separators.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Hex dump with one line per 16 bytes, bytes separated by spaces.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for line in bytes.chunks(DUMP_WIDTH) {
        let words: Vec<String> = line.iter().map(|b| format!("{b:02x}")).collect();
        out.push_str(&words.join(" "));
        out.push('\n');
    }
    out
}

/// Parses hex, ignoring whitespace. Panics on malformed input.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    assert!(digits.len() % 2 == 0, "odd number of hex digits");
    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).expect("hex digits are ASCII");
            u8::from_str_radix(pair, 16).expect("Invalid hex")
        })
        .collect()
}
