use crate::core::error::ReportError;
use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

pub fn check_file_exists(path: &Path) -> Result<(), ReportError> {
    if !path.is_file() {
        return Err(ReportError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    File::open(path).map_err(|source| ReportError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Creates the parent directory of `output` when needed and checks that a
/// file can be created inside it. Returns the directory.
pub fn ensure_output_dir(output: &Path) -> Result<PathBuf, ReportError> {
    let unwritable = |dir: &Path| ReportError::UnwritableOutputDirectory {
        path: dir.to_path_buf(),
    };
    let abs = std::path::absolute(output).map_err(|_| unwritable(output))?;
    let dir = match abs.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|_| unwritable(&dir))?;
    }
    if !dir.is_dir() {
        return Err(unwritable(&dir));
    }
    let probe = dir.join(format!(".asmqc-report-{}.probe", std::process::id()));
    match OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            Ok(dir)
        }
        Err(_) => Err(unwritable(&dir)),
    }
}

pub fn detect_input_kind(path: &Path) -> Result<InputKind, ReportError> {
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        if ext.eq_ignore_ascii_case("gz") {
            return Ok(InputKind::Gzip);
        }
    }
    let mut file = open_readable(path)?;
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    if n == 2 && magic == [0x1f, 0x8b] {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

/// Reads a whole input file as text. Gzip input is decompressed; bytes
/// that are not valid UTF-8 are decoded as Latin-1.
pub fn read_text(path: &Path) -> Result<String, ReportError> {
    check_file_exists(path)?;
    let kind = detect_input_kind(path)?;
    let file = open_readable(path)?;
    let mut bytes = Vec::new();
    match kind {
        InputKind::Plain => {
            BufReader::new(file).read_to_end(&mut bytes)?;
        }
        InputKind::Gzip => {
            MultiGzDecoder::new(BufReader::new(file))
                .read_to_end(&mut bytes)
                .map_err(|source| ReportError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
    }
    Ok(decode_text(bytes))
}

pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// Drops blank lines and `#` comments and trims the rest.
pub fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .map(str::trim)
        .collect()
}

/// Writes `bytes` to a temporary sibling of `path` and renames it into
/// place, so a failed run never leaves a truncated file at `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid output path {}", path.display()))?;
    let tmp_path = tmp_sibling(path, file_name);

    match fs::write(&tmp_path, bytes)
        .with_context(|| format!("failed to create {}", tmp_path.display()))
    {
        Ok(()) => {
            if let Err(e) = fs::rename(&tmp_path, path) {
                let _ = fs::remove_file(&tmp_path);
                return Err(e)
                    .with_context(|| format!("failed to move output to {}", path.display()));
            }
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

/// Hidden per-process temporary name next to `path`.
fn tmp_sibling(path: &Path, file_name: &str) -> PathBuf {
    path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}

fn open_readable(path: &Path) -> Result<File, ReportError> {
    File::open(path).map_err(|source| ReportError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}
