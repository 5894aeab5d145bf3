use std::{
    fs::{self, File},
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{G2pError, Result};

/// Opens `path` for reading, turning a not-found error into [`G2pError::MissingFile`].
pub fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => G2pError::MissingFile(path.to_path_buf()),
        _ => G2pError::Io(e),
    })
}

pub fn read_to_string(path: &Path) -> Result<String> {
    let mut data = String::new();
    open(path)?.read_to_string(&mut data)?;
    Ok(data)
}

/// Reads a latin-1 encoded file. Every byte maps to the code point of the same value.
pub fn read_latin1(path: &Path) -> Result<String> {
    let mut bytes = Vec::new();
    open(path)?.read_to_end(&mut bytes)?;
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Reads a UTF-8 file into lines, without line terminators.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(read_to_string(path)?.lines().map(str::to_string).collect())
}

/// Writes one record per line, creating parent directories as needed.
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(wtr, "{}", line.as_ref())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut wtr, value)?;
    wtr.flush()?;
    Ok(())
}

/// Progress bar for long per-line loops.
pub fn line_progress(total: usize, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(label.to_string());
    pb
}
