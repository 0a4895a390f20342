use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::app::{ProduceReport, ProgressEvent, ProgressSink};
use crate::domain::Acronym;
use crate::error::LodeError;

/// Writes `<output_dir>/<acronym>.html`, creating the directory on demand and
/// replacing any previous file.
pub fn write_document(
    output_dir: &Utf8Path,
    acronym: &Acronym,
    content: &str,
) -> Result<Utf8PathBuf, LodeError> {
    fs::create_dir_all(output_dir.as_std_path())
        .map_err(|err| LodeError::Filesystem(format!("create {output_dir}: {err}")))?;
    let dest = output_dir.join(acronym.file_name());
    let mut temp = tempfile::Builder::new()
        .prefix("static-lode")
        .tempfile_in(output_dir.as_std_path())
        .map_err(|err| LodeError::Filesystem(err.to_string()))?;
    temp.write_all(content.as_bytes())
        .map_err(|err| LodeError::Filesystem(format!("write {dest}: {err}")))?;
    #[cfg(unix)]
    temp.as_file()
        .set_permissions(document_permissions(&dest))
        .map_err(|err| LodeError::Filesystem(format!("chmod {dest}: {err}")))?;
    temp.persist(dest.as_std_path())
        .map_err(|err| LodeError::Filesystem(format!("persist {dest}: {err}")))?;
    Ok(dest)
}

/// Mode of a previous file at `dest`, otherwise world-readable 0644.
#[cfg(unix)]
fn document_permissions(dest: &Utf8Path) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(dest.as_std_path()) {
        Ok(meta) if meta.is_file() => meta.permissions(),
        _ => fs::Permissions::from_mode(0o644),
    }
}

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Console,
    Json,
}

pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => eprintln!("{} ({:.1}s)", event.message, elapsed.as_secs_f64()),
            None => eprintln!("{}", event.message),
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_report(report: &ProduceReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}
