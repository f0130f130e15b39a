use crate::error::{IoError, Result};
use crate::xlsx::{render_workbook, WorkbookOptions};
use brokerlink_core::{DeviceMode, Table, TemplateName};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const OUTPUT_STEM: &str = "brokers-cleaned";

pub fn default_output_name(template: &TemplateName, mode: DeviceMode) -> String {
    match mode {
        DeviceMode::Desktop => format!("{OUTPUT_STEM}_{template}.xlsx"),
        DeviceMode::Mobile => format!("{OUTPUT_STEM}_{template}_mobile.xlsx"),
    }
}

pub fn ensure_distinct_paths(input: &Path, output: &Path) -> Result<()> {
    if output == input {
        return Err(IoError::OutputMatchesInput(output.to_path_buf()));
    }
    if let (Ok(input), Ok(output)) = (fs::canonicalize(input), fs::canonicalize(output)) {
        if input == output {
            return Err(IoError::OutputMatchesInput(output));
        }
    }
    Ok(())
}

/// Writes `bytes` to a temporary file beside `path` and renames it into place,
/// so `path` is either untouched or fully written.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    if path.file_name().is_none() {
        return Err(IoError::InvalidOutputPath(path.to_path_buf()));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Renders and writes the workbook, returning the number of data rows.
pub fn export_xlsx(table: &Table, path: &Path, options: &WorkbookOptions) -> Result<usize> {
    let bytes = render_workbook(table, options)?;
    write_atomically(path, &bytes)?;
    Ok(table.len())
}

pub fn resolve_output_path(
    custom: Option<PathBuf>,
    template: &TemplateName,
    mode: DeviceMode,
) -> Result<PathBuf> {
    match custom {
        Some(path) if path.as_os_str().is_empty() || path.file_name().is_none() => {
            Err(IoError::InvalidOutputPath(path))
        }
        Some(path) => Ok(path),
        None => Ok(PathBuf::from(default_output_name(template, mode))),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        default_output_name, ensure_distinct_paths, resolve_output_path, write_atomically,
    };
    use crate::error::IoError;
    use brokerlink_core::{DeviceMode, TemplateName};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn default_output_name_marks_mobile_files() {
        let name = TemplateName::new("Vero").unwrap();
        assert_eq!(
            default_output_name(&name, DeviceMode::Desktop),
            "brokers-cleaned_vero.xlsx"
        );
        assert_eq!(
            default_output_name(&name, DeviceMode::Mobile),
            "brokers-cleaned_vero_mobile.xlsx"
        );
    }

    #[test]
    fn resolve_output_path_prefers_custom_path() {
        let name = TemplateName::new("cine").unwrap();
        let custom = PathBuf::from("out/leads.xlsx");
        assert_eq!(
            resolve_output_path(Some(custom.clone()), &name, DeviceMode::Mobile).unwrap(),
            custom
        );
        assert_eq!(
            resolve_output_path(None, &name, DeviceMode::Mobile).unwrap(),
            PathBuf::from("brokers-cleaned_cine_mobile.xlsx")
        );
        assert!(resolve_output_path(Some(PathBuf::new()), &name, DeviceMode::Desktop).is_err());
    }

    #[test]
    fn write_atomically_replaces_target() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("out.xlsx");
        fs::write(&path, b"old").expect("seed");

        write_atomically(&path, b"new").expect("write");
        assert_eq!(fs::read(&path).expect("read"), b"new");
        let entries = fs::read_dir(temp.path()).expect("read dir").count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn write_atomically_fails_without_partial_output() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("missing").join("out.xlsx");
        let err = write_atomically(&path, b"data").unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn ensure_distinct_paths_rejects_same_file() {
        let temp = TempDir::new().expect("tempdir");
        let input = temp.path().join("brokers.csv");
        fs::write(&input, "A\n").expect("seed");
        let alias = temp.path().join(".").join("brokers.csv");

        assert!(matches!(
            ensure_distinct_paths(&input, &alias),
            Err(IoError::OutputMatchesInput(_))
        ));
        assert!(ensure_distinct_paths(&input, &temp.path().join("out.xlsx")).is_ok());
    }
}
