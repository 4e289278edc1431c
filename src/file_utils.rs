use crate::error::{EtlError, Result};
use std::path::{Path, PathBuf};

/// Lista los `*.csv` del directorio, ordenados por ruta.
/// An empty listing is the fatal `NoInputFiles` error.
pub fn discover_input_files(raw_dir: &Path) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&raw_dir.to_string_lossy());
    let pattern = format!("{}/*.csv", escaped);

    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(EtlError::NoInputFiles(raw_dir.to_path_buf()));
    }
    Ok(files)
}

/// Crea un directorio si no existe
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Calcula el tamaño de un archivo en bytes
pub fn get_file_size(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

/// Formatea bytes en formato legible (KB, MB, GB)
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discovers_csv_files_in_sorted_order() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b_2021.csv"), "anio\n").unwrap();
        std::fs::write(dir.path().join("a_2020.csv"), "anio\n").unwrap();
        std::fs::write(dir.path().join("notas.txt"), "x").unwrap();

        let files = discover_input_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a_2020.csv", "b_2021.csv"]);
    }

    #[test]
    fn empty_directory_is_fatal() {
        let dir = tempdir().unwrap();
        match discover_input_files(dir.path()) {
            Err(EtlError::NoInputFiles(path)) => assert_eq!(path, dir.path()),
            other => panic!("expected NoInputFiles, got {:?}", other),
        }
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }
}
