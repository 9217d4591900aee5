//! Artifact packaging into a timestamped folder.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::PackageConfig;
use crate::sink::RecordSink;

/// Copy the configured source directory's files into a freshly created
/// `{prefix}-{timestamp}` folder under the versions directory. Returns the
/// created folder path.
pub fn package_artifacts(
    config: &PackageConfig,
    sink: &dyn RecordSink,
) -> std::io::Result<PathBuf> {
    if !config.versions_dir.exists() {
        fs::create_dir_all(&config.versions_dir)?;
        sink.record(&format!(
            "Created {} directory",
            config.versions_dir.display()
        ));
    }

    let folder_name = format!(
        "{}-{}",
        config.prefix,
        Local::now().format("%Y%m%d-%H%M%S")
    );
    let folder_path = config.versions_dir.join(&folder_name);
    fs::create_dir(&folder_path)?;
    sink.record(&format!("Created package folder: {}", folder_name));

    copy_tree(&config.source_dir, &folder_path, &config.source_dir, sink)?;
    Ok(folder_path)
}

fn copy_tree(
    dir: &Path,
    dest_root: &Path,
    source_root: &Path,
    sink: &dyn RecordSink,
) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            copy_tree(&path, dest_root, source_root, sink)?;
        } else {
            let relative = path
                .strip_prefix(source_root)
                .unwrap_or(&path)
                .to_path_buf();
            let dest_path = dest_root.join(&relative);
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&path, &dest_path)?;
            sink.record(&format!("  Copied: {}", relative.display()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn test_packages_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("artifact");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("manifest.json"), "{}").unwrap();
        fs::write(source.join("sub/icon.png"), "png").unwrap();

        let config = PackageConfig {
            source_dir: source,
            versions_dir: dir.path().join("versions"),
            prefix: "Pack".to_string(),
        };
        let sink = MemorySink::new();
        let folder = package_artifacts(&config, &sink).unwrap();

        assert!(folder.join("manifest.json").exists());
        assert!(folder.join("sub/icon.png").exists());
        assert!(folder
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("Pack-"));
        assert!(sink
            .messages()
            .iter()
            .any(|m| m == "  Copied: manifest.json"));
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = PackageConfig {
            source_dir: dir.path().join("does-not-exist"),
            versions_dir: dir.path().join("versions"),
            prefix: "Pack".to_string(),
        };
        let sink = MemorySink::new();
        assert!(package_artifacts(&config, &sink).is_err());
    }
}
