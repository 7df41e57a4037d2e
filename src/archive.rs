//! Tar.gz creation for completed staging directories.

use crate::utils::errors::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::Path;
use tar::Builder;

/// Bundle the contents of `staging_dir` into a gzip-compressed tarball at
/// `archive_path`, with entry paths relative to the staging root.
///
/// Returns the size of the finished archive in bytes. The staging
/// directory is left untouched either way; the caller owns its cleanup.
pub fn create_tar_gz(staging_dir: &Path, archive_path: &Path) -> Result<u64> {
    let file = File::create(archive_path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);

    builder.append_dir_all(".", staging_dir)?;

    let encoder = builder.into_inner()?;
    encoder.finish()?;

    Ok(std::fs::metadata(archive_path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::fs;
    use std::io::Read;
    use tar::Archive;
    use tempfile::TempDir;

    fn archived_names(archive_path: &Path) -> Vec<String> {
        let file = File::open(archive_path).unwrap();
        let mut archive = Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                entry
                    .unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_archive_contains_staging_files() {
        let temp_dir = TempDir::new().unwrap();
        let staging = temp_dir.path().join("staging");
        fs::create_dir(&staging).unwrap();
        fs::write(staging.join("a.txt"), b"alpha").unwrap();
        fs::write(staging.join("b.txt"), b"beta").unwrap();

        let archive_path = temp_dir.path().join("bundle.tar.gz");
        let size = create_tar_gz(&staging, &archive_path).unwrap();

        assert!(size > 0);
        assert_eq!(size, fs::metadata(&archive_path).unwrap().len());

        let names = archived_names(&archive_path);
        assert!(names.iter().any(|n| n.ends_with("a.txt")));
        assert!(names.iter().any(|n| n.ends_with("b.txt")));
    }

    #[test]
    fn test_archived_bytes_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let staging = temp_dir.path().join("staging");
        fs::create_dir(&staging).unwrap();
        fs::write(staging.join("payload.bin"), b"payload bytes").unwrap();

        let archive_path = temp_dir.path().join("bundle.tar.gz");
        create_tar_gz(&staging, &archive_path).unwrap();

        let file = File::open(&archive_path).unwrap();
        let mut archive = Archive::new(GzDecoder::new(file));
        let mut found = false;
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.path().unwrap().ends_with("payload.bin") {
                let mut contents = Vec::new();
                entry.read_to_end(&mut contents).unwrap();
                assert_eq!(contents, b"payload bytes");
                found = true;
            }
        }
        assert!(found);
    }

    #[test]
    fn test_failure_leaves_staging_intact() {
        let temp_dir = TempDir::new().unwrap();
        let staging = temp_dir.path().join("staging");
        fs::create_dir(&staging).unwrap();
        fs::write(staging.join("a.txt"), b"alpha").unwrap();

        // A directory already occupies the destination path
        let archive_path = temp_dir.path().join("bundle.tar.gz");
        fs::create_dir(&archive_path).unwrap();

        assert!(create_tar_gz(&staging, &archive_path).is_err());
        assert!(staging.join("a.txt").exists());
    }
}
