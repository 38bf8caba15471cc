use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};

/// Deflate level for everything except `mimetype`.
const COMPRESSION_LEVEL: i64 = 9;

/// Archive a staging tree into an EPUB file at `output`.
///
/// ```no_run
/// use epub_gen::write_archive;
///
/// write_archive("/tmp/epub-gen/1b4e28ba", "book.epub")?;
/// # Ok::<(), epub_gen::Error>(())
/// ```
pub fn write_archive<P: AsRef<Path>, Q: AsRef<Path>>(root: P, output: Q) -> Result<()> {
    let file = File::create(output)?;
    write_archive_to_writer(root.as_ref(), file)
}

/// Archive a staging tree into any [`Write`] + [`Seek`] destination.
///
/// `mimetype` is written first and stored; `META-INF` and `OEBPS` follow
/// in file-name order, deflated.
pub fn write_archive_to_writer<W: Write + Seek>(root: &Path, writer: W) -> Result<()> {
    let mut zip = ZipWriter::new(writer);

    let options_stored =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let options_deflate = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    zip.start_file("mimetype", options_stored)?;
    io::copy(&mut File::open(root.join("mimetype"))?, &mut zip)?;

    for dir in ["META-INF", "OEBPS"] {
        for entry in WalkDir::new(root.join(dir)).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let name = archive_name(root, entry.path())?;
            if entry.file_type().is_dir() {
                zip.add_directory(name, options_deflate)?;
            } else {
                zip.start_file(name, options_deflate)?;
                io::copy(&mut File::open(entry.path())?, &mut zip)?;
            }
        }
    }

    zip.finish()?;
    Ok(())
}

/// `/`-separated path of `path` relative to `root`.
fn archive_name(root: &Path, path: &Path) -> io::Result<String> {
    let relative = path.strip_prefix(root).map_err(io::Error::other)?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Ok(parts.join("/"))
}

/// Archive `root` into `output` on a blocking worker, then remove `root`.
///
/// If archiving fails the staging tree is left in place. A failure to
/// remove it after a successful archive is reported as [`Error::Cleanup`].
pub async fn archive_and_clean(root: PathBuf, output: PathBuf) -> Result<PathBuf> {
    info!(output = %output.display(), "zipping staging directory");
    let (root, output) = tokio::task::spawn_blocking(move || {
        write_archive(&root, &output).map(|()| (root, output))
    })
    .await??;

    info!(staging = %root.display(), "done zipping, clearing staging directory");
    tokio::fs::remove_dir_all(&root)
        .await
        .map_err(|source| Error::Cleanup { path: root, source })?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use tempfile::TempDir;
    use zip::ZipArchive;

    use super::*;

    fn staging() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("mimetype"), "application/epub+zip").unwrap();
        std::fs::create_dir_all(root.join("META-INF")).unwrap();
        std::fs::write(root.join("META-INF/container.xml"), "<container/>").unwrap();
        std::fs::create_dir_all(root.join("OEBPS/images")).unwrap();
        std::fs::write(root.join("OEBPS/b.xhtml"), "<html/>").unwrap();
        std::fs::write(root.join("OEBPS/a.xhtml"), "<html/>").unwrap();
        std::fs::write(root.join("OEBPS/images/x.png"), [0u8, 1, 2]).unwrap();
        dir
    }

    #[test]
    fn test_mimetype_first_and_stored() {
        let dir = staging();
        let mut buf = Cursor::new(Vec::new());
        write_archive_to_writer(dir.path(), &mut buf).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), zip::CompressionMethod::Stored);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "application/epub+zip");
    }

    #[test]
    fn test_entries_are_deflated_and_ordered() {
        let dir = staging();
        let mut buf = Cursor::new(Vec::new());
        write_archive_to_writer(dir.path(), &mut buf).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        let a = names.iter().position(|n| n == "OEBPS/a.xhtml").unwrap();
        let b = names.iter().position(|n| n == "OEBPS/b.xhtml").unwrap();
        assert!(a < b);
        assert!(names.iter().any(|n| n == "OEBPS/images/x.png"));
        assert!(names.iter().any(|n| n == "META-INF/container.xml"));

        let entry = archive.by_name("OEBPS/a.xhtml").unwrap();
        assert_eq!(entry.compression(), zip::CompressionMethod::Deflated);
    }

    #[tokio::test]
    async fn test_archive_and_clean_removes_staging() {
        let dir = staging();
        let out_dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir(&root).unwrap();
        for name in ["mimetype", "META-INF", "OEBPS"] {
            std::fs::rename(dir.path().join(name), root.join(name)).unwrap();
        }

        let output = out_dir.path().join("book.epub");
        let written = archive_and_clean(root.clone(), output.clone()).await.unwrap();
        assert_eq!(written, output);
        assert!(output.is_file());
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_failed_archive_keeps_staging() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir(&root).unwrap();
        let err = archive_and_clean(root.clone(), dir.path().join("book.epub"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(root.exists());
    }
}
