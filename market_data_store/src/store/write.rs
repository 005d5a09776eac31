//! Atomic feather writes.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::DataFrame;
use polars_io::SerWriter;
use polars_io::ipc::IpcWriter;
use uuid::Uuid;

use crate::errors::Error;

/// Write a DataFrame to `path` via a temp file plus rename.
///
/// The temp file lives in the destination directory so the rename stays on
/// one filesystem and is atomic on POSIX; a concurrent reader sees either the
/// old file or the new one, never a partial write. The temp file is removed
/// on write failure.
pub fn write_frame_atomic(df: &mut DataFrame, path: &Path) -> Result<(), Error> {
    let dir = path.parent().ok_or_else(|| {
        Error::Config(format!("destination {} has no parent directory", path.display()))
    })?;
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Config(format!("bad destination file name {}", path.display())))?;
    let tmp_path = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

    let result = (|| -> Result<(), Error> {
        let mut file = File::create(&tmp_path)?;
        IpcWriter::new(&mut file).finish(df)?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::read::read_frame;
    use polars::prelude::*;

    #[test]
    fn write_creates_parent_dirs_and_no_temp_residue() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a/b/c.feather");
        let mut df = df!("x" => vec![1i64, 2, 3]).unwrap();

        write_frame_atomic(&mut df, &dest).unwrap();

        let back = read_frame(&dest).unwrap();
        assert_eq!(back.height(), 3);

        let leftovers: Vec<_> = std::fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn rewrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("x.feather");

        let mut first = df!("x" => vec![1i64]).unwrap();
        write_frame_atomic(&mut first, &dest).unwrap();
        let mut second = df!("x" => vec![1i64, 2]).unwrap();
        write_frame_atomic(&mut second, &dest).unwrap();

        assert_eq!(read_frame(&dest).unwrap().height(), 2);
    }
}
