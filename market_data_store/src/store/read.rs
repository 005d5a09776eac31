//! Reading feather files back into DataFrames.

use std::fs::File;
use std::path::Path;

use polars::prelude::DataFrame;
use polars_io::SerReader;
use polars_io::ipc::IpcReader;

use crate::errors::Error;
use crate::store::layout::FEATHER_EXT;

/// Read one feather file into a DataFrame.
pub fn read_frame(path: &Path) -> Result<DataFrame, Error> {
    let file = File::open(path)?;
    let df = IpcReader::new(file).finish()?;
    Ok(df)
}

/// Read and vertically concatenate every feather file in a partition
/// directory, in lexicographic filename order.
///
/// Returns `NotFound` when the directory is missing or contains no feather
/// files. In-flight temp files from concurrent writers are ignored; only
/// files with the `.feather` extension are read.
pub fn read_partition(dir: &Path) -> Result<DataFrame, Error> {
    if !dir.is_dir() {
        return Err(Error::NotFound(format!(
            "partition directory {} does not exist",
            dir.display()
        )));
    }

    let mut files: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(FEATHER_EXT))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(Error::NotFound(format!(
            "partition directory {} holds no feather files",
            dir.display()
        )));
    }

    let mut combined: Option<DataFrame> = None;
    for path in &files {
        let df = read_frame(path)?;
        combined = Some(match combined {
            Some(acc) => acc.vstack(&df)?,
            None => df,
        });
    }
    // files is non-empty, so combined is always Some here.
    combined.ok_or_else(|| Error::NotFound(format!("{} is empty", dir.display())))
}
