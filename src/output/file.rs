use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::atlas::AtlasCanvas;
use crate::error::{FormatError, PackError};
use crate::format::{read_atlas, write_atlas};

/// Write an atlas record to `path`.
///
/// The record goes to a sibling `.tmp` file first and is renamed into place
/// once fully flushed. On failure the temporary file is removed, so `path`
/// either holds a complete record or is left as it was.
pub fn save_atlas(atlas: &AtlasCanvas, path: &Path) -> Result<(), PackError> {
    let tmp_path = temp_path(path);

    if let Err(source) = write_to(&tmp_path, atlas) {
        // Best effort; the original error is the one worth reporting
        let _ = fs::remove_file(&tmp_path);
        return Err(PackError::AtlasWrite {
            path: path.to_path_buf(),
            source,
        });
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        PackError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

fn write_to(path: &Path, atlas: &AtlasCanvas) -> Result<(), FormatError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_atlas(&mut writer, atlas)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read an atlas file. The file must hold exactly one record.
pub fn load_atlas(path: &Path) -> Result<AtlasCanvas, FormatError> {
    let mut reader = BufReader::new(File::open(path)?);
    let atlas = read_atlas(&mut reader)?;

    let trailing = io::copy(&mut reader, &mut io::sink())?;
    if trailing > 0 {
        return Err(FormatError::TrailingData(trailing));
    }
    Ok(atlas)
}

/// File name of an atlas record: `{base}_{index}.atl`
pub fn atlas_filename(base_name: &str, index: usize) -> String {
    format!("{}_{}.atl", base_name, index)
}
