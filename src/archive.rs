//! Optional packaging of run artifacts.
//!
//! Copies the text tables and figure files of a run directory into a network_shape/
//! sub directory and bundles that into a single network_shape.zip for downloading.


use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// extensions worth bundling : point tables and engine figures
const BUNDLED_EXTENSIONS: [&str; 3] = ["txt", "png", "fig"];

/// copy the bundled artifacts into <directory>/network_shape/ and zip that directory.
/// Returns the path of the archive.
pub fn bundle_artifacts(directory: &Path) -> anyhow::Result<PathBuf> {
    let dest = directory.join("network_shape");
    if dest.is_dir() {
        fs::remove_dir_all(&dest)?;
    }
    fs::create_dir(&dest)?;
    //
    let mut copied = Vec::<OsString>::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let bundled = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| BUNDLED_EXTENSIONS.contains(&e))
            .unwrap_or(false);
        if bundled {
            let name = path.file_name().unwrap().to_os_string();
            fs::copy(&path, dest.join(&name))?;
            copied.push(name);
        }
    }
    log::info!("bundling {} artifacts from {:?}", copied.len(), directory);
    //
    let zip_path = directory.join("network_shape.zip");
    let file = File::create(&zip_path)?;
    let mut zipw = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for name in &copied {
        zipw.start_file(name.to_string_lossy(), options)?;
        let data = fs::read(dest.join(name))?;
        zipw.write_all(&data)?;
    }
    zipw.finish()?;
    Ok(zip_path)
} // end of bundle_artifacts

// end of mod tests
