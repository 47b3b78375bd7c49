use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;
use variant_count::VariantCount;

use crate::config::Config;
use crate::segy::{SegyError, TraceDecoder, TraceSummary};

/// File name suffixes recognised as SEG-Y. Matching is case-sensitive.
pub const SEGY_EXTENSIONS: [&str; 2] = [".SEGY", ".SGY"];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("unable to read directory {}", .0.display())]
    ReadDir(PathBuf, #[source] io::Error),
    #[error("no SEG-Y files found in directory {}", .0.display())]
    NoFilesFound(PathBuf),
    #[error("unable to read header of {name}")]
    Probe {
        name: String,
        #[source]
        source: SegyError,
    },
    #[error("no such acquisition mode")]
    NoSuchMode,
    #[error("unable to write listing")]
    Output(#[from] io::Error),
}

/// Which family of recordings to browse.
#[derive(Debug, PartialEq, Eq, Copy, Clone, VariantCount)]
pub enum AcquisitionMode {
    Active,
    Passive,
}

impl AcquisitionMode {
    /// Menu number shown to the user.
    pub fn menu_number(self) -> usize {
        match self {
            AcquisitionMode::Active => 1,
            AcquisitionMode::Passive => 2,
        }
    }

    /// Folder holding this mode's files.
    pub fn directory(self, config: &Config) -> PathBuf {
        config.mode_dir(self == AcquisitionMode::Active)
    }

    pub fn label(self, config: &Config) -> &str {
        match self {
            AcquisitionMode::Active => &config.active_dir,
            AcquisitionMode::Passive => &config.passive_dir,
        }
    }

    pub fn all() -> [AcquisitionMode; AcquisitionMode::VARIANT_COUNT] {
        [AcquisitionMode::Active, AcquisitionMode::Passive]
    }
}

impl TryFrom<usize> for AcquisitionMode {
    type Error = CatalogError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        let res = match value {
            1 => AcquisitionMode::Active,
            2 => AcquisitionMode::Passive,
            _ => return Err(CatalogError::NoSuchMode),
        };
        Ok(res)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub size_mb: f64,
    /// Filled in by [`Catalog::probe_all`].
    pub summary: Option<TraceSummary>,
}

/// The SEG-Y files of one directory, sorted by name.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    entries: Vec<CatalogEntry>,
}

pub fn is_segy_name(name: &str) -> bool {
    SEGY_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

impl Catalog {
    /// List the regular files of `dir` carrying a SEG-Y extension. An
    /// empty result is not an error here, see [`Catalog::require_files`].
    pub fn scan(dir: &Path) -> Result<Catalog, CatalogError> {
        let read = fs::read_dir(dir).map_err(|e| CatalogError::ReadDir(dir.to_path_buf(), e))?;
        let mut entries = Vec::new();
        for item in read {
            let item = item.map_err(|e| CatalogError::ReadDir(dir.to_path_buf(), e))?;
            let Ok(name) = item.file_name().into_string() else {
                debug!("skipping non UTF-8 name {:?}", item.file_name());
                continue;
            };
            if !is_segy_name(&name) {
                continue;
            }
            let meta = item
                .metadata()
                .map_err(|e| CatalogError::ReadDir(dir.to_path_buf(), e))?;
            if !meta.is_file() {
                debug!("skipping {name}: not a regular file");
                continue;
            }
            entries.push(CatalogEntry {
                name,
                size_mb: meta.len() as f64 / (1024.0 * 1024.0),
                summary: None,
            });
        }
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        debug!("found {} SEG-Y files in {}", entries.len(), dir.display());
        Ok(Catalog {
            dir: dir.to_path_buf(),
            entries,
        })
    }

    /// Fail with [`CatalogError::NoFilesFound`] when nothing was listed.
    pub fn require_files(self) -> Result<Catalog, CatalogError> {
        if self.entries.is_empty() {
            return Err(CatalogError::NoFilesFound(self.dir));
        }
        Ok(self)
    }

    /// Read the trace count and length of every entry.
    pub fn probe_all<D: TraceDecoder>(&mut self, decoder: &D) -> Result<(), CatalogError> {
        for entry in self.entries.iter_mut() {
            let path = self.dir.join(&entry.name);
            let summary = decoder.probe(&path).map_err(|source| CatalogError::Probe {
                name: entry.name.clone(),
                source,
            })?;
            entry.summary = Some(summary);
        }
        Ok(())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the directory tree with per-file sizes and, once probed,
    /// trace counts.
    pub fn render_tree<W: Write>(&self, out: &mut W) -> Result<(), CatalogError> {
        writeln!(out, "Directory: {}", self.dir.display())?;
        writeln!(out, "Contents:")?;
        for entry in &self.entries {
            writeln!(out, "├── {} ({:.2} MB)", entry.name, entry.size_mb)?;
            if let Some(summary) = entry.summary {
                writeln!(out, "    ├── Traces: {}", summary.trace_count)?;
                writeln!(out, "    └── Samples per trace: {}", summary.samples_per_trace)?;
            }
        }
        Ok(())
    }

    /// Write the numbered pick list used by the file prompt.
    pub fn render_choices<W: Write>(&self, out: &mut W) -> Result<(), CatalogError> {
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(out, "{i}: {}", entry.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segy::SegyDecoder;
    use crate::segy::SegyWriter;

    fn touch(dir: &Path, name: &str, bytes: usize) {
        fs::write(dir.join(name), vec![0u8; bytes]).expect("write");
    }

    #[test]
    fn scan_filters_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "b.SGY", 10);
        touch(dir.path(), "a.SEGY", 1024 * 1024);
        touch(dir.path(), "B.SGY", 10);
        touch(dir.path(), "c.segy", 10);
        touch(dir.path(), "notes.txt", 10);
        fs::create_dir(dir.path().join("d.SEGY")).expect("mkdir");
        let catalog = Catalog::scan(dir.path()).expect("scan");
        let names: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B.SGY", "a.SEGY", "b.SGY"]);
        assert!((catalog.entries()[1].size_mb - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_directory_is_an_error_when_required() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = Catalog::scan(dir.path()).expect("scan");
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.require_files(),
            Err(CatalogError::NoFilesFound(_))
        ));
    }

    #[test]
    fn tree_lists_probed_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let f = fs::File::create(dir.path().join("line1.SGY")).expect("create");
        SegyWriter::new(1000)
            .write(f, [[0.0_f32; 8], [1.0; 8], [2.0; 8]].iter())
            .expect("write");
        let mut catalog = Catalog::scan(dir.path()).expect("scan").require_files().expect("files");
        catalog.probe_all(&SegyDecoder).expect("probe");
        let mut out = Vec::new();
        catalog.render_tree(&mut out).expect("render");
        catalog.render_choices(&mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        let expected = format!(
            "Directory: {}\nContents:\n├── line1.SGY (0.00 MB)\n    ├── Traces: 3\n    └── Samples per trace: 8\n0: line1.SGY\n",
            dir.path().display()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn probe_failure_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "broken.SEGY", 100);
        let mut catalog = Catalog::scan(dir.path()).expect("scan");
        let err = catalog.probe_all(&SegyDecoder).err().expect("error");
        assert!(matches!(err, CatalogError::Probe { ref name, .. } if name == "broken.SEGY"));
    }

    #[test]
    fn modes_map_to_folders() {
        let config = Config::default();
        assert_eq!(AcquisitionMode::all().len(), 2);
        let mode = AcquisitionMode::try_from(2).expect("mode");
        assert_eq!(mode, AcquisitionMode::Passive);
        assert_eq!(mode.directory(&config), PathBuf::from("Data/Sismica Passiva"));
        assert!(AcquisitionMode::try_from(3).is_err());
    }
}
