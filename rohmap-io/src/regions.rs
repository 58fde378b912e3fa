use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use flate2::Compression;
use flate2::write::GzEncoder;

use rohmap_core::models::Region;

/// Layout of a written region list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionFormat {
    /// `chr\tstart\tend`
    #[default]
    Bed,
    /// `chr:start-end`
    Coords,
    /// TSV with ids and length, with a header line
    Ids,
    Json,
}

impl FromStr for RegionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bed" => Ok(RegionFormat::Bed),
            "coords" | "coordinates" => Ok(RegionFormat::Coords),
            "ids" | "tsv" => Ok(RegionFormat::Ids),
            "json" => Ok(RegionFormat::Json),
            _ => Err(format!("Invalid region format: {}", s)),
        }
    }
}

pub trait RegionWrite {
    ///
    /// Write regions in the given format to any writer
    ///
    /// # Arguments
    /// - writer: destination
    /// - format: line layout
    fn write_to<W: Write>(&self, writer: W, format: RegionFormat) -> io::Result<()>;

    ///
    /// Write data to disk, gzipped when the path ends in `.gz`
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    /// - format: line layout
    fn write_file<T: AsRef<Path>>(&self, path: T, format: RegionFormat) -> io::Result<()>;

    fn write_bed<T: AsRef<Path>>(&self, path: T) -> io::Result<()> {
        self.write_file(path, RegionFormat::Bed)
    }
}

impl RegionWrite for [Region] {
    fn write_to<W: Write>(&self, mut writer: W, format: RegionFormat) -> io::Result<()> {
        match format {
            RegionFormat::Bed => {
                for region in self {
                    writeln!(writer, "{}", region.bed_line())?;
                }
            }
            RegionFormat::Coords => {
                for region in self {
                    writeln!(writer, "{}", region.coordinate_string())?;
                }
            }
            RegionFormat::Ids => {
                writeln!(writer, "chrom\tstart\tend\tstart_id\tend_id\tlength")?;
                for region in self {
                    writeln!(
                        writer,
                        "{}\t{}\t{}\t{}",
                        region.bed_line(),
                        region.start_id,
                        region.end_id,
                        region.length()
                    )?;
                }
            }
            RegionFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, self).map_err(io::Error::other)?;
                writeln!(writer)?;
            }
        }
        writer.flush()
    }

    fn write_file<T: AsRef<Path>>(&self, path: T, format: RegionFormat) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = BufWriter::new(File::create(path)?);
        let is_gzipped = path.extension().is_some_and(|e| e == "gz");

        if is_gzipped {
            let mut encoder = GzEncoder::new(file, Compression::best());
            self.write_to(&mut encoder, format)?;
            encoder.finish()?;
        } else {
            self.write_to(file, format)?;
        }
        Ok(())
    }
}
