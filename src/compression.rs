use std::io::Write;
use std::str::FromStr;

use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

const GZIP_DEFAULT_LEVEL: u8 = 6;
const LZ4_DEFAULT_LEVEL: u8 = 0;
const ZSTD_DEFAULT_LEVEL: u8 = 0;

/// Compression format
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Compression {
    /// The bzip2 format
    Bzip2,
    /// The gzip format with compression level as associated value
    Gzip(u8),
    /// The lz4 format with compression level as associated value
    Lz4(u8),
    /// The zstd format with compression level as associated value
    Zstd(u8),
}

impl Compression {
    /// Wrap a writer so that everything written is compressed to this
    /// format
    pub fn wrap<'a, W: 'a + Write>(
        self,
        writer: W,
    ) -> Result<Box<dyn Write + 'a>, std::io::Error> {
        match self {
            Self::Bzip2 => {
                let encoder =
                    BzEncoder::new(writer, bzip2::Compression::best());
                Ok(Box::new(encoder))
            }
            Self::Gzip(lvl) => {
                let encoder = GzEncoder::new(
                    writer,
                    flate2::Compression::new(lvl.into()),
                );
                Ok(Box::new(encoder))
            }
            Self::Lz4(lvl) => {
                let encoder = lz4::EncoderBuilder::new()
                    .auto_flush(true)
                    .level(lvl.into())
                    .build(writer)?;
                Ok(Box::new(encoder))
            }
            Self::Zstd(lvl) => {
                let encoder = zstd::Encoder::new(writer, lvl.into())?;
                Ok(Box::new(encoder.auto_finish()))
            }
        }
    }
}

/// Convert into a writer that compresses to the given format
pub fn compress_writer<'a, W: 'a + Write>(
    writer: W,
    compression: Option<Compression>,
) -> Result<Box<dyn Write + 'a>, std::io::Error> {
    match compression {
        Some(compression) => compression.wrap(writer),
        None => Ok(Box::new(writer)),
    }
}

lazy_static! {
    static ref COMPRESSION_RE: Regex =
        Regex::new(r"^(?P<algo>[[:alnum:]]+)(?P<lvl>_\d+)?$").unwrap();
}

impl FromStr for Compression {
    type Err = ParseCompressionErr;

    /// Parse a compression specification of the form `algo` or
    /// `algo_level`, e.g. `bzip2` or `zstd_5`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Compression::*;
        use ParseCompressionErr::*;

        let lower_case = s.to_ascii_lowercase();
        let Some(captures) = COMPRESSION_RE.captures(&lower_case) else {
            return Err(UnknownAlgorithm(s.to_owned()));
        };
        let algo = &captures["algo"];
        let lvl_str = &captures.name("lvl");
        match algo {
            "bzip2" | "bz2" => {
                if let Some(lvl_str) = lvl_str {
                    Err(UnsupportedLevel(
                        algo.into(),
                        lvl_str.as_str().to_owned(),
                    ))
                } else {
                    Ok(Bzip2)
                }
            }
            "gzip" | "gz" => {
                if let Some(lvl_str) = lvl_str {
                    match lvl_str.as_str()[1..].parse::<u8>() {
                        Ok(lvl) if lvl <= 9 => Ok(Gzip(lvl)),
                        _ => Err(UnsupportedLevel(
                            algo.into(),
                            lvl_str.as_str().to_owned(),
                        )),
                    }
                } else {
                    Ok(Gzip(GZIP_DEFAULT_LEVEL))
                }
            }
            "lz4" => {
                if let Some(lvl_str) = lvl_str {
                    match lvl_str.as_str()[1..].parse::<u8>() {
                        Ok(lvl) if lvl <= 16 => Ok(Lz4(lvl)),
                        _ => Err(UnsupportedLevel(
                            algo.into(),
                            lvl_str.as_str().to_owned(),
                        )),
                    }
                } else {
                    Ok(Lz4(LZ4_DEFAULT_LEVEL))
                }
            }
            "zstd" | "zstandard" => {
                if let Some(lvl_str) = lvl_str {
                    match lvl_str.as_str()[1..].parse::<u8>() {
                        Ok(lvl) if lvl <= 19 => Ok(Zstd(lvl)),
                        _ => Err(UnsupportedLevel(
                            algo.into(),
                            lvl_str.as_str().to_owned(),
                        )),
                    }
                } else {
                    Ok(Zstd(ZSTD_DEFAULT_LEVEL))
                }
            }
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseCompressionErr {
    #[error("Unknown compression algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("Level {1} not supported for {0} compression")]
    UnsupportedLevel(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("bzip2".parse(), Ok(Compression::Bzip2));
        assert_eq!("GZIP".parse(), Ok(Compression::Gzip(6)));
        assert_eq!("zstd_5".parse(), Ok(Compression::Zstd(5)));
        assert!("zstd_99".parse::<Compression>().is_err());
        assert!("bzip2_3".parse::<Compression>().is_err());
        assert!("7z".parse::<Compression>().is_err());
    }
}
