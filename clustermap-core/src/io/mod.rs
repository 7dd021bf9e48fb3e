// Imports
use std::{
    io::{Read, Write},
    path::Path,
};

use itertools::Itertools;
use ndarray::Array2;
use thiserror::Error;

use crate::{clustering::Linkage, data::Frame};

#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// The first column holds sample names rather than a feature
    pub index_column: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',', index_column: false }
    }
}

pub fn read_frame_from_file<Q: AsRef<Path>>(
    filepath: Q,
    options: &CsvOptions,
) -> Result<Frame, Error> {
    let filepath: &Path = filepath.as_ref();

    let compression =
        filepath.extension().and_then(|s| s.to_str()).map(CompressionMethod::from).unwrap_or_default();

    read_frame(std::fs::OpenOptions::new().read(true).open(filepath)?, &compression, options)
}

pub fn read_frame<R: Read>(
    input: R,
    compression: &CompressionMethod,
    options: &CsvOptions,
) -> Result<Frame, Error> {
    let csv_string = compression.decompress_to_string(input)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_string.as_bytes());

    let skip = usize::from(options.index_column);
    let columns = reader.headers()?.iter().skip(skip).map(str::to_string).collect_vec();

    let mut index: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    let mut nb_rows: usize = 0;

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line() as usize);
        if options.index_column {
            index.push(record.get(0).unwrap_or_default().to_string());
        }
        for (field, column) in record.iter().skip(skip).zip_eq(columns.iter()) {
            let value = field.parse::<f64>().map_err(|_| CsvParsingError::InvalidFloat {
                line,
                column: column.clone(),
                field: field.to_string(),
            })?;
            values.push(value);
        }
        nb_rows += 1;
    }

    let values = Array2::from_shape_vec((nb_rows, columns.len()), values)
        .map_err(|_| CsvParsingError::Shape(nb_rows, columns.len()))?;

    Ok(Frame::new(columns, options.index_column.then_some(index), values)?)
}

/// Writes a labelled square matrix, the first header cell is left empty
pub fn write_matrix<W: Write>(
    output: W,
    labels: &[String],
    matrix: &Array2<f64>,
) -> Result<W, Error> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(std::iter::once("").chain(labels.iter().map(String::as_str)))?;
    for (label, row) in labels.iter().zip_eq(matrix.rows()) {
        writer.write_record(std::iter::once(label.clone()).chain(row.iter().map(f64::to_string)))?;
    }

    writer.into_inner().map_err(|e| Error::IO(e.into_error()))
}

/// Writes the merge table as `left,right,distance,size` records
pub fn write_linkage<W: Write>(
    output: W,
    linkage: &Linkage,
) -> Result<W, Error> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["left", "right", "distance", "size"])?;
    for merge in linkage.merges() {
        writer.write_record([
            merge.left.to_string(),
            merge.right.to_string(),
            merge.height.to_string(),
            merge.size.to_string(),
        ])?;
    }

    writer.into_inner().map_err(|e| Error::IO(e.into_error()))
}

pub fn write_to_file<Q, F>(
    filepath: Q,
    compression: &CompressionMethod,
    write_fn: F,
) -> Result<(), Error>
where
    Q: AsRef<Path>,
    F: FnOnce(Vec<u8>) -> Result<Vec<u8>, Error>,
{
    let data = write_fn(Vec::new())?;
    let file = compression.compress(
        &data,
        std::fs::OpenOptions::new().create(true).write(true).truncate(true).open(filepath)?,
    )?;
    file.sync_all()?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub enum CompressionMethod {
    Gzip(u8),
    Zstd(u8),
    #[default]
    None,
}

impl From<&str> for CompressionMethod {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "gz" | "gzip" => Self::Gzip(5),
            "zst" | "zstd" => Self::Zstd(12),
            _ => Self::None,
        }
    }
}

impl CompressionMethod {
    /// Same method as `self`, with the level swapped out
    pub fn with_level(
        self,
        level: u8,
    ) -> Self {
        match self {
            Self::Gzip(_) => Self::Gzip(level.min(9)),
            Self::Zstd(_) => Self::Zstd(level.min(22)),
            Self::None => Self::None,
        }
    }

    pub fn decompress_to_string<R: Read>(
        &self,
        mut input: R,
    ) -> std::io::Result<String> {
        let mut buffer: String = String::new();
        match self {
            Self::Gzip(_) => {
                let mut decoder = flate2::read::GzDecoder::new(input);
                decoder.read_to_string(&mut buffer)?;
            }
            Self::Zstd(_) => {
                let mut decoder = zstd::Decoder::new(input)?;
                decoder.read_to_string(&mut buffer)?;
            }
            Self::None => {
                input.read_to_string(&mut buffer)?;
            }
        }
        Ok(buffer)
    }

    pub fn compress<W: Write>(
        &self,
        input: &[u8],
        mut output: W,
    ) -> std::io::Result<W> {
        match self {
            Self::Gzip(level) => {
                let mut encoder =
                    flate2::write::GzEncoder::new(output, flate2::Compression::new(*level as u32));
                encoder.write_all(input)?;
                encoder.finish()
            }
            Self::Zstd(level) => {
                let mut encoder = zstd::Encoder::new(output, *level as i32)?;
                encoder.write_all(input)?;
                encoder.finish()
            }
            Self::None => {
                output.write_all(input)?;
                Ok(output)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Parse(#[from] CsvParsingError),
    #[error(transparent)]
    Frame(#[from] crate::data::Error),
}

#[derive(Debug, Error)]
pub enum CsvParsingError {
    #[error("Failed to parse '{field}' as a number on line {line}, column '{column}'")]
    InvalidFloat { line: usize, column: String, field: String },
    #[error("Failed to shape the values into a {0}x{1} table")]
    Shape(usize, usize),
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use ndarray::array;

    use super::*;
    use crate::clustering::Method;

    #[test]
    fn read_frame_test() {
        let input = indoc! {"
            a,b,c
            1.0,2.0,3.5
            4,5,6
            -7e-1, 8 ,9
        "};

        let frame = read_frame(input.as_bytes(), &CompressionMethod::None, &CsvOptions::default()).unwrap();

        assert_eq!(frame.columns(), ["a", "b", "c"]);
        assert_eq!(frame.index(), ["sample-0", "sample-1", "sample-2"]);
        assert_eq!(frame.values(), array![[1.0, 2.0, 3.5], [4.0, 5.0, 6.0], [-0.7, 8.0, 9.0]]);
    }

    #[test]
    fn read_frame_with_index_test() {
        let input = indoc! {"
            ;x;y
            s1;1;2
            s2;3;4
        "};
        let options = CsvOptions { delimiter: b';', index_column: true };

        let frame = read_frame(input.as_bytes(), &CompressionMethod::None, &options).unwrap();

        assert_eq!(frame.columns(), ["x", "y"]);
        assert_eq!(frame.index(), ["s1", "s2"]);
        assert_eq!(frame.values(), array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn read_frame_invalid_float_test() {
        let input = indoc! {"
            a,b
            1,2
            3,oops
        "};

        match read_frame(input.as_bytes(), &CompressionMethod::None, &CsvOptions::default()) {
            Err(Error::Parse(CsvParsingError::InvalidFloat { line, column, field })) => {
                assert_eq!((line, column.as_str(), field.as_str()), (3, "b", "oops"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn read_frame_compressed_test() {
        let input = "a,b\n1,2\n3,4\n";
        for compression in [CompressionMethod::Gzip(1), CompressionMethod::Zstd(1)] {
            let data = compression.compress(input.as_bytes(), Vec::new()).unwrap();
            let frame = read_frame(data.as_slice(), &compression, &CsvOptions::default()).unwrap();
            assert_eq!(frame.values(), array![[1.0, 2.0], [3.0, 4.0]]);
        }
    }

    #[test]
    fn write_matrix_test() {
        let expected = indoc! {"
            ,x,y
            x,1,-0.5
            y,-0.5,1
        "};

        let labels = vec!["x".to_string(), "y".to_string()];
        let output = write_matrix(Vec::new(), &labels, &array![[1.0, -0.5], [-0.5, 1.0]]).unwrap();

        assert_eq!(expected.as_bytes(), output.as_slice())
    }

    #[test]
    fn write_linkage_test() {
        let expected = indoc! {"
            left,right,distance,size
            0,1,1,2
            2,3,5.196152422706631,3
        "};

        let linkage = crate::clustering::linkage(array![[0.0], [1.0], [5.0]].view(), Method::Ward).unwrap();
        let output = write_linkage(Vec::new(), &linkage).unwrap();

        assert_eq!(expected, String::from_utf8(output).unwrap())
    }

    #[test]
    fn compression_from_extension_test() {
        assert!(matches!(CompressionMethod::from("gz"), CompressionMethod::Gzip(5)));
        assert!(matches!(CompressionMethod::from("GZIP"), CompressionMethod::Gzip(5)));
        assert!(matches!(CompressionMethod::from("zst"), CompressionMethod::Zstd(12)));
        assert!(matches!(CompressionMethod::from("zstd"), CompressionMethod::Zstd(12)));
        assert!(matches!(CompressionMethod::from("csv"), CompressionMethod::None));
        assert!(matches!(CompressionMethod::Gzip(5).with_level(30), CompressionMethod::Gzip(9)));
        assert!(matches!(CompressionMethod::Zstd(12).with_level(3), CompressionMethod::Zstd(3)));
    }

    #[test]
    fn write_then_read_file_test() {
        let dir = std::env::temp_dir().join(format!("clustermap-io-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let labels = vec!["x".to_string(), "y".to_string()];
        let matrix = array![[1.0, -0.25], [-0.25, 1.0]];
        let options = CsvOptions { index_column: true, ..Default::default() };

        for filename in ["matrix.csv.gz", "matrix.csv.zst", "matrix.csv"] {
            let filepath = dir.join(filename);
            let extension = filepath.extension().and_then(|s| s.to_str()).unwrap();
            let compression = CompressionMethod::from(extension).with_level(3);

            write_to_file(&filepath, &compression, |buffer| write_matrix(buffer, &labels, &matrix)).unwrap();
            let frame = read_frame_from_file(&filepath, &options).unwrap();

            assert_eq!(frame.columns(), ["x", "y"], "{filename}");
            assert_eq!(frame.index(), ["x", "y"], "{filename}");
            assert_eq!(frame.values(), matrix, "{filename}");
        }

        let raw = std::fs::read(dir.join("matrix.csv.gz")).unwrap();
        assert_eq!(&raw[..2], [0x1f, 0x8b]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
