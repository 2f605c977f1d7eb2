//! Fixture builders shared by this crate's tests.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use time::UtcDateTime;
use time::macros::datetime;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 20) as u8, (y * 20) as u8, 128, 255])
    }));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

/// Timestamp stamped on every fixture entry, as the catalog reports it.
pub(crate) fn modified_at() -> UtcDateTime {
    datetime!(2020-05-17 10:30:00).as_utc()
}

/// Writes a zip at `dir/name` with the entries in the given order.
pub(crate) fn archive(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::from_date_and_time(2020, 5, 17, 10, 30, 0).unwrap());
    for (entry, data) in entries {
        writer.start_file(*entry, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
    path
}

/// Writes a zip at `dir/name` with no entries at all.
pub(crate) fn empty_archive(dir: &Path, name: &str) -> PathBuf {
    archive(dir, name, &[])
}
