//! End-to-end archive processing against the local filesystem store.

use std::io::{Cursor, Write};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pixbatch_core::pipeline::probe_bytes;
use pixbatch_core::{Config, ImageService, ImageStore, LocalImageStore};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 90]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

fn zip(entries: &[(&str, &[u8])], method: CompressionMethod) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(method);
    for (name, bytes) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn test_archive_of_three_yields_three_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalImageStore::with_base(dir.path(), "images");
    let service = ImageService::new(&Config::default(), Arc::new(store.clone()));

    let jpg = encode(1080, 1350, ImageFormat::Jpeg);
    let png = encode(300, 150, ImageFormat::Png);
    let archive = zip(
        &[
            ("a.jpg", jpg.as_slice()),
            ("b.png", png.as_slice()),
            ("readme.txt", b"nothing to see"),
        ],
        CompressionMethod::Deflated,
    );

    let outcome = service.process_archive(archive.into(), 64).await.unwrap();
    let locations = outcome.locations();
    assert_eq!(locations.len(), 3);
    assert_eq!(locations.iter().filter(|l| l.is_empty()).count(), 1);

    for location in locations.iter().filter(|l| !l.is_empty()) {
        let bytes = store.read(location).await.unwrap();
        let dims = probe_bytes(&bytes).unwrap();
        assert_eq!(dims.width, 64);
        assert_eq!(&bytes[..3], b"\xFF\xD8\xFF");
    }
}

#[tokio::test]
async fn test_directories_and_misnamed_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalImageStore::with_base(dir.path(), "images");
    let service = ImageService::new(&Config::default(), Arc::new(store));

    let png = encode(40, 40, ImageFormat::Png);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    writer.add_directory("photos/", options).unwrap();
    // PNG content behind a text extension is still an image
    writer.start_file("photos/notes.txt", options).unwrap();
    writer.write_all(&png).unwrap();
    // Image extension on text content is not
    writer.start_file("photos/fake.jpg", options).unwrap();
    writer.write_all(b"JFIF but not really").unwrap();
    let archive = writer.finish().unwrap().into_inner();

    let outcome = service
        .process_archive(archive.into(), 20)
        .await
        .unwrap()
        .into_input_order();

    assert_eq!(outcome.len(), 3);
    assert!(outcome.entries[0].location().is_none());
    let saved = outcome.entries[1].location().unwrap();
    assert!(saved.ends_with(".txt"));
    assert!(outcome.entries[2].location().is_none());
}
