use attachment_icon::{encode, name, normalize, resolve, select, EncodeError,
                      IconError, IconProvider, IconRenderer, IconRequest,
                      IconSource, Image, OutputFormat, PixelFormat, RawIcon,
                      RenderConfig, Representation, ResolutionError};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

// ========================================================================= //

/// A host that knows a single file type, `zip`, drawn in a 16, a 32, and a
/// 128 pixel version.
struct ZipOnly;

impl IconProvider for ZipOnly {
    fn resolve_by_type(&self, file_type: &str) -> Option<RawIcon> {
        if file_type != "zip" {
            return None;
        }
        Some([16, 32, 128]
            .iter()
            .map(|&size| Representation::new(gradient(size)))
            .collect())
    }

    fn resolve_by_file(&self, path: &Path) -> Option<RawIcon> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.resolve_by_type(&ext)
    }
}

fn gradient(size: u32) -> Image {
    let mut image = Image::new(PixelFormat::RGBA, size, size);
    for (index, pixel) in image.data_mut().chunks_exact_mut(4).enumerate() {
        let (x, y) = (index as u32 % size, index as u32 / size);
        pixel.copy_from_slice(&[(x * 255 / size) as u8,
                                (y * 255 / size) as u8,
                                128,
                                255]);
    }
    image
}

fn write_png_fixture(dir: &Path, file_name: &str, image: &Image) -> PathBuf {
    let path = dir.join(file_name);
    let file = BufWriter::new(File::create(&path).expect("create failed"));
    image.write_png(file).expect("write failed");
    path
}

fn zip_request() -> IconRequest {
    IconRequest::new(IconSource::FileTypeClass("zip".to_string()))
        .with_display_name("archive.zip")
}

// ========================================================================= //

#[test]
fn lenient_unresolvable_source_gives_placeholder() {
    let renderer = IconRenderer::new(ZipOnly);
    for source in [IconSource::FileTypeClass("pdf".to_string()),
                   IconSource::FilePath(PathBuf::from("/nowhere/a.pdf")),
                   IconSource::ExplicitImagePath(PathBuf::from("/nowhere/a.png"))] {
        let request = IconRequest::new(source).with_display_name("a.pdf");
        let icon = renderer.render(&request).expect("lenient render failed");
        assert!(icon.is_placeholder());
        assert_eq!(icon.name().to_string(), "a.pdf.png");
        assert!(icon.bytes().is_empty());
    }
}

#[test]
fn strict_unresolvable_source_is_a_resolution_error() {
    let renderer = IconRenderer::new(ZipOnly);
    let request = IconRequest::new(IconSource::FileTypeClass("pdf".to_string()))
        .with_strict_mode(true);
    match renderer.render(&request) {
        Err(IconError::Resolution(ResolutionError::NoIconForType(file_type))) => {
            assert_eq!(file_type, "pdf");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn selector_prefers_nearest_from_above() {
    let raw = resolve(&ZipOnly, &zip_request().source).unwrap();
    assert_eq!(select(raw, 64.0).unwrap().width(), 128.0);
    let raw = resolve(&ZipOnly, &zip_request().source).unwrap();
    assert_eq!(select(raw, 32.0).unwrap().width(), 32.0);
    let raw = resolve(&ZipOnly, &zip_request().source).unwrap();
    assert_eq!(select(raw, 200.0).unwrap().width(), 128.0);
}

#[test]
fn jpeg_aliases_render_identically() {
    let renderer = IconRenderer::new(ZipOnly);
    let names: Vec<String> = ["jpg", "jpe", "jpeg", "JPG"]
        .iter()
        .map(|alias| {
            let request = zip_request().with_format(alias).with_strict_mode(true);
            renderer.render(&request).unwrap().name().to_string()
        })
        .collect();
    assert!(names.iter().all(|name| name == &names[0]));
    assert!(names[0].ends_with(".jpeg"));
}

#[test]
fn pipeline_runs_are_byte_identical() {
    let run = || {
        let request = zip_request().with_size(48.0);
        let raw = resolve(&ZipOnly, &request.source).unwrap();
        let rep = select(raw, request.target_size).unwrap();
        let canvas = normalize(&rep, request.target_size, &RenderConfig::default())
            .unwrap();
        let blob = encode(&canvas, &request.output_format).unwrap();
        let name = name(blob.bytes(), blob.format());
        (blob, name)
    };
    let (first_blob, first_name) = run();
    let (second_blob, second_name) = run();
    assert_eq!(first_blob, second_blob);
    assert_eq!(first_name, second_name);

    let renderer = IconRenderer::new(ZipOnly);
    let icon = renderer.render(&zip_request().with_size(48.0)).unwrap();
    assert_eq!(icon.name(), &first_name);
    assert_eq!(icon.bytes(), first_blob.bytes());
}

#[test]
fn rendered_png_has_target_size() {
    let renderer = IconRenderer::new(ZipOnly);
    let icon = renderer.render(&zip_request().with_size(24.9)).unwrap();
    let image = Image::read_png(Cursor::new(icon.bytes())).unwrap();
    assert_eq!((image.width(), image.height()), (24, 24));
    assert_eq!(image.pixel_format(), PixelFormat::RGBA);
}

#[test]
fn explicit_image_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png_fixture(dir.path(), "logo.png", &gradient(40));
    let renderer = IconRenderer::new(ZipOnly);
    let request = IconRequest::new(IconSource::ExplicitImagePath(path))
        .with_size(20.0)
        .with_format("bmp")
        .with_strict_mode(true);
    let icon = renderer.render(&request).unwrap();
    assert_eq!(icon.name().extension(), "bmp");
    assert!(icon.bytes().starts_with(b"BM"));
}

#[test]
fn undecodable_image_file_is_a_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();
    let renderer = IconRenderer::new(ZipOnly);
    let request = IconRequest::new(IconSource::ExplicitImagePath(path.clone()))
        .with_strict_mode(true);
    match renderer.render(&request) {
        Err(IconError::Resolution(ResolutionError::LoadFailed(failed))) => {
            assert_eq!(failed, path);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn unsupported_format_is_reported_or_degraded() {
    let renderer = IconRenderer::new(ZipOnly);
    let strict = zip_request().with_format("webp").with_strict_mode(true);
    assert!(matches!(renderer.render(&strict),
                     Err(IconError::Encode(EncodeError::UnsupportedFormat(_)))));
    let lenient = zip_request().with_format("webp");
    let icon = renderer.render(&lenient).unwrap();
    assert_eq!(icon.name().to_string(), "archive.zip.webp");
}

#[test]
fn every_writable_format_renders() {
    let renderer = IconRenderer::new(ZipOnly);
    for format in [OutputFormat::Bmp,
                   OutputFormat::Gif,
                   OutputFormat::Jpeg,
                   OutputFormat::Png,
                   OutputFormat::Tiff] {
        let request = zip_request()
            .with_format(format.extension())
            .with_strict_mode(true);
        let icon = renderer.render(&request).unwrap();
        assert_eq!(icon.name().extension(), format.extension());
        assert_eq!(icon.name().stem().len(), 32);
    }
}

#[cfg(feature = "jp2io")]
#[test]
fn jpeg2000_renders_and_decodes() {
    let renderer = IconRenderer::new(ZipOnly);
    let jp2 = renderer
        .render(&zip_request().with_size(48.0).with_format("jp2").with_strict_mode(true))
        .unwrap();
    assert_eq!(jp2.name().extension(), "jp2");
    let jpf = renderer
        .render(&zip_request().with_size(48.0).with_format("jpf").with_strict_mode(true))
        .unwrap();
    assert_eq!(jpf, jp2);
    let raw = RawIcon::from_bytes(jp2.bytes()).unwrap();
    assert_eq!(raw.representations()[0].pixel_width(), 48);
}

#[test]
fn explicit_image_failure_falls_back() {
    let renderer = IconRenderer::new(ZipOnly);
    let request =
        IconRequest::new(IconSource::ExplicitImagePath(PathBuf::from("/nowhere/missing.png")))
            .with_fallback(IconSource::FileTypeClass("zip".to_string()))
            .with_strict_mode(true);
    let icon = renderer.render(&request).unwrap();
    let expected = renderer.render(&zip_request().with_strict_mode(true)).unwrap();
    assert_eq!(icon, expected);
}

#[cfg(all(unix, not(target_os = "macos")))]
#[test]
fn theme_icons_feed_the_pipeline() {
    use attachment_icon::provider::ThemeIcons;

    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("hicolor")).unwrap();
    std::fs::write(root.path().join("hicolor/index.theme"),
                   "[Icon Theme]\nName=Hicolor\n\
                    Directories=16x16/mimetypes,48x48/mimetypes\n\n\
                    [16x16/mimetypes]\nSize=16\nType=Fixed\n\n\
                    [48x48/mimetypes]\nSize=48\nType=Fixed\n")
        .unwrap();
    for size in [16u32, 48] {
        let dir = root.path().join(format!("hicolor/{}x{}/mimetypes", size, size));
        std::fs::create_dir_all(&dir).unwrap();
        write_png_fixture(&dir, "application-pdf.png", &gradient(size));
    }
    let renderer = IconRenderer::new(ThemeIcons::with_base_dirs(vec![root.path()]));
    let request = IconRequest::new(IconSource::FilePath(PathBuf::from("/docs/paper.pdf")))
        .with_size(32.0)
        .with_strict_mode(true);
    let icon = renderer.render(&request).unwrap();
    let image = Image::read_png(Cursor::new(icon.bytes())).unwrap();
    assert_eq!(image.width(), 32);
}

// ========================================================================= //
