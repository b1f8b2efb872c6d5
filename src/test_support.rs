//! Shared test fixtures: deterministic raster images and a minimal
//! slide-deck package builder.

use std::io::{Cursor, Write};

/// Fixed non-image part used by package fixtures.
pub(crate) const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Fixture</Application></Properties>"#;

const PRESENTATION_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#;

const SLIDE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#;

/// Deterministic RGB noise encoded as PNG. Noise defeats PNG filtering, so
/// a quality-30 JPEG re-encode of it is reliably smaller.
pub(crate) fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    let mut next = move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 24) as u8
    };

    let img = image::RgbImage::from_fn(width, height, |_, _| image::Rgb([next(), next(), next()]));

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
        .unwrap();
    buf
}

/// Build a minimal `.pptx` package with one slide referencing the given
/// media parts. `media` entries are (file name, declared content type,
/// bytes); parts land under `ppt/media/`.
pub(crate) fn minimal_pptx(media: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut overrides = String::new();
    for (name, content_type, _) in media {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/media/{}" ContentType="{}"/>"#,
            name, content_type
        ));
    }
    let content_types = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>{}</Types>"#,
        overrides
    );

    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

    let presentation_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/></Relationships>"#;

    let mut slide_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (index, (name, _, _)) in media.iter().enumerate() {
        slide_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/{}"/>"#,
            index + 1,
            name
        ));
    }
    slide_rels.push_str("</Relationships>");

    let mut entries: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".to_string(), content_types.into_bytes()),
        ("_rels/.rels".to_string(), root_rels.as_bytes().to_vec()),
        (
            "ppt/presentation.xml".to_string(),
            PRESENTATION_XML.as_bytes().to_vec(),
        ),
        (
            "ppt/_rels/presentation.xml.rels".to_string(),
            presentation_rels.as_bytes().to_vec(),
        ),
        (
            "ppt/slides/slide1.xml".to_string(),
            SLIDE_XML.as_bytes().to_vec(),
        ),
        (
            "ppt/slides/_rels/slide1.xml.rels".to_string(),
            slide_rels.into_bytes(),
        ),
        ("docProps/app.xml".to_string(), APP_XML.as_bytes().to_vec()),
    ];
    for (name, _, bytes) in media {
        entries.push((format!("ppt/media/{}", name), bytes.to_vec()));
    }

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in &entries {
        writer.start_file(name.as_str(), options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    let buf = writer.finish().unwrap();
    buf.into_inner()
}

/// Extract one part's bytes from a serialized package.
pub(crate) fn package_part(package: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut out = Vec::new();
    std::io::Read::read_to_end(&mut entry, &mut out).unwrap();
    out
}
