use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use page_geometry::check::{DEFAULT_WIDTH_TOLERANCE, check_output};
use page_geometry::{
    NormalizeConfig, NormalizeError, PageSource, Rotation, normalize_document,
};
use pdf_pages::{PdfPageRenderer, PdfPageSource, measure_output, save_document};

/// One page of a fixture document.
#[derive(Default, Clone)]
struct PageSpec {
    media_box: Option<[i64; 4]>,
    crop_box: Option<[i64; 4]>,
    rotate: Option<i64>,
}

impl PageSpec {
    fn media(w: i64, h: i64) -> Self {
        Self {
            media_box: Some([0, 0, w, h]),
            ..Self::default()
        }
    }

    fn rotated(mut self, degrees: i64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

fn rect(values: [i64; 4]) -> Object {
    Object::Array(values.iter().map(|&v| Object::Integer(v)).collect())
}

/// Build a document whose pages share one font; `tree` entries are set on
/// the root `/Pages` node.
fn build_document(pages: &[PageSpec], tree: &[(&str, Object)]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([("F1", Object::Reference(font_id))])),
    )]));

    let mut kids = Vec::new();
    for (i, spec) in pages.iter().enumerate() {
        let text = format!("BT /F1 24 Tf 100 700 Td (page {i}) Tj ET");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), text.into_bytes()));
        let mut page = Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
        ]);
        if let Some(media) = spec.media_box {
            page.set("MediaBox", rect(media));
        }
        if let Some(crop) = spec.crop_box {
            page.set("CropBox", rect(crop));
        }
        if let Some(rotate) = spec.rotate {
            page.set("Rotate", Object::Integer(rotate));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut tree_dict = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    for (key, value) in tree {
        tree_dict.set(*key, value.clone());
    }
    doc.objects.insert(pages_id, Object::Dictionary(tree_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

fn source(pages: &[PageSpec]) -> PdfPageSource {
    PdfPageSource::from_document(build_document(pages, &[]))
}

/// Replace `/Contents` of the first page.
fn with_contents(mut doc: Document, contents: Object) -> Document {
    let page_id = doc.page_iter().next().unwrap();
    doc.get_dictionary_mut(page_id)
        .unwrap()
        .set("Contents", contents);
    doc
}

fn render_error(doc: Document) -> NormalizeError {
    let src = PdfPageSource::from_document(doc);
    let mut renderer = PdfPageRenderer::new(&src);
    normalize_document(&src, &mut renderer, &ten_cm()).unwrap_err()
}

fn ten_cm() -> NormalizeConfig {
    NormalizeConfig::default()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_reads_media_box() {
    let src = source(&[PageSpec::media(612, 792)]);
    assert_eq!(src.page_count(), 1);
    let page = src.read(0).unwrap();
    assert!(approx(page.width, 612.0));
    assert!(approx(page.height, 792.0));
    assert_eq!(page.rotation, Rotation::None);
    assert_eq!(page.crop_origin, (0.0, 0.0));
}

#[test]
fn test_crop_box_wins_and_is_clipped() {
    let spec = PageSpec {
        media_box: Some([0, 0, 612, 792]),
        crop_box: Some([36, -20, 700, 500]),
        rotate: None,
    };
    let page = source(&[spec]).read(0).unwrap();
    assert!(approx(page.width, 576.0));
    assert!(approx(page.height, 500.0));
    assert_eq!(page.crop_origin, (36.0, 0.0));
}

#[test]
fn test_reversed_media_box_is_normalized() {
    let spec = PageSpec {
        media_box: Some([612, 792, 0, 0]),
        ..PageSpec::default()
    };
    let page = source(&[spec]).read(0).unwrap();
    assert!(approx(page.width, 612.0));
    assert!(approx(page.height, 792.0));
}

#[test]
fn test_missing_boxes_default_to_letter() {
    let page = source(&[PageSpec::default()]).read(0).unwrap();
    assert!(approx(page.width, 612.0));
    assert!(approx(page.height, 792.0));
}

#[test]
fn test_inherits_rotate_and_media_box_from_tree() {
    let doc = build_document(
        &[PageSpec::default()],
        &[("Rotate", Object::Integer(90)), ("MediaBox", rect([0, 0, 842, 595]))],
    );
    let page = PdfPageSource::from_document(doc).read(0).unwrap();
    assert_eq!(page.rotation, Rotation::Quarter);
    assert!(approx(page.width, 842.0));
    assert!(approx(page.height, 595.0));
}

#[test]
fn test_negative_rotation_is_normalized() {
    let page = source(&[PageSpec::media(612, 792).rotated(-90)]).read(0).unwrap();
    assert_eq!(page.rotation, Rotation::ThreeQuarter);
}

#[test]
fn test_odd_rotation_is_rejected() {
    let result = source(&[PageSpec::media(612, 792).rotated(45)]).read(0);
    assert!(matches!(result, Err(NormalizeError::UnsupportedRotation(45))));
}

#[test]
fn test_read_out_of_range() {
    let src = source(&[PageSpec::media(612, 792)]);
    assert!(matches!(
        src.read(1),
        Err(NormalizeError::NotFound { index: 1, count: 1 })
    ));
}

#[test]
fn test_malformed_box_is_a_render_error() {
    let doc = build_document(&[PageSpec::default()], &[("MediaBox", Object::Integer(3))]);
    let result = PdfPageSource::from_document(doc).read(0);
    assert!(matches!(result, Err(NormalizeError::Render(_))));
}

#[test]
fn test_renders_every_page_at_content_width() {
    let src = source(&[
        PageSpec::media(612, 792),
        PageSpec::media(842, 595),
        PageSpec::media(612, 792).rotated(90),
    ]);
    let mut renderer = PdfPageRenderer::new(&src);
    let normalized = normalize_document(&src, &mut renderer, &ten_cm()).unwrap();
    assert_eq!(renderer.page_count(), 3);
    let doc = renderer.finish();

    let measured = measure_output(&doc).unwrap();
    assert_eq!(measured.len(), 3);
    for (page, output) in normalized.pages.iter().zip(&measured) {
        assert!(approx(output.width, ten_cm().page_width()));
        assert!(approx(output.height, page.page_height));
        assert!(output.height >= output.width);
        assert_eq!(output.rotation_degrees, 0);
    }
    // Letter: 792 * 283.46 / 612 = 366.8 -> 367
    assert!(approx(measured[0].height, 367.0));
}

#[test]
fn test_output_content_uses_page_matrix() {
    let src = source(&[PageSpec::media(612, 792).rotated(180)]);
    let mut renderer = PdfPageRenderer::new(&src);
    let normalized = normalize_document(&src, &mut renderer, &ten_cm()).unwrap();
    let page_id: ObjectId = normalized.rendered[0];
    let doc = renderer.finish();

    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    let ops: Vec<&str> = content.operations.iter().map(|op| op.operator.as_str()).collect();
    assert_eq!(ops, ["q", "cm", "Do", "Q"]);

    let matrix: Vec<f64> = content.operations[1]
        .operands
        .iter()
        .map(|o| o.as_float().map(f64::from).unwrap())
        .collect();
    let expected = normalized.pages[0].transform.coefficients();
    for (got, want) in matrix.iter().zip(expected) {
        assert!((got - want).abs() < 1e-3, "{matrix:?} vs {expected:?}");
    }
    // Half turn: content is flipped on both axes.
    assert!(matrix[0] < 0.0 && matrix[3] < 0.0);
}

#[test]
fn test_shared_resources_copied_once() {
    let src = source(&[PageSpec::media(612, 792), PageSpec::media(612, 792)]);
    let mut renderer = PdfPageRenderer::new(&src);
    normalize_document(&src, &mut renderer, &ten_cm()).unwrap();
    let doc = renderer.finish();

    let fonts = doc
        .objects
        .values()
        .filter(|obj| obj.type_name().ok() == Some(b"Font".as_slice()))
        .count();
    assert_eq!(fonts, 1);
}

#[test]
fn test_saved_output_passes_checks() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("letter.pdf");
    let output_path = dir.path().join("letter_print.pdf");

    let mut input = build_document(&[PageSpec::media(792, 612).rotated(270)], &[]);
    save_document(&mut input, &input_path).unwrap();

    let src = PdfPageSource::open(&input_path).unwrap();
    let mut renderer = PdfPageRenderer::new(&src);
    let normalized = normalize_document(&src, &mut renderer, &ten_cm()).unwrap();
    let mut output = renderer.finish();
    save_document(&mut output, &output_path).unwrap();

    let reloaded = Document::load(&output_path).unwrap();
    let measured = measure_output(&reloaded).unwrap();
    let checks = check_output(
        &normalized.pages[0].source,
        &ten_cm(),
        &measured[0],
        DEFAULT_WIDTH_TOLERANCE,
    );
    assert!(checks.iter().all(|c| c.passed), "{checks:?}");
}

#[test]
fn test_corrupt_flate_content_fails_page() {
    let mut doc = build_document(&[PageSpec::media(612, 792)], &[]);
    let garbage = doc.add_object(Stream::new(
        Dictionary::from_iter([("Filter", Object::Name(b"FlateDecode".to_vec()))]),
        b"definitely not zlib".to_vec(),
    ));
    let err = render_error(with_contents(doc, Object::Reference(garbage)));
    match err {
        NormalizeError::PageProcessing { index, source } => {
            assert_eq!(index, 0);
            assert!(matches!(*source, NormalizeError::Render(_)), "{source:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_dangling_content_reference_fails_page() {
    let doc = build_document(&[PageSpec::media(612, 792)], &[]);
    let doc = with_contents(doc, Object::Array(vec![Object::Reference((999, 0))]));
    assert!(matches!(
        render_error(doc),
        NormalizeError::PageProcessing { index: 0, .. }
    ));
}

#[test]
fn test_non_stream_content_fails_page() {
    let doc = build_document(&[PageSpec::media(612, 792)], &[]);
    let doc = with_contents(doc, Object::Array(vec![Object::Integer(4)]));
    assert!(matches!(
        render_error(doc),
        NormalizeError::PageProcessing { index: 0, .. }
    ));
}

#[test]
fn test_compressed_content_is_decoded() {
    let mut doc = build_document(&[PageSpec::media(612, 792)], &[]);
    let mut stream = Stream::new(Dictionary::new(), b"BT /F1 24 Tf (flated) Tj ET".to_vec());
    stream.compress().unwrap();
    let content_id = doc.add_object(stream);
    let src = PdfPageSource::from_document(with_contents(doc, Object::Reference(content_id)));

    let mut renderer = PdfPageRenderer::new(&src);
    normalize_document(&src, &mut renderer, &ten_cm()).unwrap();
    let out = renderer.finish();
    let form = out
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .find(|s| matches!(s.dict.get(b"Subtype"), Ok(Object::Name(n)) if n.as_slice() == b"Form"))
        .unwrap();
    let data = form.decompressed_content().unwrap_or_else(|_| form.content.clone());
    assert!(data.windows(6).any(|w| w == b"flated"));
}

#[test]
fn test_fractional_rotation_is_rejected() {
    let mut doc = build_document(&[PageSpec::media(612, 792)], &[]);
    let page_id = doc.page_iter().next().unwrap();
    doc.get_dictionary_mut(page_id)
        .unwrap()
        .set("Rotate", Object::Real(89.6));
    let result = PdfPageSource::from_document(doc).read(0);
    assert!(matches!(result, Err(NormalizeError::UnsupportedRotation(_))));
}

#[test]
fn test_whole_real_rotation_is_accepted() {
    let mut doc = build_document(&[PageSpec::media(612, 792)], &[]);
    let page_id = doc.page_iter().next().unwrap();
    doc.get_dictionary_mut(page_id)
        .unwrap()
        .set("Rotate", Object::Real(270.0));
    let page = PdfPageSource::from_document(doc).read(0).unwrap();
    assert_eq!(page.rotation, Rotation::ThreeQuarter);
}
