use overmark::draw::color::{BLACK, BLUE, RED};
use overmark::draw::{Background, Canvas, Document, DrawableObject, ShapeKind};
use overmark::util::Point;

fn alpha_at(canvas: &mut Canvas, x: usize, y: usize) -> u8 {
    let snapshot = canvas.snapshot().unwrap();
    let offset = y * snapshot.stride as usize + x * 4;
    let pixel = [
        snapshot.data[offset],
        snapshot.data[offset + 1],
        snapshot.data[offset + 2],
        snapshot.data[offset + 3],
    ];
    (u32::from_ne_bytes(pixel) >> 24) as u8
}

fn sample_document() -> Document {
    let mut doc = Document::new();
    doc.push(DrawableObject::stroke(
        vec![Point::new(10.0, 10.0), Point::new(90.0, 10.0)],
        RED,
        6.0,
    ));
    doc.push(DrawableObject::shape(
        ShapeKind::Arrow,
        Point::new(10.0, 40.0),
        Point::new(90.0, 40.0),
        BLUE,
        4.0,
    ));
    doc.push(DrawableObject::shape(
        ShapeKind::RoundedRectangle,
        Point::new(10.0, 60.0),
        Point::new(90.0, 90.0),
        BLACK,
        3.0,
    ));
    doc
}

#[test]
fn replaying_a_document_is_deterministic() {
    let doc = sample_document();
    let mut first = Canvas::new(100, 100, Background::Transparent).unwrap();
    let mut second = Canvas::new(100, 100, Background::Transparent).unwrap();

    first.render_document(&doc).unwrap();
    first.render_document(&doc).unwrap();
    second.render_document(&doc).unwrap();

    assert_eq!(first.snapshot().unwrap(), second.snapshot().unwrap());
    assert_eq!(first.encode_png().unwrap(), second.encode_png().unwrap());
}

#[test]
fn erase_clips_only_objects_below_it() {
    let mut doc = Document::new();
    doc.push(DrawableObject::stroke(
        vec![Point::new(10.0, 50.0), Point::new(90.0, 50.0)],
        RED,
        8.0,
    ));
    doc.push(DrawableObject::erase(
        vec![Point::new(50.0, 20.0), Point::new(50.0, 80.0)],
        16.0,
    ));
    doc.push(DrawableObject::stroke(
        vec![Point::new(50.0, 10.0), Point::new(50.0, 30.0)],
        BLUE,
        4.0,
    ));

    let mut canvas = Canvas::new(100, 100, Background::Transparent).unwrap();
    canvas.render_document(&doc).unwrap();

    assert_eq!(alpha_at(&mut canvas, 50, 50), 0);
    assert!(alpha_at(&mut canvas, 20, 50) > 0);
    // Drawn after the eraser, so untouched by it.
    assert!(alpha_at(&mut canvas, 50, 25) > 0);
}

#[test]
fn erase_on_whiteboard_paints_background() {
    let mut doc = Document::new();
    doc.push(DrawableObject::erase(vec![Point::new(10.0, 10.0)], 10.0));

    let mut canvas = Canvas::new(20, 20, Background::Whiteboard).unwrap();
    canvas.render_document(&doc).unwrap();
    assert_eq!(alpha_at(&mut canvas, 10, 10), 255);
}

#[test]
fn hit_testing_prefers_the_topmost_object() {
    let doc = sample_document();
    assert_eq!(doc.hit_test(Point::new(50.0, 10.0)), Some(0));
    assert_eq!(doc.hit_test(Point::new(50.0, 75.0)), Some(2));
    assert_eq!(doc.hit_test(Point::new(50.0, 200.0)), None);
}
