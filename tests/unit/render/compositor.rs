use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn near(actual: [u8; 4], expected: [u8; 4]) -> bool {
    actual
        .iter()
        .zip(expected)
        .all(|(a, e)| (i16::from(*a) - i16::from(e)).abs() <= 1)
}

/// 200x100 source: left half red, right half blue.
fn split_source() -> Bitmap {
    let (w, h) = (200u32, 100u32);
    let mut px = Vec::with_capacity((w * h * 4) as usize);
    for _y in 0..h {
        for x in 0..w {
            if x < w / 2 {
                px.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                px.extend_from_slice(&[0, 0, 255, 255]);
            }
        }
    }
    Bitmap::from_straight(w, h, px).unwrap()
}

#[test]
fn square_mask_wide_image_layout_at_1000() {
    let layout = CompositeLayout::compute(
        Canvas::square(1000).unwrap(),
        Size::new(100.0, 100.0),
        Size::new(200.0, 100.0),
        Transform::IDENTITY,
    );
    let m = layout.mask_rect;
    assert!(approx(m.width(), 960.0));
    assert!(approx(m.height(), 960.0));
    assert!(approx(m.center().x, 500.0) && approx(m.center().y, 500.0));
    assert!(approx(m.x0, 20.0) && approx(m.y0, 20.0));

    let img = layout.image_rect;
    assert!(approx(img.height(), 960.0));
    assert!(approx(img.width(), 1920.0));
    assert!(approx(img.center().x, 500.0) && approx(img.center().y, 500.0));
    // Overflows left and right, flush top and bottom.
    assert!(img.x0 < m.x0 && img.x1 > m.x1);
    assert!(approx(img.y0, m.y0) && approx(img.y1, m.y1));
    assert_eq!(layout.base_image_rect, layout.image_rect);
}

#[test]
fn tall_image_is_width_bound() {
    let layout = CompositeLayout::compute(
        Canvas::square(500).unwrap(),
        Size::new(100.0, 100.0),
        Size::new(100.0, 300.0),
        Transform::IDENTITY,
    );
    assert!(approx(layout.base_image_rect.width(), 480.0));
    assert!(approx(layout.base_image_rect.height(), 1440.0));
}

#[test]
fn wide_mask_on_square_canvas_is_width_bound() {
    let layout = CompositeLayout::compute(
        Canvas::square(100).unwrap(),
        Size::new(200.0, 100.0),
        Size::new(100.0, 100.0),
        Transform::IDENTITY,
    );
    assert!(approx(layout.mask_rect.width(), 96.0));
    assert!(approx(layout.mask_rect.height(), 48.0));
    assert!(approx(layout.mask_rect.y0, 26.0));
    // Square image covers a 2:1 mask by matching its width.
    assert!(approx(layout.base_image_rect.width(), 96.0));
    assert!(approx(layout.base_image_rect.height(), 96.0));
}

#[test]
fn user_transform_scales_about_mask_center_then_translates() {
    let layout = CompositeLayout::compute(
        Canvas::square(1000).unwrap(),
        Size::new(100.0, 100.0),
        Size::new(100.0, 100.0),
        Transform::new(0.5, 30.0, -40.0),
    );
    let img = layout.image_rect;
    assert!(approx(img.width(), 480.0));
    assert!(approx(img.center().x, 530.0));
    assert!(approx(img.center().y, 460.0));
    assert!(approx(img.x0, 530.0 - 240.0));
}

#[test]
fn composite_clips_to_mask_silhouette() {
    let source = Bitmap::solid(10, 10, [0, 200, 0, 255]);
    let mask = Bitmap::solid(10, 10, [0, 0, 0, 255]);
    let raster = composite(
        &source,
        &mask,
        Transform::IDENTITY,
        Canvas::square(100).unwrap(),
        StencilChannel::Alpha,
    )
    .unwrap();
    // Margin (2px at 100) is transparent, inside is the photo.
    assert_eq!(raster.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(raster.pixel(1, 50), [0, 0, 0, 0]);
    assert!(near(raster.pixel(50, 50), [0, 200, 0, 255]));
    assert!(near(raster.pixel(2, 2), [0, 200, 0, 255]));
    assert!(near(raster.pixel(97, 97), [0, 200, 0, 255]));
    assert_eq!(raster.pixel(98, 98), [0, 0, 0, 0]);
    assert_eq!(raster.blend_mode(), BlendMode::SourceOver);
}

#[test]
fn shrunken_image_leaves_transparent_gap_inside_mask() {
    let source = Bitmap::solid(10, 10, [0, 200, 0, 255]);
    let mask = Bitmap::solid(10, 10, [0, 0, 0, 255]);
    let raster = composite(
        &source,
        &mask,
        Transform::new(0.5, 0.0, 0.0),
        Canvas::square(100).unwrap(),
        StencilChannel::Alpha,
    )
    .unwrap();
    assert_eq!(raster.pixel(10, 50), [0, 0, 0, 0]);
    assert!(near(raster.pixel(50, 50), [0, 200, 0, 255]));
}

#[test]
fn mask_alpha_becomes_output_alpha() {
    let source = Bitmap::solid(4, 4, [255, 255, 255, 255]);
    let mask = Bitmap::solid(4, 4, [0, 0, 0, 64]);
    let raster = composite(
        &source,
        &mask,
        Transform::IDENTITY,
        Canvas::square(50).unwrap(),
        StencilChannel::Alpha,
    )
    .unwrap();
    assert!((i16::from(raster.pixel(25, 25)[3]) - 64).abs() <= 1);
}

#[test]
fn composite_replaces_previous_contents() {
    let mut raster = Raster::new(Canvas::square(20).unwrap()).unwrap();
    let source = Bitmap::solid(2, 2, [255, 0, 0, 255]);
    let mask = Bitmap::solid(2, 2, [0, 0, 0, 255]);
    composite_into(
        &mut raster,
        &source,
        &mask,
        Transform::IDENTITY,
        StencilChannel::Alpha,
    )
    .unwrap();
    // Move the photo fully outside the mask; nothing from the first pass may survive.
    composite_into(
        &mut raster,
        &source,
        &mask,
        Transform::new(1.0, 100.0, 0.0),
        StencilChannel::Alpha,
    )
    .unwrap();
    assert!(raster.data().iter().all(|&b| b == 0));
}

#[test]
fn invalid_bitmap_aborts_before_drawing() {
    let mut raster = Raster::new(Canvas::square(8).unwrap()).unwrap();
    let source = Bitmap::solid(2, 2, [255, 0, 0, 255]);
    let mask = Bitmap::solid(2, 2, [0, 0, 0, 255]);
    composite_into(
        &mut raster,
        &source,
        &mask,
        Transform::IDENTITY,
        StencilChannel::Alpha,
    )
    .unwrap();
    let before = raster.data().to_vec();

    let empty = Bitmap {
        width: 0,
        height: 0,
        rgba8_premul: std::sync::Arc::new(Vec::new()),
    };
    let err = composite_into(
        &mut raster,
        &empty,
        &mask,
        Transform::IDENTITY,
        StencilChannel::Alpha,
    )
    .unwrap_err();
    assert!(matches!(err, ShapecropError::Decode(_)));
    assert_eq!(raster.data(), before.as_slice());
}

/// Column (relative to the mask's left edge, as a fraction of mask width) where red turns blue.
fn landmark_fraction(raster: &Raster, layout: &CompositeLayout) -> f64 {
    let y = (layout.mask_rect.center().y) as u32;
    let x_start = layout.mask_rect.x0.ceil() as u32;
    let x_end = layout.mask_rect.x1.floor() as u32;
    let mut prev_red = None;
    for x in x_start..x_end {
        let px = raster.pixel(x, y);
        if px[3] < 254 {
            continue;
        }
        let red = px[0] > px[2];
        if prev_red == Some(true) && !red {
            return (f64::from(x) - layout.mask_rect.x0) / layout.mask_rect.width();
        }
        prev_red = Some(red);
    }
    panic!("no red/blue edge inside mask");
}

#[test]
fn framing_is_identical_across_resolutions_after_rescale() {
    let source = split_source();
    let mask = Bitmap::solid(50, 50, [0, 0, 0, 255]);
    let preview = Canvas::square(500).unwrap();
    let export = Canvas::square(1000).unwrap();
    // Pan left by 60 preview pixels and zoom out slightly; the red/blue edge stays visible.
    let t = Transform::new(0.9, -60.0, 15.0);

    let mut small = Raster::new(preview).unwrap();
    let small_layout =
        composite_into(&mut small, &source, &mask, t, StencilChannel::Alpha).unwrap();

    let mut big = Raster::new(export).unwrap();
    let big_layout = composite_into(
        &mut big,
        &source,
        &mask,
        t.rescaled(preview, export),
        StencilChannel::Alpha,
    )
    .unwrap();

    let rel = |l: &CompositeLayout| {
        let m = l.mask_rect;
        let i = l.image_rect;
        (
            (i.x0 - m.x0) / m.width(),
            (i.y0 - m.y0) / m.height(),
            i.width() / m.width(),
        )
    };
    let (a, b) = (rel(&small_layout), rel(&big_layout));
    assert!(approx(a.0, b.0) && approx(a.1, b.1) && approx(a.2, b.2));

    let fs = landmark_fraction(&small, &small_layout);
    let fb = landmark_fraction(&big, &big_layout);
    assert!(
        (fs - fb).abs() <= 2.0 / small_layout.mask_rect.width(),
        "edge at {fs} vs {fb}"
    );
}

#[test]
fn unscaled_translate_at_export_shifts_framing() {
    let preview = Canvas::square(500).unwrap();
    let export = Canvas::square(1000).unwrap();
    let t = Transform::new(1.0, -60.0, 0.0);
    let frac = |canvas: Canvas, t: Transform| {
        let l = CompositeLayout::compute(
            canvas,
            Size::new(1.0, 1.0),
            Size::new(2.0, 1.0),
            t,
        );
        (l.image_rect.x0 - l.mask_rect.x0) / l.mask_rect.width()
    };
    assert!(!approx(frac(preview, t), frac(export, t)));
    assert!(approx(frac(preview, t), frac(export, t.rescaled(preview, export))));
}
