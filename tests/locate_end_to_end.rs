use histmatch::{
    locate, Binning, HistMatchError, Image, Point, Rect, Rgb, ScanConfig, Scanner,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_image(rng: &mut StdRng, width: usize, height: usize) -> Image {
    let pixels = (0..width * height)
        .map(|_| Rgb::new(rng.random(), rng.random(), rng.random()))
        .collect();
    Image::from_pixels(pixels, width, height).unwrap()
}

/// Black background with a bright random patch at `(x0, y0)`; any window
/// that is not exactly on the patch contains black pixels, so the patch is
/// the only exact bucket match.
fn scene_with_patch(width: usize, height: usize, x0: usize, y0: usize, patch: &Image) -> Image {
    let mut pixels = vec![Rgb::BLACK; width * height];
    for y in 0..patch.height() {
        let row = patch.row(y).unwrap();
        let start = (y0 + y) * width + x0;
        pixels[start..start + patch.width()].copy_from_slice(row);
    }
    Image::from_pixels(pixels, width, height).unwrap()
}

fn bright_patch(rng: &mut StdRng, width: usize, height: usize) -> Image {
    let pixels = (0..width * height)
        .map(|_| {
            Rgb::new(
                rng.random_range(64..=255),
                rng.random_range(64..=255),
                rng.random_range(64..=255),
            )
        })
        .collect();
    Image::from_pixels(pixels, width, height).unwrap()
}

#[test]
fn recovers_cropped_region_exactly() {
    let mut rng = StdRng::seed_from_u64(2024);
    let patch = bright_patch(&mut rng, 8, 6);
    let source = scene_with_patch(40, 30, 17, 11, &patch);

    let crop_rect = Rect::from_origin(Point::new(17, 11), 8, 6).unwrap();
    let target = source.crop(&crop_rect).unwrap();
    assert_eq!(target, patch);

    let found = locate(&source, &target, 1, 1).unwrap().unwrap();
    assert_eq!(found.rect, crop_rect);
    assert_eq!(found.distance, 0);
}

#[test]
fn recovers_region_from_a_decoded_bitmap() {
    let mut rng = StdRng::seed_from_u64(5);
    let patch = bright_patch(&mut rng, 5, 4);
    let source = scene_with_patch(23, 17, 9, 10, &patch);

    let source = histmatch::bmp::decode(&histmatch::bmp::encode(&source).unwrap()).unwrap();
    let target = histmatch::bmp::decode(&histmatch::bmp::encode(&patch).unwrap()).unwrap();

    let found = locate(&source, &target, 1, 1).unwrap().unwrap();
    assert_eq!(found.rect, Rect::from_origin(Point::new(9, 10), 5, 4).unwrap());
    assert_eq!(found.distance, 0);
}

#[test]
fn strided_results_stay_on_the_stride_grid() {
    let mut rng = StdRng::seed_from_u64(77);
    let source = random_image(&mut rng, 37, 29);
    let target = random_image(&mut rng, 6, 5);

    let dense = locate(&source, &target, 1, 1).unwrap().unwrap();
    for (h, v) in [(2, 2), (3, 2), (4, 5), (7, 3)] {
        let found = locate(&source, &target, h, v).unwrap().unwrap();
        assert_eq!(found.rect.x() % h as i32, 0, "stride ({h}, {v})");
        assert_eq!(found.rect.y() % v as i32, 0, "stride ({h}, {v})");
        assert!(found.distance >= dense.distance);
    }
}

#[test]
fn strides_reach_the_last_valid_position() {
    let mut rng = StdRng::seed_from_u64(8);
    let patch = bright_patch(&mut rng, 3, 2);
    // Last valid origin is (7, 4); both are on the (7, 4) stride grid.
    let source = scene_with_patch(10, 6, 7, 4, &patch);

    let found = locate(&source, &patch, 7, 4).unwrap().unwrap();
    assert_eq!(found.rect, Rect::from_origin(Point::new(7, 4), 3, 2).unwrap());
    assert_eq!(found.distance, 0);
}

#[test]
fn first_candidate_in_raster_order_wins_ties() {
    let source = Image::filled(5, 5, Rgb::BLACK).unwrap();
    let target = Image::filled(2, 2, Rgb::new(255, 255, 255)).unwrap();
    let found = locate(&source, &target, 1, 1).unwrap().unwrap();
    assert_eq!(found.rect, Rect::from_origin(Point::new(0, 0), 2, 2).unwrap());
    assert_eq!(found.distance, 24);

    let mut pixels = vec![Rgb::BLACK; 12];
    pixels[6] = Rgb::RED;
    pixels[2] = Rgb::RED;
    let source = Image::from_pixels(pixels, 4, 3).unwrap();
    let target = Image::filled(1, 1, Rgb::RED).unwrap();
    let found = locate(&source, &target, 1, 1).unwrap().unwrap();
    assert_eq!(found.rect, Rect::from_origin(Point::new(2, 0), 1, 1).unwrap());
    assert_eq!(found.distance, 0);
}

#[test]
fn oversized_target_reports_no_match() {
    let source = Image::filled(4, 4, Rgb::BLACK).unwrap();
    let wide = Image::filled(5, 2, Rgb::BLACK).unwrap();
    let tall = Image::filled(2, 5, Rgb::BLACK).unwrap();
    assert_eq!(locate(&source, &wide, 1, 1).unwrap(), None);
    assert_eq!(locate(&source, &tall, 1, 1).unwrap(), None);

    let same = Image::filled(4, 4, Rgb::new(255, 255, 255)).unwrap();
    let found = locate(&source, &same, 3, 3).unwrap().unwrap();
    assert_eq!(found.rect, Rect::from_origin(Point::new(0, 0), 4, 4).unwrap());
    assert_eq!(found.distance, 96);
}

#[test]
fn zero_stride_is_rejected() {
    let source = Image::filled(4, 4, Rgb::BLACK).unwrap();
    let target = Image::filled(2, 2, Rgb::BLACK).unwrap();
    assert_eq!(
        locate(&source, &target, 0, 1).unwrap_err(),
        HistMatchError::InvalidInput("strides must be at least 1")
    );
    assert!(locate(&source, &target, 1, 0).is_err());
}

#[test]
fn incremental_scan_matches_recompute() {
    let mut rng = StdRng::seed_from_u64(314);
    for case in 0..12 {
        let source = random_image(&mut rng, 31, 21);
        let target = if case % 3 == 0 {
            let x = rng.random_range(0..26);
            let y = rng.random_range(0..17);
            source
                .crop(&Rect::from_origin(Point::new(x, y), 5, 4).unwrap())
                .unwrap()
        } else {
            random_image(&mut rng, 5, 4)
        };

        for (h, v) in [(1, 1), (2, 3), (4, 1), (5, 2), (7, 7)] {
            let base = ScanConfig {
                horizontal_stride: h,
                vertical_stride: v,
                ..ScanConfig::default()
            };
            let incremental = ScanConfig {
                incremental: true,
                ..base.clone()
            };
            let expected = Scanner::new(&target).with_config(base).locate(&source).unwrap();
            let got = Scanner::new(&target)
                .with_config(incremental)
                .locate(&source)
                .unwrap();
            assert_eq!(got, expected, "case {case}, stride ({h}, {v})");
        }
    }
}

#[test]
fn scanner_is_reusable_across_sources() {
    let mut rng = StdRng::seed_from_u64(3);
    let patch = bright_patch(&mut rng, 4, 4);
    let scanner = Scanner::new(&patch);

    let first = scene_with_patch(20, 12, 2, 3, &patch);
    let second = scene_with_patch(15, 15, 11, 9, &patch);
    assert_eq!(
        scanner.locate(&first).unwrap().unwrap().rect,
        Rect::from_origin(Point::new(2, 3), 4, 4).unwrap()
    );
    assert_eq!(
        scanner.locate(&second).unwrap().unwrap().rect,
        Rect::from_origin(Point::new(11, 9), 4, 4).unwrap()
    );
}

#[test]
fn custom_binning_is_applied_to_query_and_candidates() {
    let target = Image::filled(2, 1, Rgb::new(100, 100, 100)).unwrap();
    let mut pixels = vec![Rgb::new(10, 10, 10); 6];
    pixels[4] = Rgb::new(120, 120, 120);
    pixels[5] = Rgb::new(120, 120, 120);
    let source = Image::from_pixels(pixels, 6, 1).unwrap();

    let coarse = Scanner::new(&target).with_config(ScanConfig {
        binning: Binning::new(vec![50]).unwrap(),
        ..ScanConfig::default()
    });
    assert_eq!(coarse.query().red(), &[0, 2]);
    let found = coarse.locate(&source).unwrap().unwrap();
    assert_eq!(found.rect, Rect::from_origin(Point::new(4, 0), 2, 1).unwrap());
    assert_eq!(found.distance, 0);

    let fine = Scanner::new(&target).with_config(ScanConfig {
        binning: Binning::new(vec![50, 110]).unwrap(),
        ..ScanConfig::default()
    });
    let found = fine.locate(&source).unwrap().unwrap();
    assert_eq!(fine.query().red(), &[0, 2, 0]);
    assert_eq!(found.distance, 12);
    assert_eq!(found.rect, Rect::from_origin(Point::new(0, 0), 2, 1).unwrap());
}
