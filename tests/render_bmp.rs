use escape_bmp::{
    bitmap::{encode_to_vec, write_bmp_file, BmpHeader},
    colorings::gray_bgr,
    fractal_image::{render, WinToPlane},
    presets::Presets,
    rules::escape_value,
};
use std::{fs, io::Cursor};

#[test]
fn mandelbrot_preset_decodes_as_gray_image() {
    let presets = Presets::new();
    let preset = presets.by_name("mandelbrot").unwrap();
    let img = render(&preset.job());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(preset.file_name());
    write_bmp_file(&path, &img).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 360054);
    let header = BmpHeader::parse(&mut Cursor::new(&bytes)).unwrap();
    assert_eq!(header.file_size, 360054);
    assert_eq!((header.width, header.height), (400, 300));

    let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Bmp)
        .unwrap()
        .to_rgb8();
    assert_eq!(decoded.dimensions(), (400, 300));
    for (x, y) in [(0, 0), (399, 0), (0, 299), (250, 150), (399, 150), (123, 77)] {
        let [b, g, r] = img.pixel(x, y);
        assert_eq!(decoded.get_pixel(x, y).0, [r, g, b], "pixel ({}, {})", x, y);
    }
}

#[test]
fn julia_center_matches_direct_computation() {
    let presets = Presets::new();
    let job = presets.by_name("julia").unwrap().job();
    let img = render(&job);
    let bytes = encode_to_vec(&img).unwrap();
    assert_eq!(bytes.len(), 360054);

    let converter = WinToPlane::new(&job.window, job.width, job.height);
    let (x, y) = (job.width / 2, job.height / 2);
    let p = converter.cvt(x, y);
    assert!(p.re.abs() < 0.01 && p.im.abs() < 0.01);
    let v = escape_value(job.rule.as_ref(), p, job.max_iter);
    assert_eq!(img.pixel(x, y), gray_bgr(v, job.max_iter));
}

#[test]
fn escape_values_stay_in_range() {
    let presets = Presets::new();
    for preset in presets.iter() {
        let job = preset.job();
        let converter = WinToPlane::new(&job.window, job.width, job.height);
        for y in (0..job.height).step_by(17) {
            for x in (0..job.width).step_by(13) {
                let v = escape_value(job.rule.as_ref(), converter.cvt(x, y), job.max_iter);
                assert!(v <= job.max_iter);
            }
        }
    }
}
