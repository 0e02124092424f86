use crate::{
    colorings::gray_bgr,
    image::{PixelBuffer, BYTES_PER_PIXEL},
    rules::{escape_value, EscapeRule},
};
use log::debug;
use num_complex::Complex64;
use scoped_threadpool::Pool;

#[derive(Clone, Copy, Debug, PartialEq)]
/// The rectangle of the complex plane that is mapped onto the image
pub struct Window {
    pub min_real: f64,
    pub max_real: f64,
    pub min_imag: f64,
    pub max_imag: f64,
}

impl Window {
    pub const fn new(min_real: f64, max_real: f64, min_imag: f64, max_imag: f64) -> Window {
        Window {
            min_real,
            max_real,
            min_imag,
            max_imag,
        }
    }
    pub fn is_valid(&self) -> bool {
        self.min_real < self.max_real && self.min_imag < self.max_imag
    }
}

#[derive(Clone)]
/// Everything needed to compute one image
pub struct FractalJob {
    pub width: u32,
    pub height: u32,
    pub window: Window,
    /// The maximum number of iterations, so also the maximum escape value.
    pub max_iter: u32,
    pub rule: Box<dyn EscapeRule>,
}

/*
Pixel (x, y) maps to the complex point (re, im) with
re(x) = min_real + (max_real - min_real) * x / (w - 1)
im(y) = min_imag + (max_imag - min_imag) * y / (h - 1)
so the first column lands on min_real, the last on max_real, and the top row on min_imag.
The operations are done in exactly this order, since reordering them changes
the last bits of the coordinate and with that the escape value of boundary pixels.
An image that is one pixel wide (or high) puts that column (or row) on the minimum.
 */
pub struct WinToPlane {
    window: Window,
    x_div: f64,
    y_div: f64,
}

impl WinToPlane {
    pub fn new(window: &Window, width: u32, height: u32) -> WinToPlane {
        WinToPlane {
            window: *window,
            x_div: width.saturating_sub(1) as f64,
            y_div: height.saturating_sub(1) as f64,
        }
    }
    pub fn cvt(&self, x: u32, y: u32) -> Complex64 {
        Complex64::new(self.cvt_x(x), self.cvt_y(y))
    }
    pub fn cvt_x(&self, x: u32) -> f64 {
        let w = &self.window;
        if self.x_div == 0.0 {
            return w.min_real;
        }
        w.min_real + (w.max_real - w.min_real) * x as f64 / self.x_div
    }
    pub fn cvt_y(&self, y: u32) -> f64 {
        let w = &self.window;
        if self.y_div == 0.0 {
            return w.min_imag;
        }
        w.min_imag + (w.max_imag - w.min_imag) * y as f64 / self.y_div
    }
}

// Fill a band of consecutive rows, starting at image row first_row.
fn fill_rows(band: &mut [u8], first_row: u32, job: &FractalJob, converter: &WinToPlane) {
    let stride = job.width as usize * BYTES_PER_PIXEL;
    let rule = job.rule.as_ref();
    for (dy, line) in band.chunks_exact_mut(stride).enumerate() {
        let im = converter.cvt_y(first_row + dy as u32);
        for (x, px) in line.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let p = Complex64::new(converter.cvt_x(x as u32), im);
            let v = escape_value(rule, p, job.max_iter);
            px.copy_from_slice(&gray_bgr(v, job.max_iter));
        }
    }
}

/// Compute the image of a job on the current thread.
pub fn render(job: &FractalJob) -> PixelBuffer {
    debug!(
        "rendering {} {}x{}, max_iter {}, window {:?}",
        job.rule.name(),
        job.width,
        job.height,
        job.max_iter,
        job.window
    );
    let mut img = PixelBuffer::new(job.width, job.height);
    if img.data().is_empty() {
        return img;
    }
    let converter = WinToPlane::new(&job.window, job.width, job.height);
    fill_rows(img.data_mut(), 0, job, &converter);
    img
}

/// Compute the image of a job, splitting the rows into bands that are
/// filled on a pool of `threads` threads. The result equals `render(job)`.
pub fn render_pooled(job: &FractalJob, threads: u32) -> PixelBuffer {
    if threads <= 1 || job.height <= 1 {
        return render(job);
    }
    debug!(
        "rendering {} {}x{} on {} threads",
        job.rule.name(),
        job.width,
        job.height,
        threads
    );
    let mut img = PixelBuffer::new(job.width, job.height);
    if img.data().is_empty() {
        return img;
    }
    let converter = WinToPlane::new(&job.window, job.width, job.height);
    let stride = img.stride();
    let rows_per_band = job.height.div_ceil(threads);
    let mut pool = Pool::new(threads);
    pool.scoped(|scope| {
        for (i, band) in img
            .data_mut()
            .chunks_mut(rows_per_band as usize * stride)
            .enumerate()
        {
            let converter = &converter;
            scope.execute(move || {
                fill_rows(band, i as u32 * rows_per_band, job, converter);
            });
        }
    });
    img
}
