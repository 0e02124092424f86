use dyn_clone::DynClone;
use num_complex::Complex64;

/// The constant used by the Julia preset.
pub const JULIA_C: Complex64 = Complex64::new(-0.7, 0.27015);

pub trait EscapeRule: DynClone + Sync + Send {
    /// Get the starting value `z_0` and the constant `c` of the
    /// iteration `z = z*z + c`, given the point a pixel maps to
    fn start(&self, p: Complex64) -> (Complex64, Complex64);
    fn name(&self) -> &'static str;
}

dyn_clone::clone_trait_object!(EscapeRule);

#[derive(Clone)]
pub struct Mandelbrot {}

impl EscapeRule for Mandelbrot {
    fn start(&self, p: Complex64) -> (Complex64, Complex64) {
        (Complex64::new(0.0, 0.0), p)
    }
    fn name(&self) -> &'static str {
        "mandelbrot"
    }
}

#[derive(Clone)]
pub struct Julia {
    pub c: Complex64,
}

impl Julia {
    pub fn new(c: Complex64) -> Julia {
        Julia { c }
    }
}

impl EscapeRule for Julia {
    fn start(&self, p: Complex64) -> (Complex64, Complex64) {
        (p, self.c)
    }
    fn name(&self) -> &'static str {
        "julia"
    }
}

// Return the number of iterations before |z| exceeds 2.0, or max_iter.
// A magnitude of exactly 2.0 still iterates once more.
pub fn escape_value(rule: &dyn EscapeRule, p: Complex64, max_iter: u32) -> u32 {
    let (mut z, c) = rule.start(p);
    let mut iter = 0;
    while iter < max_iter && z.norm() <= 2.0 {
        z = z * z + c;
        iter += 1;
    }
    iter
}
