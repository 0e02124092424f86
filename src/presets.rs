use crate::{
    fractal_image::{FractalJob, Window},
    rules::{EscapeRule, Julia, Mandelbrot, JULIA_C},
};

pub const IMG_WIDTH: u32 = 400;
pub const IMG_HEIGHT: u32 = 300;
pub const MAX_ITER: u32 = 1000;

pub struct Preset {
    name: &'static str,
    file_name: &'static str,
    window: Window,
    rule: Box<dyn EscapeRule>,
}

impl Preset {
    fn new(
        name: &'static str,
        file_name: &'static str,
        window: Window,
        rule: Box<dyn EscapeRule>,
    ) -> Preset {
        Preset {
            name,
            file_name,
            window,
            rule,
        }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    /// The file the image is written to when no other path is given
    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
    pub fn window(&self) -> Window {
        self.window
    }
    pub fn job(&self) -> FractalJob {
        FractalJob {
            width: IMG_WIDTH,
            height: IMG_HEIGHT,
            window: self.window,
            max_iter: MAX_ITER,
            rule: self.rule.clone(),
        }
    }
}

pub struct Presets {
    values: Vec<Preset>,
}

impl Presets {
    pub fn new() -> Presets {
        let values = vec![
            Preset::new(
                "mandelbrot",
                "fractal.bmp",
                Window::new(-2.0, 0.0, -0.67, 0.67),
                Box::new(Mandelbrot {}),
            ),
            Preset::new(
                "julia",
                "julia_fractal.bmp",
                Window::new(-1.5, 1.5, -1.0, 1.0),
                Box::new(Julia::new(JULIA_C)),
            ),
        ];
        Presets { values }
    }
    pub fn names(&self) -> Vec<&'static str> {
        self.values.iter().map(|p| p.name).collect()
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn get(&self, i: usize) -> &Preset {
        assert!(i < self.len());
        &self.values[i]
    }
    pub fn by_name(&self, name: &str) -> Option<&Preset> {
        self.values.iter().find(|p| p.name == name)
    }
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.values.iter()
    }
}

impl Default for Presets {
    fn default() -> Self {
        Presets::new()
    }
}
