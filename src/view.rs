use super::numerics::{ComplexDf, Df, DEFAULT_BAILOUT};
use super::uniform::{DfUniform, DoubleUniform, SingleUniform, ViewUniform};

use log::debug;

// Pan steps move the center by scale/SENSITIVITY, and one zoom step
// changes scale by 1/SENSITIVITY, so navigation speed stays
// proportional to the current zoom depth.
const SENSITIVITY: f64 = 100.0;

/// Which arithmetic the active shader runs with. `Single` is plain f32
/// (cheap, falls apart past ~1e-5 zoom), `DoubleFloat` is the emulated
/// f64 from [`crate::numerics`], `Double` is native f64 for devices
/// that have it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    Single,
    DoubleFloat,
    Double,
}

impl Precision {
    // Next strategy in the rotation, for a cycle-shader key binding.
    pub fn cycle(self) -> Self {
        match self {
            Precision::Single => Precision::DoubleFloat,
            Precision::DoubleFloat => Precision::Double,
            Precision::Double => Precision::Single,
        }
    }
}

/// Viewport state of the explorer: complex-plane center, zoom scale,
/// aspect ratio, and the active precision strategy. Master values are
/// kept in f64 and only collapsed to the precision the shader wants
/// when a uniform payload is produced.
#[derive(Clone, Copy, Debug)]
pub struct View {
    center_x: f64,
    center_y: f64,
    scale: f64,
    ratio: f64,
    precision: Precision,
}

impl Default for View {
    fn default() -> Self {
        View::new(-0.5, 0.0, 2.0, 1.0)
    }
}

impl View {
    pub fn new(center_x: f64, center_y: f64, scale: f64, ratio: f64) -> View {
        View {
            center_x,
            center_y,
            scale,
            ratio,
            precision: Precision::DoubleFloat,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
        debug!("Precision changed {:?}", precision);
    }

    pub fn cycle_precision(&mut self) -> Precision {
        self.precision = self.precision.cycle();
        debug!("Precision changed {:?}", self.precision);
        self.precision
    }

    // Shift the center by (dx, dy) steps of scale/SENSITIVITY each.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.center_x += dx * self.scale / SENSITIVITY;
        self.center_y += dy * self.scale / SENSITIVITY;

        debug!(
            "Center changed ({}, {}) ----- diff ({}, {})",
            self.center_x, self.center_y, dx, dy
        );
    }

    pub fn change_scale(&mut self, zoom_in: bool) -> f64 {
        if zoom_in {
            self.scale *= 1.0 - 1.0 / SENSITIVITY;
        } else {
            self.scale *= 1.0 + 1.0 / SENSITIVITY;
        }

        debug!("Scale changed {}", self.scale);
        self.scale
    }

    pub fn set_ratio(&mut self, width: f64, height: f64) {
        self.ratio = width / height;
        debug!("Window size changed w={} h={} ratio={}", width, height, self.ratio);
    }

    // The per-axis scale factors applied to a normalized screen offset:
    // x picks up the aspect ratio, y does not. Fed to ComplexDf::scale,
    // which multiplies element-wise on purpose.
    pub fn scale_factors(&self) -> ComplexDf {
        ComplexDf::from_f64(self.scale * self.ratio, self.scale)
    }

    /// Map a normalized screen coordinate (both axes in [-1, 1]) to its
    /// point in the complex plane, in emulated-double arithmetic:
    /// `center + a ⊙ (scale*ratio, scale)`.
    pub fn point_at(&self, ax: f32, ay: f32) -> ComplexDf {
        let center = ComplexDf::from_f64(self.center_x, self.center_y);
        let a = ComplexDf::new(Df::from_f32(ax), Df::from_f32(ay));

        center + a.scale(self.scale_factors())
    }

    /// Collapse the view into the uniform payload for the active
    /// precision strategy. Same contract for every strategy; only the
    /// arithmetic the payload carries differs.
    pub fn uniform(&self) -> ViewUniform {
        match self.precision {
            Precision::Single => ViewUniform::Single(SingleUniform {
                center_x: self.center_x as f32,
                center_y: self.center_y as f32,
                scale: self.scale as f32,
                ratio: self.ratio as f32,
            }),
            Precision::DoubleFloat => ViewUniform::DoubleFloat(DfUniform {
                center: ComplexDf::from_f64(self.center_x, self.center_y),
                scale: Df::from_f64(self.scale),
                ratio: self.ratio as f32,
                _pad: 0.0,
            }),
            Precision::Double => ViewUniform::Double(DoubleUniform {
                center_x: self.center_x,
                center_y: self.center_y,
                scale: self.scale,
                ratio: self.ratio,
            }),
        }
    }
}

/// The escape-disk test of the fractal iteration: true once the point
/// leaves the radius-2 disk, i.e. |p|^2 > 4.
pub fn escaped(p: ComplexDf) -> bool {
    p.norm_sqr() > Df::from_f64(DEFAULT_BAILOUT)
}
