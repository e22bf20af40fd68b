use bytemuck::{Pod, Zeroable};

use super::numerics::{ComplexDf, Df};

// One uniform payload per precision strategy. Each struct is the exact
// byte image the matching shader expects, uploaded verbatim with no
// translation - so layout here is load-bearing: repr(C), f32/f64 only,
// hi before lo.

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SingleUniform {
    pub center_x: f32,
    pub center_y: f32,
    pub scale: f32,
    pub ratio: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DfUniform {
    pub center: ComplexDf, // vec4: center_x_hi, center_x_lo, center_y_hi, center_y_lo
    pub scale: Df,         // vec2: scale_hi, scale_lo
    pub ratio: f32,
    pub _pad: f32, // round the block out to a 16-byte multiple
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DoubleUniform {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
    pub ratio: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewUniform {
    Single(SingleUniform),
    DoubleFloat(DfUniform),
    Double(DoubleUniform),
}

impl ViewUniform {
    // The bytes to hand to the uniform buffer, as-is.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ViewUniform::Single(u) => bytemuck::bytes_of(u),
            ViewUniform::DoubleFloat(u) => bytemuck::bytes_of(u),
            ViewUniform::Double(u) => bytemuck::bytes_of(u),
        }
    }
}
