//! Double-precision emulation for GPUs that only do f32: a number is
//! carried as an unevaluated sum of two f32s (high + low) and all
//! arithmetic stays in f32, so the same algorithms run unchanged in a
//! shader. Includes the complex layer and the viewport/uniform plumbing
//! a fractal explorer hangs off of it.
//!
//! Credits:
//! "Implementation of float-float operators on graphics hardware" (Da Graca & Defour 2006)
//! "Extended-Precision Floating-Point Numbers for GPU Computation" (Andrew Thall, 2007)

pub mod numerics;
pub mod uniform;
pub mod view;

pub use numerics::{ComplexDf, Df, DEFAULT_BAILOUT};
pub use uniform::{DfUniform, DoubleUniform, SingleUniform, ViewUniform};
pub use view::{escaped, Precision, View};
