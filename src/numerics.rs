use bytemuck::{Pod, Zeroable};

use std::cmp::Ordering;
use std::ops::{Add, Mul, Neg, Sub};

pub const DEFAULT_BAILOUT: f64 = 4.0;

// Splitting constant for the two-product transform: 2^13 + 1 breaks an
// f32 mantissa into two non-overlapping ~12-bit halves, so the four
// half-products below are exact in f32.
const SPLIT: f32 = 8193.0;

// Double-float, which is our 'bypass' of the GPU's lack of f64.
// On that note, using two floats in this way is far more robust
// accross a wider set of GPUs. While not giving 53 bits of precision,
// this can theoreticly give us up to 48 bits - i.e. 24+24 as f32
// has 24 bits - though in practice it will likely yeild only 40-44.
//
// The value is hi + lo in non-overlapping form: hi is the f32 rounding
// of the represented number, lo the rounding error of that truncation.
// Every operation here keeps that form, using nothing but f32
// arithmetic, so results match the shader port step for step.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct Df {
    pub hi: f32,
    pub lo: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct ComplexDf {
    pub re: Df,
    pub im: Df,
}

impl Df {
    pub const ZERO: Df = Df { hi: 0.0, lo: 0.0 };

    // Raw pair. No normalization is done; the caller is responsible
    // for keeping hi/lo non-overlapping (used for literals like 4.0).
    pub fn new(hi: f32, lo: f32) -> Self {
        Self { hi, lo }
    }

    // Round x to f32 for the high part, and keep the truncation
    // residual as the low part.
    pub fn from_f64(x: f64) -> Self {
        let hi = x as f32;
        let lo = (x - hi as f64) as f32;
        Self { hi, lo }
    }

    pub fn from_f32(x: f32) -> Self {
        Self { hi: x, lo: 0.0 }
    }

    pub fn to_f64(self) -> f64 {
        self.hi as f64 + self.lo as f64
    }

    // Round to nearest float (ignore low part)
    pub fn to_f32(self) -> f32 {
        self.hi
    }

    // The uniform slot layout: hi then lo, nothing else.
    pub fn to_array(self) -> [f32; 2] {
        [self.hi, self.lo]
    }
}

impl From<f64> for Df {
    fn from(x: f64) -> Self {
        Df::from_f64(x)
    }
}

impl From<Df> for f64 {
    fn from(x: Df) -> Self {
        x.to_f64()
    }
}

impl Neg for Df {
    type Output = Df;

    fn neg(self) -> Df {
        Df::new(-self.hi, -self.lo)
    }
}

impl Add for Df {
    type Output = Df;

    // Two-sum with the rounding error of hi + hi recovered and folded
    // back in together with both low parts. Adding the two his and the
    // two los independently would drop the carry whenever one hi is
    // absorbed into the other.
    fn add(self, rhs: Df) -> Df {
        let r = self.hi + rhs.hi;
        let e = r - self.hi;
        let s = ((rhs.hi - e) + (self.hi - (r - e))) + self.lo + rhs.lo;

        // renormalize back into non-overlapping form
        let h = r + s;
        let l = s - (h - r);
        Df::new(h, l)
    }
}

impl Sub for Df {
    type Output = Df;

    fn sub(self, rhs: Df) -> Df {
        self + (-rhs)
    }
}

impl Mul for Df {
    type Output = Df;

    // Two-product: split each hi into halves so the partial products
    // are exact, recover the rounding error of hi*hi, then fold in the
    // cross terms and lo*lo through the same two-sum tail as Add.
    fn mul(self, rhs: Df) -> Df {
        let ca = SPLIT * self.hi;
        let cb = SPLIT * rhs.hi;

        let v1a = ca - (ca - self.hi);
        let v1b = cb - (cb - rhs.hi);

        let v2a = self.hi - v1a;
        let v2b = rhs.hi - v1b;

        let c11 = self.hi * rhs.hi; // product of the high parts
        let c21 = v2a * v2b + (v2a * v1b + (v1a * v2b + (v1a * v1b - c11)));

        let c2 = self.hi * rhs.lo + self.lo * rhs.hi; // cross-products

        let r = c11 + c2;
        let e = r - c11;
        let s = self.lo * rhs.lo + ((c2 - e) + (c11 - (r - e)) + c21);

        let h = r + s;
        let l = s - (h - r);
        Df::new(h, l)
    }
}

impl PartialEq for Df {
    fn eq(&self, other: &Self) -> bool {
        self.hi == other.hi && self.lo == other.lo
    }
}

impl PartialOrd for Df {
    // Lexicographic on (hi, lo). Matches value order only for pairs in
    // non-overlapping form; raw un-normalized pairs compare arbitrarily.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi) {
            Some(Ordering::Equal) => self.lo.partial_cmp(&other.lo),
            ord => ord,
        }
    }
}

impl ComplexDf {
    pub const ZERO: ComplexDf = ComplexDf {
        re: Df::ZERO,
        im: Df::ZERO,
    };

    pub fn new(re: Df, im: Df) -> Self {
        Self { re, im }
    }

    pub fn from_f64(re: f64, im: f64) -> Self {
        Self {
            re: Df::from_f64(re),
            im: Df::from_f64(im),
        }
    }

    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    // Element-wise scale: re * factor.re, im * factor.im. This is NOT
    // complex multiplication and must stay that way - it applies the
    // independent x/y scale-and-aspect factors of the viewport to an
    // image-plane offset.
    pub fn scale(self, factor: ComplexDf) -> Self {
        Self::new(self.re * factor.re, self.im * factor.im)
    }

    // re^2 + im^2, as the real part of a * conj(a).
    pub fn norm_sqr(self) -> Df {
        (self * self.conj()).re
    }

    // re.hi, re.lo, im.hi, im.lo - the 4-component uniform slot layout.
    pub fn to_array(self) -> [f32; 4] {
        [self.re.hi, self.re.lo, self.im.hi, self.im.lo]
    }
}

impl PartialEq for ComplexDf {
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re && self.im == other.im
    }
}

impl Neg for ComplexDf {
    type Output = ComplexDf;

    fn neg(self) -> ComplexDf {
        ComplexDf::new(-self.re, -self.im)
    }
}

impl Add for ComplexDf {
    type Output = ComplexDf;

    fn add(self, rhs: ComplexDf) -> ComplexDf {
        ComplexDf::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Mul for ComplexDf {
    type Output = ComplexDf;

    fn mul(self, rhs: ComplexDf) -> ComplexDf {
        ComplexDf::new(
            self.re * rhs.re + (-(self.im * rhs.im)),
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Values the original explorer navigates to; both coordinates lose
    // visible precision when crammed into a single f32.
    const PROBES: [f64; 5] = [1.93649, 2.86129e-6, -0.487776, 1.32283, 3.00874e-6];

    fn rel_err(got: f64, want: f64) -> f64 {
        (got - want).abs() / want.abs().max(f64::MIN_POSITIVE)
    }

    #[test]
    fn round_trip_beats_bare_f32() {
        for x in PROBES {
            let df = Df::from_f64(x);
            let f32_err = rel_err(x as f32 as f64, x);
            let df_err = rel_err(df.to_f64(), x);

            assert!(df_err < 1e-13, "x={x} df_err={df_err}");
            assert!(df_err < f32_err, "x={x} df_err={df_err} f32_err={f32_err}");
        }
    }

    #[test]
    fn round_trip_random_sweep() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..10_000 {
            let mag = 10f64.powi(rng.i32(-20..=20));
            let x = (rng.f64() - 0.5) * 2.0 * mag;
            let df = Df::from_f64(x);
            assert!(
                rel_err(df.to_f64(), x) < 1e-13,
                "x={x} got={}",
                df.to_f64()
            );
        }
    }

    #[test]
    fn add_matches_f64_sum() {
        let mut rng = fastrand::Rng::with_seed(0xadd);
        for _ in 0..10_000 {
            let a = (rng.f64() - 0.5) * 2.0e6;
            let b = (rng.f64() - 0.5) * 2.0e6;

            let got = (Df::from_f64(a) + Df::from_f64(b)).to_f64();
            let want = a + b;
            let tol = 1e-13 * (a.abs() + b.abs()).max(1.0);
            assert!(
                (got - want).abs() <= tol,
                "a={a} b={b} got={got} want={want}"
            );
        }
    }

    #[test]
    fn add_recovers_absorbed_carry() {
        // 1e-8 is below half an ulp of 1.0 in f32, so the naive hi+hi
        // sum absorbs it completely. The two-sum keeps it in lo.
        let a = 1.0f64;
        let b = 1.0e-8f64;
        let da = Df::from_f64(a);
        let db = Df::from_f64(b);

        let sum = (da + db).to_f64();
        let naive = Df::new(da.hi + db.hi, da.lo + db.lo).to_f64();

        assert!((sum - (a + b)).abs() < 1e-13);
        assert!((naive - (a + b)).abs() > 1e-9);
    }

    #[test]
    fn mul_matches_f64_product() {
        let got = (Df::from_f64(3.00874e-6) * Df::from_f64(1.325)).to_f64();
        let want = 3.00874e-6 * 1.325;
        assert!(rel_err(got, want) < 1e-13, "got={got} want={want}");

        let mut rng = fastrand::Rng::with_seed(0x2112);
        for _ in 0..10_000 {
            let a = (rng.f64() - 0.5) * 2.0e3;
            let b = (rng.f64() - 0.5) * 2.0e3;

            let got = (Df::from_f64(a) * Df::from_f64(b)).to_f64();
            let want = a * b;
            let tol = 1e-13 * want.abs().max(1.0);
            assert!(
                (got - want).abs() <= tol,
                "a={a} b={b} got={got} want={want}"
            );
        }
    }

    #[test]
    fn compare_follows_represented_value() {
        let mut rng = fastrand::Rng::with_seed(0xc3);
        for _ in 0..10_000 {
            let a = Df::from_f64((rng.f64() - 0.5) * 8.0);
            let b = Df::from_f64((rng.f64() - 0.5) * 8.0);
            assert_eq!(a.partial_cmp(&b), a.to_f64().partial_cmp(&b.to_f64()));
        }
    }

    #[test]
    fn compare_sees_past_equal_high_parts() {
        // Both round to the same f32, so only lo distinguishes them.
        let a = Df::from_f64(1.0 + 1.0e-9);
        let b = Df::from_f64(1.0);
        assert_eq!(a.hi, b.hi);
        assert!(a > b);
        assert!(b < a);
        assert_eq!(a, a);
    }

    #[test]
    fn negate_is_exact_involution() {
        for x in PROBES {
            let a = Df::from_f64(x);
            let back = -(-a);
            assert_eq!(back.hi.to_bits(), a.hi.to_bits());
            assert_eq!(back.lo.to_bits(), a.lo.to_bits());
            assert_eq!(back.to_f64(), a.to_f64());
        }
    }

    #[test]
    fn operations_are_deterministic() {
        let a = Df::from_f64(1.93649);
        let b = Df::from_f64(2.86129e-6);

        let s1 = a + b;
        let s2 = a + b;
        assert_eq!(s1.hi.to_bits(), s2.hi.to_bits());
        assert_eq!(s1.lo.to_bits(), s2.lo.to_bits());

        let p1 = a * b;
        let p2 = a * b;
        assert_eq!(p1.hi.to_bits(), p2.hi.to_bits());
        assert_eq!(p1.lo.to_bits(), p2.lo.to_bits());
    }

    #[test]
    fn complex_mul_matches_f64() {
        let a = ComplexDf::from_f64(-0.487776, 1.32283);
        let b = ComplexDf::from_f64(0.25, -1.5);

        let got = a * b;
        let want_re = -0.487776 * 0.25 - 1.32283 * -1.5;
        let want_im = -0.487776 * -1.5 + 1.32283 * 0.25;

        assert!(rel_err(got.re.to_f64(), want_re) < 1e-13);
        assert!(rel_err(got.im.to_f64(), want_im) < 1e-13);
    }

    #[test]
    fn scale_is_element_wise() {
        // (a.re*f.re, a.im*f.im) with no cross terms, unlike complex
        // multiplication.
        let a = ComplexDf::from_f64(0.5, -0.25);
        let f = ComplexDf::from_f64(2.86129e-6 * 1.25, 2.86129e-6);

        let got = a.scale(f);
        assert!(rel_err(got.re.to_f64(), 0.5 * 2.86129e-6 * 1.25) < 1e-13);
        assert!(rel_err(got.im.to_f64(), -0.25 * 2.86129e-6) < 1e-13);
    }

    #[test]
    fn norm_sqr_matches_f64() {
        let p = ComplexDf::from_f64(-0.487776, 1.32283);
        let want = 0.487776f64 * 0.487776 + 1.32283 * 1.32283;
        assert!(rel_err(p.norm_sqr().to_f64(), want) < 1e-13);
    }

    #[test]
    fn pod_layout_is_two_packed_floats() {
        assert_eq!(std::mem::size_of::<Df>(), 8);
        assert_eq!(std::mem::size_of::<ComplexDf>(), 16);

        let a = Df::from_f64(1.93649);
        let pair: [f32; 2] = bytemuck::cast(a);
        assert_eq!(pair, a.to_array());

        let c = ComplexDf::from_f64(-0.5, 1.93649);
        let quad: [f32; 4] = bytemuck::cast(c);
        assert_eq!(quad, c.to_array());
    }
}
