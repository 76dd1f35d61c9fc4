use half::f16;
use num_traits::Float;
use std::fmt::Debug;

/// Cell type of a matrix store. Unit scales compute in `f64`, so every
/// element converts to and from `f64`.
pub trait Element: Float + Debug + Send + Sync + 'static {
    fn from_f64(v: f64) -> Self;

    fn as_f64(self) -> f64;

    /// Raw bit pattern, used for hashing.
    fn bits(self) -> u64;

    /// Round to the nearest integer, ties to even.
    fn rint(self) -> Self {
        let r = self.round();
        let diff = r - self;
        if diff.abs() == Self::from_f64(0.5) && r % Self::from_f64(2.0) != Self::zero() {
            r - diff.signum()
        } else {
            r
        }
    }
}

macro_rules! impl_element {
    ($t:ty) => {
        impl Element for $t {
            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn as_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn bits(self) -> u64 {
                self.to_bits() as u64
            }
        }
    };
}

impl_element!(f32);
impl_element!(f64);

impl Element for f16 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }

    #[inline]
    fn as_f64(self) -> f64 {
        f16::to_f64(self)
    }

    #[inline]
    fn bits(self) -> u64 {
        self.to_bits() as u64
    }
}
