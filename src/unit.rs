use std::fmt;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Conversion between a display unit and the SI unit of its quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Identity,
    Linear(f64),
    /// `si = (value + offset) * factor`, e.g. degree Celsius to kelvin.
    Offset { factor: f64, offset: f64 },
}

impl Scale {
    #[inline]
    pub fn to_standard_unit(&self, value: f64) -> f64 {
        match *self {
            Scale::Identity => value,
            Scale::Linear(factor) => value * factor,
            Scale::Offset { factor, offset } => (value + offset) * factor,
        }
    }

    #[inline]
    pub fn from_standard_unit(&self, value: f64) -> f64 {
        match *self {
            Scale::Identity => value,
            Scale::Linear(factor) => value / factor,
            Scale::Offset { factor, offset } => value / factor - offset,
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Scale::Identity)
    }
}

const NUMBER_DIMENSIONS: usize = 9;

const SI_ABBREVIATIONS: [&str; NUMBER_DIMENSIONS] =
    ["rad", "sr", "kg", "m", "s", "A", "K", "mol", "cd"];

/// Integer exponents of the SI base units, in the order
/// rad, sr, kg, m, s, A, K, mol, cd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SiDimensions([i8; NUMBER_DIMENSIONS]);

impl SiDimensions {
    pub const DIMENSIONLESS: SiDimensions = SiDimensions([0; NUMBER_DIMENSIONS]);

    pub const fn new(dimensions: [i8; NUMBER_DIMENSIONS]) -> SiDimensions {
        SiDimensions(dimensions)
    }

    /// Exponents without the angle and solid angle slots.
    pub const fn base(kg: i8, m: i8, s: i8, a: i8, k: i8, mol: i8, cd: i8) -> SiDimensions {
        SiDimensions([0, 0, kg, m, s, a, k, mol, cd])
    }

    pub fn exponents(&self) -> &[i8; NUMBER_DIMENSIONS] {
        &self.0
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    /// Dimensions of a product.
    pub fn plus(&self, other: &SiDimensions) -> SiDimensions {
        let mut d = self.0;
        d.iter_mut().zip(other.0.iter()).for_each(|(a, b)| *a += b);
        SiDimensions(d)
    }

    /// Dimensions of a quotient.
    pub fn minus(&self, other: &SiDimensions) -> SiDimensions {
        let mut d = self.0;
        d.iter_mut().zip(other.0.iter()).for_each(|(a, b)| *a -= b);
        SiDimensions(d)
    }

    pub fn invert(&self) -> SiDimensions {
        SiDimensions::DIMENSIONLESS.minus(self)
    }
}

/// Formats as `kgm/s2`; a dimensionless value prints as `1`.
impl fmt::Display for SiDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_part(f: &mut fmt::Formatter<'_>, abbr: &str, exp: i8) -> fmt::Result {
            if exp == 1 {
                write!(f, "{}", abbr)
            } else {
                write!(f, "{}{}", abbr, exp)
            }
        }

        let mut numerator = false;
        for (abbr, &e) in SI_ABBREVIATIONS.iter().zip(self.0.iter()) {
            if e > 0 {
                write_part(f, abbr, e)?;
                numerator = true;
            }
        }
        if self.0.iter().any(|&e| e < 0) {
            if !numerator {
                write!(f, "1")?;
            }
            write!(f, "/")?;
            for (abbr, &e) in SI_ABBREVIATIONS.iter().zip(self.0.iter()) {
                if e < 0 {
                    write_part(f, abbr, -e)?;
                }
            }
        } else if !numerator {
            write!(f, "1")?;
        }
        Ok(())
    }
}

/// Display unit of a quantity `Q`.
pub struct Unit<Q> {
    name: &'static str,
    abbreviation: &'static str,
    scale: Scale,
    _quantity: PhantomData<fn() -> Q>,
}

impl<Q> Unit<Q> {
    pub const fn new(name: &'static str, abbreviation: &'static str, scale: Scale) -> Unit<Q> {
        Unit {
            name,
            abbreviation,
            scale,
            _quantity: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn abbreviation(&self) -> &'static str {
        self.abbreviation
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    #[inline]
    pub fn to_standard_unit(&self, value: f64) -> f64 {
        self.scale.to_standard_unit(value)
    }

    #[inline]
    pub fn from_standard_unit(&self, value: f64) -> f64 {
        self.scale.from_standard_unit(value)
    }
}

impl<Q> Clone for Unit<Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Q> Copy for Unit<Q> {}

impl<Q> PartialEq for Unit<Q> {
    fn eq(&self, other: &Self) -> bool {
        self.abbreviation == other.abbreviation && self.scale == other.scale
    }
}

impl<Q> Debug for Unit<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("name", &self.name)
            .field("abbreviation", &self.abbreviation)
            .field("scale", &self.scale)
            .finish()
    }
}

impl<Q> fmt::Display for Unit<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation)
    }
}

/// A physical quantity, as a zero-sized marker type.
pub trait Quantity: Copy + Debug + Send + Sync + 'static {
    const NAME: &'static str;
    const DIMENSIONS: SiDimensions;

    fn si_unit() -> Unit<Self>;
}

/// A quantity forming a vector space, such as a length or a duration.
pub trait Relative: Quantity {}

/// A point on a continuum, such as a position or a time. The difference of
/// two points is its relative quantity.
pub trait Absolute: Quantity {
    type Rel: Relative;
}

pub trait Kind: Copy + Debug + Send + Sync + 'static {
    const ABSOLUTE: bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Abs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rel;

impl Kind for Abs {
    const ABSOLUTE: bool = true;
}

impl Kind for Rel {
    const ABSOLUTE: bool = false;
}

/// Admits only absolute quantities under [`Abs`] and relative ones under
/// [`Rel`].
pub trait KindOf<Q: Quantity>: Kind {}

impl<Q: Absolute> KindOf<Q> for Abs {}

impl<Q: Relative> KindOf<Q> for Rel {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_scale_round_trip() {
        let celsius = Scale::Offset {
            factor: 1.0,
            offset: 273.15,
        };
        assert_abs_diff_eq!(celsius.to_standard_unit(0.0), 273.15);
        assert_abs_diff_eq!(celsius.from_standard_unit(273.15), 0.0);

        let fahrenheit = Scale::Offset {
            factor: 5.0 / 9.0,
            offset: 459.67,
        };
        assert_abs_diff_eq!(fahrenheit.to_standard_unit(32.0), 273.15, epsilon = 1e-9);

        let km = Scale::Linear(1000.0);
        assert_eq!(km.to_standard_unit(1.5), 1500.0);
        assert_eq!(km.from_standard_unit(1500.0), 1.5);
        assert!(Scale::Identity.is_base());
    }

    #[test]
    fn test_dimensions_algebra() {
        let length = SiDimensions::base(0, 1, 0, 0, 0, 0, 0);
        let time = SiDimensions::base(0, 0, 1, 0, 0, 0, 0);
        let speed = length.minus(&time);
        assert_eq!(speed, SiDimensions::base(0, 1, -1, 0, 0, 0, 0));
        assert_eq!(length.plus(&length), SiDimensions::base(0, 2, 0, 0, 0, 0, 0));
        assert!(speed.minus(&speed).is_dimensionless());
        assert_eq!(time.invert(), SiDimensions::base(0, 0, -1, 0, 0, 0, 0));
    }

    #[test]
    fn test_dimensions_display() {
        assert_eq!(SiDimensions::base(1, 1, -2, 0, 0, 0, 0).to_string(), "kgm/s2");
        assert_eq!(SiDimensions::base(0, 0, -1, 0, 0, 0, 0).to_string(), "1/s");
        assert_eq!(SiDimensions::DIMENSIONLESS.to_string(), "1");
        assert_eq!(SiDimensions::new([1, 0, 0, 0, 0, 0, 0, 0, 0]).to_string(), "rad");
    }
}
