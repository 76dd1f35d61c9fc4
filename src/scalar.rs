use crate::error::{MError, MResult};
use crate::quantity;
use crate::unit::{Abs, Absolute, KindOf, Quantity, Rel, Relative, SiDimensions, Unit};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Sub};

/// A single value of quantity `Q`, held in SI units and shown in `unit`.
pub struct Scalar<Q, K> {
    si: f64,
    unit: Unit<Q>,
    _kind: PhantomData<K>,
}

pub type AbsScalar<Q> = Scalar<Q, Abs>;
pub type RelScalar<Q> = Scalar<Q, Rel>;

impl<Q: Quantity, K: KindOf<Q>> Scalar<Q, K> {
    /// `value` is expressed in `unit`.
    pub fn new(value: f64, unit: Unit<Q>) -> Self {
        Self::from_si(unit.to_standard_unit(value), unit)
    }

    pub fn from_si(si: f64, unit: Unit<Q>) -> Self {
        Scalar {
            si,
            unit,
            _kind: PhantomData,
        }
    }

    pub fn si(si: f64) -> Self {
        Self::from_si(si, Q::si_unit())
    }

    pub fn si_value(&self) -> f64 {
        self.si
    }

    pub fn unit(&self) -> Unit<Q> {
        self.unit
    }

    pub fn in_unit(&self, unit: Unit<Q>) -> f64 {
        unit.from_standard_unit(self.si)
    }

    /// Value expressed in the display unit.
    pub fn value(&self) -> f64 {
        self.in_unit(self.unit)
    }

    /// Same value, shown in another unit.
    pub fn with_unit(&self, unit: Unit<Q>) -> Self {
        Self::from_si(self.si, unit)
    }
}

impl<Q, K> Clone for Scalar<Q, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Q, K> Copy for Scalar<Q, K> {}

impl<Q, K> PartialEq for Scalar<Q, K> {
    fn eq(&self, other: &Self) -> bool {
        self.si == other.si
    }
}

impl<Q, K> fmt::Debug for Scalar<Q, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scalar")
            .field("si", &self.si)
            .field("unit", &self.unit)
            .finish()
    }
}

impl<Q: Quantity, K: KindOf<Q>> fmt::Display for Scalar<Q, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value(), self.unit)
    }
}

impl<Q: Relative> Add for RelScalar<Q> {
    type Output = RelScalar<Q>;

    fn add(self, rhs: RelScalar<Q>) -> RelScalar<Q> {
        Scalar::from_si(self.si + rhs.si, self.unit)
    }
}

impl<Q: Relative> Sub for RelScalar<Q> {
    type Output = RelScalar<Q>;

    fn sub(self, rhs: RelScalar<Q>) -> RelScalar<Q> {
        Scalar::from_si(self.si - rhs.si, self.unit)
    }
}

impl<Q: Absolute> Add<RelScalar<Q::Rel>> for AbsScalar<Q> {
    type Output = AbsScalar<Q>;

    fn add(self, rhs: RelScalar<Q::Rel>) -> AbsScalar<Q> {
        Scalar::from_si(self.si + rhs.si, self.unit)
    }
}

impl<Q: Absolute> Sub<RelScalar<Q::Rel>> for AbsScalar<Q> {
    type Output = AbsScalar<Q>;

    fn sub(self, rhs: RelScalar<Q::Rel>) -> AbsScalar<Q> {
        Scalar::from_si(self.si - rhs.si, self.unit)
    }
}

impl<Q: Absolute> Sub for AbsScalar<Q> {
    type Output = RelScalar<Q::Rel>;

    fn sub(self, rhs: AbsScalar<Q>) -> RelScalar<Q::Rel> {
        Scalar::si(self.si - rhs.si)
    }
}

impl<Q1: Relative, Q2: Relative> Mul<RelScalar<Q2>> for RelScalar<Q1> {
    type Output = SiScalar;

    fn mul(self, rhs: RelScalar<Q2>) -> SiScalar {
        SiScalar::new(self.si * rhs.si, Q1::DIMENSIONS.plus(&Q2::DIMENSIONS))
    }
}

impl<Q1: Relative, Q2: Relative> Div<RelScalar<Q2>> for RelScalar<Q1> {
    type Output = SiScalar;

    fn div(self, rhs: RelScalar<Q2>) -> SiScalar {
        SiScalar::new(self.si / rhs.si, Q1::DIMENSIONS.minus(&Q2::DIMENSIONS))
    }
}

/// Result of multiplying or dividing relative scalars, tagged only with its
/// SI dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiScalar {
    si: f64,
    dimensions: SiDimensions,
}

impl SiScalar {
    pub fn new(si: f64, dimensions: SiDimensions) -> SiScalar {
        SiScalar { si, dimensions }
    }

    pub fn si_value(&self) -> f64 {
        self.si
    }

    pub fn dimensions(&self) -> SiDimensions {
        self.dimensions
    }

    /// Name of the registered quantity with these dimensions, or `"SI"`.
    pub fn quantity_name(&self) -> &'static str {
        quantity::lookup(&self.dimensions).map_or("SI", |i| i.name)
    }

    pub fn into_quantity<Q: Relative>(self) -> MResult<RelScalar<Q>> {
        if Q::DIMENSIONS != self.dimensions {
            return Err(MError::DimensionMismatch {
                expected: Q::DIMENSIONS,
                got: self.dimensions,
            });
        }
        Ok(Scalar::si(self.si))
    }
}

impl fmt::Display for SiScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.si, self.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::{AbsoluteTemperature, Duration, Length, Position, Speed, Temperature};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_display_unit_round_trip() {
        let l = RelScalar::new(2.5, Length::KILOMETER);
        assert_eq!(l.si_value(), 2500.0);
        assert_abs_diff_eq!(l.value(), 2.5);
        assert_abs_diff_eq!(l.in_unit(Length::METER), 2500.0);
        assert_eq!(l.to_string(), "2.5 km");
    }

    #[test]
    fn test_closure_table() {
        let p1 = AbsScalar::new(10.0, Position::METER);
        let p2 = AbsScalar::new(4.0, Position::METER);
        let d = RelScalar::new(3.0, Length::METER);

        let diff: RelScalar<Length> = p1 - p2;
        assert_eq!(diff.si_value(), 6.0);

        let moved: AbsScalar<Position> = p1 + d;
        assert_eq!(moved.si_value(), 13.0);
        assert_eq!((p1 - d).si_value(), 7.0);

        let total: RelScalar<Length> = d + diff;
        assert_eq!(total.si_value(), 9.0);
        assert_eq!((total - d).si_value(), 6.0);
    }

    #[test]
    fn test_offset_units() {
        let t1 = AbsScalar::new(20.0, AbsoluteTemperature::DEGREE_CELSIUS);
        let t2 = AbsScalar::new(0.0, AbsoluteTemperature::DEGREE_CELSIUS);
        let dt: RelScalar<Temperature> = t1 - t2;
        assert_abs_diff_eq!(dt.si_value(), 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t1.in_unit(AbsoluteTemperature::KELVIN), 293.15, epsilon = 1e-9);
    }

    #[test]
    fn test_product_and_quotient() {
        let l = RelScalar::new(100.0, Length::METER);
        let t = RelScalar::new(20.0, Duration::SECOND);
        let v = l / t;
        assert_eq!(v.si_value(), 5.0);
        assert_eq!(v.quantity_name(), "Speed");
        let speed = v.into_quantity::<Speed>().unwrap();
        assert_eq!(speed.unit(), Speed::METER_PER_SECOND);

        let lt = l * t;
        assert_eq!(lt.quantity_name(), "SI");
        assert!(matches!(
            lt.into_quantity::<Speed>(),
            Err(MError::DimensionMismatch { .. })
        ));
    }
}
