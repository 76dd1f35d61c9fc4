use crate::unit::{Relative, Scale, SiDimensions};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Declares a relative quantity marker type with its units. The first unit
/// listed must be the SI unit.
#[macro_export]
macro_rules! relative_quantity {
    (
        $(#[$meta:meta])*
        $name:ident, $dims:expr,
        $si:ident => ($si_name:expr, $si_abbr:expr)
        $(, $unit:ident => ($u_name:expr, $u_abbr:expr, $scale:expr))* $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name;

        impl $name {
            pub const $si: $crate::Unit<$name> =
                $crate::Unit::new($si_name, $si_abbr, $crate::Scale::Identity);
            $(
                pub const $unit: $crate::Unit<$name> = $crate::Unit::new($u_name, $u_abbr, $scale);
            )*
        }

        impl $crate::Quantity for $name {
            const NAME: &'static str = stringify!($name);
            const DIMENSIONS: $crate::SiDimensions = $dims;

            fn si_unit() -> $crate::Unit<$name> {
                $name::$si
            }
        }

        impl $crate::Relative for $name {}
    };
}

/// Declares an absolute quantity paired with an existing relative one. The
/// first unit listed must be the SI unit.
#[macro_export]
macro_rules! absolute_quantity {
    (
        $(#[$meta:meta])*
        $name:ident, $rel:ty,
        $si:ident => ($si_name:expr, $si_abbr:expr)
        $(, $unit:ident => ($u_name:expr, $u_abbr:expr, $scale:expr))* $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name;

        impl $name {
            pub const $si: $crate::Unit<$name> =
                $crate::Unit::new($si_name, $si_abbr, $crate::Scale::Identity);
            $(
                pub const $unit: $crate::Unit<$name> = $crate::Unit::new($u_name, $u_abbr, $scale);
            )*
        }

        impl $crate::Quantity for $name {
            const NAME: &'static str = stringify!($name);
            const DIMENSIONS: $crate::SiDimensions = <$rel as $crate::Quantity>::DIMENSIONS;

            fn si_unit() -> $crate::Unit<$name> {
                $name::$si
            }
        }

        impl $crate::Absolute for $name {
            type Rel = $rel;
        }
    };
}

relative_quantity!(
    Dimensionless, SiDimensions::DIMENSIONLESS,
    SI => ("unit", "")
);

relative_quantity!(
    Length, SiDimensions::base(0, 1, 0, 0, 0, 0, 0),
    METER => ("meter", "m"),
    MILLIMETER => ("millimeter", "mm", Scale::Linear(1.0e-3)),
    CENTIMETER => ("centimeter", "cm", Scale::Linear(1.0e-2)),
    KILOMETER => ("kilometer", "km", Scale::Linear(1.0e3)),
    FOOT => ("foot", "ft", Scale::Linear(0.3048)),
    MILE => ("mile", "mi", Scale::Linear(1609.344)),
);

absolute_quantity!(
    Position, Length,
    METER => ("meter", "m"),
    KILOMETER => ("kilometer", "km", Scale::Linear(1.0e3)),
    FOOT => ("foot", "ft", Scale::Linear(0.3048)),
);

relative_quantity!(
    Duration, SiDimensions::base(0, 0, 1, 0, 0, 0, 0),
    SECOND => ("second", "s"),
    MILLISECOND => ("millisecond", "ms", Scale::Linear(1.0e-3)),
    MINUTE => ("minute", "min", Scale::Linear(60.0)),
    HOUR => ("hour", "h", Scale::Linear(3600.0)),
    DAY => ("day", "d", Scale::Linear(86400.0)),
);

absolute_quantity!(
    Time, Duration,
    BASE_SECOND => ("second", "s"),
    BASE_HOUR => ("hour", "h", Scale::Linear(3600.0)),
);

relative_quantity!(
    Angle, SiDimensions::new([1, 0, 0, 0, 0, 0, 0, 0, 0]),
    RADIAN => ("radian", "rad"),
    DEGREE => ("degree", "deg", Scale::Linear(std::f64::consts::PI / 180.0)),
);

absolute_quantity!(
    Direction, Angle,
    EAST_RADIAN => ("radians (East)", "rad(E)"),
    EAST_DEGREE => ("degrees (East)", "deg(E)", Scale::Linear(std::f64::consts::PI / 180.0)),
);

relative_quantity!(
    Temperature, SiDimensions::base(0, 0, 0, 0, 1, 0, 0),
    KELVIN => ("kelvin", "K"),
    DEGREE_CELSIUS => ("degree Celsius", "dC", Scale::Linear(1.0)),
    DEGREE_FAHRENHEIT => ("degree Fahrenheit", "dF", Scale::Linear(5.0 / 9.0)),
);

absolute_quantity!(
    AbsoluteTemperature, Temperature,
    KELVIN => ("kelvin", "K"),
    DEGREE_CELSIUS => (
        "degree Celsius",
        "dC",
        Scale::Offset { factor: 1.0, offset: 273.15 }
    ),
    DEGREE_FAHRENHEIT => (
        "degree Fahrenheit",
        "dF",
        Scale::Offset { factor: 5.0 / 9.0, offset: 459.67 }
    ),
);

relative_quantity!(
    Mass, SiDimensions::base(1, 0, 0, 0, 0, 0, 0),
    KILOGRAM => ("kilogram", "kg"),
    GRAM => ("gram", "g", Scale::Linear(1.0e-3)),
    TONNE => ("tonne", "t", Scale::Linear(1.0e3)),
);

relative_quantity!(
    Area, SiDimensions::base(0, 2, 0, 0, 0, 0, 0),
    SQUARE_METER => ("square meter", "m2"),
    HECTARE => ("hectare", "ha", Scale::Linear(1.0e4)),
);

relative_quantity!(
    Volume, SiDimensions::base(0, 3, 0, 0, 0, 0, 0),
    CUBIC_METER => ("cubic meter", "m3"),
    LITER => ("liter", "L", Scale::Linear(1.0e-3)),
);

relative_quantity!(
    Speed, SiDimensions::base(0, 1, -1, 0, 0, 0, 0),
    METER_PER_SECOND => ("meter per second", "m/s"),
    KM_PER_HOUR => ("kilometer per hour", "km/h", Scale::Linear(1.0 / 3.6)),
);

relative_quantity!(
    Acceleration, SiDimensions::base(0, 1, -2, 0, 0, 0, 0),
    METER_PER_SECOND_2 => ("meter per second squared", "m/s2"),
    STANDARD_GRAVITY => ("standard gravity", "g0", Scale::Linear(9.80665)),
);

relative_quantity!(
    Force, SiDimensions::base(1, 1, -2, 0, 0, 0, 0),
    NEWTON => ("newton", "N"),
    KILONEWTON => ("kilonewton", "kN", Scale::Linear(1.0e3)),
);

relative_quantity!(
    Energy, SiDimensions::base(1, 2, -2, 0, 0, 0, 0),
    JOULE => ("joule", "J"),
    KILOWATT_HOUR => ("kilowatt-hour", "kWh", Scale::Linear(3.6e6)),
);

relative_quantity!(
    Frequency, SiDimensions::base(0, 0, -1, 0, 0, 0, 0),
    HERTZ => ("hertz", "Hz"),
    KILOHERTZ => ("kilohertz", "kHz", Scale::Linear(1.0e3)),
);

/// Registry entry describing a relative quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityInfo {
    pub name: &'static str,
    pub dimensions: SiDimensions,
    pub si_abbreviation: &'static str,
}

impl QuantityInfo {
    pub fn of<Q: Relative>() -> QuantityInfo {
        QuantityInfo {
            name: Q::NAME,
            dimensions: Q::DIMENSIONS,
            si_abbreviation: Q::si_unit().abbreviation(),
        }
    }
}

lazy_static! {
    static ref REGISTRY: HashMap<SiDimensions, QuantityInfo> = {
        let mut m = HashMap::new();
        for info in [
            QuantityInfo::of::<Dimensionless>(),
            QuantityInfo::of::<Length>(),
            QuantityInfo::of::<Duration>(),
            QuantityInfo::of::<Angle>(),
            QuantityInfo::of::<Temperature>(),
            QuantityInfo::of::<Mass>(),
            QuantityInfo::of::<Area>(),
            QuantityInfo::of::<Volume>(),
            QuantityInfo::of::<Speed>(),
            QuantityInfo::of::<Acceleration>(),
            QuantityInfo::of::<Force>(),
            QuantityInfo::of::<Energy>(),
            QuantityInfo::of::<Frequency>(),
        ] {
            m.insert(info.dimensions, info);
        }
        m
    };
}

/// The registered relative quantity with these SI dimensions, if any.
pub fn lookup(dimensions: &SiDimensions) -> Option<&'static QuantityInfo> {
    REGISTRY.get(dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Quantity;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_generated_units() {
        assert_eq!(Length::si_unit(), Length::METER);
        assert_eq!(Length::KILOMETER.to_standard_unit(2.0), 2000.0);
        assert_eq!(<Position as Quantity>::DIMENSIONS, Length::DIMENSIONS);
        assert_eq!(Speed::NAME, "Speed");
        assert_abs_diff_eq!(
            AbsoluteTemperature::DEGREE_CELSIUS.to_standard_unit(20.0),
            293.15,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_registry_lookup() {
        let speed = Length::DIMENSIONS.minus(&Duration::DIMENSIONS);
        assert_eq!(lookup(&speed).map(|i| i.name), Some("Speed"));
        let force = Mass::DIMENSIONS.plus(&Acceleration::DIMENSIONS);
        assert_eq!(lookup(&force).map(|i| i.si_abbreviation), Some("N"));
        let odd = Length::DIMENSIONS.plus(&Duration::DIMENSIONS);
        assert!(lookup(&odd).is_none());
    }

    #[test]
    fn test_absolute_shares_relative_dimensions() {
        assert_eq!(<Direction as Quantity>::DIMENSIONS, Angle::DIMENSIONS);
        let time = lookup(&<Time as Quantity>::DIMENSIONS).map(|i| i.name);
        assert_eq!(time, Some("Duration"));
    }
}
