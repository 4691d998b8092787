//! Measurement units and the conversion table used by recipe costing
//!
//! Raw materials are purchased in one unit (a sack, a case, a kilogram) and
//! consumed in another (grams, pieces). Conversion is only defined inside a
//! unit family; cross-family requests fail instead of passing the quantity
//! through unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Units a raw material can be purchased or consumed in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    Piece,
    Sack,
    Package,
    Jar,
    Bottle,
    Roll,
    Case,
}

/// Families of mutually convertible units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    Mass,
    Volume,
    Count,
    /// Container units (sack, case, jar, ...). Only convertible to
    /// themselves; package contents are priced via purchasing metadata.
    Packaging,
}

impl Unit {
    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Gram | Unit::Kilogram => UnitFamily::Mass,
            Unit::Milliliter | Unit::Liter => UnitFamily::Volume,
            Unit::Piece => UnitFamily::Count,
            Unit::Sack | Unit::Package | Unit::Jar | Unit::Bottle | Unit::Roll | Unit::Case => {
                UnitFamily::Packaging
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Gram => "gram",
            Unit::Kilogram => "kilogram",
            Unit::Milliliter => "milliliter",
            Unit::Liter => "liter",
            Unit::Piece => "piece",
            Unit::Sack => "sack",
            Unit::Package => "package",
            Unit::Jar => "jar",
            Unit::Bottle => "bottle",
            Unit::Roll => "roll",
            Unit::Case => "case",
        }
    }

    pub fn parse(s: &str) -> Option<Unit> {
        match s {
            "gram" => Some(Unit::Gram),
            "kilogram" => Some(Unit::Kilogram),
            "milliliter" => Some(Unit::Milliliter),
            "liter" => Some(Unit::Liter),
            "piece" => Some(Unit::Piece),
            "sack" => Some(Unit::Sack),
            "package" => Some(Unit::Package),
            "jar" => Some(Unit::Jar),
            "bottle" => Some(Unit::Bottle),
            "roll" => Some(Unit::Roll),
            "case" => Some(Unit::Case),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion failure between unit families
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitConversionError {
    #[error("cannot convert {from} to {to}")]
    Incompatible { from: Unit, to: Unit },
}

/// Convert a quantity between compatible units.
///
/// Same-unit conversion is always identity. Within the mass and volume
/// families the factor is exactly 1000 (gram/kilogram, milliliter/liter).
/// Every other pair is incompatible.
pub fn convert(quantity: Decimal, from: Unit, to: Unit) -> Result<Decimal, UnitConversionError> {
    if from == to {
        return Ok(quantity);
    }

    let thousand = Decimal::from(1000);
    match (from, to) {
        (Unit::Gram, Unit::Kilogram) => Ok(quantity / thousand),
        (Unit::Kilogram, Unit::Gram) => Ok(quantity * thousand),
        (Unit::Milliliter, Unit::Liter) => Ok(quantity / thousand),
        (Unit::Liter, Unit::Milliliter) => Ok(quantity * thousand),
        _ => Err(UnitConversionError::Incompatible { from, to }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn same_unit_is_identity() {
        assert_eq!(convert(dec("42.5"), Unit::Gram, Unit::Gram), Ok(dec("42.5")));
        assert_eq!(convert(dec("3"), Unit::Piece, Unit::Piece), Ok(dec("3")));
        assert_eq!(convert(dec("2"), Unit::Sack, Unit::Sack), Ok(dec("2")));
    }

    #[test]
    fn mass_conversions() {
        assert_eq!(convert(dec("1500"), Unit::Gram, Unit::Kilogram), Ok(dec("1.5")));
        assert_eq!(convert(dec("2.5"), Unit::Kilogram, Unit::Gram), Ok(dec("2500")));
    }

    #[test]
    fn volume_conversions() {
        assert_eq!(convert(dec("330"), Unit::Milliliter, Unit::Liter), Ok(dec("0.33")));
        assert_eq!(convert(dec("0.75"), Unit::Liter, Unit::Milliliter), Ok(dec("750")));
    }

    #[test]
    fn cross_family_is_rejected() {
        assert_eq!(
            convert(dec("100"), Unit::Gram, Unit::Liter),
            Err(UnitConversionError::Incompatible {
                from: Unit::Gram,
                to: Unit::Liter,
            })
        );
        assert!(convert(dec("1"), Unit::Piece, Unit::Kilogram).is_err());
        assert!(convert(dec("1"), Unit::Sack, Unit::Case).is_err());
        assert!(convert(dec("1"), Unit::Bottle, Unit::Liter).is_err());
    }

    #[test]
    fn round_trip_is_exact() {
        let q = dec("123.456");
        let there = convert(q, Unit::Gram, Unit::Kilogram).unwrap();
        let back = convert(there, Unit::Kilogram, Unit::Gram).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn unit_str_round_trip() {
        for unit in [
            Unit::Gram,
            Unit::Kilogram,
            Unit::Milliliter,
            Unit::Liter,
            Unit::Piece,
            Unit::Sack,
            Unit::Package,
            Unit::Jar,
            Unit::Bottle,
            Unit::Roll,
            Unit::Case,
        ] {
            assert_eq!(Unit::parse(unit.as_str()), Some(unit));
        }
        assert_eq!(Unit::parse("furlong"), None);
    }
}
