//! Human-readable byte sizes
//!
//! `1536` becomes `1.50 KiB` (binary) or `1.54 kB` (decimal). Values below
//! one unit are printed as `Bytes`.

/// Unit system for [`format_size`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeUnits {
    /// Powers of 1024: KiB, MiB, ...
    #[default]
    Binary,
    /// Powers of 1000: kB, MB, ...
    Decimal,
}

impl SizeUnits {
    fn base(self) -> f64 {
        match self {
            Self::Binary => 1024.0,
            Self::Decimal => 1000.0,
        }
    }

    fn label(self, exponent: usize) -> String {
        const PREFIXES: [char; 8] = ['K', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];

        if exponent == 0 {
            return "Bytes".to_string();
        }
        let prefix = PREFIXES[exponent - 1];
        match self {
            Self::Binary => format!("{prefix}iB"),
            Self::Decimal if prefix == 'K' => "kB".to_string(),
            Self::Decimal => format!("{prefix}B"),
        }
    }
}

/// Largest exponent such that `base^exponent <= bytes`, capped at yotta
fn exponent(bytes: u64, units: SizeUnits) -> usize {
    let base = units.base();
    #[allow(clippy::cast_precision_loss)]
    let mut remaining = bytes as f64;
    let mut exponent = 0;
    while remaining >= base && exponent < 8 {
        remaining /= base;
        exponent += 1;
    }
    exponent
}

/// Numeric part of the formatted size, two decimals
pub fn format_size_number(bytes: u64, units: SizeUnits) -> String {
    let exponent = exponent(bytes, units);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let scaled = bytes as f64 / units.base().powi(exponent as i32);
    format!("{scaled:.2}")
}

/// Format `bytes` with two decimals and a unit label
pub fn format_size(bytes: u64, units: SizeUnits) -> String {
    format!(
        "{} {}",
        format_size_number(bytes, units),
        units.label(exponent(bytes, units))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_bytes() {
        assert_eq!(format_size(0, SizeUnits::Binary), "0.00 Bytes");
    }

    #[test]
    fn test_below_one_unit() {
        assert_eq!(format_size(1023, SizeUnits::Binary), "1023.00 Bytes");
        assert_eq!(format_size(999, SizeUnits::Decimal), "999.00 Bytes");
    }

    #[test]
    fn test_binary_units() {
        assert_eq!(format_size(1024, SizeUnits::Binary), "1.00 KiB");
        assert_eq!(format_size(1536, SizeUnits::Binary), "1.50 KiB");
        assert_eq!(format_size(5 * 1024 * 1024, SizeUnits::Binary), "5.00 MiB");
        assert_eq!(format_size(1 << 30, SizeUnits::Binary), "1.00 GiB");
    }

    #[test]
    fn test_decimal_units() {
        assert_eq!(format_size(1000, SizeUnits::Decimal), "1.00 kB");
        assert_eq!(format_size(1536, SizeUnits::Decimal), "1.54 kB");
        assert_eq!(format_size(2_500_000, SizeUnits::Decimal), "2.50 MB");
    }

    #[test]
    fn test_number_only() {
        assert_eq!(format_size_number(1536, SizeUnits::Binary), "1.50");
    }

    #[test]
    fn test_max_value() {
        assert_eq!(format_size(u64::MAX, SizeUnits::Binary), "16.00 EiB");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Scaled value always lies in [1, base) once a unit prefix is used
        #[test]
        fn prop_scaled_value_in_range(bytes in 1024u64..u64::MAX) {
            let number: f64 = format_size_number(bytes, SizeUnits::Binary).parse().unwrap();
            prop_assert!(number >= 1.0);
            prop_assert!(number <= 1024.0);
        }

        /// Every formatted size has exactly two decimals
        #[test]
        fn prop_two_decimals(bytes in any::<u64>()) {
            let number = format_size_number(bytes, SizeUnits::Decimal);
            let decimals = number.split('.').nth(1).unwrap();
            prop_assert_eq!(decimals.len(), 2);
        }
    }
}
