//! Tests for calendar months, year/month arithmetic and clocks

use chrono::NaiveDate;
use core_kernel::{Clock, FixedClock, Month, SystemClock, TemporalError, Timezone, YearMonth};

mod month_tests {
    use super::*;

    #[test]
    fn test_all_months_round_trip_through_names() {
        for (i, month) in Month::ALL.iter().enumerate() {
            assert_eq!(month.ordinal() as usize, i);
            assert_eq!(Month::from_name(month.name()), Some(*month));
        }
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert_eq!(Month::from_name(""), None);
        assert_eq!(Month::from_name("ENERO"), None);
        assert_eq!(Month::from_name(" Enero"), None);
        assert_eq!(
            "Setiembre".parse::<Month>(),
            Err(TemporalError::UnknownMonth("Setiembre".to_string()))
        );
    }

    #[test]
    fn test_month_serializes_as_name() {
        let json = serde_json::to_string(&Month::Noviembre).unwrap();
        assert_eq!(json, "\"Noviembre\"");

        let back: Month = serde_json::from_str("\"Marzo\"").unwrap();
        assert_eq!(back, Month::Marzo);

        assert!(serde_json::from_str::<Month>("\"March\"").is_err());
    }
}

mod year_month_tests {
    use super::*;

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        assert_eq!(YearMonth::from_date(date), YearMonth::new(2023, Month::Junio));
    }

    #[test]
    fn test_months_until_spans_years() {
        let start = YearMonth::new(2025, Month::Noviembre);
        assert_eq!(start.months_until(YearMonth::new(2026, Month::Enero)), 2);
        assert_eq!(start.months_until(YearMonth::new(2055, Month::Noviembre)), 360);
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = YearMonth::new(2024, Month::Diciembre);
        let b = YearMonth::new(2025, Month::Enero);
        assert!(a < b);
    }

    #[test]
    fn test_display() {
        assert_eq!(YearMonth::new(2020, Month::Enero).to_string(), "Enero 2020");
    }
}

mod clock_tests {
    use super::*;

    #[test]
    fn test_fixed_clock_returns_its_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let clock = FixedClock::new(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.current_month(), YearMonth::new(2024, Month::Febrero));
    }

    #[test]
    fn test_shared_clock_delegates() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        let clock: std::sync::Arc<dyn Clock> = std::sync::Arc::new(FixedClock::new(date));
        assert_eq!(clock.today(), date);
        assert_eq!(clock.current_month(), YearMonth::new(2023, Month::Junio));
    }

    #[test]
    fn test_system_clock_defaults_to_madrid() {
        let clock = SystemClock::default();
        assert_eq!(clock.timezone().name(), "Europe/Madrid");
    }

    #[test]
    fn test_timezone_from_name() {
        assert!(Timezone::from_name("America/Bogota").is_ok());
        assert_eq!(
            Timezone::from_name("Mars/Olympus"),
            Err(TemporalError::UnknownTimezone("Mars/Olympus".to_string()))
        );
    }
}
