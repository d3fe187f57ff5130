//! Patient Handlers

pub(crate) mod appointments;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

use jiff::civil::Date;
use salvo::http::StatusError;

use crate::extensions::*;

/// Parse an optional `YYYY-MM-DD` date of birth.
pub(crate) fn parse_date_of_birth(value: Option<&str>) -> Result<Option<Date>, StatusError> {
    value
        .map(str::parse::<Date>)
        .transpose()
        .or_400("invalid date_of_birth")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_of_birth_accepts_iso_dates() -> testresult::TestResult {
        assert_eq!(
            parse_date_of_birth(Some("1985-03-14"))?,
            Some(jiff::civil::date(1985, 3, 14))
        );
        assert_eq!(parse_date_of_birth(None)?, None);

        Ok(())
    }

    #[test]
    fn date_of_birth_rejects_garbage() {
        assert!(parse_date_of_birth(Some("14/03/1985")).is_err());
    }
}
