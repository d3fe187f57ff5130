//! Month Calendar Handler

use std::sync::Arc;

use gabinet::calendar::WeekStart;
use jiff::tz::TimeZone;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gabinet_app::domain::appointments::records::MonthCalendar;

use crate::{
    appointments::{errors::into_status_error, get::AppointmentResponse},
    extensions::*,
    state::State,
};

/// One grid cell.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CalendarDayResponse {
    /// `YYYY-MM-DD`
    pub date: String,

    /// False for leading and trailing days from the neighbouring months
    pub in_month: bool,

    /// Appointments starting on this local date
    pub appointments: Vec<AppointmentResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CalendarResponse {
    pub year: i16,
    pub month: i8,

    /// Seven days per week, starting on the requested week start
    pub weeks: Vec<Vec<CalendarDayResponse>>,
}

impl From<MonthCalendar> for CalendarResponse {
    fn from(calendar: MonthCalendar) -> Self {
        let MonthCalendar {
            grid,
            mut appointments,
        } = calendar;

        let weeks = grid
            .weeks
            .iter()
            .map(|week| {
                week.iter()
                    .map(|day| CalendarDayResponse {
                        date: day.date.to_string(),
                        in_month: day.in_month,
                        appointments: appointments
                            .remove(&day.date)
                            .unwrap_or_default()
                            .into_iter()
                            .map(Into::into)
                            .collect(),
                    })
                    .collect()
            })
            .collect();

        CalendarResponse {
            year: grid.year,
            month: grid.month,
            weeks,
        }
    }
}

fn parse_week_start(value: Option<&str>) -> Result<WeekStart, StatusError> {
    match value {
        None | Some("monday") => Ok(WeekStart::Monday),
        Some("sunday") => Ok(WeekStart::Sunday),
        Some(other) => Err(StatusError::bad_request()
            .brief(format!("invalid week_start {other:?}, expected monday or sunday"))),
    }
}

fn parse_time_zone(value: Option<&str>) -> Result<TimeZone, StatusError> {
    value.map_or(Ok(TimeZone::UTC), |name| {
        TimeZone::get(name).or_400("invalid tz")
    })
}

/// Month Calendar Handler
///
/// Lays a month out in whole weeks and places appointments on the local date they start.
#[endpoint(
    tags("appointments"),
    summary = "Month Calendar",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Calendar grid"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    year: QueryParam<i16, true>,
    month: QueryParam<i8, true>,
    week_start: QueryParam<String, false>,
    tz: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CalendarResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let week_start = parse_week_start(week_start.into_inner().as_deref())?;
    let time_zone = parse_time_zone(tz.into_inner().as_deref())?;

    let calendar = state
        .app
        .appointments
        .month_calendar(tenant, year.into_inner(), month.into_inner(), week_start, time_zone)
        .await
        .map_err(into_status_error)?;

    Ok(Json(calendar.into()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use gabinet::calendar::{CalendarError, month_grid};
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use gabinet_app::domain::appointments::{AppointmentsServiceError, records::AppointmentUuid};

    use crate::test_helpers::{Mocks, TEST_TENANT_UUID, make_appointment, tenant_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        tenant_service(mocks, Router::with_path("appointments/calendar").get(handler))
    }

    #[tokio::test]
    async fn test_calendar_places_appointments_on_their_day() -> TestResult {
        let appointment = make_appointment(AppointmentUuid::new(), "2024-06-03T10:00:00Z".parse()?);
        let grid = month_grid(2024, 6, WeekStart::Monday)?;
        let mut mocks = Mocks::default();

        mocks
            .appointments
            .expect_month_calendar()
            .once()
            .withf(|tenant, year, month, week_start, _| {
                *tenant == TEST_TENANT_UUID
                    && *year == 2024
                    && *month == 6
                    && *week_start == WeekStart::Monday
            })
            .return_once(move |_, _, _, _, _| {
                Ok(MonthCalendar {
                    grid,
                    appointments: BTreeMap::from([(date(2024, 6, 3), vec![appointment])]),
                })
            });

        let mut res = TestClient::get("http://example.com/appointments/calendar?year=2024&month=6")
            .send(&make_service(mocks))
            .await;

        let body: CalendarResponse = res.take_json().await?;

        let days: Vec<&CalendarDayResponse> = body.weeks.iter().flatten().collect();
        let busy: Vec<&str> = days
            .iter()
            .filter(|day| !day.appointments.is_empty())
            .map(|day| day.date.as_str())
            .collect();

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.weeks.iter().all(|week| week.len() == 7));
        assert_eq!(days.first().map(|day| day.date.as_str()), Some("2024-05-27"));
        assert_eq!(days.first().map(|day| day.in_month), Some(false));
        assert_eq!(busy, vec!["2024-06-03"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_calendar_passes_sunday_week_start() -> TestResult {
        let grid = month_grid(2024, 6, WeekStart::Sunday)?;
        let mut mocks = Mocks::default();

        mocks
            .appointments
            .expect_month_calendar()
            .once()
            .withf(|_, _, _, week_start, _| *week_start == WeekStart::Sunday)
            .return_once(move |_, _, _, _, _| {
                Ok(MonthCalendar {
                    grid,
                    appointments: BTreeMap::new(),
                })
            });

        let res = TestClient::get(
            "http://example.com/appointments/calendar?year=2024&month=6&week_start=sunday",
        )
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_calendar_rejects_unknown_week_start() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.appointments.expect_month_calendar().never();

        let res = TestClient::get(
            "http://example.com/appointments/calendar?year=2024&month=6&week_start=friday",
        )
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_calendar_invalid_month_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .appointments
            .expect_month_calendar()
            .once()
            .return_once(|_, year, month, _, _| {
                Err(AppointmentsServiceError::Calendar(CalendarError::InvalidMonth { year, month }))
            });

        let res = TestClient::get("http://example.com/appointments/calendar?year=2024&month=13")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
