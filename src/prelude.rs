//! Gabinet prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    calendar::{CalendarDay, CalendarError, MonthGrid, WeekStart, month_grid},
    fields::{
        EntityType, FieldDefinition, FieldError, FieldKey, FieldType, FieldValues,
        merge_custom_fields,
    },
    filters::{FilterCondition, FilterError, FilterLogic, FilterOperator, ViewFilter},
    portal::{
        IssuedPortalToken, OtpCode, ParsedPortalToken, PortalError, PortalSession,
        PortalSessionState, parse_portal_token,
    },
    values::Row,
    views::{SortDirection, SortSpec, SystemView, ViewConfig, ViewError, system_views},
};
