//! Test helpers.

use std::sync::Arc;

use gabinet_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        appointments::{
            MockAppointmentsService,
            records::{AppointmentRecord, AppointmentStatus, AppointmentUuid},
        },
        contacts::MockContactsService,
        custom_fields::MockCustomFieldsService,
        patients::{
            MockPatientsService,
            records::{PatientRecord, PatientUuid},
        },
        portal::{MockPortalService, records::PortalPrincipal},
        tenants::{MockTenantsService, records::TenantUuid},
        views::MockViewsService,
    },
    uuids::TypedUuid,
};
use jiff::{SignedDuration, Timestamp};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_TENANT_UUID: TenantUuid = TenantUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_PATIENT_UUID: PatientUuid = PatientUuid::from_uuid(Uuid::from_u128(1));

pub(crate) const TEST_PRINCIPAL: PortalPrincipal = PortalPrincipal {
    tenant: TEST_TENANT_UUID,
    patient: TEST_PATIENT_UUID,
    session: TypedUuid::from_uuid(Uuid::from_u128(2)),
};

/// One mock per service. Unset mocks panic on any call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub tenants: MockTenantsService,
    pub custom_fields: MockCustomFieldsService,
    pub views: MockViewsService,
    pub contacts: MockContactsService,
    pub patients: MockPatientsService,
    pub appointments: MockAppointmentsService,
    pub portal: MockPortalService,
    pub auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            tenants: Arc::new(self.tenants),
            custom_fields: Arc::new(self.custom_fields),
            views: Arc::new(self.views),
            contacts: Arc::new(self.contacts),
            patients: Arc::new(self.patients),
            appointments: Arc::new(self.appointments),
            portal: Arc::new(self.portal),
            auth: Arc::new(self.auth),
        })
    }
}

#[salvo::handler]
pub(crate) async fn inject_tenant(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_tenant_uuid(TEST_TENANT_UUID);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_principal(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_portal_principal(TEST_PRINCIPAL);
    ctrl.call_next(req, depot, res).await;
}

/// Route behind a staff token for [`TEST_TENANT_UUID`].
pub(crate) fn tenant_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_tenant)
            .push(route),
    )
}

/// Route behind a portal token for [`TEST_PRINCIPAL`].
pub(crate) fn portal_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_principal)
            .push(route),
    )
}

/// Route with no credentials at all.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

pub(crate) fn make_patient(uuid: PatientUuid) -> PatientRecord {
    PatientRecord {
        uuid,
        first_name: "Anna".to_string(),
        last_name: "Nowak".to_string(),
        email: "anna@example.com".to_string(),
        phone: None,
        date_of_birth: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_appointment(uuid: AppointmentUuid, starts_at: Timestamp) -> AppointmentRecord {
    AppointmentRecord {
        uuid,
        patient_uuid: TEST_PATIENT_UUID,
        title: "Consultation".to_string(),
        starts_at,
        ends_at: starts_at + SignedDuration::from_mins(30),
        status: AppointmentStatus::Scheduled,
        notes: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
