//! App Router

use salvo::Router;

use crate::{appointments, auth, contacts, custom_fields, patients, portal, views};

/// Every API route. Staff routes sit behind an API token, the portal sign-in routes are open
/// and the remaining portal routes need a patient token.
pub fn app_router() -> Router {
    Router::new()
        .push(staff_router())
        .push(
            Router::with_path("portal/{tenant}")
                .push(Router::with_path("otp").post(portal::otp::handler))
                .push(Router::with_path("session").post(portal::session::handler)),
        )
        .push(
            Router::with_path("portal")
                .hoop(auth::portal::handler)
                .push(Router::with_path("session").delete(portal::logout::handler))
                .push(
                    Router::with_path("me")
                        .get(portal::me::handler)
                        .put(portal::update_me::handler),
                )
                .push(Router::with_path("appointments").get(portal::appointments::handler)),
        )
}

fn staff_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("contacts")
                .get(contacts::index::handler)
                .post(contacts::create::handler)
                .push(
                    Router::with_path("{contact}")
                        .get(contacts::get::handler)
                        .put(contacts::update::handler)
                        .delete(contacts::delete::handler),
                ),
        )
        .push(
            Router::with_path("custom-fields")
                .get(custom_fields::index::handler)
                .post(custom_fields::create::handler)
                .push(Router::with_path("values").put(custom_fields::values::handler))
                .push(
                    Router::with_path("{field}")
                        .put(custom_fields::update::handler)
                        .delete(custom_fields::delete::handler),
                ),
        )
        .push(
            Router::with_path("views")
                .get(views::index::handler)
                .post(views::create::handler)
                .push(
                    Router::with_path("{view}")
                        .get(views::get::handler)
                        .put(views::update::handler)
                        .delete(views::delete::handler),
                ),
        )
        .push(
            Router::with_path("patients")
                .get(patients::index::handler)
                .post(patients::create::handler)
                .push(
                    Router::with_path("{patient}")
                        .get(patients::get::handler)
                        .put(patients::update::handler)
                        .push(Router::with_path("appointments").get(patients::appointments::handler)),
                ),
        )
        .push(
            Router::with_path("appointments")
                .post(appointments::create::handler)
                .push(Router::with_path("calendar").get(appointments::calendar::handler))
                .push(
                    Router::with_path("{appointment}")
                        .get(appointments::get::handler)
                        .push(Router::with_path("status").put(appointments::status::handler)),
                ),
        )
}
