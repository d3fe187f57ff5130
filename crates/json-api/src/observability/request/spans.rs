//! Route templates for span names and metric labels.

use uuid::Uuid;

/// Replaces uuid segments with `{uuid}` so every contact, view or tenant shares one label.
pub(super) fn route_template(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_collapsed() {
        assert_eq!(
            route_template("/contacts/0190f3f4-6a4f-7cc2-9d5e-8a8b1f3c2d10"),
            "/contacts/{uuid}"
        );
    }

    #[test]
    fn tenant_scoped_portal_paths_share_a_route() {
        let first = route_template("/portal/0190f3f4-6a4f-7cc2-9d5e-8a8b1f3c2d10/otp");
        let second = route_template("/portal/0190f3f4-0000-7000-8000-000000000001/otp");

        assert_eq!(first, second);
        assert_eq!(first, "/portal/{uuid}/otp");
    }

    #[test]
    fn static_segments_are_kept() {
        assert_eq!(route_template("/appointments/calendar"), "/appointments/calendar");
        assert_eq!(route_template("/"), "/");
    }
}
