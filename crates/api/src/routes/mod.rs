pub mod builders;
pub mod buildons;
pub mod coach_requests;
pub mod coachs;
pub mod files;
pub mod health;
pub mod meeting_reports;
pub mod notifications;
pub mod ntf_referents;
pub mod pdf;
pub mod projects;
pub mod returnings;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/register                      register builder/coach account (public)
/// /users/register/admin                register admin account (admin only)
/// /users/login                         login (public)
/// /users/me                            own account (GET)
/// /users                               list accounts (admin only)
/// /users/{id}                          account (GET, PUT)
///
/// /builders                            submit candidature (POST)
/// /builders/candidating                candidating listing (admin only)
/// /builders/active                     active listing (admin only)
/// /builders/{id}                       profile (GET, PUT)
/// /builders/{id}/user                  account behind the profile (GET)
/// /builders/{id}/coach                 assigned coach (GET)
/// /builders/{id}/ntf_referent          assigned referent (GET)
/// /builders/{id}/form                  candidature form (GET)
/// /builders/{id}/meeting_reports       meeting reports (GET)
/// /builders/{id}/project               project (GET)
/// /builders/{id}/card                  builder card PDF (GET, POST)
/// /builders/{id}/sign_integration      sign the integration fiche (POST)
///
/// /coachs                              submit candidature (POST), list (admin)
/// /coachs/candidating                  candidating listing (admin only)
/// /coachs/active                       active listing (admin only)
/// /coachs/available                    choosable coaches with form answers
/// /coachs/{id}                         profile (GET, PUT)
/// /coachs/{id}/user                    account behind the profile (GET)
/// /coachs/{id}/builders                assigned builders (GET)
/// /coachs/{id}/form                    candidature form (GET)
/// /coachs/{id}/coach_requests          waiting requests (GET)
/// /coachs/{id}/card                    coach card PDF (GET, POST)
/// /coachs/{id}/sign_integration        sign the integration fiche (POST)
///
/// /coach_requests                      create (builder), own waiting (coach)
/// /coach_requests/{id}/accept          accept (coach | admin)
/// /coach_requests/{id}/refuse          refuse (coach | admin)
///
/// /meeting_reports                     file a report (assigned coach)
///
/// /buildons                            curriculum listing (GET)
/// /buildons/sync                       replace the curriculum (admin only)
/// /buildons/{id}/steps                 steps of one build-on (GET)
/// /buildons/{id}                       delete build-on (admin only)
/// /buildons/steps/{id}                 delete step (admin only)
///
/// /projects                            submit project (builder)
/// /projects/{id}                       update (PUT)
/// /projects/{id}/validate_step         advance cursor out-of-band (admin | coach)
/// /projects/{id}/returnings            submit (builder, multipart), list (GET)
///
/// /returnings/waiting                  review queue (admin | coach)
/// /returnings/{id}/accept              validate and advance cursor
/// /returnings/{id}/refuse              refuse with a reason
/// /returnings/{id}/transfer            park in the other queue
///
/// /files                               upload (admin only, multipart)
/// /files/{id}                          bytes by id (GET)
/// /files/by_name/{name}                bytes by stored name (GET)
///
/// /pdf/fiche_integration/{builder_id}  generate (admin only), download (GET)
/// /pdf/attestation_mineur              fill the minor attestation (public)
///
/// /notifications                       list (?unseen_only, limit, offset)
/// /notifications/unseen-count          unseen count (GET)
/// /notifications/{id}/seen             mark seen (POST)
///
/// /ntf_referents                       list, create (admin only)
/// /ntf_referents/{id}                  get, update (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts and login.
        .nest("/users", users::router())
        // Builder profiles and their sub-resources.
        .nest("/builders", builders::router())
        // Coach profiles and their sub-resources.
        .nest("/coachs", coachs::router())
        // Builder-to-coach requests.
        .nest("/coach_requests", coach_requests::router())
        // Coach meeting reports.
        .nest("/meeting_reports", meeting_reports::router())
        // The curriculum.
        .nest("/buildons", buildons::router())
        // Projects and their curriculum walk.
        .nest("/projects", projects::router())
        // Returning review queues.
        .nest("/returnings", returnings::router())
        // Blob storage.
        .nest("/files", files::router())
        // Generated PDF documents.
        .nest("/pdf", pdf::router())
        // In-app notifications.
        .nest("/notifications", notifications::router())
        // NTF referent management.
        .nest("/ntf_referents", ntf_referents::router())
}
