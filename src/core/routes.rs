// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::{admin, fallback, health, metrics, seats};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public endpoints
        .route("/seats", get(seats::seat_map_handler))
        .route("/bookings", post(seats::book_seat_handler))
        .route("/health", get(health::health_handler))

        // Session endpoints
        .route("/admin/login", post(admin::login_handler))
        .route("/admin/logout", post(admin::logout_handler))

        // Admin endpoints (require a logged-in session)
        .route("/admin/dashboard", get(admin::dashboard_handler))
        .route("/admin/reservations/delete", post(admin::delete_reservation_handler))
        .route("/admin/metrics", get(metrics::metrics_handler))

        // 404 fallback for all unmatched routes
        .fallback(fallback::fallback_handler)

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::create_test_state;
    use crate::models::responses::{BookingResponse, DashboardResponse, SeatMapResponse};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn session_cookie(response: &Response) -> String {
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_booking_flow() {
        let (state, _dir) = create_test_state();
        let app = build_router(state);

        let body = "first_name=Ada&last_name=Lovelace&row=11&column=3";
        let response = app.clone().oneshot(form("/bookings", body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let booking: BookingResponse = json(response).await;
        assert_eq!(booking.price, 100);

        let response = app.clone().oneshot(form("/bookings", body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app.oneshot(get("/seats", None)).await.unwrap();
        let view: SeatMapResponse = json(response).await;
        assert!(!view.seats.is_available(11, 3));
        assert_eq!(view.available, 47);
    }

    #[tokio::test]
    async fn test_admin_flow() {
        let (state, _dir) = create_test_state();
        let reservation = state.engine.reserve_seat("Ada", "Lovelace", 0, 0).unwrap();
        let app = build_router(state);

        // Delete without a session is refused and changes nothing
        let delete_body = format!("id={}", reservation.id);
        let response = app
            .clone()
            .oneshot(form("/admin/reservations/delete", &delete_body, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(form("/admin/login", "username=admin&password=admin123", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);

        let response = app
            .clone()
            .oneshot(get("/admin/dashboard", Some(&cookie)))
            .await
            .unwrap();
        let dashboard: DashboardResponse = json(response).await;
        assert_eq!(dashboard.reservations.len(), 1);
        assert_eq!(dashboard.total_sales, 100);

        let response = app
            .clone()
            .oneshot(form("/admin/reservations/delete", &delete_body, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone().oneshot(get("/seats", None)).await.unwrap();
        let view: SeatMapResponse = json(response).await;
        assert!(view.seats.is_available(0, 0));

        let response = app
            .clone()
            .oneshot(form("/admin/logout", "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/admin/dashboard", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_wrong_password_gets_no_session() {
        let (state, _dir) = create_test_state();
        let app = build_router(state);

        let response = app
            .oneshot(form("/admin/login", "username=admin&password=guess", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_requests_for_one_seat() {
        const CALLERS: usize = 20;

        let (state, _dir) = create_test_state();
        let app = build_router(Arc::clone(&state));

        let tasks: Vec<_> = (0..CALLERS)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    let body = format!("first_name=P{}&last_name=Test&row=7&column=1", i);
                    app.oneshot(form("/bookings", &body, None)).await.unwrap().status()
                })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for task in tasks {
            match task.await.unwrap() {
                StatusCode::CREATED => created += 1,
                StatusCode::CONFLICT => conflicts += 1,
                other => panic!("unexpected status {}", other),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, CALLERS - 1);
        assert_eq!(state.reservations.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (state, _dir) = create_test_state();
        let app = build_router(state);

        let response = app.oneshot(get("/nope", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
