pub mod core {
    pub mod config;
    pub mod error;
    pub mod routes;
    pub mod startup;
    pub mod state;
    pub mod tracing_init;
}

pub mod models {
    pub mod admin;
    pub mod reservation;
    pub mod responses;
}

pub mod engine {
    pub mod booking;
    pub mod pricing;
    pub mod sales;
    pub mod seat_map;
    pub mod ticket;
}

pub mod auth {
    pub mod credentials;
    pub mod session;
}

pub mod stores {
    pub mod admin_store;
    pub mod reservation_store;
}

pub mod wal {
    pub mod wal;
}

pub mod metrics {
    pub mod collector;
}

pub mod validation {
    pub mod params;
}

pub mod utils {
    pub mod auth;
    pub mod time;
}

pub mod handlers {
    pub mod admin;
    pub mod fallback;
    pub mod health;
    pub mod metrics;
    pub mod seats;
}
