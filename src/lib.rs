pub mod core {
    pub mod config;
    pub mod db;
    pub mod error;
    pub mod routes;
    pub mod state;
    pub mod tracing_init;
}

pub mod auth {
    pub mod session;
}

pub mod device {
    pub mod client;
}

pub mod handlers {
    pub mod account;
    pub mod card;
    pub mod fallback;
    pub mod health;
    pub mod spots;
    pub mod turnstile;
}

pub mod models {
    pub mod requests;
    pub mod spot;
    pub mod user;
}

pub mod stores {
    pub mod session_store;
    pub mod spot_board;
    pub mod user_store;
}

pub mod utils {
    pub mod auth;
    pub mod cookie;
    pub mod time;
}

pub mod views {
    pub mod pages;
}
