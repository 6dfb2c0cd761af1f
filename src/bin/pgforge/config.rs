use std::env;

fn non_empty(name: &str) -> Option<String> {
    if let Ok(v) = env::var(name) {
        if !v.is_empty() {
            return Some(v);
        }
    }

    None
}

fn truthy(name: &str) -> bool {
    matches!(non_empty(name).as_deref(), Some("true") | Some("1"))
}

pub fn database_url() -> Option<String> {
    non_empty("DATABASE_URL")
}

pub fn host() -> Option<String> {
    non_empty("DB_HOST")
}

pub fn port() -> Option<u16> {
    non_empty("DB_PORT").and_then(|v| v.parse::<u16>().ok())
}

pub fn user_name() -> Option<String> {
    non_empty("DB_USERNAME")
}

pub fn password() -> Option<String> {
    non_empty("DB_PASSWORD")
}

pub fn initial_db() -> Option<String> {
    non_empty("DB_INITIAL")
}

pub fn database_name() -> Option<String> {
    non_empty("DB_NAME")
}

pub fn error_if_exist() -> bool {
    truthy("DB_ERROR_IF_EXIST")
}

pub fn error_if_non_exist() -> bool {
    truthy("DB_ERROR_IF_NON_EXIST")
}
