//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "SparkClean".to_string()
}

pub fn default_data_dir() -> String {
    "~/.sparkclean".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_api_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_api_port() -> u16 {
    8080
}

pub fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

pub fn default_lookahead_days() -> u32 {
    30
}

pub fn default_true() -> bool {
    true
}

pub fn default_audit_db_path() -> String {
    "~/.sparkclean/data/audit.db".to_string()
}
