// Standardized error codes for the practice engine

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
}

pub mod not_found {
    pub const PATIENT: &str = "NOT_FOUND_2001";
    pub const RECORD: &str = "NOT_FOUND_2002";
}

pub mod repository {
    pub const QUERY_FAILED: &str = "REPO_3001";
}

pub mod config {
    pub const LOAD_FAILED: &str = "CONFIG_4001";
}

pub mod system {
    pub const SERIALIZATION: &str = "SYSTEM_5001";
    pub const INTERNAL: &str = "SYSTEM_5002";
}
