pub mod cache {

    pub const AGGREGATE_TTL_SECS: u64 = 30;

    pub const MENU_KEY: &str = "menu";

    pub const CARDS_COUNT_KEY: &str = "cards_count";

    pub const USERS_COUNT_KEY: &str = "users_count";

    /// Number of distinct keys the aggregate provider stores.
    pub const FIXED_KEYS: u64 = 3;
}

pub mod catalog {

    pub const PAGE_SIZE: u64 = 30;

    /// Marker for a fenced code block inside an answer.
    pub const CODE_FENCE: &str = "```";
}

pub mod limits {

    /// Keeps `IN (...)` lists under SQLite's bound-parameter limit.
    pub const ID_BATCH_SIZE: usize = 500;

    pub const MAX_BULK_STATUS_IDS: usize = 1000;
}
