//! Shared constants for partitions, defaults, and limits.

/// Storage partition (column family) names.
pub struct Partitions;

impl Partitions {
    /// User records keyed by `UserId`.
    pub const USERS: &'static str = "users";

    /// Unique index: lowercased email -> user id.
    pub const USERS_BY_EMAIL: &'static str = "users_by_email";

    /// Unique index: external provider id -> user id.
    pub const USERS_BY_GOOGLE_ID: &'static str = "users_by_google_id";

    /// Messages keyed by `{conversation}:{created_at}:{message_id}`.
    pub const MESSAGES: &'static str = "messages";

    /// All partitions, in creation order.
    pub const ALL: &'static [&'static str] = &[
        Self::USERS,
        Self::USERS_BY_EMAIL,
        Self::USERS_BY_GOOGLE_ID,
        Self::MESSAGES,
    ];
}

/// Default avatar assigned to users that never uploaded one.
pub const DEFAULT_AVATAR_URL: &str = "https://via.placeholder.com/150";

/// Maximum rows extracted from the notice-board table per scrape.
pub const NOTICE_ROW_LIMIT: usize = 31;
