//! Point values and thresholds for the scoring algorithm (§4.2).

/// Terminal carry-forward score: a prior unverified `100` forces this one.
pub const CARRY_FORWARD_SCORE: u8 = 100;

/// Points added for a known user's first-ever login.
pub const FIRST_LOGIN_SCORE: u8 = 50;

/// Points added for a never-before-seen, verified-successful IP.
pub const NEW_IP_POINTS: u8 = 30;

/// Points added for a login attempted outside 05:00-23:00.
pub const ODD_HOUR_POINTS: u8 = 20;

/// Points added for a never-before-seen, verified-successful device.
pub const NEW_DEVICE_POINTS: u8 = 20;

/// Points added for a never-before-seen, verified-successful country
/// (also applied when the resolved country is unknown).
pub const NEW_COUNTRY_POINTS: u8 = 15;

/// Points added for a never-before-seen, verified-successful region.
pub const NEW_REGION_POINTS: u8 = 10;

/// Points added when the current attempt itself failed password checks.
pub const FAILURE_PENALTY_POINTS: u8 = 15;

/// Points added when the last three attempts were all failed or unverified.
pub const THREE_IN_A_ROW_POINTS: u8 = 100;

/// The ceiling every score is capped at.
pub const MAX_SCORE: u8 = 100;

/// The low hour boundary of the "odd hour" window (exclusive above it).
pub const ODD_HOUR_START: u32 = 5;

/// The high hour boundary of the "odd hour" window (inclusive and above).
pub const ODD_HOUR_END: u32 = 23;

/// Inter-service HTTP call timeout (§5).
pub const UPSTREAM_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
