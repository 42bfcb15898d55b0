/// Minute increments offered by the widget settings
pub const ALLOWED_INCREMENTS: [u8; 5] = [1, 5, 10, 15, 30];

/// Default minute increment
pub const DEFAULT_INCREMENT: u8 = 15;

/// Category value that restricts time slots to those followed by a free slot
pub const RESTRICTED_CATEGORY: &str = "cheval";

/// Earliest year a year select list offers
pub const MIN_YEAR: i64 = 1;
/// Latest year a year select list offers
pub const MAX_YEAR: i64 = 9999;

/// Minutes in one hour, used when carrying rounded minutes into the hour
pub const MINUTES_PER_HOUR: u32 = 60;

/// Hours on a 12 hour clock face
pub const HOURS_PER_HALF_DAY: u32 = 12;

/// Encoded `ampm` part value for times before noon
pub const AM: i64 = 0;
/// Encoded `ampm` part value for times from noon on
pub const PM: i64 = 1;

/// Setting strings accepted for 24 hour time
pub(crate) const TIME_TYPE_24: [&str; 2] = ["24", "h24"];
/// Setting strings accepted for 12 hour time
pub(crate) const TIME_TYPE_12: [&str; 2] = ["12", "h12"];
