/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Date format used in backend query strings and report output
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";
