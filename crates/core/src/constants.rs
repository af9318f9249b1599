/// Default base currency for valuations
pub const DEFAULT_BASE_CURRENCY: &str = "EUR";

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for fractional share quantities
pub const QUANTITY_PRECISION: u32 = 8;

/// Bucket label for holdings without a sector or country
pub const UNSPECIFIED_LABEL: &str = "Unspecified";
