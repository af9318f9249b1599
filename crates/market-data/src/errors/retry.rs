/// Classification for retry policy.
///
/// Used by the price feed to decide how to react to a failed fetch.
///
/// | Class | Retry? | Affects connection status? |
/// |-------|--------|----------------------------|
/// | `Never` | No | No |
/// | `WithBackoff` | Yes, exponential backoff | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - unknown asset class, invalid price, or exhausted retries.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry the fetch after an exponentially growing delay.
    ///
    /// Used for transient errors like timeouts or a dropped connection.
    WithBackoff,
}
