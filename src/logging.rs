use std::fmt;

/// Request-scoped logging interface.
///
/// `RequestLog` is obtained from [`ResolutionContext::log`](crate::ResolutionContext::log)
/// and is lifetime-bound to that context, so every message carries the
/// request ID of the call it belongs to as a structured `request_id` field.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
}

impl<'a> RequestLog<'a> {
    /// Creates a new RequestLog for a request ID.
    ///
    /// This is `pub(crate)` - only `ResolutionContext` hands these out.
    pub(crate) fn new(request_id: &'a str) -> Self {
        Self { request_id }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level message with request ID.
    ///
    /// Use with `format_args!`:
    /// ```
    /// # use content_aggregator::ResolutionContext;
    /// let ctx = ResolutionContext::anonymous("req-1");
    /// ctx.log().info(format_args!("listing {} projects", 10));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a warning-level message with request ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, "{}", args);
    }

    /// Logs an error-level message with request ID.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a debug-level message with request ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, "{}", args);
    }
}
