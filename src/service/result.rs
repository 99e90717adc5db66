use serde::{Deserialize, Serialize};

/// Uniform envelope returned by every external call.
///
/// `status` is the HTTP status code, or 0 when no response arrived (connect error, timeout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub status: u16,
    pub error: Option<String>,
}

impl<T> ServiceResult<T> {
    pub fn ok(data: T) -> Self {
        ServiceResult {
            success: true,
            data: Some(data),
            status: 200,
            error: None,
        }
    }

    pub fn failure(status: u16, error: impl Into<String>) -> Self {
        ServiceResult {
            success: false,
            data: None,
            status,
            error: Some(error.into()),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// HTTP 400: never worth retrying.
    pub fn is_bad_request(&self) -> bool {
        self.status == 400
    }

    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let result = ServiceResult::ok(42u32);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert_eq!(result.status, 200);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failure_envelope() {
        let result: ServiceResult<u32> = ServiceResult::failure(400, "Bad Request");
        assert!(!result.success);
        assert!(result.is_bad_request());
        assert_eq!(result.error_message(), "Bad Request");

        let transport: ServiceResult<u32> = ServiceResult::failure(0, "connection refused");
        assert!(!transport.is_bad_request());
    }

    #[test]
    fn test_serializes_with_null_fields() {
        let result: ServiceResult<u32> = ServiceResult::failure(503, "down");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "data": null, "status": 503, "error": "down"})
        );
    }
}
