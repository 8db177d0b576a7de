use std::time::Duration;

/// Result of one dispatched request. A response of any status is recorded
/// in `status`; `error` is only set when no response was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    pub index: usize,
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn response(index: usize, status: u16, elapsed: Duration) -> Self {
        Self {
            index,
            status: Some(status),
            elapsed,
            error: None,
        }
    }

    pub fn failure(index: usize, elapsed: Duration, error: impl Into<String>) -> Self {
        Self {
            index,
            status: None,
            elapsed,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(200)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Key used in the status breakdown.
    pub fn status_key(&self) -> String {
        match self.status {
            Some(code) => code.to_string(),
            None => "ERROR".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_200_counts_as_success() {
        let ms = Duration::from_millis(5);
        assert!(RequestOutcome::response(0, 200, ms).is_success());
        assert!(!RequestOutcome::response(1, 204, ms).is_success());
        assert!(!RequestOutcome::response(2, 500, ms).is_success());
        assert!(!RequestOutcome::failure(3, ms, "connection refused").is_success());
    }

    #[test]
    fn status_key_marks_missing_status_as_error() {
        let ms = Duration::from_millis(5);
        assert_eq!(RequestOutcome::response(0, 404, ms).status_key(), "404");
        assert_eq!(RequestOutcome::failure(0, ms, "boom").status_key(), "ERROR");
    }
}
