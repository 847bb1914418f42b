/// Error surfaced to the `belcovid` binary.
///
/// Exit codes:
/// - `2`: usage, configuration or malformed input files
/// - `3`: inputs were readable but no usable data remained
/// - `4`: network or upstream feed failures
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Bad flags, configuration or malformed input files.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Inputs were readable but nothing usable remained.
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// The upstream feed could not be fetched or decoded.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_map_to_exit_codes() {
        assert_eq!(AppError::invalid_input("bad flag").exit_code(), 2);
        assert_eq!(AppError::no_data("empty").exit_code(), 3);
        let err = AppError::upstream("timeout");
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "timeout");
    }
}
