//! Shared utilities: the crate's error types and logging setup.

pub mod error;
pub mod logging;

pub use error::{BrokerError, TransportError};

#[cfg(test)]
mod tests {
    use super::error::BrokerError;
    use super::logging;
    use crate::broker::message::MessageKind;
    use tracing::Level;

    #[test]
    fn logging_init_accepts_levels() {
        assert_eq!(logging::init("debug"), Level::DEBUG);
        assert_eq!(logging::init("bogus"), Level::INFO);
    }

    #[test]
    fn parse_level_names() {
        assert_eq!(logging::parse_level("WARN"), Some(Level::WARN));
        assert_eq!(logging::parse_level("warning"), Some(Level::WARN));
        assert_eq!(logging::parse_level(" trace "), Some(Level::TRACE));
        assert_eq!(logging::parse_level("loud"), None);
    }

    #[test]
    fn protocol_error_names_the_message_kind() {
        let err = BrokerError::Protocol(MessageKind::Event);
        assert_eq!(err.to_string(), "protocol violation: unexpected message EVENT");
    }
}
