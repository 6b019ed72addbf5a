// piiguard/src/commands/mod.rs
//! Command implementations for the piiguard binary.

pub mod recognizers;
pub mod scan;
pub mod serve;

use piiguard_core::PiiGuardError;

/// Exit code for a request naming a language no recognizer serves.
pub const EXIT_UNSUPPORTED_LANGUAGE: u8 = 2;

/// Maps a command failure to the process exit code.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PiiGuardError>() {
        Some(PiiGuardError::UnsupportedLanguage(_)) => EXIT_UNSUPPORTED_LANGUAGE,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let unsupported = anyhow::Error::from(PiiGuardError::UnsupportedLanguage("fr".into()));
        assert_eq!(exit_code_for(&unsupported), 2);
        assert_eq!(exit_code_for(&anyhow::anyhow!("bad config")), 1);
    }
}
