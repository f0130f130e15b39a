use anyhow::Error;
use brokerlink_config::ConfigError;
use brokerlink_core::CoreError;
use brokerlink_io::IoError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
            };
        }
        if let Some(io_err) = cause.downcast_ref::<IoError>() {
            return io_exit_code(io_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return EXIT_INVALID_INPUT;
        }
    }
    EXIT_FAILURE
}

fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Core(_)
        | IoError::Csv(_)
        | IoError::MissingHeader
        | IoError::InvalidOutputPath(_)
        | IoError::OutputMatchesInput(_) => EXIT_INVALID_INPUT,
        IoError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => EXIT_INVALID_INPUT,
        IoError::Io(_) | IoError::Xlsx(_) => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir | ConfigError::BuiltinTemplates(_) => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidTemplateName(_)
        | ConfigError::UnknownDefaultTemplate(_)
        | ConfigError::InvalidCutoffDate(_)
        | ConfigError::InvalidDelimiter(_)
        | ConfigError::InvalidDateFormat(_)
        | ConfigError::EmptyDisplayKeywords
        | ConfigError::InvalidSheetName(_)
        | ConfigError::InvalidLinkLabel(_)
        | ConfigError::InvalidLinkColumnWidth(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
