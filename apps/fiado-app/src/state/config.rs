//! # Application Configuration
//!
//! Settings resolved once at startup. Defaults live in code; the binary only
//! overrides the database path (`--db`). Nothing is read from the
//! environment apart from the log filter.
//!
//! Configuration is read-only after startup, so no mutex is needed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use fiado_core::{DEFAULT_RESET_PHRASE, MIN_SEARCH_LEN};

/// File name of the ledger inside the data directory.
pub const DATABASE_FILE: &str = "fiado.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Ledger file. Default: `fiado.db` in the working directory; the
    /// binary swaps in the platform data directory.
    pub database_path: PathBuf,

    /// Phrase the operator types to confirm a factory reset.
    /// Compared ignoring case.
    pub reset_phrase: String,

    /// Export files are named `<prefix>_export_<YYYY-MM-DD>.json`.
    pub export_prefix: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Separator between whole and fractional currency digits.
    pub decimal_separator: char,

    /// Shortest trimmed query that triggers name suggestions.
    pub min_search_len: usize,

    /// Optional cap on the suggestions a name search returns.
    ///
    /// `None` (the default) returns every match.
    pub suggestion_limit: Option<usize>,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Database: `./fiado.db`
    /// - Reset phrase: `RESETAR`
    /// - Export prefix: `fiado`
    /// - Currency: `R$` with decimal comma
    /// - Suggestions: from 2 characters, every match
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from(DATABASE_FILE),
            reset_phrase: DEFAULT_RESET_PHRASE.to_string(),
            export_prefix: "fiado".to_string(),
            currency_symbol: "R$".to_string(),
            decimal_separator: ',',
            min_search_len: MIN_SEARCH_LEN,
            suggestion_limit: None,
        }
    }
}

impl AppConfig {
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_reset_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.reset_phrase = phrase.into();
        self
    }

    pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = Some(limit);
        self
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234), "R$ 12,34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        format!(
            "{}{} {}{}{:02}",
            sign,
            self.currency_symbol,
            abs / 100,
            self.decimal_separator,
            abs % 100
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_positive() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(1234), "R$ 12,34");
        assert_eq!(config.format_currency(100), "R$ 1,00");
        assert_eq!(config.format_currency(1), "R$ 0,01");
        assert_eq!(config.format_currency(0), "R$ 0,00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(-1234), "-R$ 12,34");
    }

    #[test]
    fn test_format_currency_large() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(123456789), "R$ 1234567,89");
    }

    #[test]
    fn test_builders_override_defaults() {
        let config = AppConfig::default()
            .with_database_path("/tmp/ledger.db")
            .with_reset_phrase("APAGAR")
            .with_export_prefix("loja")
            .with_suggestion_limit(3);

        assert_eq!(config.database_path, PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.reset_phrase, "APAGAR");
        assert_eq!(config.export_prefix, "loja");
        assert_eq!(config.suggestion_limit, Some(3));
        assert_eq!(config.min_search_len, MIN_SEARCH_LEN);
    }
}
