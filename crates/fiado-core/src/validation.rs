//! # Validation Module
//!
//! Business rule validation for every mutation the command layer accepts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation shell                                           │
//! │  ├── Form checks, debt ceiling hint                                    │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command layer (fiado-app)                                    │
//! │  └── THIS MODULE: names, amounts, quantities, admin secrets            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger store (SQLite)                                        │
//! │  ├── UNIQUE (client/product names, admin singleton)                    │
//! │  └── FOREIGN KEY (sale → client/product, payment → client)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators that accept text return the normalized (trimmed) value so the
//! caller persists exactly what was checked.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, Quantity};
use crate::{MAX_AMOUNT_CENTS, MIN_ADMIN_PASSWORD_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted client or product name, in characters.
pub const MAX_NAME_LEN: usize = 120;

// =============================================================================
// Name Validators
// =============================================================================

fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a client name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use fiado_core::validation::validate_client_name;
///
/// assert_eq!(validate_client_name("  Ana  ").unwrap(), "Ana");
/// assert!(validate_client_name("   ").is_err());
/// ```
pub fn validate_client_name(name: &str) -> ValidationResult<String> {
    validate_name("client name", name)
}

/// Validates a product name and returns it trimmed.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_name("product name", name)
}

/// Normalizes a name query for suggestion lists.
///
/// Returns `None` when the trimmed query is shorter than `min_len`
/// characters (usually [`crate::MIN_SEARCH_LEN`]); the caller answers with an empty
/// list without querying.
pub fn normalize_search_query(query: &str, min_len: usize) -> Option<String> {
    let query = query.trim();
    if query.chars().count() < min_len {
        None
    } else {
        Some(query.to_string())
    }
}

/// Trims an optional payment description; blank becomes `None`.
pub fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn check_upper_bound(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_AMOUNT_CENTS,
        });
    }
    Ok(())
}

/// Validates a product price. Zero is allowed, [`MAX_AMOUNT_CENTS`] is the
/// ceiling.
///
/// ## Example
/// ```rust
/// use fiado_core::money::Money;
/// use fiado_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(0)).is_ok());
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    check_upper_bound("price", price)
}

/// Validates a sale quantity: strictly positive.
pub fn validate_quantity(quantity: Quantity) -> ValidationResult<()> {
    if !quantity.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a sale total. Zero is allowed (free product).
pub fn validate_sale_total(total: Money) -> ValidationResult<()> {
    if total.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "total".to_string(),
        });
    }
    check_upper_bound("total", total)
}

/// Validates a payment amount: strictly positive.
///
/// The client's current debt is not checked here; the shell gets it as a
/// ceiling hint only. [`MAX_AMOUNT_CENTS`] still applies.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }
    check_upper_bound("payment amount", amount)
}

// =============================================================================
// Administrator Validators
// =============================================================================

/// Validates first-run administrator setup and returns the trimmed name.
///
/// ## Rules
/// - name non-empty after trimming
/// - password non-empty and at least [`MIN_ADMIN_PASSWORD_LEN`] characters
/// - password equals its confirmation
///
/// The password itself is never trimmed.
pub fn validate_admin_setup(
    name: &str,
    password: &str,
    confirm_password: &str,
) -> ValidationResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::required("admin name"));
    }

    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    if password.chars().count() < MIN_ADMIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_ADMIN_PASSWORD_LEN,
        });
    }

    if password != confirm_password {
        return Err(ValidationError::Mismatch {
            field: "password".to_string(),
        });
    }

    Ok(name.to_string())
}

/// Validates a settings change and returns the trimmed name.
pub fn validate_settings_update(
    name: &str,
    password: &str,
    confirm_password: &str,
) -> ValidationResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::required("admin name"));
    }

    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    if password != confirm_password {
        return Err(ValidationError::Mismatch {
            field: "password".to_string(),
        });
    }

    Ok(name.to_string())
}

/// Validates the three factory reset fields before anything is deleted.
///
/// ## Flow
/// ```text
/// password ──────────┐
/// confirmation ──────┼──► all present? ──► equal? ──► phrase matches? ──► OK
/// phrase ────────────┘        │               │              │
///                          Required       Mismatch   ConfirmationMismatch
/// ```
///
/// The phrase check ignores case but not whitespace. Verifying the password against the stored
/// secret is the caller's job, since that needs the store.
pub fn validate_reset_request(
    password: &str,
    password_confirmation: &str,
    phrase: &str,
    expected_phrase: &str,
) -> CoreResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password").into());
    }
    if password_confirmation.is_empty() {
        return Err(ValidationError::required("password confirmation").into());
    }
    if phrase.is_empty() {
        return Err(ValidationError::required("confirmation phrase").into());
    }

    if password != password_confirmation {
        return Err(ValidationError::Mismatch {
            field: "password".to_string(),
        }
        .into());
    }

    // Surrounding spaces are not forgiven.
    if phrase.to_uppercase() != expected_phrase.to_uppercase() {
        return Err(CoreError::ConfirmationMismatch {
            expected: expected_phrase.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
