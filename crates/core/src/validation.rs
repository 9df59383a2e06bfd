//! Field validation shared by the client and the storefront server.
//!
//! The client runs these checks to avoid pointless round trips. The server runs
//! them again before creating an account or inserting an order, and only the
//! server-side result is authoritative.
//!
//! Every check returns the first failing rule, in the order the form presents
//! its fields, so the shopper always sees one actionable message.

use core::fmt;

use crate::types::{Email, PaymentMethod, Price};

/// Minimum password length for signup and for the login form.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Minimum trimmed length of account and shipping names.
pub const MIN_NAME_LENGTH: usize = 3;
/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;
/// Minimum trimmed length of a delivery address.
pub const MIN_ADDRESS_LENGTH: usize = 10;
/// Number of digits in a card number.
pub const CARD_NUMBER_DIGITS: usize = 16;

/// The input field a [`ValidationError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    Name,
    Phone,
    Address,
    CardNumber,
    CardholderName,
    CardExpiry,
    CardCvv,
    Total,
    PaymentMethod,
}

/// A rejected field together with the message shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: &'static str,
}

impl ValidationError {
    const fn new(field: Field, message: &'static str) -> Self {
        Self { field, message }
    }
}

pub mod messages {
    pub const INVALID_EMAIL: &str = "Please enter a valid email address";
    pub const MISSING_PASSWORD: &str = "Please enter your password";
    pub const SHORT_PASSWORD: &str = "Password must be at least 6 characters";
    pub const SHORT_ACCOUNT_NAME: &str = "Name must be at least 3 characters";
    pub const NAME_CHARSET: &str = "Name can only contain letters and spaces";
    pub const SHORT_SHIPPING_NAME: &str = "Please enter your full name";
    pub const INVALID_PHONE: &str = "Please enter a valid phone number (at least 10 digits)";
    pub const SHORT_ADDRESS: &str = "Please enter your complete delivery address";
    pub const INVALID_CARD_NUMBER: &str = "Please enter a valid 16-digit card number";
    pub const MISSING_CARDHOLDER: &str = "Please enter cardholder name";
    pub const INVALID_EXPIRY: &str = "Please enter valid expiry (MM/YY)";
    pub const INVALID_CVV: &str = "Please enter valid 3-digit CVV";
    pub const INVALID_TOTAL: &str = "Invalid order total";
    pub const INVALID_PAYMENT_METHOD: &str = "Invalid payment method";
}

// =============================================================================
// Single-field rules
// =============================================================================

/// Validate an email address.
///
/// # Errors
///
/// Returns a `Field::Email` error if the address does not match the pattern.
pub fn email(input: &str) -> Result<Email, ValidationError> {
    Email::parse(input).map_err(|_| ValidationError::new(Field::Email, messages::INVALID_EMAIL))
}

/// Validate a new password (signup, and the login form before it is sent).
///
/// # Errors
///
/// Returns a `Field::Password` error for passwords under six characters.
pub fn new_password(input: &str) -> Result<(), ValidationError> {
    if input.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(Field::Password, messages::SHORT_PASSWORD));
    }
    Ok(())
}

/// Validate that a password was supplied at all.
///
/// # Errors
///
/// Returns a `Field::Password` error for an empty password.
pub fn password_present(input: &str) -> Result<(), ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::new(Field::Password, messages::MISSING_PASSWORD));
    }
    Ok(())
}

fn trimmed_len(input: &str) -> usize {
    input.trim().chars().count()
}

/// Validate a shipping or cardholder name: at least three characters after trimming.
///
/// # Errors
///
/// Returns a `Field::Name` error for short names.
pub fn shipping_name(input: &str) -> Result<(), ValidationError> {
    if trimmed_len(input) < MIN_NAME_LENGTH {
        return Err(ValidationError::new(Field::Name, messages::SHORT_SHIPPING_NAME));
    }
    Ok(())
}

/// Validate a phone number: at least ten digits once everything else is stripped.
///
/// # Errors
///
/// Returns a `Field::Phone` error when there are fewer than ten digits.
pub fn phone(input: &str) -> Result<(), ValidationError> {
    if input.chars().filter(char::is_ascii_digit).count() < MIN_PHONE_DIGITS {
        return Err(ValidationError::new(Field::Phone, messages::INVALID_PHONE));
    }
    Ok(())
}

/// Validate a delivery address: at least ten characters after trimming.
///
/// # Errors
///
/// Returns a `Field::Address` error for short addresses.
pub fn address(input: &str) -> Result<(), ValidationError> {
    if trimmed_len(input) < MIN_ADDRESS_LENGTH {
        return Err(ValidationError::new(Field::Address, messages::SHORT_ADDRESS));
    }
    Ok(())
}

/// Validate an order total: strictly positive.
///
/// # Errors
///
/// Returns a `Field::Total` error for zero or negative totals.
pub fn total(amount: Price) -> Result<(), ValidationError> {
    if !amount.is_positive() {
        return Err(ValidationError::new(Field::Total, messages::INVALID_TOTAL));
    }
    Ok(())
}

/// Validate a payment method string.
///
/// # Errors
///
/// Returns a `Field::PaymentMethod` error unless the input is `card` or `cod`.
pub fn payment_method(input: &str) -> Result<PaymentMethod, ValidationError> {
    input
        .parse()
        .map_err(|_| ValidationError::new(Field::PaymentMethod, messages::INVALID_PAYMENT_METHOD))
}

// =============================================================================
// Account forms
// =============================================================================

/// Login input as checked by the login form, before any request is sent.
///
/// # Errors
///
/// Returns the first failing rule: email, then password length.
pub fn login_form(email_input: &str, password: &str) -> Result<Email, ValidationError> {
    let email = email(email_input)?;
    new_password(password)?;
    Ok(email)
}

/// Login input as checked by the storefront server.
///
/// The server only requires a password to be present; a wrong or short one is
/// reported as invalid credentials.
///
/// # Errors
///
/// Returns the first failing rule: email, then password presence.
pub fn login(email_input: &str, password: &str) -> Result<Email, ValidationError> {
    let email = email(email_input)?;
    password_present(password)?;
    Ok(email)
}

/// A signup that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    /// Trimmed display name.
    pub name: String,
    pub email: Email,
}

/// Signup input as checked by the signup form.
///
/// # Errors
///
/// Returns the first failing rule: name length, email, password length.
pub fn signup_form(
    name: &str,
    email_input: &str,
    password: &str,
) -> Result<ValidSignup, ValidationError> {
    account_name_length(name)?;
    let email = email(email_input)?;
    new_password(password)?;
    Ok(ValidSignup {
        name: name.trim().to_owned(),
        email,
    })
}

/// Signup input as checked by the storefront server.
///
/// Adds the letters-and-spaces rule on the name.
///
/// # Errors
///
/// Returns the first failing rule: name length, name charset, email, password length.
pub fn signup(
    name: &str,
    email_input: &str,
    password: &str,
) -> Result<ValidSignup, ValidationError> {
    account_name_length(name)?;
    if !name
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
    {
        return Err(ValidationError::new(Field::Name, messages::NAME_CHARSET));
    }
    let email = email(email_input)?;
    new_password(password)?;
    Ok(ValidSignup {
        name: name.trim().to_owned(),
        email,
    })
}

fn account_name_length(name: &str) -> Result<(), ValidationError> {
    if trimmed_len(name) < MIN_NAME_LENGTH {
        return Err(ValidationError::new(Field::Name, messages::SHORT_ACCOUNT_NAME));
    }
    Ok(())
}

// =============================================================================
// Checkout forms
// =============================================================================

/// Where the order is shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl ShippingDetails {
    /// Check name, phone and address in form order.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        shipping_name(&self.name)?;
        phone(&self.phone)?;
        address(&self.address)
    }

    /// Copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            address: self.address.trim().to_owned(),
        }
    }
}

/// Card fields as typed into the checkout form.
///
/// Card data never leaves the client; it is only checked for shape.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    pub holder: String,
    pub expiry: String,
    pub cvv: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"[REDACTED]")
            .field("holder", &self.holder)
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

impl CardDetails {
    /// Check number, holder, expiry and CVV in form order.
    ///
    /// Returns the card number with spaces removed.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<String, ValidationError> {
        let number: String = self.number.chars().filter(|c| !c.is_whitespace()).collect();
        if number.len() != CARD_NUMBER_DIGITS || !all_digits(&number) {
            return Err(ValidationError::new(
                Field::CardNumber,
                messages::INVALID_CARD_NUMBER,
            ));
        }
        if trimmed_len(&self.holder) < MIN_NAME_LENGTH {
            return Err(ValidationError::new(
                Field::CardholderName,
                messages::MISSING_CARDHOLDER,
            ));
        }
        if !is_expiry(&self.expiry) {
            return Err(ValidationError::new(Field::CardExpiry, messages::INVALID_EXPIRY));
        }
        if self.cvv.len() != 3 || !all_digits(&self.cvv) {
            return Err(ValidationError::new(Field::CardCvv, messages::INVALID_CVV));
        }
        Ok(number)
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// `NN/NN`, digits only.
fn is_expiry(s: &str) -> bool {
    match s.split_once('/') {
        Some((month, year)) => {
            month.len() == 2 && year.len() == 2 && all_digits(month) && all_digits(year)
        }
        None => false,
    }
}

/// An order that passed server-side validation, with trimmed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOrder {
    pub shipping: ShippingDetails,
    pub total: Price,
    pub payment_method: PaymentMethod,
}

/// Validate an order submission as the storefront server receives it.
///
/// # Errors
///
/// Returns the first failing rule: name, phone, address, total, payment method.
pub fn order(
    shipping: &ShippingDetails,
    amount: Price,
    method: &str,
) -> Result<ValidOrder, ValidationError> {
    let shipping = shipping.trimmed();
    shipping.validate()?;
    total(amount)?;
    let payment_method = payment_method(method)?;
    Ok(ValidOrder {
        shipping,
        total: amount,
        payment_method,
    })
}

// =============================================================================
// Input formatting helpers
// =============================================================================

/// Keep only ASCII digits.
#[must_use]
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Group card digits in blocks of four: `4111111111111111` becomes `4111 1111 1111 1111`.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits = digits_only(input);
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }
    formatted
}

/// Insert the `/` of an `MM/YY` expiry once two digits have been typed.
#[must_use]
pub fn format_expiry(input: &str) -> String {
    let digits = digits_only(input);
    if digits.len() < 2 {
        return digits;
    }
    let (month, year) = digits.split_at(2);
    format!("{month}/{year}")
}

/// Live feedback while a card number is being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardNumberHint {
    Empty,
    NeedsMore(usize),
    Valid,
    TooLong,
}

impl CardNumberHint {
    /// Classify the digits typed so far.
    #[must_use]
    pub fn for_input(input: &str) -> Self {
        let count = digits_only(input).len();
        match count {
            0 => Self::Empty,
            n if n < CARD_NUMBER_DIGITS => Self::NeedsMore(CARD_NUMBER_DIGITS - n),
            CARD_NUMBER_DIGITS => Self::Valid,
            _ => Self::TooLong,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::NeedsMore(_) | Self::TooLong)
    }
}

impl fmt::Display for CardNumberHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Enter 16 digits"),
            Self::NeedsMore(n) => write!(f, "{n} more digits needed"),
            Self::Valid => f.write_str("Valid card number"),
            Self::TooLong => f.write_str("Too many digits"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shipping(name: &str, phone: &str, address: &str) -> ShippingDetails {
        ShippingDetails {
            name: name.to_owned(),
            phone: phone.to_owned(),
            address: address.to_owned(),
        }
    }

    fn card(number: &str, holder: &str, expiry: &str, cvv: &str) -> CardDetails {
        CardDetails {
            number: number.to_owned(),
            holder: holder.to_owned(),
            expiry: expiry.to_owned(),
            cvv: cvv.to_owned(),
        }
    }

    #[test]
    fn test_login_form_requires_six_characters() {
        assert!(login_form("jane@paws.io", "secret").is_ok());
        let err = login_form("jane@paws.io", "12345").unwrap_err();
        assert_eq!(err.field, Field::Password);
        assert_eq!(err.message, messages::SHORT_PASSWORD);
    }

    #[test]
    fn test_login_checks_email_first() {
        let err = login("not-an-email", "").unwrap_err();
        assert_eq!(err.message, messages::INVALID_EMAIL);

        let err = login("jane@paws.io", "").unwrap_err();
        assert_eq!(err.message, messages::MISSING_PASSWORD);

        // The server accepts short passwords and lets the hash check fail
        assert!(login("jane@paws.io", "abc").is_ok());
    }

    #[test]
    fn test_signup_form_trims_name() {
        let ok = signup_form("  Jane Doe ", "jane@paws.io", "hunter22").unwrap();
        assert_eq!(ok.name, "Jane Doe");
        assert_eq!(ok.email.as_str(), "jane@paws.io");

        let err = signup_form(" Jo ", "jane@paws.io", "hunter22").unwrap_err();
        assert_eq!(err.message, messages::SHORT_ACCOUNT_NAME);
    }

    #[test]
    fn test_signup_server_rejects_name_charset() {
        // The form allows it, the server does not
        assert!(signup_form("Jane 2nd", "jane@paws.io", "hunter22").is_ok());
        let err = signup("Jane 2nd", "jane@paws.io", "hunter22").unwrap_err();
        assert_eq!(err.message, messages::NAME_CHARSET);

        let err = signup("Jane Doe", "jane@paws", "hunter22").unwrap_err();
        assert_eq!(err.field, Field::Email);

        let err = signup("Jane Doe", "jane@paws.io", "short").unwrap_err();
        assert_eq!(err.field, Field::Password);
    }

    #[test]
    fn test_phone_counts_digits_only() {
        assert!(phone("(555) 123-4567").is_ok());
        assert!(phone("+1 555 123 456").is_ok());
        assert_eq!(
            phone("555-1234 ext").unwrap_err().message,
            messages::INVALID_PHONE
        );
    }

    #[test]
    fn test_shipping_reports_first_failure() {
        let err = shipping("Al", "123", "short").validate().unwrap_err();
        assert_eq!(err.field, Field::Name);

        let err = shipping("Alice", "123", "short").validate().unwrap_err();
        assert_eq!(err.field, Field::Phone);

        let err = shipping("Alice", "1234567890", "   short   ")
            .validate()
            .unwrap_err();
        assert_eq!(err.field, Field::Address);

        assert!(
            shipping("Alice", "1234567890", "12 Bark St.")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_card_normalizes_number() {
        let number = card("4111 1111 1111 1111", "Jane Doe", "12/25", "123")
            .validate()
            .unwrap();
        assert_eq!(number, "4111111111111111");
    }

    #[test]
    fn test_card_rules_in_order() {
        let cases = [
            (card("4111 1111 1111 111", "Jane", "12/25", "123"), Field::CardNumber),
            (card("4111 1111 1111 111x", "Jane", "12/25", "123"), Field::CardNumber),
            (card("4111111111111111", " J ", "12/25", "123"), Field::CardholderName),
            (card("4111111111111111", "Jane", "1225", "123"), Field::CardExpiry),
            (card("4111111111111111", "Jane", "1/225", "123"), Field::CardExpiry),
            (card("4111111111111111", "Jane", "12/25", "12a"), Field::CardCvv),
            (card("4111111111111111", "Jane", "12/25", "1234"), Field::CardCvv),
        ];
        for (details, field) in cases {
            assert_eq!(details.validate().unwrap_err().field, field);
        }
    }

    #[test]
    fn test_card_debug_redacts() {
        let debug = format!("{:?}", card("4111111111111111", "Jane", "12/25", "123"));
        assert!(!debug.contains("4111"));
        assert!(!debug.contains("123\""));
    }

    #[test]
    fn test_order_rejects_zero_total() {
        let details = shipping("Jane Doe", "1234567890", "12 Bark St.");
        let err = order(&details, Price::ZERO, "cod").unwrap_err();
        assert_eq!(err.message, messages::INVALID_TOTAL);

        let err = order(&details, Price::from_cents(100), "bitcoin").unwrap_err();
        assert_eq!(err.message, messages::INVALID_PAYMENT_METHOD);
    }

    #[test]
    fn test_order_trims_fields() {
        let details = shipping(" Jane Doe ", " 1234567890 ", " 12 Bark St. ");
        let valid = order(&details, Price::from_cents(4999), "card").unwrap();
        assert_eq!(valid.shipping.name, "Jane Doe");
        assert_eq!(valid.shipping.address, "12 Bark St.");
        assert_eq!(valid.payment_method, PaymentMethod::Card);
    }

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("41-11 1"), "4111 1");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12/");
        assert_eq!(format_expiry("1225"), "12/25");
        assert_eq!(format_expiry("12/2"), "12/2");
    }

    #[test]
    fn test_card_number_hint() {
        assert_eq!(CardNumberHint::for_input(""), CardNumberHint::Empty);
        assert_eq!(
            CardNumberHint::for_input("4111 11").to_string(),
            "10 more digits needed"
        );
        assert_eq!(
            CardNumberHint::for_input("4111 1111 1111 1111"),
            CardNumberHint::Valid
        );
        assert!(CardNumberHint::for_input("41111111111111112").is_error());
    }
}
