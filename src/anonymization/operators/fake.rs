//! Fake-value replacement operators
//!
//! Wraps the `fake` crate behind the locale + data-kind boundary: one
//! synthetic value per call, no determinism or uniqueness guaranteed across
//! calls. Locales the `fake` crate does not ship (e.g. Polish phone
//! numbers) are covered by digit templates filled with `rand`.

use super::Operator;
use fake::faker::internet::raw::FreeEmail;
use fake::faker::name::raw::Name;
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{EN, FR_FR};
use fake::Fake;
use rand::Rng;

/// Kind of synthetic value to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeKind {
    /// A phone number
    PhoneNumber,
    /// A person name
    Name,
    /// An email address
    Email,
}

/// Locale-aware fake-value provider
///
/// # Examples
///
/// ```
/// use veil::anonymization::operators::fake::{FakeKind, FakeValueProvider};
///
/// let provider = FakeValueProvider::new("en");
/// let phone = provider.value(FakeKind::PhoneNumber);
/// assert!(!phone.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FakeValueProvider {
    locale: String,
}

impl FakeValueProvider {
    /// Create a provider for a locale identifier (e.g. `"en"`, `"fr_FR"`)
    ///
    /// Unknown locales fall back to `en`.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into().to_lowercase(),
        }
    }

    /// Generate one synthetic value of the requested kind
    pub fn value(&self, kind: FakeKind) -> String {
        let french = self.locale.starts_with("fr");
        match (kind, french) {
            (FakeKind::PhoneNumber, false) => PhoneNumber(EN).fake(),
            (FakeKind::PhoneNumber, true) => PhoneNumber(FR_FR).fake(),
            (FakeKind::Name, false) => Name(EN).fake(),
            (FakeKind::Name, true) => Name(FR_FR).fake(),
            (FakeKind::Email, false) => FreeEmail(EN).fake(),
            (FakeKind::Email, true) => FreeEmail(FR_FR).fake(),
        }
    }

    /// Turn the provider into a replacement operator for one kind
    pub fn operator(self, kind: FakeKind) -> Operator {
        Operator::new(move |_| Ok(self.value(kind)))
    }
}

/// Operator that fills a digit template per call
///
/// Every `#` in the template becomes a fresh random digit, so locales the
/// `fake` crate does not cover can still get plausible values.
///
/// # Examples
///
/// ```
/// use veil::anonymization::operators::fake::template_operator;
///
/// let op = template_operator("+48 ### ### ###");
/// # let _ = op;
/// ```
pub fn template_operator(template: impl Into<String>) -> Operator {
    let template = template.into();
    Operator::new(move |_| Ok(fill_template(&template)))
}

fn fill_template(template: &str) -> String {
    let mut rng = rand::thread_rng();
    template
        .chars()
        .map(|c| {
            if c == '#' {
                char::from_digit(rng.gen_range(0..10), 10).unwrap_or('0')
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{Detection, EntityCategory};

    fn detection() -> Detection {
        Detection::new(
            EntityCategory::new("PHONE_NUMBER"),
            0,
            9,
            0.9,
            "666555444",
            "polish_phone",
        )
    }

    #[test]
    fn test_fake_phone_not_empty() {
        let provider = FakeValueProvider::new("en");
        assert!(!provider.value(FakeKind::PhoneNumber).is_empty());
    }

    #[test]
    fn test_fake_email_has_at_sign() {
        let provider = FakeValueProvider::new("en");
        assert!(provider.value(FakeKind::Email).contains('@'));
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        let provider = FakeValueProvider::new("xx_XX");
        assert!(!provider.value(FakeKind::Name).is_empty());
    }

    #[test]
    fn test_provider_as_operator() {
        let operator = FakeValueProvider::new("fr_FR").operator(FakeKind::PhoneNumber);
        let value = operator.apply(&detection()).unwrap();
        assert!(!value.is_empty());
    }

    #[test]
    fn test_template_operator_fills_digits() {
        let operator = template_operator("+48 ### ### ###");
        let value = operator.apply(&detection()).unwrap();

        assert_eq!(value.len(), "+48 000 000 000".len());
        assert!(value.starts_with("+48 "));
        assert!(value
            .chars()
            .filter(|c| c.is_ascii_digit())
            .count() >= 11);
        assert!(!value.contains('#'));
    }
}
