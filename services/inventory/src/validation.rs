//! Input validation utilities
//!
//! Only presence of required fields is checked; values are otherwise stored
//! as submitted (apart from surrounding whitespace on product fields).

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};

use crate::models::{NewProduct, ProductChanges, ProductForm};

/// Date format produced by HTML date inputs
const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

fn required(field: &str, value: Option<&str>) -> Result<String, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!("Product {} is required", field)),
    }
}

/// Like [`required`], but an absent field means "leave unchanged"
fn required_if_present(field: &str, value: Option<&str>) -> Result<Option<String>, String> {
    match value {
        None => Ok(None),
        Some(v) => required(field, Some(v)).map(Some),
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse an expiry date; blank input means "no date"
pub fn parse_expiry_date(value: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, EXPIRY_DATE_FORMAT)
        .map(Some)
        .map_err(|_| format!("Invalid expiry date '{}', expected YYYY-MM-DD", value))
}

/// Validate the add form into a creation payload
pub fn validate_new_product(form: &ProductForm) -> Result<NewProduct, String> {
    let name = required("name", form.name.as_deref())?;
    let code = required("code", form.code.as_deref())?;
    let product_type = required("type", form.product_type.as_deref())?;
    let expiry_date = match form.expiry_date.as_deref() {
        Some(raw) => parse_expiry_date(raw)?,
        None => None,
    };

    Ok(NewProduct {
        name,
        code,
        product_type,
        company: optional_text(form.company.as_deref()),
        expiry_date,
    })
}

/// Validate the edit form into a partial update
pub fn validate_product_changes(form: &ProductForm) -> Result<ProductChanges, String> {
    let expiry_date = match form.expiry_date.as_deref() {
        Some(raw) => Some(parse_expiry_date(raw)?),
        None => None,
    };

    Ok(ProductChanges {
        name: required_if_present("name", form.name.as_deref())?,
        code: required_if_present("code", form.code.as_deref())?,
        product_type: required_if_present("type", form.product_type.as_deref())?,
        company: form.company.as_deref().map(|c| optional_text(Some(c))),
        expiry_date,
    })
}

/// Build a case-insensitive matcher that treats every character of the
/// query literally
pub fn name_matcher(query: &str) -> Result<Regex, String> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(|e| format!("Invalid search query: {}", e))
}

/// Build an `ILIKE` pattern matching `query` as a literal substring,
/// escaped for `ESCAPE '\'`
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, code: &str, product_type: &str) -> ProductForm {
        ProductForm {
            name: Some(name.to_string()),
            code: Some(code.to_string()),
            product_type: Some(product_type.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_credentials_only_need_to_be_present() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("   ").is_err());
        assert!(validate_password("pw1").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_new_product_requires_name_code_and_type() {
        assert!(validate_new_product(&form("Aspirin", "A100", "tablet")).is_ok());

        let err = validate_new_product(&form("", "A100", "tablet")).unwrap_err();
        assert_eq!(err, "Product name is required");

        let err = validate_new_product(&form("Aspirin", "  ", "tablet")).unwrap_err();
        assert_eq!(err, "Product code is required");

        let missing_type = ProductForm {
            product_type: None,
            ..form("Aspirin", "A100", "")
        };
        let err = validate_new_product(&missing_type).unwrap_err();
        assert_eq!(err, "Product type is required");
    }

    #[test]
    fn test_new_product_optional_fields() {
        let input = ProductForm {
            company: Some("  ".to_string()),
            expiry_date: Some("2026-12-01".to_string()),
            ..form(" Aspirin ", "A100", "tablet")
        };

        let product = validate_new_product(&input).unwrap();
        assert_eq!(product.name, "Aspirin");
        assert_eq!(product.company, None);
        assert_eq!(product.expiry_date, NaiveDate::from_ymd_opt(2026, 12, 1));

        let bad_date = ProductForm {
            expiry_date: Some("01/12/2026".to_string()),
            ..form("Aspirin", "A100", "tablet")
        };
        assert!(validate_new_product(&bad_date).is_err());
    }

    #[test]
    fn test_changes_keep_absent_fields_and_clear_blank_optionals() {
        let input = ProductForm {
            code: Some("A200".to_string()),
            company: Some(String::new()),
            expiry_date: Some(String::new()),
            ..Default::default()
        };

        let changes = validate_product_changes(&input).unwrap();
        assert_eq!(changes.name, None);
        assert_eq!(changes.code.as_deref(), Some("A200"));
        assert_eq!(changes.company, Some(None));
        assert_eq!(changes.expiry_date, Some(None));
    }

    #[test]
    fn test_changes_reject_blank_required_fields() {
        let input = ProductForm {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(validate_product_changes(&input).is_err());
    }

    #[test]
    fn test_name_matcher_is_literal_and_case_insensitive() {
        let matcher = name_matcher("cold").unwrap();
        assert!(matcher.is_match("Cold Tablet"));
        assert!(matcher.is_match("COLD syrup"));
        assert!(!matcher.is_match("Aspirin"));

        let dotted = name_matcher("a.b").unwrap();
        assert!(dotted.is_match("A.B cream"));
        assert!(!dotted.is_match("axb"));

        assert!(name_matcher("").unwrap().is_match("anything"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("cold"), "%cold%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
        assert_eq!(like_pattern(""), "%%");
    }
}
