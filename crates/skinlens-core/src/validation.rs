//! Client-side form validation
//!
//! Every check here runs before a request is built. Failures carry the
//! message shown to the user.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::{
    Error, Result,
    types::{ConsultationRequest, Credentials, ProductDraft, Registration},
};

/// How far ahead consultations can be booked
pub const BOOKING_WINDOW_DAYS: u64 = 14;

pub fn validate_credentials(credentials: &Credentials) -> Result<()> {
    require("Email", &credentials.email)?;
    require("Password", &credentials.password)
}

pub fn validate_registration(registration: &Registration) -> Result<()> {
    require("First name", &registration.first_name)?;
    require("Last name", &registration.last_name)?;
    require("Email", &registration.email)?;
    require("Password", &registration.password)?;

    if !registration.email.contains('@') {
        return Err(Error::Validation("Please enter a valid email address".to_string()));
    }

    if registration.password != registration.confirm_password {
        return Err(Error::Validation("Passwords do not match".to_string()));
    }

    Ok(())
}

pub fn validate_product(product: &ProductDraft) -> Result<()> {
    for (field, value) in [
        ("Name", &product.name),
        ("Brand", &product.brand),
        ("Category", &product.category),
        ("Description", &product.description),
    ] {
        require(field, value)?;
    }

    if !product.price.is_finite() || product.price < 0.0 {
        return Err(Error::Validation("Price must be a non-negative number".to_string()));
    }

    if product.stock < 0 {
        return Err(Error::Validation("Stock must not be negative".to_string()));
    }

    Ok(())
}

pub fn validate_consultation(request: &ConsultationRequest) -> Result<NaiveDate> {
    require("Date", &request.date)?;
    require("Message", &request.message)?;

    NaiveDate::parse_from_str(request.date.trim(), "%Y-%m-%d").map_err(|_| {
        Error::Validation(format!(
            "Invalid date '{}', expected YYYY-MM-DD",
            request.date
        ))
    })
}

/// Weekdays among the next [`BOOKING_WINDOW_DAYS`] days, `today` excluded
pub fn available_consultation_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (1..=BOOKING_WINDOW_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            email: "jane@example.com".to_string(),
            password: "hunter22".to_string(),
            confirm_password: "hunter22".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            ..Default::default()
        }
    }

    fn product() -> ProductDraft {
        ProductDraft {
            name: "Serum".to_string(),
            brand: "Acme".to_string(),
            category: "serum".to_string(),
            description: "Vitamin C".to_string(),
            price: 19.99,
            stock: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_registration_password_mismatch() {
        let mut reg = registration();
        reg.confirm_password = "other".to_string();

        let err = validate_registration(&reg).unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_registration_requires_fields() {
        let mut reg = registration();
        reg.first_name = "  ".to_string();
        assert_eq!(
            validate_registration(&reg).unwrap_err().to_string(),
            "First name is required"
        );

        let mut reg = registration();
        reg.email = "jane.example.com".to_string();
        assert!(validate_registration(&reg).is_err());

        assert!(validate_registration(&registration()).is_ok());
    }

    #[test]
    fn test_credentials_required() {
        assert!(validate_credentials(&Credentials::new("a@b.c", "")).is_err());
        assert!(validate_credentials(&Credentials::new("a@b.c", "pw")).is_ok());
    }

    #[test]
    fn test_product_rejects_negative_values() {
        let mut p = product();
        p.price = -1.0;
        assert!(validate_product(&p).is_err());

        let mut p = product();
        p.stock = -3;
        assert!(validate_product(&p).is_err());

        let mut p = product();
        p.brand.clear();
        assert_eq!(
            validate_product(&p).unwrap_err().to_string(),
            "Brand is required"
        );

        let mut p = product();
        p.price = 0.0;
        p.stock = 0;
        assert!(validate_product(&p).is_ok());
    }

    #[test]
    fn test_consultation_date_format() {
        let ok = ConsultationRequest {
            date: "2026-10-20".to_string(),
            message: "Recurring rash".to_string(),
        };
        assert_eq!(
            validate_consultation(&ok).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
        );

        let bad = ConsultationRequest {
            date: "20/10/2026".to_string(),
            message: "Recurring rash".to_string(),
        };
        assert!(validate_consultation(&bad).is_err());

        let empty = ConsultationRequest {
            date: "2026-10-20".to_string(),
            message: String::new(),
        };
        assert!(validate_consultation(&empty).is_err());
    }

    #[test]
    fn test_available_dates_skip_weekends() {
        // Saturday
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let dates = available_consultation_dates(today);

        assert_eq!(dates.len(), 10);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert!(dates.iter().all(|d| d.weekday() != Weekday::Sat && d.weekday() != Weekday::Sun));
        assert!(!dates.contains(&today));
    }
}
