use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::sanitize_inline_text;

const COUPON_CODE_MAX_LEN: u64 = 20;

#[derive(Debug, Error)]
pub enum DiscountFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Enter a coupon code.")]
    EmptyCode,
    #[error("Enter the discount as a number, e.g. 15.")]
    InvalidPercentage,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CouponForm {
    #[validate(length(max = COUPON_CODE_MAX_LEN))]
    pub code: String,
}

impl CouponForm {
    pub fn into_code(self) -> Result<String, DiscountFormError> {
        self.validate()?;
        let code = sanitize_inline_text(&self.code);
        if code.is_empty() {
            return Err(DiscountFormError::EmptyCode);
        }
        Ok(code)
    }
}

#[derive(Debug, Deserialize)]
pub struct PercentageForm {
    pub percentage: String,
}

impl PercentageForm {
    /// Parse the typed value. Range checks happen in the discount service.
    pub fn into_percentage(self) -> Result<f64, DiscountFormError> {
        self.percentage
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| DiscountFormError::InvalidPercentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_form_trims_code() {
        let form = CouponForm {
            code: "  save10 ".to_string(),
        };
        assert_eq!(form.into_code().expect("valid code"), "save10");
    }

    #[test]
    fn coupon_form_rejects_blank_and_long_codes() {
        let blank = CouponForm {
            code: "   ".to_string(),
        };
        assert!(matches!(blank.into_code(), Err(DiscountFormError::EmptyCode)));

        let long = CouponForm {
            code: "A".repeat(21),
        };
        assert!(matches!(
            long.into_code(),
            Err(DiscountFormError::Validation(_))
        ));
    }

    #[test]
    fn percentage_form_parses_decimal_comma() {
        let form = PercentageForm {
            percentage: " 12,5 ".to_string(),
        };
        assert_eq!(form.into_percentage().expect("number"), 12.5);

        let bad = PercentageForm {
            percentage: "ten".to_string(),
        };
        assert!(matches!(
            bad.into_percentage(),
            Err(DiscountFormError::InvalidPercentage)
        ));
    }
}
