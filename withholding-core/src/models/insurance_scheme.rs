use serde::{Deserialize, Serialize};

/// Health-insurance scheme the worker is enrolled in. Selects the surcharge
/// rate added on top of each gratuity payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceScheme {
    /// Public social-security scheme (9% surcharge).
    #[default]
    Government,
    /// Private provider scheme (6.75% surcharge).
    Private,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn deserializes_from_snake_case_code() {
        #[derive(Deserialize)]
        struct Holder {
            scheme: InsuranceScheme,
        }

        let holder: Holder = serde_json::from_str(r#"{"scheme":"private"}"#).unwrap();

        assert_eq!(holder.scheme, InsuranceScheme::Private);
    }

    #[test]
    fn default_is_government() {
        assert_eq!(InsuranceScheme::default(), InsuranceScheme::Government);
    }
}
