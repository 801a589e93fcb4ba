use serde::{Deserialize, Serialize};

use super::form::{Checks, Validate, ValidationError};

/// Body of `POST auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), ValidationError> {
        Checks::new()
            .required("username", &self.username, "Username is required.")
            .required("password", &self.password, "Password is required.")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_validation() {
        let err = LoginForm::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "Username is required. Password is required.");

        let form = LoginForm {
            username: "frontdesk".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
