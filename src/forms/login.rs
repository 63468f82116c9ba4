use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::api::LoginRequest;
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
/// Credentials entered on the sign-in screen.
pub struct LoginForm {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl TryFrom<LoginForm> for LoginRequest {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(LoginRequest {
            email: form.email.trim().to_string(),
            password: form.password,
        })
    }
}
