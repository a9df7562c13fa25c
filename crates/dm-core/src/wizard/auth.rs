//! Authentication wizard
//!
//! Role selection branches the step list: login flows end at the password
//! step, sign-up flows append an email one-time-code step. The wizard only
//! validates and sequences; the session container performs the actual
//! gateway calls when the application layer executes a returned
//! [`AuthAction`].

use tracing::debug;

use crate::errors::SessionError;
use crate::identity::Role;
use crate::input::{
    digits_only, is_valid_email, is_valid_phone, is_valid_signup_password, OTP_LEN, PHONE_LEN,
};
use crate::wizard::Stepper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStep {
    RoleSelection,
    Credentials,
    Password,
    OneTimeCode,
}

/// What the application layer should do when the wizard submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
        name: String,
        phone: String,
        role: Role,
    },
    VerifyCode {
        email: String,
        code: String,
    },
}

/// Step list for a resolved (mode, role) branch.
fn steps_for(mode: AuthMode) -> Vec<AuthStep> {
    match mode {
        AuthMode::Login => vec![
            AuthStep::RoleSelection,
            AuthStep::Credentials,
            AuthStep::Password,
        ],
        AuthMode::Signup => vec![
            AuthStep::RoleSelection,
            AuthStep::Credentials,
            AuthStep::Password,
            AuthStep::OneTimeCode,
        ],
    }
}

/// Field values entered across the auth steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub name: String,
    phone: String,
    otp: String,
}

impl AuthForm {
    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn set_phone(&mut self, raw: &str) {
        self.phone = digits_only(raw, PHONE_LEN);
    }

    pub fn otp(&self) -> &str {
        &self.otp
    }

    pub fn set_otp(&mut self, raw: &str) {
        self.otp = digits_only(raw, OTP_LEN);
    }
}

/// The sign-in / sign-up flow state machine.
#[derive(Debug, Clone)]
pub struct AuthWizard {
    mode: AuthMode,
    role: Option<Role>,
    stepper: Stepper<AuthStep>,
    form: AuthForm,
}

impl AuthWizard {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            role: None,
            stepper: Stepper::new(steps_for(mode)),
            form: AuthForm::default(),
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn current_step(&self) -> AuthStep {
        self.stepper.current()
    }

    pub fn form(&self) -> &AuthForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AuthForm {
        &mut self.form
    }

    /// Resolve the branch for the selected role and move to credentials.
    ///
    /// Admin accounts are provisioned out of band, so admin sign-up is
    /// rejected here, before any further input is collected.
    pub fn select_role(&mut self, role: Role) -> Result<(), SessionError> {
        if self.mode == AuthMode::Signup && role == Role::Admin {
            return Err(SessionError::Validation(
                "admin accounts cannot be created from sign-up".to_string(),
            ));
        }
        self.role = Some(role);
        self.stepper.replace_steps(steps_for(self.mode));
        self.stepper.advance();
        debug!(role = %role, "auth branch resolved");
        Ok(())
    }

    pub fn can_proceed(&self) -> bool {
        let form = &self.form;
        match self.current_step() {
            AuthStep::RoleSelection => self.role.is_some(),
            AuthStep::Credentials => {
                is_valid_email(&form.email)
                    && (self.mode == AuthMode::Login
                        || (!form.name.is_empty() && is_valid_phone(&form.phone)))
            }
            AuthStep::Password => match self.mode {
                AuthMode::Login => !form.password.is_empty(),
                AuthMode::Signup => is_valid_signup_password(&form.password),
            },
            AuthStep::OneTimeCode => form.otp.len() == OTP_LEN,
        }
    }

    pub fn next(&mut self) -> bool {
        if !self.can_proceed() {
            return false;
        }
        self.stepper.advance()
    }

    pub fn back(&mut self) -> bool {
        self.stepper.retreat()
    }

    /// The gateway action for the current step, if it is a submitting one.
    ///
    /// Fails with a validation error when the step's predicate does not
    /// hold, without touching the network. On a successful sign-up the
    /// caller advances the wizard to the one-time-code step with [`next`].
    ///
    /// [`next`]: Self::next
    pub fn submit(&self) -> Result<AuthAction, SessionError> {
        if !self.can_proceed() {
            return Err(self.validation_failure());
        }
        let form = &self.form;
        match (self.current_step(), self.mode) {
            (AuthStep::Password, AuthMode::Login) => Ok(AuthAction::SignIn {
                email: form.email.clone(),
                password: form.password.clone(),
            }),
            (AuthStep::Password, AuthMode::Signup) => Ok(AuthAction::SignUp {
                email: form.email.clone(),
                password: form.password.clone(),
                name: form.name.clone(),
                phone: form.phone.clone(),
                role: self.role.expect("role is selected before the password step"),
            }),
            (AuthStep::OneTimeCode, AuthMode::Signup) => Ok(AuthAction::VerifyCode {
                email: form.email.clone(),
                code: form.otp.clone(),
            }),
            _ => Err(SessionError::Validation(
                "nothing to submit on this step".to_string(),
            )),
        }
    }

    fn validation_failure(&self) -> SessionError {
        let message = match self.current_step() {
            AuthStep::RoleSelection => "select how you want to continue",
            AuthStep::Credentials => match self.mode {
                AuthMode::Login => "enter a valid email address",
                AuthMode::Signup => "enter your name, email and a 10-digit phone number",
            },
            AuthStep::Password => match self.mode {
                AuthMode::Login => "enter your password",
                AuthMode::Signup => "password must be at least 8 characters",
            },
            AuthStep::OneTimeCode => "enter the 6-digit code",
        };
        SessionError::Validation(message.to_string())
    }
}
