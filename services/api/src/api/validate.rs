//! Request payload validation.
//!
//! # Purpose
//! Pure checks applied at the top of each handler, before the service facade
//! is invoked. The facade assumes payloads are shape-valid and does not
//! re-validate (domain invariants like rating uniqueness are its own job).
use crate::api::types::{CommentRequest, LoginRequest, RatingRequest, SignupRequest};
use crate::model::NewRecipe;

type Errors = Vec<String>;

fn require_non_blank(errors: &mut Errors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{field} is required"));
    }
}

fn require_all_non_blank(errors: &mut Errors, field: &str, values: &[String]) {
    if values.is_empty() {
        errors.push(format!("{field} must not be empty"));
        return;
    }
    if values.iter().any(|value| value.trim().is_empty()) {
        errors.push(format!("{field} entries must not be blank"));
    }
}

fn require_email_shape(errors: &mut Errors, field: &str, value: &str) {
    let well_formed = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !well_formed {
        errors.push(format!("{field} must be a valid email address"));
    }
}

fn finish(errors: Errors) -> Result<(), String> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join(", "))
    }
}

pub fn recipe_body(body: &NewRecipe) -> Result<(), String> {
    let mut errors = Errors::new();
    require_non_blank(&mut errors, "title", &body.title);
    require_all_non_blank(&mut errors, "ingredients", &body.ingredients);
    require_all_non_blank(&mut errors, "steps", &body.steps);
    finish(errors)
}

pub fn rating_body(body: &RatingRequest) -> Result<(), String> {
    if (1..=5).contains(&body.rating) {
        Ok(())
    } else {
        Err("rating must be an integer between 1 and 5".to_string())
    }
}

pub fn comment_body(body: &CommentRequest) -> Result<(), String> {
    let mut errors = Errors::new();
    require_non_blank(&mut errors, "comment", &body.comment);
    finish(errors)
}

pub fn signup_body(body: &SignupRequest) -> Result<(), String> {
    let mut errors = Errors::new();
    require_non_blank(&mut errors, "firstName", &body.first_name);
    require_email_shape(&mut errors, "email", &body.email);
    require_non_blank(&mut errors, "password", &body.password);
    finish(errors)
}

pub fn login_body(body: &LoginRequest) -> Result<(), String> {
    let mut errors = Errors::new();
    require_email_shape(&mut errors, "userName", &body.user_name);
    require_non_blank(&mut errors, "password", &body.password);
    finish(errors)
}
