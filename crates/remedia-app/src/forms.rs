// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::PredictRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Symptoms,
    Pincode,
}

impl FormField {
    pub const ALL: [Self; 2] = [Self::Symptoms, Self::Pincode];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Symptoms => "symptoms",
            Self::Pincode => "pincode",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Symptoms => "Enter symptoms (comma separated)...",
            Self::Pincode => "Enter your pincode...",
        }
    }

    pub fn rotate(self, delta: isize) -> Self {
        let current = Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0) as isize;
        let len = Self::ALL.len() as isize;
        Self::ALL[(current + delta).rem_euclid(len) as usize]
    }
}

/// The two text inputs. Values are kept exactly as typed; nothing here trims
/// or folds case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub symptoms: String,
    pub pincode: String,
}

impl FormState {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Symptoms => &self.symptoms,
            FormField::Pincode => &self.pincode,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Symptoms => &mut self.symptoms,
            FormField::Pincode => &mut self.pincode,
        }
    }

    pub fn insert_char(&mut self, field: FormField, ch: char) {
        self.value_mut(field).push(ch);
    }

    pub fn delete_char(&mut self, field: FormField) -> bool {
        self.value_mut(field).pop().is_some()
    }

    /// Presence check only. Whitespace counts as a value, the same way a
    /// native `required` input treats it.
    pub fn validate(&self) -> Result<()> {
        for field in FormField::ALL {
            if self.value(field).is_empty() {
                bail!("{} is required -- fill it in and submit again", field.label());
            }
        }
        Ok(())
    }

    pub fn to_request(&self) -> PredictRequest {
        PredictRequest {
            symptoms: self.symptoms.clone(),
            pincode: self.pincode.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FormField, FormState};

    #[test]
    fn validate_requires_both_fields() {
        let empty = FormState::default();
        let error = empty.validate().expect_err("empty form should fail");
        assert!(error.to_string().contains("symptoms is required"));

        let missing_pincode = FormState {
            symptoms: "fever".to_owned(),
            pincode: String::new(),
        };
        let error = missing_pincode
            .validate()
            .expect_err("missing pincode should fail");
        assert!(error.to_string().contains("pincode is required"));
    }

    #[test]
    fn validate_accepts_whitespace_values() {
        let form = FormState {
            symptoms: " ".to_owned(),
            pincode: " ".to_owned(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn request_passes_values_through_verbatim() {
        let form = FormState {
            symptoms: "  Fever, HEADACHE ".to_owned(),
            pincode: " 560001".to_owned(),
        };
        let request = form.to_request();
        assert_eq!(request.symptoms, "  Fever, HEADACHE ");
        assert_eq!(request.pincode, " 560001");
    }

    #[test]
    fn editing_targets_the_given_field() {
        let mut form = FormState::default();
        form.insert_char(FormField::Pincode, '5');
        form.insert_char(FormField::Pincode, '6');
        form.insert_char(FormField::Symptoms, 'x');
        assert_eq!(form.value(FormField::Pincode), "56");
        assert!(form.delete_char(FormField::Symptoms));
        assert!(!form.delete_char(FormField::Symptoms));
        assert_eq!(form.value(FormField::Symptoms), "");
    }

    #[test]
    fn focus_rotation_wraps() {
        assert_eq!(FormField::Symptoms.rotate(1), FormField::Pincode);
        assert_eq!(FormField::Pincode.rotate(1), FormField::Symptoms);
        assert_eq!(FormField::Symptoms.rotate(-1), FormField::Pincode);
    }
}
