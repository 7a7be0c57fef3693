//! Farmer onboarding wizard

use super::field::{FormField, InputFilter};
use super::options::{CROPS, LANGUAGES, SOIL_TYPES};
use super::validators::*;
use super::wizard::{region_fields, Wizard, WizardForm};
use crate::regions::RegionData;
use crate::state::Role;
use crate::store::Document;

/// Personal details, farm location, then farm details
#[derive(Debug, Clone)]
pub struct FarmerWizard {
    form: WizardForm,
}

impl FarmerWizard {
    pub fn new(regions: &RegionData) -> Self {
        let (state, district) = region_fields(regions);
        let steps = vec![
            vec![
                FormField::text("name", "Full Name"),
                FormField::text("dob", "Date of Birth (YYYY-MM-DD)"),
                FormField::text("mobile", "Mobile Number").with_filter(InputFilter::Digits(10)),
                FormField::choice("language", "Preferred Language", LANGUAGES),
            ],
            vec![
                state,
                district,
                FormField::text("village", "Village/Town"),
                FormField::text("pincode", "Pincode").with_filter(InputFilter::Digits(6)),
                FormField::text("coordinates", "Coordinates (lat, lng, optional)"),
            ],
            vec![
                FormField::choice("soilType", "Soil Type", SOIL_TYPES),
                FormField::multi_choice("crops", "Crops Grown", CROPS),
                FormField::text("landSize", "Land Size (acres)").with_filter(InputFilter::Decimal),
                FormField::attachment("profilePhotoUrl", "Profile Photo (path, optional)"),
            ],
        ];
        Self {
            form: WizardForm::new(steps),
        }
    }
}

impl Wizard for FarmerWizard {
    fn role(&self) -> Role {
        Role::Farmer
    }

    fn form(&self) -> &WizardForm {
        &self.form
    }

    fn form_mut(&mut self) -> &mut WizardForm {
        &mut self.form
    }

    fn check_field(&self, name: &str, ctx: &ValidationContext) -> FieldCheck {
        let value = self.form.value(name);
        match name {
            "name" => validate_name(value),
            "dob" => validate_dob(value, ctx.today),
            "mobile" => validate_mobile(value),
            "language" => validate_choice(value, LANGUAGES, "Please select a language"),
            "state" => validate_state(value, ctx),
            "district" => validate_district(value, ctx),
            "village" => validate_village(value),
            "pincode" => validate_pincode(value),
            "coordinates" => validate_coordinates(value),
            "soilType" => validate_choice(value, SOIL_TYPES, "Please select a soil type"),
            "crops" => validate_selection(&self.form.values(name), "Please select at least one crop"),
            "landSize" => validate_positive_number(value, "Please enter a valid land size"),
            _ => FieldCheck::ok(),
        }
    }

    fn to_record(&self) -> Document {
        self.form.record(&["landSize"])
    }

    fn step_title(&self, step: usize) -> &'static str {
        match step {
            1 => "Personal Details",
            2 => "Farm Location",
            _ => "Farm Details",
        }
    }
}
