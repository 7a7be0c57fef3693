//! Manufacturer onboarding wizard

use super::field::{FormField, InputFilter};
use super::options::{BUSINESS_TYPES, STUBBLE_TYPES};
use super::validators::*;
use super::wizard::{region_fields, Wizard, WizardForm};
use crate::regions::RegionData;
use crate::state::Role;
use crate::store::Document;

/// Contact and business details, business address, then requirements
#[derive(Debug, Clone)]
pub struct ManufacturerWizard {
    form: WizardForm,
}

impl ManufacturerWizard {
    pub fn new(regions: &RegionData) -> Self {
        let (state, district) = region_fields(regions);
        let steps = vec![
            vec![
                FormField::text("name", "Contact Person"),
                FormField::text("mobileNumber", "Mobile Number")
                    .with_filter(InputFilter::Digits(10)),
                FormField::text("businessName", "Business Name"),
                FormField::choice("businessType", "Business Type", BUSINESS_TYPES),
                FormField::text("gstNumber", "GST Number (optional)")
                    .with_filter(InputFilter::Upper(15)),
                FormField::attachment("companyLogo", "Company Logo (path, optional)"),
            ],
            vec![
                state,
                district,
                FormField::text("city", "Town/City").with_filter(InputFilter::City),
                FormField::text("pincode", "Pincode").with_filter(InputFilter::Digits(6)),
                FormField::text("coordinates", "Coordinates (lat, lng, optional)"),
            ],
            vec![
                FormField::multi_choice("stubbleTypes", "Stubble Types Needed", STUBBLE_TYPES),
                FormField::text("monthlyRequirement", "Monthly Requirement (tonnes)")
                    .with_filter(InputFilter::Decimal),
            ],
        ];
        Self {
            form: WizardForm::new(steps),
        }
    }
}

impl Wizard for ManufacturerWizard {
    fn role(&self) -> Role {
        Role::Manufacturer
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
            "mobileNumber" => validate_mobile(value),
            "businessName" => validate_business_name(value),
            "businessType" => validate_choice(value, BUSINESS_TYPES, "Please select a business type"),
            "gstNumber" => validate_gst(value),
            "state" => validate_state(value, ctx),
            "district" => validate_district(value, ctx),
            "city" => validate_city(value),
            "pincode" => validate_pincode(value),
            "coordinates" => validate_coordinates(value),
            "stubbleTypes" => validate_selection(
                &self.form.values(name),
                "Please select at least one type of stubble",
            ),
            "monthlyRequirement" => validate_positive_number(
                value,
                "Please enter a valid monthly requirement greater than 0",
            ),
            _ => FieldCheck::ok(),
        }
    }

    fn to_record(&self) -> Document {
        let mut record = self.form.record(&["monthlyRequirement"]);
        if let Some(city) = record.get_mut("city") {
            *city = serde_json::json!(sanitize_city(self.form.value("city")));
        }
        record
    }

    fn step_title(&self, step: usize) -> &'static str {
        match step {
            1 => "Contact & Business Information",
            2 => "Business Address & Location",
            _ => "Stubble Requirements",
        }
    }
}
