//! Declarative import schemas.
//!
//! A schema lists the logical fields of one import form. Each
//! [`FieldSpec`] knows its requiredness, its format annotation, the rule
//! its value must satisfy and the ordered list of header spellings a
//! downloaded template could have produced for it. Header resolution is a
//! single generic lookup over that list.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::EnumToken;

use super::raw_row::RawRow;
use super::validators::{
    is_enum_member, is_positive_amount, is_valid_date, is_valid_email, is_valid_latitude,
    is_valid_longitude, is_valid_mobile, is_valid_phone,
};

/// Allowed values of an enum column.
#[derive(Clone, Copy)]
pub struct EnumRule {
    /// Canonical tokens, listed in error messages.
    pub tokens: &'static [&'static str],
    /// Token injected for unrecognised input, if the column is forgiving.
    pub default: Option<&'static str>,
    accepts: fn(&str) -> bool,
}

impl EnumRule {
    /// Unrecognised values are validation errors.
    #[must_use]
    pub fn strict<E: EnumToken>() -> Self {
        Self {
            tokens: E::TOKENS,
            default: None,
            accepts: is_enum_member::<E>,
        }
    }

    /// Unrecognised values are replaced by `default` during the transform
    /// and never rejected.
    #[must_use]
    pub fn lenient<E: EnumToken>(default: E) -> Self {
        Self {
            tokens: E::TOKENS,
            default: Some(default.as_token()),
            accepts: is_enum_member::<E>,
        }
    }

    /// `true` if the value normalizes to one of the tokens.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        (self.accepts)(value)
    }
}

impl fmt::Debug for EnumRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumRule")
            .field("tokens", &self.tokens)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

/// Rule applied to a present cell.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule {
    /// Any non-empty text.
    Text,
    /// `local@domain.tld`.
    Email,
    /// Lenient phone number (10+ digits, spaces, hyphens).
    Phone,
    /// Exactly ten digits.
    Mobile,
    /// `DD-MM-YYYY` or `YYYY-MM-DD`.
    Date,
    /// Number greater than zero.
    PositiveAmount,
    /// Decimal latitude.
    Latitude,
    /// Decimal longitude.
    Longitude,
    /// Member of a closed vocabulary.
    Enum(EnumRule),
}

/// Predicate over the whole row that waives a required field.
pub type Waiver = fn(&RawRow) -> bool;

/// One logical column of an import form.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Logical field name, also the bare header spelling.
    pub name: &'static str,
    /// Prefix used in messages, e.g. `Phone number` in
    /// `Phone number is required`.
    pub label: &'static str,
    /// Whether an empty cell is an error.
    pub required: bool,
    /// Format annotation shown in the template header, e.g. `DD-MM-YYYY`.
    pub format: Option<&'static str>,
    /// Value applied to the cell.
    pub rule: FieldRule,
    /// Example value written into the template.
    pub example: &'static str,
    extra_aliases: &'static [&'static str],
    waiver: Option<Waiver>,
}

impl FieldSpec {
    /// A required column.
    #[must_use]
    pub const fn required(name: &'static str, label: &'static str, rule: FieldRule) -> Self {
        Self {
            name,
            label,
            required: true,
            format: None,
            rule,
            example: "",
            extra_aliases: &[],
            waiver: None,
        }
    }

    /// An optional column.
    #[must_use]
    pub const fn optional(name: &'static str, label: &'static str, rule: FieldRule) -> Self {
        Self {
            required: false,
            ..Self::required(name, label, rule)
        }
    }

    /// Sets the header annotation.
    #[must_use]
    pub const fn format(mut self, format: &'static str) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the template example.
    #[must_use]
    pub const fn example(mut self, example: &'static str) -> Self {
        self.example = example;
        self
    }

    /// Adds header spellings beyond the generated ones.
    #[must_use]
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.extra_aliases = aliases;
        self
    }

    /// Makes the field optional for rows where `waiver` holds.
    #[must_use]
    pub const fn unless(mut self, waiver: Waiver) -> Self {
        self.waiver = Some(waiver);
        self
    }

    /// Header written into the downloadable template.
    #[must_use]
    pub fn header(&self) -> String {
        let mut header = self.name.to_string();
        if let Some(format) = self.format {
            header.push_str(&format!(" ({format})"));
        }
        if self.required {
            header.push('*');
        }
        header
    }

    /// Every header spelling accepted for this field, in lookup order.
    #[must_use]
    pub fn header_aliases(&self) -> Vec<String> {
        let name = self.name;
        let mut aliases = vec![name.to_string(), format!("{name}*")];
        if let Some(format) = self.format {
            aliases.push(format!("{name} ({format})"));
            aliases.push(format!("{name} ({format})*"));
            aliases.push(format!("{name} ({format}) (optional)"));
        }
        aliases.push(format!("{name} (optional)"));
        aliases.extend(self.extra_aliases.iter().map(ToString::to_string));
        aliases
    }

    /// Trimmed cell value under the first present alias.
    #[must_use]
    pub fn resolve<'r>(&self, row: &'r RawRow) -> Option<&'r str> {
        let aliases = self.header_aliases();
        row.first_present(aliases.iter().map(String::as_str))
    }

    fn is_required_for(&self, row: &RawRow) -> bool {
        self.required && !self.waiver.is_some_and(|waived| waived(row))
    }

    /// Checks the cell of `row` for this field.
    #[must_use]
    pub fn check(&self, row: &RawRow) -> Option<String> {
        let Some(value) = self.resolve(row) else {
            return self
                .is_required_for(row)
                .then(|| format!("{} is required", self.label));
        };
        let ok = match self.rule {
            FieldRule::Text => true,
            FieldRule::Email => is_valid_email(value),
            FieldRule::Phone => is_valid_phone(value),
            FieldRule::Mobile => is_valid_mobile(value),
            FieldRule::Date => is_valid_date(value),
            FieldRule::PositiveAmount => is_positive_amount(value),
            FieldRule::Latitude => is_valid_latitude(value),
            FieldRule::Longitude => is_valid_longitude(value),
            FieldRule::Enum(rule) => rule.default.is_some() || rule.accepts(value),
        };
        if ok {
            return None;
        }
        Some(match self.rule {
            FieldRule::Email => "Invalid email format".to_string(),
            FieldRule::Phone => "Invalid phone number format".to_string(),
            FieldRule::Mobile => "Mobile number must be 10 digits".to_string(),
            FieldRule::Date => format!("{} must be in DD-MM-YYYY format", self.label),
            FieldRule::PositiveAmount => format!("{} must be a positive number", self.label),
            FieldRule::Latitude | FieldRule::Longitude => "Invalid geolocation format".to_string(),
            FieldRule::Enum(rule) => {
                format!("{} must be one of: {}", self.label, rule.tokens.join(", "))
            }
            FieldRule::Text => format!("{} is invalid", self.label),
        })
    }
}

/// Template description served to clients for CSV generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImportTemplate {
    /// Headers of required columns.
    pub required: Vec<String>,
    /// Headers of optional columns.
    pub optional: Vec<String>,
    /// Example value per header.
    pub example: BTreeMap<String, String>,
}

/// The field list of one import form.
#[derive(Debug, Clone)]
pub struct ImportSchema {
    fields: Vec<FieldSpec>,
}

impl ImportSchema {
    /// Builds a schema from its fields, in template column order.
    #[must_use]
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Fields in column order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by logical name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolved, trimmed value of a logical field.
    #[must_use]
    pub fn value<'r>(&self, row: &'r RawRow, name: &str) -> Option<&'r str> {
        self.field(name).and_then(|f| f.resolve(row))
    }

    /// Every field-level violation in `row`, in column order.
    #[must_use]
    pub fn check_row(&self, row: &RawRow) -> Vec<String> {
        self.fields.iter().filter_map(|f| f.check(row)).collect()
    }

    /// Template description for the client-side CSV builder.
    #[must_use]
    pub fn template(&self) -> ImportTemplate {
        let (required, optional): (Vec<&FieldSpec>, Vec<&FieldSpec>) =
            self.fields.iter().partition(|f| f.required);
        ImportTemplate {
            required: required.iter().map(|f| f.header()).collect(),
            optional: optional.iter().map(|f| f.header()).collect(),
            example: self
                .fields
                .iter()
                .map(|f| (f.header(), f.example.to_string()))
                .collect(),
        }
    }

    /// Header row plus one example row, required columns first.
    #[must_use]
    pub fn template_rows(&self) -> (Vec<String>, Vec<String>) {
        let ordered = self
            .fields
            .iter()
            .filter(|f| f.required)
            .chain(self.fields.iter().filter(|f| !f.required));
        ordered
            .map(|f| (f.header(), f.example.to_string()))
            .unzip()
    }
}
