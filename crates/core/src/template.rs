// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurrence templates
//!
//! A template is the user-defined rule an obligation repeats by. Daily
//! templates are paid directly; every other kind is expanded into dated
//! instances by the generator.

use crate::id::TemplateId;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How a template repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    CustomCalendar,
}

impl RecurrenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceType::Daily => "daily",
            RecurrenceType::Weekly => "weekly",
            RecurrenceType::Monthly => "monthly",
            RecurrenceType::CustomCalendar => "custom_calendar",
        }
    }

    /// Daily items never go through the instance lifecycle
    pub fn produces_instances(&self) -> bool {
        !matches!(self, RecurrenceType::Daily)
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecurrenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RecurrenceType::Daily),
            "weekly" => Ok(RecurrenceType::Weekly),
            "monthly" => Ok(RecurrenceType::Monthly),
            "custom_calendar" => Ok(RecurrenceType::CustomCalendar),
            _ => Err(format!("unknown recurrence type: {}", s)),
        }
    }
}

/// Expense category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Housing,
    Utilities,
    Insurance,
    Transport,
    Subscriptions,
    Loans,
    Education,
    Health,
    Food,
    #[default]
    Other,
}

/// Template validation failures, raised before anything is persisted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("amount is required for {0} items")]
    MissingAmount(RecurrenceType),
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("week day is required for weekly items")]
    MissingWeekDay,
    #[error("week day must be 0-6, got {0}")]
    WeekDayOutOfRange(u8),
    #[error("month day is required for monthly items")]
    MissingMonthDay,
    #[error("month day must be 1-31, got {0}")]
    MonthDayOutOfRange(u8),
    #[error("at least one calendar day is required for custom calendar items")]
    MissingCustomDays,
    #[error("calendar day must be 1-31, got {0}")]
    CustomDayOutOfRange(u8),
}

/// A stored recurrence definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceTemplate {
    #[serde(default)]
    pub id: TemplateId,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Category,
    pub recurrence_type: RecurrenceType,
    #[serde(default)]
    pub week_day: Option<u8>,
    #[serde(default)]
    pub month_day: Option<u8>,
    #[serde(default)]
    pub custom_days: Vec<u8>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl RecurrenceTemplate {
    pub fn is_daily(&self) -> bool {
        self.recurrence_type == RecurrenceType::Daily
    }

    /// Check the type-specific invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_rule(&self.rule())
    }

    /// Apply a patch, keeping the template untouched if the result is invalid
    pub fn apply(&mut self, patch: TemplatePatch, now: NaiveDateTime) -> Result<(), ValidationError> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(amount) = patch.amount {
            next.amount = amount;
        }
        if let Some(category) = patch.category {
            next.category = category;
        }
        if let Some(recurrence_type) = patch.recurrence_type {
            next.recurrence_type = recurrence_type;
        }
        if let Some(week_day) = patch.week_day {
            next.week_day = week_day;
        }
        if let Some(month_day) = patch.month_day {
            next.month_day = month_day;
        }
        if let Some(custom_days) = patch.custom_days {
            next.custom_days = custom_days;
        }
        if let Some(is_active) = patch.is_active {
            next.is_active = is_active;
        }

        next.validate()?;
        next.normalize();
        next.updated_at = now;
        *self = next;
        Ok(())
    }

    fn rule(&self) -> Rule<'_> {
        Rule {
            name: &self.name,
            amount: self.amount,
            recurrence_type: self.recurrence_type,
            week_day: self.week_day,
            month_day: self.month_day,
            custom_days: &self.custom_days,
        }
    }

    /// Drop fields that do not belong to the recurrence type
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        if self.recurrence_type != RecurrenceType::Weekly {
            self.week_day = None;
        }
        if self.recurrence_type != RecurrenceType::Monthly {
            self.month_day = None;
        }
        if self.recurrence_type == RecurrenceType::CustomCalendar {
            self.custom_days.sort_unstable();
            self.custom_days.dedup();
        } else {
            self.custom_days.clear();
        }
    }
}

fn default_active() -> bool {
    true
}

/// Input for creating a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    pub name: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Category,
    pub recurrence_type: RecurrenceType,
    #[serde(default)]
    pub week_day: Option<u8>,
    #[serde(default)]
    pub month_day: Option<u8>,
    #[serde(default)]
    pub custom_days: Vec<u8>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewTemplate {
    fn base(name: impl Into<String>, recurrence_type: RecurrenceType) -> Self {
        Self {
            name: name.into(),
            amount: None,
            category: Category::default(),
            recurrence_type,
            week_day: None,
            month_day: None,
            custom_days: Vec::new(),
            is_active: true,
        }
    }

    pub fn daily(name: impl Into<String>) -> Self {
        Self::base(name, RecurrenceType::Daily)
    }

    pub fn weekly(name: impl Into<String>, amount: Decimal, week_day: u8) -> Self {
        Self {
            amount: Some(amount),
            week_day: Some(week_day),
            ..Self::base(name, RecurrenceType::Weekly)
        }
    }

    pub fn monthly(name: impl Into<String>, amount: Decimal, month_day: u8) -> Self {
        Self {
            amount: Some(amount),
            month_day: Some(month_day),
            ..Self::base(name, RecurrenceType::Monthly)
        }
    }

    pub fn custom_calendar(name: impl Into<String>, amount: Decimal, days: Vec<u8>) -> Self {
        Self {
            amount: Some(amount),
            custom_days: days,
            ..Self::base(name, RecurrenceType::CustomCalendar)
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_rule(&Rule {
            name: &self.name,
            amount: self.amount,
            recurrence_type: self.recurrence_type,
            week_day: self.week_day,
            month_day: self.month_day,
            custom_days: &self.custom_days,
        })
    }

    /// Validate and turn into a template not yet assigned an id
    pub fn build(
        self,
        owner_id: impl Into<String>,
        now: NaiveDateTime,
    ) -> Result<RecurrenceTemplate, ValidationError> {
        self.validate()?;
        let mut template = RecurrenceTemplate {
            id: TemplateId::default(),
            owner_id: owner_id.into(),
            name: self.name,
            amount: self.amount,
            category: self.category,
            recurrence_type: self.recurrence_type,
            week_day: self.week_day,
            month_day: self.month_day,
            custom_days: self.custom_days,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        };
        template.normalize();
        Ok(template)
    }
}

/// Partial update of a template
///
/// Nested options distinguish "leave unchanged" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub amount: Option<Option<Decimal>>,
    pub category: Option<Category>,
    pub recurrence_type: Option<RecurrenceType>,
    pub week_day: Option<Option<u8>>,
    pub month_day: Option<Option<u8>>,
    pub custom_days: Option<Vec<u8>>,
    pub is_active: Option<bool>,
}

impl TemplatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn amount(mut self, amount: Option<Decimal>) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn recurrence(mut self, recurrence_type: RecurrenceType) -> Self {
        self.recurrence_type = Some(recurrence_type);
        self
    }

    pub fn week_day(mut self, week_day: Option<u8>) -> Self {
        self.week_day = Some(week_day);
        self
    }

    pub fn month_day(mut self, month_day: Option<u8>) -> Self {
        self.month_day = Some(month_day);
        self
    }

    pub fn custom_days(mut self, days: Vec<u8>) -> Self {
        self.custom_days = Some(days);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

struct Rule<'a> {
    name: &'a str,
    amount: Option<Decimal>,
    recurrence_type: RecurrenceType,
    week_day: Option<u8>,
    month_day: Option<u8>,
    custom_days: &'a [u8],
}

fn validate_rule(rule: &Rule<'_>) -> Result<(), ValidationError> {
    if rule.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    match (rule.recurrence_type, rule.amount) {
        (_, Some(amount)) if amount <= Decimal::ZERO => {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        (RecurrenceType::Daily, _) => return Ok(()),
        (kind, None) => return Err(ValidationError::MissingAmount(kind)),
        _ => {}
    }

    match rule.recurrence_type {
        RecurrenceType::Daily => Ok(()),
        RecurrenceType::Weekly => match rule.week_day {
            None => Err(ValidationError::MissingWeekDay),
            Some(day) if day > 6 => Err(ValidationError::WeekDayOutOfRange(day)),
            Some(_) => Ok(()),
        },
        RecurrenceType::Monthly => match rule.month_day {
            None => Err(ValidationError::MissingMonthDay),
            Some(day) if !(1..=31).contains(&day) => Err(ValidationError::MonthDayOutOfRange(day)),
            Some(_) => Ok(()),
        },
        RecurrenceType::CustomCalendar => {
            if rule.custom_days.is_empty() {
                return Err(ValidationError::MissingCustomDays);
            }
            match rule.custom_days.iter().find(|d| !(1..=31).contains(*d)) {
                Some(day) => Err(ValidationError::CustomDayOutOfRange(*day)),
                None => Ok(()),
            }
        }
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
