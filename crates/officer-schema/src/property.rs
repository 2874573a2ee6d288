//! # Leaf Property Validation
//!
//! [`PropertyValidator`] validates one leaf value, or a flat collection of
//! leaf values, against its [`Rule`](crate::Rule).
//!
//! ## Scalar Procedure
//!
//! 1. Text expected and text given: trim; blank becomes missing.
//! 2. `before` transform on a present value.
//! 3. Presence: a non-null default, else optional (stop), else required
//!    error (stop).
//! 4. Kind check, with coercion when enabled.
//! 5. Pattern.
//! 6. Range.
//! 7. `after` transform.
//!
//! Failed checks add to the error report and validation continues; only a
//! missing value skips steps 4-7. A failing hook aborts the whole call with
//! [`OfficerError::Hook`].

use officer_core::kind::article;
use officer_core::temporal;
use officer_core::value::format_number;
use officer_core::{Coercions, DocPath, OfficerError, Report, Segment, Value, ValueKind};

use crate::schema::{LeafField, Range, Transform};

/// Label used in the "is required" message when the field has none.
const GENERIC_LABEL: &str = "information";

/// Result of validating one leaf.
#[derive(Debug, Clone)]
pub struct PropertyOutcome {
    /// The normalized value, or `None` if it is missing.
    pub value: Option<Value>,
    /// Errors, named after the property key.
    pub err: Report,
    /// Informational messages, named after the property key.
    pub info: Report,
}

impl PropertyOutcome {
    /// True when no error was reported.
    pub fn is_valid(&self) -> bool {
        self.err.is_empty()
    }
}

/// Validates a single leaf value. Consumed by [`PropertyValidator::validate`].
pub struct PropertyValidator<'a> {
    leaf: LeafField<'a>,
    value: Option<Value>,
    path: DocPath,
    coercions: &'a Coercions,
    echo: bool,
    err: Report,
    info: Report,
}

impl<'a> PropertyValidator<'a> {
    /// A validator for `value` at `key`. `Null` counts as missing.
    pub fn new(
        key: Segment,
        leaf: LeafField<'a>,
        value: Option<Value>,
        path: DocPath,
        coercions: &'a Coercions,
    ) -> Self {
        let name = key.to_string();
        Self {
            leaf,
            value: value.filter(|v| !v.is_null()),
            path,
            coercions,
            echo: false,
            err: Report::new(name.clone()),
            info: Report::new(name),
        }
    }

    /// Mirror report messages to `tracing`.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self.err = Report::echoing(self.err.name(), echo);
        self.info = Report::echoing(self.info.name(), echo);
        self
    }

    /// Run the validation.
    ///
    /// # Errors
    ///
    /// Returns `OfficerError::Hook` if a `before`/`after` transform or the
    /// default producer fails.
    pub fn validate(mut self) -> Result<PropertyOutcome, OfficerError> {
        let _span = tracing::debug_span!("validate_property", path = %self.path).entered();

        if self.leaf.collection {
            self.validate_collection()?;
        } else {
            self.validate_scalar()?;
        }

        Ok(PropertyOutcome {
            value: self.value,
            err: self.err,
            info: self.info,
        })
    }

    fn validate_scalar(&mut self) -> Result<(), OfficerError> {
        let rule = self.leaf.rule;
        self.info.add_message("Validating property");

        if rule.kind == ValueKind::Text && matches!(self.value, Some(Value::Text(_))) {
            self.prepare_text();
        }

        if let Some(before) = &rule.before {
            self.apply_hook("before", before)?;
        }

        self.determine_value()?;

        if self.value.is_some() {
            self.check_kind();

            if let Some(pattern) = &rule.pattern {
                self.info.add_message("Testing pattern");
                let text = self.value.as_ref().map(Value::to_string).unwrap_or_default();
                if !pattern.is_match(&text) {
                    self.err.add_message(pattern.error());
                }
            }

            if let Some(range) = &rule.range {
                self.check_range(range);
            }

            if let Some(after) = &rule.after {
                self.apply_hook("after", after)?;
            }
        }
        Ok(())
    }

    /// Validate each element of a sequence as its own leaf.
    fn validate_collection(&mut self) -> Result<(), OfficerError> {
        self.info.add_message("Validating property collection");

        if self.value.is_none() {
            self.determine_value()?;
            if self.value.is_none() {
                return Ok(());
            }
        }

        let items = match self.value.take() {
            Some(Value::List(items)) => items,
            single => {
                self.value = single;
                self.err.add_message("Expecting collection but got single property");
                return Ok(());
            }
        };

        let element = self.leaf.element();
        let mut normalized = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let outcome = PropertyValidator::new(
                Segment::Index(index),
                element,
                Some(item),
                self.path.child(index),
                self.coercions,
            )
            .echo(self.echo)
            .validate()?;

            self.err.add_child(outcome.err);
            self.info.add_child(outcome.info);
            normalized.push(outcome.value.unwrap_or(Value::Null));
        }
        self.value = Some(Value::List(normalized));
        Ok(())
    }

    fn update_value(&mut self, value: Value) {
        self.value = (!value.is_null()).then_some(value);
    }

    fn prepare_text(&mut self) {
        if let Some(Value::Text(text)) = self.value.take() {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                self.info.add_message("Empty string converted to missing value");
            } else {
                self.value = Some(Value::Text(trimmed.to_string()));
            }
        }
    }

    fn apply_hook(&mut self, hook: &'static str, transform: &Transform) -> Result<(), OfficerError> {
        let Some(value) = self.value.take() else {
            return Ok(());
        };
        let transformed = transform(value).map_err(|source| OfficerError::Hook {
            path: self.path.to_string(),
            hook,
            source,
        })?;
        self.update_value(transformed);
        Ok(())
    }

    fn determine_value(&mut self) -> Result<(), OfficerError> {
        self.info.add_message("Checking if value is present");
        if self.value.is_some() {
            return Ok(());
        }

        // A default that resolves to null is no default at all.
        let filled = match &self.leaf.rule.default {
            Some(default) => {
                let value = default.resolve().map_err(|source| OfficerError::Hook {
                    path: self.path.to_string(),
                    hook: "default",
                    source,
                })?;
                (!value.is_null()).then_some(value)
            }
            None => None,
        };

        if let Some(value) = filled {
            self.info.add_parts(["Autofilled with".to_string(), value.to_string()]);
            self.update_value(value);
        } else if self.leaf.optional {
            self.info.add_message("Optional property not present");
        } else {
            let label = self.leaf.label.unwrap_or(GENERIC_LABEL);
            let lead = match article(label) {
                "an" => "An",
                _ => "A",
            };
            self.err.add_message(format!("{lead} {label} is required."));
            tracing::debug!(path = %self.path, "required value missing");
        }
        Ok(())
    }

    fn check_kind(&mut self) {
        self.info.add_message("Checking if type matches");
        let rule = self.leaf.rule;
        let Some(value) = &self.value else {
            return;
        };
        let expected = &rule.kind;
        if self.coercions.matches(expected, value) {
            return;
        }

        let actual = value.kind();
        self.info.add_message("Type did not match.");

        if rule.coerce {
            self.info.add_message(format!(
                "Coercing this {actual} into {} {expected}",
                article(expected.name())
            ));
            let coerced = self.coercions.coerce(value, expected);
            match coerced {
                Some(coerced) => {
                    self.info.add_message(format!(
                        "Successfully coerced to {} {expected}",
                        article(expected.name())
                    ));
                    self.update_value(coerced);
                    return;
                }
                None => {
                    self.info.add_message(format!(
                        "Could not coerce to {} {expected}",
                        article(expected.name())
                    ));
                }
            }
        } else {
            self.info.add_message("Avoiding type coercion.");
        }

        self.err.add_message(format!(
            "Expecting {} {expected} but got {} {actual}",
            article(expected.name()),
            article(actual.name())
        ));
    }

    /// Check numbers and dates against inclusive bounds.
    fn check_range(&mut self, range: &Range) {
        self.info.add_message("Checking range");
        let Some(value) = &self.value else {
            return;
        };
        let Some(number) = value.as_number() else {
            self.err.add_message("Value is not a number");
            return;
        };
        let is_date = matches!(value, Value::Date(_));

        let min = self.range_bound(range.min.as_ref(), "minimum", f64::NEG_INFINITY);
        let max = self.range_bound(range.max.as_ref(), "maximum", f64::INFINITY);
        let (Some(mut min), Some(mut max)) = (min, max) else {
            return;
        };

        // Reversed bounds are accepted, e.g. "born between 5 and 50 years ago".
        if min > max {
            self.info.add_message("Swapping minimum and maximum values.");
            std::mem::swap(&mut min, &mut max);
        }

        let over = number > max;
        let under = number < min;
        if !over && !under {
            return;
        }

        let mut message = vec![
            if is_date { "Date" } else { "Number" }.to_string(),
            "outside of accepted range:".to_string(),
        ];
        if is_date {
            let (phrase, bound) = if over {
                ("Cannot be after", max)
            } else {
                ("Cannot be before", min)
            };
            let rendered = temporal::from_epoch_millis(bound)
                .map(|dt| temporal::calendar_string(&dt))
                .unwrap_or_else(|| format_number(bound));
            message.push(phrase.to_string());
            message.push(rendered);
        } else if over {
            message.push(format!("{} cannot be greater than {}", format_number(number), format_number(max)));
        } else {
            message.push(format!("{} cannot be less than {}", format_number(number), format_number(min)));
        }
        self.err.add_parts(message);
    }

    /// Position of one range bound on the number line. An absent bound is
    /// `open`; a bound that is neither a number nor a date is an error.
    fn range_bound(&mut self, bound: Option<&Value>, name: &str, open: f64) -> Option<f64> {
        let Some(bound) = bound else {
            self.info
                .add_message(format!("No {name} provided, using {}", format_number(open)));
            return Some(open);
        };
        let position = bound.as_number().or_else(|| {
            bound
                .as_str()
                .and_then(temporal::parse_date)
                .map(|dt| temporal::epoch_millis(&dt))
        });
        if position.is_none() {
            self.err
                .add_message(format!("Range {name} is not a number or date: {bound}"));
            tracing::debug!(path = %self.path, bound = %bound, "unusable range bound");
        }
        position
    }
}
