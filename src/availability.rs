//! Time-slot availability driven by a category selection.
//!
//! When the restricted category is selected, a slot can only be chosen if the
//! slot after it is free too. Any other selection lifts every restriction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::RESTRICTED_CATEGORY;

/// One selectable time slot, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectableOption {
    pub value:    String,
    #[serde(default)]
    pub disabled: bool,
}

impl SelectableOption {
    pub fn new(value: impl Into<String>, disabled: bool) -> Self {
        Self {
            value: value.into(),
            disabled,
        }
    }
}

/// Derives disabled flags for an ordered option list from a trigger value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionAvailabilityFilter {
    restricted_category: String,
}

impl Default for OptionAvailabilityFilter {
    fn default() -> Self {
        Self::new(RESTRICTED_CATEGORY)
    }
}

impl OptionAvailabilityFilter {
    pub fn new(restricted_category: impl Into<String>) -> Self {
        Self {
            restricted_category: restricted_category.into(),
        }
    }

    pub fn restricted_category(&self) -> &str {
        &self.restricted_category
    }

    /// Computes the disabled flag of every option, in input order.
    ///
    /// For the restricted category this is a single left-to-right pass: an
    /// option becomes disabled when it is last or its successor reads as
    /// disabled, and stays disabled if it already was. The successor has not
    /// been visited yet when it is read, so a pass never cascades more than
    /// one step. Any other trigger enables every option.
    pub fn recompute(&self, trigger: &str, options: &[SelectableOption]) -> Vec<bool> {
        if trigger != self.restricted_category {
            return vec![false; options.len()];
        }

        let mut flags: Vec<bool> = options.iter().map(|option| option.disabled).collect();
        for i in 0..flags.len() {
            let successor_disabled = flags.get(i + 1).copied().unwrap_or(true);
            if let Some(flag) = flags.get_mut(i) {
                *flag |= successor_disabled;
            }
        }

        tracing::trace!(
            trigger,
            options = options.len(),
            disabled = flags.iter().filter(|&&disabled| disabled).count(),
            "recomputed option availability"
        );
        flags
    }

    /// Writes the recomputed flags into the options
    pub fn apply(&self, trigger: &str, options: &mut [SelectableOption]) {
        let flags = self.recompute(trigger, options);
        for (option, disabled) in options.iter_mut().zip(flags) {
            option.disabled = disabled;
        }
    }
}

/// Subscription of a filter to one category control.
///
/// `attach` takes options exactly as the host rendered them and remembers
/// those flags per option value, replacing whatever was remembered before.
/// `reapply` and `on_change` work on options the binding already wrote to and
/// always start again from the remembered flags, so repeating them never
/// compounds a previous result.
#[derive(Debug, Clone)]
pub struct AvailabilityBinding {
    control_id: String,
    trigger:    String,
    filter:     OptionAvailabilityFilter,
    rendered:   HashMap<String, bool>,
}

impl AvailabilityBinding {
    /// Binds `filter` to the control with id `control_id`, whose current value is `trigger`
    pub fn new(control_id: impl Into<String>, trigger: impl Into<String>, filter: OptionAvailabilityFilter) -> Self {
        Self {
            control_id: control_id.into(),
            trigger: trigger.into(),
            filter,
            rendered: HashMap::new(),
        }
    }

    pub fn control_id(&self) -> &str {
        &self.control_id
    }

    /// Current value of the category control
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Applies the filter to a freshly rendered set of options.
    /// Their flags are taken as the host's availability.
    pub fn attach(&mut self, options: &mut [SelectableOption]) {
        for option in options.iter() {
            self.rendered.insert(option.value.clone(), option.disabled);
        }
        self.filter.apply(&self.trigger, options);
    }

    /// Applies the filter again to options previously passed to `attach`.
    /// Options the binding has never seen keep their current flag as input.
    pub fn reapply(&self, options: &mut [SelectableOption]) {
        let rendered: Vec<SelectableOption> = options
            .iter()
            .map(|option| {
                let disabled = self.rendered.get(&option.value).copied().unwrap_or(option.disabled);
                SelectableOption::new(option.value.clone(), disabled)
            })
            .collect();

        let flags = self.filter.recompute(&self.trigger, &rendered);
        for (option, disabled) in options.iter_mut().zip(flags) {
            option.disabled = disabled;
        }
    }

    /// Handles a value change on a control. Changes on other controls are
    /// ignored; returns whether the change was handled.
    pub fn on_change(&mut self, control_id: &str, value: impl Into<String>, options: &mut [SelectableOption]) -> bool {
        if control_id != self.control_id {
            return false;
        }
        self.trigger = value.into();
        tracing::debug!(control = control_id, trigger = %self.trigger, "category changed");
        self.reapply(options);
        true
    }
}
