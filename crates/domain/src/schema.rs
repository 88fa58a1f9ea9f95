//! Static attribute rules for resource plans
//!
//! Each plan type lists its attributes once, with a mutability flag and a
//! plain validation function. [`validate_plan`] runs the whole table and
//! turns failures into error diagnostics.

use crate::diagnostics::Diagnostics;
use crate::errors::ReconcileError;

/// How an attribute behaves across the resource lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// Declared by the plan, changed in place.
    Mutable,
    /// Assigned by the platform, carried over from observed state.
    Computed,
    /// Declared by the plan; a change means destroy and recreate.
    ReplaceOnChange,
}

/// Validation function for one attribute of plan `P`.
pub type RuleFn<P> = fn(&P) -> Result<(), String>;

pub struct AttributeRule<P> {
    pub name: &'static str,
    pub mutability: Mutability,
    pub validate: RuleFn<P>,
}

impl<P> AttributeRule<P> {
    pub const fn mutable(name: &'static str, validate: RuleFn<P>) -> Self {
        Self { name, mutability: Mutability::Mutable, validate }
    }

    pub const fn computed(name: &'static str) -> Self {
        Self { name, mutability: Mutability::Computed, validate: accept::<P> }
    }

    pub const fn replace_on_change(name: &'static str, validate: RuleFn<P>) -> Self {
        Self { name, mutability: Mutability::ReplaceOnChange, validate }
    }
}

/// Rule function that accepts every value.
pub fn accept<P>(_: &P) -> Result<(), String> {
    Ok(())
}

/// A resource plan with a static rule table.
pub trait PlanSchema: Sized + 'static {
    /// Observed state the plan is compared against.
    type State;

    /// Resource type name used in diagnostics.
    const RESOURCE: &'static str;

    fn attribute_rules() -> &'static [AttributeRule<Self>];

    /// Replace-on-change attributes whose planned value differs from `prior`.
    fn replacement_triggers(&self, prior: &Self::State) -> Vec<&'static str>;

    /// Non-blocking findings about the plan.
    fn warnings(&self) -> Diagnostics {
        Diagnostics::new()
    }

    fn validate(&self) -> Diagnostics {
        validate_plan(self)
    }
}

/// Whether applying a plan over existing state is an in-place update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeAction {
    Update,
    Replace { attributes: Vec<&'static str> },
}

pub fn change_action<P: PlanSchema>(plan: &P, prior: &P::State) -> ChangeAction {
    let attributes = plan.replacement_triggers(prior);
    if attributes.is_empty() {
        ChangeAction::Update
    } else {
        ChangeAction::Replace { attributes }
    }
}

/// Run every attribute rule of `plan`, then append the plan's warnings.
pub fn validate_plan<P: PlanSchema>(plan: &P) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    for rule in P::attribute_rules() {
        if let Err(message) = (rule.validate)(plan) {
            diagnostics.add_error(
                format!("Invalid {} attribute `{}`", P::RESOURCE, rule.name),
                ReconcileError::Validation(format!("{}: {message}", rule.name)),
            );
        }
    }
    diagnostics.append(plan.warnings());
    diagnostics
}

/// Names of the rules with the given mutability.
pub fn attributes_with<P: PlanSchema>(mutability: Mutability) -> Vec<&'static str> {
    P::attribute_rules()
        .iter()
        .filter(|rule| rule.mutability == mutability)
        .map(|rule| rule.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::length_at_least;

    struct Widget {
        name: String,
        size: i64,
    }

    fn widget_name(plan: &Widget) -> Result<(), String> {
        length_at_least(&plan.name, 1)
    }

    fn widget_size(plan: &Widget) -> Result<(), String> {
        crate::validation::at_least(plan.size, 0)
    }

    static WIDGET_RULES: &[AttributeRule<Widget>] = &[
        AttributeRule::computed("id"),
        AttributeRule::replace_on_change("name", widget_name),
        AttributeRule::mutable("size", widget_size),
    ];

    impl PlanSchema for Widget {
        type State = Widget;
        const RESOURCE: &'static str = "widget";

        fn attribute_rules() -> &'static [AttributeRule<Self>] {
            WIDGET_RULES
        }

        fn replacement_triggers(&self, prior: &Widget) -> Vec<&'static str> {
            if self.name == prior.name {
                Vec::new()
            } else {
                vec!["name"]
            }
        }
    }

    #[test]
    fn one_error_per_failed_rule() {
        let plan = Widget { name: String::new(), size: -1 };
        let diagnostics = plan.validate();
        assert_eq!(diagnostics.errors().count(), 2);
        assert!(diagnostics.iter().any(|d| d.summary.contains("`name`")));
    }

    #[test]
    fn valid_plan_has_no_diagnostics() {
        assert!(Widget { name: "w".into(), size: 3 }.validate().is_empty());
    }

    #[test]
    fn change_action_reports_replacement_attributes() {
        let prior = Widget { name: "a".into(), size: 1 };
        assert_eq!(
            change_action(&Widget { name: "a".into(), size: 9 }, &prior),
            ChangeAction::Update
        );
        assert_eq!(
            change_action(&Widget { name: "b".into(), size: 1 }, &prior),
            ChangeAction::Replace { attributes: vec!["name"] }
        );
    }

    #[test]
    fn attributes_by_mutability() {
        assert_eq!(attributes_with::<Widget>(Mutability::Computed), ["id"]);
        assert_eq!(attributes_with::<Widget>(Mutability::ReplaceOnChange), ["name"]);
    }
}
