//! Recurring investment plans (PAC) - models, payment calendar, services, and traits.

mod pac_model;
mod pac_service;
mod pac_traits;
mod schedule;


pub use pac_model::{
    NewRecurringPlan, PlanExecution, PlanFrequency, RecurringPlan, RecurringPlanUpdate,
};
pub use pac_service::RecurringPlanService;
pub use pac_traits::{RecurringPlanRepositoryTrait, RecurringPlanServiceTrait};
pub use schedule::{next_payment_date, MAX_PLAN_DAY};
