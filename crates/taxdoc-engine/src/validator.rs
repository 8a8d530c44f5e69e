//! Range and cross-field sanity checks on parsed fields
//!
//! Rules run in a fixed order; the backfills at the end rely on implausible
//! values having been nulled first.
//!
//! 1. Null any negative amount
//! 2. Null income / wages outside the income range
//! 3. Flag deductions above the cap or well above income
//! 4. Null tax owed above the cap
//! 5. Flag a withholding rate outside `[0, max_withholding_rate]`
//! 6. Backfill wages from income and refund from withheld minus owed

use crate::config::ValidationLimits;
use taxdoc_types::{Anomaly, AnomalyReason, FieldName, FinancialFields};
use tracing::warn;

pub fn validate(fields: FinancialFields, limits: &ValidationLimits) -> FinancialFields {
    let mut fields = fields;

    null_negatives(&mut fields);
    null_income_out_of_range(&mut fields, limits);
    flag_deductions(&mut fields, limits);
    null_excessive_tax_owed(&mut fields, limits);
    flag_withholding_rate(&mut fields, limits);
    backfill(&mut fields);

    fields
}

fn record(
    fields: &mut FinancialFields,
    field: FieldName,
    reason: AnomalyReason,
    value: f64,
    nulled: bool,
) {
    warn!(
        document_id = %fields.document_id,
        ?field,
        ?reason,
        value,
        nulled,
        "Implausible field value"
    );
    if nulled {
        fields.set(field, None);
    }
    fields.anomalies.push(Anomaly {
        field,
        reason,
        value,
        nulled,
    });
}

fn null_negatives(fields: &mut FinancialFields) {
    for field in FieldName::ALL {
        if let Some(value) = fields.get(field) {
            if value < 0.0 || value.is_nan() {
                record(fields, field, AnomalyReason::Negative, value, true);
            }
        }
    }
}

fn null_income_out_of_range(fields: &mut FinancialFields, limits: &ValidationLimits) {
    for field in [FieldName::Income, FieldName::Wages] {
        if let Some(value) = fields.get(field) {
            if value < limits.min_income {
                record(fields, field, AnomalyReason::BelowMinimum, value, true);
            } else if value > limits.max_income {
                record(fields, field, AnomalyReason::AboveMaximum, value, true);
            }
        }
    }
}

/// Large deductions are usually a business loss rather than a parse error,
/// so they are flagged and kept
fn flag_deductions(fields: &mut FinancialFields, limits: &ValidationLimits) {
    let Some(deductions) = fields.deductions else {
        return;
    };
    if deductions > limits.max_deductions {
        fields.flags.deductions_flagged = true;
        record(
            fields,
            FieldName::Deductions,
            AnomalyReason::AboveMaximum,
            deductions,
            false,
        );
    } else if let Some(income) = fields.income {
        if deductions > income + limits.deduction_income_margin {
            fields.flags.deductions_flagged = true;
            record(
                fields,
                FieldName::Deductions,
                AnomalyReason::ExceedsIncome,
                deductions,
                false,
            );
        }
    }
}

fn null_excessive_tax_owed(fields: &mut FinancialFields, limits: &ValidationLimits) {
    if let Some(owed) = fields.tax_owed {
        if owed > limits.max_tax_owed {
            record(fields, FieldName::TaxOwed, AnomalyReason::AboveMaximum, owed, true);
        }
    }
}

fn flag_withholding_rate(fields: &mut FinancialFields, limits: &ValidationLimits) {
    let (Some(withheld), Some(income)) = (fields.tax_withheld, fields.income) else {
        return;
    };
    if income <= 0.0 {
        return;
    }
    let rate = withheld / income;
    if !(0.0..=limits.max_withholding_rate).contains(&rate) {
        fields.flags.tax_withheld_flagged = true;
        record(
            fields,
            FieldName::TaxWithheld,
            AnomalyReason::WithholdingRate,
            withheld,
            false,
        );
    }
}

fn backfill(fields: &mut FinancialFields) {
    if fields.wages.is_none() {
        fields.wages = fields.income;
    }
    if fields.refund.is_none() {
        if let (Some(withheld), Some(owed)) = (fields.tax_withheld, fields.tax_owed) {
            fields.refund = Some((withheld - owed).max(0.0));
        }
    }
}
